use num_enum::TryFromPrimitive;

/// The interface_version field of a bind operation (Section 5.2.4).
///
/// This crate implements SMPP v3.4 only; earlier versions are recognised on
/// the wire so that a bind_transceiver we parse back (tests, tooling) does
/// not error, but the client always binds with `SmppV34`.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InterfaceVersion {
    /// SMPP v3.3 or earlier
    Legacy = 0x33,
    /// SMPP v3.4
    SmppV34 = 0x34,
}
