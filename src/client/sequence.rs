// ABOUTME: Sequence number generation for outbound request PDUs
// ABOUTME: Monotonic in [1, 0x7FFFFFFF] with wrap-around, per SMPP Section 5.1.4

use std::sync::atomic::{AtomicU32, Ordering};

/// Issues the sequence_number for each outbound request PDU.
///
/// SMPP requires values in `[1, 0x7FFF_FFFF]`, issued monotonically within a
/// session and wrapping back to 1 after the maximum. The response to a
/// request echoes its sequence number, which is what the correlator keys on.
pub trait SequenceGenerator: Send + Sync {
    fn next_sequence(&self) -> u32;
}

pub const MIN_SEQUENCE_NUMBER: u32 = 0x0000_0001;
pub const MAX_SEQUENCE_NUMBER: u32 = 0x7FFF_FFFF;

/// Default generator: an atomic counter starting at 1.
pub struct MonotonicSequence {
    next: AtomicU32,
}

impl MonotonicSequence {
    pub fn new() -> MonotonicSequence {
        MonotonicSequence {
            next: AtomicU32::new(MIN_SEQUENCE_NUMBER),
        }
    }
}

impl Default for MonotonicSequence {
    fn default() -> MonotonicSequence {
        MonotonicSequence::new()
    }
}

impl SequenceGenerator for MonotonicSequence {
    fn next_sequence(&self) -> u32 {
        let mut current = self.next.load(Ordering::Relaxed);
        loop {
            let following = if current == MAX_SEQUENCE_NUMBER {
                MIN_SEQUENCE_NUMBER
            } else {
                current + 1
            };
            match self.next.compare_exchange_weak(
                current,
                following,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return current,
                Err(observed) => current = observed,
            }
        }
    }
}
