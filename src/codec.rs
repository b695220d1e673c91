// ABOUTME: Text codec subsystem converting application strings to the octets carried in PDU string fields
// ABOUTME: Implements GSM 03.38 (default + escape extension), UCS-2 and the SMPP single-byte alphabets

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// What to do when a codepoint (encoding) or octet sequence (decoding) has
/// no mapping in the selected alphabet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Fail the whole conversion.
    Strict,
    /// Drop the offending unit.
    Ignore,
    /// Substitute a replacement: `?` when encoding (and when decoding GSM),
    /// U+FFFD when decoding other alphabets.
    Replace,
}

impl FromStr for ErrorPolicy {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<ErrorPolicy, CodecError> {
        match s {
            "strict" => Ok(ErrorPolicy::Strict),
            "ignore" => Ok(ErrorPolicy::Ignore),
            "replace" => Ok(ErrorPolicy::Replace),
            other => Err(CodecError::UnknownErrorPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("'{0}' is not a recognised SMPP encoding")]
    UnknownEncoding(String),

    #[error("'{0}' is not a codec error policy (expected strict, ignore or replace)")]
    UnknownErrorPolicy(String),

    #[error("character {character:?} at position {position} cannot be encoded as {encoding}")]
    Unmappable {
        encoding: &'static str,
        character: char,
        position: usize,
    },

    #[error("octet 0x{octet:02X} at position {position} cannot be decoded as {encoding}")]
    Undecodable {
        encoding: &'static str,
        octet: u8,
        position: usize,
    },

    #[error("{encoding} octet stream is truncated at position {position}")]
    Truncated {
        encoding: &'static str,
        position: usize,
    },
}

/// An alphabet's encoder/decoder pair.
///
/// The registry owns one implementation per encoding name; applications
/// override or extend the set through [`CodecRegistry::register`].
pub trait TextCodec: Send + Sync {
    /// Name the implementation reports in errors.
    fn name(&self) -> &'static str;

    /// Convert a string to the octets transmitted in a PDU string field.
    fn encode(&self, input: &str, errors: ErrorPolicy) -> Result<Vec<u8>, CodecError>;

    /// Convert received octets back to a string.
    fn decode(&self, input: &[u8], errors: ErrorPolicy) -> Result<String, CodecError>;
}

/// GSM 03.38 default alphabet. The basic table maps septet values 0-127;
/// nine more characters live in the extension table behind the 0x1B escape.
const GSM_BASIC: [char; 128] = [
    '@', '£', '$', '¥', 'è', 'é', 'ù', 'ì', 'ò', 'Ç', '\n', 'Ø', 'ø', '\r', 'Å', 'å', //
    'Δ', '_', 'Φ', 'Γ', 'Λ', 'Ω', 'Π', 'Ψ', 'Σ', 'Θ', 'Ξ', '\u{1b}', 'Æ', 'æ', 'ß', 'É', //
    ' ', '!', '"', '#', '¤', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', //
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', ':', ';', '<', '=', '>', '?', //
    '¡', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', //
    'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'Ä', 'Ö', 'Ñ', 'Ü', '§', //
    '¿', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', //
    'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ñ', 'ü', 'à',
];

/// GSM 03.38 extension table: `(septet value, character)`, reached by
/// prefixing the value with the 0x1B escape septet.
const GSM_EXTENSION: [(u8, char); 9] = [
    (0x14, '^'),
    (0x28, '{'),
    (0x29, '}'),
    (0x2F, '\\'),
    (0x3C, '['),
    (0x3D, '~'),
    (0x3E, ']'),
    (0x40, '|'),
    (0x65, '€'),
];

const GSM_ESCAPE: u8 = 0x1B;

/// GSM 03.38 default alphabet, unpacked one septet per octet as SMPP
/// transmits it in short_message.
pub struct Gsm7BitCodec;

impl Gsm7BitCodec {
    fn encode_char(c: char) -> Option<Vec<u8>> {
        if let Some(idx) = GSM_BASIC.iter().position(|&g| g == c) {
            return Some(vec![idx as u8]);
        }
        GSM_EXTENSION
            .iter()
            .find(|&&(_, g)| g == c)
            .map(|&(idx, _)| vec![GSM_ESCAPE, idx])
    }
}

impl TextCodec for Gsm7BitCodec {
    fn name(&self) -> &'static str {
        "gsm0338"
    }

    fn encode(&self, input: &str, errors: ErrorPolicy) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(input.len());
        for (position, c) in input.chars().enumerate() {
            match Gsm7BitCodec::encode_char(c) {
                Some(septets) => out.extend_from_slice(&septets),
                None => match errors {
                    ErrorPolicy::Strict => {
                        return Err(CodecError::Unmappable {
                            encoding: self.name(),
                            character: c,
                            position,
                        });
                    }
                    ErrorPolicy::Ignore => {}
                    ErrorPolicy::Replace => out.push(b'?'),
                },
            }
        }
        Ok(out)
    }

    fn decode(&self, input: &[u8], errors: ErrorPolicy) -> Result<String, CodecError> {
        let mut out = String::with_capacity(input.len());
        let mut bytes = input.iter().copied().enumerate();
        while let Some((position, octet)) = bytes.next() {
            let decoded = if octet == GSM_ESCAPE {
                match bytes.next() {
                    Some((_, ext)) => GSM_EXTENSION
                        .iter()
                        .find(|&&(idx, _)| idx == ext)
                        .map(|&(_, c)| c),
                    None => {
                        // lone escape at end of input
                        match errors {
                            ErrorPolicy::Strict => {
                                return Err(CodecError::Truncated {
                                    encoding: self.name(),
                                    position,
                                });
                            }
                            ErrorPolicy::Ignore => continue,
                            ErrorPolicy::Replace => {
                                out.push('?');
                                continue;
                            }
                        }
                    }
                }
            } else {
                GSM_BASIC.get(octet as usize).copied()
            };

            match decoded {
                Some(c) => out.push(c),
                None => match errors {
                    ErrorPolicy::Strict => {
                        return Err(CodecError::Undecodable {
                            encoding: self.name(),
                            octet,
                            position,
                        });
                    }
                    ErrorPolicy::Ignore => {}
                    ErrorPolicy::Replace => out.push('?'),
                },
            }
        }
        Ok(out)
    }
}

/// UCS-2, treated as UTF-16 big-endian the way every deployed SMSC does.
pub struct Ucs2Codec;

impl TextCodec for Ucs2Codec {
    fn name(&self) -> &'static str {
        "ucs2"
    }

    fn encode(&self, input: &str, _errors: ErrorPolicy) -> Result<Vec<u8>, CodecError> {
        // every Rust string encodes losslessly to UTF-16
        let mut out = Vec::with_capacity(input.len() * 2);
        for unit in input.encode_utf16() {
            out.extend_from_slice(&unit.to_be_bytes());
        }
        Ok(out)
    }

    fn decode(&self, input: &[u8], errors: ErrorPolicy) -> Result<String, CodecError> {
        if input.len() % 2 != 0 {
            match errors {
                ErrorPolicy::Strict => {
                    return Err(CodecError::Truncated {
                        encoding: self.name(),
                        position: input.len() - 1,
                    });
                }
                // fall through with the trailing octet dropped; Replace adds
                // the marker below
                ErrorPolicy::Ignore | ErrorPolicy::Replace => {}
            }
        }
        let units: Vec<u16> = input
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();

        match errors {
            ErrorPolicy::Strict => String::from_utf16(&units).map_err(|_| {
                CodecError::Undecodable {
                    encoding: self.name(),
                    octet: 0,
                    position: 0,
                }
            }),
            ErrorPolicy::Replace => {
                let mut s = String::from_utf16_lossy(&units);
                if input.len() % 2 != 0 {
                    s.push('\u{FFFD}');
                }
                Ok(s)
            }
            ErrorPolicy::Ignore => Ok(char::decode_utf16(units.iter().copied())
                .filter_map(|r| r.ok())
                .collect()),
        }
    }
}

/// IA5/ASCII (data_coding 0x01).
pub struct AsciiCodec;

impl TextCodec for AsciiCodec {
    fn name(&self) -> &'static str {
        "ascii"
    }

    fn encode(&self, input: &str, errors: ErrorPolicy) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(input.len());
        for (position, c) in input.chars().enumerate() {
            if c.is_ascii() {
                out.push(c as u8);
            } else {
                match errors {
                    ErrorPolicy::Strict => {
                        return Err(CodecError::Unmappable {
                            encoding: self.name(),
                            character: c,
                            position,
                        });
                    }
                    ErrorPolicy::Ignore => {}
                    ErrorPolicy::Replace => out.push(b'?'),
                }
            }
        }
        Ok(out)
    }

    fn decode(&self, input: &[u8], errors: ErrorPolicy) -> Result<String, CodecError> {
        let mut out = String::with_capacity(input.len());
        for (position, &octet) in input.iter().enumerate() {
            if octet.is_ascii() {
                out.push(octet as char);
            } else {
                match errors {
                    ErrorPolicy::Strict => {
                        return Err(CodecError::Undecodable {
                            encoding: self.name(),
                            octet,
                            position,
                        });
                    }
                    ErrorPolicy::Ignore => {}
                    ErrorPolicy::Replace => out.push('\u{FFFD}'),
                }
            }
        }
        Ok(out)
    }
}

/// ISO-8859-1 (data_coding 0x03). Octets are Unicode scalar values below
/// 0x100, so decoding never fails.
pub struct Latin1Codec;

impl TextCodec for Latin1Codec {
    fn name(&self) -> &'static str {
        "latin_1"
    }

    fn encode(&self, input: &str, errors: ErrorPolicy) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(input.len());
        for (position, c) in input.chars().enumerate() {
            match u8::try_from(c as u32) {
                Ok(octet) => out.push(octet),
                Err(_) => match errors {
                    ErrorPolicy::Strict => {
                        return Err(CodecError::Unmappable {
                            encoding: self.name(),
                            character: c,
                            position,
                        });
                    }
                    ErrorPolicy::Ignore => {}
                    ErrorPolicy::Replace => out.push(b'?'),
                },
            }
        }
        Ok(out)
    }

    fn decode(&self, input: &[u8], _errors: ErrorPolicy) -> Result<String, CodecError> {
        Ok(input.iter().map(|&b| b as char).collect())
    }
}

/// Adapter for the alphabets `encoding_rs` implements: Shift-JIS/JIS,
/// ISO-8859-5, ISO-8859-8, ISO-2022-JP and EUC-KR.
pub struct EncodingRsCodec {
    name: &'static str,
    encoding: &'static encoding_rs::Encoding,
}

impl EncodingRsCodec {
    pub fn new(name: &'static str, encoding: &'static encoding_rs::Encoding) -> EncodingRsCodec {
        EncodingRsCodec { name, encoding }
    }
}

impl TextCodec for EncodingRsCodec {
    fn name(&self) -> &'static str {
        self.name
    }

    fn encode(&self, input: &str, errors: ErrorPolicy) -> Result<Vec<u8>, CodecError> {
        let (bytes, _, had_errors) = self.encoding.encode(input);
        if !had_errors {
            return Ok(bytes.into_owned());
        }
        // encoding_rs substitutes numeric character references on error,
        // which is not what SMPP wants; redo the conversion per character so
        // the policy decides.
        let mut out = Vec::with_capacity(input.len());
        let mut one = [0u8; 4];
        for (position, c) in input.chars().enumerate() {
            let s = c.encode_utf8(&mut one);
            let (bytes, _, bad) = self.encoding.encode(s);
            if bad {
                match errors {
                    ErrorPolicy::Strict => {
                        return Err(CodecError::Unmappable {
                            encoding: self.name,
                            character: c,
                            position,
                        });
                    }
                    ErrorPolicy::Ignore => {}
                    ErrorPolicy::Replace => out.push(b'?'),
                }
            } else {
                out.extend_from_slice(&bytes);
            }
        }
        Ok(out)
    }

    fn decode(&self, input: &[u8], errors: ErrorPolicy) -> Result<String, CodecError> {
        let (text, had_errors) = self.encoding.decode_without_bom_handling(input);
        if had_errors {
            match errors {
                ErrorPolicy::Strict => {
                    return Err(CodecError::Undecodable {
                        encoding: self.name,
                        octet: 0,
                        position: 0,
                    });
                }
                ErrorPolicy::Ignore => {
                    return Ok(text.chars().filter(|&c| c != '\u{FFFD}').collect());
                }
                ErrorPolicy::Replace => {}
            }
        }
        Ok(text.into_owned())
    }
}

/// The codec set the client resolves encoding names against, with the
/// SMPP v3.4 section 5.2.19 data_coding value for each name.
///
/// `register` is the extension hook: an application can override any
/// alphabet (or add its own) by name, and the client will use it for every
/// message that names that encoding.
pub struct CodecRegistry {
    codecs: HashMap<String, (u8, Arc<dyn TextCodec>)>,
}

impl CodecRegistry {
    /// A registry holding the built-in alphabets.
    pub fn new() -> CodecRegistry {
        let mut registry = CodecRegistry {
            codecs: HashMap::new(),
        };
        registry.register("gsm0338", 0x00, Arc::new(Gsm7BitCodec));
        registry.register("ascii", 0x01, Arc::new(AsciiCodec));
        registry.register("latin_1", 0x03, Arc::new(Latin1Codec));
        registry.register(
            "iso2022_jp",
            0x05,
            Arc::new(EncodingRsCodec::new("iso2022_jp", encoding_rs::ISO_2022_JP)),
        );
        registry.register(
            "iso8859_5",
            0x06,
            Arc::new(EncodingRsCodec::new("iso8859_5", encoding_rs::ISO_8859_5)),
        );
        registry.register(
            "iso8859_8",
            0x07,
            Arc::new(EncodingRsCodec::new("iso8859_8", encoding_rs::ISO_8859_8)),
        );
        registry.register("ucs2", 0x08, Arc::new(Ucs2Codec));
        registry.register("utf_16_be", 0x08, Arc::new(Ucs2Codec));
        registry.register(
            "shift_jis",
            0x09,
            Arc::new(EncodingRsCodec::new("shift_jis", encoding_rs::SHIFT_JIS)),
        );
        registry.register(
            "euc_kr",
            0x0E,
            Arc::new(EncodingRsCodec::new("euc_kr", encoding_rs::EUC_KR)),
        );
        registry
    }

    /// Install `codec` for `encoding`, replacing any existing registration.
    /// `data_coding` is the section 5.2.19 octet declared in PDUs that carry text
    /// in this alphabet.
    pub fn register(&mut self, encoding: &str, data_coding: u8, codec: Arc<dyn TextCodec>) {
        self.codecs
            .insert(encoding.to_string(), (data_coding, codec));
    }

    /// The data_coding octet for an encoding name.
    pub fn data_coding(&self, encoding: &str) -> Result<u8, CodecError> {
        self.codecs
            .get(encoding)
            .map(|(dc, _)| *dc)
            .ok_or_else(|| CodecError::UnknownEncoding(encoding.to_string()))
    }

    pub fn encode(
        &self,
        encoding: &str,
        input: &str,
        errors: ErrorPolicy,
    ) -> Result<Vec<u8>, CodecError> {
        self.lookup(encoding)?.encode(input, errors)
    }

    pub fn decode(
        &self,
        encoding: &str,
        input: &[u8],
        errors: ErrorPolicy,
    ) -> Result<String, CodecError> {
        self.lookup(encoding)?.decode(input, errors)
    }

    fn lookup(&self, encoding: &str) -> Result<&dyn TextCodec, CodecError> {
        self.codecs
            .get(encoding)
            .map(|(_, codec)| codec.as_ref())
            .ok_or_else(|| CodecError::UnknownEncoding(encoding.to_string()))
    }
}

impl Default for CodecRegistry {
    fn default() -> CodecRegistry {
        CodecRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gsm_encodes_plain_ascii_identically() {
        let codec = Gsm7BitCodec;
        let bytes = codec.encode("Hello", ErrorPolicy::Strict).unwrap();
        assert_eq!(bytes, vec![0x48, 0x65, 0x6C, 0x6C, 0x6F]);
    }

    #[test]
    fn gsm_euro_uses_the_escape_extension() {
        let codec = Gsm7BitCodec;
        let bytes = codec.encode("foo €", ErrorPolicy::Strict).unwrap();
        assert_eq!(bytes, vec![0x66, 0x6F, 0x6F, 0x20, 0x1B, 0x65]);
    }

    #[test]
    fn gsm_national_characters() {
        let codec = Gsm7BitCodec;
        assert_eq!(codec.encode("@", ErrorPolicy::Strict).unwrap(), vec![0x00]);
        assert_eq!(codec.encode("£", ErrorPolicy::Strict).unwrap(), vec![0x01]);
        assert_eq!(codec.encode("à", ErrorPolicy::Strict).unwrap(), vec![0x7F]);
        assert_eq!(
            codec.encode("{}", ErrorPolicy::Strict).unwrap(),
            vec![0x1B, 0x28, 0x1B, 0x29]
        );
    }

    #[test]
    fn gsm_error_policies() {
        let codec = Gsm7BitCodec;
        assert!(matches!(
            codec.encode("Zoë", ErrorPolicy::Strict),
            Err(CodecError::Unmappable { character: 'ë', position: 2, .. })
        ));
        assert_eq!(codec.encode("Zoë", ErrorPolicy::Replace).unwrap(), b"Zo?");
        assert_eq!(codec.encode("Zoë", ErrorPolicy::Ignore).unwrap(), b"Zo");
    }

    #[test]
    fn gsm_decode_roundtrip() {
        let codec = Gsm7BitCodec;
        let text = "heya {emphasis} [€5] @once";
        let bytes = codec.encode(text, ErrorPolicy::Strict).unwrap();
        assert_eq!(codec.decode(&bytes, ErrorPolicy::Strict).unwrap(), text);
    }

    #[test]
    fn gsm_decode_rejects_out_of_table_octets() {
        let codec = Gsm7BitCodec;
        assert!(codec.decode(&[0x48, 0x85], ErrorPolicy::Strict).is_err());
        assert_eq!(codec.decode(&[0x48, 0x85], ErrorPolicy::Replace).unwrap(), "H?");
        assert_eq!(codec.decode(&[0x48, 0x85], ErrorPolicy::Ignore).unwrap(), "H");
        // lone escape
        assert!(codec.decode(&[0x1B], ErrorPolicy::Strict).is_err());
    }

    #[test]
    fn ucs2_is_utf16_big_endian() {
        let codec = Ucs2Codec;
        let bytes = codec.encode("Zoë", ErrorPolicy::Strict).unwrap();
        assert_eq!(bytes, vec![0x00, 0x5A, 0x00, 0x6F, 0x00, 0xEB]);
        assert_eq!(codec.decode(&bytes, ErrorPolicy::Strict).unwrap(), "Zoë");
    }

    #[test]
    fn ucs2_handles_astral_pairs() {
        let codec = Ucs2Codec;
        let bytes = codec.encode("🚀", ErrorPolicy::Strict).unwrap();
        assert_eq!(bytes, vec![0xD8, 0x3D, 0xDE, 0x80]);
        assert_eq!(codec.decode(&bytes, ErrorPolicy::Strict).unwrap(), "🚀");
    }

    #[test]
    fn ucs2_odd_length_input() {
        let codec = Ucs2Codec;
        assert!(codec.decode(&[0x00, 0x5A, 0x00], ErrorPolicy::Strict).is_err());
        assert_eq!(
            codec.decode(&[0x00, 0x5A, 0x00], ErrorPolicy::Replace).unwrap(),
            "Z\u{FFFD}"
        );
        assert_eq!(codec.decode(&[0x00, 0x5A, 0x00], ErrorPolicy::Ignore).unwrap(), "Z");
    }

    #[test]
    fn ascii_rejects_non_ascii_in_strict() {
        let codec = AsciiCodec;
        assert!(codec.encode("né", ErrorPolicy::Strict).is_err());
        assert_eq!(codec.encode("né", ErrorPolicy::Replace).unwrap(), b"n?");
        assert!(codec.decode(&[0x6E, 0xE9], ErrorPolicy::Strict).is_err());
    }

    #[test]
    fn latin1_covers_the_first_unicode_block() {
        let codec = Latin1Codec;
        assert_eq!(codec.encode("Zoë", ErrorPolicy::Strict).unwrap(), vec![0x5A, 0x6F, 0xEB]);
        assert_eq!(codec.decode(&[0x5A, 0x6F, 0xEB], ErrorPolicy::Strict).unwrap(), "Zoë");
        assert!(codec.encode("€", ErrorPolicy::Strict).is_err()); // not in 8859-1
    }

    #[test]
    fn cyrillic_via_iso8859_5() {
        let registry = CodecRegistry::new();
        let bytes = registry
            .encode("iso8859_5", "Привет", ErrorPolicy::Strict)
            .unwrap();
        assert_eq!(bytes.len(), 6);
        assert_eq!(
            registry.decode("iso8859_5", &bytes, ErrorPolicy::Strict).unwrap(),
            "Привет"
        );
    }

    #[test]
    fn registry_maps_data_coding_per_smpp_table() {
        let registry = CodecRegistry::new();
        assert_eq!(registry.data_coding("gsm0338").unwrap(), 0x00);
        assert_eq!(registry.data_coding("ascii").unwrap(), 0x01);
        assert_eq!(registry.data_coding("latin_1").unwrap(), 0x03);
        assert_eq!(registry.data_coding("iso8859_5").unwrap(), 0x06);
        assert_eq!(registry.data_coding("ucs2").unwrap(), 0x08);
        assert_eq!(registry.data_coding("utf_16_be").unwrap(), 0x08);
        assert_eq!(registry.data_coding("shift_jis").unwrap(), 0x09);
        assert!(registry.data_coding("utf_8").is_err());
    }

    #[test]
    fn registry_accepts_custom_codec_overrides() {
        struct Upside;
        impl TextCodec for Upside {
            fn name(&self) -> &'static str {
                "upside"
            }
            fn encode(&self, input: &str, _: ErrorPolicy) -> Result<Vec<u8>, CodecError> {
                Ok(input.bytes().rev().collect())
            }
            fn decode(&self, input: &[u8], _: ErrorPolicy) -> Result<String, CodecError> {
                Ok(input.iter().rev().map(|&b| b as char).collect())
            }
        }

        let mut registry = CodecRegistry::new();
        registry.register("gsm0338", 0x00, Arc::new(Upside));
        assert_eq!(
            registry.encode("gsm0338", "abc", ErrorPolicy::Strict).unwrap(),
            b"cba"
        );
    }

    #[test]
    fn unknown_encoding_is_reported() {
        let registry = CodecRegistry::new();
        assert!(matches!(
            registry.encode("utf_32", "hi", ErrorPolicy::Strict),
            Err(CodecError::UnknownEncoding(_))
        ));
    }
}
