use encoding_rs::{Encoding, UTF_8};
use std::{borrow::Cow, fmt};

/// text encoding used to decode log files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset(&'static Encoding);

impl Charset {
    pub fn utf8() -> Self {
        Self(UTF_8)
    }

    /// look up a charset by its WHATWG label ("utf-8", "utf-16le", "latin1", ...)
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(Self)
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// decode without replacement; `None` when the bytes are malformed
    pub(crate) fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        // skip a BOM only when it agrees with the requested charset
        let body = match Encoding::for_bom(bytes) {
            Some((encoding, bom_len)) if encoding == self.0 => &bytes[bom_len..],
            _ => bytes,
        };
        self.0
            .decode_without_bom_handling_and_without_replacement(body)
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::utf8()
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_label_is_case_insensitive() {
        assert_eq!(Charset::for_label("UTF-8"), Some(Charset::utf8()));
        assert!(Charset::for_label("not-a-charset").is_none());
    }

    #[test]
    fn test_decode_rejects_malformed_utf8() {
        assert!(Charset::utf8().decode(&[0x66, 0xff, 0x6f]).is_none());
    }

    #[test]
    fn test_decode_skips_matching_bom() {
        let decoded = Charset::utf8().decode(b"\xEF\xBB\xBFhello").unwrap();
        assert_eq!(decoded, "hello");
    }

    #[test]
    fn test_decode_utf16le() {
        let charset = Charset::for_label("utf-16le").unwrap();
        let bytes = [0x68, 0x00, 0x69, 0x00];
        assert_eq!(charset.decode(&bytes).unwrap(), "hi");
    }
}
