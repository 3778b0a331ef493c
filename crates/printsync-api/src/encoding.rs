// ── Console output decoding ──
//
// The PMC writes listings in the legacy OEM code page 850 so that
// extended Latin characters (å, ä, ö, é, ...) in driver and printer
// names survive. Other commands are read as UTF-8.

use oem_cp::code_table::DECODING_TABLE_CP850;
use oem_cp::decode_string_complete_table;

/// Character encoding of a process's stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    /// OEM code page 850 (Multilingual Latin 1).
    Oem850,
    /// UTF-8, invalid sequences replaced.
    Utf8,
}

impl OutputEncoding {
    /// Decode raw stdout bytes into a string.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Oem850 => decode_string_complete_table(bytes, &DECODING_TABLE_CP850),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

/// Split decoded output into lines, dropping `\r` from CRLF endings.
pub(crate) fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cp850_decodes_swedish_letters() {
        // å ä ö in code page 850
        let bytes = [0x86, 0x84, 0x94];
        assert_eq!(OutputEncoding::Oem850.decode(&bytes), "åäö");
    }

    #[test]
    fn cp850_leaves_ascii_untouched() {
        let bytes = b"\"modelName\": \"HP LaserJet\",";
        assert_eq!(
            OutputEncoding::Oem850.decode(bytes),
            "\"modelName\": \"HP LaserJet\","
        );
    }

    #[test]
    fn cp850_differs_from_utf8_for_high_bytes() {
        let bytes = [0x8E]; // Ä
        assert_eq!(OutputEncoding::Oem850.decode(&bytes), "Ä");
        assert_eq!(OutputEncoding::Utf8.decode(&bytes), "\u{FFFD}");
    }

    #[test]
    fn split_lines_handles_crlf() {
        let lines = split_lines("[\r\n  {\r\n  },\r\n]");
        assert_eq!(lines, vec!["[", "  {", "  },", "]"]);
    }
}
