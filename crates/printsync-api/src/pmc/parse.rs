// ── Line-record accumulator ──
//
// The PMC prints verbose listings as JSON-like text that cannot be fed to
// a JSON parser reliably. Every listing is read the same way: classify
// each trimmed line, accumulate fields into the current record, emit it on
// a `},` terminator line, and emit the dangling last record (whose closing
// brace has no comma) after the loop. Record types only describe which
// lines they care about.

use crate::error::Error;

/// Prefix of every PMC error line.
pub const ERROR_MARKER: &str = "[ERROR]";

/// Prefix of every PMC success line.
pub const OK_MARKER: &str = "[OK]";

const TERMINATOR: &str = "},";

/// A record built up from consecutive listing lines.
pub(crate) trait LineRecord: Default {
    /// Apply one trimmed line that is not a terminator.
    fn accept(&mut self, line: &str);

    /// Whether the record is inside a nested block. Nested lines bypass
    /// terminator and error detection and go to [`accept_nested`](Self::accept_nested).
    fn in_nested_block(&self) -> bool {
        false
    }

    fn accept_nested(&mut self, _line: &str) {}

    /// Whether any field was captured.
    fn is_touched(&self) -> bool;

    /// Whether a finished record belongs in the result.
    fn is_emitted(&self) -> bool {
        true
    }
}

/// Run the accumulator over `lines`, returning every emitted record.
///
/// Any line starting with `[ERROR]` aborts the listing.
pub(crate) fn parse_records<R: LineRecord>(lines: &[String]) -> Result<Vec<R>, Error> {
    let mut records = Vec::new();
    let mut current = R::default();

    for raw in lines {
        if current.in_nested_block() {
            current.accept_nested(raw.trim());
            continue;
        }

        if raw.starts_with(ERROR_MARKER) {
            return Err(Error::Pmc { line: raw.clone() });
        }

        let line = raw.trim();
        if line == TERMINATOR {
            flush(&mut records, std::mem::take(&mut current));
        } else {
            current.accept(line);
        }
    }

    flush(&mut records, current);
    Ok(records)
}

fn flush<R: LineRecord>(records: &mut Vec<R>, record: R) {
    if record.is_touched() && record.is_emitted() {
        records.push(record);
    }
}

// ── Field extraction ─────────────────────────────────────────────────

/// Slice a field value out of a `"key": value` line: skip `skip` bytes
/// after the colon and drop `drop` trailing bytes. Out-of-range slices
/// yield an empty string.
fn field_value(line: &str, skip: usize, drop: usize) -> String {
    let Some(colon) = line.find(':') else {
        return String::new();
    };
    let start = colon + skip;
    let end = line.len().saturating_sub(drop);
    line.get(start..end).unwrap_or_default().to_owned()
}

/// Value of a quoted, comma-terminated field: `"key": "value",`
pub(crate) fn quoted_value(line: &str) -> String {
    field_value(line, 3, 2)
}

/// Value of a quoted field that ends its object: `"key": "value"`
pub(crate) fn last_quoted_value(line: &str) -> String {
    field_value(line, 3, 1)
}

/// Value of a bare, comma-terminated field: `"key": 12,`
pub(crate) fn bare_value(line: &str) -> String {
    field_value(line, 2, 1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Named {
        name: String,
    }

    impl LineRecord for Named {
        fn accept(&mut self, line: &str) {
            if line.contains("name") {
                self.name = quoted_value(line);
            }
        }

        fn is_touched(&self) -> bool {
            !self.name.is_empty()
        }
    }

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(String::from).collect()
    }

    #[test]
    fn quoted_value_slices_between_quotes() {
        assert_eq!(quoted_value(r#""modelName": "HP 4250","#), "HP 4250");
    }

    #[test]
    fn bare_value_slices_numbers() {
        assert_eq!(bare_value(r#""regionId": 12,"#), "12");
    }

    #[test]
    fn last_quoted_value_handles_missing_comma() {
        assert_eq!(
            last_quoted_value(r#""ConfigurationFileId": "aa-bb""#),
            "aa-bb"
        );
    }

    #[test]
    fn short_lines_yield_empty_values() {
        assert_eq!(quoted_value(r#""a":"#), "");
        assert_eq!(quoted_value("no colon here"), "");
    }

    #[test]
    fn terminator_flushes_and_last_record_is_kept() {
        let out = lines(
            r#"[
    {
        "name": "first",
    },
    {
        "name": "second",
    }
]"#,
        );
        let records: Vec<Named> = parse_records(&out).unwrap();
        assert_eq!(
            records,
            vec![
                Named {
                    name: "first".into()
                },
                Named {
                    name: "second".into()
                }
            ]
        );
    }

    #[test]
    fn empty_output_yields_no_records() {
        let records: Vec<Named> = parse_records(&[]).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn error_line_aborts_listing() {
        let out = lines("[\n    {\n        \"name\": \"x\",\n    },\n[ERROR] Access denied.");
        let err = parse_records::<Named>(&out).unwrap_err();
        assert!(matches!(err, Error::Pmc { ref line } if line == "[ERROR] Access denied."));
    }

    #[test]
    fn indented_error_line_is_not_an_error_marker() {
        let out = lines("  [ERROR] nested text");
        let records: Vec<Named> = parse_records(&out).unwrap();
        assert!(records.is_empty());
    }
}
