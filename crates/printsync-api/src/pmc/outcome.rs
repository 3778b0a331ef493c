// Classification of single-line PMC command results.

use std::fmt;

use super::parse::{ERROR_MARKER, OK_MARKER};

/// Exact line printed when the PMC session has no valid login.
pub const NOT_LOGGED_IN: &str = "[ERROR] Please log in before executing any scripts.";

/// Exact line printed after a successful `login`.
pub const LOGIN_SUCCESSFUL: &str = "[OK] Login successful.";

/// Result of a mutating PMC command, derived from the first stdout line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PmcOutcome {
    /// `[OK] ...`, carrying the full line.
    Ok(String),
    /// The session must log in first.
    NotLoggedIn,
    /// `[ERROR] ...`, carrying the message after the marker.
    Error(String),
    /// Anything else, including no output at all.
    Unrecognized(String),
}

impl PmcOutcome {
    pub fn classify(line: &str) -> Self {
        if line.starts_with(OK_MARKER) {
            Self::Ok(line.to_owned())
        } else if line == NOT_LOGGED_IN {
            Self::NotLoggedIn
        } else if line.starts_with(ERROR_MARKER) {
            let message = line
                .find(']')
                .map_or(line, |end| &line[end + 1..])
                .trim()
                .to_owned();
            Self::Error(message)
        } else {
            Self::Unrecognized(line.to_owned())
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Whether this is the exact confirmation printed by `login`.
    pub fn is_login_successful(&self) -> bool {
        matches!(self, Self::Ok(line) if line == LOGIN_SUCCESSFUL)
    }

    /// Id of a newly created printer: everything from the first `"` with
    /// surrounding quotes removed. `None` for non-OK outcomes or when the
    /// line holds no quoted id.
    pub fn created_id(&self) -> Option<String> {
        let Self::Ok(line) = self else {
            return None;
        };
        let start = line.find('"')?;
        let id = line[start..].trim_matches('"');
        (!id.is_empty()).then(|| id.to_owned())
    }
}

impl fmt::Display for PmcOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok(line) | Self::Unrecognized(line) => f.write_str(line),
            Self::NotLoggedIn => f.write_str(NOT_LOGGED_IN),
            Self::Error(message) => write!(f, "{ERROR_MARKER} {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_prefix_is_success() {
        let outcome = PmcOutcome::classify("[OK] Printer modified.");
        assert!(outcome.is_ok());
    }

    #[test]
    fn exact_login_prompt_is_not_logged_in() {
        assert_eq!(PmcOutcome::classify(NOT_LOGGED_IN), PmcOutcome::NotLoggedIn);
    }

    #[test]
    fn other_errors_keep_trimmed_message() {
        assert_eq!(
            PmcOutcome::classify("[ERROR]  Unauthorized"),
            PmcOutcome::Error("Unauthorized".into())
        );
    }

    #[test]
    fn empty_output_is_unrecognized() {
        assert_eq!(
            PmcOutcome::classify(""),
            PmcOutcome::Unrecognized(String::new())
        );
    }

    #[test]
    fn created_id_is_read_from_first_quote() {
        let outcome =
            PmcOutcome::classify(r#"[OK] Printer created with id "aabbccdd-eeee-ffff-1111""#);
        assert_eq!(outcome.created_id().as_deref(), Some("aabbccdd-eeee-ffff-1111"));
    }

    #[test]
    fn created_id_missing_without_quotes() {
        assert_eq!(PmcOutcome::classify("[OK] done").created_id(), None);
        assert_eq!(PmcOutcome::classify("[ERROR] nope").created_id(), None);
    }
}
