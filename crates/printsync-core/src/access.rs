// ── Access control ──
//
// Mutations require membership in the configured access group. Group
// membership is read from the operating system through the same
// `ProcessRunner` the PMC client uses.

use std::path::Path;

use printsync_api::ProcessRunner;
use serde::Serialize;
use tracing::{debug, warn};

/// What the current user may do in this session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccessLevel {
    #[default]
    Full,
    ReadOnly,
}

impl AccessLevel {
    pub fn is_read_only(self) -> bool {
        self == Self::ReadOnly
    }
}

/// Common name of a group given as a distinguished name
/// (`CN=Printer Admins,OU=Groups,DC=corp`) or as a plain name.
pub fn group_common_name(group: &str) -> &str {
    let group = group.trim();
    let first = group.split(',').next().unwrap_or(group).trim();
    match first.split_once('=') {
        Some((key, value)) if key.trim().eq_ignore_ascii_case("cn") => value.trim(),
        _ => group,
    }
}

/// Strip a `DOMAIN\` prefix or `@domain` suffix.
fn bare_group_name(name: &str) -> &str {
    let name = name.rsplit('\\').next().unwrap_or(name);
    name.split('@').next().unwrap_or(name)
}

/// Group names from `id -Gn` (space separated) or from
/// `whoami /groups /fo csv /nh` (first CSV column, quoted).
pub fn parse_group_names(output: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix('"') {
            if let Some((first, _)) = rest.split_once('"') {
                names.push(bare_group_name(first).to_owned());
            }
        } else {
            names.extend(line.split_whitespace().map(|n| bare_group_name(n).to_owned()));
        }
    }
    names
}

fn group_query() -> (&'static str, Vec<String>) {
    if cfg!(windows) {
        (
            "whoami",
            vec!["/groups".into(), "/fo".into(), "csv".into(), "/nh".into()],
        )
    } else {
        ("id", vec!["-Gn".into()])
    }
}

/// Decide the access level for `group`. An empty group grants full
/// access; a failed membership query falls back to read-only.
pub async fn resolve_access(group: &str, runner: &dyn ProcessRunner) -> AccessLevel {
    let wanted = group_common_name(group);
    if wanted.is_empty() {
        return AccessLevel::Full;
    }

    let (program, args) = group_query();
    let output = match runner.run(Path::new(program), &args).await {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "could not query group membership, access is read-only");
            return AccessLevel::ReadOnly;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let member = parse_group_names(&stdout)
        .iter()
        .any(|name| name.eq_ignore_ascii_case(wanted));
    debug!(group = wanted, member, "resolved access group membership");

    if member {
        AccessLevel::Full
    } else {
        AccessLevel::ReadOnly
    }
}

#[cfg(test)]
mod tests {
    use futures_util::future::BoxFuture;
    use printsync_api::ProcessOutput;
    use pretty_assertions::assert_eq;

    use super::*;

    struct FixedRunner(Option<&'static str>);

    impl ProcessRunner for FixedRunner {
        fn run<'a>(
            &'a self,
            program: &'a Path,
            _args: &'a [String],
        ) -> BoxFuture<'a, Result<ProcessOutput, printsync_api::Error>> {
            let result = match self.0 {
                Some(stdout) => Ok(ProcessOutput::from_stdout(stdout)),
                None => Err(printsync_api::Error::Spawn {
                    program: program.display().to_string(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            };
            Box::pin(async move { result })
        }
    }

    #[test]
    fn common_name_from_distinguished_name() {
        assert_eq!(
            group_common_name("CN=Printer Admins,OU=Groups,DC=corp,DC=local"),
            "Printer Admins"
        );
        assert_eq!(group_common_name("printadmins"), "printadmins");
        assert_eq!(group_common_name("  "), "");
    }

    #[test]
    fn group_names_from_both_formats() {
        assert_eq!(
            parse_group_names("staff printadmins CORP\\helpdesk\n"),
            vec!["staff", "printadmins", "helpdesk"]
        );
        assert_eq!(
            parse_group_names(
                "\"Everyone\",\"Well-known group\",\"S-1-1-0\",\"Mandatory group\"\r\n\
                 \"CORP\\Printer Admins\",\"Group\",\"S-1-5-21\",\"Enabled group\"\r\n"
            ),
            vec!["Everyone", "Printer Admins"]
        );
    }

    #[tokio::test]
    async fn empty_group_grants_full_access() {
        let runner = FixedRunner(None);
        assert_eq!(resolve_access("", &runner).await, AccessLevel::Full);
    }

    #[tokio::test]
    async fn membership_is_case_insensitive() {
        let runner = FixedRunner(Some("users PrintAdmins\n"));
        assert_eq!(
            resolve_access("CN=printadmins,DC=corp", &runner).await,
            AccessLevel::Full
        );
        assert_eq!(
            resolve_access("CN=other,DC=corp", &runner).await,
            AccessLevel::ReadOnly
        );
    }

    #[tokio::test]
    async fn failed_query_is_read_only() {
        let runner = FixedRunner(None);
        assert!(
            resolve_access("printadmins", &runner)
                .await
                .is_read_only()
        );
    }
}
