//! Join execution and error reporting

use nsdo_core::{Error, ExitStatus};
use nsdo_namespace::NamespaceExecutor;
use std::io::{self, Write};
use tracing::debug;

use crate::PROGRAM;
use crate::cli::Cli;

/// Join the requested namespace and exec the command.
///
/// Only returns when something failed; the status tells which stage.
pub fn execute(cli: &Cli) -> ExitStatus {
    let Some(namespace) = cli.namespace() else {
        return report(
            &mut io::stderr().lock(),
            &Error::Usage {
                message: format!("usage: {}", crate::cli::USAGE),
            },
        );
    };

    debug!(namespace = %namespace.to_string_lossy(), command = ?cli.target(), "Joining namespace");

    let executor = NamespaceExecutor::with_defaults();
    match executor.execute(namespace, cli.target()) {
        Ok(never) => match never {},
        Err(e) => report(&mut io::stderr().lock(), &e),
    }
}

/// Write `nsdo: <cause>` and any operator hint to `out`
fn report(out: &mut impl Write, err: &Error) -> ExitStatus {
    // nothing left to do if stderr itself is gone
    let _ = writeln!(out, "{PROGRAM}: {err}");
    if let Some(hint) = err.hint() {
        let _ = writeln!(out, "\n{hint}");
    }

    let status = err.exit_status();
    debug!(%status, "Exiting");
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsdo_core::{NamespaceKind, SETUID_HINT};

    fn render(err: &Error) -> (String, ExitStatus) {
        let mut out = Vec::new();
        let status = report(&mut out, err);
        (String::from_utf8(out).unwrap(), status)
    }

    #[test]
    fn test_report_permission_failure_with_hint() {
        let (text, status) = render(&Error::NamespaceSwitch {
            kind: NamespaceKind::Network,
            source: nix::Error::EPERM,
        });

        assert_eq!(
            text,
            format!("nsdo: setns(CLONE_NEWNET): {}\n\n{SETUID_HINT}\n", nix::Error::EPERM)
        );
        assert_eq!(status, ExitStatus::BadNetworkNamespace);
    }

    #[test]
    fn test_report_without_hint() {
        let (text, status) = render(&Error::NamespaceSwitch {
            kind: NamespaceKind::Mount,
            source: nix::Error::EINVAL,
        });

        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("nsdo: setns(CLONE_NEWNS): "));
        assert!(!text.contains(SETUID_HINT));
        assert_eq!(status, ExitStatus::BadMountNamespace);
    }
}
