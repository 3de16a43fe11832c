//! CLI argument definitions

use clap::{ArgAction, Parser};
use std::ffi::{OsStr, OsString};

/// Usage line shown on invocation errors
pub const USAGE: &str = "nsdo <namespace> <command> [args...]\n       nsdo { --version | -V }";

#[derive(Parser, Debug)]
#[command(name = "nsdo")]
#[command(about = "Run a command inside a named network namespace", long_about = None)]
#[command(override_usage = USAGE, disable_version_flag = true)]
pub struct Cli {
    /// Print version information and exit
    #[arg(short = 'V', long, action = ArgAction::SetTrue, exclusive = true)]
    pub version: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Namespace registered in /var/run/netns, then the command and its arguments
    ///
    /// Options are only recognised before the namespace; everything after
    /// it reaches the command untouched.
    #[arg(
        value_name = "ARGS",
        required_unless_present = "version",
        num_args = 2..,
        trailing_var_arg = true
    )]
    pub args: Vec<OsString>,
}

impl Cli {
    /// Namespace identifier, as given
    #[must_use]
    pub fn namespace(&self) -> Option<&OsStr> {
        self.args.first().map(OsString::as_os_str)
    }

    /// Command and its arguments, as given
    #[must_use]
    pub fn target(&self) -> &[OsString] {
        self.args.get(1..).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::os::unix::ffi::OsStringExt;

    fn os(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_command_arguments_pass_through() {
        let cli = Cli::try_parse_from(["nsdo", "staging", "ls", "-l", "--color", "-V"]).unwrap();

        assert_eq!(cli.namespace(), Some(OsStr::new("staging")));
        assert_eq!(cli.target(), os(&["ls", "-l", "--color", "-V"]).as_slice());
        assert!(!cli.version);
    }

    #[test]
    fn test_options_after_namespace_belong_to_command() {
        let cli = Cli::try_parse_from(["nsdo", "staging", "-v", "x"]).unwrap();
        assert!(!cli.verbose);
        assert_eq!(cli.target(), os(&["-v", "x"]).as_slice());

        let cli = Cli::try_parse_from(["nsdo", "staging", "--help"]).unwrap();
        assert_eq!(cli.target(), os(&["--help"]).as_slice());

        let cli = Cli::try_parse_from(["nsdo", "staging", "-V", "x"]).unwrap();
        assert!(!cli.version);
        assert_eq!(cli.target(), os(&["-V", "x"]).as_slice());

        let cli = Cli::try_parse_from(["nsdo", "staging", "--", "x"]).unwrap();
        assert_eq!(cli.target(), os(&["--", "x"]).as_slice());
    }

    #[test]
    fn test_verbose_before_namespace() {
        let cli = Cli::try_parse_from(["nsdo", "-v", "staging", "true"]).unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.namespace(), Some(OsStr::new("staging")));
        assert_eq!(cli.target(), os(&["true"]).as_slice());
    }

    #[test]
    fn test_non_utf8_namespace_accepted() {
        let raw = OsString::from_vec(b"ns\xff".to_vec());

        let cli = Cli::try_parse_from([OsString::from("nsdo"), raw.clone(), OsString::from("true")])
            .unwrap();

        assert_eq!(cli.namespace(), Some(raw.as_os_str()));
    }

    #[test]
    fn test_version_flags() {
        assert!(Cli::try_parse_from(["nsdo", "--version"]).unwrap().version);
        assert!(Cli::try_parse_from(["nsdo", "-V"]).unwrap().version);
        assert!(Cli::try_parse_from(["nsdo", "-V", "staging", "true"]).is_err());
    }

    #[test]
    fn test_missing_command_rejected() {
        assert!(Cli::try_parse_from(["nsdo", "staging"]).is_err());
        assert!(Cli::try_parse_from(["nsdo"]).is_err());
    }
}
