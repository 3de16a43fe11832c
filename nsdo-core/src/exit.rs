//! Process exit statuses

use std::fmt;

/// Exit status taxonomy. Each failure class has its own value, none is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExitStatus {
    /// Version or help printed
    Ok = 0,
    /// Missing or malformed arguments
    BadInvocation = 1,
    /// Already inside a registry-tracked namespace, or the check itself failed
    AlreadyConfined = 2,
    /// Effective identity could not be lowered
    CouldNotDeescalate = 3,
    /// Network namespace name rejected, missing, or not joinable
    BadNetworkNamespace = 4,
    /// Target command could not be executed
    FailedExec = 5,
    /// Current directory could not be captured
    CouldNotGetcwd = 6,
    /// Current directory could not be restored
    CouldNotChdir = 7,
    /// Mount namespace present but not joinable
    BadMountNamespace = 8,
}

impl ExitStatus {
    /// Numeric process exit code
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "ok",
            Self::BadInvocation => "bad invocation",
            Self::AlreadyConfined => "already confined",
            Self::CouldNotDeescalate => "could not deescalate",
            Self::BadNetworkNamespace => "bad network namespace",
            Self::FailedExec => "failed exec",
            Self::CouldNotGetcwd => "could not getcwd",
            Self::CouldNotChdir => "could not chdir",
            Self::BadMountNamespace => "bad mount namespace",
        };
        write!(f, "{name} ({})", self.code())
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        Self::from(status.code())
    }
}
