//! Process credentials and their one-way de-escalation

use nix::unistd::{getresgid, getresuid, setresgid, setresuid, Gid, ResGid, ResUid, Uid};
use nsdo_core::{Error, Result};
use std::marker::PhantomData;
use tracing::{debug, info};

/// Credentials as inherited from the invoker, possibly elevated by the setuid bit
#[derive(Debug)]
pub struct Privileged;

/// Credentials lowered to the real identity, saved ids included
#[derive(Debug)]
pub struct Dropped;

/// Snapshot of the process user and group ids in state `S`
pub struct Credentials<S> {
    uid: ResUid,
    gid: ResGid,
    _state: PhantomData<S>,
}

impl<S> std::fmt::Debug for Credentials<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("uid", &(self.uid.real, self.uid.effective, self.uid.saved))
            .field("gid", &(self.gid.real, self.gid.effective, self.gid.saved))
            .finish()
    }
}

fn read_ids() -> Result<(ResUid, ResGid)> {
    let uid = getresuid().map_err(|source| Error::Deescalate {
        operation: "getresuid",
        source,
    })?;
    let gid = getresgid().map_err(|source| Error::Deescalate {
        operation: "getresgid",
        source,
    })?;
    Ok((uid, gid))
}

impl<S> Credentials<S> {
    /// Real user id
    #[must_use]
    pub const fn real_uid(&self) -> Uid {
        self.uid.real
    }

    /// Real group id
    #[must_use]
    pub const fn real_gid(&self) -> Gid {
        self.gid.real
    }

    /// Effective user id
    #[must_use]
    pub const fn effective_uid(&self) -> Uid {
        self.uid.effective
    }

    /// Effective group id
    #[must_use]
    pub const fn effective_gid(&self) -> Gid {
        self.gid.effective
    }
}

impl Credentials<Privileged> {
    /// Capture the current credentials of the process
    ///
    /// # Errors
    /// Returns error if the ids cannot be read
    pub fn capture() -> Result<Self> {
        let (uid, gid) = read_ids()?;

        debug!(
            ruid = %uid.real,
            euid = %uid.effective,
            rgid = %gid.real,
            egid = %gid.effective,
            "Captured credentials"
        );

        Ok(Self {
            uid,
            gid,
            _state: PhantomData,
        })
    }

    /// Whether any effective or saved id differs from the real one
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        self.uid.effective != self.uid.real
            || self.uid.saved != self.uid.real
            || self.gid.effective != self.gid.real
            || self.gid.saved != self.gid.real
    }

    /// Lower every group id, then every user id, to the real identity.
    ///
    /// Groups go first: once the user id is lowered the process may no
    /// longer change its group ids. The saved ids are overwritten as well,
    /// so the elevated identity cannot be regained.
    ///
    /// # Errors
    /// Returns error if either step fails or if any id is still elevated
    /// afterwards
    pub fn drop_privileges(self) -> Result<Credentials<Dropped>> {
        let uid = self.uid.real;
        let gid = self.gid.real;

        setresgid(gid, gid, gid).map_err(|source| Error::Deescalate {
            operation: "setresgid",
            source,
        })?;
        setresuid(uid, uid, uid).map_err(|source| Error::Deescalate {
            operation: "setresuid",
            source,
        })?;

        let (now_uid, now_gid) = read_ids()?;
        verify(
            "setresgid",
            gid.as_raw(),
            (now_gid.real.as_raw(), now_gid.effective.as_raw(), now_gid.saved.as_raw()),
        )?;
        verify(
            "setresuid",
            uid.as_raw(),
            (now_uid.real.as_raw(), now_uid.effective.as_raw(), now_uid.saved.as_raw()),
        )?;

        info!(uid = %uid, gid = %gid, "Credentials lowered to real identity");

        Ok(Credentials {
            uid: now_uid,
            gid: now_gid,
            _state: PhantomData,
        })
    }
}

fn verify(operation: &'static str, expected: u32, found: (u32, u32, u32)) -> Result<()> {
    if found == (expected, expected, expected) {
        Ok(())
    } else {
        Err(Error::CredentialsRetained {
            operation,
            expected,
            found,
        })
    }
}
