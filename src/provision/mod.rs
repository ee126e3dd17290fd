//! Provisioning workflow: the multi-step operations that keep the remote
//! provider and the local database consistent-enough despite either side
//! failing independently.
//!
//! Each operation is synchronous per request; all shared state lives in the
//! database. Quota and uniqueness checks are check-then-act with a known
//! race window, acceptable for human-driven usage (the UNIQUE constraints
//! turn the uniqueness race into a database error rather than silent
//! duplication).

use crate::config::{AuthConfig, DomainConfig};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::provider::ProviderClient;
use crate::roster::{Identity, Roster};

pub mod email;
pub mod reset;
pub mod subdomain;
pub mod usage;

pub use reset::{ResetOutcome, ResetReport};
pub use usage::{IdentityCheck, UsageCounts};

/// Per-identity quota for subdomains and for email routes.
pub const QUOTA_PER_OWNER: i64 = 3;

/// All collaborators a workflow step needs, bundled once at startup.
#[derive(Clone)]
pub struct Provisioner {
    pub db: DbPool,
    pub provider: ProviderClient,
    pub roster: Roster,
    pub auth: AuthConfig,
    pub domain: DomainConfig,
}

impl Provisioner {
    pub fn new(
        db: DbPool,
        provider: ProviderClient,
        roster: Roster,
        auth: AuthConfig,
        domain: DomainConfig,
    ) -> Self {
        Self {
            db,
            provider,
            roster,
            auth,
            domain,
        }
    }

    /// Resolve an identity code or fail with `NotFound`.
    pub(crate) fn resolve_identity(&self, code: &str) -> AppResult<Identity> {
        self.roster
            .resolve(code)
            .ok_or_else(|| AppError::NotFound("Unknown identity".into()))
    }
}
