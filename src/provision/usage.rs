use serde::Serialize;

use crate::db::models::{EmailRouteRecord, OwnerRecord, SubdomainRecord};
use crate::error::AppResult;
use crate::roster::Identity;

use super::Provisioner;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UsageCounts {
    pub subdomains: i64,
    pub emails: i64,
}

/// Result of a self-service identity check.
pub enum IdentityCheck {
    Invalid,
    Valid {
        identity: Identity,
        usage: UsageCounts,
    },
}

/// Full self-service listing for one identity.
pub struct UsageDetail {
    pub identity: Identity,
    pub subdomains: Vec<SubdomainRecord>,
    pub emails: Vec<EmailRouteRecord>,
}

/// Admin detail view for one owner.
pub struct OwnerDetail {
    pub owner: OwnerRecord,
    pub subdomains: Vec<SubdomainRecord>,
    pub emails: Vec<EmailRouteRecord>,
}

impl Provisioner {
    pub async fn usage_counts(&self, owner_id: &str) -> AppResult<UsageCounts> {
        Ok(UsageCounts {
            subdomains: SubdomainRecord::count_by_owner(&self.db, owner_id).await?,
            emails: EmailRouteRecord::count_by_owner(&self.db, owner_id).await?,
        })
    }

    /// Validate an identity code. An unknown code is a normal outcome here,
    /// not an error; usage is only read once the identity resolves.
    pub async fn check_identity(&self, code: &str) -> AppResult<IdentityCheck> {
        let Some(identity) = self.roster.resolve(code) else {
            return Ok(IdentityCheck::Invalid);
        };
        let usage = self.usage_counts(&identity.id).await?;
        Ok(IdentityCheck::Valid { identity, usage })
    }

    pub async fn list_usage(&self, code: &str) -> AppResult<UsageDetail> {
        let identity = self.resolve_identity(code)?;
        let subdomains = SubdomainRecord::find_by_owner(&self.db, &identity.id).await?;
        let emails = EmailRouteRecord::find_by_owner(&self.db, &identity.id).await?;
        Ok(UsageDetail {
            identity,
            subdomains,
            emails,
        })
    }

    /// Admin detail for one owner; 404s when the id never provisioned
    /// anything (owners are bootstrapped on first subdomain creation).
    pub async fn owner_detail(&self, owner_id: &str) -> AppResult<OwnerDetail> {
        let owner = OwnerRecord::find(&self.db, owner_id)
            .await?
            .ok_or_else(|| crate::error::AppError::NotFound("Identity not found in owners".into()))?;
        let subdomains = SubdomainRecord::find_by_owner(&self.db, owner_id).await?;
        let emails = EmailRouteRecord::find_by_owner(&self.db, owner_id).await?;
        Ok(OwnerDetail {
            owner,
            subdomains,
            emails,
        })
    }
}
