use axum::http::HeaderMap;

use crate::api::validators::label;
use crate::auth::gate;
use crate::db::models::{OwnerRecord, SubdomainRecord};
use crate::error::{AppError, AppResult};

use super::{Provisioner, QUOTA_PER_OWNER};

pub struct SubdomainCreated {
    pub fqdn: String,
    /// Subdomains held by the owner after this creation.
    pub used: i64,
    pub remaining: i64,
}

impl Provisioner {
    /// Create a subdomain for a verified identity.
    ///
    /// All local checks run before the provider call so quota or uniqueness
    /// failures never create remote resources that must be torn down again.
    /// Residual risk, deliberately not patched here: if the local insert
    /// fails after the provider call succeeded, the remote record is
    /// orphaned and no compensating deletion is attempted.
    pub async fn create_subdomain(
        &self,
        headers: &HeaderMap,
        code: &str,
        raw_label: &str,
    ) -> AppResult<SubdomainCreated> {
        let identity = self.resolve_identity(code)?;

        gate::check_identity_gate(&self.auth, headers, &identity.id)?;

        let label = label::sanitize(raw_label).ok_or_else(|| {
            AppError::InvalidInput(
                "Invalid subdomain label. Use a-z, 0-9, dash; minimum 3 characters.".into(),
            )
        })?;

        let used = SubdomainRecord::count_by_owner(&self.db, &identity.id).await?;
        if used >= QUOTA_PER_OWNER {
            return Err(AppError::QuotaExceeded(format!(
                "Subdomain quota exhausted (max {}).",
                QUOTA_PER_OWNER
            )));
        }

        let fqdn = format!("{}.{}", label, self.domain.root);
        if SubdomainRecord::fqdn_exists(&self.db, &fqdn).await? {
            return Err(AppError::Conflict("Subdomain already taken.".into()));
        }

        let record = self
            .provider
            .create_cname(&label, &self.domain.root, &self.domain.target)
            .await?;

        // Provider may normalize the CNAME content; prefer what it returns.
        let target = record.content.as_deref().unwrap_or(&self.domain.target);
        SubdomainRecord::insert(&self.db, &identity.id, &label, &fqdn, &record.id, target).await?;
        OwnerRecord::ensure(&self.db, &identity.id, &identity.display_name).await?;

        tracing::info!(owner = %identity.id, %fqdn, "Subdomain provisioned");

        Ok(SubdomainCreated {
            fqdn,
            used: used + 1,
            remaining: QUOTA_PER_OWNER - (used + 1),
        })
    }
}
