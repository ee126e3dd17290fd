use axum::http::HeaderMap;

use crate::api::validators::{email, label};
use crate::auth::gate;
use crate::db::models::{EmailRouteRecord, SubdomainRecord};
use crate::error::{AppError, AppResult};

use super::{Provisioner, QUOTA_PER_OWNER};

pub struct EmailRouteCreated {
    pub email: String,
    /// Email routes held by the owner after this creation.
    pub used: i64,
    pub remaining: i64,
}

impl Provisioner {
    /// Create an email-forwarding route under a subdomain the identity owns.
    ///
    /// Same shape as subdomain creation, with one extra precondition: the
    /// referenced label must name a subdomain owned by this identity, even
    /// when the label exists under a different owner.
    pub async fn create_email(
        &self,
        headers: &HeaderMap,
        code: &str,
        raw_local: &str,
        raw_label: &str,
        raw_destination: &str,
    ) -> AppResult<EmailRouteCreated> {
        let identity = self.resolve_identity(code)?;

        gate::check_identity_gate(&self.auth, headers, &identity.id)?;

        if !email::is_valid_local_part(raw_local) {
            return Err(AppError::InvalidInput("Invalid email local-part.".into()));
        }
        if !email::is_valid_destination(raw_destination) {
            return Err(AppError::InvalidInput("Invalid destination email.".into()));
        }
        let label = label::sanitize(raw_label)
            .ok_or_else(|| AppError::InvalidInput("Invalid subdomain label.".into()))?;

        if !SubdomainRecord::owned_by(&self.db, &identity.id, &label).await? {
            return Err(AppError::InvalidInput(
                "Subdomain is not owned by this identity.".into(),
            ));
        }

        let used = EmailRouteRecord::count_by_owner(&self.db, &identity.id).await?;
        if used >= QUOTA_PER_OWNER {
            return Err(AppError::QuotaExceeded(format!(
                "Email routing quota exhausted (max {}).",
                QUOTA_PER_OWNER
            )));
        }

        let address = format!("{}@{}.{}", raw_local, label, self.domain.root);
        if EmailRouteRecord::email_exists(&self.db, &address).await? {
            return Err(AppError::Conflict("Email address already in use.".into()));
        }

        let destination = raw_destination.trim().to_lowercase();
        let rule_name = format!("route-{}-{}-{}", identity.id, label, raw_local);
        let rule = self
            .provider
            .create_email_rule(&address, &destination, &rule_name)
            .await?;

        EmailRouteRecord::insert(&self.db, &identity.id, &address, &label, &destination, &rule.id)
            .await?;

        tracing::info!(owner = %identity.id, email = %address, "Email route provisioned");

        Ok(EmailRouteCreated {
            email: address,
            used: used + 1,
            remaining: QUOTA_PER_OWNER - (used + 1),
        })
    }
}
