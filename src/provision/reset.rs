//! Administrative reset: best-effort, non-transactional teardown of every
//! resource an identity holds.

use serde::Serialize;

use crate::db::models::{EmailRouteRecord, SubdomainRecord};
use crate::error::AppResult;
use crate::roster::Identity;

use super::Provisioner;

/// Outcome of one remote deletion attempt.
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    /// The fqdn or email address the attempt was for.
    pub key: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RecordOutcome {
    fn deleted(key: String) -> Self {
        Self {
            key,
            status: "deleted",
            error: None,
        }
    }

    fn failed(key: String, error: String) -> Self {
        Self {
            key,
            status: "failed",
            error: Some(error),
        }
    }
}

/// Per-record remote deletion report, emails and subdomains separately.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResetReport {
    pub emails: Vec<RecordOutcome>,
    pub subdomains: Vec<RecordOutcome>,
}

/// What a preview says would be deleted.
#[derive(Debug, Clone, Serialize)]
pub struct ResetPreview {
    pub subdomains: Vec<PreviewSubdomain>,
    pub emails: Vec<PreviewEmail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewSubdomain {
    pub fqdn: String,
    pub provider_record_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewEmail {
    pub email: String,
    pub provider_rule_id: String,
}

pub enum ResetOutcome {
    /// Nothing to delete for this identity.
    NoOp { identity: Identity },
    /// Dry run (the default): report what would be deleted, touch nothing.
    Preview {
        identity: Identity,
        preview: ResetPreview,
    },
    /// Confirmed execution.
    Executed {
        identity: Identity,
        report: ResetReport,
        emails_deleted: u64,
        subdomains_deleted: u64,
    },
}

impl Provisioner {
    /// Reset all resources held by one identity.
    ///
    /// Three phases: read, preview gate, then confirmed execution. Remote
    /// email rules go first (they reference the names being removed), then
    /// DNS records, each attempted independently so one failure never stops
    /// the rest. Local rows are bulk-deleted afterwards regardless of remote
    /// failures; the per-record report is the caller's only view of those.
    pub async fn reset_identity(
        &self,
        code: &str,
        dry_run: bool,
        confirm: bool,
    ) -> AppResult<ResetOutcome> {
        let identity = self.resolve_identity(code)?;

        let subs = SubdomainRecord::find_by_owner(&self.db, &identity.id).await?;
        let mails = EmailRouteRecord::find_by_owner(&self.db, &identity.id).await?;

        if subs.is_empty() && mails.is_empty() {
            return Ok(ResetOutcome::NoOp { identity });
        }

        // Destructive execution requires both flags; everything else is a
        // side-effect-free preview.
        if dry_run || !confirm {
            return Ok(ResetOutcome::Preview {
                identity,
                preview: ResetPreview {
                    subdomains: subs
                        .into_iter()
                        .map(|s| PreviewSubdomain {
                            fqdn: s.fqdn,
                            provider_record_id: s.provider_record_id,
                        })
                        .collect(),
                    emails: mails
                        .into_iter()
                        .map(|e| PreviewEmail {
                            email: e.email,
                            provider_rule_id: e.provider_rule_id,
                        })
                        .collect(),
                },
            });
        }

        let mut report = ResetReport::default();

        for mail in &mails {
            match self.provider.delete_email_rule(&mail.provider_rule_id).await {
                Ok(()) => report.emails.push(RecordOutcome::deleted(mail.email.clone())),
                Err(e) => report
                    .emails
                    .push(RecordOutcome::failed(mail.email.clone(), e.to_string())),
            }
        }

        for sub in &subs {
            match self.provider.delete_dns_record(&sub.provider_record_id).await {
                Ok(()) => report.subdomains.push(RecordOutcome::deleted(sub.fqdn.clone())),
                Err(e) => report
                    .subdomains
                    .push(RecordOutcome::failed(sub.fqdn.clone(), e.to_string())),
            }
        }

        // Local rows go regardless of remote outcomes: the report above is
        // the record of anything left orphaned at the provider.
        let emails_deleted = EmailRouteRecord::delete_by_owner(&self.db, &identity.id).await?;
        let subdomains_deleted = SubdomainRecord::delete_by_owner(&self.db, &identity.id).await?;

        let remote_failures = report
            .emails
            .iter()
            .chain(report.subdomains.iter())
            .filter(|o| o.status == "failed")
            .count();
        tracing::info!(
            owner = %identity.id,
            emails_deleted,
            subdomains_deleted,
            remote_failures,
            "Identity reset executed"
        );

        Ok(ResetOutcome::Executed {
            identity,
            report,
            emails_deleted,
            subdomains_deleted,
        })
    }
}
