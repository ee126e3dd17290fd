use chrono::Utc;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::DbPool;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubdomainRecord {
    #[serde(skip_serializing)]
    pub id: String,
    pub owner_id: String,
    pub label: String,
    pub fqdn: String,
    pub provider_record_id: String,
    pub target: String,
    pub created_at: String,
}

impl SubdomainRecord {
    pub async fn count_by_owner(pool: &DbPool, owner_id: &str) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM subdomains WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_owner(pool: &DbPool, owner_id: &str) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(
            "SELECT id, owner_id, label, fqdn, provider_record_id, target, created_at
             FROM subdomains WHERE owner_id = ? ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    pub async fn fqdn_exists(pool: &DbPool, fqdn: &str) -> sqlx::Result<bool> {
        let found: Option<(String,)> = sqlx::query_as("SELECT id FROM subdomains WHERE fqdn = ?")
            .bind(fqdn)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }

    /// Whether this owner holds a subdomain with the given label.
    pub async fn owned_by(pool: &DbPool, owner_id: &str, label: &str) -> sqlx::Result<bool> {
        let found: Option<(String,)> =
            sqlx::query_as("SELECT id FROM subdomains WHERE owner_id = ? AND label = ?")
                .bind(owner_id)
                .bind(label)
                .fetch_optional(pool)
                .await?;
        Ok(found.is_some())
    }

    pub async fn insert(
        pool: &DbPool,
        owner_id: &str,
        label: &str,
        fqdn: &str,
        provider_record_id: &str,
        target: &str,
    ) -> sqlx::Result<Self> {
        let record = Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            label: label.to_string(),
            fqdn: fqdn.to_string(),
            provider_record_id: provider_record_id.to_string(),
            target: target.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        sqlx::query(
            "INSERT INTO subdomains (id, owner_id, label, fqdn, provider_record_id, target, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.owner_id)
        .bind(&record.label)
        .bind(&record.fqdn)
        .bind(&record.provider_record_id)
        .bind(&record.target)
        .bind(&record.created_at)
        .execute(pool)
        .await?;
        Ok(record)
    }

    pub async fn delete_by_owner(pool: &DbPool, owner_id: &str) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM subdomains WHERE owner_id = ?")
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
