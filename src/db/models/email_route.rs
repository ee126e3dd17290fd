use chrono::Utc;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::DbPool;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EmailRouteRecord {
    #[serde(skip_serializing)]
    pub id: String,
    pub owner_id: String,
    pub email: String,
    pub label: String,
    pub destination: String,
    pub provider_rule_id: String,
    pub created_at: String,
}

impl EmailRouteRecord {
    pub async fn count_by_owner(pool: &DbPool, owner_id: &str) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM email_routes WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_owner(pool: &DbPool, owner_id: &str) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as(
            "SELECT id, owner_id, email, label, destination, provider_rule_id, created_at
             FROM email_routes WHERE owner_id = ? ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    pub async fn email_exists(pool: &DbPool, email: &str) -> sqlx::Result<bool> {
        let found: Option<(String,)> = sqlx::query_as("SELECT id FROM email_routes WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn insert(
        pool: &DbPool,
        owner_id: &str,
        email: &str,
        label: &str,
        destination: &str,
        provider_rule_id: &str,
    ) -> sqlx::Result<Self> {
        let record = Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            email: email.to_string(),
            label: label.to_string(),
            destination: destination.to_string(),
            provider_rule_id: provider_rule_id.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        sqlx::query(
            "INSERT INTO email_routes (id, owner_id, email, label, destination, provider_rule_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.owner_id)
        .bind(&record.email)
        .bind(&record.label)
        .bind(&record.destination)
        .bind(&record.provider_rule_id)
        .bind(&record.created_at)
        .execute(pool)
        .await?;
        Ok(record)
    }

    pub async fn delete_by_owner(pool: &DbPool, owner_id: &str) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM email_routes WHERE owner_id = ?")
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn test_insert_and_count() {
        let pool = db::init_in_memory().await.expect("pool");
        EmailRouteRecord::insert(
            &pool,
            "190001",
            "me@lab.campus.example",
            "lab",
            "dest@example.com",
            "rule-1",
        )
        .await
        .expect("insert");
        assert_eq!(EmailRouteRecord::count_by_owner(&pool, "190001").await.unwrap(), 1);
        assert!(EmailRouteRecord::email_exists(&pool, "me@lab.campus.example").await.unwrap());
        assert!(!EmailRouteRecord::email_exists(&pool, "you@lab.campus.example").await.unwrap());
    }

    #[tokio::test]
    async fn test_email_unique_constraint() {
        let pool = db::init_in_memory().await.expect("pool");
        EmailRouteRecord::insert(
            &pool,
            "190001",
            "me@lab.campus.example",
            "lab",
            "a@example.com",
            "rule-1",
        )
        .await
        .expect("first insert");
        let dup = EmailRouteRecord::insert(
            &pool,
            "190002",
            "me@lab.campus.example",
            "lab",
            "b@example.com",
            "rule-2",
        )
        .await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let pool = db::init_in_memory().await.expect("pool");
        EmailRouteRecord::insert(
            &pool,
            "190001",
            "a@lab.campus.example",
            "lab",
            "a@example.com",
            "rule-1",
        )
        .await
        .unwrap();
        assert_eq!(EmailRouteRecord::delete_by_owner(&pool, "190001").await.unwrap(), 1);
        assert_eq!(EmailRouteRecord::count_by_owner(&pool, "190001").await.unwrap(), 0);
    }
}
