use chrono::Utc;
use serde::Serialize;
use sqlx::FromRow;

use crate::db::DbPool;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OwnerRecord {
    pub owner_id: String,
    pub display_name: String,
    pub created_at: String,
}

/// One row of the admin summary view: an owner joined with its
/// subdomain/email counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OwnerSummary {
    pub owner_id: String,
    pub display_name: String,
    pub created_at: String,
    pub subdomains: i64,
    pub emails: i64,
}

/// Sort orders accepted by the admin summary listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummarySort {
    SubdomainsDesc,
    EmailsDesc,
    IdDesc,
    #[default]
    IdAsc,
}

impl SummarySort {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "subs_desc" => Self::SubdomainsDesc,
            "emails_desc" => Self::EmailsDesc,
            "id_desc" => Self::IdDesc,
            _ => Self::IdAsc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubdomainsDesc => "subs_desc",
            Self::EmailsDesc => "emails_desc",
            Self::IdDesc => "id_desc",
            Self::IdAsc => "id_asc",
        }
    }

    fn order_clause(&self) -> &'static str {
        // Count sorts break ties on owner id for a stable page order.
        match self {
            Self::SubdomainsDesc => "subdomains DESC, owner_id ASC",
            Self::EmailsDesc => "emails DESC, owner_id ASC",
            Self::IdDesc => "owner_id DESC",
            Self::IdAsc => "owner_id ASC",
        }
    }
}

impl OwnerRecord {
    pub async fn find(pool: &DbPool, owner_id: &str) -> sqlx::Result<Option<Self>> {
        sqlx::query_as("SELECT owner_id, display_name, created_at FROM owners WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert-if-absent bootstrap: first write wins, later calls are no-ops.
    /// Atomicity comes from the primary key, not application locking.
    pub async fn ensure(pool: &DbPool, owner_id: &str, display_name: &str) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO owners (owner_id, display_name, created_at) VALUES (?, ?, ?)
             ON CONFLICT(owner_id) DO NOTHING",
        )
        .bind(owner_id)
        .bind(display_name)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Paginated summary of owners joined with per-owner counts.
    /// `search` filters on a substring of owner id or display name.
    /// Returns the page rows plus the total owner count for the same filter.
    pub async fn summary_page(
        pool: &DbPool,
        search: Option<&str>,
        sort: SummarySort,
        page: i64,
        limit: i64,
    ) -> sqlx::Result<(Vec<OwnerSummary>, i64)> {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);

        let where_clause = if search.is_some() {
            "WHERE o.owner_id LIKE ? OR o.display_name LIKE ?"
        } else {
            ""
        };

        let data_sql = format!(
            "SELECT o.owner_id, o.display_name, o.created_at,
                    (SELECT COUNT(*) FROM subdomains s WHERE s.owner_id = o.owner_id) AS subdomains,
                    (SELECT COUNT(*) FROM email_routes e WHERE e.owner_id = o.owner_id) AS emails
             FROM owners o {where_clause}
             ORDER BY {order}
             LIMIT ? OFFSET ?",
            where_clause = where_clause,
            order = sort.order_clause(),
        );
        let count_sql = format!("SELECT COUNT(*) FROM owners o {where_clause}");

        let pattern = search.map(|s| format!("%{}%", s));

        let rows = {
            let mut q = sqlx::query_as::<_, OwnerSummary>(&data_sql);
            if let Some(ref p) = pattern {
                q = q.bind(p).bind(p);
            }
            q.bind(limit).bind((page - 1) * limit).fetch_all(pool).await?
        };

        let total: i64 = {
            let mut q = sqlx::query_scalar::<_, i64>(&count_sql);
            if let Some(ref p) = pattern {
                q = q.bind(p).bind(p);
            }
            q.fetch_one(pool).await?
        };

        Ok((rows, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::db::models::{EmailRouteRecord, SubdomainRecord};

    async fn seed(pool: &DbPool) {
        // Three owners with differing usage.
        OwnerRecord::ensure(pool, "190001", "Alice Example").await.unwrap();
        OwnerRecord::ensure(pool, "190002", "Bob Example").await.unwrap();
        OwnerRecord::ensure(pool, "190003", "Carol Sample").await.unwrap();
        for (owner, label) in [("190001", "aaa"), ("190001", "bbb"), ("190002", "ccc")] {
            SubdomainRecord::insert(
                pool,
                owner,
                label,
                &format!("{}.campus.example", label),
                "rec",
                "t",
            )
            .await
            .unwrap();
        }
        EmailRouteRecord::insert(
            pool,
            "190002",
            "bob@ccc.campus.example",
            "ccc",
            "bob@example.com",
            "rule",
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_ensure_is_first_write_wins() {
        let pool = db::init_in_memory().await.expect("pool");
        OwnerRecord::ensure(&pool, "190001", "Original Name").await.unwrap();
        OwnerRecord::ensure(&pool, "190001", "Replacement Name").await.unwrap();
        let owner = OwnerRecord::find(&pool, "190001").await.unwrap().expect("exists");
        assert_eq!(owner.display_name, "Original Name");
    }

    #[tokio::test]
    async fn test_summary_counts_and_default_sort() {
        let pool = db::init_in_memory().await.expect("pool");
        seed(&pool).await;
        let (rows, total) =
            OwnerRecord::summary_page(&pool, None, SummarySort::IdAsc, 1, 20).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].owner_id, "190001");
        assert_eq!(rows[0].subdomains, 2);
        assert_eq!(rows[0].emails, 0);
        assert_eq!(rows[1].subdomains, 1);
        assert_eq!(rows[1].emails, 1);
        assert_eq!(rows[2].subdomains, 0);
    }

    #[tokio::test]
    async fn test_summary_sort_by_counts() {
        let pool = db::init_in_memory().await.expect("pool");
        seed(&pool).await;
        let (rows, _) =
            OwnerRecord::summary_page(&pool, None, SummarySort::SubdomainsDesc, 1, 20)
                .await
                .unwrap();
        assert_eq!(rows[0].owner_id, "190001");
        let (rows, _) = OwnerRecord::summary_page(&pool, None, SummarySort::EmailsDesc, 1, 20)
            .await
            .unwrap();
        assert_eq!(rows[0].owner_id, "190002");
    }

    #[tokio::test]
    async fn test_summary_search_matches_id_and_name() {
        let pool = db::init_in_memory().await.expect("pool");
        seed(&pool).await;
        let (rows, total) =
            OwnerRecord::summary_page(&pool, Some("Sample"), SummarySort::IdAsc, 1, 20)
                .await
                .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].owner_id, "190003");

        let (rows, total) =
            OwnerRecord::summary_page(&pool, Some("19000"), SummarySort::IdAsc, 1, 20)
                .await
                .unwrap();
        assert_eq!(total, 3);
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_summary_pagination_and_limit_clamp() {
        let pool = db::init_in_memory().await.expect("pool");
        seed(&pool).await;
        let (rows, total) =
            OwnerRecord::summary_page(&pool, None, SummarySort::IdAsc, 2, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].owner_id, "190003");

        // Limit above the cap behaves as 100; zero/negative clamps to 1.
        let (rows, _) =
            OwnerRecord::summary_page(&pool, None, SummarySort::IdAsc, 1, 10_000).await.unwrap();
        assert_eq!(rows.len(), 3);
        let (rows, _) =
            OwnerRecord::summary_page(&pool, None, SummarySort::IdAsc, 1, 0).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_sort_parsing_defaults_to_id_asc() {
        assert_eq!(SummarySort::parse("subs_desc"), SummarySort::SubdomainsDesc);
        assert_eq!(SummarySort::parse("emails_desc"), SummarySort::EmailsDesc);
        assert_eq!(SummarySort::parse("id_desc"), SummarySort::IdDesc);
        assert_eq!(SummarySort::parse("id_asc"), SummarySort::IdAsc);
        assert_eq!(SummarySort::parse("bogus"), SummarySort::IdAsc);
        assert_eq!(SummarySort::parse(""), SummarySort::IdAsc);
    }
}
