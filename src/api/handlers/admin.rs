use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::AppState;
use crate::auth::gate;
use crate::db::models::{OwnerRecord, SummarySort};
use crate::error::{AppError, AppResult};
use crate::provision::ResetOutcome;

#[derive(Debug, Deserialize)]
pub struct AdminListParams {
    id: Option<String>,
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    search: String,
    #[serde(default)]
    sort: String,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<AdminListParams>,
) -> AppResult<Json<Value>> {
    gate::check_admin_gate(&state.portal.auth, &headers)?;

    // Detail mode for a single owner.
    if let Some(id) = params.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let detail = state.portal.owner_detail(id).await?;
        return Ok(Json(json!({
            "mode": "detail",
            "id": detail.owner.owner_id,
            "name": detail.owner.display_name,
            "counts": {
                "subdomains": detail.subdomains.len(),
                "emails": detail.emails.len(),
            },
            "subdomains": detail.subdomains,
            "emails": detail.emails,
        })));
    }

    // Summary mode: all owners, paginated.
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let sort = SummarySort::parse(&params.sort);
    let search = Some(params.search.as_str()).filter(|s| !s.is_empty());

    let (rows, total) =
        OwnerRecord::summary_page(&state.portal.db, search, sort, page, limit).await?;

    let page_subdomains: i64 = rows.iter().map(|r| r.subdomains).sum();
    let page_emails: i64 = rows.iter().map(|r| r.emails).sum();

    Ok(Json(json!({
        "mode": "summary",
        "page": page,
        "limit": limit,
        "totalOwners": total,
        "pageOwners": rows.len(),
        "sort": sort.as_str(),
        "search": search,
        "pageTotals": { "subdomains": page_subdomains, "emails": page_emails },
        "data": rows,
    })))
}

#[derive(Debug, Deserialize)]
pub struct AdminResetRequest {
    id: Option<String>,
    #[serde(rename = "dryRun", default = "default_dry_run")]
    dry_run: bool,
    #[serde(default)]
    confirm: bool,
}

fn default_dry_run() -> bool {
    true
}

pub async fn reset(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<AdminResetRequest>,
) -> AppResult<Json<Value>> {
    gate::check_admin_gate(&state.portal.auth, &headers)?;

    let id = body
        .id
        .ok_or_else(|| AppError::InvalidInput("id is required".into()))?;

    match state.portal.reset_identity(&id, body.dry_run, body.confirm).await? {
        ResetOutcome::NoOp { identity } => Ok(Json(json!({
            "id": identity.id,
            "name": identity.display_name,
            "found": { "subdomains": 0, "emails": 0 },
            "dryRun": body.dry_run,
            "confirm": body.confirm,
            "message": "Nothing to reset for this identity.",
        }))),
        ResetOutcome::Preview { identity, preview } => Ok(Json(json!({
            "id": identity.id,
            "name": identity.display_name,
            "dryRun": true,
            "requiredConfirm": true,
            "toDelete": preview,
            "hint": "Send again with { \"dryRun\": false, \"confirm\": true } to execute.",
        }))),
        ResetOutcome::Executed {
            identity,
            report,
            emails_deleted,
            subdomains_deleted,
        } => Ok(Json(json!({
            "id": identity.id,
            "name": identity.display_name,
            "dryRun": false,
            "confirm": true,
            "provider": report,
            "database": {
                "emailsDeleted": emails_deleted,
                "subdomainsDeleted": subdomains_deleted,
            },
        }))),
    }
}
