use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::AppState;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct UsageParams {
    id: Option<String>,
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UsageParams>,
) -> AppResult<Json<Value>> {
    let id = params
        .id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidInput("id is required".into()))?;

    let detail = state.portal.list_usage(id).await?;

    Ok(Json(json!({
        "id": detail.identity.id,
        "name": detail.identity.display_name,
        "usage": {
            "subdomains": detail.subdomains.len(),
            "emails": detail.emails.len(),
            "subdomainsDetail": detail.subdomains,
            "emailsDetail": detail.emails,
        },
    })))
}
