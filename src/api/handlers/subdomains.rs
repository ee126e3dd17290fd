use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::AppState;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CreateSubdomainRequest {
    id: Option<String>,
    label: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateSubdomainRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let (Some(id), Some(label)) = (body.id, body.label) else {
        return Err(AppError::InvalidInput("id & label are required".into()));
    };

    let created = state.portal.create_subdomain(&headers, &id, &label).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "ok": true,
            "fqdn": created.fqdn,
            "usage": { "subdomains": created.used, "remaining": created.remaining },
        })),
    ))
}
