use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::provision::IdentityCheck;

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    id: Option<String>,
}

pub async fn validate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ValidateRequest>,
) -> AppResult<Json<Value>> {
    let id = body
        .id
        .ok_or_else(|| AppError::InvalidInput("id is required".into()))?;

    match state.portal.check_identity(&id).await? {
        IdentityCheck::Invalid => Ok(Json(json!({ "valid": false, "id": id }))),
        IdentityCheck::Valid { identity, usage } => Ok(Json(json!({
            "valid": true,
            "id": identity.id,
            "name": identity.display_name,
            "usage": usage,
        }))),
    }
}
