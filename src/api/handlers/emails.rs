use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::AppState;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CreateEmailRequest {
    id: Option<String>,
    local: Option<String>,
    label: Option<String>,
    destination: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateEmailRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let (Some(id), Some(local), Some(label), Some(destination)) =
        (body.id, body.local, body.label, body.destination)
    else {
        return Err(AppError::InvalidInput(
            "id, local, label, destination are required".into(),
        ));
    };

    let created = state
        .portal
        .create_email(&headers, &id, &local, &label, &destination)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "ok": true,
            "email": created.email,
            "usage": { "emails": created.used, "remaining": created.remaining },
        })),
    ))
}
