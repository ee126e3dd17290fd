//! Access gates for mutating and administrative endpoints.
//!
//! Both gates are side-effect-free and run before any read or write that
//! could leak existence information beyond "unauthorized".

use axum::http::HeaderMap;

use crate::auth::basic::{constant_time_eq, parse_basic_auth};
use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};

/// Per-identity gate: identities on the protected list must present a
/// matching Basic credential pair before any mutation.
///
/// A protected identity with no server-side credential pair is a
/// misconfiguration, reported as an internal error rather than bypassed.
pub fn check_identity_gate(auth: &AuthConfig, headers: &HeaderMap, id: &str) -> AppResult<()> {
    if !auth.is_protected(id) {
        return Ok(());
    }

    let presented = parse_basic_auth(headers)
        .ok_or_else(|| AppError::Unauthorized("Credentials required for this identity".into()))?;

    let expected = auth.identity_credentials(id).ok_or_else(|| {
        AppError::InternalConfig(format!("No credentials configured for protected identity {}", id))
    })?;

    if !constant_time_eq(&presented.0, &expected.user)
        || !constant_time_eq(&presented.1, &expected.pass)
    {
        return Err(AppError::Unauthorized(
            "Invalid credentials for this identity".into(),
        ));
    }

    Ok(())
}

/// Administrative gate: a single credential pair guards every admin
/// operation. All-or-nothing; there is no partial admin access.
pub fn check_admin_gate(auth: &AuthConfig, headers: &HeaderMap) -> AppResult<()> {
    let expected = auth
        .admin_credentials()
        .ok_or_else(|| AppError::InternalConfig("Admin credentials not configured".into()))?;

    let presented = parse_basic_auth(headers)
        .ok_or_else(|| AppError::Unauthorized("Admin credentials required".into()))?;

    if !constant_time_eq(&presented.0, &expected.user)
        || !constant_time_eq(&presented.1, &expected.pass)
    {
        return Err(AppError::Unauthorized("Invalid admin credentials".into()));
    }

    Ok(())
}
