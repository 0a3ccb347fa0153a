//! Login flow handlers

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::{AppendHeaders, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::models::CallbackParams;
use crate::common::cookies::{
    build_cookie, clear_cookie, read_cookie, state_cookie_name, SESSION_COOKIE,
    STATE_COOKIE_MAX_AGE_SECS,
};
use crate::common::helpers::constant_time_eq;
use crate::common::id_generator::generate_state_token;
use crate::common::{safe_email_log, ApiError, AppState};
use crate::sessions::SESSION_DURATION_SECS;

/// GET /
pub async fn root_handler() -> &'static str {
    "Hello, world!"
}

/// GET /login/{provider} - Start the OAuth flow
///
/// Sets the provider-scoped state cookie and redirects to the provider's
/// authorization page with the same state value.
pub async fn login_start(
    Extension(state): Extension<Arc<AppState>>,
    Path(provider): Path<String>,
) -> Result<Response, ApiError> {
    ensure_provider(&state, &provider)?;

    let oauth_state = generate_state_token().map_err(|e| {
        error!(error = %e, "Failed to generate OAuth state");
        ApiError::InternalServer("failed to generate state".to_string())
    })?;

    let cookie = build_cookie(
        &state_cookie_name(&provider),
        &oauth_state,
        STATE_COOKIE_MAX_AGE_SECS,
        state.environment.secure_cookies(),
    );
    let auth_url = state.provider.authorization_url(&oauth_state);

    info!(provider = %provider, "Starting OAuth flow");

    Ok((
        StatusCode::FOUND,
        AppendHeaders([(LOCATION, auth_url), (SET_COOKIE, cookie.to_string())]),
    )
        .into_response())
}

/// GET /login/{provider}/callback - Complete the OAuth flow
///
/// Checks the state parameter against the state cookie before anything else,
/// then exchanges the code, fetches the profile, resolves the local user and
/// issues a session cookie.
pub async fn login_callback(
    Extension(state): Extension<Arc<AppState>>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    query: Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    ensure_provider(&state, &provider)?;

    // An unparseable query carries no usable state either
    let Query(params) = query.map_err(|e| {
        warn!(provider = %provider, error = %e, "OAuth callback rejected: malformed query");
        ApiError::BadRequest("Invalid state".to_string())
    })?;

    let cookie_state = read_cookie(&headers, &state_cookie_name(&provider));
    if !state_matches(params.state.as_deref(), cookie_state.as_deref()) {
        warn!(provider = %provider, "OAuth callback rejected: invalid state");
        return Err(ApiError::BadRequest("Invalid state".to_string()));
    }

    if let Some(oauth_error) = params.error.as_deref() {
        warn!(provider = %provider, oauth_error = %oauth_error, "Provider returned error");
        return Err(ApiError::BadRequest(format!(
            "Authorization failed: {}",
            oauth_error
        )));
    }

    let code = match params.code.as_deref() {
        Some(code) if !code.is_empty() => code,
        _ => {
            warn!(provider = %provider, "No authorization code in OAuth callback");
            return Err(ApiError::BadRequest(
                "No authorization code provided".to_string(),
            ));
        }
    };

    let token = state.provider.exchange_code(code).await?;
    debug!(provider = %provider, "Exchanged authorization code for access token");

    let profile = state.provider.fetch_profile(&token).await?;
    if profile.sub.is_empty() {
        error!(provider = %provider, "Provider profile has no subject id");
        return Err(ApiError::InternalServer(
            "provider profile missing subject".to_string(),
        ));
    }
    if !profile.email_verified {
        warn!(
            provider = %provider,
            email = %safe_email_log(&profile.email),
            "Provider reports an unverified email address"
        );
    }

    let user_id = state
        .users
        .resolve(&provider, &profile.sub, &profile.email)
        .await?;
    let session_id = state.sessions.create(&user_id).await?;

    info!(
        user_id = %user_id,
        email = %safe_email_log(&profile.email),
        provider = %provider,
        "User authentication successful"
    );

    let secure = state.environment.secure_cookies();
    let session_cookie = build_cookie(SESSION_COOKIE, &session_id, SESSION_DURATION_SECS, secure);
    let cleared_state = clear_cookie(&state_cookie_name(&provider), secure);

    Ok((
        StatusCode::FOUND,
        AppendHeaders([
            (LOCATION, "/".to_string()),
            (SET_COOKIE, session_cookie.to_string()),
            (SET_COOKIE, cleared_state.to_string()),
        ]),
    )
        .into_response())
}

fn ensure_provider(state: &AppState, provider: &str) -> Result<(), ApiError> {
    if provider == state.provider.name() {
        Ok(())
    } else {
        debug!(provider = %provider, "Unknown login provider");
        Err(ApiError::NotFound("unknown provider".to_string()))
    }
}

/// Both values must be present and byte-for-byte equal.
fn state_matches(query_state: Option<&str>, cookie_state: Option<&str>) -> bool {
    match (query_state, cookie_state) {
        (Some(query), Some(cookie)) if !cookie.is_empty() => {
            constant_time_eq(query.as_bytes(), cookie.as_bytes())
        }
        _ => false,
    }
}
