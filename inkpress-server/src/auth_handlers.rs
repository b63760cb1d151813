//! Authentication endpoints

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
};
use chrono::Utc;
use serde::Deserialize;

use crate::errors::AppResult;
use crate::middleware::{CurrentUser, auth_context, bearer_token};
use crate::state::AppState;
use inkpress_core::{
    AuthResponse, SignUpRequest, SocialProfile, authorize_content_access,
};
use inkpress_model::{UserRole, UserSummary};

#[derive(Debug, Deserialize)]
pub struct SignInBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SocialSignInBody {
    pub provider: String,
    pub account_id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// POST /api/auth/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SignUpRequest>,
) -> AppResult<Json<AuthResponse>> {
    let ctx = auth_context(&headers);
    let response = state.sessions.sign_up(body, &ctx).await?;
    Ok(Json(response))
}

/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SignInBody>,
) -> AppResult<Json<AuthResponse>> {
    let ctx = auth_context(&headers);
    let response = state
        .sessions
        .sign_in(&body.email, &body.password, &ctx)
        .await?;
    Ok(Json(response))
}

/// POST /api/auth/sign-in/social
pub async fn sign_in_social(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SocialSignInBody>,
) -> AppResult<Json<AuthResponse>> {
    let ctx = auth_context(&headers);
    let profile = SocialProfile {
        email: body.email,
        name: body.name,
        image: body.image,
        email_verified: body.email_verified,
    };
    let response = state
        .sessions
        .sign_in_social(&body.provider, &body.account_id, profile, &ctx)
        .await?;
    Ok(Json(response))
}

/// POST /api/auth/sign-out
///
/// Succeeds for any bearer token, valid or not; repeated sign-out is a
/// no-op.
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.sign_out(token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/session
pub async fn session(CurrentUser(user): CurrentUser) -> Json<UserSummary> {
    Json(user.summary())
}

#[derive(Debug, Deserialize)]
pub struct AccessQuery {
    pub role: UserRole,
}

/// GET /api/auth/access?role=writer
///
/// Privilege probe for UI gating: 204 when the caller's role covers the
/// requested gate, 403 otherwise (including while banned).
pub async fn check_access(
    CurrentUser(user): CurrentUser,
    Query(query): Query<AccessQuery>,
) -> AppResult<StatusCode> {
    authorize_content_access(&user, query.role, Utc::now())?;
    Ok(StatusCode::NO_CONTENT)
}
