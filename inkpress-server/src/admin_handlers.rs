//! Administrative endpoints
//!
//! Everything here requires a valid session belonging to a non-banned
//! admin; the policy check sits in front of every data access.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::middleware::CurrentUser;
use crate::state::AppState;
use inkpress_core::{AdminAction, authorize_admin_action};
use inkpress_model::{BulkAction, BulkReport, User, UserRole};

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Case-insensitive substring match against email and name.
    pub q: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    50
}

/// One row of the admin roster.
#[derive(Debug, Serialize)]
pub struct RosterEntry {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub image: Option<String>,
    pub banned: bool,
    pub ban_reason: Option<String>,
    pub ban_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for RosterEntry {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            image: user.image,
            banned: user.banned,
            ban_reason: user.ban_reason,
            ban_expires: user.ban_expires,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<RosterEntry>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<ListUsersResponse>> {
    authorize_admin_action(&actor, AdminAction::ListUsers, None, Utc::now())?;

    let mut users = state.users.get_all_users().await?;
    if let Some(needle) = query.q.as_deref().map(str::to_lowercase) {
        users.retain(|user| {
            user.email.to_lowercase().contains(&needle)
                || user.name.to_lowercase().contains(&needle)
        });
    }
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = users.len();
    let per_page = query.per_page.clamp(1, 200);
    let page = query.page.max(1);
    // Saturating math: an absurd page number yields an empty page, not an
    // overflow.
    let offset = page.saturating_sub(1).saturating_mul(per_page);
    let entries = users
        .into_iter()
        .skip(offset)
        .take(per_page)
        .map(RosterEntry::from)
        .collect();

    Ok(Json(ListUsersResponse {
        users: entries,
        total,
        page,
        per_page,
    }))
}

#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    #[serde(flatten)]
    pub action: BulkAction,
    pub targets: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct BulkResponse {
    #[serde(flatten)]
    pub report: BulkReport,
    pub applied: usize,
    pub failed: usize,
}

/// POST /api/admin/users/bulk
///
/// Per-target outcomes land in the body; only an unauthorized actor turns
/// into an HTTP error.
pub async fn bulk(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<BulkRequest>,
) -> AppResult<Json<BulkResponse>> {
    let report = state.bulk.apply(&actor, &body.action, &body.targets).await?;
    let applied = report.applied();
    let failed = report.failed();
    Ok(Json(BulkResponse {
        report,
        applied,
        failed,
    }))
}
