//! Permission decision API
//!
//! Every endpoint answers for the session carried in the bearer token. Denials
//! are answers (`allowed: false`), not errors.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::app::AppState;
use crate::authz::{Role, TablesFile, UnifiedPermissions};
use crate::errors::{AppError, AppResult};
use crate::jwt::AuthSession;
use crate::models::permission::*;

// =============================================================================
// ROUTER
// =============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(session_permissions))
        .route("/check", post(check_permission))
        .route("/check-batch", post(check_batch))
        .route("/route", post(check_route))
        .route("/field", post(check_field))
        .route("/manage/:role", get(check_manage_role))
        .route("/tables", get(dump_tables))
}

/// Permissions summary for the current session
#[utoipa::path(
    get,
    path = "/api/permissions/me",
    tag = "Permissions",
    responses(
        (status = 200, description = "Session permissions", body = SessionPermissions),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn session_permissions(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> AppResult<Json<SessionPermissions>> {
    let perms = UnifiedPermissions::new(&state.tables, &session);

    Ok(Json(SessionPermissions {
        user_id: perms.user_id().to_string(),
        role: perms.role(),
        role_name: perms.role_name().to_string(),
        navigation: perms.accessible_navigation(),
        assignable_roles: perms.assignable_roles(),
    }))
}

/// Check a single permission string
#[utoipa::path(
    post,
    path = "/api/permissions/check",
    tag = "Permissions",
    request_body = CheckRequest,
    responses(
        (status = 200, description = "Decision", body = CheckResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn check_permission(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Json(req): Json<CheckRequest>,
) -> AppResult<Json<CheckResponse>> {
    let perms = UnifiedPermissions::new(&state.tables, &session);
    let allowed = perms.can(&req.permission, req.context.as_ref());

    tracing::debug!(
        user_id = %session.user_id,
        role = %session.role,
        permission = %req.permission,
        allowed,
        "permission check"
    );

    Ok(Json(CheckResponse {
        permission: req.permission,
        allowed,
    }))
}

/// Check several permissions at once
#[utoipa::path(
    post,
    path = "/api/permissions/check-batch",
    tag = "Permissions",
    request_body = BatchCheckRequest,
    responses(
        (status = 200, description = "Combined decision", body = BatchCheckResponse),
        (status = 400, description = "No permissions supplied"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn check_batch(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Json(req): Json<BatchCheckRequest>,
) -> AppResult<Json<BatchCheckResponse>> {
    if req.permissions.is_empty() {
        return Err(AppError::bad_request("permissions must not be empty"));
    }

    let perms = UnifiedPermissions::new(&state.tables, &session);
    let ctx = req.context.as_ref();

    let allowed = match req.mode {
        BatchMode::All => perms.can_all(req.permissions.as_slice(), ctx),
        BatchMode::Any => perms.can_any(req.permissions.as_slice(), ctx),
    };

    let results = req
        .permissions
        .into_iter()
        .map(|permission| {
            let allowed = perms.can(&permission, ctx);
            CheckResponse { permission, allowed }
        })
        .collect();

    Ok(Json(BatchCheckResponse {
        mode: req.mode,
        allowed,
        results,
    }))
}

/// Check access to an application route
#[utoipa::path(
    post,
    path = "/api/permissions/route",
    tag = "Permissions",
    request_body = RouteCheckRequest,
    responses(
        (status = 200, description = "Decision", body = RouteCheckResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn check_route(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Json(req): Json<RouteCheckRequest>,
) -> AppResult<Json<RouteCheckResponse>> {
    let perms = UnifiedPermissions::new(&state.tables, &session);
    let allowed = perms.can_access(&req.route);

    Ok(Json(RouteCheckResponse {
        route: req.route,
        allowed,
    }))
}

/// Check whether a form field may be edited
#[utoipa::path(
    post,
    path = "/api/permissions/field",
    tag = "Permissions",
    request_body = FieldCheckRequest,
    responses(
        (status = 200, description = "Decision", body = FieldCheckResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn check_field(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Json(req): Json<FieldCheckRequest>,
) -> AppResult<Json<FieldCheckResponse>> {
    let perms = UnifiedPermissions::new(&state.tables, &session);
    let allowed = perms.can_edit_field(&req.resource, &req.field, req.owner.as_deref());

    Ok(Json(FieldCheckResponse {
        resource: req.resource,
        field: req.field,
        allowed,
    }))
}

/// Check whether the session may manage users holding a role
#[utoipa::path(
    get,
    path = "/api/permissions/manage/{role}",
    tag = "Permissions",
    params(
        ("role" = String, Path, description = "Target role name"),
    ),
    responses(
        (status = 200, description = "Decision", body = ManageRoleResponse),
        (status = 404, description = "Unknown role"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn check_manage_role(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(role): Path<String>,
) -> AppResult<Json<ManageRoleResponse>> {
    let target: Role = role.parse().map_err(|err| AppError::not_found(format!("{err}")))?;
    let perms = UnifiedPermissions::new(&state.tables, &session);

    Ok(Json(ManageRoleResponse {
        target,
        allowed: perms.can_manage_role(target),
    }))
}

/// Dump the active permission tables (admins only)
#[utoipa::path(
    get,
    path = "/api/permissions/tables",
    tag = "Permissions",
    responses(
        (status = 200, description = "Active tables in declaration order"),
        (status = 403, description = "Not an administrator"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn dump_tables(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> AppResult<Json<TablesFile>> {
    let perms = UnifiedPermissions::new(&state.tables, &session);
    if !perms.is_admin() {
        tracing::warn!(user_id = %session.user_id, role = %session.role, "table dump refused");
        return Err(AppError::forbidden("administrator role required"));
    }

    Ok(Json(state.tables.to_file()))
}
