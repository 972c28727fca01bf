use axum::Json;

use crate::authz::Role;
use crate::errors::AppResult;
use crate::models::permission::RoleInfo;

/// Role hierarchy, lowest rank first
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "Roles",
    responses((status = 200, description = "Role hierarchy", body = [RoleInfo]))
)]
pub async fn list_roles() -> AppResult<Json<Vec<RoleInfo>>> {
    Ok(Json(Role::ALL.into_iter().map(RoleInfo::from).collect()))
}
