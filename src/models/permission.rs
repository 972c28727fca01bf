use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::authz::{PermissionContext, Role, TablesSummary};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleInfo {
    pub role: Role,
    #[schema(example = 4)]
    pub rank: u8,
    #[schema(example = "Property Manager")]
    pub name: String,
}

impl From<Role> for RoleInfo {
    fn from(role: Role) -> Self {
        Self {
            role,
            rank: role.rank(),
            name: crate::authz::role_name(role).to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionPermissions {
    pub user_id: String,
    pub role: Role,
    pub role_name: String,
    /// Navigation keys visible to the session, in sidebar order
    pub navigation: Vec<String>,
    /// Roles the session may assign when inviting users
    pub assignable_roles: Vec<Role>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckRequest {
    #[schema(example = "lease.update.own")]
    pub permission: String,
    #[serde(default)]
    pub context: Option<PermissionContext>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckResponse {
    pub permission: String,
    pub allowed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    #[default]
    All,
    Any,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchCheckRequest {
    #[schema(example = json!(["property.update", "property.delete"]))]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub mode: BatchMode,
    #[serde(default)]
    pub context: Option<PermissionContext>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchCheckResponse {
    pub mode: BatchMode,
    pub allowed: bool,
    pub results: Vec<CheckResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RouteCheckRequest {
    #[schema(example = "/properties/abc123/edit")]
    pub route: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RouteCheckResponse {
    pub route: String,
    pub allowed: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FieldCheckRequest {
    #[schema(example = "lease")]
    pub resource: String,
    #[schema(example = "rent_amount")]
    pub field: String,
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldCheckResponse {
    pub resource: String,
    pub field: String,
    pub allowed: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ManageRoleResponse {
    pub target: Role,
    pub allowed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub tables: TablesSummary,
}
