//! Authorization module - role hierarchy, permission tables and the unified
//! permissions facade.
//!
//! This module implements:
//! - A ranked role hierarchy (vendor < tenant < staff < manager < admin)
//! - Navigation, resource-action, route and field tables
//! - Dotted permission strings with optional own/assigned/department scope
//! - A per-session facade consumed by the HTTP layer and the CLI
//!
//! Every decision is a pure function of the tables, the session and the
//! arguments of the call.

mod context;
mod evaluator;
mod facade;
mod permission;
mod role;
mod session;
mod tables;

pub use context::PermissionContext;
pub use facade::UnifiedPermissions;
pub use permission::{build_permission, parse_permission, ParsedPermission, Scope};
pub use role::{assignable_roles, can_manage_role, has_role_level, role_name, Role, UnknownRole};
pub use session::Session;
pub use tables::{
    FieldRule, NavigationRule, PermissionTables, ResourceRule, RouteRule, RouteTable, TablesError,
    TablesFile, TablesSummary,
};

/// Well-known permission names
pub mod permissions {
    // Property
    pub const PROPERTY_VIEW: &str = "property.view";
    pub const PROPERTY_CREATE: &str = "property.create";
    pub const PROPERTY_UPDATE: &str = "property.update";
    pub const PROPERTY_DELETE: &str = "property.delete";

    // Unit
    pub const UNIT_CREATE: &str = "unit.create";
    pub const UNIT_UPDATE: &str = "unit.update";
    pub const UNIT_DELETE: &str = "unit.delete";

    // Lease
    pub const LEASE_VIEW: &str = "lease.view";
    pub const LEASE_CREATE: &str = "lease.create";
    pub const LEASE_UPDATE: &str = "lease.update";
    pub const LEASE_DELETE: &str = "lease.delete";

    // Invitations
    pub const TENANT_INVITE: &str = "tenant.invite";
    pub const VENDOR_INVITE: &str = "vendor.invite";

    // Bulk import and analytics
    pub const IMPORT_CSV: &str = "import.csv";
    pub const ANALYTICS_VIEW: &str = "analytics.view";

    // Account
    pub const PROFILE_UPDATE: &str = "profile.update";
    pub const SETTINGS_UPDATE: &str = "settings.update";
    pub const USER_MANAGE: &str = "user.manage";
}
