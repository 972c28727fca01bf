use super::context::PermissionContext;
use super::permission::{build_permission, Scope};
use super::permissions;
use super::role::{self, Role};
use super::session::Session;
use super::tables::PermissionTables;

/// Permission checks bound to one session.
///
/// A cheap, borrowed view: the tables are shared, the session is per request.
/// Nothing here is cached between calls.
#[derive(Debug, Clone, Copy)]
pub struct UnifiedPermissions<'a> {
    tables: &'a PermissionTables,
    session: &'a Session,
}

impl<'a> UnifiedPermissions<'a> {
    pub fn new(tables: &'a PermissionTables, session: &'a Session) -> Self {
        Self { tables, session }
    }

    pub fn role(&self) -> Role {
        self.session.role
    }

    pub fn user_id(&self) -> &str {
        &self.session.user_id
    }

    pub fn role_name(&self) -> &'static str {
        role::role_name(self.session.role)
    }

    pub fn is_admin(&self) -> bool {
        self.session.role == Role::Admin
    }

    pub fn is_manager_or_above(&self) -> bool {
        self.has_role_level(Role::Manager)
    }

    pub fn is_staff_or_above(&self) -> bool {
        self.has_role_level(Role::Staff)
    }

    pub fn has_role_level(&self, required: Role) -> bool {
        role::has_role_level(self.session.role, required)
    }

    /// Check a permission string for the session user. Any `user_id` in the
    /// context is replaced by the session's.
    pub fn can(&self, permission: &str, ctx: Option<&PermissionContext>) -> bool {
        let ctx = ctx.map(|ctx| ctx.clone().with_user(self.user_id()));
        self.tables.can_perform_action(self.session.role, permission, ctx.as_ref())
    }

    pub fn can_any<S: AsRef<str>>(&self, permissions: &[S], ctx: Option<&PermissionContext>) -> bool {
        permissions.iter().any(|p| self.can(p.as_ref(), ctx))
    }

    /// True when every permission passes. An empty list passes.
    pub fn can_all<S: AsRef<str>>(&self, permissions: &[S], ctx: Option<&PermissionContext>) -> bool {
        permissions.iter().all(|p| self.can(p.as_ref(), ctx))
    }

    pub fn can_access(&self, route: &str) -> bool {
        self.tables.can_access_route(self.session.role, route)
    }

    pub fn can_access_navigation(&self, key: &str) -> bool {
        self.tables.can_access_navigation(self.session.role, key)
    }

    pub fn accessible_navigation(&self) -> Vec<String> {
        self.tables.accessible_navigation(self.session.role)
    }

    pub fn is_owner(&self, resource_owner: &str) -> bool {
        self.session.user_id == resource_owner
    }

    pub fn can_manage_role(&self, target: Role) -> bool {
        role::can_manage_role(self.session.role, target)
    }

    pub fn assignable_roles(&self) -> Vec<Role> {
        role::assignable_roles(self.session.role)
    }

    /// Field-level edit check: the resource must be updatable, and restricted
    /// fields additionally need their own minimum role.
    pub fn can_edit_field(&self, resource: &str, field: &str, owner: Option<&str>) -> bool {
        let update = build_permission(resource, "update", None);
        if !self.can_with_owner(&update, owner) {
            return false;
        }

        match self.tables.field_role(&format!("{resource}.{field}")) {
            Some(required) => self.has_role_level(required),
            None => true,
        }
    }

    pub fn can_view_property(&self) -> bool {
        self.can(permissions::PROPERTY_VIEW, None)
    }

    pub fn can_create_property(&self) -> bool {
        self.can(permissions::PROPERTY_CREATE, None)
    }

    pub fn can_edit_property(&self, owner: Option<&str>) -> bool {
        self.can_with_owner(permissions::PROPERTY_UPDATE, owner)
    }

    pub fn can_delete_property(&self) -> bool {
        self.can(permissions::PROPERTY_DELETE, None)
    }

    pub fn can_manage_units(&self) -> bool {
        self.can_all(
            &[permissions::UNIT_CREATE, permissions::UNIT_UPDATE, permissions::UNIT_DELETE],
            None,
        )
    }

    pub fn can_view_lease(&self, owner: Option<&str>) -> bool {
        self.can_with_owner(permissions::LEASE_VIEW, owner)
    }

    pub fn can_create_lease(&self) -> bool {
        self.can(permissions::LEASE_CREATE, None)
    }

    pub fn can_edit_lease(&self, owner: Option<&str>) -> bool {
        self.can_with_owner(permissions::LEASE_UPDATE, owner)
    }

    pub fn can_delete_lease(&self) -> bool {
        self.can(permissions::LEASE_DELETE, None)
    }

    pub fn can_invite_tenant(&self) -> bool {
        self.can(permissions::TENANT_INVITE, None)
    }

    pub fn can_invite_vendor(&self) -> bool {
        self.can(permissions::VENDOR_INVITE, None)
    }

    pub fn can_import_csv(&self) -> bool {
        self.can(permissions::IMPORT_CSV, None)
    }

    pub fn can_view_analytics(&self) -> bool {
        self.can(permissions::ANALYTICS_VIEW, None)
    }

    pub fn can_manage_users(&self) -> bool {
        self.can(permissions::USER_MANAGE, None)
    }

    /// Everyone may edit their own profile; editing someone else's needs
    /// user management rights.
    pub fn can_edit_profile(&self, profile_owner: &str) -> bool {
        if self.is_owner(profile_owner) {
            self.can(permissions::PROFILE_UPDATE, None)
        } else {
            self.can_manage_users()
        }
    }

    pub fn can_edit_settings(&self) -> bool {
        self.can(permissions::SETTINGS_UPDATE, None)
    }

    /// Below Manager, a known owner narrows `permission` to the `own` scope.
    /// Managers and admins act on any owner's resources.
    fn can_with_owner(&self, permission: &str, owner: Option<&str>) -> bool {
        match owner {
            Some(owner) if !self.is_manager_or_above() => {
                let ctx = PermissionContext::new().with_owner(owner);
                self.can(&format!("{permission}.{}", Scope::Own), Some(&ctx))
            }
            _ => self.can(permission, None),
        }
    }
}
