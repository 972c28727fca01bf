use super::context::PermissionContext;
use super::permission::parse_permission;
use super::role::{has_role_level, Role};
use super::tables::PermissionTables;

/// Decision functions over a set of permission tables.
///
/// Evaluation order for resource actions:
/// 1. unknown `resource.action` -> deny
/// 2. role below the required rank -> deny
/// 3. no scope, or no context to check it against -> allow
/// 4. scope check against the context
impl PermissionTables {
    pub fn can_access_navigation(&self, role: Role, key: &str) -> bool {
        match self.navigation_role(key) {
            Some(required) => has_role_level(role, required),
            None => {
                tracing::debug!(role = %role, key = %key, "unknown navigation key");
                false
            }
        }
    }

    /// Routes missing from the table are treated as public.
    pub fn can_access_route(&self, role: Role, route: &str) -> bool {
        match self.route_role(route) {
            Some(required) => has_role_level(role, required),
            None => true,
        }
    }

    pub fn can_perform_action(
        &self,
        role: Role,
        permission: &str,
        ctx: Option<&PermissionContext>,
    ) -> bool {
        let parsed = parse_permission(permission);

        let required = match parsed.table_key().and_then(|key| self.resource_role(&key)) {
            Some(required) => required,
            None => {
                tracing::debug!(role = %role, permission = %permission, "unmapped permission denied");
                return false;
            }
        };

        if !has_role_level(role, required) {
            tracing::debug!(
                role = %role,
                required = %required,
                permission = %permission,
                "permission denied"
            );
            return false;
        }

        let (Some(scope), Some(ctx)) = (parsed.scope.as_ref(), ctx) else {
            return true;
        };

        let allowed = ctx.satisfies(scope);
        tracing::debug!(
            role = %role,
            permission = %permission,
            scope = %scope,
            allowed,
            "scoped permission check"
        );
        allowed
    }

    /// Navigation keys `role` can see, in table order.
    pub fn accessible_navigation(&self, role: Role) -> Vec<String> {
        self.navigation_rules()
            .iter()
            .filter(|rule| has_role_level(role, rule.role))
            .map(|rule| rule.key.clone())
            .collect()
    }
}
