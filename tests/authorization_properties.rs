use propauth::authz::{
    build_permission, has_role_level, parse_permission, PermissionContext, PermissionTables, Role,
    Scope,
};

#[test]
fn rank_requirement_is_monotonic_for_every_mapped_permission() {
    let tables = PermissionTables::builtin();

    for rule in tables.to_file().resources {
        for role in Role::ALL {
            let allowed = tables.can_perform_action(role, &rule.permission, None);
            assert_eq!(
                allowed,
                has_role_level(role, rule.role),
                "{} as {} (requires {})",
                rule.permission,
                role,
                rule.role
            );
        }
    }
}

#[test]
fn staff_cannot_delete_property_but_manager_can() {
    let tables = PermissionTables::builtin();
    assert!(!tables.can_perform_action(Role::Staff, "property.delete", None));
    assert!(tables.can_perform_action(Role::Manager, "property.delete", None));
}

#[test]
fn own_scope_for_every_qualifying_role() {
    let tables = PermissionTables::builtin();
    let same = PermissionContext::new().with_owner("x").with_user("x");
    let different = PermissionContext::new().with_owner("x").with_user("y");

    for role in Role::ALL.into_iter().filter(|r| *r >= Role::Staff) {
        assert!(tables.can_perform_action(role, "lease.update.own", Some(&same)));
        assert!(!tables.can_perform_action(role, "lease.update.own", Some(&different)));
    }
}

#[test]
fn default_policies_differ_between_routes_and_actions() {
    let tables = PermissionTables::builtin();
    assert!(tables.can_access_route(Role::Admin, "/some/totally/unmapped/route"));
    assert!(!tables.can_perform_action(Role::Admin, "nonexistent.permission", None));
}

#[test]
fn parameterised_routes() {
    let tables = PermissionTables::builtin();
    assert!(tables.can_access_route(Role::Manager, "/properties/abc123/edit"));
    assert!(!tables.can_access_route(Role::Vendor, "/properties/abc123/edit"));
    assert!(tables.can_access_route(Role::Staff, "/properties/p-1/units/u-2/edit"));
    assert!(!tables.can_access_route(Role::Tenant, "/properties/p-1/units/u-2"));
    assert!(!tables.can_access_route(Role::Manager, "/admin/users/u-9"));
}

#[test]
fn assigned_and_department_scopes() {
    let tables = PermissionTables::builtin();
    let assigned = PermissionContext::new()
        .with_user("vendor-1")
        .with_assigned(["vendor-1", "vendor-2"]);
    let unassigned = PermissionContext::new().with_user("vendor-3").with_assigned(["vendor-1"]);

    assert!(tables.can_perform_action(Role::Vendor, "maintenance.update.assigned", Some(&assigned)));
    assert!(!tables.can_perform_action(Role::Vendor, "maintenance.update.assigned", Some(&unassigned)));

    let in_department = PermissionContext::new().with_departments(["leasing"]);
    assert!(tables.can_perform_action(Role::Staff, "tenant.update.department", Some(&in_department)));
    assert!(!tables.can_perform_action(
        Role::Staff,
        "tenant.update.department",
        Some(&PermissionContext::new())
    ));
}

#[test]
fn permission_strings_round_trip() {
    let resources = ["property", "unit", "lease", "maintenance"];
    let actions = ["view", "create", "update", "delete"];
    let scopes = [None, Some(Scope::Own), Some(Scope::Assigned), Some(Scope::Department), Some(Scope::Any)];

    for resource in resources {
        for action in actions {
            for scope in &scopes {
                let parsed = parse_permission(&build_permission(resource, action, scope.as_ref()));
                assert_eq!(parsed.resource.as_deref(), Some(resource));
                assert_eq!(parsed.action, action);
                assert_eq!(parsed.scope.as_ref(), scope.as_ref());
            }
        }
    }
}
