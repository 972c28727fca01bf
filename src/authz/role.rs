use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Portfolio role, ordered by privilege.
///
/// The hierarchy is: Vendor < Tenant < Staff < Manager < Admin. Every
/// "at least X" check compares ranks, so a Manager requirement is also
/// satisfied by an Admin.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Vendor,
    Tenant,
    Staff,
    Manager,
    Admin,
}

impl Role {
    /// Every role, lowest rank first.
    pub const ALL: [Role; 5] = [
        Role::Vendor,
        Role::Tenant,
        Role::Staff,
        Role::Manager,
        Role::Admin,
    ];

    pub fn rank(self) -> u8 {
        match self {
            Role::Vendor => 1,
            Role::Tenant => 2,
            Role::Staff => 3,
            Role::Manager => 4,
            Role::Admin => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Vendor => "vendor",
            Role::Tenant => "tenant",
            Role::Staff => "staff",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vendor" => Ok(Role::Vendor),
            "tenant" => Ok(Role::Tenant),
            "staff" => Ok(Role::Staff),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

pub fn has_role_level(user_role: Role, required: Role) -> bool {
    user_role.rank() >= required.rank()
}

/// Whether `manager` may assign, edit or revoke a user holding `target`.
///
/// Admins manage everyone, other admins included. Staff and Managers manage
/// strictly lower ranks. Tenants and vendors manage nobody.
pub fn can_manage_role(manager: Role, target: Role) -> bool {
    match manager {
        Role::Admin => true,
        Role::Manager | Role::Staff => manager.rank() > target.rank(),
        Role::Tenant | Role::Vendor => false,
    }
}

/// Display title shown in the UI.
pub fn role_name(role: Role) -> &'static str {
    match role {
        Role::Admin => "Administrator",
        Role::Manager => "Property Manager",
        Role::Staff => "Staff Member",
        Role::Tenant => "Tenant",
        Role::Vendor => "Vendor",
    }
}

/// Roles `manager` can hand out in an invitation, lowest first.
pub fn assignable_roles(manager: Role) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|target| can_manage_role(manager, *target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ordering_matches_hierarchy() {
        assert_eq!(Role::Staff.rank(), 3);
        assert_eq!(Role::Manager.rank(), 4);
        for pair in Role::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_has_role_level_is_inclusive() {
        assert!(has_role_level(Role::Manager, Role::Manager));
        assert!(has_role_level(Role::Admin, Role::Manager));
        assert!(!has_role_level(Role::Staff, Role::Manager));
        assert!(has_role_level(Role::Vendor, Role::Vendor));
    }

    #[test]
    fn test_can_manage_role() {
        assert!(can_manage_role(Role::Admin, Role::Admin));
        assert!(can_manage_role(Role::Manager, Role::Staff));
        assert!(!can_manage_role(Role::Manager, Role::Manager));
        assert!(!can_manage_role(Role::Manager, Role::Admin));
        assert!(can_manage_role(Role::Staff, Role::Tenant));
        assert!(!can_manage_role(Role::Tenant, Role::Vendor));
        assert!(!can_manage_role(Role::Vendor, Role::Vendor));
    }

    #[test]
    fn test_assignable_roles() {
        assert_eq!(assignable_roles(Role::Admin), Role::ALL.to_vec());
        assert_eq!(
            assignable_roles(Role::Manager),
            vec![Role::Vendor, Role::Tenant, Role::Staff]
        );
        assert!(assignable_roles(Role::Tenant).is_empty());
    }

    #[test]
    fn test_parse_role_names() {
        assert_eq!("Manager".parse::<Role>(), Ok(Role::Manager));
        assert_eq!(" admin ".parse::<Role>(), Ok(Role::Admin));
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(Role::Tenant.to_string(), "tenant");
        assert_eq!(role_name(Role::Manager), "Property Manager");
    }
}
