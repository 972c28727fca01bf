use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::permission::Scope;

/// Per-call context for scoped permission checks.
///
/// Built by the caller for a single check; the permission layer only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PermissionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_to: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub departments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl PermissionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.resource_owner = Some(owner.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_assigned(mut self, users: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.assigned_to = users.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_departments(mut self, departments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.departments = departments.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Check whether the context satisfies a scope restriction.
    pub fn satisfies(&self, scope: &Scope) -> bool {
        match scope {
            // Two absent ids compare equal.
            Scope::Own => self.resource_owner == self.user_id,
            Scope::Assigned => self
                .user_id
                .as_ref()
                .is_some_and(|user| self.assigned_to.contains(user)),
            // Membership in any department passes; no specific department is required.
            Scope::Department => !self.departments.is_empty(),
            Scope::Any | Scope::Other(_) => true,
        }
    }
}
