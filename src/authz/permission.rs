//! Dotted permission strings: `action`, `resource.action` or
//! `resource.action.scope`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scope qualifier narrowing a permission to a subset of resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Own,
    Assigned,
    Department,
    Any,
    /// Unrecognised scope text, kept verbatim. Evaluates like `Any`.
    Other(String),
}

impl Scope {
    pub fn parse(s: &str) -> Self {
        match s {
            "own" => Scope::Own,
            "assigned" => Scope::Assigned,
            "department" => Scope::Department,
            "any" => Scope::Any,
            other => Scope::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Scope::Own => "own",
            Scope::Assigned => "assigned",
            Scope::Department => "department",
            Scope::Any => "any",
            Scope::Other(s) => s,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for Scope {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Scope::parse(&s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPermission {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

impl ParsedPermission {
    /// Key into the resource-action table, if the string named a resource.
    pub fn table_key(&self) -> Option<String> {
        self.resource
            .as_ref()
            .map(|resource| format!("{}.{}", resource, self.action))
    }
}

/// Split a permission string into its parts.
///
/// Strings with more than three segments are not an error: the whole input
/// comes back as a bare action, which never matches a table entry.
pub fn parse_permission(permission: &str) -> ParsedPermission {
    let parts: Vec<&str> = permission.split('.').collect();
    match parts.as_slice() {
        [action] => ParsedPermission {
            action: action.to_string(),
            resource: None,
            scope: None,
        },
        [resource, action] => ParsedPermission {
            action: action.to_string(),
            resource: Some(resource.to_string()),
            scope: None,
        },
        [resource, action, scope] => ParsedPermission {
            action: action.to_string(),
            resource: Some(resource.to_string()),
            scope: Some(Scope::parse(scope)),
        },
        _ => ParsedPermission {
            action: permission.to_string(),
            resource: None,
            scope: None,
        },
    }
}

pub fn build_permission(resource: &str, action: &str, scope: Option<&Scope>) -> String {
    match scope {
        Some(scope) => format!("{resource}.{action}.{scope}"),
        None => format!("{resource}.{action}"),
    }
}
