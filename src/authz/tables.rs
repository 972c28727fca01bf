//! Permission tables: navigation keys, resource actions, protected routes and
//! restricted form fields, each mapped to the minimum role that may use them.
//!
//! Tables are built once (from the built-in defaults or a JSON file) and then
//! shared read-only. Route patterns are compiled to regexes up front and kept
//! in declaration order, which decides ties between overlapping patterns.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::role::Role;

const BUILTIN_NAVIGATION: &[(&str, Role)] = &[
    ("dashboard", Role::Vendor),
    ("maintenance", Role::Vendor),
    ("profile", Role::Vendor),
    ("settings", Role::Vendor),
    ("my_lease", Role::Tenant),
    ("properties", Role::Staff),
    ("units", Role::Staff),
    ("leases", Role::Staff),
    ("tenants", Role::Staff),
    ("invitations", Role::Staff),
    ("vendors", Role::Manager),
    ("import", Role::Manager),
    ("analytics", Role::Manager),
    ("users", Role::Admin),
    ("clients", Role::Admin),
];

const BUILTIN_RESOURCES: &[(&str, Role)] = &[
    ("property.view", Role::Vendor),
    ("property.create", Role::Staff),
    ("property.update", Role::Staff),
    ("property.delete", Role::Manager),
    ("unit.view", Role::Tenant),
    ("unit.create", Role::Staff),
    ("unit.update", Role::Staff),
    ("unit.delete", Role::Manager),
    ("lease.view", Role::Tenant),
    ("lease.create", Role::Staff),
    ("lease.update", Role::Staff),
    ("lease.delete", Role::Manager),
    ("tenant.view", Role::Staff),
    ("tenant.invite", Role::Staff),
    ("tenant.update", Role::Staff),
    ("tenant.delete", Role::Manager),
    ("vendor.view", Role::Staff),
    ("vendor.invite", Role::Manager),
    ("vendor.update", Role::Manager),
    ("vendor.delete", Role::Manager),
    ("maintenance.view", Role::Vendor),
    ("maintenance.create", Role::Tenant),
    ("maintenance.update", Role::Vendor),
    ("maintenance.delete", Role::Manager),
    ("invitation.view", Role::Staff),
    ("invitation.revoke", Role::Manager),
    ("import.csv", Role::Manager),
    ("analytics.view", Role::Manager),
    ("profile.view", Role::Vendor),
    ("profile.update", Role::Vendor),
    ("settings.view", Role::Vendor),
    ("settings.update", Role::Vendor),
    ("user.view", Role::Manager),
    ("user.manage", Role::Admin),
    ("client.manage", Role::Admin),
];

const BUILTIN_ROUTES: &[(&str, Role)] = &[
    ("/dashboard", Role::Vendor),
    ("/profile", Role::Vendor),
    ("/settings", Role::Vendor),
    ("/maintenance", Role::Vendor),
    ("/maintenance/[rid]", Role::Vendor),
    ("/my-lease", Role::Tenant),
    ("/properties", Role::Staff),
    ("/properties/create", Role::Staff),
    ("/properties/[pid]", Role::Staff),
    ("/properties/[pid]/edit", Role::Staff),
    ("/properties/[pid]/units", Role::Staff),
    ("/properties/[pid]/units/[uid]", Role::Staff),
    ("/properties/[pid]/units/[uid]/edit", Role::Staff),
    ("/leases", Role::Staff),
    ("/leases/create", Role::Staff),
    ("/leases/[lid]", Role::Staff),
    ("/leases/[lid]/edit", Role::Staff),
    ("/tenants", Role::Staff),
    ("/tenants/invite", Role::Staff),
    ("/tenants/[tid]", Role::Staff),
    ("/invitations", Role::Staff),
    ("/vendors", Role::Manager),
    ("/vendors/invite", Role::Manager),
    ("/vendors/[vid]", Role::Manager),
    ("/import", Role::Manager),
    ("/analytics", Role::Manager),
    ("/admin", Role::Admin),
    ("/admin/users", Role::Admin),
    ("/admin/users/[uid]", Role::Admin),
    ("/admin/clients", Role::Admin),
];

const BUILTIN_FIELDS: &[(&str, Role)] = &[
    ("property.owner", Role::Admin),
    ("property.client_id", Role::Admin),
    ("unit.market_rent", Role::Manager),
    ("lease.rent_amount", Role::Manager),
    ("lease.security_deposit", Role::Manager),
    ("lease.status", Role::Manager),
    ("tenant.role", Role::Manager),
    ("profile.role", Role::Admin),
    ("profile.client_id", Role::Admin),
];

#[derive(thiserror::Error, Debug)]
pub enum TablesError {
    #[error("failed to read permission tables from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid permission tables at {path}: {message}")]
    Json { path: String, message: String },
    #[error("invalid route pattern {pattern}: {source}")]
    InvalidRoute {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl From<serde_path_to_error::Error<serde_json::Error>> for TablesError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self::Json {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NavigationRule {
    pub key: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResourceRule {
    #[schema(example = "property.delete")]
    pub permission: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RouteRule {
    #[schema(example = "/properties/[pid]/edit")]
    pub pattern: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldRule {
    #[schema(example = "lease.rent_amount")]
    pub field: String,
    pub role: Role,
}

/// On-disk layout of the tables. Arrays keep declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablesFile {
    #[serde(default)]
    pub navigation: Vec<NavigationRule>,
    #[serde(default)]
    pub resources: Vec<ResourceRule>,
    #[serde(default)]
    pub routes: Vec<RouteRule>,
    #[serde(default)]
    pub fields: Vec<FieldRule>,
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    pattern: String,
    regex: Regex,
    role: Role,
}

/// Ordered route table with exact lookup and compiled patterns.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    exact: HashMap<String, Role>,
    patterns: Vec<CompiledRoute>,
}

impl RouteTable {
    pub fn new(rules: &[RouteRule]) -> Result<Self, TablesError> {
        let mut exact = HashMap::with_capacity(rules.len());
        let mut patterns = Vec::with_capacity(rules.len());

        for rule in rules {
            // First declaration wins for duplicate patterns.
            exact.entry(rule.pattern.clone()).or_insert(rule.role);
            let regex = compile_route_pattern(&rule.pattern).map_err(|source| TablesError::InvalidRoute {
                pattern: rule.pattern.clone(),
                source,
            })?;
            patterns.push(CompiledRoute {
                pattern: rule.pattern.clone(),
                regex,
                role: rule.role,
            });
        }

        Ok(Self { exact, patterns })
    }

    /// Minimum role for `route`: exact entry first, then the first pattern in
    /// declaration order that matches. `None` means the route is unprotected.
    pub fn required_role(&self, route: &str) -> Option<Role> {
        if let Some(role) = self.exact.get(route) {
            return Some(*role);
        }

        self.patterns
            .iter()
            .find(|compiled| compiled.regex.is_match(route))
            .map(|compiled| compiled.role)
    }

    /// Number of distinct patterns. Shadowed duplicates are not counted.
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }

    fn rules(&self) -> Vec<RouteRule> {
        self.patterns
            .iter()
            .map(|compiled| RouteRule {
                pattern: compiled.pattern.clone(),
                role: compiled.role,
            })
            .collect()
    }
}

/// Translate `/properties/[pid]/edit` into `^/properties/[^/]+/edit$`.
fn compile_route_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    let mut source = String::from("^");
    let mut rest = pattern;

    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']') else {
            break;
        };
        source.push_str(&regex::escape(&rest[..open]));
        source.push_str("[^/]+");
        rest = &rest[open + close + 1..];
    }

    source.push_str(&regex::escape(rest));
    source.push('$');
    Regex::new(&source)
}

#[derive(Debug, Clone)]
pub struct PermissionTables {
    navigation: Vec<NavigationRule>,
    navigation_rules: Vec<NavigationRule>,
    resources: HashMap<String, Role>,
    routes: RouteTable,
    fields: HashMap<String, Role>,
    resource_rules: Vec<ResourceRule>,
    field_rules: Vec<FieldRule>,
}

impl PermissionTables {
    pub fn new(file: TablesFile) -> Result<Self, TablesError> {
        let routes = RouteTable::new(&file.routes)?;

        // First declaration wins for duplicate keys in every table.
        let mut navigation: Vec<NavigationRule> = Vec::with_capacity(file.navigation.len());
        for rule in &file.navigation {
            if !navigation.iter().any(|seen| seen.key == rule.key) {
                navigation.push(rule.clone());
            }
        }

        let mut resources = HashMap::with_capacity(file.resources.len());
        for rule in &file.resources {
            resources.entry(rule.permission.clone()).or_insert(rule.role);
        }

        let mut fields = HashMap::with_capacity(file.fields.len());
        for rule in &file.fields {
            fields.entry(rule.field.clone()).or_insert(rule.role);
        }

        Ok(Self {
            navigation,
            navigation_rules: file.navigation,
            resources,
            routes,
            fields,
            resource_rules: file.resources,
            field_rules: file.fields,
        })
    }

    /// Tables shipped with the application.
    pub fn builtin() -> Self {
        let file = TablesFile {
            navigation: BUILTIN_NAVIGATION
                .iter()
                .map(|(key, role)| NavigationRule { key: key.to_string(), role: *role })
                .collect(),
            resources: BUILTIN_RESOURCES
                .iter()
                .map(|(permission, role)| ResourceRule { permission: permission.to_string(), role: *role })
                .collect(),
            routes: BUILTIN_ROUTES
                .iter()
                .map(|(pattern, role)| RouteRule { pattern: pattern.to_string(), role: *role })
                .collect(),
            fields: BUILTIN_FIELDS
                .iter()
                .map(|(field, role)| FieldRule { field: field.to_string(), role: *role })
                .collect(),
        };

        Self::new(file).expect("built-in route patterns must compile")
    }

    pub fn from_json_str(json: &str) -> Result<Self, TablesError> {
        let deserializer = &mut serde_json::Deserializer::from_str(json);
        let file: TablesFile = serde_path_to_error::deserialize(deserializer)?;
        Self::new(file)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TablesError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| TablesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tables = Self::from_json_str(&json)?;

        tracing::info!(
            path = %path.display(),
            navigation = tables.navigation.len(),
            resources = tables.resources.len(),
            routes = tables.routes.len(),
            fields = tables.fields.len(),
            "loaded permission tables"
        );
        Ok(tables)
    }

    pub fn navigation_role(&self, key: &str) -> Option<Role> {
        self.navigation
            .iter()
            .find(|rule| rule.key == key)
            .map(|rule| rule.role)
    }

    /// Effective navigation entries: one per key, in declaration order.
    pub fn navigation_rules(&self) -> &[NavigationRule] {
        &self.navigation
    }

    pub fn resource_role(&self, permission: &str) -> Option<Role> {
        self.resources.get(permission).copied()
    }

    pub fn route_role(&self, route: &str) -> Option<Role> {
        self.routes.required_role(route)
    }

    pub fn field_role(&self, field: &str) -> Option<Role> {
        self.fields.get(field).copied()
    }

    pub fn summary(&self) -> TablesSummary {
        TablesSummary {
            navigation: self.navigation.len(),
            resources: self.resources.len(),
            routes: self.routes.len(),
            fields: self.fields.len(),
        }
    }

    /// Declaration-ordered view, suitable for writing back to disk.
    pub fn to_file(&self) -> TablesFile {
        TablesFile {
            navigation: self.navigation_rules.clone(),
            resources: self.resource_rules.clone(),
            routes: self.routes.rules(),
            fields: self.field_rules.clone(),
        }
    }
}

impl Default for PermissionTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct TablesSummary {
    pub navigation: usize,
    pub resources: usize,
    pub routes: usize,
    pub fields: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(pattern: &str, role: Role) -> RouteRule {
        RouteRule { pattern: pattern.to_string(), role }
    }

    #[test]
    fn test_bracketed_segment_matches_one_path_segment() {
        let re = compile_route_pattern("/properties/[pid]/edit").unwrap();
        assert!(re.is_match("/properties/abc123/edit"));
        assert!(!re.is_match("/properties/abc/123/edit"));
        assert!(!re.is_match("/properties//edit"));
        assert!(!re.is_match("/properties/abc123/edit/extra"));
    }

    #[test]
    fn test_literal_characters_are_escaped() {
        let re = compile_route_pattern("/reports.csv").unwrap();
        assert!(re.is_match("/reports.csv"));
        assert!(!re.is_match("/reportsXcsv"));
    }

    #[test]
    fn test_exact_match_beats_earlier_pattern() {
        let table = RouteTable::new(&[
            route("/leases/[lid]", Role::Staff),
            route("/leases/create", Role::Manager),
        ])
        .unwrap();
        assert_eq!(table.required_role("/leases/create"), Some(Role::Manager));
        assert_eq!(table.required_role("/leases/l-9"), Some(Role::Staff));
    }

    #[test]
    fn test_first_declared_pattern_wins() {
        let table = RouteTable::new(&[
            route("/units/[uid]", Role::Tenant),
            route("/[section]/[id]", Role::Admin),
        ])
        .unwrap();
        assert_eq!(table.required_role("/units/u-1"), Some(Role::Tenant));
        assert_eq!(table.required_role("/reports/r-1"), Some(Role::Admin));
        assert_eq!(table.required_role("/unmapped"), None);
    }

    #[test]
    fn test_summary_counts_distinct_entries() {
        let tables = PermissionTables::new(TablesFile {
            navigation: vec![
                NavigationRule { key: "dashboard".to_string(), role: Role::Admin },
                NavigationRule { key: "dashboard".to_string(), role: Role::Vendor },
            ],
            resources: vec![
                ResourceRule { permission: "unit.view".to_string(), role: Role::Tenant },
                ResourceRule { permission: "unit.view".to_string(), role: Role::Vendor },
            ],
            routes: vec![route("/units/[uid]", Role::Tenant), route("/units/[uid]", Role::Admin)],
            fields: vec![],
        })
        .unwrap();

        assert_eq!(
            tables.summary(),
            TablesSummary { navigation: 1, resources: 1, routes: 1, fields: 0 }
        );
        // The file view keeps every declaration.
        assert_eq!(tables.to_file().routes.len(), 2);
        assert_eq!(tables.to_file().navigation.len(), 2);
    }

    #[test]
    fn test_builtin_tables_round_trip_through_file_format() {
        let tables = PermissionTables::builtin();
        let file = tables.to_file();
        let json = serde_json::to_string(&file).unwrap();
        let reloaded = PermissionTables::from_json_str(&json).unwrap();
        assert_eq!(reloaded.to_file(), file);
        assert_eq!(reloaded.summary(), tables.summary());
    }

    #[test]
    fn test_json_errors_report_path() {
        let err = PermissionTables::from_json_str(
            r#"{"resources": [{"permission": "property.view", "role": "owner"}]}"#,
        )
        .unwrap_err();
        match err {
            TablesError::Json { path, .. } => assert_eq!(path, "resources[0].role"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
