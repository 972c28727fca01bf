use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Map, Value};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{authz, errors, models, routes};

#[derive(OpenApi)]
#[openapi(
	paths(
		routes::health::health,
		routes::roles::list_roles,
		routes::permissions::session_permissions,
		routes::permissions::check_permission,
		routes::permissions::check_batch,
		routes::permissions::check_route,
		routes::permissions::check_field,
		routes::permissions::check_manage_role,
		routes::permissions::dump_tables
	),
	components(
		schemas(
			authz::Role,
			authz::PermissionContext,
			authz::TablesSummary,
			errors::ErrorResponse,
			models::permission::RoleInfo,
			models::permission::SessionPermissions,
			models::permission::CheckRequest,
			models::permission::CheckResponse,
			models::permission::BatchMode,
			models::permission::BatchCheckRequest,
			models::permission::BatchCheckResponse,
			models::permission::RouteCheckRequest,
			models::permission::RouteCheckResponse,
			models::permission::FieldCheckRequest,
			models::permission::FieldCheckResponse,
			models::permission::ManageRoleResponse,
			models::permission::HealthResponse
		)
	),
	tags(
		(name = "Health", description = "Service health"),
		(name = "Roles", description = "Role hierarchy"),
		(name = "Permissions", description = "Permission decisions for the current session")
	)
)]
pub struct ApiDoc;

pub fn build_openapi(port: u16) -> anyhow::Result<utoipa::openapi::OpenApi> {
	let mut doc = serde_json::to_value(ApiDoc::openapi())?;

	ensure_security_components(&mut doc);
	ensure_servers(&mut doc, port);

	Ok(serde_json::from_value(doc)?)
}

pub fn swagger_routes(doc: utoipa::openapi::OpenApi) -> anyhow::Result<Router> {
	let swagger_config = utoipa_swagger_ui::Config::new(["/api-docs/openapi.json"])
		.try_it_out_enabled(true)
		.persist_authorization(true);

	let doc_json = Arc::new(serde_json::to_value(&doc)?);

	let json_route = {
		let doc_json = Arc::clone(&doc_json);
		get(move || {
			let doc_json = Arc::clone(&doc_json);
			async move { Json((*doc_json).clone()) }
		})
	};

	Ok(Router::new()
		.route("/api-docs/openapi.json", json_route)
		.merge(SwaggerUi::new("/docs").config(swagger_config)))
}

fn ensure_security_components(doc: &mut Value) {
	let Some(root) = doc.as_object_mut() else { return; };
	let Some(components) = root
		.entry("components")
		.or_insert_with(|| Value::Object(Map::new()))
		.as_object_mut()
	else {
		return;
	};
	let Some(schemes) = components
		.entry("securitySchemes")
		.or_insert_with(|| Value::Object(Map::new()))
		.as_object_mut()
	else {
		return;
	};

	schemes.insert(
		"bearerAuth".to_string(),
		json!({
			"type": "http",
			"scheme": "bearer",
			"bearerFormat": "JWT"
		}),
	);
}

fn ensure_servers(doc: &mut Value, port: u16) {
	let Some(root) = doc.as_object_mut() else { return; };
	root
		.entry("servers")
		.or_insert_with(|| json!([{ "url": format!("http://localhost:{port}") }]));
}
