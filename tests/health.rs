use anyhow::Result;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

use propauth::authz::PermissionTables;
use propauth::jwt::JwtConfig;
use propauth::{router, AppState};

#[tokio::test]
async fn health_endpoint_reports_table_sizes() -> Result<()> {
    let tables = PermissionTables::builtin();
    let expected = tables.summary();
    let app = router(AppState::new(tables, JwtConfig::new("test-secret", 1)));

    let req = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())?;

    let resp: Response = app.oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK, "health endpoint did not return 200");

    let body_bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    let v: Value = serde_json::from_slice(&body_bytes)?;
    assert_eq!(v["status"], "ok");
    assert_eq!(v["tables"]["routes"].as_u64(), Some(expected.routes as u64));
    assert_eq!(v["tables"]["resources"].as_u64(), Some(expected.resources as u64));

    Ok(())
}

#[tokio::test]
async fn roles_endpoint_lists_hierarchy_lowest_first() -> Result<()> {
    let app = router(AppState::new(PermissionTables::builtin(), JwtConfig::new("test-secret", 1)));

    let req = Request::builder()
        .method("GET")
        .uri("/api/roles")
        .body(Body::empty())?;

    let resp: Response = app.oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let body_bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    let v: Value = serde_json::from_slice(&body_bytes)?;
    let roles = v.as_array().expect("roles must be an array");
    assert_eq!(roles.len(), 5);
    assert_eq!(roles[0]["role"], "vendor");
    assert_eq!(roles[0]["rank"], 1);
    assert_eq!(roles[4]["role"], "admin");
    assert_eq!(roles[4]["name"], "Administrator");

    Ok(())
}
