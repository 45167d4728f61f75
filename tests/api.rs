use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use civic_complaints::{
    config::{AppState, Settings},
    routes::create_router,
};

fn settings() -> Settings {
    Settings {
        app_addr: "127.0.0.1:0".into(),
        jwt_secret: "integration-secret".into(),
        token_ttl_hours: 1,
        database_url: None,
        database_max_connections: 1,
        simulated_latency_ms: 0,
        seed_demo_data: true,
    }
}

async fn app() -> Router {
    let state = AppState::new(&settings()).await.unwrap();
    create_router(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn login(app: &Router, email: &str) -> (String, Value) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "demo" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    (body["token"].as_str().unwrap().to_string(), body)
}

fn broken_light() -> Value {
    json!({
        "title": "Broken light",
        "description": "The light at the corner is out.",
        "category": "streetlight",
        "location": { "lat": 40.71, "lng": -74.0, "address": "5th Avenue" }
    })
}

#[tokio::test]
async fn health_and_fallback() {
    let app = app().await;
    let (status, _) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/complaints"].is_object());
    assert!(body["components"]["securitySchemes"]["api_jwt"].is_object());
}

#[tokio::test]
async fn demo_citizen_sees_seeded_complaints() {
    let app = app().await;
    let (token, auth) = login(&app, "user@example.com").await;
    assert_eq!(auth["user"]["role"], "user");
    assert_eq!(auth["dashboard"], "User");

    let (status, mine) = send(&app, Method::GET, "/api/complaints/mine", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = mine.as_array().unwrap().iter().map(|c| c["title"].clone()).collect();
    assert_eq!(titles, vec![json!("Overflowing garbage bin"), json!("Large pothole on Main Street")]);

    let (_, dashboard) = send(&app, Method::GET, "/api/dashboard", Some(&token), None).await;
    assert_eq!(dashboard["variant"], "User");
    assert_eq!(dashboard["stats"]["total"], 2);
    assert_eq!(dashboard["stats"]["inProgress"], 1);
}

#[tokio::test]
async fn submit_then_resolve_as_super_admin() {
    let app = app().await;
    let (citizen, auth) = login(&app, "u1@city.org").await;
    let owner = auth["user"]["id"].clone();

    let (status, created) = send(&app, Method::POST, "/api/complaints", Some(&citizen), Some(broken_light())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "Pending");
    assert_eq!(created["userId"], owner);
    assert_eq!(created["createdAt"], created["updatedAt"]);
    let id = created["id"].as_str().unwrap().to_string();

    let (admin, _) = login(&app, "admin@example.com").await;
    let status_uri = format!("/api/complaints/{id}/status");

    // Pular etapas não é permitido
    let (status, _) = send(&app, Method::PATCH, &status_uri, Some(&admin), Some(json!({ "status": "Resolved" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, progress) =
        send(&app, Method::PATCH, &status_uri, Some(&admin), Some(json!({ "status": "In Progress" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, resolved) =
        send(&app, Method::PATCH, &status_uri, Some(&admin), Some(json!({ "status": "Resolved" }))).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(resolved["status"], "Resolved");
    assert_eq!(resolved["userId"], owner);
    assert_ne!(resolved["updatedAt"], progress["updatedAt"]);
    assert_ne!(progress["updatedAt"], created["updatedAt"]);

    let (_, all) = send(&app, Method::GET, "/api/complaints", Some(&admin), None).await;
    assert_eq!(all.as_array().unwrap()[0]["id"], json!(id));
}

#[tokio::test]
async fn water_admin_sees_water_plus_assigned() {
    let app = app().await;
    let (citizen, _) = login(&app, "u2@city.org").await;
    let mut leak = broken_light();
    leak["category"] = json!("water");
    leak["title"] = json!("Burst pipe");
    send(&app, Method::POST, "/api/complaints", Some(&citizen), Some(leak)).await;
    let (_, noise) = send(
        &app,
        Method::POST,
        "/api/complaints",
        Some(&citizen),
        Some(json!({
            "title": "Loud party",
            "description": "Every night",
            "category": "noise",
            "location": { "lat": 1.0, "lng": 1.0, "address": "" }
        })),
    )
    .await;
    assert_eq!(noise["location"]["address"], "1.000000, 1.000000");

    let (water, _) = login(&app, "water.admin@example.com").await;
    let (_, visible) = send(&app, Method::GET, "/api/complaints", Some(&water), None).await;
    let categories: Vec<_> = visible.as_array().unwrap().iter().map(|c| c["category"].clone()).collect();
    assert_eq!(categories, vec![json!("water")]);

    let (admin, _) = login(&app, "admin@example.com").await;
    let noise_id = noise["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/complaints/{noise_id}/assignment"),
        Some(&admin),
        Some(json!({ "assignedProvider": "Water Admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, visible) = send(&app, Method::GET, "/api/complaints", Some(&water), None).await;
    assert_eq!(visible.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn assignment_keeps_status_and_is_admin_only() {
    let app = app().await;
    let (citizen, _) = login(&app, "u3@city.org").await;
    let (_, created) = send(&app, Method::POST, "/api/complaints", Some(&citizen), Some(broken_light())).await;
    let uri = format!("/api/complaints/{}/assignment", created["id"].as_str().unwrap());

    let body = json!({ "assignedTo": "Electrical Services Team" });
    let (status, _) = send(&app, Method::PUT, &uri, Some(&citizen), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (dept, _) = login(&app, "electrical.admin@example.com").await;
    let (status, assigned) = send(&app, Method::PUT, &uri, Some(&dept), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["assignedTo"], "Electrical Services Team");
    assert_eq!(assigned["status"], "Pending");

    let (status, _) = send(&app, Method::PUT, &uri, Some(&dept), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_is_a_noop_for_unknown_ids() {
    let app = app().await;
    let (citizen, auth) = login(&app, "u4@city.org").await;
    let (_, created) = send(&app, Method::POST, "/api/complaints", Some(&citizen), Some(broken_light())).await;
    let id = created["id"].as_str().unwrap();

    let unknown = format!("/api/complaints/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, Method::DELETE, &unknown, Some(&citizen), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &unknown, Some(&citizen), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/complaints/{id}"), Some(&citizen), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, mine) = send(&app, Method::GET, "/api/complaints/mine", Some(&citizen), None).await;
    assert!(mine.as_array().unwrap().is_empty());
    assert!(auth["user"]["availability"].is_null());
}

#[tokio::test]
async fn details_include_capabilities() {
    let app = app().await;
    let (citizen, _) = login(&app, "u5@city.org").await;
    let (_, created) = send(&app, Method::POST, "/api/complaints", Some(&citizen), Some(broken_light())).await;
    let uri = format!("/api/complaints/{}", created["id"].as_str().unwrap());

    let (_, own) = send(&app, Method::GET, &uri, Some(&citizen), None).await;
    assert_eq!(own["permissions"]["canEdit"], true);
    assert_eq!(own["permissions"]["canChangeStatus"], false);
    assert_eq!(own["title"], "Broken light");

    let (stranger, _) = login(&app, "u6@city.org").await;
    let (status, _) = send(&app, Method::GET, &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (agent, _) = login(&app, "agent@example.com").await;
    let (_, seen) = send(&app, Method::GET, &uri, Some(&agent), None).await;
    assert_eq!(seen["permissions"]["allowedStatuses"], json!(["In Progress"]));
}

#[tokio::test]
async fn provider_must_leave_notes_when_resolving() {
    let app = app().await;
    let (citizen, _) = login(&app, "u7@city.org").await;
    let (_, created) = send(&app, Method::POST, "/api/complaints", Some(&citizen), Some(broken_light())).await;
    let id = created["id"].as_str().unwrap();

    let (admin, _) = login(&app, "admin@example.com").await;
    send(
        &app,
        Method::PUT,
        &format!("/api/complaints/{id}/assignment"),
        Some(&admin),
        Some(json!({ "assignedProvider": "Electrical Provider" })),
    )
    .await;

    let (provider, _) = login(&app, "electrical.provider@example.com").await;
    let uri = format!("/api/complaints/{id}/status");
    let (status, _) = send(&app, Method::PATCH, &uri, Some(&provider), Some(json!({ "status": "In Progress" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::PATCH, &uri, Some(&provider), Some(json!({ "status": "Resolved" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, done) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(&provider),
        Some(json!({ "status": "Resolved", "notes": "Replaced the bulb" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["resolutionNotes"], "Replaced the bulb");
}

#[tokio::test]
async fn role_gates() {
    let app = app().await;

    let (status, _) = send(&app, Method::GET, "/api/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/admin/login",
        None,
        Some(json!({ "email": "agent@example.com", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (agent, _) = login(&app, "agent@example.com").await;
    let (status, _) = send(&app, Method::POST, "/api/complaints", Some(&agent), Some(broken_light())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::GET, "/api/admin/dashboard", Some(&agent), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, me) = send(
        &app,
        Method::PUT,
        "/api/users/me/availability",
        Some(&agent),
        Some(json!({ "available": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["availability"], false);

    let (citizen, _) = login(&app, "user@example.com").await;
    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/users/me/availability",
        Some(&citizen),
        Some(json!({ "available": false })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (admin, _) = login(&app, "admin@example.com").await;
    let (status, dashboard) = send(&app, Method::GET, "/api/admin/dashboard?status=Pending", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["title"], "Admin Dashboard");
    assert!(dashboard["complaints"].as_array().unwrap().iter().all(|c| c["status"] == "Pending"));
}

#[tokio::test]
async fn validation_and_translated_errors() {
    let app = app().await;
    let (citizen, _) = login(&app, "u8@city.org").await;

    let mut bad = broken_light();
    bad["title"] = json!("  ");
    bad["location"]["lat"] = json!(120.0);
    let (status, body) = send(&app, Method::POST, "/api/complaints", Some(&citizen), Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["title"].is_array());
    assert!(body["details"]["location.lat"].is_array());

    let request = Request::builder()
        .uri(format!("/api/complaints/{}", uuid::Uuid::new_v4()))
        .header(header::AUTHORIZATION, format!("Bearer {}", citizen))
        .header(header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Reclamação não encontrada.");
}

#[tokio::test]
async fn registration_and_categories() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "Ana", "email": "ana@city.org", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "user");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "Ana", "email": "ana@city.org", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "ana@city.org", "password": "wrong-one" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, categories) = send(&app, Method::GET, "/api/complaints/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories.as_array().unwrap().len(), 6);
    assert_eq!(categories[0], json!({ "value": "pothole", "label": "Pothole" }));
}

#[tokio::test]
async fn photos_up_to_the_image_limit_are_accepted() {
    let app = app().await;
    let (citizen, _) = login(&app, "u9@city.org").await;

    // 3 MiB de base64, bem acima do limite padrão do axum
    let mut with_photo = broken_light();
    with_photo["imageUrl"] = json!(format!("data:image/png;base64,{}", "A".repeat(3 * 1024 * 1024)));
    let (status, body) = send(&app, Method::POST, "/api/complaints", Some(&citizen), Some(with_photo)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["imageUrl"].as_str().unwrap().starts_with("data:image/png;base64,"));

    let mut too_big = broken_light();
    too_big["imageUrl"] = json!(format!("data:image/png;base64,{}", "A".repeat(9 * 1024 * 1024)));
    let (status, body) = send(&app, Method::POST, "/api/complaints", Some(&citizen), Some(too_big)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unreadable_bodies_get_a_translated_json_error() {
    let app = app().await;
    let (citizen, _) = login(&app, "u10@city.org").await;

    let mut fire = broken_light();
    fire["category"] = json!("fire");
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/complaints")
        .header(header::AUTHORIZATION, format!("Bearer {}", citizen))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT_LANGUAGE, "pt-BR")
        .body(Body::from(fire.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "O corpo da requisição é inválido.");
    assert!(body["details"]["category"][0].as_str().unwrap().contains("fire"));

    // Sem Content-Type de JSON
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"email":"a@b.c","password":"x"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["details"]["content-type"].is_array());

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/complaints/{}/status", uuid::Uuid::new_v4()),
        Some(&citizen),
        Some(json!({ "status": "Done" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["status"].is_array());
}
