use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use jutsudex::config::Config;
use tower::ServiceExt;

/// Default API key seeded by migration (must match m20240102_add_users.rs)
const DEFAULT_API_KEY: &str = "jutsudex_default_api_key_please_regenerate";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;

    let state = jutsudex::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    jutsudex::api::router(state).await
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    // Middleware rejections are plain text, not the JSON envelope.
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    payload: Option<serde_json::Value>,
    api_key: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref());
    if let Some(key) = api_key {
        builder = builder.header("X-Api-Key", key);
    }

    let body = payload.map_or_else(Body::empty, |p| Body::from(p.to_string()));

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    (status, body_json(response).await)
}

fn rasengan() -> serde_json::Value {
    serde_json::json!({
        "name": "Rasengan",
        "description": "A spinning sphere of chakra held in the palm.",
        "element": "wind",
        "category": "offensive",
        "rank": "A"
    })
}

async fn total_count(app: &Router) -> u64 {
    let (status, body) = send_json(app, "GET", "/api/jutsus", None, None).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["total"].as_u64().unwrap()
}

#[tokio::test]
async fn test_mutations_require_auth() {
    let app = spawn_app().await;

    let (status, _) = send_json(&app, "POST", "/api/jutsus", Some(rasengan()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/jutsus",
        Some(rasengan()),
        Some("wrong-key"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(total_count(&app).await, 0);

    // Same payload succeeds once authenticated, and the count moves.
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/jutsus",
        Some(rasengan()),
        Some(DEFAULT_API_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Rasengan");

    assert_eq!(total_count(&app).await, 1);
}

#[tokio::test]
async fn test_reads_are_anonymous() {
    let app = spawn_app().await;

    let (status, _) = send_json(&app, "GET", "/api/jutsus", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, "GET", "/api/dashboard", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, "GET", "/api/home", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = spawn_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/jutsus",
        Some(rasengan()),
        Some(DEFAULT_API_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send_json(&app, "GET", &format!("/api/jutsus/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["name"], "Rasengan");
    assert_eq!(
        data["description"],
        "A spinning sphere of chakra held in the palm."
    );
    assert_eq!(data["element"], "wind");
    assert_eq!(data["element_display"], "Wind");
    assert_eq!(data["category"], "offensive");
    assert_eq!(data["rank"], "A");
    assert_eq!(data["rank_display"], "Rank A");
    assert!(data["image"].is_null());
    assert_eq!(data["created_at"], data["updated_at"]);
}

#[tokio::test]
async fn test_create_applies_defaults() {
    let app = spawn_app().await;

    let payload = serde_json::json!({
        "name": "Shadow Clone Technique",
        "description": "Creates tangible copies of the caster."
    });

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/jutsus",
        Some(payload),
        Some(DEFAULT_API_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["element"], "other");
    assert_eq!(body["data"]["category"], "supplementary");
    assert_eq!(body["data"]["rank"], "C");
}

#[tokio::test]
async fn test_duplicate_name_is_conflict() {
    let app = spawn_app().await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/jutsus",
        Some(rasengan()),
        Some(DEFAULT_API_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/jutsus",
        Some(rasengan()),
        Some(DEFAULT_API_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["fields"][0]["field"], "name");

    // The losing create must not change the record count.
    assert_eq!(total_count(&app).await, 1);
}

#[tokio::test]
async fn test_validation_reports_per_field_errors() {
    let app = spawn_app().await;

    let payload = serde_json::json!({
        "name": "Bogus",
        "description": "Something",
        "element": "plasma",
        "rank": "Z"
    });

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/jutsus",
        Some(payload),
        Some(DEFAULT_API_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"element"));
    assert!(fields.contains(&"rank"));

    // Empty name and description are rejected too.
    let payload = serde_json::json!({ "name": "", "description": "  " });
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/jutsus",
        Some(payload),
        Some(DEFAULT_API_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"description"));
}

async fn seed(app: &Router, name: &str, description: &str, element: &str, category: &str, rank: &str) {
    let payload = serde_json::json!({
        "name": name,
        "description": description,
        "element": element,
        "category": category,
        "rank": rank
    });
    let (status, _) = send_json(app, "POST", "/api/jutsus", Some(payload), Some(DEFAULT_API_KEY)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_search_matches_name_or_description() {
    let app = spawn_app().await;

    seed(&app, "Chidori", "A blade of lightning chakra.", "lightning", "offensive", "A").await;
    seed(
        &app,
        "Raikiri",
        "A refined form of the chidori that once cut lightning.",
        "lightning",
        "offensive",
        "S",
    )
    .await;
    seed(&app, "Mud Wall", "A defensive wall of earth.", "earth", "defensive", "C").await;

    // Case-insensitive, matching either column.
    let (status, body) = send_json(&app, "GET", "/api/jutsus?search=CHIDORI", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Chidori", "Raikiri"]);
}

#[tokio::test]
async fn test_filters_combine_conjunctively() {
    let app = spawn_app().await;

    seed(&app, "Fireball", "A ball of flame.", "fire", "offensive", "C").await;
    seed(&app, "Fire Armor", "A cloak of flame.", "fire", "defensive", "B").await;
    seed(&app, "Water Bullet", "A ball of water.", "water", "offensive", "C").await;

    let (status, body) = send_json(
        &app,
        "GET",
        "/api/jutsus?element=fire&type=offensive",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Fireball");

    // Search composes with the exact-match axes.
    let (_, body) = send_json(
        &app,
        "GET",
        "/api/jutsus?search=ball&element=water",
        None,
        None,
    )
    .await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Water Bullet");
}

#[tokio::test]
async fn test_unknown_filter_tag_is_rejected() {
    let app = spawn_app().await;

    let (status, _) = send_json(&app, "GET", "/api/jutsus?element=plasma", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(&app, "GET", "/api/jutsus?ordering=bogus", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_default_ordering_is_name_ascending() {
    let app = spawn_app().await;

    seed(&app, "Water Prison", "Traps a target in water.", "water", "support", "B").await;
    seed(&app, "Chidori", "A blade of lightning chakra.", "lightning", "offensive", "A").await;
    seed(&app, "Mud Wall", "A defensive wall of earth.", "earth", "defensive", "C").await;

    let (_, body) = send_json(&app, "GET", "/api/jutsus", None, None).await;
    let names: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Chidori", "Mud Wall", "Water Prison"]);
}

#[tokio::test]
async fn test_rank_ordering_follows_declaration_order() {
    let app = spawn_app().await;

    seed(&app, "Kirin", "Lightning drawn from a storm.", "lightning", "offensive", "SS").await;
    seed(&app, "Basic Clone", "An intangible duplicate.", "illusion", "supplementary", "E").await;
    seed(&app, "Summoning", "Calls a bound creature.", "other", "supplementary", "A").await;
    seed(&app, "Flicker", "A burst of speed.", "other", "supplementary", "S").await;

    let (_, body) = send_json(&app, "GET", "/api/jutsus?ordering=rank", None, None).await;
    let ranks: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["rank"].as_str().unwrap())
        .collect();
    // E before A before S before SS; "SS" after "S" despite string order quirks elsewhere.
    assert_eq!(ranks, ["E", "A", "S", "SS"]);
}

#[tokio::test]
async fn test_pagination_and_out_of_range_page() {
    let app = spawn_app().await;

    for i in 0..5 {
        seed(
            &app,
            &format!("Technique {i:02}"),
            "Filler scroll entry.",
            "other",
            "supplementary",
            "D",
        )
        .await;
    }

    let (_, body) = send_json(&app, "GET", "/api/jutsus?page=1&page_size=2", None, None).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["total"], 5);
    assert_eq!(body["data"]["total_pages"], 3);

    let (_, body) = send_json(&app, "GET", "/api/jutsus?page=3&page_size=2", None, None).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    // Past the end: an empty page, not an error.
    let (status, body) =
        send_json(&app, "GET", "/api/jutsus?page=99&page_size=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_update_refreshes_updated_at_only() {
    let app = spawn_app().await;

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/jutsus",
        Some(rasengan()),
        Some(DEFAULT_API_KEY),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();
    let created_at = body["data"]["created_at"].as_str().unwrap().to_string();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let patch = serde_json::json!({ "rank": "S" });
    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/api/jutsus/{id}"),
        Some(patch),
        Some(DEFAULT_API_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["rank"], "S");
    // Untouched fields survive a partial update.
    assert_eq!(data["name"], "Rasengan");
    assert_eq!(data["element"], "wind");
    assert_eq!(data["created_at"], created_at.as_str());

    let created = chrono::DateTime::parse_from_rfc3339(&created_at).unwrap();
    let updated =
        chrono::DateTime::parse_from_rfc3339(data["updated_at"].as_str().unwrap()).unwrap();
    assert!(updated > created);
}

#[tokio::test]
async fn test_rename_to_existing_name_is_conflict() {
    let app = spawn_app().await;

    seed(&app, "Chidori", "A blade of lightning chakra.", "lightning", "offensive", "A").await;
    let (_, body) = send_json(
        &app,
        "POST",
        "/api/jutsus",
        Some(rasengan()),
        Some(DEFAULT_API_KEY),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let patch = serde_json::json!({ "name": "Chidori" });
    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/jutsus/{id}"),
        Some(patch),
        Some(DEFAULT_API_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["fields"][0]["field"], "name");
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let app = spawn_app().await;

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/jutsus",
        Some(rasengan()),
        Some(DEFAULT_API_KEY),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/jutsus/{id}"),
        None,
        Some(DEFAULT_API_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, "GET", &format!("/api/jutsus/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/jutsus/{id}"),
        None,
        Some(DEFAULT_API_KEY),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_aggregations() {
    let app = spawn_app().await;

    seed(&app, "Fireball", "A ball of flame.", "fire", "offensive", "C").await;
    seed(&app, "Flame Whip", "A lash of flame.", "fire", "offensive", "B").await;
    seed(&app, "Ash Cloud", "A smothering cloud.", "fire", "supplementary", "B").await;
    seed(&app, "Water Bullet", "A ball of water.", "water", "offensive", "E").await;

    let (status, body) = send_json(&app, "GET", "/api/dashboard", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["total"], 4);
    assert_eq!(data["distinct_elements"], 2);

    // Most common element first.
    let elements = data["elements"].as_array().unwrap();
    assert_eq!(elements[0]["tag"], "fire");
    assert_eq!(elements[0]["count"], 3);
    assert_eq!(elements[1]["tag"], "water");
    assert_eq!(elements[1]["count"], 1);

    // Ranks come back in declaration order, not count order.
    let ranks: Vec<&str> = data["ranks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["tag"].as_str().unwrap())
        .collect();
    assert_eq!(ranks, ["E", "C", "B"]);

    // Recent list is newest first.
    let recent = data["recent"].as_array().unwrap();
    assert_eq!(recent[0]["name"], "Water Bullet");
}

#[tokio::test]
async fn test_home_highlights() {
    let app = spawn_app().await;

    seed(&app, "Fireball", "A ball of flame.", "fire", "offensive", "C").await;
    seed(&app, "Water Bullet", "A ball of water.", "water", "offensive", "E").await;
    seed(&app, "Kirin", "Lightning drawn from a storm.", "lightning", "offensive", "SS").await;

    let (status, body) = send_json(&app, "GET", "/api/home", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["total"], 3);
    assert_eq!(data["latest"].as_array().unwrap().len(), 3);
    assert_eq!(data["fire_picks"].as_array().unwrap().len(), 1);
    assert_eq!(data["fire_picks"][0]["name"], "Fireball");
    assert_eq!(data["water_picks"].as_array().unwrap().len(), 1);
    assert_eq!(data["high_rank_picks"].as_array().unwrap().len(), 1);
    assert_eq!(data["high_rank_picks"][0]["name"], "Kirin");
}

#[tokio::test]
async fn test_login_flow() {
    let app = spawn_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        Some(serde_json::json!({ "username": "admin", "password": "password" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "admin");
    assert_eq!(body["data"]["api_key"], DEFAULT_API_KEY);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        Some(serde_json::json!({ "username": "admin", "password": "wrong" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ui_shell_is_served() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("Jutsudex"));
}
