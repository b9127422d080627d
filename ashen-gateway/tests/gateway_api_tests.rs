//! End-to-end tests for the gateway
//!
//! The REST backend is a real ashen-rest instance on an in-memory database;
//! the SOAP backend is a stub. A backend that is "down" is pointed at a port
//! nobody listens on.

mod helpers;

use axum::http::StatusCode;
use serde_json::{json, Value};

use helpers::{spawn_rest_backend, spawn_soap_stub, TestGateway, UNREACHABLE_URL};

fn rels(links: &Value) -> Vec<&str> {
    links
        .as_array()
        .expect("links should be an array")
        .iter()
        .map(|l| l["rel"].as_str().unwrap())
        .collect()
}

async fn create_character(gateway: &TestGateway, name: &str, level: i64) -> Value {
    let (status, body) = gateway
        .post(
            "/api/gateway/characters",
            json!({"name": name, "level": level}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["data"].clone()
}

async fn create_guild(gateway: &TestGateway, name: &str, leader: &str) -> Value {
    let (status, body) = gateway
        .post(
            "/api/gateway/guilds",
            json!({"name": name, "description": "Praise the sun", "leader": leader}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create guild failed: {}", body);
    body["data"].clone()
}

// =============================================================================
// Index, health, fallback
// =============================================================================

#[tokio::test]
async fn test_index_lists_entry_points() {
    let gateway = TestGateway::new(UNREACHABLE_URL, UNREACHABLE_URL);
    let (status, body) = gateway.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Ashen Network API Gateway");
    assert!(rels(&body["links"]).contains(&"dashboard"));
    assert!(rels(&body["links"]).contains(&"docs"));
}

#[tokio::test]
async fn test_health_with_both_backends_down() {
    let gateway = TestGateway::new(UNREACHABLE_URL, UNREACHABLE_URL);
    let (status, body) = gateway.get("/api/gateway/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gateway"], "running");
    assert_eq!(body["services"]["rest"], "disconnected");
    assert_eq!(body["services"]["soap"], "disconnected");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_with_both_backends_up() {
    let (gateway, _soap) = TestGateway::with_backends().await;
    let (status, body) = gateway.get("/api/gateway/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["rest"], "connected");
    assert_eq!(body["services"]["soap"], "connected");
    assert_eq!(rels(&body["links"])[0], "self");
    assert!(rels(&body["links"]).contains(&"docs"));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let gateway = TestGateway::new(UNREACHABLE_URL, UNREACHABLE_URL);
    let (status, body) = gateway.get("/api/gateway/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_wrong_method_is_json_405() {
    let gateway = TestGateway::new(UNREACHABLE_URL, UNREACHABLE_URL);
    let (status, body) = gateway.get("/api/gateway/guilds/join").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
    assert!(rels(&body["links"]).contains(&"guilds"));
}

#[tokio::test]
async fn test_openapi_document_lists_gateway_paths() {
    let gateway = TestGateway::new(UNREACHABLE_URL, UNREACHABLE_URL);
    let (status, body) = gateway.get("/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Ashen Network API Gateway");
    let paths = body["paths"].as_object().unwrap();
    for p in [
        "/api/gateway/health",
        "/api/gateway/characters",
        "/api/gateway/characters/{id}",
        "/api/gateway/guilds",
        "/api/gateway/guilds/join",
        "/api/gateway/dashboard",
    ] {
        assert!(paths.contains_key(p), "missing {}", p);
    }
    assert!(paths["/api/gateway/characters"]["post"].is_object());
}

// =============================================================================
// Characters
// =============================================================================

#[tokio::test]
async fn test_create_then_list_includes_character_once() {
    let (gateway, _soap) = TestGateway::with_backends().await;

    let created = create_character(&gateway, "Solaire", 50).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Solaire");
    assert_eq!(rels(&created["links"]), vec!["self", "items", "join-guild"]);

    let (status, body) = gateway.get("/api/gateway/characters").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "REST API");

    let matches: Vec<&Value> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["id"].as_i64() == Some(id))
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(
        matches[0]["links"][0]["href"],
        format!("/api/gateway/characters/{}", id)
    );
}

#[tokio::test]
async fn test_level_out_of_range_creates_nothing() {
    let (gateway, _soap) = TestGateway::with_backends().await;

    for level in [0, 100] {
        let (status, body) = gateway
            .post(
                "/api/gateway/characters",
                json!({"name": "Hollow", "level": level}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "level {}", level);
        assert_eq!(body["links"][0]["method"], "POST");
    }

    let (_, body) = gateway.get("/api/gateway/characters").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_character_missing_fields() {
    let (gateway, _soap) = TestGateway::with_backends().await;

    let (status, body) = gateway
        .post("/api/gateway/characters", json!({"name": "Siegmeyer"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name and level are required");
}

#[tokio::test]
async fn test_characters_with_rest_down_is_500() {
    let soap = spawn_soap_stub().await;
    let gateway = TestGateway::new(UNREACHABLE_URL, &soap.url);

    let (status, body) = gateway.get("/api/gateway/characters").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch characters from REST API");
    assert_eq!(rels(&body["links"]), vec!["retry", "health"]);
}

#[tokio::test]
async fn test_get_character_and_unknown_character() {
    let (gateway, _soap) = TestGateway::with_backends().await;
    let created = create_character(&gateway, "Siegward", 30).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = gateway
        .get(&format!("/api/gateway/characters/{}", id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Siegward");

    let (status, _) = gateway.get("/api/gateway/characters/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = gateway.get("/api/gateway/characters/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_character_items_for_unknown_character_is_404() {
    let (gateway, _soap) = TestGateway::with_backends().await;

    let (status, body) = gateway.get("/api/gateway/characters/42/items").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Character or items not found");
}

#[tokio::test]
async fn test_empty_inventory() {
    let (gateway, _soap) = TestGateway::with_backends().await;
    let created = create_character(&gateway, "Laurentius", 12).await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = gateway
        .get(&format!("/api/gateway/characters/{}/items", id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["character"], "Laurentius");
    assert_eq!(body["data"]["items"], json!([]));
    assert_eq!(rels(&body["links"]), vec!["self", "character", "add-item"]);
}

#[tokio::test]
async fn test_add_item_requires_item_id_and_known_item() {
    let (gateway, _soap) = TestGateway::with_backends().await;
    let created = create_character(&gateway, "Logan", 70).await;
    let uri = format!("/api/gateway/characters/{}/items", created["id"]);

    let (status, _) = gateway.post(&uri, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = gateway.post(&uri, json!({"item_id": 777})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Guilds
// =============================================================================

#[tokio::test]
async fn test_guilds_with_soap_down_is_503() {
    let rest_url = spawn_rest_backend().await;
    let gateway = TestGateway::new(&rest_url, UNREACHABLE_URL);

    for uri in [
        "/api/gateway/guilds",
        "/api/gateway/guilds/1",
        "/api/gateway/guilds/1/members",
    ] {
        let (status, body) = gateway.get(uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{}", uri);
        assert_eq!(body["error"], "SOAP service unavailable");
    }

    let (status, _) = gateway
        .post(
            "/api/gateway/guilds/join",
            json!({"guild_id": 1, "character_name": "Solaire"}),
        )
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_create_and_list_guilds() {
    let (gateway, _soap) = TestGateway::with_backends().await;

    let guild = create_guild(&gateway, "Warriors of Sunlight", "Solaire").await;
    assert_eq!(guild["leader"], "Solaire");
    assert_eq!(guild["member_count"], 1);
    assert_eq!(rels(&guild["links"]), vec!["self", "members", "all-guilds"]);

    let (status, body) = gateway.get("/api/gateway/guilds").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "SOAP Service");
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], "Warriors of Sunlight");
    assert!(data[0].get("members").is_none());
    assert_eq!(rels(&data[0]["links"]), vec!["self", "members", "join"]);
}

#[tokio::test]
async fn test_create_guild_name_collision_is_400() {
    let (gateway, soap) = TestGateway::with_backends().await;
    create_guild(&gateway, "Darkwraiths", "Kaathe").await;

    let (status, body) = gateway
        .post(
            "/api/gateway/guilds",
            json!({"name": "Darkwraiths", "description": "again", "leader": "Someone"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"], "Guild name already exists");
    assert_eq!(soap.guild_count(), 1);
}

#[tokio::test]
async fn test_create_guild_missing_fields() {
    let (gateway, soap) = TestGateway::with_backends().await;

    let (status, _) = gateway
        .post("/api/gateway/guilds", json!({"name": "Blades", "leader": "  "}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(soap.guild_count(), 0);
}

#[tokio::test]
async fn test_get_guild_and_unknown_guild() {
    let (gateway, _soap) = TestGateway::with_backends().await;
    let guild = create_guild(&gateway, "Forest Hunters", "Alvina").await;

    let (status, body) = gateway
        .get(&format!("/api/gateway/guilds/{}", guild["id"]))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Forest Hunters");

    let (status, body) = gateway.get("/api/gateway/guilds/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Guild not found");
}

#[tokio::test]
async fn test_guild_lookup_without_guild_is_404() {
    let (gateway, soap) = TestGateway::with_backends().await;
    let guild = create_guild(&gateway, "Darkwraiths", "Kaathe").await;
    soap.empty_lookups();

    let (status, body) = gateway
        .get(&format!("/api/gateway/guilds/{}", guild["id"]))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Guild not found");
    assert!(!body["links"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_success_status_without_fault_is_data() {
    let (gateway, soap) = TestGateway::with_backends().await;
    create_guild(&gateway, "Channelers", "Seath").await;
    soap.answer_with_status(StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = gateway.get("/api/gateway/guilds").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "SOAP Service");
    assert_eq!(body["data"][0]["name"], "Channelers");
}

#[tokio::test]
async fn test_join_twice_second_is_400() {
    let (gateway, _soap) = TestGateway::with_backends().await;
    let guild = create_guild(&gateway, "Blue Sentinels", "Darkmoon").await;
    let request = json!({"guild_id": guild["id"], "character_name": "Oscar"});

    let (status, body) = gateway.post("/api/gateway/guilds/join", request.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Character Oscar joined guild successfully");
    assert_eq!(rels(&body["links"]), vec!["guild", "members"]);

    let (status, body) = gateway.post("/api/gateway/guilds/join", request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Character already in guild");
}

#[tokio::test]
async fn test_join_unknown_guild_is_404() {
    let (gateway, _soap) = TestGateway::with_backends().await;

    let (status, body) = gateway
        .post(
            "/api/gateway/guilds/join",
            json!({"guild_id": "404", "character_name": "Oscar"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Guild not found");
}

#[tokio::test]
async fn test_join_requires_fields() {
    let (gateway, _soap) = TestGateway::with_backends().await;

    let (status, body) = gateway
        .post("/api/gateway/guilds/join", json!({"guild_id": 1}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "guild_id and character_name are required");
}

#[tokio::test]
async fn test_guild_members_after_join() {
    let (gateway, _soap) = TestGateway::with_backends().await;
    let guild = create_guild(&gateway, "Chaos Servants", "Eingyi").await;
    let id = guild["id"].as_i64().unwrap();
    gateway
        .post(
            "/api/gateway/guilds/join",
            json!({"guild_id": id, "character_name": "Quelana"}),
        )
        .await;

    let (status, body) = gateway
        .get(&format!("/api/gateway/guilds/{}/members", id))
        .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["character_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Eingyi", "Quelana"]);
    assert_eq!(
        body["data"][1]["links"][0]["href"],
        format!("/api/gateway/guilds/{}", id)
    );
}

#[tokio::test]
async fn test_include_members_reports_per_guild_failure() {
    let (gateway, soap) = TestGateway::with_backends().await;
    let healthy = create_guild(&gateway, "Way of White", "Petrus").await;
    let broken = create_guild(&gateway, "Gravelord Servants", "Nito").await;
    soap.break_members(broken["id"].as_i64().unwrap());

    let (status, body) = gateway.get("/api/gateway/guilds?include=members").await;
    assert_eq!(status, StatusCode::OK);

    let data = body["data"].as_array().unwrap();
    let find = |id: &Value| data.iter().find(|g| &g["id"] == id).unwrap();

    let ok = find(&healthy["id"]);
    assert_eq!(ok["members"][0]["character_name"], "Petrus");
    assert!(ok.get("members_error").is_none());

    let failed = find(&broken["id"]);
    assert!(failed.get("members").is_none());
    assert!(failed["members_error"]
        .as_str()
        .unwrap()
        .contains("database is locked"));
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn test_dashboard_with_soap_down() {
    let rest_url = spawn_rest_backend().await;
    let gateway = TestGateway::new(&rest_url, UNREACHABLE_URL);
    for i in 1..=7 {
        create_character(&gateway, &format!("Knight {}", i), i).await;
    }

    let (status, body) = gateway.get("/api/gateway/dashboard").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["data"]["characters"]["count"], 7);
    assert_eq!(body["data"]["characters"]["list"].as_array().unwrap().len(), 5);
    assert!(body["data"]["characters"].get("error").is_none());

    assert_eq!(body["data"]["guilds"]["error"], "SOAP Service unavailable");
    assert!(body["data"]["guilds"].get("count").is_none());
    assert!(body["data"]["guilds"].get("list").is_none());

    assert_eq!(body["sources"], json!(["REST API"]));
}

#[tokio::test]
async fn test_dashboard_with_rest_down() {
    let soap = spawn_soap_stub().await;
    let gateway = TestGateway::new(UNREACHABLE_URL, &soap.url);
    create_guild(&gateway, "Princess Guard", "Gwynevere").await;

    let (status, body) = gateway.get("/api/gateway/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["characters"]["error"], "REST API unavailable");
    assert_eq!(body["data"]["guilds"]["count"], 1);
    assert_eq!(
        body["data"]["guilds"]["list"][0],
        json!({"id": 1, "name": "Princess Guard"})
    );
    assert_eq!(body["sources"], json!(["SOAP Service"]));
}

#[tokio::test]
async fn test_dashboard_with_both_up_lists_sources_in_order() {
    let (gateway, _soap) = TestGateway::with_backends().await;

    let (status, body) = gateway.get("/api/gateway/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["characters"]["count"], 0);
    assert_eq!(body["data"]["guilds"]["count"], 0);
    assert_eq!(body["sources"], json!(["REST API", "SOAP Service"]));
}
