//! API integration tests against a server on the in-memory backend

use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};

use toolcrib_server::{
    api,
    config::{AppConfig, StorageBackend},
    services::Services,
    AppState,
};

const SECRET: &str = "s3cret";

struct TestServer {
    base_url: String,
    client: Client,
    handle: tokio::task::JoinHandle<()>,
}

/// Who sends a request
enum As<'a> {
    Guest,
    Employee(&'a str),
    Admin(&'a str),
}

impl TestServer {
    async fn spawn() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = StorageBackend::Memory;
        config.auth.admin_secret = SECRET.to_string();

        let services = Services::in_memory(&config);
        let app = api::router(AppState {
            config: Arc::new(config),
            services: Arc::new(services),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api/v1", addr),
            client: Client::new(),
            handle,
        }
    }

    async fn send(&self, method: Method, path: &str, who: As<'_>, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match who {
            As::Guest => {}
            As::Employee(name) => request = request.header("x-actor", name),
            As::Admin(name) => {
                request = request
                    .header("x-actor", name)
                    .header("x-admin-secret", SECRET)
            }
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.expect("Failed to send request");
        let status = response.status();
        let text = response.text().await.expect("Failed to read response");
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).expect("Failed to parse response")
        };
        (status, value)
    }

    async fn create_tool(&self, name: &str, category: &str, quantity: i32) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/tools",
                As::Admin("Boss"),
                Some(json!({ "name": name, "category": category, "quantity": quantity })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::spawn().await;
    let (status, body) = server.send(Method::GET, "/health", As::Guest, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
}

#[tokio::test]
async fn test_categories_in_display_order() {
    let server = TestServer::spawn().await;
    let (status, body) = server.send(Method::GET, "/categories", As::Guest, None).await;

    assert_eq!(status, StatusCode::OK);
    let categories = body.as_array().unwrap();
    assert_eq!(categories.len(), 11);
    assert_eq!(categories[0]["name"], "Power Tools");
    assert_eq!(categories[7]["kind"], "text_log");
}

#[tokio::test]
async fn test_checkout_until_exhausted() {
    let server = TestServer::spawn().await;
    let id = server.create_tool("Ladder 8ft", "Ladders", 2).await;
    let path = format!("/tools/{}/checkout", id);

    for name in ["Alice", "Bob"] {
        let (status, body) = server.send(Method::POST, &path, As::Employee(name), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["action"], "check_out");
        assert_eq!(body["actor_name"], name);
    }

    let (status, body) = server.send(Method::POST, &path, As::Employee("Carol"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "NoUnitsAvailable");

    let (_, tool) = server
        .send(Method::GET, &format!("/tools/{}", id), As::Guest, None)
        .await;
    assert_eq!(tool["available"], 0);
    assert_eq!(tool["outstanding"], 2);
    assert_eq!(tool["holders"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_guest_cannot_check_out() {
    let server = TestServer::spawn().await;
    let id = server.create_tool("Drill", "Power Tools", 1).await;

    let (status, body) = server
        .send(Method::POST, &format!("/tools/{}/checkout", id), As::Guest, None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_checkin_rules() {
    let server = TestServer::spawn().await;
    let id = server.create_tool("Sander", "Power Tools", 1).await;
    let checkin = format!("/tools/{}/checkin", id);

    server
        .send(Method::POST, &format!("/tools/{}/checkout", id), As::Employee("Alice"), None)
        .await;

    let (status, _) = server.send(Method::POST, &checkin, As::Employee("Bob"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = server
        .send(
            Method::POST,
            &checkin,
            As::Employee("Bob"),
            Some(json!({ "on_behalf_of": "Alice" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server.send(Method::POST, &checkin, As::Admin("Boss"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["actor_name"], "Alice");
    assert_eq!(body["recorded_by"], "Boss");

    let (_, tool) = server
        .send(Method::GET, &format!("/tools/{}", id), As::Guest, None)
        .await;
    assert_eq!(tool["available"], 1);
}

#[tokio::test]
async fn test_return_all_and_my_tools() {
    let server = TestServer::spawn().await;
    let cords = server.create_tool("25ft Cord", "Extension Cords", 5).await;
    let fan = server.create_tool("Box Fan", "Vacuums / Fans", 1).await;

    for _ in 0..3 {
        server
            .send(Method::POST, &format!("/tools/{}/checkout", cords), As::Employee("Dana"), None)
            .await;
    }
    server
        .send(Method::POST, &format!("/tools/{}/checkout", fan), As::Employee("Dana"), None)
        .await;

    let (status, mine) = server.send(Method::GET, "/me/tools", As::Employee("Dana"), None).await;
    assert_eq!(status, StatusCode::OK);
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0]["name"], "25ft Cord");
    assert_eq!(mine[0]["units_held"], 3);

    let (status, events) = server
        .send(
            Method::POST,
            &format!("/tools/{}/return-all", cords),
            As::Employee("Dana"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.as_array().unwrap().len(), 3);

    let (_, mine) = server.send(Method::GET, "/me/tools", As::Employee("Dana"), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (_, guest) = server.send(Method::GET, "/me/tools", As::Guest, None).await;
    assert!(guest.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_wrong_admin_secret_is_refused() {
    let server = TestServer::spawn().await;

    let response = server
        .client
        .post(format!("{}/tools", server.base_url))
        .header("x-actor", "Mallory")
        .header("x-admin-secret", "guess")
        .json(&json!({ "name": "Saw", "category": "Hand Tools", "quantity": 1 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_tool_in_use() {
    let server = TestServer::spawn().await;
    let id = server.create_tool("Hammer", "Hand Tools", 1).await;
    server
        .send(Method::POST, &format!("/tools/{}/checkout", id), As::Employee("Alice"), None)
        .await;

    let (status, body) = server
        .send(Method::DELETE, &format!("/tools/{}", id), As::Admin("Boss"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ToolInUse");

    let (status, _) = server
        .send(
            Method::DELETE,
            &format!("/tools/{}?delete_history=true", id),
            As::Admin("Boss"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = server
        .send(Method::GET, &format!("/tools/{}", id), As::Guest, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_within_category() {
    let server = TestServer::spawn().await;
    server.create_tool("Circular Saw", "Power Tools", 1).await;
    server.create_tool("Impact Driver", "Power Tools", 1).await;

    let (status, body) = server
        .send(
            Method::GET,
            "/categories/Power%20Tools/tools?search=saw",
            As::Guest,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let tools = body.as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "Circular Saw");
}

#[tokio::test]
async fn test_text_log() {
    let server = TestServer::spawn().await;
    let path = "/categories/Extra%20Material/log";

    let (status, _) = server
        .send(Method::POST, path, As::Guest, Some(json!({ "entry": "tape" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, entry) = server
        .send(
            Method::POST,
            path,
            As::Employee("Eve"),
            Some(json!({ "entry": "3 rolls of tape" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["actor_name"], "Eve");

    let (status, entries) = server.send(Method::GET, path, As::Guest, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entries.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_roster_and_activity_need_admin() {
    let server = TestServer::spawn().await;
    let eve = json!({ "name": "Eve" });

    let (status, _) = server
        .send(Method::POST, "/employees", As::Employee("Dana"), Some(eve.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = server
        .send(Method::POST, "/employees", As::Admin("Boss"), Some(eve))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, roster) = server.send(Method::GET, "/employees", As::Guest, None).await;
    assert_eq!(roster[0]["name"], "Eve");
    assert!(roster[0].get("pin").is_none());

    let (status, _) = server
        .send(Method::DELETE, "/employees/Nobody", As::Admin("Boss"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server.send(Method::GET, "/activity", As::Employee("Dana"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let id = server.create_tool("Shop Vac", "Vacuums / Fans", 1).await;
    server
        .send(Method::POST, &format!("/tools/{}/checkout", id), As::Employee("Eve"), None)
        .await;
    let (status, log) = server
        .send(Method::GET, "/activity?limit=10", As::Admin("Boss"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(log[0]["tool_name"], "Shop Vac");
    assert_eq!(log[0]["action"], "check_out");
}

#[tokio::test]
async fn test_checkin_rejects_malformed_body() {
    let server = TestServer::spawn().await;
    let id = server.create_tool("Planer", "Power Tools", 1).await;
    server
        .send(Method::POST, &format!("/tools/{}/checkout", id), As::Employee("Alice"), None)
        .await;

    let (status, body) = server
        .send(
            Method::POST,
            &format!("/tools/{}/checkin", id),
            As::Employee("Alice"),
            Some(json!({ "on_behalf_of": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (_, tool) = server
        .send(Method::GET, &format!("/tools/{}", id), As::Guest, None)
        .await;
    assert_eq!(tool["available"], 0);
}

#[tokio::test]
async fn test_admin_checkin_with_several_holders_names_one() {
    let server = TestServer::spawn().await;
    let id = server.create_tool("Clamp", "Hand Tools", 2).await;
    let checkin = format!("/tools/{}/checkin", id);
    for name in ["Alice", "Bob"] {
        server
            .send(Method::POST, &format!("/tools/{}/checkout", id), As::Employee(name), None)
            .await;
    }

    let (status, _) = server.send(Method::POST, &checkin, As::Admin("Boss"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .send(
            Method::POST,
            &checkin,
            As::Admin("Boss"),
            Some(json!({ "on_behalf_of": "Bob" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["actor_name"], "Bob");

    let (_, tool) = server
        .send(Method::GET, &format!("/tools/{}", id), As::Guest, None)
        .await;
    assert_eq!(tool["available"], 1);
    assert_eq!(tool["holders"].as_array().unwrap().len(), 1);
}
