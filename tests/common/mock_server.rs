//! Mock board server for integration tests
//!
//! Wraps a wiremock [`MockServer`] and builds sessions pointed at it.

use boardsync::client::{Config, Session};
use boardsync::shared::config::AppConfig;
use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct MockBoardServer {
    pub server: MockServer,
}

impl MockBoardServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn config(&self) -> Config {
        self.config_with_timeout(Duration::from_secs(5))
    }

    pub fn config_with_timeout(&self, request_timeout: Duration) -> Config {
        Config::with_builder(
            AppConfig::builder()
                .server_url(self.server.uri())
                .request_timeout(request_timeout)
                .max_reconnect_delay(Duration::from_secs(1)),
        )
        .expect("mock server config")
    }

    pub fn session(&self) -> Session {
        Session::new(self.config()).expect("session")
    }

    /// A session whose REST requests time out after `request_timeout`
    pub fn session_with_timeout(&self, request_timeout: Duration) -> Session {
        Session::new(self.config_with_timeout(request_timeout)).expect("session")
    }

    /// Answer `verb` on `/api{route}` with a JSON body
    pub async fn respond_json(&self, verb: &str, route: &str, body: Value) {
        Mock::given(method(verb))
            .and(path(format!("/api{}", route)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `verb` on `/api{route}` with a bare status
    pub async fn respond_status(&self, verb: &str, route: &str, status: u16) {
        Mock::given(method(verb))
            .and(path(format!("/api{}", route)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Serve a board snapshot together with its claims, roles and members
    pub async fn serve_board(&self, board: Value) {
        let board_id = board["id"].as_i64().unwrap_or_default();
        let role = serde_json::json!({
            "id": 1,
            "name": "Admin",
            "is_admin": true,
            "permissions": [],
        });
        self.respond_json("GET", &format!("/board/{}", board_id), board).await;
        self.respond_json(
            "GET",
            &format!("/board/{}/claims", board_id),
            serde_json::json!({
                "id": 5,
                "board_id": board_id,
                "is_owner": true,
                "user_id": 10,
                "role": role,
            }),
        )
        .await;
        self.respond_json("GET", &format!("/board/{}/roles", board_id), serde_json::json!([role]))
            .await;
        self.respond_json("GET", &format!("/board/{}/member", board_id), serde_json::json!([]))
            .await;
    }
}
