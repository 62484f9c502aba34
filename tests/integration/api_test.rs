//! REST client integration tests
//!
//! Request shapes and error mapping of the API wrappers.

use crate::common::*;
use assert_matches::assert_matches;
use boardsync::client::ClientError;
use boardsync::shared::models::{NewCard, UserLogin};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn credentials() -> UserLogin {
    UserLogin {
        username: "alice".to_string(),
        password: "secret".to_string(),
        remember_me: None,
    }
}

#[tokio::test]
async fn test_login_sends_credentials_and_keeps_cookie() {
    let mock = MockBoardServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "session=abc; Path=/"))
        .expect(1)
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/claims"))
        .and(header("cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&mock.server)
        .await;

    let session = mock.session();
    let user = crate::assert_ok!(session.login(&credentials()).await);

    assert_eq!(user.username, "alice");
    assert!(session.store().read().await.auth.is_logged_in());
}

#[tokio::test]
async fn test_unauthorized_maps_to_unauthenticated() {
    let mock = MockBoardServer::start().await;
    mock.respond_status("GET", "/user/claims", 401).await;

    let session = mock.session();
    let result = session.load_user().await;

    assert_matches!(result, Err(ClientError::Unauthenticated));
    assert!(!session.store().read().await.auth.is_logged_in());
}

#[tokio::test]
async fn test_server_error_keeps_status_and_body() {
    let mock = MockBoardServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/board"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&mock.server)
        .await;

    let result = mock.session().api().get_boards().await;

    assert_matches!(result, Err(ClientError::Http { status: 500, ref body }) if body == "database unavailable");
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let mock = MockBoardServer::start().await;
    mock.respond_json("GET", "/board/1", json!({"id": "one"})).await;

    let result = mock.session().api().get_board(1).await;

    assert_matches!(result, Err(ClientError::Decode { ref url, .. }) if url.ends_with("/api/board/1"));
}

#[tokio::test]
async fn test_post_card_targets_its_list() {
    let mock = MockBoardServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/list/4/card"))
        .and(body_json(json!({"list_id": 4, "title": "Write docs"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(card_json(9, 4, 0)))
        .expect(1)
        .mount(&mock.server)
        .await;

    let card = mock
        .session()
        .api()
        .post_card(&NewCard {
            list_id: 4,
            title: "Write docs".to_string(),
            position: None,
        })
        .await
        .unwrap();

    assert_eq!(card.id, 9);
    assert_eq!(card.list_id, 4);
}

#[tokio::test]
async fn test_card_order_is_posted_as_id_array() {
    let mock = MockBoardServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/list/1/card-order"))
        .and(body_json(json!([3, 1, 2])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock.server)
        .await;

    crate::assert_ok!(mock.session().api().update_cards_order(1, &[3, 1, 2]).await);
}

#[tokio::test]
async fn test_activities_decode_comments_and_naive_timestamps() {
    let mock = MockBoardServer::start().await;
    mock.respond_json(
        "GET",
        "/card/2/activities",
        json!([{
            "id": 7,
            "card_id": 2,
            "user_id": 10,
            "activity_on": "2024-05-02 08:15:00",
            "event": 3,
            "comment": {"id": 70, "card_id": 2, "comment": "Looks good"},
        }]),
    )
    .await;

    let activities = mock.session().api().get_card_activities(2).await.unwrap();

    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].comment().map(|c| c.comment.as_str()), Some("Looks good"));
    assert_eq!(activities[0].activity_on.to_rfc3339(), "2024-05-02T08:15:00+00:00");
}
