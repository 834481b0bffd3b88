//! HTTP contract integration tests
//!
//! Runs `HttpSightingApi` against a wiremock server to pin down:
//! - request paths, methods and bodies
//! - status code to error mapping
//! - session cookie handling

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sighting_client::{
    Coordinates, CredentialToken, HttpSightingApi, ServerConfig, SightingApi, SightingError,
    SightingId,
};

fn api_for(server: &MockServer) -> HttpSightingApi {
    HttpSightingApi::new(&ServerConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    })
    .expect("client builds")
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_list_sightings_decodes_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a1", "lat": 35.68, "lng": 139.76, "timestamp": "2024-05-01 10:00:00", "user_id": "u1"},
            {"id": 7, "lat": 43.06, "lng": 141.35, "timestamp": "2024-05-02 11:30:00", "user_id": "u2"}
        ])))
        .mount(&server)
        .await;

    let sightings = api_for(&server).list_sightings().await.unwrap();

    assert_eq!(sightings.len(), 2);
    assert_eq!(sightings[0].id, SightingId::from("a1"));
    assert_eq!(sightings[0].reporter_id.as_str(), "u1");
    // Integer ids from older data sets are normalized to strings
    assert_eq!(sightings[1].id, SightingId::from("7"));
    assert_eq!(sightings[1].coordinates(), Coordinates::new(43.06, 141.35));
}

#[tokio::test]
async fn test_list_sightings_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = api_for(&server).list_sightings().await.unwrap_err();

    match err {
        SightingError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_sightings_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = api_for(&server).list_sightings().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_check_login_signed_out_with_null_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/check_login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"logged_in": false, "user_id": null})),
        )
        .mount(&server)
        .await;

    let status = api_for(&server).check_login().await.unwrap();

    assert!(!status.logged_in);
    assert!(status.user_id.is_none());
}

#[tokio::test]
async fn test_check_login_signed_in() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/check_login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"logged_in": true, "user_id": "u1"})),
        )
        .mount(&server)
        .await;

    let status = api_for(&server).check_login().await.unwrap();

    assert!(status.logged_in);
    assert_eq!(status.user_id.unwrap().as_str(), "u1");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let server = MockServer::start().await;
    let api = api_for(&server);
    drop(server);

    let err = api.list_sightings().await.unwrap_err();
    assert!(err.is_transport());
}

// =============================================================================
// Session
// =============================================================================

#[tokio::test]
async fn test_login_posts_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"token": "jwt-abc"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server)
        .login(&CredentialToken::new("jwt-abc"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid token"})))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .login(&CredentialToken::new("bad"))
        .await
        .unwrap_err();

    assert!(matches!(err, SightingError::LoginRejected { status: 400 }));
}

#[tokio::test]
async fn test_session_cookie_is_sent_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc123; Path=/")
                .set_body_json(json!({"status": "success"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/check_login"))
        .and(header("cookie", "session=abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"logged_in": true, "user_id": "u1"})),
        )
        .mount(&server)
        .await;

    let api = api_for(&server);
    api.login(&CredentialToken::new("jwt")).await.unwrap();
    let status = api.check_login().await.unwrap();

    assert!(status.logged_in);
}

#[tokio::test]
async fn test_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).logout().await.unwrap();
}

// =============================================================================
// Writes
// =============================================================================

#[tokio::test]
async fn test_create_sighting() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/locations"))
        .and(body_json(json!({"lat": 35.0, "lng": 139.0})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "42", "lat": 35.0, "lng": 139.0, "timestamp": "T", "user_id": "u1"
        })))
        .mount(&server)
        .await;

    let sighting = api_for(&server)
        .create_sighting(Coordinates::new(35.0, 139.0))
        .await
        .unwrap();

    assert_eq!(sighting.id, SightingId::from("42"));
    assert_eq!(sighting.timestamp, "T");
    assert_eq!(sighting.reporter_id.as_str(), "u1");
}

#[tokio::test]
async fn test_create_without_session_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/locations"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .create_sighting(Coordinates::new(35.0, 139.0))
        .await
        .unwrap_err();

    assert!(matches!(err, SightingError::Unauthorized));
}

#[tokio::test]
async fn test_delete_owned() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/locations/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).delete_sighting(&"1".into()).await.unwrap();
}

#[tokio::test]
async fn test_delete_forbidden_is_authorization_denied() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/locations/2"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "Forbidden"})))
        .mount(&server)
        .await;

    let err = api_for(&server).delete_sighting(&"2".into()).await.unwrap_err();

    match err {
        SightingError::AuthorizationDenied(id) => assert_eq!(id.as_str(), "2"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_missing_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/locations/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Location not found"})))
        .mount(&server)
        .await;

    let err = api_for(&server).delete_sighting(&"99".into()).await.unwrap_err();

    assert!(matches!(err, SightingError::Server { status: 404, .. }));
}

#[tokio::test]
async fn test_delete_id_is_path_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/locations/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).delete_sighting(&"a/b".into()).await.unwrap();
}
