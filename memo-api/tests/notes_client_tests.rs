use chrono::NaiveDate;
use memo_api::{Client, MemoApiError};
use memo_auth::{AuthClient, Credential, CredentialStore};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn logged_in_client(server: &MockServer, tmp: &TempDir) -> Client {
    let store = CredentialStore::in_dir(tmp.path()).unwrap();
    store
        .save(&Credential {
            access_token: "tok123".to_string(),
            token_type: "bearer".to_string(),
        })
        .unwrap();

    Client::new(server.uri(), AuthClient::new(server.uri(), store))
}

fn anonymous_client(server: &MockServer, tmp: &TempDir) -> Client {
    let store = CredentialStore::in_dir(tmp.path()).unwrap();
    Client::new(server.uri(), AuthClient::new(server.uri(), store))
}

fn note_json(id: i64, title: &str, content: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "content": content,
        "created_at": "2024-05-01T10:00:00",
        "updated_at": null,
    })
}

#[tokio::test]
async fn test_list_notes_sends_bearer_header() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/notes/"))
        .and(header("authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            note_json(1, "Groceries", "milk, eggs"),
            note_json(2, "Ideas", ""),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, &tmp);
    let notes = client.list_notes().await.unwrap();

    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id, 1);
    assert_eq!(notes[0].title, "Groceries");
    assert_eq!(
        notes[0].created_at,
        Some(
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        )
    );
    assert_eq!(notes[0].updated_at, None);
}

#[tokio::test]
async fn test_create_note_posts_json_body() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/notes/"))
        .and(header("authorization", "Bearer tok123"))
        .and(body_partial_json(json!({
            "title": "Groceries",
            "content": "milk, eggs",
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(note_json(7, "Groceries", "milk, eggs")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, &tmp);
    let note = client.create_note("Groceries", "milk, eggs").await.unwrap();

    // The server owns the id
    assert_eq!(note.id, 7);
    assert_eq!(note.content, "milk, eggs");
}

#[tokio::test]
async fn test_get_note_fetches_single_note() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/notes/7"))
        .and(header("authorization", "Bearer tok123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(note_json(7, "Groceries", "milk, eggs")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, &tmp);
    let note = client.get_note(7).await.unwrap();

    assert_eq!(note.id, 7);
    assert_eq!(note.title, "Groceries");
}

#[tokio::test]
async fn test_delete_note_succeeds_on_no_content() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    Mock::given(method("DELETE"))
        .and(path("/notes/7"))
        .and(header("authorization", "Bearer tok123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = logged_in_client(&server, &tmp);
    client.delete_note(7).await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_note_is_an_api_error() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    Mock::given(method("DELETE"))
        .and(path("/notes/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Note not found",
        })))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, &tmp);
    let err = client.delete_note(99).await.unwrap_err();

    match err {
        MemoApiError::Api(status, detail) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(detail, "Note not found");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_requests_pass_status_through_unchanged() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/notes/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Not authenticated",
        })))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, &tmp);
    let err = client.list_notes().await.unwrap_err();

    // No retry, no credential surgery: the caller sees exactly what the
    // server said
    match err {
        MemoApiError::Api(status, detail) => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(detail, "Not authenticated");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_anonymous_requests_carry_no_auth_header() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    // Matched only if an Authorization header slips through
    Mock::given(method("GET"))
        .and(path("/notes/"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/notes/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Not authenticated",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server, &tmp);
    let err = client.list_notes().await.unwrap_err();

    match err {
        MemoApiError::Api(status, _) => assert_eq!(status.as_u16(), 401),
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_without_json_body_keeps_raw_text() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/notes/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = logged_in_client(&server, &tmp);
    let err = client.list_notes().await.unwrap_err();

    match err {
        MemoApiError::Api(status, detail) => {
            assert_eq!(status.as_u16(), 502);
            assert_eq!(detail, "bad gateway");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}
