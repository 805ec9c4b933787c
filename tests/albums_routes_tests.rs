use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use recordings::config::DatabaseConfig;
use recordings::db::{AlbumStorage, SqliteAlbums};
use recordings::router::{RecordingsState, recordings_router};
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

struct TestApp {
    app: Router,
    albums: SqliteAlbums,
    path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = self.path.clone().into_os_string();
            sidecar.push(suffix);
            let _ = fs::remove_file(sidecar);
        }
    }
}

async fn spawn_app(label: &str) -> TestApp {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut path = std::env::temp_dir();
    path.push(format!(
        "recordings-{label}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite://{}", path.display());
    let cfg = DatabaseConfig {
        url: Some(database_url.clone()),
        ..DatabaseConfig::default()
    };
    let storage = AlbumStorage::open(&cfg)
        .await
        .expect("failed to open sqlite storage");
    assert_eq!(storage.backend(), "sqlite");

    let albums = SqliteAlbums::connect(&database_url, Duration::from_secs(5))
        .await
        .expect("failed to open second handle");

    let app = recordings_router(RecordingsState::new(storage));
    TestApp { app, albums, path }
}

async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.expect("request failed")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

fn post_json(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/albums")
        .header("content-type", "application/json")
        .body(body.into())
        .expect("failed to build request")
}

async fn body_bytes(resp: Response) -> Vec<u8> {
    to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body")
        .to_vec()
}

async fn body_json(resp: Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).expect("response body was not json")
}

fn location(resp: &Response) -> String {
    resp.headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .expect("Location was not ascii")
        .to_string()
}

#[tokio::test]
async fn list_on_empty_table_returns_empty_array() {
    let t = spawn_app("empty").await;

    let resp = send(&t.app, get("/albums")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));
}

#[tokio::test]
async fn created_album_can_be_fetched_by_location() {
    let t = spawn_app("roundtrip").await;

    let resp = send(
        &t.app,
        post_json(r#"{"title":"Blue Train","artist":"John Coltrane","price":56.99}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let loc = location(&resp);
    assert!(loc.starts_with("/albums/"));
    assert_eq!(body_bytes(resp).await, b"null");

    let resp = send(&t.app, get(&loc)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
    let body = body_json(resp).await;
    let id: i64 = loc.trim_start_matches("/albums/").parse().unwrap();
    assert!(id > 0);
    assert_eq!(
        body,
        json!({"id": id, "title": "Blue Train", "artist": "John Coltrane", "price": 56.99})
    );
}

#[tokio::test]
async fn responses_are_indented_with_four_spaces() {
    let t = spawn_app("indent").await;
    send(
        &t.app,
        post_json(r#"{"title":"Jeru","artist":"Gerry Mulligan","price":17.99}"#),
    )
    .await;

    let resp = send(&t.app, get("/albums")).await;
    let text = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(text.starts_with("[\n    {\n        \"id\": "));
    assert!(text.contains("\n        \"title\": \"Jeru\",\n"));
}

#[tokio::test]
async fn unknown_id_returns_404() {
    let t = spawn_app("missing").await;

    for uri in ["/albums/4242", "/albums/not-a-number"] {
        let resp = send(&t.app, get(uri)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await, json!({"message": "album not found"}));
    }
}

#[tokio::test]
async fn malformed_body_returns_500_without_insert() {
    let t = spawn_app("malformed").await;

    for payload in [
        r#"{"title": 123}"#,
        r#"{"title":"Blue Train","artist":"John Co"#,
        r#"{"price":"cheap"}"#,
    ] {
        let resp = send(&t.app, post_json(payload)).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await, json!({"message": "error adding album"}));
    }

    assert_eq!(t.albums.count().await.unwrap(), 0);
}

#[tokio::test]
async fn body_is_decoded_regardless_of_content_type() {
    let t = spawn_app("content-type").await;
    let payload = r#"{"title":"Blue Train","artist":"John Coltrane","price":56.99}"#;

    let no_content_type = Request::builder()
        .method("POST")
        .uri("/albums")
        .body(Body::from(payload))
        .unwrap();
    let resp = send(&t.app, no_content_type).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let text_plain = Request::builder()
        .method("POST")
        .uri("/albums")
        .header("content-type", "text/plain")
        .body(Body::from(payload))
        .unwrap();
    let resp = send(&t.app, text_plain).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let loc = location(&resp);

    let body = body_json(send(&t.app, get(&loc)).await).await;
    assert_eq!(body["title"], "Blue Train");
    assert_eq!(body["price"], 56.99);
    assert_eq!(t.albums.count().await.unwrap(), 2);
}

#[tokio::test]
async fn null_fields_are_stored_as_zero_values() {
    let t = spawn_app("null-fields").await;

    let resp = send(
        &t.app,
        post_json(r#"{"title":"Jeru","artist":null,"price":null}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let loc = location(&resp);

    let body = body_json(send(&t.app, get(&loc)).await).await;
    assert_eq!(body["title"], "Jeru");
    assert_eq!(body["artist"], "");
    assert_eq!(body["price"], 0.0);
}

async fn drop_album_table(t: &TestApp) {
    sqlx::query("DROP TABLE album")
        .execute(t.albums.pool())
        .await
        .expect("failed to drop album table");
}

#[tokio::test]
async fn list_query_failure_returns_500() {
    let t = spawn_app("list-failure").await;
    let resp = send(
        &t.app,
        post_json(r#"{"title":"Jeru","artist":"Gerry Mulligan","price":17.99}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    drop_album_table(&t).await;

    let resp = send(&t.app, get("/albums")).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await, json!({"message": "error getting albums"}));
}

#[tokio::test]
async fn lookup_query_failure_returns_500_not_empty_album() {
    let t = spawn_app("get-failure").await;
    drop_album_table(&t).await;

    let resp = send(&t.app, get("/albums/1")).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await, json!({"message": "error getting album"}));
}

#[tokio::test]
async fn insert_failure_returns_500() {
    let t = spawn_app("insert-failure").await;
    drop_album_table(&t).await;

    let resp = send(
        &t.app,
        post_json(r#"{"title":"Blue Train","artist":"John Coltrane","price":56.99}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.headers().get(header::LOCATION).is_none());
    assert_eq!(body_json(resp).await, json!({"message": "error adding album"}));
}

#[tokio::test]
async fn client_supplied_id_is_ignored() {
    let t = spawn_app("client-id").await;

    let resp = send(
        &t.app,
        post_json(r#"{"id":999,"title":"Giant Steps","artist":"John Coltrane","price":63.99}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_ne!(location(&resp), "/albums/999");

    let resp = send(&t.app, get("/albums/999")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let listed = body_json(send(&t.app, get("/albums")).await).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["title"], "Giant Steps");
}

#[tokio::test]
async fn concurrent_posts_get_distinct_ids() {
    let t = spawn_app("concurrent").await;
    const N: usize = 8;

    let tasks: Vec<_> = (0..N)
        .map(|i| {
            let app = t.app.clone();
            tokio::spawn(async move {
                let body = json!({
                    "title": format!("Album {i}"),
                    "artist": format!("Artist {i}"),
                    "price": 10.5 + i as f64,
                });
                let resp = app
                    .oneshot(post_json(body.to_string()))
                    .await
                    .expect("request failed");
                assert_eq!(resp.status(), StatusCode::CREATED);
                location(&resp)
            })
        })
        .collect();

    let mut locations = Vec::with_capacity(N);
    for task in tasks {
        locations.push(task.await.expect("task panicked"));
    }
    locations.sort();
    locations.dedup();
    assert_eq!(locations.len(), N);

    let listed = body_json(send(&t.app, get("/albums")).await).await;
    let mut titles: Vec<String> = listed
        .as_array()
        .expect("expected an array")
        .iter()
        .map(|a| a["title"].as_str().unwrap().to_string())
        .collect();
    titles.sort();
    let mut expected: Vec<String> = (0..N).map(|i| format!("Album {i}")).collect();
    expected.sort();
    assert_eq!(titles, expected);
}

#[tokio::test]
async fn unsupported_method_is_rejected() {
    let t = spawn_app("method").await;

    let req = Request::builder()
        .method("DELETE")
        .uri("/albums/1")
        .body(Body::empty())
        .unwrap();
    let resp = send(&t.app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
