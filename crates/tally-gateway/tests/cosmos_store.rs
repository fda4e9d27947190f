//! Document store client against an in-process fake of the REST API.
//!
//! The fake checks master-key signatures and partition key headers, and
//! returns documents decorated with system fields like the real service.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use dashmap::DashMap;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use tally_core::{CounterRecord, KeyedCounterStore, Lookup, StoreCatalog, TallyError};
use tally_gateway::config::StoreSection;
use tally_gateway::services::{CounterService, LikeKey, LikesService};
use tally_gateway::store::cosmos::auth::master_key_token;
use tally_gateway::store::{self, ConnectionString, CosmosClient};

const KEY: &[u8] = b"fake-master-key";
const SETTING: &str = "CosmosDbConnectionString";

#[derive(Clone, Default)]
struct Fake {
    docs: Arc<DashMap<(String, String), Value>>,
}

fn reject(status: StatusCode, code: &str) -> Response {
    (status, Json(json!({ "code": code, "message": format!("fake: {code}") }))).into_response()
}

const CONTAINERS: [&str; 2] = ["Counter", "Likes"];

/// What the service answers when the addressed container does not exist.
fn missing_container() -> Response {
    let mut resp = reject(StatusCode::NOT_FOUND, "NotFound");
    resp.headers_mut().insert("x-ms-substatus", HeaderValue::from_static("1003"));
    resp
}

fn authorized(headers: &HeaderMap, method: &Method, resource_type: &str, link: &str) -> bool {
    let (Some(date), Some(auth)) = (headers.get("x-ms-date"), headers.get("authorization")) else {
        return false;
    };
    let date = date.to_str().unwrap();
    let expected = master_key_token(method.as_str(), resource_type, link, date, KEY).unwrap();
    headers.get("x-ms-version").is_some() && auth.to_str().unwrap() == expected
}

fn partition_key_matches(headers: &HeaderMap, id: &str) -> bool {
    headers
        .get("x-ms-documentdb-partitionkey")
        .map(|v| v.to_str().unwrap() == serde_json::to_string(&[id]).unwrap())
        .unwrap_or(false)
}

fn with_system_fields(mut doc: Value) -> Value {
    doc["_rid"] = json!("AAAAAA==");
    doc["_etag"] = json!("\"00000000-0000-0000-0000-000000000000\"");
    doc["_ts"] = json!(1_700_000_000);
    doc
}

async fn list_colls(method: Method, headers: HeaderMap, Path(db): Path<String>) -> Response {
    if !authorized(&headers, &method, "colls", &format!("dbs/{db}")) {
        return reject(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    Json(json!({
        "_rid": "AAAA",
        "DocumentCollections": [{ "id": "Counter", "_rid": "x" }, { "id": "Likes", "_rid": "y" }],
        "_count": 2
    }))
    .into_response()
}

async fn read_doc(
    State(fake): State<Fake>,
    method: Method,
    headers: HeaderMap,
    Path((db, coll, id)): Path<(String, String, String)>,
) -> Response {
    if !authorized(&headers, &method, "docs", &format!("dbs/{db}/colls/{coll}/docs/{id}")) {
        return reject(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if !partition_key_matches(&headers, &id) {
        return reject(StatusCode::BAD_REQUEST, "BadRequest");
    }
    if !CONTAINERS.contains(&coll.as_str()) {
        return missing_container();
    }
    if id == "flaky" {
        return reject(StatusCode::SERVICE_UNAVAILABLE, "ServiceUnavailable");
    }
    match fake.docs.get(&(coll, id)) {
        Some(doc) => Json(with_system_fields(doc.value().clone())).into_response(),
        None => reject(StatusCode::NOT_FOUND, "NotFound"),
    }
}

async fn write_doc(
    State(fake): State<Fake>,
    method: Method,
    headers: HeaderMap,
    Path((db, coll)): Path<(String, String)>,
    Json(doc): Json<Value>,
) -> Response {
    if !authorized(&headers, &method, "docs", &format!("dbs/{db}/colls/{coll}")) {
        return reject(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    if !CONTAINERS.contains(&coll.as_str()) {
        return missing_container();
    }
    let id = doc["id"].as_str().unwrap().to_string();
    if !partition_key_matches(&headers, &id) {
        return reject(StatusCode::BAD_REQUEST, "BadRequest");
    }
    let upsert = headers
        .get("x-ms-documentdb-is-upsert")
        .map(|v| v == "True")
        .unwrap_or(false);

    let slot = (coll, id);
    if !upsert && fake.docs.contains_key(&slot) {
        return reject(StatusCode::CONFLICT, "Conflict");
    }
    let status = if fake.docs.insert(slot, doc.clone()).is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    (status, Json(with_system_fields(doc))).into_response()
}

async fn spawn_fake(fake: Fake) -> String {
    let app = Router::new()
        .route("/dbs/:db/colls", get(list_colls))
        .route("/dbs/:db/colls/:coll/docs", post(write_doc))
        .route("/dbs/:db/colls/:coll/docs/:id", get(read_doc))
        .with_state(fake);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn connection_string(base: &str, key: &[u8]) -> String {
    format!("AccountEndpoint={base}/;AccountKey={};", STANDARD.encode(key))
}

fn client(base: &str) -> CosmosClient {
    let conn = ConnectionString::parse(&connection_string(base, KEY), SETTING).unwrap();
    CosmosClient::new(conn, "ResumeDB").unwrap()
}

#[tokio::test]
async fn read_missing_document_is_not_found() {
    let base = spawn_fake(Fake::default()).await;
    let likes = client(&base).container("Likes");
    assert_eq!(likes.get("post-42").await.unwrap(), Lookup::NotFound);
}

#[tokio::test]
async fn create_read_upsert_roundtrip() {
    let fake = Fake::default();
    let base = spawn_fake(fake.clone()).await;
    let counter = client(&base).container("Counter");

    let created = counter.create(CounterRecord::first("visitor-count")).await.unwrap();
    assert_eq!(created, CounterRecord::new("visitor-count", 1));

    let Lookup::Found(mut rec) = counter.get("visitor-count").await.unwrap() else {
        panic!("expected document");
    };
    assert_eq!(rec.count, 1);
    rec.increment();
    counter.upsert(rec).await.unwrap();

    // System fields are never written back.
    let slot = ("Counter".to_string(), "visitor-count".to_string());
    let stored = fake.docs.get(&slot).unwrap().clone();
    assert_eq!(stored, json!({ "id": "visitor-count", "count": 2 }));
}

#[tokio::test]
async fn create_conflict_is_store_error() {
    let base = spawn_fake(Fake::default()).await;
    let likes = client(&base).container("Likes");
    likes.create(CounterRecord::first("p")).await.unwrap();

    let err = likes.create(CounterRecord::first("p")).await.unwrap_err();
    assert!(matches!(&err, TallyError::Store(m) if m.contains("409") && m.contains("Conflict")));
}

#[tokio::test]
async fn transient_failure_is_not_a_miss() {
    let base = spawn_fake(Fake::default()).await;
    let likes = client(&base).container("Likes");

    let err = likes.get("flaky").await.unwrap_err();
    assert!(matches!(&err, TallyError::Store(m) if m.contains("503")));

    // The service must not reset the counter on a failed read.
    let svc = LikesService::new(Arc::new(likes));
    assert!(svc.increment(&LikeKey::parse(Some("flaky")).unwrap()).await.is_err());
}

#[tokio::test]
async fn missing_container_is_not_a_miss() {
    let base = spawn_fake(Fake::default()).await;
    let likez = client(&base).container("Likez");

    let err = likez.get("p").await.unwrap_err();
    assert!(matches!(&err, TallyError::Store(m) if m.contains("404") && m.contains("1003")));

    let svc = LikesService::new(Arc::new(likez));
    let k = LikeKey::parse(Some("p")).unwrap();
    assert!(matches!(svc.get(&k).await, Err(TallyError::Store(_))));
    assert!(matches!(svc.increment(&k).await, Err(TallyError::Store(_))));
}

#[tokio::test]
async fn misnamed_container_in_config_fails_reads() {
    let base = spawn_fake(Fake::default()).await;
    let cs = connection_string(&base, KEY);
    let cfg = StoreSection {
        likes_container: "Likez".into(),
        ..StoreSection::default()
    };
    let backend = store::connect(&cfg, Some(&cs)).unwrap();

    let svc = LikesService::new(backend.likes.clone());
    let err = svc.get(&LikeKey::parse(Some("post-42")).unwrap()).await.unwrap_err();
    assert_eq!(err.client_code().as_str(), "STORE");
}

#[tokio::test]
async fn wrong_key_is_store_error() {
    let base = spawn_fake(Fake::default()).await;
    let conn = ConnectionString::parse(&connection_string(&base, b"other-key"), SETTING).unwrap();
    let likes = CosmosClient::new(conn, "ResumeDB").unwrap().container("Likes");

    let err = likes.get("p").await.unwrap_err();
    assert!(matches!(&err, TallyError::Store(m) if m.contains("401")));
}

#[tokio::test]
async fn unreachable_endpoint_is_store_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&base).container("Likes").get("p").await.unwrap_err();
    assert!(matches!(err, TallyError::Store(_)));
}

#[tokio::test]
async fn describe_lists_collections() {
    let base = spawn_fake(Fake::default()).await;
    let info = client(&base).describe().await.unwrap();
    assert_eq!(info.database, "ResumeDB");
    assert_eq!(info.collections, vec!["Counter".to_string(), "Likes".to_string()]);
}

#[tokio::test]
async fn ids_with_spaces_are_encoded_and_signed() {
    let base = spawn_fake(Fake::default()).await;
    let svc = LikesService::new(Arc::new(client(&base).container("Likes")));
    let k = LikeKey::parse(Some("my first post")).unwrap();

    assert_eq!(svc.get(&k).await.unwrap(), 0);
    assert_eq!(svc.increment(&k).await.unwrap(), 1);
    assert_eq!(svc.increment(&k).await.unwrap(), 2);
    assert_eq!(svc.get(&k).await.unwrap(), 2);
}

#[tokio::test]
async fn configured_backend_drives_visitor_counter() {
    let base = spawn_fake(Fake::default()).await;
    let cs = connection_string(&base, KEY);
    let backend = store::connect(&StoreSection::default(), Some(&cs)).unwrap();

    let svc = CounterService::new(backend.visitors.clone());
    assert_eq!(svc.increment().await.unwrap(), 1);
    assert_eq!(svc.increment().await.unwrap(), 2);
    assert_eq!(svc.increment().await.unwrap(), 3);

    let info = backend.catalog.describe().await.unwrap();
    assert_eq!(info.collections.len(), 2);
}
