//! Document database REST client (Cosmos DB SQL API dialect).
//!
//! Every container used here is partitioned by `/id`, so the partition key of a
//! record is its id. Only HTTP 404 on a document read counts as a miss; any
//! other non-success reply is a store failure.

pub mod auth;
pub mod connection;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use tally_core::error::{Result, TallyError};
use tally_core::{CounterRecord, KeyedCounterStore, Lookup, StoreCatalog, StoreInfo};

pub use connection::ConnectionString;

/// Database-scoped client. Cheap to clone.
#[derive(Clone)]
pub struct CosmosClient {
    http: reqwest::Client,
    endpoint: Arc<str>,
    key: Arc<[u8]>,
    database: Arc<str>,
}

impl CosmosClient {
    pub fn new(conn: ConnectionString, database: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TallyError::Internal(format!("http client init failed: {e}")))?;
        Ok(Self {
            http,
            endpoint: conn.endpoint.into(),
            key: conn.key.into(),
            database: database.into(),
        })
    }

    pub fn container(&self, name: &str) -> CosmosContainer {
        CosmosContainer {
            client: self.clone(),
            name: name.to_string(),
            link: format!("dbs/{}/colls/{}", self.database, name),
        }
    }

    /// Start a signed request. `path` is the encoded URL path, `link` the
    /// unencoded resource link the signature covers.
    fn signed(
        &self,
        method: Method,
        path: &str,
        resource_type: &str,
        link: &str,
    ) -> Result<RequestBuilder> {
        let date = auth::request_date();
        let token =
            auth::master_key_token(method.as_str(), resource_type, link, &date, &self.key)?;
        Ok(self
            .http
            .request(method, format!("{}/{}", self.endpoint, path))
            .header("authorization", token)
            .header("x-ms-date", date)
            .header("x-ms-version", auth::API_VERSION)
            .header("accept", "application/json"))
    }
}

#[derive(Debug, Deserialize)]
struct CollectionList {
    #[serde(rename = "DocumentCollections", default)]
    collections: Vec<CollectionRef>,
}

#[derive(Debug, Deserialize)]
struct CollectionRef {
    id: String,
}

#[async_trait]
impl StoreCatalog for CosmosClient {
    async fn describe(&self) -> Result<StoreInfo> {
        let link = format!("dbs/{}", self.database);
        let path = format!("dbs/{}/colls", urlencoding::encode(&self.database));
        let req = self.signed(Method::GET, &path, "colls", &link)?;
        let resp = send(req, "list collections").await?;
        let resp = expect_success(resp, "list collections").await?;

        let list: CollectionList = resp
            .json()
            .await
            .map_err(|e| TallyError::Store(format!("list collections: malformed reply: {e}")))?;

        Ok(StoreInfo {
            database: self.database.to_string(),
            collections: list.collections.into_iter().map(|c| c.id).collect(),
        })
    }
}

/// One container holding counter documents.
#[derive(Clone)]
pub struct CosmosContainer {
    client: CosmosClient,
    name: String,
    /// `dbs/{db}/colls/{coll}`
    link: String,
}

impl CosmosContainer {
    fn collection_path(&self) -> String {
        format!(
            "dbs/{}/colls/{}",
            urlencoding::encode(&self.client.database),
            urlencoding::encode(&self.name)
        )
    }

    async fn write(&self, record: CounterRecord, upsert: bool) -> Result<CounterRecord> {
        let what = if upsert { "upsert" } else { "create" };
        let path = format!("{}/docs", self.collection_path());
        let mut req = self
            .client
            .signed(Method::POST, &path, "docs", &self.link)?
            .header("x-ms-documentdb-partitionkey", partition_key(&record.id)?)
            .json(&record);
        if upsert {
            req = req.header("x-ms-documentdb-is-upsert", "True");
        }

        let resp = expect_success(send(req, what).await?, what).await?;
        resp.json()
            .await
            .map_err(|e| TallyError::Store(format!("{what} {}: malformed reply: {e}", self.name)))
    }
}

#[async_trait]
impl KeyedCounterStore for CosmosContainer {
    async fn get(&self, key: &str) -> Result<Lookup> {
        let path = format!("{}/docs/{}", self.collection_path(), urlencoding::encode(key));
        let link = format!("{}/docs/{}", self.link, key);
        let req = self
            .client
            .signed(Method::GET, &path, "docs", &link)?
            .header("x-ms-documentdb-partitionkey", partition_key(key)?);

        let resp = send(req, "read").await?;
        if is_document_miss(&resp) {
            tracing::debug!(container = %self.name, key = %key, "document not found");
            return Ok(Lookup::NotFound);
        }

        let resp = expect_success(resp, "read").await?;
        let rec: CounterRecord = resp
            .json()
            .await
            .map_err(|e| {
                TallyError::Store(format!("read {}: malformed document: {e}", self.name))
            })?;
        Ok(Lookup::Found(rec))
    }

    async fn create(&self, record: CounterRecord) -> Result<CounterRecord> {
        self.write(record, false).await
    }

    async fn upsert(&self, record: CounterRecord) -> Result<CounterRecord> {
        self.write(record, true).await
    }
}

fn partition_key(key: &str) -> Result<String> {
    serde_json::to_string(&[key])
        .map_err(|e| TallyError::Internal(format!("partition key encode failed: {e}")))
}

/// Sub-status accompanying a non-2xx reply, if any.
fn substatus(resp: &Response) -> Option<&str> {
    resp.headers()
        .get("x-ms-substatus")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

/// A 404 means "no such document" only without a sub-status (or with 0).
/// Sub-status 1003 and friends mean the database or container is missing.
fn is_document_miss(resp: &Response) -> bool {
    resp.status() == StatusCode::NOT_FOUND && matches!(substatus(resp), None | Some("0"))
}

async fn send(req: RequestBuilder, what: &str) -> Result<Response> {
    req.send()
        .await
        .map_err(|e| TallyError::Store(format!("{what}: request failed: {e}")))
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    code: Option<String>,
}

async fn expect_success(resp: Response, what: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let sub = substatus(&resp)
        .map(|s| format!(" substatus {s}"))
        .unwrap_or_default();
    let code = resp
        .json::<ErrorReply>()
        .await
        .ok()
        .and_then(|r| r.code)
        .map(|c| format!(" ({c})"))
        .unwrap_or_default();
    Err(TallyError::Store(format!("{what}: store replied {status}{sub}{code}")))
}
