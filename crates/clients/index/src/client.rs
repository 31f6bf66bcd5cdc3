//! The Elasticsearch REST implementation of [`IndexStore`].

use crate::{
    BulkAction, BulkItem, BulkOutcome, CreateOutcome, Hit, IndexConfig, IndexError, IndexStore,
    RecordKind, SearchQuery, encode_bulk, index_body, parse_bulk_response,
};
use async_trait::async_trait;
use backon::{ConstantBuilder, Retryable};
use reqwest::{Method, RequestBuilder, StatusCode, header::CONTENT_TYPE};
use serde_json::Value;

/// Statuses returned by proxies and overloaded nodes while the cluster is unreachable.
const TRANSIENT_STATUSES: [u16; 3] = [502, 503, 504];

/// An [`IndexStore`] over an Elasticsearch-compatible REST endpoint.
#[derive(Debug, Clone)]
pub struct ElasticIndex {
    http: reqwest::Client,
    config: IndexConfig,
}

impl ElasticIndex {
    /// Creates a client for the configured endpoint.
    pub fn new(config: IndexConfig) -> Result<Self, IndexError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| IndexError::InvalidConfig(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Returns the store configuration.
    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut url = self.config.url.clone();
        url.set_path(path);
        self.http.request(method, url)
    }

    /// Sends a request, retrying transient failures, and returns the status and
    /// decoded body of the final response.
    async fn execute<F>(&self, op: &'static str, build: F) -> Result<(StatusCode, Value), IndexError>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let policy = ConstantBuilder::default()
            .with_delay(self.config.retry_delay)
            .with_max_times(self.config.retry_attempts.unwrap_or(usize::MAX));
        let build = &build;

        let attempt = move || async move {
            let response = build().send().await.map_err(classify)?;
            let status = response.status();
            if TRANSIENT_STATUSES.contains(&status.as_u16()) {
                return Err(IndexError::Unavailable(format!("HTTP {status}")));
            }
            let body = response.bytes().await.map_err(classify)?;
            let value = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body)? };
            Ok::<_, IndexError>((status, value))
        };

        attempt
            .retry(policy)
            .when(IndexError::is_transient)
            .notify(|err, delay| {
                warn!(target: "index", op, %err, ?delay, "Index store unavailable, retrying");
                #[cfg(feature = "metrics")]
                metrics::counter!(crate::Metrics::INDEX_RETRIES_TOTAL, "op" => op).increment(1);
            })
            .await
    }

    async fn bulk(
        &self,
        action: BulkAction,
        kind: RecordKind,
        items: &[BulkItem],
    ) -> Result<BulkOutcome, IndexError> {
        if items.is_empty() {
            return Ok(BulkOutcome::default());
        }
        let body = encode_bulk(action, self.config.index_name(kind), items);
        let (status, response) = self
            .execute("bulk", || {
                self.request(Method::POST, "/_bulk")
                    .header(CONTENT_TYPE, "application/x-ndjson")
                    .body(body.clone())
            })
            .await?;
        ensure_success(status, &response)?;

        let outcome = parse_bulk_response(action, &response)?;
        debug!(
            target: "index",
            %kind,
            ?action,
            succeeded = outcome.succeeded,
            conflicts = outcome.conflicts,
            failed = outcome.failures.len(),
            "Bulk request applied"
        );
        #[cfg(feature = "metrics")]
        crate::Metrics::record_bulk(kind, &outcome);

        for failure in &outcome.failures {
            error!(target: "index", %kind, id = %failure.id, status = failure.status, reason = %failure.reason, "Bulk item failed");
        }
        outcome.into_result()
    }
}

#[async_trait]
impl IndexStore for ElasticIndex {
    async fn create_one(
        &self,
        kind: RecordKind,
        id: String,
        document: Value,
    ) -> Result<CreateOutcome, IndexError> {
        let path = format!("/{}/_create/{id}", self.config.index_name(kind));
        let (status, response) =
            self.execute("create", || self.request(Method::PUT, &path).json(&document)).await?;

        if status == StatusCode::CONFLICT {
            debug!(target: "index", %kind, id, "Document already exists");
            return Ok(CreateOutcome::Existed);
        }
        ensure_success(status, &response)?;
        Ok(CreateOutcome::Created)
    }

    async fn bulk_create(
        &self,
        kind: RecordKind,
        items: Vec<BulkItem>,
    ) -> Result<BulkOutcome, IndexError> {
        self.bulk(BulkAction::Create, kind, &items).await
    }

    async fn bulk_update(
        &self,
        kind: RecordKind,
        items: Vec<BulkItem>,
    ) -> Result<BulkOutcome, IndexError> {
        self.bulk(BulkAction::Update, kind, &items).await
    }

    async fn bulk_delete(
        &self,
        kind: RecordKind,
        ids: Vec<String>,
    ) -> Result<BulkOutcome, IndexError> {
        let items: Vec<BulkItem> = ids.into_iter().map(|id| BulkItem::new(id, Value::Null)).collect();
        self.bulk(BulkAction::Delete, kind, &items).await
    }

    async fn search(&self, kind: RecordKind, query: SearchQuery) -> Result<Vec<Hit>, IndexError> {
        let path = format!("/{}/_search", self.config.index_name(kind));
        let body = query.to_body(self.config.search_size);
        let (status, response) =
            self.execute("search", || self.request(Method::POST, &path).json(&body)).await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        ensure_success(status, &response)?;
        parse_hits(&response)
    }

    async fn highest_block_number(&self) -> Result<Option<u64>, IndexError> {
        let query = SearchQuery::default().sort_desc("number").size(1);
        let hits = self.search(RecordKind::Block, query).await?;
        hits.first()
            .map(|hit| {
                hit.source.get("number").and_then(Value::as_u64).ok_or_else(|| {
                    IndexError::Malformed(format!("block document {} without number", hit.id))
                })
            })
            .transpose()
    }

    async fn count(&self, kind: RecordKind) -> Result<u64, IndexError> {
        let path = format!("/{}/_count", self.config.index_name(kind));
        let (status, response) = self.execute("count", || self.request(Method::GET, &path)).await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(0);
        }
        ensure_success(status, &response)?;
        response
            .get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| IndexError::Malformed("count response without count".into()))
    }

    async fn recreate(&self, kind: RecordKind) -> Result<(), IndexError> {
        let name = self.config.index_name(kind);
        let path = format!("/{name}");

        let (status, response) = self.execute("delete_index", || self.request(Method::DELETE, &path)).await?;
        if status == StatusCode::NOT_FOUND {
            info!(target: "index", index = name, "Index did not exist and is created anew");
        } else {
            ensure_success(status, &response)?;
            warn!(target: "index", index = name, "Index deleted");
        }

        let body = index_body(kind, self.config.shards, self.config.replicas);
        let (status, response) =
            self.execute("create_index", || self.request(Method::PUT, &path).json(&body)).await?;
        ensure_success(status, &response)?;
        info!(target: "index", index = name, "Index created");
        Ok(())
    }
}

fn classify(err: reqwest::Error) -> IndexError {
    if err.is_connect() || err.is_timeout() {
        IndexError::Unavailable(err.to_string())
    } else if err.is_decode() {
        IndexError::Malformed(err.to_string())
    } else {
        IndexError::Permanent { status: err.status().map(|s| s.as_u16()), reason: err.to_string() }
    }
}

fn ensure_success(status: StatusCode, response: &Value) -> Result<(), IndexError> {
    if status.is_success() {
        return Ok(());
    }
    let reason = response
        .pointer("/error/reason")
        .and_then(Value::as_str)
        .map_or_else(|| response.to_string(), str::to_string);
    Err(IndexError::Permanent { status: Some(status.as_u16()), reason })
}

fn parse_hits(response: &Value) -> Result<Vec<Hit>, IndexError> {
    let hits = response
        .pointer("/hits/hits")
        .and_then(Value::as_array)
        .ok_or_else(|| IndexError::Malformed("search response without hits".into()))?;

    hits.iter()
        .map(|hit| {
            let id = hit.get("_id").and_then(Value::as_str).ok_or_else(|| {
                IndexError::Malformed("search hit without id".into())
            })?;
            let source = hit.get("_source").cloned().unwrap_or(Value::Null);
            Ok(Hit::new(id.to_string(), source))
        })
        .collect()
}
