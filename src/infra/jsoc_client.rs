use crate::app::ports::{CoordinateServicePort, HttpClientPort};
use crate::common::error::{CatalogError, Result};
use crate::common::types::RawCoordinateRecord;
use crate::pipeline::coordinates::CoordinateQuery;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// `jsoc_info` record-set lookups over HTTP
pub struct JsocClient {
    http: Arc<dyn HttpClientPort>,
    base_url: String,
}

impl JsocClient {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    /// A non-zero `status` is a service-side failure, not an empty result.
    pub fn parse_response(bytes: &[u8]) -> Result<RawCoordinateRecord> {
        let doc: Value = serde_json::from_slice(bytes)?;
        let status = doc.get("status").and_then(Value::as_i64).unwrap_or(0);
        if status != 0 {
            let message = doc
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(CatalogError::Api {
                message: format!("jsoc_info status {}: {}", status, message),
            });
        }
        Ok(serde_json::from_value(doc)?)
    }
}

#[async_trait]
impl CoordinateServicePort for JsocClient {
    #[instrument(skip(self), fields(ds = %query.record_set()))]
    async fn fetch(&self, query: &CoordinateQuery) -> Result<RawCoordinateRecord> {
        let url = query.url(&self.base_url);
        let resp = self.http.get(&url).await?;
        if !resp.is_success() {
            return Err(CatalogError::Api {
                message: format!("jsoc_info responded with HTTP {}", resp.status),
            });
        }
        let record = Self::parse_response(&resp.bytes)?;
        debug!(count = record.count, "Fetched coordinate record");
        Ok(record)
    }
}
