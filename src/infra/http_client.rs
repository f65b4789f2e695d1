use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::common::error::Result;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, instrument};

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .deflate(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    #[instrument(skip(self))]
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = resp.bytes().await?.to_vec();
        debug!(status, bytes = bytes.len(), "GET complete");
        Ok(HttpGetResult { status, bytes, content_type })
    }
}
