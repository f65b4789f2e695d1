use crate::common::error::Result;
use crate::common::types::{FlareEvent, OutputRow, RawCoordinateRecord, TimeRange};
use crate::pipeline::coordinates::CoordinateQuery;
use crate::pipeline::severity::FlareClass;
use async_trait::async_trait;

#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Flare event catalog
#[async_trait]
pub trait EventSourcePort: Send + Sync {
    async fn list_flares(&self, range: &TimeRange, min_class: &FlareClass) -> Result<Vec<FlareEvent>>;
}

/// Per-patch coordinate time series
#[async_trait]
pub trait CoordinateServicePort: Send + Sync {
    async fn fetch(&self, query: &CoordinateQuery) -> Result<RawCoordinateRecord>;
}

/// Destination for catalog lines, written in production order
pub trait RowSink {
    fn write_header(&mut self) -> Result<()>;
    fn write_row(&mut self, row: &OutputRow) -> Result<()>;
}
