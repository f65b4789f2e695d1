use crate::app::ports::HttpClientPort;
use crate::common::error::{CatalogError, Result};
use crate::pipeline::region::RegionPatchMap;
use std::fs;
use tracing::{info, instrument};

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads the HARP/NOAA table from a URL or a local file, once per run.
#[instrument(skip(http))]
pub async fn load_catalog(source: &str, http: &dyn HttpClientPort) -> Result<RegionPatchMap> {
    let text = if is_remote(source) {
        let resp = http.get(source).await?;
        if !resp.is_success() {
            return Err(CatalogError::Catalog(format!(
                "fetching {} responded with HTTP {}",
                source, resp.status
            )));
        }
        String::from_utf8_lossy(&resp.bytes).into_owned()
    } else {
        fs::read_to_string(source).map_err(|e| {
            CatalogError::Catalog(format!("failed to read catalog file '{}': {}", source, e))
        })?
    };

    info!("Read region catalog from {}", source);
    RegionPatchMap::parse(&text)
}
