use crate::app::ports::CoordinateServicePort;
use crate::common::constants::{
    COORDINATE_KEYS, MISSING_MARKER, RECORD_TIME_FORMAT, SENTINEL_THRESHOLD,
};
use crate::common::types::{PatchId, RawCoordinateRecord};
use crate::pipeline::SkipReason;
use chrono::{DateTime, Utc};
use metrics::histogram;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Addresses one record of a patch's coordinate series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateQuery {
    pub series: String,
    pub patch_id: PatchId,
    /// `YYYY.MM.DD_HH:MM_TAI`
    pub record_time: String,
    pub keys: Vec<String>,
}

impl CoordinateQuery {
    pub fn new(series: &str, patch_id: PatchId, record_time: String) -> Self {
        Self {
            series: series.to_string(),
            patch_id,
            record_time,
            keys: COORDINATE_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Record-set specification, e.g. `hmi.sharp_720s[401][2011.02.15_01:56_TAI]`
    pub fn record_set(&self) -> String {
        format!("{}[{}][{}]", self.series, self.patch_id, self.record_time)
    }

    pub fn url(&self, base: &str) -> String {
        format!(
            "{}?ds={}&op=rs_list&key={}",
            base,
            self.record_set(),
            self.keys.join(",")
        )
    }
}

/// Fitted latitude/longitude and the observer's Carrington longitude, all finite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedCoordinates {
    pub lat_fwt: f64,
    pub lon_fwt: f64,
    pub crln_obs: f64,
}

/// Applies the completeness checks in order; the first failing check wins.
pub fn validate(record: &RawCoordinateRecord) -> Result<ValidatedCoordinates, SkipReason> {
    if record.count == 0 {
        return Err(SkipReason::NoObservation);
    }

    let payload = serde_json::to_string(&record.keywords).map_err(|_| SkipReason::MalformedRecord)?;
    if payload.contains(MISSING_MARKER) {
        return Err(SkipReason::MissingKeyword);
    }

    let field = |index: usize| -> Result<f64, SkipReason> {
        record
            .value(index)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .ok_or(SkipReason::MalformedRecord)
    };

    let lat_fwt = field(0)?;
    let lon_fwt = field(1)?;
    if lat_fwt > SENTINEL_THRESHOLD || lon_fwt > SENTINEL_THRESHOLD {
        return Err(SkipReason::SentinelValue);
    }
    if !lat_fwt.is_finite() || !lon_fwt.is_finite() {
        return Err(SkipReason::MalformedRecord);
    }

    let crln_obs = field(2)?;
    if !crln_obs.is_finite() {
        return Err(SkipReason::MalformedRecord);
    }

    Ok(ValidatedCoordinates {
        lat_fwt,
        lon_fwt,
        crln_obs,
    })
}

/// Fetches and validates one coordinate record per event.
pub struct CoordinateLookup {
    service: Arc<dyn CoordinateServicePort>,
    series: String,
}

impl CoordinateLookup {
    pub fn new(service: Arc<dyn CoordinateServicePort>, series: &str) -> Self {
        Self {
            service,
            series: series.to_string(),
        }
    }

    pub fn query(&self, patch_id: PatchId, time: &DateTime<Utc>) -> CoordinateQuery {
        CoordinateQuery::new(&self.series, patch_id, time.format(RECORD_TIME_FORMAT).to_string())
    }

    /// Transport failures are reported as a skip like any other unavailable record.
    #[instrument(skip(self))]
    pub async fn fetch(
        &self,
        patch_id: PatchId,
        time: &DateTime<Utc>,
    ) -> Result<ValidatedCoordinates, SkipReason> {
        let query = self.query(patch_id, time);

        let started = std::time::Instant::now();
        let result = self.service.fetch(&query).await;
        histogram!("flare_catalog_coordinate_fetch_seconds").record(started.elapsed().as_secs_f64());

        let record = result.map_err(|e| {
            warn!("Coordinate fetch failed for {}: {}", query.record_set(), e);
            SkipReason::Transport
        })?;

        let validated = validate(&record);
        if let Err(reason) = &validated {
            debug!("No usable coordinates for {}: {}", query.record_set(), reason);
        }
        validated
    }
}
