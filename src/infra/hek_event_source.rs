use crate::app::ports::{EventSourcePort, HttpClientPort};
use crate::common::constants::{HEK_EVENT_TYPE, HEK_FRM_NAME, HEK_OBSERVATORY, HEK_TIME_FORMAT};
use crate::common::error::{CatalogError, Result};
use crate::common::types::{FlareEvent, RegionId, TimeRange};
use crate::pipeline::severity::FlareClass;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const PEAK_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

#[derive(Debug, Deserialize)]
struct HekResponse {
    #[serde(default)]
    result: Vec<HekFlare>,
    #[serde(default)]
    overmax: bool,
}

/// The handful of HER columns the catalog needs
#[derive(Debug, Clone, Deserialize)]
pub struct HekFlare {
    #[serde(default)]
    pub fl_goescls: Option<String>,
    #[serde(default)]
    pub event_peaktime: Option<String>,
    #[serde(default)]
    pub ar_noaanum: Option<Value>,
    #[serde(default)]
    pub frm_name: Option<String>,
}

impl HekFlare {
    /// `None` for rows from other detection methods or rows that don't parse.
    pub fn to_event(&self) -> Option<FlareEvent> {
        if self.frm_name.as_deref() != Some(HEK_FRM_NAME) {
            return None;
        }

        let class_text = self.fl_goescls.as_deref()?.trim();
        let class: FlareClass = match class_text.parse() {
            Ok(class) => class,
            Err(e) => {
                warn!("Ignoring flare with unusable class: {}", e);
                return None;
            }
        };

        let peak_text = self.event_peaktime.as_deref()?.trim();
        let peak_time = match parse_peak_time(peak_text) {
            Some(t) => t,
            None => {
                warn!("Ignoring {} flare with unparseable peak time '{}'", class, peak_text);
                return None;
            }
        };

        Some(FlareEvent {
            class,
            peak_time,
            region: RegionId::from_number(region_number(self.ar_noaanum.as_ref())),
        })
    }
}

fn parse_peak_time(text: &str) -> Option<DateTime<Utc>> {
    PEAK_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

// HER reports the region as an integer, a numeric string, or null
fn region_number(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// GOES flare list from the Heliophysics Event Knowledgebase
pub struct HekEventSource {
    http: Arc<dyn HttpClientPort>,
    base_url: String,
    page_size: u32,
    max_pages: u32,
}

impl HekEventSource {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: &str, page_size: u32, max_pages: u32) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            page_size,
            max_pages: max_pages.max(1),
        }
    }

    pub fn search_url(&self, range: &TimeRange, min_class: &FlareClass, page: u32) -> Result<String> {
        let start = range.start.format(HEK_TIME_FORMAT).to_string();
        let end = range.end.format(HEK_TIME_FORMAT).to_string();
        let page = page.to_string();
        let limit = self.page_size.to_string();
        let min_class = min_class.to_string();

        let params: [(&str, &str); 24] = [
            ("cosec", "2"),
            ("cmd", "search"),
            ("type", "column"),
            ("event_type", HEK_EVENT_TYPE),
            ("event_region", "all"),
            ("event_coordsys", "helioprojective"),
            ("x1", "-1200"),
            ("x2", "1200"),
            ("y1", "-1200"),
            ("y2", "1200"),
            ("event_starttime", start.as_str()),
            ("event_endtime", end.as_str()),
            ("result_limit", limit.as_str()),
            ("page", page.as_str()),
            ("param0", "FL_GOESCls"),
            ("op0", ">"),
            ("value0", min_class.as_str()),
            ("param1", "OBS_Observatory"),
            ("op1", "="),
            ("value1", HEK_OBSERVATORY),
            ("param2", "FRM_Name"),
            ("op2", "="),
            ("value2", HEK_FRM_NAME),
            ("return", "fl_goescls,event_peaktime,ar_noaanum,frm_name"),
        ];

        let url = reqwest::Url::parse_with_params(&self.base_url, &params)
            .map_err(|e| CatalogError::Config(format!("invalid event search URL '{}': {}", self.base_url, e)))?;
        Ok(url.to_string())
    }

    pub fn parse_page(bytes: &[u8]) -> Result<(Vec<HekFlare>, bool)> {
        let response: HekResponse = serde_json::from_slice(bytes)?;
        Ok((response.result, response.overmax))
    }
}

#[async_trait]
impl EventSourcePort for HekEventSource {
    #[instrument(skip(self))]
    async fn list_flares(&self, range: &TimeRange, min_class: &FlareClass) -> Result<Vec<FlareEvent>> {
        let mut events = Vec::new();

        for page in 1..=self.max_pages {
            let url = self.search_url(range, min_class, page)?;
            let resp = self.http.get(&url).await?;
            if !resp.is_success() {
                return Err(CatalogError::Api {
                    message: format!("event search responded with HTTP {}", resp.status),
                });
            }

            let (rows, overmax) = Self::parse_page(&resp.bytes)?;
            debug!(page, rows = rows.len(), overmax, "Fetched event page");
            events.extend(rows.iter().filter_map(HekFlare::to_event));

            if !overmax {
                break;
            }
            if page == self.max_pages {
                warn!("Event search still had more results after {} pages; list is truncated", page);
            }
        }

        events.sort_by_key(|e| e.peak_time);
        info!("Fetched {} GOES flares", events.len());
        Ok(events)
    }
}
