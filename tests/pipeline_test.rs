use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use flare_catalog::app::catalog_use_case::{CatalogRequest, CatalogUseCase};
use flare_catalog::app::ports::{CoordinateServicePort, EventSourcePort};
use flare_catalog::common::error::{CatalogError, Result};
use flare_catalog::common::types::{FlareEvent, RawCoordinateRecord, RegionId, TimeRange};
use flare_catalog::infra::csv_sink::{AppendFileSink, VecSink};
use flare_catalog::pipeline::coordinates::{CoordinateLookup, CoordinateQuery};
use flare_catalog::pipeline::driver::PipelineDriver;
use flare_catalog::pipeline::region::{RegionPatchMap, RegionResolver};
use flare_catalog::pipeline::severity::{FlareClass, SeverityRange};
use flare_catalog::pipeline::SkipReason;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

const CATALOG: &str = "HARPNUM NOAA_ARS\n377 11157\n401 11158\n402 11158,11161\n";
const HEADER: &str = "class,level,time,latitude,longitude";

/// Canned coordinate service keyed by record-set spec
#[derive(Default)]
struct FakeCoordinates {
    responses: HashMap<String, Option<serde_json::Value>>,
    queries: Mutex<Vec<String>>,
}

impl FakeCoordinates {
    fn with(mut self, record_set: &str, body: serde_json::Value) -> Self {
        self.responses.insert(record_set.to_string(), Some(body));
        self
    }

    fn failing(mut self, record_set: &str) -> Self {
        self.responses.insert(record_set.to_string(), None);
        self
    }
}

#[async_trait]
impl CoordinateServicePort for FakeCoordinates {
    async fn fetch(&self, query: &CoordinateQuery) -> Result<RawCoordinateRecord> {
        let key = query.record_set();
        self.queries.lock().unwrap().push(key.clone());
        match self.responses.get(&key) {
            Some(Some(body)) => Ok(serde_json::from_value(body.clone())?),
            Some(None) => Err(CatalogError::Api { message: "connection reset".into() }),
            None => Ok(RawCoordinateRecord::default()),
        }
    }
}

struct FixedEvents(Vec<FlareEvent>);

#[async_trait]
impl EventSourcePort for FixedEvents {
    async fn list_flares(&self, _range: &TimeRange, _min: &FlareClass) -> Result<Vec<FlareEvent>> {
        Ok(self.0.clone())
    }
}

fn coords(lat: &str, lon: &str, crln: &str) -> serde_json::Value {
    json!({
        "keywords": [
            {"name": "LAT_FWT", "values": [lat]},
            {"name": "LON_FWT", "values": [lon]},
            {"name": "CRLN_OBS", "values": [crln]}
        ],
        "count": 1,
        "status": 0
    })
}

fn peak(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2011, 2, day, hour, minute, 0).unwrap()
}

fn event(class: &str, peak_time: DateTime<Utc>, region: u32) -> FlareEvent {
    FlareEvent {
        class: class.parse().unwrap(),
        peak_time,
        region: RegionId::from_number(region),
    }
}

fn driver(service: Arc<FakeCoordinates>) -> PipelineDriver {
    PipelineDriver::new(
        RegionResolver::new(RegionPatchMap::parse(CATALOG).unwrap()),
        CoordinateLookup::new(service, "hmi.sharp_720s"),
    )
}

#[tokio::test]
async fn test_single_flare_end_to_end() {
    let service = Arc::new(
        FakeCoordinates::default()
            .with("hmi.sharp_720s[401][2011.02.15_01:56_TAI]", coords("10.123", "40.0", "5.0")),
    );
    let events = vec![event("X2.0", peak(15, 1, 56), 11158)];
    let range = SeverityRange::parse("C1", "X9").unwrap();

    let mut sink = VecSink::default();
    let summary = driver(service.clone()).run(&events, &range, &mut sink).await.unwrap();

    assert_eq!(
        sink.lines,
        vec![HEADER.to_string(), "X,2.0,15 February 2011 at 01:56,45.0,10.123".to_string()]
    );
    assert_eq!(summary.rows_written(), 1);
    assert_eq!(summary.skipped_events(), 0);
    assert_eq!(summary.rows[0].coordinate.longitude, 45.0);
}

#[tokio::test]
async fn test_flare_without_region_writes_nothing() {
    let service = Arc::new(
        FakeCoordinates::default()
            .with("hmi.sharp_720s[401][2011.02.15_01:56_TAI]", coords("10.123", "40.0", "5.0")),
    );
    let events = vec![event("X2.0", peak(15, 1, 56), 0)];
    let range = SeverityRange::parse("C1", "X9").unwrap();

    let mut sink = VecSink::default();
    let summary = driver(service.clone()).run(&events, &range, &mut sink).await.unwrap();

    assert_eq!(sink.lines, vec![HEADER.to_string()]);
    assert_eq!(summary.skipped.get(&SkipReason::NoRegion), Some(&1));
    assert!(service.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_skips_continue_to_next_event() {
    let service = Arc::new(
        FakeCoordinates::default()
            // 377 at 02:00 has no observation (count 0, not registered)
            .with("hmi.sharp_720s[401][2011.02.15_01:56_TAI]", coords("-20.5", "350.0", "20.0"))
            .with("hmi.sharp_720s[401][2011.02.16_14:25_TAI]", coords("MISSING", "10.0", "1.0"))
            .with("hmi.sharp_720s[401][2011.02.18_10:11_TAI]", coords("1999.0", "10.0", "1.0"))
            .failing("hmi.sharp_720s[401][2011.02.18_13:03_TAI]")
            .with("hmi.sharp_720s[377][2011.02.18_21:04_TAI]", coords("18.0", "-10.25", "100.0")),
    );
    let events = vec![
        event("M1.0", peak(14, 2, 0), 11157),
        event("X2.2", peak(15, 1, 56), 11158),
        event("M6.6", peak(13, 17, 38), 11160),
        event("M1.6", peak(16, 14, 25), 11158),
        event("C8.0", peak(17, 0, 0), 11158),
        event("M1.0", peak(18, 10, 11), 11158),
        event("M1.4", peak(18, 13, 3), 11158),
        event("M3.0", peak(18, 21, 4), 11157),
    ];
    let range = SeverityRange::parse("M1", "X9").unwrap();

    let mut sink = VecSink::default();
    let summary = driver(service.clone()).run(&events, &range, &mut sink).await.unwrap();

    assert_eq!(
        sink.lines,
        vec![
            HEADER.to_string(),
            "X,2.2,15 February 2011 at 01:56,10.0,-20.5".to_string(),
            "M,3.0,18 February 2011 at 21:04,89.75,18.0".to_string(),
        ]
    );
    assert_eq!(summary.total_events, 8);
    assert_eq!(summary.selected_events, 7);
    assert_eq!(summary.skipped.get(&SkipReason::NoObservation), Some(&1));
    assert_eq!(summary.skipped.get(&SkipReason::UnresolvedRegion), Some(&1));
    assert_eq!(summary.skipped.get(&SkipReason::MissingKeyword), Some(&1));
    assert_eq!(summary.skipped.get(&SkipReason::SentinelValue), Some(&1));
    assert_eq!(summary.skipped.get(&SkipReason::Transport), Some(&1));
    // one fetch per resolved, selected event and nothing for the C8.0 flare
    assert_eq!(service.queries.lock().unwrap().len(), 6);
}

#[tokio::test]
async fn test_use_case_appends_to_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("xflares.csv");
    std::fs::write(&path, "class,level,time,latitude,longitude\nX,9.3,06 September 2017 at 12:02,117.9,-9.1\n")
        .unwrap();

    let service = Arc::new(
        FakeCoordinates::default()
            .with("hmi.sharp_720s[401][2011.02.15_01:56_TAI]", coords("10.123", "40.0", "5.0")),
    );
    let events = Arc::new(FixedEvents(vec![event("X2.0", peak(15, 1, 56), 11158)]));
    let use_case = CatalogUseCase::new(events, service, "hmi.sharp_720s");
    let request = CatalogRequest::parse("2011/02/10 00:00", "2011/02/20 00:00", "C1", "X9").unwrap();

    let summary = use_case
        .run(&request, RegionPatchMap::parse(CATALOG).unwrap(), || AppendFileSink::open(&path))
        .await
        .unwrap();
    assert_eq!(summary.rows_written(), 1);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            HEADER,
            "X,9.3,06 September 2017 at 12:02,117.9,-9.1",
            HEADER,
            "X,2.0,15 February 2011 at 01:56,45.0,10.123",
        ]
    );
}

#[tokio::test]
async fn test_inverted_range_writes_only_header() {
    let service = Arc::new(FakeCoordinates::default());
    let events = vec![event("M6.0", peak(15, 1, 56), 11158), event("X1.0", peak(16, 1, 0), 11158)];
    let range = SeverityRange::parse("X2", "M5").unwrap();

    let mut sink = VecSink::default();
    let summary = driver(service).run(&events, &range, &mut sink).await.unwrap();

    assert_eq!(sink.lines, vec![HEADER.to_string()]);
    assert_eq!(summary.selected_events, 0);
}
