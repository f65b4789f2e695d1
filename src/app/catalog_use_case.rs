use crate::app::ports::{CoordinateServicePort, EventSourcePort, RowSink};
use crate::common::error::Result;
use crate::common::types::TimeRange;
use crate::pipeline::coordinates::CoordinateLookup;
use crate::pipeline::driver::{PipelineDriver, RunSummary};
use crate::pipeline::region::{RegionPatchMap, RegionResolver};
use crate::pipeline::severity::SeverityRange;
use std::sync::Arc;
use tracing::info;

/// What the caller asked for; validated before anything is fetched
#[derive(Debug, Clone, Copy)]
pub struct CatalogRequest {
    pub time_range: TimeRange,
    pub severity: SeverityRange,
}

impl CatalogRequest {
    pub fn parse(t_start: &str, t_end: &str, min_class: &str, max_class: &str) -> Result<Self> {
        Ok(Self {
            time_range: TimeRange::parse(t_start, t_end)?,
            severity: SeverityRange::parse(min_class, max_class)?,
        })
    }
}

/// Use case for building one slice of the flare catalog
pub struct CatalogUseCase {
    events: Arc<dyn EventSourcePort>,
    coordinates: Arc<dyn CoordinateServicePort>,
    series: String,
}

impl CatalogUseCase {
    pub fn new(
        events: Arc<dyn EventSourcePort>,
        coordinates: Arc<dyn CoordinateServicePort>,
        series: &str,
    ) -> Self {
        Self {
            events,
            coordinates,
            series: series.to_string(),
        }
    }

    /// The sink is only opened once the flare list is in hand, so a failed
    /// event query leaves the output file untouched.
    pub async fn run<S, F>(
        &self,
        request: &CatalogRequest,
        catalog: RegionPatchMap,
        open_sink: F,
    ) -> Result<RunSummary>
    where
        S: RowSink,
        F: FnOnce() -> Result<S>,
    {
        let events = self
            .events
            .list_flares(&request.time_range, &request.severity.min)
            .await?;
        info!(
            "Event catalog returned {} flares between {} and {}",
            events.len(),
            request.time_range.start,
            request.time_range.end
        );

        let mut sink = open_sink()?;
        let driver = PipelineDriver::new(
            RegionResolver::new(catalog),
            CoordinateLookup::new(self.coordinates.clone(), &self.series),
        );
        driver.run(&events, &request.severity, &mut sink).await
    }
}
