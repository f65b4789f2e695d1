use crate::app::ports::RowSink;
use crate::common::error::Result;
use crate::common::types::{FlareEvent, OutputRow, RegionId};
use crate::pipeline::coordinates::CoordinateLookup;
use crate::pipeline::filter;
use crate::pipeline::normalize::normalize;
use crate::pipeline::region::RegionResolver;
use crate::pipeline::severity::SeverityRange;
use crate::pipeline::SkipReason;
use metrics::counter;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Result of a complete catalog run
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub total_events: usize,
    pub selected_events: usize,
    pub rows: Vec<OutputRow>,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl RunSummary {
    pub fn rows_written(&self) -> usize {
        self.rows.len()
    }

    pub fn skipped_events(&self) -> usize {
        self.skipped.values().sum()
    }

    fn record_skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
        counter!("flare_catalog_events_skipped_total", "reason" => reason.as_str()).increment(1);
    }
}

/// Links each selected flare to its patch and Carrington position, one event at a time.
pub struct PipelineDriver {
    resolver: RegionResolver,
    lookup: CoordinateLookup,
}

impl PipelineDriver {
    pub fn new(resolver: RegionResolver, lookup: CoordinateLookup) -> Self {
        Self { resolver, lookup }
    }

    /// Resolve, fetch and normalize one event. Nothing partial escapes: either a
    /// full row or a skip reason.
    async fn process_event(&self, event: &FlareEvent) -> std::result::Result<OutputRow, SkipReason> {
        let patch_id = match self.resolver.resolve(&event.region) {
            Some(patch_id) => patch_id,
            None if event.region == RegionId::None => return Err(SkipReason::NoRegion),
            None => return Err(SkipReason::UnresolvedRegion),
        };

        let coords = self.lookup.fetch(patch_id, &event.peak_time).await?;

        Ok(OutputRow {
            class: event.class,
            display_time: event.display_time(),
            coordinate: normalize(&coords),
        })
    }

    /// Writes the header, then streams one row per fully resolved event in input order.
    #[instrument(skip(self, events, sink), fields(events = events.len()))]
    pub async fn run(
        &self,
        events: &[FlareEvent],
        range: &SeverityRange,
        sink: &mut dyn RowSink,
    ) -> Result<RunSummary> {
        let selected = filter::select(events, range);
        counter!("flare_catalog_events_selected_total").increment(selected.len() as u64);
        info!("Selected {} of {} flares", selected.len(), events.len());
        for event in &selected {
            println!("{} {} {}", event.class, event.peak_time, event.region);
        }

        let mut summary = RunSummary {
            total_events: events.len(),
            selected_events: selected.len(),
            ..Default::default()
        };

        sink.write_header()?;

        for event in &selected {
            match self.process_event(event).await {
                Ok(row) => {
                    sink.write_row(&row)?;
                    counter!("flare_catalog_rows_written_total").increment(1);
                    println!("{}", row.to_line());
                    summary.rows.push(row);
                }
                Err(reason) => {
                    debug!(
                        class = %event.class,
                        region = %event.region,
                        "Skipping flare at {}: {}",
                        event.peak_time,
                        reason
                    );
                    summary.record_skip(reason);
                }
            }
        }

        info!(
            "✅ Wrote {} rows ({} skipped)",
            summary.rows_written(),
            summary.skipped_events()
        );
        Ok(summary)
    }
}
