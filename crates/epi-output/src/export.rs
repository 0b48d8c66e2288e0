//! Read-only projections from a recorded metrics series into output rows.
//!
//! These are the post-run alternative to the streaming
//! [`SimOutputObserver`][crate::SimOutputObserver]: pure passes over the
//! immutable snapshot series, with no access to the engine beyond its
//! public query surface.

use epi_disease::VariantRegistry;
use epi_sim::{MetricsCollector, TickSnapshot};

use crate::row::{CompartmentRow, TransitionRow, VariantRow};
use crate::writer::OutputWriter;
use crate::OutputResult;

/// Project an entire recorded series (compartments plus any logged
/// transitions) through `writer`.  Does not call `finish()`.
pub fn write_metrics<W: OutputWriter>(
    writer: &mut W,
    metrics: &MetricsCollector,
) -> OutputResult<()> {
    for snapshot in metrics.series() {
        writer.write_compartments(&CompartmentRow::from(snapshot))?;
    }
    if !metrics.events().is_empty() {
        let rows: Vec<TransitionRow> = metrics.events().iter().map(TransitionRow::from).collect();
        writer.write_transitions(&rows)?;
    }
    Ok(())
}

/// Project per-tick variant frequencies through `writer`, resolving labels
/// and drifted parameters from the registry.  Does not call `finish()`.
pub fn write_variant_series<W: OutputWriter>(
    writer: &mut W,
    series: &[TickSnapshot],
    registry: &VariantRegistry,
) -> OutputResult<()> {
    for snapshot in series {
        if snapshot.variant_counts.is_empty() {
            continue;
        }
        let rows: Vec<VariantRow> = snapshot
            .variant_counts
            .iter()
            .map(|&(id, cases)| {
                let variant = registry.get(id);
                VariantRow {
                    tick: snapshot.tick.0,
                    variant: registry.label(id),
                    cases,
                    infection_prob: variant.infection_prob,
                    death_prob: variant.death_prob,
                }
            })
            .collect();
        writer.write_variants(&rows)?;
    }
    Ok(())
}
