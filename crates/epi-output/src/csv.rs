//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `compartments.csv`
//! - `transitions.csv`
//! - `variants.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CompartmentRow, OutputResult, TransitionRow, VariantRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    compartments: Writer<File>,
    transitions: Writer<File>,
    variants: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut compartments = Writer::from_path(dir.join("compartments.csv"))?;
        compartments.write_record([
            "tick",
            "susceptible",
            "exposed",
            "infectious",
            "recovered",
            "dead",
            "new_exposures",
        ])?;

        let mut transitions = Writer::from_path(dir.join("transitions.csv"))?;
        transitions.write_record(["tick", "agent_id", "from_state", "to_state"])?;

        let mut variants = Writer::from_path(dir.join("variants.csv"))?;
        variants.write_record(["tick", "variant", "cases", "infection_prob", "death_prob"])?;

        Ok(Self {
            compartments,
            transitions,
            variants,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_compartments(&mut self, row: &CompartmentRow) -> OutputResult<()> {
        self.compartments.write_record(&[
            row.tick.to_string(),
            row.susceptible.to_string(),
            row.exposed.to_string(),
            row.infectious.to_string(),
            row.recovered.to_string(),
            row.dead.to_string(),
            row.new_exposures.to_string(),
        ])?;
        Ok(())
    }

    fn write_transitions(&mut self, rows: &[TransitionRow]) -> OutputResult<()> {
        for row in rows {
            self.transitions.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.from_state.to_string(),
                row.to_state.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_variants(&mut self, rows: &[VariantRow]) -> OutputResult<()> {
        for row in rows {
            self.variants.write_record(&[
                row.tick.to_string(),
                row.variant.clone(),
                row.cases.to_string(),
                format!("{:.4}", row.infection_prob),
                format!("{:.4}", row.death_prob),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.compartments.flush()?;
        self.transitions.flush()?;
        self.variants.flush()?;
        Ok(())
    }
}
