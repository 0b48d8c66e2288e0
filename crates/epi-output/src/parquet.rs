//! Parquet output backend (feature `parquet`).
//!
//! Creates three files in the configured output directory:
//! - `compartments.parquet`
//! - `transitions.parquet`
//! - `variants.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{CompartmentRow, OutputResult, TransitionRow, VariantRow};

fn compartment_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick", DataType::UInt64, false),
        Field::new("susceptible", DataType::UInt32, false),
        Field::new("exposed", DataType::UInt32, false),
        Field::new("infectious", DataType::UInt32, false),
        Field::new("recovered", DataType::UInt32, false),
        Field::new("dead", DataType::UInt32, false),
        Field::new("new_exposures", DataType::UInt32, false),
    ]))
}

fn transition_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick", DataType::UInt64, false),
        Field::new("agent_id", DataType::UInt32, false),
        Field::new("from_state", DataType::Utf8, false),
        Field::new("to_state", DataType::Utf8, false),
    ]))
}

fn variant_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("tick", DataType::UInt64, false),
        Field::new("variant", DataType::Utf8, false),
        Field::new("cases", DataType::UInt32, false),
        Field::new("infection_prob", DataType::Float64, false),
        Field::new("death_prob", DataType::Float64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes simulation output to three Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    compartments: Option<ArrowWriter<File>>,
    transitions: Option<ArrowWriter<File>>,
    variants: Option<ArrowWriter<File>>,
    comp_schema: Arc<Schema>,
    trans_schema: Arc<Schema>,
    var_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create the three Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let comp_schema = compartment_schema();
        let trans_schema = transition_schema();
        let var_schema = variant_schema();

        let compartments = ArrowWriter::try_new(
            File::create(dir.join("compartments.parquet"))?,
            Arc::clone(&comp_schema),
            Some(snappy_props()),
        )?;
        let transitions = ArrowWriter::try_new(
            File::create(dir.join("transitions.parquet"))?,
            Arc::clone(&trans_schema),
            Some(snappy_props()),
        )?;
        let variants = ArrowWriter::try_new(
            File::create(dir.join("variants.parquet"))?,
            Arc::clone(&var_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            compartments: Some(compartments),
            transitions: Some(transitions),
            variants: Some(variants),
            comp_schema,
            trans_schema,
            var_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_compartments(&mut self, row: &CompartmentRow) -> OutputResult<()> {
        let Some(writer) = self.compartments.as_mut() else {
            return Ok(());
        };

        let mut ticks = UInt64Builder::new();
        let mut susceptible = UInt32Builder::new();
        let mut exposed = UInt32Builder::new();
        let mut infectious = UInt32Builder::new();
        let mut recovered = UInt32Builder::new();
        let mut dead = UInt32Builder::new();
        let mut new_exposures = UInt32Builder::new();

        ticks.append_value(row.tick);
        susceptible.append_value(row.susceptible);
        exposed.append_value(row.exposed);
        infectious.append_value(row.infectious);
        recovered.append_value(row.recovered);
        dead.append_value(row.dead);
        new_exposures.append_value(row.new_exposures);

        let batch = RecordBatch::try_new(
            Arc::clone(&self.comp_schema),
            vec![
                Arc::new(ticks.finish()),
                Arc::new(susceptible.finish()),
                Arc::new(exposed.finish()),
                Arc::new(infectious.finish()),
                Arc::new(recovered.finish()),
                Arc::new(dead.finish()),
                Arc::new(new_exposures.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_transitions(&mut self, rows: &[TransitionRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.transitions.as_mut() else {
            return Ok(());
        };

        let mut ticks = UInt64Builder::new();
        let mut agent_ids = UInt32Builder::new();
        let mut from_states = StringBuilder::new();
        let mut to_states = StringBuilder::new();

        for row in rows {
            ticks.append_value(row.tick);
            agent_ids.append_value(row.agent_id);
            from_states.append_value(row.from_state);
            to_states.append_value(row.to_state);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.trans_schema),
            vec![
                Arc::new(ticks.finish()),
                Arc::new(agent_ids.finish()),
                Arc::new(from_states.finish()),
                Arc::new(to_states.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_variants(&mut self, rows: &[VariantRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.variants.as_mut() else {
            return Ok(());
        };

        let mut ticks = UInt64Builder::new();
        let mut labels = StringBuilder::new();
        let mut cases = UInt32Builder::new();
        let mut infection_probs = Float64Builder::new();
        let mut death_probs = Float64Builder::new();

        for row in rows {
            ticks.append_value(row.tick);
            labels.append_value(&row.variant);
            cases.append_value(row.cases);
            infection_probs.append_value(row.infection_prob);
            death_probs.append_value(row.death_prob);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.var_schema),
            vec![
                Arc::new(ticks.finish()),
                Arc::new(labels.finish()),
                Arc::new(cases.finish()),
                Arc::new(infection_probs.finish()),
                Arc::new(death_probs.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.compartments.take() {
            w.close()?;
        }
        if let Some(w) = self.transitions.take() {
            w.close()?;
        }
        if let Some(w) = self.variants.take() {
            w.close()?;
        }
        Ok(())
    }
}
