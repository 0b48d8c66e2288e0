//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `compartments`, `transitions`, and `variants`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{CompartmentRow, OutputResult, TransitionRow, VariantRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn: Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS compartments (
                 tick          INTEGER PRIMARY KEY,
                 susceptible   INTEGER NOT NULL,
                 exposed       INTEGER NOT NULL,
                 infectious    INTEGER NOT NULL,
                 recovered     INTEGER NOT NULL,
                 dead          INTEGER NOT NULL,
                 new_exposures INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS transitions (
                 tick       INTEGER NOT NULL,
                 agent_id   INTEGER NOT NULL,
                 from_state TEXT    NOT NULL,
                 to_state   TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS variants (
                 tick           INTEGER NOT NULL,
                 variant        TEXT    NOT NULL,
                 cases          INTEGER NOT NULL,
                 infection_prob REAL    NOT NULL,
                 death_prob     REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_compartments(&mut self, row: &CompartmentRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO compartments \
             (tick, susceptible, exposed, infectious, recovered, dead, new_exposures) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                row.tick,
                row.susceptible,
                row.exposed,
                row.infectious,
                row.recovered,
                row.dead,
                row.new_exposures,
            ],
        )?;
        Ok(())
    }

    fn write_transitions(&mut self, rows: &[TransitionRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO transitions (tick, agent_id, from_state, to_state) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick,
                    row.agent_id,
                    row.from_state,
                    row.to_state,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_variants(&mut self, rows: &[VariantRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO variants (tick, variant, cases, infection_prob, death_prob) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick,
                    row.variant,
                    row.cases,
                    row.infection_prob,
                    row.death_prob,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
