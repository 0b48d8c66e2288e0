//! Spatial-subsystem error type.

use thiserror::Error;

use epi_core::AgentId;

/// Errors produced by `epi-spatial`.
///
/// `IndexInconsistency` is a structural invariant failure (an agent that
/// resolves to no cell, or bookkeeping that disagrees with cell contents).
/// It is surfaced immediately and never silently repaired.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("spatial index inconsistency for agent {agent}: {detail}")]
    IndexInconsistency {
        agent: AgentId,
        detail: &'static str,
    },

    #[error("invalid grid geometry: {width} x {height} world, cell size {cell_size}")]
    InvalidGeometry {
        width: f32,
        height: f32,
        cell_size: f32,
    },

    #[error("edge ({from}, {to}) out of range for {node_count} nodes")]
    EdgeOutOfRange {
        from: u32,
        to: u32,
        node_count: usize,
    },

    #[error("self-loop edge on node {0}")]
    SelfLoop(u32),

    #[error("invalid mean degree {0} for random network")]
    InvalidMeanDegree(f64),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
