//! `SpatialGrid` — uniform bucket grid for radius contact queries.
//!
//! # Why this exists
//!
//! Naive pairwise contact detection is O(N²) per tick.  Bucketing agents
//! into cells of side `cell_size` (chosen equal to the contact radius)
//! reduces a radius query to scanning the 3×3 cell neighbourhood, so a full
//! tick of contact resolution is O(N × local density).
//!
//! # Rebuild cycle
//!
//! Agents move between ticks, so the grid is reconstructed once per tick
//! before contact resolution: [`rebuild`](SpatialGrid::rebuild) clears the
//! buckets (keeping their allocations), re-inserts every included agent, and
//! verifies the structural invariant — every included agent in exactly one
//! cell.  A position outside the world maps to no cell and is reported as
//! [`SpatialError::IndexInconsistency`], never clamped.

use epi_core::{AgentId, Bounds, CellId, Point};

use crate::{SpatialError, SpatialResult};

/// Uniform grid mapping cells to the agents currently inside them.
pub struct SpatialGrid {
    bounds: Bounds,
    cell_size: f32,
    cols: u32,
    rows: u32,
    /// Bucket per cell, indexed by `row * cols + col`.
    cells: Vec<Vec<AgentId>>,
    /// Cell each agent was assigned at the last rebuild;
    /// `CellId::INVALID` for agents excluded from the index.
    membership: Vec<CellId>,
    /// Number of agents currently indexed.
    occupied: usize,
}

impl SpatialGrid {
    /// Create a grid covering `bounds` with square cells of side `cell_size`.
    ///
    /// Pick `cell_size` equal to the base contact radius: every in-range
    /// partner is then guaranteed to sit in the 3×3 neighbourhood.
    pub fn new(bounds: Bounds, cell_size: f32) -> SpatialResult<Self> {
        if !(bounds.width > 0.0) || !(bounds.height > 0.0) || !(cell_size > 0.0) {
            return Err(SpatialError::InvalidGeometry {
                width: bounds.width,
                height: bounds.height,
                cell_size,
            });
        }
        let cols = (bounds.width / cell_size).ceil() as u32;
        let rows = (bounds.height / cell_size).ceil() as u32;
        Ok(Self {
            bounds,
            cell_size,
            cols,
            rows,
            cells: (0..cols as usize * rows as usize).map(|_| Vec::new()).collect(),
            membership: Vec::new(),
            occupied: 0,
        })
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of agents indexed at the last rebuild.
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Cell the agent was assigned at the last rebuild
    /// (`CellId::INVALID` if excluded).
    pub fn cell_of(&self, agent: AgentId) -> CellId {
        self.membership[agent.index()]
    }

    /// Cell containing `pos`, or `None` if `pos` is outside the world.
    pub fn cell_at(&self, pos: Point) -> Option<CellId> {
        if !self.bounds.contains(pos) {
            return None;
        }
        let col = (pos.x / self.cell_size) as u32;
        let row = (pos.y / self.cell_size) as u32;
        // Positions a hair under the bound can land on the edge cell.
        let col = col.min(self.cols - 1);
        let row = row.min(self.rows - 1);
        Some(CellId(row * self.cols + col))
    }

    // ── Rebuild ───────────────────────────────────────────────────────────

    /// Reconstruct the index from current positions.
    ///
    /// `include` selects which agents participate (e.g. excluding Dead
    /// agents under a removal-on-death policy); excluded agents get
    /// `CellId::INVALID` membership and never appear in contact results.
    ///
    /// # Errors
    ///
    /// [`SpatialError::IndexInconsistency`] if an included agent's position
    /// maps to no cell, or if the bucket totals disagree with the number of
    /// insertions.
    pub fn rebuild(
        &mut self,
        positions: &[Point],
        include: impl Fn(AgentId) -> bool,
    ) -> SpatialResult<()> {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.membership.clear();
        self.membership.resize(positions.len(), CellId::INVALID);
        self.occupied = 0;

        for (i, &pos) in positions.iter().enumerate() {
            let agent = AgentId(i as u32);
            if !include(agent) {
                continue;
            }
            let cell = self.cell_at(pos).ok_or(SpatialError::IndexInconsistency {
                agent,
                detail: "position outside the world maps to no cell",
            })?;
            self.cells[cell.index()].push(agent);
            self.membership[i] = cell;
            self.occupied += 1;
        }

        let bucketed: usize = self.cells.iter().map(Vec::len).sum();
        if bucketed != self.occupied {
            return Err(SpatialError::IndexInconsistency {
                agent: AgentId::INVALID,
                detail: "bucket totals disagree with membership count",
            });
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Call `f` for every indexed agent within `radius` of `agent`,
    /// excluding `agent` itself.
    ///
    /// Returns without calling `f` if `agent` is not in the index.  `radius`
    /// may be smaller than the cell size (policy-scaled) or larger — the
    /// scanned neighbourhood widens accordingly.
    pub fn for_each_within(
        &self,
        agent: AgentId,
        radius: f32,
        positions: &[Point],
        mut f: impl FnMut(AgentId),
    ) {
        let home = self.membership[agent.index()];
        if home == CellId::INVALID || radius <= 0.0 {
            return;
        }
        let home_row = home.0 / self.cols;
        let home_col = home.0 % self.cols;
        let reach = (radius / self.cell_size).ceil() as u32;

        let row_lo = home_row.saturating_sub(reach);
        let row_hi = (home_row + reach).min(self.rows - 1);
        let col_lo = home_col.saturating_sub(reach);
        let col_hi = (home_col + reach).min(self.cols - 1);

        let center = positions[agent.index()];
        let radius_sq = radius * radius;

        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                for &other in &self.cells[(row * self.cols + col) as usize] {
                    if other == agent {
                        continue;
                    }
                    if center.distance_sq(positions[other.index()]) <= radius_sq {
                        f(other);
                    }
                }
            }
        }
    }

    /// All indexed agents within `radius` of `agent` (excluding
    /// `agent`).  The result is symmetric: if B appears for A at radius r,
    /// A appears for B at the same radius.
    pub fn contacts_of(&self, agent: AgentId, radius: f32, positions: &[Point]) -> Vec<AgentId> {
        let mut out = Vec::new();
        self.for_each_within(agent, radius, positions, |other| out.push(other));
        out
    }
}
