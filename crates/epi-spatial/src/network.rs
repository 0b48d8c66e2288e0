//! Static contact network in CSR adjacency form.
//!
//! # Data layout
//!
//! The undirected graph is stored as **Compressed Sparse Row (CSR)**
//! adjacency.  Given a `NodeId n`, its neighbours occupy the slice:
//!
//! ```text
//! adj[ adj_start[n] .. adj_start[n+1] ]
//! ```
//!
//! Each undirected edge appears twice (once per direction), sorted by source
//! then target, so a node's neighbour list is a contiguous, ascending memory
//! scan — the contact-resolution inner loop touches nothing else.
//!
//! Network mode places one agent per node (`AgentId(i)` on `NodeId(i)`), and
//! the topology is static, so unlike the grid there is no per-tick rebuild.

use epi_core::{NodeId, RngStream};

use crate::{SpatialError, SpatialResult};

/// Undirected contact graph in CSR form.
#[derive(Debug)]
pub struct ContactNetwork {
    /// CSR row pointer.  Neighbours of node `n` are at
    /// `adj[adj_start[n] .. adj_start[n+1]]`.  Length = `node_count + 1`.
    adj_start: Vec<u32>,
    /// Neighbour lists, ascending within each node's slice.
    adj: Vec<NodeId>,
}

impl ContactNetwork {
    /// Build from an undirected edge list.
    ///
    /// Endpoints must be `< node_count` and distinct; duplicate edges are
    /// collapsed (a pair is in contact once per tick regardless of how many
    /// times its edge was listed).
    pub fn from_edges(node_count: usize, edges: &[(u32, u32)]) -> SpatialResult<Self> {
        let mut directed: Vec<(u32, u32)> = Vec::with_capacity(edges.len() * 2);
        for &(a, b) in edges {
            if a as usize >= node_count || b as usize >= node_count {
                return Err(SpatialError::EdgeOutOfRange { from: a, to: b, node_count });
            }
            if a == b {
                return Err(SpatialError::SelfLoop(a));
            }
            directed.push((a, b));
            directed.push((b, a));
        }
        directed.sort_unstable();
        directed.dedup();

        // Counting pass builds the CSR row pointer.
        let mut adj_start = vec![0u32; node_count + 1];
        for &(from, _) in &directed {
            adj_start[from as usize + 1] += 1;
        }
        for i in 1..=node_count {
            adj_start[i] += adj_start[i - 1];
        }
        debug_assert_eq!(adj_start[node_count] as usize, directed.len());

        let adj = directed.into_iter().map(|(_, to)| NodeId(to)).collect();
        Ok(Self { adj_start, adj })
    }

    /// Build an Erdős–Rényi random graph with the given expected mean
    /// degree: each of the N(N-1)/2 possible edges is included independently
    /// with probability `mean_degree / node_count`.
    ///
    /// Draws come from the contact-sampling stream, so the generated
    /// topology is a pure function of the master seed.
    pub fn erdos_renyi(
        node_count: usize,
        mean_degree: f64,
        stream: &mut RngStream,
    ) -> SpatialResult<Self> {
        if node_count == 0 {
            return Self::from_edges(0, &[]);
        }
        if !(0.0..=node_count as f64).contains(&mean_degree) {
            return Err(SpatialError::InvalidMeanDegree(mean_degree));
        }
        let p = mean_degree / node_count as f64;
        let mut edges = Vec::new();
        for a in 0..node_count as u32 {
            for b in (a + 1)..node_count as u32 {
                if stream.gen_bool(p) {
                    edges.push((a, b));
                }
            }
        }
        Self::from_edges(node_count, &edges)
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.adj_start.len() - 1
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adj.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Neighbours of `node`, ascending.  A contiguous slice — no allocation.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        let start = self.adj_start[node.index()] as usize;
        let end = self.adj_start[node.index() + 1] as usize;
        &self.adj[start..end]
    }

    /// Degree of `node`.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// Mean degree across all nodes (0.0 for the empty graph).
    pub fn mean_degree(&self) -> f64 {
        if self.node_count() == 0 {
            return 0.0;
        }
        self.adj.len() as f64 / self.node_count() as f64
    }
}
