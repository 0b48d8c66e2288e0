//! Unit tests for epi-spatial.

use epi_core::{AgentId, Bounds, CellId, NodeId, Point, RngStream, StreamKind};

use crate::{ContactNetwork, SpatialError, SpatialGrid};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn grid_10x10() -> SpatialGrid {
    SpatialGrid::new(Bounds::new(10.0, 10.0), 1.0).unwrap()
}

fn include_all(_: AgentId) -> bool {
    true
}

#[cfg(test)]
mod grid_tests {
    use super::*;

    #[test]
    fn geometry_validated() {
        assert!(SpatialGrid::new(Bounds::new(0.0, 10.0), 1.0).is_err());
        assert!(SpatialGrid::new(Bounds::new(10.0, 10.0), 0.0).is_err());
        assert!(SpatialGrid::new(Bounds::new(10.0, 10.0), -1.0).is_err());
    }

    #[test]
    fn cell_count_covers_world() {
        let grid = SpatialGrid::new(Bounds::new(10.0, 5.0), 2.0).unwrap();
        assert_eq!(grid.cell_count(), 5 * 3);
    }

    #[test]
    fn rebuild_assigns_every_agent_one_cell() {
        let mut grid = grid_10x10();
        let positions = vec![
            Point::new(0.5, 0.5),
            Point::new(9.5, 9.5),
            Point::new(4.2, 7.8),
        ];
        grid.rebuild(&positions, include_all).unwrap();
        assert_eq!(grid.occupied(), 3);
        for i in 0..3 {
            assert_ne!(grid.cell_of(AgentId(i)), CellId::INVALID);
        }
    }

    #[test]
    fn excluded_agents_not_indexed() {
        let mut grid = grid_10x10();
        let positions = vec![Point::new(1.0, 1.0), Point::new(1.1, 1.1)];
        grid.rebuild(&positions, |a| a != AgentId(1)).unwrap();
        assert_eq!(grid.occupied(), 1);
        assert_eq!(grid.cell_of(AgentId(1)), CellId::INVALID);
        assert!(grid.contacts_of(AgentId(0), 1.0, &positions).is_empty());
        // An excluded agent also queries to nothing.
        assert!(grid.contacts_of(AgentId(1), 1.0, &positions).is_empty());
    }

    #[test]
    fn out_of_world_position_is_inconsistency() {
        let mut grid = grid_10x10();
        let positions = vec![Point::new(10.5, 1.0)];
        let err = grid.rebuild(&positions, include_all).unwrap_err();
        assert!(matches!(
            err,
            SpatialError::IndexInconsistency { agent: AgentId(0), .. }
        ));
    }

    #[test]
    fn contacts_within_radius_only() {
        let mut grid = grid_10x10();
        let positions = vec![
            Point::new(5.0, 5.0), // querying agent
            Point::new(5.4, 5.0), // in range
            Point::new(6.5, 5.0), // out of range
            Point::new(5.0, 5.9), // in range (cross-cell)
        ];
        grid.rebuild(&positions, include_all).unwrap();
        let mut contacts = grid.contacts_of(AgentId(0), 1.0, &positions);
        contacts.sort_unstable();
        assert_eq!(contacts, vec![AgentId(1), AgentId(3)]);
    }

    #[test]
    fn querying_agent_never_its_own_contact() {
        let mut grid = grid_10x10();
        let positions = vec![Point::new(2.0, 2.0)];
        grid.rebuild(&positions, include_all).unwrap();
        assert!(grid.contacts_of(AgentId(0), 5.0, &positions).is_empty());
    }

    #[test]
    fn contacts_are_symmetric() {
        let mut grid = grid_10x10();
        let positions = vec![Point::new(3.0, 3.0), Point::new(3.7, 3.2)];
        grid.rebuild(&positions, include_all).unwrap();
        let a = grid.contacts_of(AgentId(0), 1.0, &positions);
        let b = grid.contacts_of(AgentId(1), 1.0, &positions);
        assert_eq!(a, vec![AgentId(1)]);
        assert_eq!(b, vec![AgentId(0)]);
    }

    #[test]
    fn radius_wider_than_cell_size() {
        let mut grid = grid_10x10();
        let positions = vec![Point::new(1.0, 1.0), Point::new(4.5, 1.0)];
        grid.rebuild(&positions, include_all).unwrap();
        // 3.5 apart: found at radius 4 even though cells are 1×1.
        assert_eq!(grid.contacts_of(AgentId(0), 4.0, &positions), vec![AgentId(1)]);
        assert!(grid.contacts_of(AgentId(0), 3.0, &positions).is_empty());
    }

    #[test]
    fn zero_radius_finds_nothing() {
        let mut grid = grid_10x10();
        let positions = vec![Point::new(1.0, 1.0), Point::new(1.0, 1.0)];
        grid.rebuild(&positions, include_all).unwrap();
        assert!(grid.contacts_of(AgentId(0), 0.0, &positions).is_empty());
    }

    #[test]
    fn rebuild_clears_previous_tick() {
        let mut grid = grid_10x10();
        let t0 = vec![Point::new(1.0, 1.0), Point::new(1.2, 1.0)];
        grid.rebuild(&t0, include_all).unwrap();
        assert_eq!(grid.contacts_of(AgentId(0), 1.0, &t0), vec![AgentId(1)]);

        // Agent 1 moved far away; a rebuild must forget the old bucket.
        let t1 = vec![Point::new(1.0, 1.0), Point::new(9.0, 9.0)];
        grid.rebuild(&t1, include_all).unwrap();
        assert!(grid.contacts_of(AgentId(0), 1.0, &t1).is_empty());
        assert_eq!(grid.occupied(), 2);
    }
}

#[cfg(test)]
mod network_tests {
    use super::*;

    #[test]
    fn csr_neighbors_sorted() {
        let net = ContactNetwork::from_edges(4, &[(2, 0), (0, 1), (3, 0)]).unwrap();
        assert_eq!(net.neighbors(NodeId(0)), &[NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(net.neighbors(NodeId(1)), &[NodeId(0)]);
        assert_eq!(net.degree(NodeId(0)), 3);
        assert_eq!(net.edge_count(), 3);
        assert_eq!(net.node_count(), 4);
    }

    #[test]
    fn duplicate_edges_collapsed() {
        let net = ContactNetwork::from_edges(3, &[(0, 1), (1, 0), (0, 1)]).unwrap();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.neighbors(NodeId(0)), &[NodeId(1)]);
    }

    #[test]
    fn out_of_range_edge_rejected() {
        let err = ContactNetwork::from_edges(2, &[(0, 2)]).unwrap_err();
        assert!(matches!(err, SpatialError::EdgeOutOfRange { from: 0, to: 2, node_count: 2 }));
    }

    #[test]
    fn self_loop_rejected() {
        let err = ContactNetwork::from_edges(3, &[(1, 1)]).unwrap_err();
        assert!(matches!(err, SpatialError::SelfLoop(1)));
    }

    #[test]
    fn isolated_nodes_have_no_neighbors() {
        let net = ContactNetwork::from_edges(3, &[]).unwrap();
        for n in 0..3 {
            assert!(net.neighbors(NodeId(n)).is_empty());
        }
        assert!(net.is_empty());
    }

    #[test]
    fn erdos_renyi_deterministic_for_seed() {
        let mut s1 = RngStream::new(99, StreamKind::Contact);
        let mut s2 = RngStream::new(99, StreamKind::Contact);
        let a = ContactNetwork::erdos_renyi(50, 6.0, &mut s1).unwrap();
        let b = ContactNetwork::erdos_renyi(50, 6.0, &mut s2).unwrap();
        assert_eq!(a.edge_count(), b.edge_count());
        for n in 0..50 {
            assert_eq!(a.neighbors(NodeId(n)), b.neighbors(NodeId(n)));
        }
    }

    #[test]
    fn erdos_renyi_mean_degree_plausible() {
        let mut stream = RngStream::new(7, StreamKind::Contact);
        let net = ContactNetwork::erdos_renyi(400, 10.0, &mut stream).unwrap();
        let mean = net.mean_degree();
        assert!((6.0..14.0).contains(&mean), "mean degree {mean} implausible for target 10");
        // ER construction can never produce self-loops.
        for n in 0..400 {
            assert!(!net.neighbors(NodeId(n)).contains(&NodeId(n)));
        }
    }

    #[test]
    fn erdos_renyi_rejects_bad_degree() {
        let mut stream = RngStream::new(7, StreamKind::Contact);
        assert!(ContactNetwork::erdos_renyi(10, -1.0, &mut stream).is_err());
        assert!(ContactNetwork::erdos_renyi(10, 11.0, &mut stream).is_err());
    }
}
