//! Isthmus detection relative to a source.

use crate::types::{Edge, Graph, VertexId};

/// The edge whose removal cuts `vertex` off from `source`, if any.
///
/// A pendant vertex (degree 1) reports no bridge. Otherwise the incident
/// arcs are tried in adjacency order and the first one whose removal makes
/// `vertex` unreachable is returned.
pub fn find_bridge<'g>(graph: &'g Graph, source: VertexId, vertex: VertexId) -> Option<&'g Edge> {
    let arcs = graph.connectors(vertex);
    if arcs.len() == 1 {
        return None;
    }
    arcs.iter()
        .find(|arc| !graph.reachable_from(source, Some(arc.id)).contains(&vertex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::Expr;

    fn v(id: u32) -> VertexId {
        VertexId::new(id)
    }

    fn triangle_with_tail() -> Graph {
        let mut g = Graph::new();
        g.add_edge(v(0), v(1), Expr::symbol("t_0")).unwrap();
        g.add_edge(v(1), v(2), Expr::symbol("t_1")).unwrap();
        g.add_edge(v(2), v(0), Expr::symbol("t_2")).unwrap();
        g.add_edge(v(0), v(3), Expr::symbol("t_3")).unwrap();
        g.add_edge(v(3), v(4), Expr::symbol("t_4")).unwrap();
        g
    }

    #[test]
    fn test_cycle_vertex_has_no_bridge() {
        let g = triangle_with_tail();
        assert!(find_bridge(&g, v(0), v(1)).is_none());
        assert!(find_bridge(&g, v(0), v(2)).is_none());
    }

    #[test]
    fn test_tail_vertex_bridge() {
        let g = triangle_with_tail();
        let bridge = find_bridge(&g, v(0), v(3)).unwrap();
        assert_eq!(bridge.id.get(), 3);
    }

    #[test]
    fn test_pendant_vertex_reports_none() {
        let g = triangle_with_tail();
        assert!(find_bridge(&g, v(0), v(4)).is_none());
    }

    #[test]
    fn test_source_never_has_bridge() {
        let g = triangle_with_tail();
        assert!(find_bridge(&g, v(0), v(0)).is_none());
    }
}
