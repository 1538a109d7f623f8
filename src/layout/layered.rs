//! Built-in layered (Sugiyama-style) layout backend.
//!
//! Places nodes in left-to-right ranks the way hierarchical lineage is
//! read: sources on the left, dependents to the right.
//!
//! Phases:
//!   1. Cycle removal (drop back edges found by depth-first search)
//!   2. Rank assignment (longest path over the acyclic edge set)
//!   3. Virtual node insertion for edges spanning multiple ranks
//!   4. Crossing reduction (barycenter ordering sweeps)
//!   5. Coordinate assignment honoring box sizes and separations
//!
//! Ranks map to x, order within a rank maps to y. Dropped back edges and
//! omitted long-edge routing only affect aesthetics — every real node
//! still receives a position, and ties follow insertion order.

use std::collections::{HashMap, VecDeque};

use super::{LayoutBackend, LayoutBox, LayoutConfig};

/// The layered layout engine. Stateless; all inputs arrive per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredLayout;

impl LayeredLayout {
    /// Create a new layered layout backend.
    pub fn new() -> Self {
        Self
    }
}

/// Number of down/up barycenter ordering sweeps.
const ORDERING_SWEEPS: usize = 4;

impl LayoutBackend for LayeredLayout {
    fn layout(
        &self,
        boxes: &[LayoutBox],
        edges: &[(String, String)],
        config: &LayoutConfig,
    ) -> HashMap<String, (f32, f32)> {
        let n = boxes.len();
        if n == 0 {
            return HashMap::new();
        }

        let index: HashMap<&str, usize> = boxes
            .iter()
            .enumerate()
            .map(|(slot, b)| (b.id.as_str(), slot))
            .collect();

        // Resolve edges to slots; unknown endpoints and self loops don't
        // participate in ranking.
        let mut resolved: Vec<(usize, usize)> = Vec::with_capacity(edges.len());
        for (source, target) in edges {
            let (Some(&s), Some(&t)) = (index.get(source.as_str()), index.get(target.as_str()))
            else {
                continue;
            };
            if s != t {
                resolved.push((s, t));
            }
        }

        let acyclic = break_cycles(n, &resolved);

        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut indegree = vec![0usize; n];
        for &(s, t) in &acyclic {
            adj[s].push(t);
            indegree[t] += 1;
        }

        // Longest-path ranks over the acyclic edge set.
        let mut rank = vec![0usize; n];
        for &u in &topo_order(n, &adj, &indegree) {
            for &v in &adj[u] {
                if rank[v] < rank[u] + 1 {
                    rank[v] = rank[u] + 1;
                }
            }
        }
        let max_rank = rank.iter().copied().max().unwrap_or(0);

        // Items are real slots plus virtual nodes threaded through the
        // ranks a long edge crosses. Virtual nodes have no box; they
        // reserve an edge channel during coordinate assignment.
        let mut item_rank: Vec<usize> = rank.clone();
        let mut item_box: Vec<Option<usize>> = (0..n).map(Some).collect();
        let mut segments: Vec<(usize, usize)> = Vec::new();
        for &(s, t) in &acyclic {
            if rank[t] == rank[s] + 1 {
                segments.push((s, t));
            } else {
                let mut previous = s;
                for r in rank[s] + 1..rank[t] {
                    let virtual_item = item_rank.len();
                    item_rank.push(r);
                    item_box.push(None);
                    segments.push((previous, virtual_item));
                    previous = virtual_item;
                }
                segments.push((previous, t));
            }
        }
        let item_count = item_rank.len();

        // Layers in item creation order: insertion order is the tie-break.
        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
        for (item, &r) in item_rank.iter().enumerate() {
            layers[r].push(item);
        }

        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); item_count];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); item_count];
        for &(s, t) in &segments {
            predecessors[t].push(s);
            successors[s].push(t);
        }

        // Barycenter crossing reduction: alternate downward and upward
        // sweeps, ordering each layer by the mean position of its
        // neighbors in the fixed adjacent layer.
        let mut position = vec![0usize; item_count];
        let reindex = |layers: &[Vec<usize>], position: &mut [usize]| {
            for layer in layers {
                for (i, &item) in layer.iter().enumerate() {
                    position[item] = i;
                }
            }
        };
        reindex(&layers, &mut position);

        for _ in 0..ORDERING_SWEEPS {
            for r in 1..=max_rank {
                order_layer(&mut layers[r], &predecessors, &position);
                for (i, &item) in layers[r].iter().enumerate() {
                    position[item] = i;
                }
            }
            for r in (0..max_rank).rev() {
                order_layer(&mut layers[r], &successors, &position);
                for (i, &item) in layers[r].iter().enumerate() {
                    position[item] = i;
                }
            }
        }

        // Rank columns advance left-to-right; each column is as wide as
        // its widest box.
        let mut column_width = vec![0f32; max_rank + 1];
        for (slot, layout_box) in boxes.iter().enumerate() {
            let r = rank[slot];
            if layout_box.width > column_width[r] {
                column_width[r] = layout_box.width;
            }
        }
        let mut column_center = vec![0f32; max_rank + 1];
        let mut x_cursor = 0f32;
        for r in 0..=max_rank {
            column_center[r] = x_cursor + column_width[r] / 2.0;
            x_cursor += column_width[r] + config.rank_separation;
        }

        // Stack each layer top-down: boxes take their height plus the
        // node separation, virtual nodes reserve an edge channel.
        let mut centers = HashMap::with_capacity(n);
        for (r, layer) in layers.iter().enumerate() {
            let mut y_cursor = 0f32;
            for &item in layer {
                match item_box[item] {
                    Some(slot) => {
                        let height = boxes[slot].height;
                        centers.insert(
                            boxes[slot].id.clone(),
                            (column_center[r], y_cursor + height / 2.0),
                        );
                        y_cursor += height + config.node_separation;
                    }
                    None => {
                        y_cursor += config.edge_separation;
                    }
                }
            }
        }
        centers
    }
}

/// Order one layer by the mean position of each item's neighbors in the
/// adjacent (already positioned) layer. Items without neighbors keep
/// their current position as the sort key.
fn order_layer(layer: &mut [usize], neighbors: &[Vec<usize>], position: &[usize]) {
    let mut keyed: Vec<(f32, usize)> = layer
        .iter()
        .enumerate()
        .map(|(i, &item)| {
            let adjacent = &neighbors[item];
            let key = if adjacent.is_empty() {
                i as f32
            } else {
                adjacent.iter().map(|&p| position[p] as f32).sum::<f32>() / adjacent.len() as f32
            };
            (key, item)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    for (slot, (_, item)) in keyed.into_iter().enumerate() {
        layer[slot] = item;
    }
}

/// Drop the back edges found by an iterative depth-first search, leaving
/// an acyclic edge set. Starts from every unvisited slot in order, so
/// root-less cycles are covered too.
fn break_cycles(n: usize, edges: &[(usize, usize)]) -> Vec<(usize, usize)> {
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (edge, &(s, _)) in edges.iter().enumerate() {
        outgoing[s].push(edge);
    }

    const UNVISITED: u8 = 0;
    const ON_STACK: u8 = 1;
    const DONE: u8 = 2;
    let mut state = vec![UNVISITED; n];
    let mut keep = vec![true; edges.len()];

    for start in 0..n {
        if state[start] != UNVISITED {
            continue;
        }
        state[start] = ON_STACK;
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(frame) = stack.last_mut() {
            let (u, next) = *frame;
            if next < outgoing[u].len() {
                frame.1 += 1;
                let edge = outgoing[u][next];
                let v = edges[edge].1;
                match state[v] {
                    UNVISITED => {
                        state[v] = ON_STACK;
                        stack.push((v, 0));
                    }
                    ON_STACK => keep[edge] = false,
                    _ => {}
                }
            } else {
                state[u] = DONE;
                stack.pop();
            }
        }
    }

    edges
        .iter()
        .zip(keep)
        .filter_map(|(&edge, kept)| kept.then_some(edge))
        .collect()
}

/// Kahn's topological order over an acyclic adjacency list.
fn topo_order(n: usize, adj: &[Vec<usize>], indegree: &[usize]) -> Vec<usize> {
    let mut indegree = indegree.to_vec();
    let mut queue: VecDeque<usize> = (0..n).filter(|&slot| indegree[slot] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(u) = queue.pop_front() {
        order.push(u);
        for &v in &adj[u] {
            indegree[v] -= 1;
            if indegree[v] == 0 {
                queue.push_back(v);
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes(ids: &[&str]) -> Vec<LayoutBox> {
        ids.iter()
            .map(|id| LayoutBox {
                id: (*id).to_owned(),
                width: 60.0,
                height: 30.0,
            })
            .collect()
    }

    fn pairs(edges: &[(&str, &str)]) -> Vec<(String, String)> {
        edges
            .iter()
            .map(|(s, t)| ((*s).to_owned(), (*t).to_owned()))
            .collect()
    }

    #[test]
    fn test_ranks_advance_left_to_right() {
        let layout = LayeredLayout::new();
        let centers = layout.layout(
            &boxes(&["T1", "V1", "R1"]),
            &pairs(&[("T1", "V1"), ("V1", "R1")]),
            &LayoutConfig::default(),
        );

        assert!(centers["T1"].0 < centers["V1"].0);
        assert!(centers["V1"].0 < centers["R1"].0);
        // Rank separation is respected between column centers.
        assert!(centers["V1"].0 - centers["T1"].0 >= 150.0);
    }

    #[test]
    fn test_siblings_separated_within_rank() {
        let layout = LayeredLayout::new();
        let centers = layout.layout(
            &boxes(&["T1", "A", "B"]),
            &pairs(&[("T1", "A"), ("T1", "B")]),
            &LayoutConfig::default(),
        );

        assert_eq!(centers["A"].0, centers["B"].0);
        let gap = (centers["A"].1 - centers["B"].1).abs();
        // Box height 30 + node separation 100.
        assert_eq!(gap, 130.0);
    }

    #[test]
    fn test_every_node_positioned() {
        let layout = LayeredLayout::new();
        let centers = layout.layout(
            &boxes(&["A", "B", "LONELY"]),
            &pairs(&[("A", "B")]),
            &LayoutConfig::default(),
        );
        assert_eq!(centers.len(), 3);
        // Isolated nodes land in rank 0.
        assert_eq!(centers["LONELY"].0, centers["A"].0);
    }

    #[test]
    fn test_cycle_terminates_and_places_all() {
        let layout = LayeredLayout::new();
        let centers = layout.layout(
            &boxes(&["A", "B", "C"]),
            &pairs(&[("A", "B"), ("B", "C"), ("C", "A")]),
            &LayoutConfig::default(),
        );
        assert_eq!(centers.len(), 3);
        // One edge of the cycle is dropped; the remaining chain still
        // ranks left to right.
        assert!(centers["A"].0 < centers["B"].0);
        assert!(centers["B"].0 < centers["C"].0);
    }

    #[test]
    fn test_long_edge_reserves_channel() {
        // A -> D spans two ranks (A -> B -> C ... D at rank shaped by
        // the longest path), threading a virtual node through the middle
        // rank.
        let layout = LayeredLayout::new();
        let centers = layout.layout(
            &boxes(&["A", "B", "C"]),
            &pairs(&[("A", "B"), ("B", "C"), ("A", "C")]),
            &LayoutConfig::default(),
        );
        assert_eq!(centers.len(), 3);
        assert!(centers["A"].0 < centers["B"].0);
        assert!(centers["B"].0 < centers["C"].0);
    }

    #[test]
    fn test_unknown_edge_endpoints_ignored() {
        let layout = LayeredLayout::new();
        let centers = layout.layout(
            &boxes(&["A"]),
            &pairs(&[("A", "GHOST"), ("GHOST", "A")]),
            &LayoutConfig::default(),
        );
        assert_eq!(centers.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let layout = LayeredLayout::new();
        let centers = layout.layout(&[], &[], &LayoutConfig::default());
        assert!(centers.is_empty());
    }
}
