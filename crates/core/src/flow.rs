use std::collections::VecDeque;

#[derive(Debug, Clone)]
struct FlowEdge {
    to: usize,
    capacity: i64,
    residual: i64,
}

/// Directed flow network solved with Dinic's algorithm. Edges are stored in
/// pairs so that `id ^ 1` is always the reverse edge of `id`.
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    adjacency: Vec<Vec<usize>>,
    edges: Vec<FlowEdge>,
}

impl FlowNetwork {
    pub fn new(nodes: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); nodes],
            edges: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn add_edge(&mut self, from: usize, to: usize, capacity: i64) -> usize {
        let capacity = capacity.max(0);
        let id = self.edges.len();
        self.edges.push(FlowEdge {
            to,
            capacity,
            residual: capacity,
        });
        self.edges.push(FlowEdge {
            to: from,
            capacity: 0,
            residual: 0,
        });
        self.adjacency[from].push(id);
        self.adjacency[to].push(id + 1);
        id
    }

    /// Flow currently routed through the forward edge `id`.
    pub fn flow_on(&self, id: usize) -> i64 {
        self.edges
            .get(id)
            .map(|edge| edge.capacity - edge.residual)
            .unwrap_or(0)
    }

    /// Pushes flow from `source` to `sink` until no augmenting path remains
    /// or `limit` units have been routed.
    pub fn max_flow(&mut self, source: usize, sink: usize, limit: i64) -> i64 {
        if source == sink || source >= self.node_count() || sink >= self.node_count() {
            return 0;
        }
        let mut total = 0;
        let mut level = vec![None; self.node_count()];
        let mut cursor = vec![0usize; self.node_count()];
        while total < limit && self.build_levels(source, sink, &mut level) {
            cursor.iter_mut().for_each(|slot| *slot = 0);
            loop {
                let pushed = self.push(source, sink, limit - total, &level, &mut cursor);
                if pushed == 0 {
                    break;
                }
                total += pushed;
                if total >= limit {
                    break;
                }
            }
        }
        total
    }

    fn build_levels(&self, source: usize, sink: usize, level: &mut [Option<u32>]) -> bool {
        level.iter_mut().for_each(|slot| *slot = None);
        level[source] = Some(0);
        let mut queue = VecDeque::from([source]);
        while let Some(node) = queue.pop_front() {
            let depth = level[node].unwrap_or(0);
            for &id in &self.adjacency[node] {
                let edge = &self.edges[id];
                if edge.residual > 0 && level[edge.to].is_none() {
                    level[edge.to] = Some(depth + 1);
                    queue.push_back(edge.to);
                }
            }
        }
        level[sink].is_some()
    }

    fn push(
        &mut self,
        node: usize,
        sink: usize,
        available: i64,
        level: &[Option<u32>],
        cursor: &mut [usize],
    ) -> i64 {
        if node == sink {
            return available;
        }
        let Some(depth) = level[node] else {
            return 0;
        };
        while cursor[node] < self.adjacency[node].len() {
            let id = self.adjacency[node][cursor[node]];
            let (to, residual) = (self.edges[id].to, self.edges[id].residual);
            if residual > 0 && level[to] == Some(depth + 1) {
                let pushed = self.push(to, sink, available.min(residual), level, cursor);
                if pushed > 0 {
                    self.edges[id].residual -= pushed;
                    self.edges[id ^ 1].residual += pushed;
                    return pushed;
                }
            }
            cursor[node] += 1;
        }
        0
    }
}
