use crate::error::{Exhaustion, GraphError};
use crate::options::BridgeOptions;
use derive_more::Display;
use petgraph::visit::{
    EdgeRef, GraphRef, IntoEdges, IntoNodeIdentifiers, NodeIndexable, VisitMap, Visitable,
};
use std::fmt::Debug;
use tracing::{debug, trace};

/// An edge whose removal disconnects its component.
///
/// `source` is the DFS parent and `target` the DFS child; the graph is undirected, so use
/// [`Bridge::connects`] to compare endpoints regardless of direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{} -- {}", source, target)]
pub struct Bridge<N, E> {
    pub source: N,
    pub target: N,
    pub edge: E,
}

impl<N: PartialEq, E> Bridge<N, E> {
    /// Returns whether the bridge joins `a` and `b`, in either direction.
    pub fn connects(&self, a: &N, b: &N) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }
}

// A suspended DFS call: the node being visited, the tree edge it was reached through, and the
// cursor into its incident edges so the visit resumes where it left off once a child subtree is
// done.
struct Frame<N, E, I> {
    node: N,
    // DFS parent and the edge used to descend from it; `None` for a root
    parent: Option<(N, E)>,
    // whether the descending edge came back under the same id
    tree_edge_seen: bool,
    // other edges leading back to the parent
    parent_edges: usize,
    edges: I,
    children: usize,
    is_articulation: bool,
}

/// Traversal state shared by every DFS tree of one graph.
///
/// Each walk records, per node, when it was discovered and the earliest discovery time its
/// subtree can climb back to without reusing the edge it hangs from. A child whose subtree
/// cannot climb above its parent hangs from a bridge.
///
/// The edge used to descend is skipped by its `EdgeId`, so a parallel edge to the parent still
/// counts as a back edge. Graphs whose ids differ per endpoint, like `GraphMap`'s ordered pairs,
/// never report a match; for them one edge back to the parent stands in for the tree edge.
#[derive(Debug)]
pub struct LowLink<N, E, VM> {
    used: VM,
    // discovery time per node index, usize::MAX until reached
    ord: Vec<usize>,
    // lowest discovery time reachable from the subtree with at most one non-tree edge
    low: Vec<usize>,
    time: usize,
    max_depth: Option<usize>,
    // bridges of the tree being walked, keyed by the ord of their child endpoint
    pending: Vec<(usize, Bridge<N, E>)>,
    /// Cut vertices, in the order their visit completed.
    pub articulations: Vec<N>,
    /// Bridges of every walked tree, each tree in child discovery order.
    pub bridges: Vec<Bridge<N, E>>,
}

impl<N, E, VM> LowLink<N, E, VM>
where
    N: Copy + PartialEq + Debug,
    E: Copy + PartialEq + Debug,
    VM: VisitMap<N>,
{
    /// Allocates empty state sized for `graph`, without a depth limit.
    pub fn new<G>(graph: G) -> Result<Self, GraphError>
    where
        G: GraphRef + NodeIndexable + Visitable<NodeId = N, EdgeId = E, Map = VM>,
    {
        Self::with_options(graph, &BridgeOptions::default())
    }

    /// Allocates empty state sized for `graph`; fails with `ResourceExhaustion` if the
    /// per-node arrays cannot be reserved.
    pub fn with_options<G>(graph: G, options: &BridgeOptions) -> Result<Self, GraphError>
    where
        G: GraphRef + NodeIndexable + Visitable<NodeId = N, EdgeId = E, Map = VM>,
    {
        let capacity = graph.node_bound();

        Ok(Self {
            used: graph.visit_map(),
            ord: unvisited(capacity)?,
            low: unvisited(capacity)?,
            time: 0,
            max_depth: options.max_depth,
            pending: vec![],
            articulations: vec![],
            bridges: vec![],
        })
    }

    /// Roots a DFS tree at every node not reached yet, in `node_identifiers()` order.
    pub fn traverse<G>(&mut self, graph: G) -> Result<(), GraphError>
    where
        G: IntoEdges<NodeId = N, EdgeId = E> + IntoNodeIdentifiers<NodeId = N> + NodeIndexable,
    {
        for node_id in graph.node_identifiers() {
            if !self.used.is_visited(&node_id) {
                self.dfs(graph, node_id)?;
            }
        }

        debug!(
            visited = self.time,
            bridges = self.bridges.len(),
            articulations = self.articulations.len(),
            "low-link traversal finished"
        );

        Ok(())
    }

    /// Walks only the component containing `root`. Does nothing if `root` was already reached.
    pub fn traverse_from<G>(&mut self, graph: G, root: N) -> Result<(), GraphError>
    where
        G: IntoEdges<NodeId = N, EdgeId = E> + NodeIndexable,
    {
        if self.used.is_visited(&root) {
            return Ok(());
        }

        self.dfs(graph, root)
    }

    fn dfs<G>(&mut self, graph: G, root: N) -> Result<(), GraphError>
    where
        G: IntoEdges<NodeId = N, EdgeId = E> + NodeIndexable,
    {
        trace!(root = ?root, "rooting DFS tree");

        self.slot(graph, root, || "traversal root".to_string())?;

        let mut stack = Vec::new();
        self.enter(graph, &mut stack, root, None)?;

        while let Some(frame) = stack.last_mut() {
            let node = frame.node;
            let Some(edge) = frame.edges.next() else {
                self.leave(graph, &mut stack);
                continue;
            };

            let to_node = if edge.source() == node {
                edge.target()
            } else {
                edge.source()
            };

            // self loops never disconnect anything
            if to_node == node {
                continue;
            }

            let to_idx = self.slot(graph, to_node, || format!("{:?}", edge.id()))?;

            if !self.used.is_visited(&to_node) {
                frame.children += 1;
                self.enter(graph, &mut stack, to_node, Some((node, edge.id())))?;
            } else if let Some((_, tree_edge)) = frame.parent.filter(|&(p, _)| p == to_node) {
                // settled in `leave`, once every edge to the parent has been seen
                if edge.id() == tree_edge {
                    frame.tree_edge_seen = true;
                } else {
                    frame.parent_edges += 1;
                }
            } else {
                let idx = graph.to_index(node);
                self.low[idx] = self.low[idx].min(self.ord[to_idx]);
            }
        }

        self.pending.sort_by_key(|&(ord, _)| ord);
        self.bridges
            .extend(self.pending.drain(..).map(|(_, bridge)| bridge));

        Ok(())
    }

    fn enter<G>(
        &mut self,
        graph: G,
        stack: &mut Vec<Frame<N, E, G::Edges>>,
        node: N,
        parent: Option<(N, E)>,
    ) -> Result<(), GraphError>
    where
        G: IntoEdges<NodeId = N, EdgeId = E> + NodeIndexable,
    {
        if let Some(limit) = self.max_depth {
            if stack.len() >= limit {
                return Err(Exhaustion::DepthLimit {
                    limit,
                    node: format!("{:?}", node),
                }
                .into());
            }
        }

        stack
            .try_reserve(1)
            .map_err(|source| Exhaustion::Allocation {
                entries: stack.len() + 1,
                source,
            })?;

        let idx = graph.to_index(node);

        self.used.visit(node);
        self.ord[idx] = self.time;
        self.low[idx] = self.ord[idx];
        self.time += 1;

        stack.push(Frame {
            node,
            parent,
            tree_edge_seen: false,
            parent_edges: 0,
            edges: graph.edges(node),
            children: 0,
            is_articulation: false,
        });

        Ok(())
    }

    // Pops a finished frame and folds its low-link into the frame below, as returning from the
    // recursive call would.
    fn leave<G>(&mut self, graph: G, stack: &mut Vec<Frame<N, E, G::Edges>>)
    where
        G: IntoEdges<NodeId = N, EdgeId = E> + NodeIndexable,
    {
        let Some(done) = stack.pop() else {
            return;
        };
        let to_idx = graph.to_index(done.node);

        if done.is_articulation {
            self.articulations.push(done.node);
        }

        let Some(above) = stack.last_mut() else {
            if done.children >= 2 {
                self.articulations.push(done.node);
            }
            return;
        };
        let idx = graph.to_index(above.node);

        let back_to_parent = if done.tree_edge_seen {
            done.parent_edges
        } else {
            done.parent_edges.saturating_sub(1)
        };
        if back_to_parent > 0 {
            self.low[to_idx] = self.low[to_idx].min(self.ord[idx]);
        }

        self.low[idx] = self.low[idx].min(self.low[to_idx]);

        // a root is a cut vertex only through its child count
        if above.parent.is_some() && self.ord[idx] <= self.low[to_idx] {
            above.is_articulation = true;
        }

        if self.ord[idx] < self.low[to_idx] {
            if let Some((_, edge)) = done.parent {
                self.pending.push((
                    self.ord[to_idx],
                    Bridge {
                        source: above.node,
                        target: done.node,
                        edge,
                    },
                ));
            }
        }
    }

    fn slot<G>(&self, graph: G, node: N, edge: impl FnOnce() -> String) -> Result<usize, GraphError>
    where
        G: NodeIndexable<NodeId = N>,
    {
        let idx = graph.to_index(node);

        if idx < self.ord.len() {
            Ok(idx)
        } else {
            Err(GraphError::InvalidGraphReference {
                node: format!("{:?}", node),
                edge: edge(),
            })
        }
    }
}

fn unvisited(capacity: usize) -> Result<Vec<usize>, Exhaustion> {
    let mut v = Vec::new();

    v.try_reserve_exact(capacity)
        .map_err(|source| Exhaustion::Allocation {
            entries: capacity,
            source,
        })?;
    v.resize(capacity, usize::MAX);

    Ok(v)
}

/// Finds every bridge of an undirected graph.
///
/// Bridges are reported in the order their child endpoint is discovered; components are walked
/// in `node_identifiers()` order. Parallel edges are never bridges and self loops are ignored.
///
/// Works on `Graph`, `StableGraph` and `GraphMap` alike.
///
/// ```
/// use kakehashi::algorithm::find_bridges;
/// use petgraph::graph::UnGraph;
///
/// let g = UnGraph::<(), ()>::from_edges(&[(0, 1), (1, 2), (2, 0), (2, 3)]);
/// let bridges = find_bridges(&g).unwrap();
///
/// assert_eq!(bridges.len(), 1);
/// assert_eq!(bridges[0].source.index(), 2);
/// assert_eq!(bridges[0].target.index(), 3);
/// ```
pub fn find_bridges<G>(graph: G) -> Result<Vec<Bridge<G::NodeId, G::EdgeId>>, GraphError>
where
    G: IntoEdges + IntoNodeIdentifiers + NodeIndexable + Visitable,
    G::NodeId: Debug,
    G::EdgeId: Debug,
{
    find_bridges_with(graph, &BridgeOptions::default())
}

/// Like [`find_bridges`], with a depth limit taken from `options`.
pub fn find_bridges_with<G>(
    graph: G,
    options: &BridgeOptions,
) -> Result<Vec<Bridge<G::NodeId, G::EdgeId>>, GraphError>
where
    G: IntoEdges + IntoNodeIdentifiers + NodeIndexable + Visitable,
    G::NodeId: Debug,
    G::EdgeId: Debug,
{
    let mut low_link = LowLink::with_options(graph, options)?;

    low_link.traverse(graph)?;

    Ok(low_link.bridges)
}
