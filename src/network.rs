//! A labelled, undirected multigraph over `petgraph`.

use crate::algorithm::{find_bridges_with, par_find_bridges, Bridge, LowLink};
use crate::error::GraphError;
use crate::options::BridgeOptions;
use crate::ranking::influencers;
use fixedbitset::FixedBitSet;
use petgraph::algo;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::NodeIndexable;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// An undirected network whose nodes are identified by labels.
///
/// Nodes are kept in insertion order, which is also the order DFS trees are rooted in. Parallel
/// edges and self loops are kept as distinct edges.
#[derive(Debug, Clone)]
pub struct Network<N> {
    graph: UnGraph<N, ()>,
    index: HashMap<N, NodeIndex>,
}

impl<N> Default for Network<N> {
    fn default() -> Self {
        Self {
            graph: UnGraph::default(),
            index: HashMap::new(),
        }
    }
}

impl<N> Network<N>
where
    N: Clone + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a network from edges alone, creating nodes as they are first mentioned.
    ///
    /// ```
    /// use kakehashi::network::Network;
    ///
    /// let network = Network::from_edges([(1, 2), (2, 3), (3, 1), (3, 4), (4, 5)]);
    /// let bridges = network.bridges().unwrap();
    ///
    /// assert_eq!(bridges.len(), 2);
    /// assert!(bridges[0].connects(&3, &4));
    /// assert!(bridges[1].connects(&4, &5));
    /// ```
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut network = Self::new();
        for (a, b) in edges {
            network.add_edge(a, b);
        }
        network
    }

    /// Builds a network from a declared node set and edges between those nodes.
    ///
    /// Fails with [`GraphError::InvalidGraphReference`] on the first edge that names an undeclared
    /// node.
    pub fn from_parts<V, I>(nodes: V, edges: I) -> Result<Self, GraphError>
    where
        V: IntoIterator<Item = N>,
        I: IntoIterator<Item = (N, N)>,
    {
        let mut network = Self::new();
        for node in nodes {
            network.add_node(node);
        }

        for (position, (a, b)) in edges.into_iter().enumerate() {
            let missing = [&a, &b]
                .into_iter()
                .find(|label| !network.index.contains_key(*label));

            if let Some(label) = missing {
                return Err(GraphError::InvalidGraphReference {
                    node: format!("{:?}", label),
                    edge: format!("#{} ({:?}, {:?})", position, a, b),
                });
            }

            network.add_edge(a, b);
        }

        Ok(network)
    }

    /// Adds a node, or returns the existing index if the label is already present.
    pub fn add_node(&mut self, label: N) -> NodeIndex {
        if let Some(&idx) = self.index.get(&label) {
            return idx;
        }

        let idx = self.graph.add_node(label.clone());
        self.index.insert(label, idx);
        idx
    }

    /// Adds an edge, creating missing endpoints. Every call adds a new edge, even between nodes
    /// that are already adjacent.
    pub fn add_edge(&mut self, a: N, b: N) -> EdgeIndex {
        let a = self.add_node(a);
        let b = self.add_node(b);

        self.graph.add_edge(a, b, ())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn graph(&self) -> &UnGraph<N, ()> {
        &self.graph
    }

    pub fn node_index(&self, label: &N) -> Option<NodeIndex> {
        self.index.get(label).copied()
    }

    pub fn label(&self, idx: NodeIndex) -> Option<&N> {
        self.graph.node_weight(idx)
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &N> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    pub fn component_count(&self) -> usize {
        algo::connected_components(&self.graph)
    }

    /// Returns the cut vertices, in the order their DFS visit completes.
    pub fn articulations(&self) -> Result<Vec<N>, GraphError> {
        self.articulations_with(&BridgeOptions::default())
    }

    pub fn articulations_with(&self, options: &BridgeOptions) -> Result<Vec<N>, GraphError> {
        let mut low_link = LowLink::with_options(&self.graph, options)?;
        low_link.traverse(&self.graph)?;

        Ok(low_link
            .articulations
            .into_iter()
            .map(|idx| self.graph[idx].clone())
            .collect())
    }

    /// The subnetwork induced by `labels`, e.g. a single community.
    pub fn subgraph(&self, labels: &[N]) -> Self {
        let mut keep = FixedBitSet::with_capacity(self.graph.node_bound());
        for idx in labels.iter().filter_map(|label| self.node_index(label)) {
            keep.insert(idx.index());
        }

        self.retain(&keep)
    }

    /// The network with `labels` and their incident edges removed.
    pub fn without_nodes(&self, labels: &[N]) -> Self {
        let mut keep = FixedBitSet::with_capacity(self.graph.node_bound());
        keep.insert_range(..);
        for idx in labels.iter().filter_map(|label| self.node_index(label)) {
            keep.set(idx.index(), false);
        }

        self.retain(&keep)
    }

    /// Removes the `top_k` highest scoring nodes of every measure.
    ///
    /// The scores come from any centrality routine, one `(label, score)` sequence per measure.
    /// Equal scores are broken by the order a measure yields them in, so pass an ordered
    /// sequence rather than a `HashMap` when ties have to resolve the same way every run.
    pub fn without_influencers<I, M>(&self, measures: I, top_k: usize) -> Self
    where
        I: IntoIterator<Item = M>,
        M: IntoIterator<Item = (N, f64)>,
    {
        let top = influencers(measures, top_k);

        self.without_nodes(&top)
    }

    fn retain(&self, keep: &FixedBitSet) -> Self {
        let graph = self.graph.filter_map(
            |idx, label| keep.contains(idx.index()).then(|| label.clone()),
            |_, _| Some(()),
        );
        let index = graph
            .node_indices()
            .map(|idx| (graph[idx].clone(), idx))
            .collect();

        Self { graph, index }
    }

    fn labelled(&self, bridge: Bridge<NodeIndex, EdgeIndex>) -> Bridge<N, EdgeIndex> {
        Bridge {
            source: self.graph[bridge.source].clone(),
            target: self.graph[bridge.target].clone(),
            edge: bridge.edge,
        }
    }
}

impl<N> Network<N>
where
    N: Clone + Eq + Hash + Debug + Sync,
{
    /// Returns the bridges, labelled, in the order their child endpoint was discovered.
    pub fn bridges(&self) -> Result<Vec<Bridge<N, EdgeIndex>>, GraphError> {
        self.bridges_with(&BridgeOptions::default())
    }

    /// Like [`Network::bridges`]; components are searched concurrently when `options.threads`
    /// is above one.
    pub fn bridges_with(
        &self,
        options: &BridgeOptions,
    ) -> Result<Vec<Bridge<N, EdgeIndex>>, GraphError> {
        let found = if options.threads > 1 {
            par_find_bridges(&self.graph, options)?
        } else {
            find_bridges_with(&self.graph, options)?
        };

        Ok(found.into_iter().map(|bridge| self.labelled(bridge)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::BridgeOptionsBuilder;

    #[test]
    fn add_node_is_idempotent() {
        let mut network = Network::new();

        let a = network.add_node("a");
        assert_eq!(network.add_node("a"), a);
        assert_eq!(network.node_count(), 1);
        assert_eq!(network.label(a), Some(&"a"));
        assert_eq!(network.node_index(&"a"), Some(a));
        assert_eq!(network.node_index(&"b"), None);
    }

    #[test]
    fn add_edge_keeps_parallel_edges() {
        let mut network = Network::new();

        let e1 = network.add_edge("a", "b");
        let e2 = network.add_edge("b", "a");

        assert_ne!(e1, e2);
        assert_eq!(network.node_count(), 2);
        assert_eq!(network.edge_count(), 2);
        assert!(network.bridges().unwrap().is_empty());
    }

    #[test]
    fn from_parts_rejects_unknown_nodes() {
        let err = Network::from_parts(["a", "b"], [("a", "b"), ("b", "c")]).unwrap_err();

        match err {
            GraphError::InvalidGraphReference { node, edge } => {
                assert_eq!(node, "\"c\"");
                assert_eq!(edge, "#1 (\"b\", \"c\")");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_parts_keeps_isolated_nodes() {
        let network = Network::from_parts(["a", "b", "c"], [("a", "b")]).unwrap();

        assert_eq!(network.node_count(), 3);
        assert_eq!(network.component_count(), 2);
        assert_eq!(network.labels().collect::<Vec<_>>(), vec![&"a", &"b", &"c"]);
    }

    #[test]
    fn labelled_bridges() {
        let network = Network::from_edges([("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")]);

        let bridges = network.bridges().unwrap();

        assert_eq!(bridges.len(), 1);
        assert_eq!(bridges[0].source, "c");
        assert_eq!(bridges[0].target, "d");
        assert_eq!(bridges[0].to_string(), "c -- d");
        assert_eq!(network.articulations().unwrap(), vec!["c"]);
    }

    #[test]
    fn threaded_bridges() {
        let network = Network::from_edges([(1, 2), (2, 3), (4, 5), (5, 6), (6, 4), (7, 8)]);
        let options = BridgeOptionsBuilder::default().threads(3).build().unwrap();

        assert_eq!(
            network.bridges_with(&options).unwrap(),
            network.bridges().unwrap()
        );
        assert_eq!(network.bridges().unwrap().len(), 3);
    }

    #[test]
    fn subgraph_of_community() {
        let network = Network::from_edges([("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")]);

        let community = network.subgraph(&["a", "b", "c", "z"]);

        assert_eq!(community.node_count(), 3);
        assert_eq!(community.edge_count(), 3);
        assert!(community.bridges().unwrap().is_empty());
    }

    #[test]
    fn removing_a_cut_vertex() {
        let network = Network::from_edges([("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")]);

        let rest = network.without_nodes(&["c"]);

        assert_eq!(rest.labels().collect::<Vec<_>>(), vec![&"a", &"b", &"d"]);
        assert_eq!(rest.edge_count(), 1);
        assert_eq!(rest.component_count(), 2);
        assert_eq!(rest.node_index(&"d").map(|idx| idx.index()), Some(2));
    }

    #[test]
    fn removing_influencers() {
        let network = Network::from_edges([("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")]);
        let degree = vec![("a", 0.5), ("b", 0.9), ("c", 0.1), ("d", 0.2)];
        let closeness = vec![("a", 0.7), ("b", 0.1), ("c", 0.3), ("d", 0.2)];

        let rest = network.without_influencers([degree, closeness], 1);

        assert_eq!(rest.labels().collect::<Vec<_>>(), vec![&"c", &"d"]);
        assert_eq!(rest.bridges().unwrap().len(), 1);
    }

    #[test]
    fn tied_influencers_follow_input_order() {
        let network = Network::from_edges([("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")]);

        let scores = vec![("c", 0.5), ("a", 0.5), ("b", 0.5), ("d", 0.5)];

        let rest = network.without_influencers([scores], 1);

        // "c" comes first among equals
        assert_eq!(rest.labels().collect::<Vec<_>>(), vec![&"a", &"b", &"d"]);
        assert_eq!(rest.bridges().unwrap().len(), 2);
    }
}
