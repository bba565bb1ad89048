//! Independent connected components, and bridge search run on them concurrently.

use super::low_link::{Bridge, LowLink};
use crate::error::GraphError;
use crate::options::BridgeOptions;
use petgraph::unionfind::UnionFind;
use petgraph::visit::{
    EdgeRef, IntoEdgeReferences, IntoEdges, IntoNodeIdentifiers, NodeIndexable, Visitable,
};
use std::collections::HashMap;
use std::fmt::Debug;
use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tracing::debug;

const MIN_NUM_THREADS: usize = 1;
const MAX_NUM_THREADS: usize = 128;

/// Partitions the nodes into connected components.
///
/// Components are ordered by their first node in `node_identifiers()` order, and nodes keep that
/// order inside each component, so the first node of a component is the root a sequential search
/// would pick for it.
pub fn connected_components<G>(graph: G) -> Result<Vec<Vec<G::NodeId>>, GraphError>
where
    G: IntoEdgeReferences + IntoNodeIdentifiers + NodeIndexable,
    G::NodeId: Debug,
    G::EdgeId: Debug,
{
    let bound = graph.node_bound();
    let mut vertex_sets = UnionFind::<usize>::new(bound);

    for edge in graph.edge_references() {
        let (a, b) = (graph.to_index(edge.source()), graph.to_index(edge.target()));

        for (node, idx) in [(edge.source(), a), (edge.target(), b)] {
            if idx >= bound {
                return Err(GraphError::InvalidGraphReference {
                    node: format!("{:?}", node),
                    edge: format!("{:?}", edge.id()),
                });
            }
        }

        vertex_sets.union(a, b);
    }

    let mut slots: HashMap<usize, usize> = HashMap::new();
    let mut components: Vec<Vec<G::NodeId>> = vec![];

    for node in graph.node_identifiers() {
        let representative = vertex_sets.find(graph.to_index(node));
        let slot = *slots.entry(representative).or_insert_with(|| {
            components.push(vec![]);
            components.len() - 1
        });

        components[slot].push(node);
    }

    Ok(components)
}

/// Finds bridges with one DFS per component, spread over `options.threads` workers.
///
/// Each worker owns its traversal state. Results are merged in component order, so the output is
/// identical to [`find_bridges_with`](super::find_bridges_with).
pub fn par_find_bridges<G>(
    graph: G,
    options: &BridgeOptions,
) -> Result<Vec<Bridge<G::NodeId, G::EdgeId>>, GraphError>
where
    G: IntoEdges + IntoNodeIdentifiers + NodeIndexable + Visitable + Send,
    G::NodeId: Debug + Send + Sync,
    G::EdgeId: Debug + Send,
{
    let components = connected_components(graph)?;
    let num_threads = options
        .threads
        .clamp(MIN_NUM_THREADS, MAX_NUM_THREADS)
        .min(components.len().max(1));

    debug!(
        components = components.len(),
        num_threads, "searching components for bridges"
    );

    let counter = AtomicUsize::new(0);
    let components = &components;
    let counter = &counter;

    thread::scope(|scope| -> Result<Vec<_>, GraphError> {
        let handles: Vec<_> = (0..num_threads)
            .map(|_| scope.spawn(move || component_task(graph, components, counter, options)))
            .collect();

        let mut merged = Vec::with_capacity(components.len());
        for handle in handles {
            match handle.join() {
                Ok(found) => merged.extend(found?),
                Err(payload) => panic::resume_unwind(payload),
            }
        }

        merged.sort_by_key(|&(slot, _)| slot);

        Ok(merged
            .into_iter()
            .flat_map(|(_, bridges)| bridges)
            .collect())
    })
}

// Grabs the next unsearched component until none are left. Returns the bridges of every
// component it searched, tagged with the component's position.
fn component_task<G>(
    graph: G,
    components: &[Vec<G::NodeId>],
    counter: &AtomicUsize,
    options: &BridgeOptions,
) -> Result<Vec<(usize, Vec<Bridge<G::NodeId, G::EdgeId>>)>, GraphError>
where
    G: IntoEdges + NodeIndexable + Visitable,
    G::NodeId: Debug,
    G::EdgeId: Debug,
{
    let mut low_link = LowLink::with_options(graph, options)?;
    let mut found = vec![];

    loop {
        let slot = counter.fetch_add(1, Ordering::Relaxed);
        let Some(component) = components.get(slot) else {
            break;
        };
        let Some(&root) = component.first() else {
            continue;
        };

        low_link.traverse_from(graph, root)?;
        found.push((slot, std::mem::take(&mut low_link.bridges)));
    }

    debug!(components = found.len(), "bridge worker finished");

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::find_bridges;
    use crate::options::BridgeOptionsBuilder;
    use petgraph::prelude::UnGraph;

    // n disjoint blocks: a triangle with a pendant path of two edges hanging off it
    fn blocks(n: u32) -> UnGraph<(), ()> {
        let mut edges = vec![];
        for i in 0..n {
            let b = i * 5;
            edges.extend([(b, b + 1), (b + 1, b + 2), (b + 2, b), (b + 2, b + 3), (b + 3, b + 4)]);
        }
        UnGraph::from_edges(&edges)
    }

    #[test]
    fn components_in_root_order() {
        // 0 -- 3, 1 -- 2, 4 alone
        let mut g: UnGraph<(), ()> = UnGraph::default();
        let v: Vec<_> = (0..5).map(|_| g.add_node(())).collect();
        g.add_edge(v[0], v[3], ());
        g.add_edge(v[2], v[1], ());

        let components = connected_components(&g).unwrap();

        assert_eq!(
            components,
            vec![vec![v[0], v[3]], vec![v[1], v[2]], vec![v[4]]]
        );
    }

    #[test]
    fn components_of_empty_graph() {
        let g: UnGraph<(), ()> = UnGraph::default();

        assert!(connected_components(&g).unwrap().is_empty());
    }

    #[test]
    fn parallel_matches_sequential() {
        let g = blocks(40);
        let sequential = find_bridges(&g).unwrap();

        for threads in [1, 2, 3, 8] {
            let options = BridgeOptionsBuilder::default()
                .threads(threads)
                .build()
                .unwrap();
            let parallel = par_find_bridges(&g, &options).unwrap();

            assert_eq!(parallel, sequential);
        }

        assert_eq!(sequential.len(), 80);
    }

    #[test]
    fn parallel_on_empty_graph() {
        let g: UnGraph<(), ()> = UnGraph::default();
        let options = BridgeOptionsBuilder::default().threads(4).build().unwrap();

        assert!(par_find_bridges(&g, &options).unwrap().is_empty());
    }

    #[test]
    fn parallel_reports_depth_limit() {
        let g = blocks(3);
        let options = BridgeOptionsBuilder::default()
            .threads(2)
            .max_depth(2)
            .build()
            .unwrap();

        assert!(matches!(
            par_find_bridges(&g, &options),
            Err(GraphError::ResourceExhaustion(_))
        ));
    }
}
