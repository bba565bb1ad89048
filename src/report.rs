use crate::algorithm::Bridge;
use crate::network::Network;
use petgraph::graph::EdgeIndex;
use std::fmt;

/// Plain text summary of the bridges and cut vertices of a network.
pub struct Report<'a, N> {
    nodes: usize,
    edges: usize,
    components: usize,
    bridges: &'a [Bridge<N, EdgeIndex>],
    articulations: &'a [N],
}

impl<'a, N> Report<'a, N>
where
    N: Clone + Eq + std::hash::Hash + fmt::Debug,
{
    pub fn new(
        network: &Network<N>,
        bridges: &'a [Bridge<N, EdgeIndex>],
        articulations: &'a [N],
    ) -> Self {
        Self {
            nodes: network.node_count(),
            edges: network.edge_count(),
            components: network.component_count(),
            bridges,
            articulations,
        }
    }
}

impl<N: fmt::Display> fmt::Display for Report<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} nodes, {} edges, {} components",
            self.nodes, self.edges, self.components
        )?;

        writeln!(f, "bridges: {}", self.bridges.len())?;
        for bridge in self.bridges {
            writeln!(f, "  {}", bridge)?;
        }

        writeln!(f, "articulations: {}", self.articulations.len())?;
        for node in self.articulations {
            writeln!(f, "  {}", node)?;
        }

        Ok(())
    }
}
