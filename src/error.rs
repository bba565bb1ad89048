use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("edge `{edge}` refers to node `{node}` which is not in the node set")]
    InvalidGraphReference { node: String, edge: String },
    #[error("traversal ran out of resources: {0}")]
    ResourceExhaustion(#[from] Exhaustion),
}

#[derive(Error, Debug)]
pub enum Exhaustion {
    #[error("DFS depth exceeded the limit of {limit} while descending into `{node}`")]
    DepthLimit { limit: usize, node: String },
    #[error("cannot reserve traversal state for {entries} entries")]
    Allocation {
        entries: usize,
        #[source]
        source: TryReserveError,
    },
}
