//! Kakehashi finds the bridges of undirected networks: the edges whose removal splits a connected
//! component in two.
//!
//! The search is a single iterative DFS tracking discovery and low-link times, so it runs in
//! `O(V + E)` and its depth is not limited by the call stack. It accepts any `petgraph` graph
//! through [`algorithm::find_bridges`], or a labelled [`network::Network`].
//!
//! ```
//! use kakehashi::network::Network;
//!
//! // a triangle with a tail
//! let network = Network::from_edges([("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")]);
//!
//! let bridges = network.bridges().unwrap();
//! assert_eq!(bridges.len(), 1);
//! assert_eq!(bridges[0].to_string(), "c -- d");
//!
//! assert_eq!(network.articulations().unwrap(), vec!["c"]);
//! ```

pub mod algorithm;
pub mod error;
pub mod logging;
pub mod network;
pub mod options;
pub mod parser;
pub mod ranking;
pub mod report;
