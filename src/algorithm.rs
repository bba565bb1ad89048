pub mod components;
pub mod low_link;

pub use components::{connected_components, par_find_bridges};
pub use low_link::{find_bridges, find_bridges_with, Bridge, LowLink};
