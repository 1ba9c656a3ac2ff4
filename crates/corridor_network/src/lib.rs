pub mod error;
pub mod json;
pub mod newtype_index;
pub mod node;
pub mod road_network;
pub mod routing;
pub mod segment;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::NetworkError;
pub use node::{Node, NodeIdx};
pub use road_network::{RoadNetwork, RoadNetworkBuilder};
pub use routing::network_path::NetworkPath;
pub use segment::{Segment, SegmentBuilder, SegmentIdx};
