pub mod dijkstra;
pub mod k_shortest_paths;
pub mod network_path;
