pub mod candidate_path;
pub mod candidate_pool;
