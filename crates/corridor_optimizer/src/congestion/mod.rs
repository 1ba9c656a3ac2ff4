pub mod bpr_estimator;
pub mod congestion_estimator;
pub mod congestion_metrics;
pub mod congestion_model;
pub mod piecewise_linear_estimator;
pub mod segment_loads;
