pub mod formulation_weights;
pub mod qubo_formulator;
pub mod qubo_model;
