pub mod routing_outcome;
pub mod solution_interpreter;
