pub mod cooling_schedule;
pub mod exact;
pub mod minimize_qubo;
pub mod sample;
pub mod sampler_params;
pub mod simulated_annealing;
pub mod solution_vector;
pub mod solver_backend;
