use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use jiff::Timestamp;
use parking_lot::Mutex;

use crate::{error::RoutingError, qubo::qubo_model::QuboModel};

use super::{
    sample::{ReadProgress, Sample, SampleSet},
    sampler_params::SamplerParams,
    solution_vector::SolutionVector,
};

pub type ReadCallback = Arc<Mutex<dyn FnMut(&ReadProgress) + Send>>;

/// Cancellation and progress reporting shared with the reads of a solve.
#[derive(Clone, Default)]
pub struct SolveControl {
    stop: Arc<AtomicBool>,
    deadline: Option<Timestamp>,
    on_read_complete: Option<ReadCallback>,
}

impl SolveControl {
    pub fn new(stop: Arc<AtomicBool>, deadline: Option<Timestamp>) -> Self {
        SolveControl {
            stop,
            deadline,
            on_read_complete: None,
        }
    }

    pub fn with_read_callback(mut self, callback: Option<ReadCallback>) -> Self {
        self.on_read_complete = callback;
        self
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
            || self
                .deadline
                .is_some_and(|deadline| Timestamp::now() >= deadline)
    }

    pub fn report_read(&self, progress: &ReadProgress) {
        if let Some(callback) = &self.on_read_complete {
            callback.lock()(progress);
        }
    }
}

/// Anything able to minimize a QUBO model.
///
/// Implementations return their samples ranked best first and must honor
/// `control` between units of work.
pub trait MinimizeQubo {
    fn name(&self) -> &str;

    fn minimize(
        &self,
        model: &QuboModel,
        params: &SamplerParams,
        control: &SolveControl,
    ) -> Result<SampleSet, RoutingError>;
}

/// Single empty sample for a model without variables.
pub(crate) fn degenerate_sample_set(model: &QuboModel) -> SampleSet {
    SampleSet::new(
        vec![Sample {
            assignment: SolutionVector::new(0),
            energy: model.offset(),
            read_index: 0,
            interrupted: false,
        }],
        0,
        0,
    )
}
