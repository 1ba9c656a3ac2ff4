use super::solution_vector::SolutionVector;

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub assignment: SolutionVector,
    pub energy: f64,
    pub read_index: usize,
    /// The read was cut short by a stop request or the time limit.
    pub interrupted: bool,
}

/// Samples of a minimization, lowest energy first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    samples: Vec<Sample>,
    failed_reads: usize,
    skipped_reads: usize,
}

impl SampleSet {
    /// Ranks by energy, ties go to the lowest read index.
    pub fn new(mut samples: Vec<Sample>, failed_reads: usize, skipped_reads: usize) -> Self {
        samples.sort_by(|a, b| {
            a.energy
                .total_cmp(&b.energy)
                .then_with(|| a.read_index.cmp(&b.read_index))
        });

        SampleSet {
            samples,
            failed_reads,
            skipped_reads,
        }
    }

    pub fn best(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn failed_reads(&self) -> usize {
        self.failed_reads
    }

    /// Reads never started because the solve was cancelled first.
    pub fn skipped_reads(&self) -> usize {
        self.skipped_reads
    }

    pub fn interrupted(&self) -> bool {
        self.skipped_reads > 0 || self.samples.iter().any(|sample| sample.interrupted)
    }
}

/// Reported after every finished read.
#[derive(Debug, Clone, Copy)]
pub struct ReadProgress {
    pub read_index: usize,
    pub completed_reads: usize,
    pub total_reads: usize,
    pub energy: f64,
    pub best_energy: f64,
}
