use jiff::{SignedDuration, Timestamp};
use schemars::JsonSchema;
use serde::Serialize;

use crate::{congestion::congestion_metrics::CongestionMetrics, problem::priority_class::PriorityClass};

#[derive(Serialize, JsonSchema, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Valid,
    Violated,
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationKind {
    NoneSelected,
    MultipleSelected { count: usize },
}

/// A vehicle whose one-hot constraint did not hold in the solver output.
#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub vehicle_id: String,
    pub kind: ViolationKind,
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct VehicleAssignment {
    pub vehicle_id: String,
    pub priority: PriorityClass,
    /// Rank of the selected path among the vehicle's candidates, 0 is the cheapest.
    pub candidate_rank: usize,
    pub candidates: usize,
    pub nodes: Vec<String>,
    pub segments: Vec<String>,
    pub base_cost: f64,
    /// Base cost inflated by the congestion of the final assignment.
    pub estimated_travel_time: f64,
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct ExcludedVehicle {
    pub vehicle_id: String,
    pub reason: String,
}

#[derive(Serialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct CongestionReport {
    /// Loads present before the round.
    pub before: CongestionMetrics,
    /// Every vehicle on its cheapest candidate.
    pub shortest_path: CongestionMetrics,
    /// The optimized assignment.
    pub after: CongestionMetrics,
}

/// Selected path of a prioritized vehicle.
#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct EmergencyCorridor {
    pub vehicle_id: String,
    pub segments: Vec<String>,
    /// No segment of the corridor is congested after assignment.
    pub clear: bool,
}

#[derive(Serialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct OutcomeSummary {
    pub total_vehicles: usize,
    pub emergency_vehicles: usize,
    pub normal_vehicles: usize,
    pub routed_vehicles: usize,
    pub excluded_vehicles: usize,
    pub violations: usize,
}

#[derive(Serialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct SolveStatistics {
    pub backend: String,
    pub variables: usize,
    pub interactions: usize,
    pub onehot_penalty: f64,
    pub initial_temp: Option<f64>,
    pub final_temp: Option<f64>,
    pub energy: Option<f64>,
    pub reads: usize,
    pub completed_reads: usize,
    pub failed_reads: usize,
    pub skipped_reads: usize,
    pub best_read: Option<usize>,
}

#[derive(Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Diagnostic {
            level: DiagnosticLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            level: DiagnosticLevel::Warning,
            message: message.into(),
        }
    }
}

/// Wall clock information, the only part of an outcome that differs between
/// two identical runs.
#[derive(Serialize, JsonSchema, Debug, Clone, Copy, PartialEq)]
pub struct OutcomeTiming {
    pub started_at: Timestamp,
    pub duration: SignedDuration,
}

impl Default for OutcomeTiming {
    fn default() -> Self {
        OutcomeTiming {
            started_at: Timestamp::UNIX_EPOCH,
            duration: SignedDuration::ZERO,
        }
    }
}

/// Result of a routing round.
#[derive(Serialize, JsonSchema, Debug, Clone, Default, PartialEq)]
pub struct RoutingOutcome {
    pub(crate) status: AssignmentStatus,
    pub(crate) interrupted: bool,
    pub(crate) assignments: Vec<VehicleAssignment>,
    pub(crate) excluded: Vec<ExcludedVehicle>,
    pub(crate) violations: Vec<ConstraintViolation>,
    pub(crate) congestion: CongestionReport,
    pub(crate) congested_segments: Vec<String>,
    pub(crate) emergency_corridors: Vec<EmergencyCorridor>,
    pub(crate) summary: OutcomeSummary,
    pub(crate) statistics: SolveStatistics,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) timing: OutcomeTiming,
}

impl RoutingOutcome {
    pub fn status(&self) -> AssignmentStatus {
        self.status
    }

    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn assignments(&self) -> &[VehicleAssignment] {
        &self.assignments
    }

    pub fn assignment(&self, vehicle_id: &str) -> Option<&VehicleAssignment> {
        self.assignments
            .iter()
            .find(|assignment| assignment.vehicle_id == vehicle_id)
    }

    pub fn excluded(&self) -> &[ExcludedVehicle] {
        &self.excluded
    }

    pub fn violations(&self) -> &[ConstraintViolation] {
        &self.violations
    }

    pub fn congestion(&self) -> &CongestionReport {
        &self.congestion
    }

    /// Segments congested before the round.
    pub fn congested_segments(&self) -> &[String] {
        &self.congested_segments
    }

    pub fn emergency_corridors(&self) -> &[EmergencyCorridor] {
        &self.emergency_corridors
    }

    pub fn summary(&self) -> &OutcomeSummary {
        &self.summary
    }

    pub fn statistics(&self) -> &SolveStatistics {
        &self.statistics
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn timing(&self) -> &OutcomeTiming {
        &self.timing
    }

    pub fn total_travel_time(&self) -> f64 {
        self.assignments
            .iter()
            .map(|assignment| assignment.estimated_travel_time)
            .sum()
    }
}
