use comfy_table::{Table, presets::UTF8_FULL};
use corridor_optimizer::{
    RoutingOutcome, congestion::congestion_metrics::CongestionMetrics,
    interpret::routing_outcome::DiagnosticLevel,
};

pub fn assignments_table(outcome: &RoutingOutcome) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Vehicle",
        "Priority",
        "Rank",
        "Base cost",
        "Travel time",
        "Segments",
    ]);

    for assignment in outcome.assignments() {
        table.add_row(vec![
            assignment.vehicle_id.clone(),
            format!("{:?}", assignment.priority),
            format!("{}/{}", assignment.candidate_rank + 1, assignment.candidates),
            format!("{:.2}", assignment.base_cost),
            format!("{:.2}", assignment.estimated_travel_time),
            assignment.segments.join(" → "),
        ]);
    }

    table
}

fn metrics_row(
    label: &str,
    columns: [&CongestionMetrics; 3],
    value: impl Fn(&CongestionMetrics) -> String,
) -> Vec<String> {
    let mut row = vec![label.to_owned()];
    row.extend(columns.into_iter().map(value));
    row
}

pub fn congestion_table(outcome: &RoutingOutcome) -> Table {
    let congestion = outcome.congestion();
    let columns = [
        &congestion.before,
        &congestion.shortest_path,
        &congestion.after,
    ];

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["", "Before", "Shortest paths", "Optimized"])
        .add_row(metrics_row("Weighted delay", columns, |metrics| {
            format!("{:.2}", metrics.weighted_delay)
        }))
        .add_row(metrics_row("Mean score", columns, |metrics| {
            format!("{:.3}", metrics.mean_score)
        }))
        .add_row(metrics_row("Max score", columns, |metrics| {
            format!("{:.3}", metrics.max_score)
        }))
        .add_row(metrics_row("Congested segments", columns, |metrics| {
            metrics.congested_segments.to_string()
        }))
        .add_row(metrics_row("Overloaded segments", columns, |metrics| {
            metrics.overloaded_segments.to_string()
        }));

    table
}

pub fn diagnostics_table(outcome: &RoutingOutcome) -> Option<Table> {
    if outcome.diagnostics().is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Level", "Message"]);

    for diagnostic in outcome.diagnostics() {
        let level = match diagnostic.level {
            DiagnosticLevel::Info => "info",
            DiagnosticLevel::Warning => "warning",
        };
        table.add_row(vec![level.to_owned(), diagnostic.message.clone()]);
    }

    Some(table)
}
