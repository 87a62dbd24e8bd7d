//! Human-readable batch summary.

use storyreel::{BatchOutcome, ResultRecord};

fn record_line(record: &ResultRecord) -> String {
    match record.continuity_link {
        Some(previous) => format!(
            "{} (→ {}): {}",
            record.sequence_key.label(),
            previous.label(),
            record.artifact_ref
        ),
        None => format!("{}: {}", record.sequence_key.label(), record.artifact_ref),
    }
}

/// One line per record, failure and skipped item, then a tally.
pub fn summary_lines(outcome: &BatchOutcome) -> Vec<String> {
    let mut lines: Vec<String> = outcome.manifest.records.iter().map(record_line).collect();

    lines.extend(outcome.failures.iter().map(|failure| {
        format!(
            "{} failed ({}): {}",
            failure.sequence_key.label(),
            failure.error.kind().label(),
            failure.error.kind()
        )
    }));
    lines.extend(
        outcome
            .skipped
            .iter()
            .map(|key| format!("{} skipped", key.label())),
    );

    let metadata = &outcome.manifest.metadata;
    lines.push(format!(
        "{} of {} succeeded, {} failed, {} skipped",
        metadata.succeeded, metadata.total_items, metadata.failed, metadata.skipped
    ));
    lines
}

/// Print the summary to stdout.
pub fn print_summary(outcome: &BatchOutcome) {
    for line in summary_lines(outcome) {
        println!("{}", line);
    }
}
