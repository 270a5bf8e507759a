//! Example of periodic deprecation summaries.
//!
//! Triggers are counted while the registry is disabled, and a background
//! reporter logs what was triggered how often.

use std::time::Duration;
use tracing_deprecations::{Deprecations, ReporterConfig};

#[cfg(feature = "async")]
#[tokio::main]
async fn main() {
    run_example().await;
}

#[cfg(not(feature = "async"))]
fn main() {
    println!("This example requires the 'async' feature to be enabled.");
    println!("Run with: cargo run --example summaries --features async");
}

#[cfg(feature = "async")]
async fn run_example() {
    use tracing_deprecations::SummaryReporter;

    tracing_subscriber::fmt().init();

    println!("=== Deprecation Summary Example ===\n");

    let deprecations = Deprecations::new();
    let config = ReporterConfig::new(Duration::from_millis(500))
        .expect("interval is non-zero")
        .with_min_count(2);
    let reporter = SummaryReporter::new(deprecations.occurrences().clone(), config);

    let handle = reporter.start(
        |summaries| {
            for summary in summaries {
                tracing::warn!(
                    identifier = %summary.identifier,
                    count = summary.count,
                    "{}",
                    summary.format_message()
                );
            }
        },
        true,
    );

    println!("Triggering ACME-1 20 times, ACME-2 5 times, ACME-3 once:");
    for i in 0..20 {
        deprecations.trigger("acme", "ACME-1", format_args!("old_connect #{}", i));
        if i % 4 == 0 {
            deprecations.trigger("acme", "ACME-2", format_args!("old_query"));
        }
    }
    deprecations.trigger("legacy", "ACME-3", format_args!("rarely used"));
    println!("   → ACME-3 stays below the minimum count and is not reported\n");

    tokio::time::sleep(Duration::from_millis(1200)).await;

    handle.shutdown().await.expect("shutdown failed");
    println!("\n=== Example Complete ===");
}
