//! Basic example of library-side triggers and application-side modes.
//!
//! A pretend library reports a deprecated function; the application switches
//! between modes and shows what each one emits.

use tracing::Level;
use tracing_deprecations::{deprecation, Deprecations};

mod acme {
    use tracing_deprecations::deprecation;

    #[track_caller]
    pub fn old_sum(values: &[i32]) -> i32 {
        deprecation!("acme", "ACME-1", "old_sum is deprecated, use {} instead", "sum");
        values.iter().sum()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_target(true)
        .init();

    let deprecations = Deprecations::global();

    println!("=== Deprecations Example ===\n");

    println!("Disabled (default): counted, nothing emitted");
    for _ in 0..3 {
        acme::old_sum(&[1, 2, 3]);
    }
    println!("  counts: {:?}\n", deprecations.triggered_deprecations());

    println!("Warnings: emitted once to stderr, then deduplicated");
    deprecations.disable();
    deprecations.enable_with_warnings();
    for _ in 0..3 {
        acme::old_sum(&[1, 2, 3]);
    }
    println!();

    println!("Suppressed warnings: recorded as TRACE events");
    deprecations.disable();
    deprecations.enable_with_suppressed_warnings();
    acme::old_sum(&[4, 5]);
    println!();

    println!("Structured log: INFO events under the `deprecations` target");
    deprecations.disable();
    deprecations.enable_with_sink(std::sync::Arc::new(
        tracing_deprecations::TracingSink::new(),
    ));
    acme::old_sum(&[6]);
    deprecation!("acme", "ACME-2", "the `legacy` feature is going away");
    println!();

    println!("Temporary suppression: the next two triggers are absorbed");
    deprecations.ignore_deprecation_temporarily("ACME-3", 2);
    for i in 1..=3 {
        deprecation!("acme", "ACME-3", "trigger #{}", i);
    }

    println!("\n=== Example Complete ===");
    println!("Total counted: {}", deprecations.unique_triggered_deprecations_count());
}
