//! Post-install advisory messages.
//!
//! A caveat is informational only: it never blocks and never affects the
//! install state. The pipeline emits it exactly once per invocation,
//! immediately after the install stage succeeds, and never on a failed
//! install.

/// Destination for caveat text. A trait so tests can record emissions.
pub trait CaveatSink {
    fn emit(&mut self, text: &str);
}

/// Prints caveats to stdout (and mirrors them to the log).
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl CaveatSink for ConsoleReporter {
    fn emit(&mut self, text: &str) {
        println!("==> Caveats\n{text}");
        tracing::info!(caveat = text, "caveat shown");
    }
}
