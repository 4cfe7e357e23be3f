//! One-way diagnostics sink for non-fatal internal errors.

/// Receives messages about failures the search feature absorbs instead
/// of propagating. No severity levels; everything here is non-fatal.
pub trait DiagnosticsSink: Send + Sync {
	fn report(&self, message: &str);
}

/// Production sink forwarding to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
	fn report(&self, message: &str) {
		tracing::warn!(message = %message, "search diagnostics");
	}
}
