//! Process-wide tracing setup shared by the binaries and test servers.

/// Initialize process-wide logging.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber construction (filter, JSON formatting).
pub mod tracing;
