//! Reconciliation debug toggle
//!
//! A process-wide flag gating diagnostic logging of reconciliation
//! decisions (text replacements, element replacements). Output goes
//! through `tracing` at debug level.

use std::sync::atomic::{AtomicBool, Ordering};

static DEBUGGER: AtomicBool = AtomicBool::new(false);

/// Enable or disable reconciliation diagnostics
pub fn enable_debugger(enabled: bool) {
    DEBUGGER.store(enabled, Ordering::Relaxed);
}

/// Whether reconciliation diagnostics are enabled
pub fn debugger_enabled() -> bool {
    DEBUGGER.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        enable_debugger(true);
        assert!(debugger_enabled());
        enable_debugger(false);
        assert!(!debugger_enabled());
    }
}
