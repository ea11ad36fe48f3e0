use std::sync::atomic::{AtomicBool, Ordering};

/// One-slot gate for callers that must not start a second query while one
/// is outstanding. The pipeline itself is stateless; the gate lives with
/// the caller.
#[derive(Debug, Default)]
pub struct SingleFlight {
    busy: AtomicBool,
}

/// Holds the gate's slot until dropped.
#[derive(Debug)]
pub struct FlightGuard<'a> {
    gate: &'a SingleFlight,
}

impl SingleFlight {
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Claim the slot, or `None` if a query is already in flight.
    pub fn try_begin(&self) -> Option<FlightGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
