use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Request to stop the emulator from outside the fetch loop (e.g. Ctrl-C).
/// The loop checks it after each instruction, so the instruction in flight
/// always completes.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
