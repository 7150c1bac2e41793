pub mod console;
pub mod keyboard;

use crate::EmulatorState;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use console::{Console, Input, PipeConsole, StdConsole};
pub use keyboard::Keyboard;

/// A device behind one or more memory addresses. Reads and writes of a
/// registered address go to the handler instead of plain storage.
pub trait MMIOHandler: Send {
    fn default_addrs(&self) -> &[u16] {
        &[]
    }

    fn read_word(&mut self, emu: &mut EmulatorState, addr: u16) -> u16;
    fn write_word(&mut self, emu: &mut EmulatorState, addr: u16, val: u16);
}

// A device that panicked mid-access leaves nothing worth protecting.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
