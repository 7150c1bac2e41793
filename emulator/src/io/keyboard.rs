
use std::sync::Arc;

use crate::EmulatorState;
use crate::io::{Console, MMIOHandler};

use common::constants::{KBDR, KBSR, KBSR_READY};

use log::trace;

// Keyboard status (KBSR) and data (KBDR) registers. Reading KBSR polls the
// console without blocking; a waiting character is consumed into KBDR and the
// ready bit is set. Both registers are otherwise ordinary memory.
pub struct Keyboard {
    device: Arc<dyn Console>,
}

impl Keyboard {
    pub const ADDRS: &[u16] = &[KBSR, KBDR];

    pub fn new(device: Arc<dyn Console>) -> Self {
        Keyboard { device }
    }

    fn kbsr_read(&mut self, state: &mut EmulatorState) -> u16 {
        match self.device.poll_input() {
            Some(input) => {
                trace!("Keyboard: {input:?} ready");
                state.mem_write(KBSR, KBSR_READY);
                state.mem_write(KBDR, input.to_word());
            }
            None => state.mem_write(KBSR, 0),
        }
        state.mem_read(KBSR)
    }
}

impl MMIOHandler for Keyboard {
    fn read_word(&mut self, state: &mut EmulatorState, addr: u16) -> u16 {
        match addr {
            KBSR => self.kbsr_read(state),
            _ => state.mem_read(addr),
        }
    }

    fn write_word(&mut self, state: &mut EmulatorState, addr: u16, val: u16) {
        state.mem_write(addr, val);
    }

    fn default_addrs(&self) -> &[u16] {
        Self::ADDRS
    }
}
