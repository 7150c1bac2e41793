
use crate::{Emulator, ExecRet};
use crate::io::Input;

use common::asm::{Reg, TrapVector};
use common::constants::MEM_SIZE;

use log::{trace, warn};
use num_traits::FromPrimitive;

const IN_PROMPT: &[u8] = b"Enter a character: ";
const HALT_NOTICE: &[u8] = b"HALT\n";

// Service routines for the TRAP instruction. None of these touch the condition
// codes, and R7 is left alone.
impl Emulator {
    pub(crate) fn exec_trap(&mut self, vector: u8) -> ExecRet {
        let Some(trap) = TrapVector::from_u8(vector) else {
            warn!("Ignoring TRAP x{vector:02X}: unknown vector");
            return ExecRet::Ok;
        };
        trace!("Trap: {trap:?}");

        match trap {
            TrapVector::Getc => {
                let input = self.console.read_input();
                self.state.reg_write(Reg::R0, input.to_word());
            }
            TrapVector::Out => {
                let ch = self.state.reg_read(Reg::R0) as u8;
                self.console.write(&[ch]);
            }
            TrapVector::Puts => {
                let s = self.read_string(self.state.reg_read(Reg::R0), false);
                self.console.write(&s);
            }
            TrapVector::In => {
                self.console.write(IN_PROMPT);
                let input = self.console.read_input();
                if let Input::Char(ch) = input {
                    self.console.write(&[ch]);
                }
                self.state.reg_write(Reg::R0, input.to_word());
            }
            TrapVector::Putsp => {
                let s = self.read_string(self.state.reg_read(Reg::R0), true);
                self.console.write(&s);
            }
            TrapVector::Halt => {
                self.console.write(HALT_NOTICE);
                return ExecRet::Halt;
            }
            TrapVector::Rti | TrapVector::XGetc | TrapVector::XOut | TrapVector::XPuts => {
                warn!("Ignoring {trap:?}: no service routine");
            }
        }

        ExecRet::Ok
    }

    // Collects a zero-terminated string starting at `addr`, one character per
    // word, or two (low byte first) when `packed`. Reads plain storage, so
    // device registers aren't disturbed.
    fn read_string(&self, addr: u16, packed: bool) -> Vec<u8> {
        let mut out = vec![];
        let mut addr = addr;
        // Bounded in case no terminator exists anywhere in memory.
        for _ in 0..MEM_SIZE {
            let word = self.state.mem_read(addr);
            if word == 0 {
                break;
            }
            out.push(word as u8);
            if packed {
                let high = (word >> u8::BITS) as u8;
                if high != 0 {
                    out.push(high);
                }
            }
            addr = addr.wrapping_add(1);
        }
        out
    }
}
