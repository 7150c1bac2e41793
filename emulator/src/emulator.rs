
use common::asm::*;
use common::decoder::decode;
use common::mem::ReadU16Be;
use crate::{Cond, EmulatorState, ExecError, Interrupt, LoadError, MMIOHandler};
use crate::io::{Console, Keyboard, PipeConsole, lock};

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::BitAnd;
use std::path::Path;
use std::sync::{Arc, Mutex};

use delegate::delegate;
use log::{debug, info, trace};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecRet {
    Ok,
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Loaded,
    Running,
    Halted,
}


pub struct Emulator {
    pub(crate) state: EmulatorState,
    mmio_handlers: HashMap<u16, Arc<Mutex<dyn MMIOHandler>>>,
    pub(crate) console: Arc<dyn Console>,
    interrupt: Interrupt,
    run_state: RunState,
}

impl Emulator {
    // Output goes nowhere and input is empty until a console is set.
    pub fn new() -> Emulator {
        Self::with_console(Arc::new(PipeConsole::default()))
    }

    pub fn with_console(console: Arc<dyn Console>) -> Emulator {
        let mut emu = Emulator {
            state: EmulatorState::new(),
            mmio_handlers: HashMap::new(),
            console: console.clone(),
            interrupt: Interrupt::new(),
            run_state: RunState::Loaded,
        };
        emu.set_mmio_handler(Keyboard::new(console));
        emu
    }

    /// Replaces the console, along with the keyboard registers that read from it.
    pub fn set_console(&mut self, console: Arc<dyn Console>) {
        self.set_mmio_handler(Keyboard::new(console.clone()));
        self.console = console;
    }

    delegate! {
        to self.state {
            pub fn reg_read(&self, reg: Reg) -> u16;
            pub fn reg_write(&mut self, reg: Reg, val: u16);
            pub fn pc(&self) -> u16;
            pub fn get_cond(&self) -> Cond;
            pub fn set_cond(&mut self, cond: Cond);
            pub fn num_ins(&self) -> usize;
        }
    }

    // Run until a halt, an interrupt, or an unsupported instruction. Halted is
    // final; `run_ins` can still single-step a halted machine.
    pub fn run(&mut self) -> Result<(), ExecError> {
        if self.run_state == RunState::Halted {
            debug!("Already halted at x{:04X}", self.state.pc());
            return Ok(());
        }
        self.run_state = RunState::Running;
        let res = loop {
            match self.run_ins() {
                Ok(ExecRet::Halt) => break Ok(()),
                Ok(ExecRet::Ok) => {
                    if self.interrupt.is_triggered() {
                        debug!("Interrupted; next PC x{:04X}", self.state.pc());
                        break Ok(());
                    }
                }
                Err(e) => break Err(e),
            }
        };
        self.run_state = RunState::Halted;
        info!("Halted after {} instructions", self.state.num_ins());
        res
    }

    pub fn run_at(&mut self, pc: u16) -> Result<(), ExecError> {
        self.state.set_pc(pc);
        self.run()
    }

    // Fetch, increment PC, then execute, so PC-relative operands are relative to
    // the following instruction.
    pub fn run_ins(&mut self) -> Result<ExecRet, ExecError> {
        self.state.inc_ins();

        let addr = self.state.pc();
        let ins = decode(self.mem_read(addr));
        let pc = addr.wrapping_add(1);
        debug!("PC: x{addr:04X}: {}", ins.display_with_pc(pc));
        self.state.set_pc(pc);

        self.exec(&ins)
    }

    /// Loads an image: a big-endian origin word followed by big-endian words
    /// stored from the origin up. Loading stops at the end of the stream or
    /// just below the top of memory, never wrapping. Returns the origin.
    pub fn load_image(&mut self, mut reader: impl Read) -> Result<u16, LoadError> {
        let origin = reader.read_u16_be()?.ok_or(LoadError::MissingOrigin)?;
        let max = u16::MAX - origin;

        let mut count = 0u16;
        while count < max {
            let Some(word) = reader.read_u16_be()? else {
                break;
            };
            self.state.mem_write(origin + count, word);
            count += 1;
        }

        info!("Loaded {count} words at x{origin:04X}");
        Ok(origin)
    }

    pub fn load_image_file(&mut self, path: impl AsRef<Path>) -> Result<u16, LoadError> {
        let file = File::open(path)?;
        self.load_image(BufReader::new(file))
    }

    pub fn set_mmio_handler(&mut self, handler: impl MMIOHandler + 'static) {
        let handler = Arc::new(Mutex::new(handler));
        let addrs = lock(&handler).default_addrs().to_vec();
        for addr in addrs {
            self.register_handler(handler.clone(), addr);
        }
    }

    fn register_handler(&mut self, handler: Arc<Mutex<dyn MMIOHandler>>, addr: u16) {
        if self.mmio_handlers.insert(addr, handler).is_some() {
            debug!("Replaced MMIO handler for x{addr:04X}");
        }
    }

    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }


    ///////////////////////////////////////////////////////////////////////////


    pub fn mem_read(&mut self, addr: u16) -> u16 {
        if let Some(handler) = self.mmio_handlers.get(&addr) {
            return lock(handler).read_word(&mut self.state, addr);
        }
        self.state.mem_read(addr)
    }

    pub fn mem_write(&mut self, addr: u16, val: u16) {
        if let Some(handler) = self.mmio_handlers.get(&addr) {
            lock(handler).write_word(&mut self.state, addr, val);
            return;
        }
        self.state.mem_write(addr, val)
    }

    pub fn get_state(&self) -> &EmulatorState {
        &self.state
    }

    pub fn get_state_mut(&mut self) -> &mut EmulatorState {
        &mut self.state
    }

    ///////////////////////////////////////////////////////////////////////////
    // Execute
    ///////////////////////////////////////////////////////////////////////////

    fn set_result(&mut self, dst: Reg, val: u16) {
        self.state.reg_write(dst, val);
        self.state.update_flags(dst);
    }

    fn exec_alu(&mut self, dst: Reg, src1: Reg, src2: AluSrc, op: fn(u16, u16) -> u16) {
        let lhs = self.state.reg_read(src1);
        let rhs = match src2 {
            AluSrc::Reg(r) => self.state.reg_read(r),
            AluSrc::Imm(imm) => imm,
        };
        self.set_result(dst, op(lhs, rhs));
    }

    fn exec_jsr(&mut self, target: JsrTarget) {
        let pc = self.state.pc();
        // The link is written before the base is read, so JSRR R7 continues at
        // the next instruction.
        self.state.reg_write(Reg::R7, pc);
        let new_pc = match target {
            JsrTarget::Offset(offset) => pc.wrapping_add(offset),
            JsrTarget::Reg(base) => self.state.reg_read(base),
        };
        trace!("JSR to x{new_pc:04X}, return to x{pc:04X}");
        self.state.set_pc(new_pc);
    }

    fn exec(&mut self, ins: &Ins) -> Result<ExecRet, ExecError> {
        let pc = self.state.pc();
        match *ins {
            Ins::Add{dst, src1, src2} => self.exec_alu(dst, src1, src2, u16::wrapping_add),
            Ins::And{dst, src1, src2} => self.exec_alu(dst, src1, src2, u16::bitand),
            Ins::Not{dst, src} => {
                let val = !self.state.reg_read(src);
                self.set_result(dst, val);
            }
            Ins::Br{mask, offset} => {
                if mask & self.state.get_cond().to_raw() != 0 {
                    self.state.set_pc(pc.wrapping_add(offset));
                }
            }
            Ins::Jmp{base} => {
                let new_pc = self.state.reg_read(base);
                trace!("JMP to x{new_pc:04X}");
                self.state.set_pc(new_pc);
            }
            Ins::Jsr{target} => self.exec_jsr(target),
            Ins::Ld{dst, offset} => {
                let val = self.mem_read(pc.wrapping_add(offset));
                self.set_result(dst, val);
            }
            Ins::Ldi{dst, offset} => {
                let addr = self.mem_read(pc.wrapping_add(offset));
                let val = self.mem_read(addr);
                self.set_result(dst, val);
            }
            Ins::Ldr{dst, base, offset} => {
                let addr = self.state.reg_read(base).wrapping_add(offset);
                let val = self.mem_read(addr);
                self.set_result(dst, val);
            }
            Ins::Lea{dst, offset} => self.set_result(dst, pc.wrapping_add(offset)),
            Ins::St{src, offset} => {
                let val = self.state.reg_read(src);
                self.mem_write(pc.wrapping_add(offset), val);
            }
            Ins::Sti{src, offset} => {
                let addr = self.mem_read(pc.wrapping_add(offset));
                let val = self.state.reg_read(src);
                self.mem_write(addr, val);
            }
            Ins::Str{src, base, offset} => {
                let addr = self.state.reg_read(base).wrapping_add(offset);
                let val = self.state.reg_read(src);
                self.mem_write(addr, val);
            }
            Ins::Trap{vector} => return Ok(self.exec_trap(vector)),
            Ins::Rti | Ins::Res => {
                return Err(ExecError::UnsupportedInstruction{op: ins.opcode(), pc: pc.wrapping_sub(1)});
            }
        }

        Ok(ExecRet::Ok)
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
