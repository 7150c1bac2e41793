
use common::asm::{NUM_REGS, Reg};
use common::constants::{FLAG_NEG, FLAG_POS, FLAG_ZRO, MEM_SIZE, PC_START};

use log::trace;

/// The condition code register. Holds exactly one of N, Z, P.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cond(u16);

impl Cond {
    pub const P: u16 = FLAG_POS;
    pub const Z: u16 = FLAG_ZRO;
    pub const N: u16 = FLAG_NEG;

    pub const POS: Cond = Cond(Self::P);
    pub const ZRO: Cond = Cond(Self::Z);
    pub const NEG: Cond = Cond(Self::N);

    /// Classifies a result word by its sign bit, or as zero.
    pub fn of(val: u16) -> Cond {
        if val >> 15 != 0 {
            Self::NEG
        } else if val == 0 {
            Self::ZRO
        } else {
            Self::POS
        }
    }

    pub fn to_raw(self) -> u16 {
        self.0
    }

    pub fn get_positive(self) -> bool {
        self.0 & Self::P != 0
    }

    pub fn get_zero(self) -> bool {
        self.0 & Self::Z != 0
    }

    pub fn get_negative(self) -> bool {
        self.0 & Self::N != 0
    }
}

impl Default for Cond {
    fn default() -> Self {
        Self::ZRO
    }
}

// This is separate so a mutable borrow can be passed to the MMIO handlers.
pub struct EmulatorState {
    num_ins: usize,
    mem: Vec<u16>,
    regs: [u16; NUM_REGS],
    pc: u16,
    cond: Cond,
}

impl EmulatorState {
    pub fn new() -> Self {
        EmulatorState {
            num_ins: 0usize,
            mem: vec![0; MEM_SIZE],
            regs: [0; NUM_REGS],
            pc: PC_START,
            cond: Cond::default(),
        }
    }

    pub fn inc_ins(&mut self) {
        self.num_ins += 1;
    }

    pub fn num_ins(&self) -> usize {
        self.num_ins
    }

    // Plain storage access; device registers are intercepted a level up, in Emulator.
    pub fn mem_read(&self, addr: u16) -> u16 {
        self.mem[addr as usize]
    }

    pub fn mem_write(&mut self, addr: u16, val: u16) {
        trace!("Mem: writing {val:#06x} to x{addr:04X}");
        self.mem[addr as usize] = val;
    }

    pub fn reg_read(&self, reg: Reg) -> u16 {
        self.regs[reg.index()]
    }

    pub fn reg_write(&mut self, reg: Reg, val: u16) {
        trace!("Reg: writing {val:#06x} to {reg}");
        self.regs[reg.index()] = val;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        trace!("Reg: writing {pc:#06x} to PC");
        self.pc = pc;
    }

    pub fn get_cond(&self) -> Cond {
        self.cond
    }

    pub fn set_cond(&mut self, cond: Cond) {
        self.cond = cond;
    }

    /// Sets the condition codes from the value now in `reg`.
    pub fn update_flags(&mut self, reg: Reg) {
        self.cond = Cond::of(self.reg_read(reg));
    }
}

impl Default for EmulatorState {
    fn default() -> Self {
        Self::new()
    }
}
