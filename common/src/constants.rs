
pub const MEM_SIZE: usize = (u16::MAX as usize) + 1; // Words

// Conventional origin of user programs.
pub const PC_START: u16 = 0x3000;

// Keyboard status and data registers.
pub const KBSR: u16 = 0xFE00;
pub const KBDR: u16 = 0xFE02;
pub const KBSR_READY: u16 = 0x1 << 15;

// Condition codes, in the bit order of the BR mask.
pub const FLAG_POS: u16 = 0x1 << 0;
pub const FLAG_ZRO: u16 = 0x1 << 1;
pub const FLAG_NEG: u16 = 0x1 << 2;
