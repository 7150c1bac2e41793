use common::asm::Opcode;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("couldn't read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("image is too short to hold an origin")]
    MissingOrigin,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExecError {
    // RTI and the reserved opcode have no meaning without privilege modes.
    #[error("unsupported instruction {op:?} at x{pc:04X}")]
    UnsupportedInstruction { op: Opcode, pc: u16 },
}
