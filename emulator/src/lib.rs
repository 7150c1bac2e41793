pub mod emulator;
pub mod emulator_state;
pub mod error;
pub mod interrupt;
pub mod io;
mod trap;

pub use emulator::{Emulator, ExecRet, RunState};
pub use emulator_state::{Cond, EmulatorState};
pub use error::{ExecError, LoadError};
pub use interrupt::Interrupt;
pub use io::MMIOHandler;
