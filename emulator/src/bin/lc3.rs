use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use lc3_emu::io::{Console, StdConsole};
use lc3_emu::{Emulator, ExecError, Interrupt};

use clap::Parser;
use common::constants::PC_START;
use log::error;


/// LC-3 Emulator
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Images to load, in order. Later images overwrite earlier ones where they overlap.
    #[arg(required = true)]
    images: Vec<String>,

    /// Address at which to start executing (hex with 0x prefix, or decimal).
    #[arg(long, default_value_t = PC_START, value_parser = parse_addr)]
    start: u16,

    /// Leave the terminal in line-buffered, echoing mode.
    #[arg(long)]
    no_raw: bool,
}

fn parse_addr(s: &str) -> Result<u16, String> {
    let res = match s.strip_prefix("0x").or_else(|| s.strip_prefix("x")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    res.map_err(|e| format!("invalid address {s:?}: {e}"))
}


#[derive(Debug, PartialEq, Eq)]
enum Exit {
    // Halted or interrupted; the closing newlines have been written.
    Stopped,
    LoadFailed(String),
    NoConsole(String),
    Fault(ExecError),
}

// Loads every image, then runs on the console `open_console` builds. The
// console is only opened once loading has succeeded, and is dropped (restoring
// the terminal) before this returns.
fn emulate<C, F>(opt: &Args, open_console: F) -> Exit
where
    C: Console + 'static,
    F: FnOnce(Interrupt) -> io::Result<Arc<C>>,
{
    let mut emu = Emulator::new();
    for path in &opt.images {
        if let Err(e) = emu.load_image_file(path) {
            error!("{path}: {e}");
            return Exit::LoadFailed(path.clone());
        }
    }

    let console = match open_console(emu.interrupt().clone()) {
        Ok(console) => console,
        Err(e) => return Exit::NoConsole(e.to_string()),
    };
    emu.set_console(console.clone());

    match emu.run_at(opt.start) {
        Ok(()) => {
            console.write(b"\n\n");
            Exit::Stopped
        }
        Err(e) => Exit::Fault(e),
    }
}

fn open_std_console(interrupt: Interrupt, raw: bool) -> io::Result<Arc<StdConsole>> {
    // Raw mode swallows the signal; the console turns the Ctrl-C key into the
    // same interrupt.
    let on_signal = interrupt.clone();
    ctrlc::set_handler(move || on_signal.trigger()).map_err(io::Error::other)?;
    StdConsole::new(interrupt, raw).map(Arc::new)
}


fn main() -> ExitCode {
    env_logger::init();

    let opt = Args::parse();

    match emulate(&opt, |interrupt| open_std_console(interrupt, !opt.no_raw)) {
        Exit::Stopped => ExitCode::SUCCESS,
        Exit::LoadFailed(path) => {
            println!("failed to load image: {path}");
            ExitCode::from(1)
        }
        Exit::NoConsole(e) => {
            eprintln!("couldn't set up the terminal: {e}");
            ExitCode::FAILURE
        }
        Exit::Fault(e) => {
            eprintln!("{e}");
            std::process::abort();
        }
    }
}
