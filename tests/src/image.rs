use crate::util::HALT;

use common::asm::Reg;
use common::constants::PC_START;
use common::mem::to_image;
use lc3_emu::io::PipeConsole;
use lc3_emu::{Emulator, LoadError, RunState};

use std::fs;
use std::sync::Arc;

#[test]
fn halt_only() {
    let image: &[u8] = &[0x30, 0x00, 0xF0, 0x25];

    let tty = Arc::new(PipeConsole::default());
    let mut emu = Emulator::with_console(tty.clone());
    assert_eq!(emu.load_image(image).unwrap(), 0x3000);
    assert_eq!(emu.get_state().mem_read(0x3000), HALT);
    emu.run().unwrap();
    assert_eq!(emu.num_ins(), 1);
    assert_eq!(emu.run_state(), RunState::Halted);
    assert_eq!(tty.take_output_string(), "HALT\n");
}

#[test]
fn big_endian() {
    let image: &[u8] = &[0x40, 0x01, 0x12, 0x34, 0xAB, 0xCD];

    let mut emu = Emulator::new();
    assert_eq!(emu.load_image(image).unwrap(), 0x4001);
    assert_eq!(emu.get_state().mem_read(0x4001), 0x1234);
    assert_eq!(emu.get_state().mem_read(0x4002), 0xABCD);
    assert_eq!(emu.get_state().mem_read(0x4003), 0);
}

#[test]
fn trailing_byte_dropped() {
    let image: &[u8] = &[0x30, 0x00, 0x12, 0x34, 0x56];

    let mut emu = Emulator::new();
    emu.load_image(image).unwrap();
    assert_eq!(emu.get_state().mem_read(0x3000), 0x1234);
    assert_eq!(emu.get_state().mem_read(0x3001), 0);
}

#[test]
fn origin_only() {
    let image: &[u8] = &[0x30, 0x00];

    let mut emu = Emulator::new();
    assert_eq!(emu.load_image(image).unwrap(), 0x3000);
    assert_eq!(emu.get_state().mem_read(0x3000), 0);
}

#[test]
fn origin_at_top() {
    let image = to_image(0xFFFF, &[0x1234]);

    let mut emu = Emulator::new();
    assert_eq!(emu.load_image(image.as_slice()).unwrap(), 0xFFFF);
    assert_eq!(emu.get_state().mem_read(0xFFFF), 0);
    assert_eq!(emu.get_state().mem_read(0x0000), 0);
}

#[test]
fn later_images_win() {
    let mut emu = Emulator::new();
    emu.load_image(to_image(PC_START, &[1, 2, 3]).as_slice()).unwrap();
    emu.load_image(to_image(PC_START + 1, &[9]).as_slice()).unwrap();
    assert_eq!(emu.get_state().mem_read(PC_START), 1);
    assert_eq!(emu.get_state().mem_read(PC_START + 1), 9);
    assert_eq!(emu.get_state().mem_read(PC_START + 2), 3);
}

#[test]
fn from_file() {
    let path = std::env::temp_dir().join(format!("lc3-image-{}.obj", std::process::id()));
    fs::write(&path, to_image(PC_START, &[0x1021, HALT])).unwrap();

    let mut emu = Emulator::new();
    let res = emu.load_image_file(&path);
    fs::remove_file(&path).unwrap();
    assert_eq!(res.unwrap(), PC_START);
    emu.run().unwrap();
    assert_eq!(emu.reg_read(Reg::R0), 1);
}

#[test]
fn errors() {
    let mut emu = Emulator::new();
    let empty: &[u8] = &[];
    assert!(matches!(emu.load_image(empty), Err(LoadError::MissingOrigin)));
    assert!(matches!(emu.load_image_file("/nonexistent/prog.obj"), Err(LoadError::Io(_))));
    assert_eq!(emu.run_state(), RunState::Loaded);
}
