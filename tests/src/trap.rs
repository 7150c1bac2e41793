use crate::util::*;

use common::asm::Reg;
use common::constants::PC_START;
use lc3_emu::Cond;
use lc3_emu::io::Input;

#[test]
fn out() {
    let bin = &[
        0xF021, // out
        HALT,
    ];

    let (mut emu, tty) = load(bin);
    // Only the low byte is written.
    emu.reg_write(Reg::R0, 0x4142);
    run_to_end(&mut emu, bin.len());
    assert_eq!(tty.take_output_string(), "BHALT\n");
}

#[test]
fn puts() {
    let mut bin = vec![
        0xE002, // lea r0, msg
        0xF022, // puts
        HALT,
    ];
    bin.extend(asciz("Hi there"));

    let (mut emu, tty) = load(&bin);
    emu.run().unwrap();
    assert_eq!(tty.take_output_string(), "Hi thereHALT\n");
    assert_eq!(emu.reg_read(Reg::R0), PC_START + 3);
}

#[test]
fn puts_low_bytes() {
    let bin = &[
        0xE002, // lea r0, msg
        0xF022, // puts
        HALT,
        0x0141, // 'A' with junk above
        0x0000,
    ];

    let (mut emu, tty) = load(bin);
    emu.run().unwrap();
    assert_eq!(tty.take_output_string(), "AHALT\n");
}

#[test]
fn puts_empty() {
    let bin = &[
        0xE002, // lea r0, msg
        0xF022, // puts
        HALT,
        0x0000,
    ];

    let (mut emu, tty) = load(bin);
    emu.run().unwrap();
    assert_eq!(tty.take_output_string(), "HALT\n");
}

#[test]
fn putsp() {
    let bin = &[
        0xE002, // lea r0, msg
        0xF024, // putsp
        HALT,
        0x6261, // "ab"
        0x0063, // "c"
        0x0000,
    ];

    let (mut emu, tty) = load(bin);
    emu.run().unwrap();
    assert_eq!(tty.take_output_string(), "abcHALT\n");
}

#[test]
fn getc() {
    let bin = &[
        0xF020, // getc
        0x1220, // add r1, r0, #0
        0xF020, // getc
        HALT,
    ];

    let (mut emu, tty) = load(bin);
    tty.write_input(b"x");
    emu.run().unwrap();
    assert_eq!(emu.reg_read(Reg::R1), b'x' as u16);
    assert_eq!(emu.reg_read(Reg::R0), Input::EOF_WORD);
    // No echo.
    assert_eq!(tty.take_output_string(), "HALT\n");
}

#[test]
fn getc_keeps_cond_and_r7() {
    let bin = &[
        0xF020, // getc
        HALT,
    ];

    let (mut emu, tty) = load(bin);
    tty.write_input(b"\0");
    emu.set_cond(Cond::NEG);
    emu.reg_write(Reg::R7, 0x1234);
    emu.run().unwrap();
    assert_eq!(emu.reg_read(Reg::R0), 0);
    assert_eq!(emu.get_cond(), Cond::NEG);
    assert_eq!(emu.reg_read(Reg::R7), 0x1234);
}

#[test]
fn in_prompts_and_echoes() {
    let bin = &[
        0xF023, // in
        HALT,
    ];

    let (mut emu, tty) = load(bin);
    tty.write_input(b"q");
    emu.run().unwrap();
    assert_eq!(emu.reg_read(Reg::R0), b'q' as u16);
    assert_eq!(tty.take_output_string(), "Enter a character: qHALT\n");
}

#[test]
fn in_at_eof() {
    let bin = &[
        0xF023, // in
        HALT,
    ];

    let (mut emu, tty) = load(bin);
    emu.run().unwrap();
    assert_eq!(emu.reg_read(Reg::R0), 0xFFFF);
    assert_eq!(tty.take_output_string(), "Enter a character: HALT\n");
}

#[test]
fn halt_stops() {
    let bin = &[
        HALT,
        0x1021, // add r0, r0, #1
        HALT,
    ];

    let (mut emu, tty) = load(bin);
    emu.run().unwrap();
    assert_eq!(emu.reg_read(Reg::R0), 0);
    assert_eq!(emu.num_ins(), 1);
    assert_eq!(emu.pc(), PC_START + 1);
    assert_eq!(tty.take_output_string(), "HALT\n");
}

#[test]
fn unknown_vectors_ignored() {
    let bin = &[
        0xF030, // trap x30
        0xF026, // trap x26
        0xF029, // trap x29
        0xF000, // trap x00
        0x1021, // add r0, r0, #1
        HALT,
    ];

    let (mut emu, tty) = load(bin);
    emu.reg_write(Reg::R7, 0x1234);
    run_to_end(&mut emu, bin.len());
    assert_eq!(emu.reg_read(Reg::R0), 1);
    assert_eq!(emu.reg_read(Reg::R7), 0x1234);
    assert_eq!(tty.take_output_string(), "HALT\n");
}
