use crate::util::*;

use common::asm::Reg;
use common::constants::PC_START;

#[test]
fn jsr() {
    let bin = &[
        0x4802, // jsr fun
        0x1262, // add r1, r1, #2
        HALT,
    // fun:
        0x1021, // add r0, r0, #1
        0xC1C0, // ret
    ];

    let (mut emu, _) = load(bin);
    emu.run_ins().unwrap();
    assert_eq!(emu.pc(), PC_START + 3);
    assert_eq!(emu.reg_read(Reg::R7), PC_START + 1);
    emu.run().unwrap();
    assert_eq!(emu.reg_read(Reg::R0), 1);
    assert_eq!(emu.reg_read(Reg::R1), 2);
    assert_eq!(emu.pc(), PC_START + 3);
}

#[test]
fn jsr_backward() {
    let bin = &[
        0x1021, // fun: add r0, r0, #1
        0xC1C0, // ret
        0x4FFD, // start: jsr fun
        HALT,
    ];

    let (mut emu, _) = load(bin);
    emu.run_at(PC_START + 2).unwrap();
    assert_eq!(emu.reg_read(Reg::R0), 1);
    assert_eq!(emu.reg_read(Reg::R7), PC_START + 3);
    assert_eq!(emu.num_ins(), 4);
}

#[test]
fn jsrr() {
    let bin = &[
        0xE403, // lea r2, fun
        0x4080, // jsrr r2
        0x1262, // add r1, r1, #2
        HALT,
    // fun:
        0x1021, // add r0, r0, #1
        0xC1C0, // ret
    ];

    let (mut emu, _) = load(bin);
    emu.run_ins().unwrap();
    emu.run_ins().unwrap();
    assert_eq!(emu.pc(), PC_START + 4);
    assert_eq!(emu.reg_read(Reg::R7), PC_START + 2);
    emu.run().unwrap();
    assert_eq!(emu.reg_read(Reg::R0), 1);
    assert_eq!(emu.reg_read(Reg::R1), 2);
}

#[test]
fn jsrr_r7_links_first() {
    let bin = &[
        0x41C0, // jsrr r7
        0x1021, // add r0, r0, #1
        HALT,
    ];

    let (mut emu, _) = load(bin);
    emu.reg_write(Reg::R7, 0x5000);
    run_to_end(&mut emu, bin.len());
    assert_eq!(emu.reg_read(Reg::R0), 1);
    assert_eq!(emu.reg_read(Reg::R7), PC_START + 1);
}

#[test]
fn jmp() {
    let bin = &[
        0xE602, // lea r3, there
        0xC0C0, // jmp r3
        0x1021, // add r0, r0, #1
    // there:
        0x1262, // add r1, r1, #2
        HALT,
    ];

    let (mut emu, _) = load(bin);
    emu.reg_write(Reg::R7, 0x1234);
    run_to_end(&mut emu, bin.len());
    assert_eq!(emu.reg_read(Reg::R0), 0);
    assert_eq!(emu.reg_read(Reg::R1), 2);
    assert_eq!(emu.reg_read(Reg::R7), 0x1234);
}

#[test]
fn ret_to_r7() {
    let bin = &[
        0xC1C0, // ret
        0x1021, // add r0, r0, #1
        HALT,
    ];

    let (mut emu, _) = load(bin);
    emu.reg_write(Reg::R7, PC_START + 2);
    run_to_end(&mut emu, bin.len());
    assert_eq!(emu.reg_read(Reg::R0), 0);
    assert_eq!(emu.num_ins(), 2);
}
