use super::dst_code;
use crate::cpu::{Condition, Cpu8080, Flags, Flow, Instruction};
use crate::memory::Bus8080;

fn condition_holds(instr: &Instruction, flags: Flags) -> bool {
    Condition::from_opcode(instr.opcode).holds(flags)
}

pub(crate) fn jmp(
    _cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    (Flow::Jump(instr.word()), flags)
}

/// Jcc: same cost taken or not.
pub(crate) fn jmp_cond(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    if condition_holds(instr, flags) {
        jmp(cpu, bus, instr, flags)
    } else {
        (Flow::Skip, flags)
    }
}

/// CALL: push the address after the 3-byte instruction.
pub(crate) fn call(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    cpu.push(bus, instr.next_pc());
    (Flow::Jump(instr.word()), flags)
}

pub(crate) fn call_cond(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    if condition_holds(instr, flags) {
        call(cpu, bus, instr, flags)
    } else {
        (Flow::Skip, flags)
    }
}

pub(crate) fn ret(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    (Flow::Jump(cpu.pop(bus)), flags)
}

pub(crate) fn ret_cond(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    if condition_holds(instr, flags) {
        ret(cpu, bus, instr, flags)
    } else {
        (Flow::Skip, flags)
    }
}

/// RST n: call to 8 * n.
pub(crate) fn rst(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    cpu.push(bus, instr.next_pc());
    (Flow::Jump(u16::from(dst_code(instr.opcode)) << 3), flags)
}

pub(crate) fn pchl(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    (Flow::Jump(cpu.regs.hl()), flags)
}
