//! Data movement. Nothing here touches the flags.

use super::{dst_code, pair_code, src_code};
use crate::cpu::{Cpu8080, Flags, Flow, Instruction, Reg, RegPair};
use crate::memory::Bus8080;

/// MOV d,s (0x40–0x7F except 0x76).
pub(crate) fn mov(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let value = cpu.read_operand(bus, src_code(instr.opcode));
    cpu.write_operand(bus, dst_code(instr.opcode), value);
    (Flow::Next, flags)
}

/// MVI r,d8 / MVI M,d8.
pub(crate) fn mvi(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    cpu.write_operand(bus, dst_code(instr.opcode), instr.byte());
    (Flow::Next, flags)
}

/// LXI rp,d16; pair code 3 loads SP.
pub(crate) fn lxi(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    match RegPair::from_code(pair_code(instr.opcode)) {
        Some(pair) => cpu.regs.set_pair(pair, instr.word()),
        None => cpu.sp = instr.word(),
    }
    (Flow::Next, flags)
}

fn indirect_pair(opcode: u8) -> RegPair {
    if opcode & 0x10 == 0 {
        RegPair::BC
    } else {
        RegPair::DE
    }
}

/// STAX B / STAX D.
pub(crate) fn stax(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let addr = cpu.regs.pair(indirect_pair(instr.opcode));
    bus.mem_write(addr, cpu.regs.a());
    (Flow::Next, flags)
}

/// LDAX B / LDAX D.
pub(crate) fn ldax(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let addr = cpu.regs.pair(indirect_pair(instr.opcode));
    cpu.regs.set_a(bus.mem_read(addr));
    (Flow::Next, flags)
}

pub(crate) fn sta(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    bus.mem_write(instr.word(), cpu.regs.a());
    (Flow::Next, flags)
}

pub(crate) fn lda(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    cpu.regs.set_a(bus.mem_read(instr.word()));
    (Flow::Next, flags)
}

/// SHLD: L to addr, H to addr+1.
pub(crate) fn shld(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let addr = instr.word();
    bus.mem_write(addr, cpu.regs.get(Reg::L));
    bus.mem_write(addr.wrapping_add(1), cpu.regs.get(Reg::H));
    (Flow::Next, flags)
}

pub(crate) fn lhld(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let addr = instr.word();
    cpu.regs.set(Reg::L, bus.mem_read(addr));
    cpu.regs.set(Reg::H, bus.mem_read(addr.wrapping_add(1)));
    (Flow::Next, flags)
}

pub(crate) fn xchg(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let de = cpu.regs.pair(RegPair::DE);
    let hl = cpu.regs.hl();
    cpu.regs.set_pair(RegPair::DE, hl);
    cpu.regs.set_hl(de);
    (Flow::Next, flags)
}
