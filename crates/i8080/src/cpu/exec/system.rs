use crate::cpu::{Cpu8080, Flags, Flow, Instruction};
use crate::memory::Bus8080;

pub(crate) fn nop(
    _cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    (Flow::Next, flags)
}

pub(crate) fn hlt(
    _cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    (Flow::Halt, flags)
}

pub(crate) fn ei(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    cpu.interrupts_enabled = true;
    (Flow::Next, flags)
}

pub(crate) fn di(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    cpu.interrupts_enabled = false;
    (Flow::Next, flags)
}

/// IN port: A <- port.
pub(crate) fn input(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    cpu.regs.set_a(bus.io_read(instr.byte()));
    (Flow::Next, flags)
}

/// OUT port: port <- A.
pub(crate) fn output(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    bus.io_write(instr.byte(), cpu.regs.a());
    (Flow::Next, flags)
}
