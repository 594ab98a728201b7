use super::pair_code;
use crate::cpu::{Cpu8080, Flags, Flow, Instruction, RegPair};
use crate::memory::Bus8080;

/// PUSH rp / PUSH PSW (pair code 3 is A plus the flag byte).
pub(crate) fn push(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let value = match RegPair::from_code(pair_code(instr.opcode)) {
        Some(pair) => cpu.regs.pair(pair),
        None => u16::from_be_bytes([cpu.regs.a(), flags.to_psw()]),
    };
    cpu.push(bus, value);
    (Flow::Next, flags)
}

/// POP rp / POP PSW. Popping PSW replaces every flag.
pub(crate) fn pop(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let value = cpu.pop(bus);
    match RegPair::from_code(pair_code(instr.opcode)) {
        Some(pair) => {
            cpu.regs.set_pair(pair, value);
            (Flow::Next, flags)
        }
        None => {
            let [a, psw] = value.to_be_bytes();
            cpu.regs.set_a(a);
            (Flow::Next, Flags::from_psw(psw))
        }
    }
}

/// XTHL: swap HL with the word at the top of the stack.
pub(crate) fn xthl(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let sp = cpu.sp;
    let top = u16::from_le_bytes([bus.mem_read(sp), bus.mem_read(sp.wrapping_add(1))]);
    let [h, l] = cpu.regs.hl().to_be_bytes();
    bus.mem_write(sp, l);
    bus.mem_write(sp.wrapping_add(1), h);
    cpu.regs.set_hl(top);
    (Flow::Next, flags)
}

pub(crate) fn sphl(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    cpu.sp = cpu.regs.hl();
    (Flow::Next, flags)
}
