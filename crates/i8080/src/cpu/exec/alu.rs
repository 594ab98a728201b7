use super::{dst_code, pair_code, src_code};
use crate::cpu::{daa, Cpu8080, Flags, Flow, Instruction, RegPair};
use crate::memory::Bus8080;

/// The eight accumulator operations, in opcode order (bits 3–5).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AluOp {
    Add,
    Adc,
    Sub,
    Sbb,
    Ana,
    Xra,
    Ora,
    Cmp,
}

impl AluOp {
    fn from_opcode(opcode: u8) -> Self {
        match dst_code(opcode) {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbb,
            4 => AluOp::Ana,
            5 => AluOp::Xra,
            6 => AluOp::Ora,
            _ => AluOp::Cmp,
        }
    }
}

/// Apply `op` to the accumulator and `value`, returning the new
/// accumulator and flags. All five flags are derived from the raw
/// intermediate; CMP leaves the accumulator unchanged.
fn accumulate(op: AluOp, a: u8, value: u8, flags: Flags) -> (u8, Flags) {
    let a16 = i16::from(a);
    let v16 = i16::from(value);
    let carry = i16::from(flags.carry);
    let raw = match op {
        AluOp::Add => a16 + v16,
        AluOp::Adc => a16 + v16 + carry,
        AluOp::Sub | AluOp::Cmp => a16 - v16,
        AluOp::Sbb => a16 - v16 - carry,
        AluOp::Ana => a16 & v16,
        AluOp::Xra => a16 ^ v16,
        AluOp::Ora => a16 | v16,
    };
    let flags = flags.arith(raw);
    if op == AluOp::Cmp {
        (a, flags)
    } else {
        (raw as u8, flags)
    }
}

/// ADD/ADC/SUB/SBB/ANA/XRA/ORA/CMP with a register or M (0x80–0xBF).
pub(crate) fn alu_reg(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let value = cpu.read_operand(bus, src_code(instr.opcode));
    let (a, flags) = accumulate(AluOp::from_opcode(instr.opcode), cpu.regs.a(), value, flags);
    cpu.regs.set_a(a);
    (Flow::Next, flags)
}

/// ADI/ACI/SUI/SBI/ANI/XRI/ORI/CPI.
pub(crate) fn alu_imm(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let op = AluOp::from_opcode(instr.opcode);
    let (a, flags) = accumulate(op, cpu.regs.a(), instr.byte(), flags);
    cpu.regs.set_a(a);
    (Flow::Next, flags)
}

/// INR r / INR M: Z, S, P only.
pub(crate) fn inr(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let code = dst_code(instr.opcode);
    let value = cpu.read_operand(bus, code).wrapping_add(1);
    cpu.write_operand(bus, code, value);
    (Flow::Next, flags.szp(value))
}

/// DCR r / DCR M: Z, S, P only.
pub(crate) fn dcr(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let code = dst_code(instr.opcode);
    let value = cpu.read_operand(bus, code).wrapping_sub(1);
    cpu.write_operand(bus, code, value);
    (Flow::Next, flags.szp(value))
}

fn pair_or_sp(cpu: &Cpu8080, opcode: u8) -> u16 {
    match RegPair::from_code(pair_code(opcode)) {
        Some(pair) => cpu.regs.pair(pair),
        None => cpu.sp,
    }
}

fn set_pair_or_sp(cpu: &mut Cpu8080, opcode: u8, value: u16) {
    match RegPair::from_code(pair_code(opcode)) {
        Some(pair) => cpu.regs.set_pair(pair, value),
        None => cpu.sp = value,
    }
}

pub(crate) fn inx(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let value = pair_or_sp(cpu, instr.opcode).wrapping_add(1);
    set_pair_or_sp(cpu, instr.opcode, value);
    (Flow::Next, flags)
}

pub(crate) fn dcx(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let value = pair_or_sp(cpu, instr.opcode).wrapping_sub(1);
    set_pair_or_sp(cpu, instr.opcode, value);
    (Flow::Next, flags)
}

/// DAD rp: HL += rp, carry only.
pub(crate) fn dad(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let sum = u32::from(cpu.regs.hl()) + u32::from(pair_or_sp(cpu, instr.opcode));
    cpu.regs.set_hl(sum as u16);
    (Flow::Next, flags.carry16(sum))
}

pub(crate) fn decimal_adjust(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let (a, flags) = daa(cpu.regs.a(), flags);
    cpu.regs.set_a(a);
    (Flow::Next, flags)
}

pub(crate) fn cma(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    cpu.regs.set_a(!cpu.regs.a());
    (Flow::Next, flags)
}

pub(crate) fn stc(
    _cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    (Flow::Next, flags.with_carry(true))
}

pub(crate) fn cmc(
    _cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    (Flow::Next, flags.with_carry(!flags.carry))
}

// Rotates only redefine carry from the bit shifted out.

pub(crate) fn rlc(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let a = cpu.regs.a();
    cpu.regs.set_a(a.rotate_left(1));
    (Flow::Next, flags.with_carry(a & 0x80 != 0))
}

pub(crate) fn rrc(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let a = cpu.regs.a();
    cpu.regs.set_a(a.rotate_right(1));
    (Flow::Next, flags.with_carry(a & 0x01 != 0))
}

pub(crate) fn ral(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let a = cpu.regs.a();
    cpu.regs.set_a((a << 1) | u8::from(flags.carry));
    (Flow::Next, flags.with_carry(a & 0x80 != 0))
}

pub(crate) fn rar(
    cpu: &mut Cpu8080,
    _bus: &mut dyn Bus8080,
    _instr: &Instruction,
    flags: Flags,
) -> (Flow, Flags) {
    let a = cpu.regs.a();
    cpu.regs.set_a((a >> 1) | (u8::from(flags.carry) << 7));
    (Flow::Next, flags.with_carry(a & 0x01 != 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_sub_carry_boundaries() {
        let f = Flags::default();
        let (a, out) = accumulate(AluOp::Add, 0xff, 0x01, f);
        assert_eq!(a, 0x00);
        assert!(out.carry && out.zero && out.aux_carry);

        let (a, out) = accumulate(AluOp::Add, 0x7f, 0x01, f);
        assert_eq!(a, 0x80);
        assert!(!out.carry && out.sign);

        let (a, out) = accumulate(AluOp::Sub, 0x00, 0x01, f);
        assert_eq!(a, 0xff);
        assert!(out.carry && out.sign && out.parity);

        let (a, out) = accumulate(AluOp::Sub, 0x05, 0x05, f);
        assert_eq!(a, 0x00);
        assert!(!out.carry && out.zero);
    }

    #[test]
    fn carry_in_for_adc_and_sbb() {
        let f = Flags::default().with_carry(true);
        let (a, out) = accumulate(AluOp::Adc, 0xfe, 0x01, f);
        assert_eq!(a, 0x00);
        assert!(out.carry);

        let (a, out) = accumulate(AluOp::Sbb, 0x01, 0x01, f);
        assert_eq!(a, 0xff);
        assert!(out.carry);

        let (a, out) = accumulate(AluOp::Sbb, 0x03, 0x01, f);
        assert_eq!(a, 0x01);
        assert!(!out.carry && !out.parity);
    }

    #[test]
    fn logical_ops_never_carry() {
        let f = Flags {
            carry: true,
            aux_carry: true,
            ..Flags::default()
        };
        let (a, out) = accumulate(AluOp::Ana, 0xf0, 0x0f, f);
        assert_eq!(a, 0);
        assert!(out.zero && !out.carry && !out.aux_carry);

        let (a, out) = accumulate(AluOp::Ora, 0x80, 0x01, f);
        assert_eq!(a, 0x81);
        assert!(out.sign && out.parity && !out.carry);

        let (a, out) = accumulate(AluOp::Xra, 0xff, 0xff, f);
        assert_eq!(a, 0);
        assert!(out.zero && !out.carry);
    }

    #[test]
    fn compare_keeps_accumulator() {
        let (a, out) = accumulate(AluOp::Cmp, 0x10, 0x20, Flags::default());
        assert_eq!(a, 0x10);
        assert!(out.carry && !out.zero);
        let (_, out) = accumulate(AluOp::Cmp, 0x20, 0x20, Flags::default());
        assert!(out.zero && !out.carry);
    }

    #[test]
    fn alu_op_decodes_from_opcode() {
        assert_eq!(AluOp::from_opcode(0x80), AluOp::Add);
        assert_eq!(AluOp::from_opcode(0x9e), AluOp::Sbb);
        assert_eq!(AluOp::from_opcode(0xe6), AluOp::Ana);
        assert_eq!(AluOp::from_opcode(0xfe), AluOp::Cmp);
    }
}
