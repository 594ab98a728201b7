//! Optional per-step observer, kept out of the execution path.

use std::fmt;

use crate::cpu::{Cpu8080, Flags, Instruction, Reg, RegPair, Registers};

/// State after one executed instruction.
#[derive(Clone, Copy, Debug)]
pub struct TraceRecord {
    pub instruction: Instruction,
    pub regs: Registers,
    pub flags: Flags,
    pub sp: u16,
    /// Program counter after the instruction.
    pub pc: u16,
    pub cycles: u32,
}

impl TraceRecord {
    pub fn capture(cpu: &Cpu8080, instruction: Instruction, cycles: u32) -> Self {
        Self {
            instruction,
            regs: cpu.regs,
            flags: cpu.flags,
            sp: cpu.sp,
            pc: cpu.pc,
            cycles,
        }
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instr = &self.instruction;
        let len = usize::from(instr.length());
        let flag = |b: bool| u8::from(b);

        write!(
            f,
            "A:{:02X} BC:{:04X} DE:{:04X} HL:{:04X} SP:{:04X} C:{} P:{} S:{} Z:{} AC:{}  {:04X}  {:02X}",
            self.regs.get(Reg::A),
            self.regs.pair(RegPair::BC),
            self.regs.pair(RegPair::DE),
            self.regs.pair(RegPair::HL),
            self.sp,
            flag(self.flags.carry),
            flag(self.flags.parity),
            flag(self.flags.sign),
            flag(self.flags.zero),
            flag(self.flags.aux_carry),
            instr.pc,
            instr.opcode,
        )?;
        for i in 0..2 {
            if i + 1 < len {
                write!(f, " {:02X}", instr.operands[i])?;
            } else {
                f.write_str("   ")?;
            }
        }
        write!(f, "  {instr}")
    }
}

/// Receives a record after each completed step.
pub trait TraceObserver {
    fn on_step(&mut self, record: &TraceRecord);
}

/// Writes every step to the `log` facade at trace level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTracer;

impl TraceObserver for LogTracer {
    fn on_step(&mut self, record: &TraceRecord) {
        log::trace!("{record}");
    }
}

/// Collects records in memory.
impl TraceObserver for Vec<TraceRecord> {
    fn on_step(&mut self, record: &TraceRecord) {
        self.push(*record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_operands_and_mnemonic() {
        let mut cpu = Cpu8080::new();
        cpu.regs.set_a(0x3c);
        cpu.sp = 0x2400;
        cpu.pc = 0x0103;
        cpu.flags.carry = true;
        let instr = Instruction {
            pc: 0x0100,
            opcode: 0x21,
            operands: [0x00, 0x24],
        };
        let line = TraceRecord::capture(&cpu, instr, 10).to_string();
        assert!(line.starts_with("A:3C BC:0000"), "{line}");
        assert!(line.contains("C:1 P:0"), "{line}");
        assert!(line.ends_with("0100  21 00 24  LXI H,$2400"), "{line}");

        let nop = Instruction {
            pc: 0x0000,
            opcode: 0x00,
            operands: [0xaa, 0xbb],
        };
        let line = TraceRecord::capture(&cpu, nop, 4).to_string();
        assert!(line.ends_with("0000  00        NOP"), "{line}");
    }
}
