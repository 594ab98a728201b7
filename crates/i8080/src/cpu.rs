//! Intel 8080 CPU core.
//!
//! Decoding goes through the 256-entry [`OPCODES`] table: each entry holds
//! the instruction length, its cycle costs and the function that performs
//! the state transition. [`Cpu8080::step`] fetches, looks the opcode up,
//! runs it and settles the program counter.

mod exec;
mod flags;
mod interrupts;
mod opcodes;
mod registers;


use std::fmt;

use crate::error::{Error, Result};
use crate::memory::Bus8080;

pub use flags::{daa, Condition, Flags};
pub use interrupts::vector_address;
pub use opcodes::{ExecFn, Flow, OpInfo, OPCODES};
pub use registers::{Reg, RegPair, Registers};

/// Cycles charged for a step taken while the CPU sits in HLT.
pub const HALT_IDLE_CYCLES: u32 = 4;

/// One decoded instruction.
///
/// The two bytes after the opcode are always fetched; only the ones the
/// instruction's length covers are meaningful.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Instruction {
    /// Address the opcode was fetched from.
    pub pc: u16,
    pub opcode: u8,
    pub operands: [u8; 2],
}

impl Instruction {
    /// Second byte, the 8-bit immediate or port number.
    #[inline]
    pub fn byte(&self) -> u8 {
        self.operands[0]
    }

    /// Little-endian address/immediate from the second and third bytes.
    #[inline]
    pub fn word(&self) -> u16 {
        u16::from_le_bytes(self.operands)
    }

    pub fn info(&self) -> &'static OpInfo {
        &OPCODES[self.opcode as usize]
    }

    /// Encoded length in bytes (1–3).
    pub fn length(&self) -> u8 {
        self.info().len
    }

    /// Address of the instruction that follows this one.
    #[inline]
    pub fn next_pc(&self) -> u16 {
        self.pc.wrapping_add(u16::from(self.length()))
    }
}

impl fmt::Display for Instruction {
    /// Mnemonic with the `d8`, `d16` and `adr` placeholders replaced by the
    /// operand bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.info().mnemonic;
        let text = if mnemonic.ends_with("d16") || mnemonic.ends_with("adr") {
            let (head, _) = mnemonic.split_at(mnemonic.len() - 3);
            format!("{head}${:04X}", self.word())
        } else if mnemonic.ends_with("d8") {
            let (head, _) = mnemonic.split_at(mnemonic.len() - 2);
            format!("{head}${:02X}", self.byte())
        } else {
            mnemonic.to_string()
        };
        f.write_str(&text)
    }
}

/// Outcome of a single [`Cpu8080::step`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Step {
    pub cycles: u32,
    /// The executed instruction, `None` when the CPU idled in HLT.
    pub instruction: Option<Instruction>,
}

/// Intel 8080 register file, flags and interrupt latch.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cpu8080 {
    pub regs: Registers,
    pub sp: u16,
    pub pc: u16,
    pub flags: Flags,
    pub interrupts_enabled: bool,
    halted: bool,
}

impl Cpu8080 {
    /// Create a new CPU instance in reset state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all registers to their power-on values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the last executed instruction was HLT and no interrupt has
    /// been delivered since.
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Fetch the opcode at PC plus the two bytes after it.
    pub fn fetch(&self, bus: &mut dyn Bus8080) -> Instruction {
        let pc = self.pc;
        Instruction {
            pc,
            opcode: bus.mem_read(pc),
            operands: [
                bus.mem_read(pc.wrapping_add(1)),
                bus.mem_read(pc.wrapping_add(2)),
            ],
        }
    }

    /// Execute a single instruction and report the cycles it consumed.
    ///
    /// An opcode without an entry in the table is returned as
    /// [`Error::UnimplementedOpcode`]; the CPU state is left as it was
    /// before the fetch.
    pub fn step(&mut self, bus: &mut dyn Bus8080) -> Result<Step> {
        if self.halted {
            return Ok(Step {
                cycles: HALT_IDLE_CYCLES,
                instruction: None,
            });
        }

        let instr = self.fetch(bus);
        let op = instr.info();
        let exec = op.exec.ok_or(Error::UnimplementedOpcode {
            opcode: instr.opcode,
            pc: instr.pc,
        })?;

        let flags = self.flags;
        let (flow, flags) = exec(self, bus, &instr, flags);
        self.flags = flags;
        let cycles = match flow {
            Flow::Next => {
                self.pc = instr.next_pc();
                op.cycles
            }
            Flow::Jump(target) => {
                self.pc = target;
                op.cycles
            }
            Flow::Skip => {
                self.pc = instr.next_pc();
                op.alt_cycles
            }
            Flow::Halt => {
                self.pc = instr.next_pc();
                self.halted = true;
                op.cycles
            }
        };

        Ok(Step {
            cycles: u32::from(cycles),
            instruction: Some(instr),
        })
    }

    /// Push `value` with the high byte at SP-1 and the low byte at SP-2.
    pub(crate) fn push(&mut self, bus: &mut dyn Bus8080, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        bus.mem_write(self.sp.wrapping_sub(1), hi);
        bus.mem_write(self.sp.wrapping_sub(2), lo);
        self.sp = self.sp.wrapping_sub(2);
    }

    pub(crate) fn pop(&mut self, bus: &mut dyn Bus8080) -> u16 {
        let lo = bus.mem_read(self.sp);
        let hi = bus.mem_read(self.sp.wrapping_add(1));
        self.sp = self.sp.wrapping_add(2);
        u16::from_le_bytes([lo, hi])
    }

    /// Read a 3-bit operand field: a register, or memory at HL for code 6.
    #[inline]
    pub(crate) fn read_operand(&self, bus: &mut dyn Bus8080, code: u8) -> u8 {
        match Reg::from_code(code) {
            Some(reg) => self.regs.get(reg),
            None => bus.mem_read(self.regs.hl()),
        }
    }

    #[inline]
    pub(crate) fn write_operand(&mut self, bus: &mut dyn Bus8080, code: u8, value: u8) {
        match Reg::from_code(code) {
            Some(reg) => self.regs.set(reg, value),
            None => bus.mem_write(self.regs.hl(), value),
        }
    }
}
