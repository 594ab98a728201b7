use super::exec::{alu, control, ld, stack, system};
use super::{Cpu8080, Flags, Instruction};
use crate::memory::Bus8080;

/// How the program counter moves once an instruction has run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    /// Fall through to the next instruction, charging the base cost.
    Next,
    /// Continue at the given address, charging the base cost.
    Jump(u16),
    /// Condition not met: fall through and charge the alternate cost.
    Skip,
    /// HLT: fall through and stop the CPU.
    Halt,
}

/// State transition for one opcode. The current flags go in by value and
/// the resulting flags come back out; [`Cpu8080::step`] stores them.
pub type ExecFn = fn(&mut Cpu8080, &mut dyn Bus8080, &Instruction, Flags) -> (Flow, Flags);

/// Table entry describing one opcode.
#[derive(Clone, Copy)]
pub struct OpInfo {
    pub mnemonic: &'static str,
    /// Encoded length in bytes (1–3).
    pub len: u8,
    /// Cycles when the instruction runs to completion (or its branch is
    /// taken).
    pub cycles: u8,
    /// Cycles for a conditional call/return whose condition fails. Equal to
    /// `cycles` for everything else.
    pub alt_cycles: u8,
    /// `None` marks an opcode the core refuses to execute.
    pub exec: Option<ExecFn>,
}

impl OpInfo {
    pub const UNIMPLEMENTED: OpInfo = OpInfo {
        mnemonic: "???",
        len: 1,
        cycles: 0,
        alt_cycles: 0,
        exec: None,
    };

    const fn new(mnemonic: &'static str, len: u8, cycles: u8, exec: ExecFn) -> Self {
        Self::branch(mnemonic, len, cycles, cycles, exec)
    }

    const fn branch(
        mnemonic: &'static str,
        len: u8,
        cycles: u8,
        alt_cycles: u8,
        exec: ExecFn,
    ) -> Self {
        Self {
            mnemonic,
            len,
            cycles,
            alt_cycles,
            exec: Some(exec),
        }
    }

    pub fn is_implemented(&self) -> bool {
        self.exec.is_some()
    }
}

/// Decode table indexed by opcode byte.
pub static OPCODES: [OpInfo; 256] = {
    let mut t = [OpInfo::UNIMPLEMENTED; 256];

    t[0x00] = OpInfo::new("NOP", 1, 4, system::nop);
    t[0x01] = OpInfo::new("LXI B,d16", 3, 10, ld::lxi);
    t[0x02] = OpInfo::new("STAX B", 1, 7, ld::stax);
    t[0x03] = OpInfo::new("INX B", 1, 5, alu::inx);
    t[0x04] = OpInfo::new("INR B", 1, 5, alu::inr);
    t[0x05] = OpInfo::new("DCR B", 1, 5, alu::dcr);
    t[0x06] = OpInfo::new("MVI B,d8", 2, 7, ld::mvi);
    t[0x07] = OpInfo::new("RLC", 1, 4, alu::rlc);
    // 0x08: undocumented, left unimplemented
    t[0x09] = OpInfo::new("DAD B", 1, 10, alu::dad);
    t[0x0A] = OpInfo::new("LDAX B", 1, 7, ld::ldax);
    t[0x0B] = OpInfo::new("DCX B", 1, 5, alu::dcx);
    t[0x0C] = OpInfo::new("INR C", 1, 5, alu::inr);
    t[0x0D] = OpInfo::new("DCR C", 1, 5, alu::dcr);
    t[0x0E] = OpInfo::new("MVI C,d8", 2, 7, ld::mvi);
    t[0x0F] = OpInfo::new("RRC", 1, 4, alu::rrc);
    // 0x10: undocumented, left unimplemented
    t[0x11] = OpInfo::new("LXI D,d16", 3, 10, ld::lxi);
    t[0x12] = OpInfo::new("STAX D", 1, 7, ld::stax);
    t[0x13] = OpInfo::new("INX D", 1, 5, alu::inx);
    t[0x14] = OpInfo::new("INR D", 1, 5, alu::inr);
    t[0x15] = OpInfo::new("DCR D", 1, 5, alu::dcr);
    t[0x16] = OpInfo::new("MVI D,d8", 2, 7, ld::mvi);
    t[0x17] = OpInfo::new("RAL", 1, 4, alu::ral);
    // 0x18: undocumented, left unimplemented
    t[0x19] = OpInfo::new("DAD D", 1, 10, alu::dad);
    t[0x1A] = OpInfo::new("LDAX D", 1, 7, ld::ldax);
    t[0x1B] = OpInfo::new("DCX D", 1, 5, alu::dcx);
    t[0x1C] = OpInfo::new("INR E", 1, 5, alu::inr);
    t[0x1D] = OpInfo::new("DCR E", 1, 5, alu::dcr);
    t[0x1E] = OpInfo::new("MVI E,d8", 2, 7, ld::mvi);
    t[0x1F] = OpInfo::new("RAR", 1, 4, alu::rar);
    // 0x20: undocumented, left unimplemented
    t[0x21] = OpInfo::new("LXI H,d16", 3, 10, ld::lxi);
    t[0x22] = OpInfo::new("SHLD adr", 3, 16, ld::shld);
    t[0x23] = OpInfo::new("INX H", 1, 5, alu::inx);
    t[0x24] = OpInfo::new("INR H", 1, 5, alu::inr);
    t[0x25] = OpInfo::new("DCR H", 1, 5, alu::dcr);
    t[0x26] = OpInfo::new("MVI H,d8", 2, 7, ld::mvi);
    t[0x27] = OpInfo::new("DAA", 1, 4, alu::decimal_adjust);
    // 0x28: undocumented, left unimplemented
    t[0x29] = OpInfo::new("DAD H", 1, 10, alu::dad);
    t[0x2A] = OpInfo::new("LHLD adr", 3, 16, ld::lhld);
    t[0x2B] = OpInfo::new("DCX H", 1, 5, alu::dcx);
    t[0x2C] = OpInfo::new("INR L", 1, 5, alu::inr);
    t[0x2D] = OpInfo::new("DCR L", 1, 5, alu::dcr);
    t[0x2E] = OpInfo::new("MVI L,d8", 2, 7, ld::mvi);
    t[0x2F] = OpInfo::new("CMA", 1, 4, alu::cma);
    // 0x30: undocumented, left unimplemented
    t[0x31] = OpInfo::new("LXI SP,d16", 3, 10, ld::lxi);
    t[0x32] = OpInfo::new("STA adr", 3, 13, ld::sta);
    t[0x33] = OpInfo::new("INX SP", 1, 5, alu::inx);
    t[0x34] = OpInfo::new("INR M", 1, 10, alu::inr);
    t[0x35] = OpInfo::new("DCR M", 1, 10, alu::dcr);
    t[0x36] = OpInfo::new("MVI M,d8", 2, 10, ld::mvi);
    t[0x37] = OpInfo::new("STC", 1, 4, alu::stc);
    // 0x38: undocumented, left unimplemented
    t[0x39] = OpInfo::new("DAD SP", 1, 10, alu::dad);
    t[0x3A] = OpInfo::new("LDA adr", 3, 13, ld::lda);
    t[0x3B] = OpInfo::new("DCX SP", 1, 5, alu::dcx);
    t[0x3C] = OpInfo::new("INR A", 1, 5, alu::inr);
    t[0x3D] = OpInfo::new("DCR A", 1, 5, alu::dcr);
    t[0x3E] = OpInfo::new("MVI A,d8", 2, 7, ld::mvi);
    t[0x3F] = OpInfo::new("CMC", 1, 4, alu::cmc);
    t[0x40] = OpInfo::new("MOV B,B", 1, 5, ld::mov);
    t[0x41] = OpInfo::new("MOV B,C", 1, 5, ld::mov);
    t[0x42] = OpInfo::new("MOV B,D", 1, 5, ld::mov);
    t[0x43] = OpInfo::new("MOV B,E", 1, 5, ld::mov);
    t[0x44] = OpInfo::new("MOV B,H", 1, 5, ld::mov);
    t[0x45] = OpInfo::new("MOV B,L", 1, 5, ld::mov);
    t[0x46] = OpInfo::new("MOV B,M", 1, 7, ld::mov);
    t[0x47] = OpInfo::new("MOV B,A", 1, 5, ld::mov);
    t[0x48] = OpInfo::new("MOV C,B", 1, 5, ld::mov);
    t[0x49] = OpInfo::new("MOV C,C", 1, 5, ld::mov);
    t[0x4A] = OpInfo::new("MOV C,D", 1, 5, ld::mov);
    t[0x4B] = OpInfo::new("MOV C,E", 1, 5, ld::mov);
    t[0x4C] = OpInfo::new("MOV C,H", 1, 5, ld::mov);
    t[0x4D] = OpInfo::new("MOV C,L", 1, 5, ld::mov);
    t[0x4E] = OpInfo::new("MOV C,M", 1, 7, ld::mov);
    t[0x4F] = OpInfo::new("MOV C,A", 1, 5, ld::mov);
    t[0x50] = OpInfo::new("MOV D,B", 1, 5, ld::mov);
    t[0x51] = OpInfo::new("MOV D,C", 1, 5, ld::mov);
    t[0x52] = OpInfo::new("MOV D,D", 1, 5, ld::mov);
    t[0x53] = OpInfo::new("MOV D,E", 1, 5, ld::mov);
    t[0x54] = OpInfo::new("MOV D,H", 1, 5, ld::mov);
    t[0x55] = OpInfo::new("MOV D,L", 1, 5, ld::mov);
    t[0x56] = OpInfo::new("MOV D,M", 1, 7, ld::mov);
    t[0x57] = OpInfo::new("MOV D,A", 1, 5, ld::mov);
    t[0x58] = OpInfo::new("MOV E,B", 1, 5, ld::mov);
    t[0x59] = OpInfo::new("MOV E,C", 1, 5, ld::mov);
    t[0x5A] = OpInfo::new("MOV E,D", 1, 5, ld::mov);
    t[0x5B] = OpInfo::new("MOV E,E", 1, 5, ld::mov);
    t[0x5C] = OpInfo::new("MOV E,H", 1, 5, ld::mov);
    t[0x5D] = OpInfo::new("MOV E,L", 1, 5, ld::mov);
    t[0x5E] = OpInfo::new("MOV E,M", 1, 7, ld::mov);
    t[0x5F] = OpInfo::new("MOV E,A", 1, 5, ld::mov);
    t[0x60] = OpInfo::new("MOV H,B", 1, 5, ld::mov);
    t[0x61] = OpInfo::new("MOV H,C", 1, 5, ld::mov);
    t[0x62] = OpInfo::new("MOV H,D", 1, 5, ld::mov);
    t[0x63] = OpInfo::new("MOV H,E", 1, 5, ld::mov);
    t[0x64] = OpInfo::new("MOV H,H", 1, 5, ld::mov);
    t[0x65] = OpInfo::new("MOV H,L", 1, 5, ld::mov);
    t[0x66] = OpInfo::new("MOV H,M", 1, 7, ld::mov);
    t[0x67] = OpInfo::new("MOV H,A", 1, 5, ld::mov);
    t[0x68] = OpInfo::new("MOV L,B", 1, 5, ld::mov);
    t[0x69] = OpInfo::new("MOV L,C", 1, 5, ld::mov);
    t[0x6A] = OpInfo::new("MOV L,D", 1, 5, ld::mov);
    t[0x6B] = OpInfo::new("MOV L,E", 1, 5, ld::mov);
    t[0x6C] = OpInfo::new("MOV L,H", 1, 5, ld::mov);
    t[0x6D] = OpInfo::new("MOV L,L", 1, 5, ld::mov);
    t[0x6E] = OpInfo::new("MOV L,M", 1, 7, ld::mov);
    t[0x6F] = OpInfo::new("MOV L,A", 1, 5, ld::mov);
    t[0x70] = OpInfo::new("MOV M,B", 1, 7, ld::mov);
    t[0x71] = OpInfo::new("MOV M,C", 1, 7, ld::mov);
    t[0x72] = OpInfo::new("MOV M,D", 1, 7, ld::mov);
    t[0x73] = OpInfo::new("MOV M,E", 1, 7, ld::mov);
    t[0x74] = OpInfo::new("MOV M,H", 1, 7, ld::mov);
    t[0x75] = OpInfo::new("MOV M,L", 1, 7, ld::mov);
    t[0x76] = OpInfo::new("HLT", 1, 7, system::hlt);
    t[0x77] = OpInfo::new("MOV M,A", 1, 7, ld::mov);
    t[0x78] = OpInfo::new("MOV A,B", 1, 5, ld::mov);
    t[0x79] = OpInfo::new("MOV A,C", 1, 5, ld::mov);
    t[0x7A] = OpInfo::new("MOV A,D", 1, 5, ld::mov);
    t[0x7B] = OpInfo::new("MOV A,E", 1, 5, ld::mov);
    t[0x7C] = OpInfo::new("MOV A,H", 1, 5, ld::mov);
    t[0x7D] = OpInfo::new("MOV A,L", 1, 5, ld::mov);
    t[0x7E] = OpInfo::new("MOV A,M", 1, 7, ld::mov);
    t[0x7F] = OpInfo::new("MOV A,A", 1, 5, ld::mov);
    t[0x80] = OpInfo::new("ADD B", 1, 4, alu::alu_reg);
    t[0x81] = OpInfo::new("ADD C", 1, 4, alu::alu_reg);
    t[0x82] = OpInfo::new("ADD D", 1, 4, alu::alu_reg);
    t[0x83] = OpInfo::new("ADD E", 1, 4, alu::alu_reg);
    t[0x84] = OpInfo::new("ADD H", 1, 4, alu::alu_reg);
    t[0x85] = OpInfo::new("ADD L", 1, 4, alu::alu_reg);
    t[0x86] = OpInfo::new("ADD M", 1, 7, alu::alu_reg);
    t[0x87] = OpInfo::new("ADD A", 1, 4, alu::alu_reg);
    t[0x88] = OpInfo::new("ADC B", 1, 4, alu::alu_reg);
    t[0x89] = OpInfo::new("ADC C", 1, 4, alu::alu_reg);
    t[0x8A] = OpInfo::new("ADC D", 1, 4, alu::alu_reg);
    t[0x8B] = OpInfo::new("ADC E", 1, 4, alu::alu_reg);
    t[0x8C] = OpInfo::new("ADC H", 1, 4, alu::alu_reg);
    t[0x8D] = OpInfo::new("ADC L", 1, 4, alu::alu_reg);
    t[0x8E] = OpInfo::new("ADC M", 1, 7, alu::alu_reg);
    t[0x8F] = OpInfo::new("ADC A", 1, 4, alu::alu_reg);
    t[0x90] = OpInfo::new("SUB B", 1, 4, alu::alu_reg);
    t[0x91] = OpInfo::new("SUB C", 1, 4, alu::alu_reg);
    t[0x92] = OpInfo::new("SUB D", 1, 4, alu::alu_reg);
    t[0x93] = OpInfo::new("SUB E", 1, 4, alu::alu_reg);
    t[0x94] = OpInfo::new("SUB H", 1, 4, alu::alu_reg);
    t[0x95] = OpInfo::new("SUB L", 1, 4, alu::alu_reg);
    t[0x96] = OpInfo::new("SUB M", 1, 7, alu::alu_reg);
    t[0x97] = OpInfo::new("SUB A", 1, 4, alu::alu_reg);
    t[0x98] = OpInfo::new("SBB B", 1, 4, alu::alu_reg);
    t[0x99] = OpInfo::new("SBB C", 1, 4, alu::alu_reg);
    t[0x9A] = OpInfo::new("SBB D", 1, 4, alu::alu_reg);
    t[0x9B] = OpInfo::new("SBB E", 1, 4, alu::alu_reg);
    t[0x9C] = OpInfo::new("SBB H", 1, 4, alu::alu_reg);
    t[0x9D] = OpInfo::new("SBB L", 1, 4, alu::alu_reg);
    t[0x9E] = OpInfo::new("SBB M", 1, 7, alu::alu_reg);
    t[0x9F] = OpInfo::new("SBB A", 1, 4, alu::alu_reg);
    t[0xA0] = OpInfo::new("ANA B", 1, 4, alu::alu_reg);
    t[0xA1] = OpInfo::new("ANA C", 1, 4, alu::alu_reg);
    t[0xA2] = OpInfo::new("ANA D", 1, 4, alu::alu_reg);
    t[0xA3] = OpInfo::new("ANA E", 1, 4, alu::alu_reg);
    t[0xA4] = OpInfo::new("ANA H", 1, 4, alu::alu_reg);
    t[0xA5] = OpInfo::new("ANA L", 1, 4, alu::alu_reg);
    t[0xA6] = OpInfo::new("ANA M", 1, 7, alu::alu_reg);
    t[0xA7] = OpInfo::new("ANA A", 1, 4, alu::alu_reg);
    t[0xA8] = OpInfo::new("XRA B", 1, 4, alu::alu_reg);
    t[0xA9] = OpInfo::new("XRA C", 1, 4, alu::alu_reg);
    t[0xAA] = OpInfo::new("XRA D", 1, 4, alu::alu_reg);
    t[0xAB] = OpInfo::new("XRA E", 1, 4, alu::alu_reg);
    t[0xAC] = OpInfo::new("XRA H", 1, 4, alu::alu_reg);
    t[0xAD] = OpInfo::new("XRA L", 1, 4, alu::alu_reg);
    t[0xAE] = OpInfo::new("XRA M", 1, 7, alu::alu_reg);
    t[0xAF] = OpInfo::new("XRA A", 1, 4, alu::alu_reg);
    t[0xB0] = OpInfo::new("ORA B", 1, 4, alu::alu_reg);
    t[0xB1] = OpInfo::new("ORA C", 1, 4, alu::alu_reg);
    t[0xB2] = OpInfo::new("ORA D", 1, 4, alu::alu_reg);
    t[0xB3] = OpInfo::new("ORA E", 1, 4, alu::alu_reg);
    t[0xB4] = OpInfo::new("ORA H", 1, 4, alu::alu_reg);
    t[0xB5] = OpInfo::new("ORA L", 1, 4, alu::alu_reg);
    t[0xB6] = OpInfo::new("ORA M", 1, 7, alu::alu_reg);
    t[0xB7] = OpInfo::new("ORA A", 1, 4, alu::alu_reg);
    t[0xB8] = OpInfo::new("CMP B", 1, 4, alu::alu_reg);
    t[0xB9] = OpInfo::new("CMP C", 1, 4, alu::alu_reg);
    t[0xBA] = OpInfo::new("CMP D", 1, 4, alu::alu_reg);
    t[0xBB] = OpInfo::new("CMP E", 1, 4, alu::alu_reg);
    t[0xBC] = OpInfo::new("CMP H", 1, 4, alu::alu_reg);
    t[0xBD] = OpInfo::new("CMP L", 1, 4, alu::alu_reg);
    t[0xBE] = OpInfo::new("CMP M", 1, 7, alu::alu_reg);
    t[0xBF] = OpInfo::new("CMP A", 1, 4, alu::alu_reg);
    t[0xC0] = OpInfo::branch("RNZ", 1, 11, 5, control::ret_cond);
    t[0xC1] = OpInfo::new("POP B", 1, 10, stack::pop);
    t[0xC2] = OpInfo::new("JNZ adr", 3, 10, control::jmp_cond);
    t[0xC3] = OpInfo::new("JMP adr", 3, 10, control::jmp);
    t[0xC4] = OpInfo::branch("CNZ adr", 3, 17, 11, control::call_cond);
    t[0xC5] = OpInfo::new("PUSH B", 1, 11, stack::push);
    t[0xC6] = OpInfo::new("ADI d8", 2, 7, alu::alu_imm);
    t[0xC7] = OpInfo::new("RST 0", 1, 11, control::rst);
    t[0xC8] = OpInfo::branch("RZ", 1, 11, 5, control::ret_cond);
    t[0xC9] = OpInfo::new("RET", 1, 10, control::ret);
    t[0xCA] = OpInfo::new("JZ adr", 3, 10, control::jmp_cond);
    // 0xCB: undocumented, left unimplemented
    t[0xCC] = OpInfo::branch("CZ adr", 3, 17, 11, control::call_cond);
    t[0xCD] = OpInfo::new("CALL adr", 3, 17, control::call);
    t[0xCE] = OpInfo::new("ACI d8", 2, 7, alu::alu_imm);
    t[0xCF] = OpInfo::new("RST 1", 1, 11, control::rst);
    t[0xD0] = OpInfo::branch("RNC", 1, 11, 5, control::ret_cond);
    t[0xD1] = OpInfo::new("POP D", 1, 10, stack::pop);
    t[0xD2] = OpInfo::new("JNC adr", 3, 10, control::jmp_cond);
    t[0xD3] = OpInfo::new("OUT d8", 2, 10, system::output);
    t[0xD4] = OpInfo::branch("CNC adr", 3, 17, 11, control::call_cond);
    t[0xD5] = OpInfo::new("PUSH D", 1, 11, stack::push);
    t[0xD6] = OpInfo::new("SUI d8", 2, 7, alu::alu_imm);
    t[0xD7] = OpInfo::new("RST 2", 1, 11, control::rst);
    t[0xD8] = OpInfo::branch("RC", 1, 11, 5, control::ret_cond);
    // 0xD9: undocumented, left unimplemented
    t[0xDA] = OpInfo::new("JC adr", 3, 10, control::jmp_cond);
    t[0xDB] = OpInfo::new("IN d8", 2, 10, system::input);
    t[0xDC] = OpInfo::branch("CC adr", 3, 17, 11, control::call_cond);
    // 0xDD: undocumented, left unimplemented
    t[0xDE] = OpInfo::new("SBI d8", 2, 7, alu::alu_imm);
    t[0xDF] = OpInfo::new("RST 3", 1, 11, control::rst);
    t[0xE0] = OpInfo::branch("RPO", 1, 11, 5, control::ret_cond);
    t[0xE1] = OpInfo::new("POP H", 1, 10, stack::pop);
    t[0xE2] = OpInfo::new("JPO adr", 3, 10, control::jmp_cond);
    t[0xE3] = OpInfo::new("XTHL", 1, 18, stack::xthl);
    t[0xE4] = OpInfo::branch("CPO adr", 3, 17, 11, control::call_cond);
    t[0xE5] = OpInfo::new("PUSH H", 1, 11, stack::push);
    t[0xE6] = OpInfo::new("ANI d8", 2, 7, alu::alu_imm);
    t[0xE7] = OpInfo::new("RST 4", 1, 11, control::rst);
    t[0xE8] = OpInfo::branch("RPE", 1, 11, 5, control::ret_cond);
    t[0xE9] = OpInfo::new("PCHL", 1, 5, control::pchl);
    t[0xEA] = OpInfo::new("JPE adr", 3, 10, control::jmp_cond);
    t[0xEB] = OpInfo::new("XCHG", 1, 4, ld::xchg);
    t[0xEC] = OpInfo::branch("CPE adr", 3, 17, 11, control::call_cond);
    // 0xED: undocumented, left unimplemented
    t[0xEE] = OpInfo::new("XRI d8", 2, 7, alu::alu_imm);
    t[0xEF] = OpInfo::new("RST 5", 1, 11, control::rst);
    t[0xF0] = OpInfo::branch("RP", 1, 11, 5, control::ret_cond);
    t[0xF1] = OpInfo::new("POP PSW", 1, 10, stack::pop);
    t[0xF2] = OpInfo::new("JP adr", 3, 10, control::jmp_cond);
    t[0xF3] = OpInfo::new("DI", 1, 4, system::di);
    t[0xF4] = OpInfo::branch("CP adr", 3, 17, 11, control::call_cond);
    t[0xF5] = OpInfo::new("PUSH PSW", 1, 11, stack::push);
    t[0xF6] = OpInfo::new("ORI d8", 2, 7, alu::alu_imm);
    t[0xF7] = OpInfo::new("RST 6", 1, 11, control::rst);
    t[0xF8] = OpInfo::branch("RM", 1, 11, 5, control::ret_cond);
    t[0xF9] = OpInfo::new("SPHL", 1, 5, stack::sphl);
    t[0xFA] = OpInfo::new("JM adr", 3, 10, control::jmp_cond);
    t[0xFB] = OpInfo::new("EI", 1, 4, system::ei);
    t[0xFC] = OpInfo::branch("CM adr", 3, 17, 11, control::call_cond);
    // 0xFD: undocumented, left unimplemented
    t[0xFE] = OpInfo::new("CPI d8", 2, 7, alu::alu_imm);
    t[0xFF] = OpInfo::new("RST 7", 1, 11, control::rst);

    t
};
