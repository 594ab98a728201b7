/// The seven 8-bit registers, in the order the 3-bit opcode fields encode
/// them (B, C, D, E, H, L, then A in place of code 7; code 6 is memory).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reg {
    B = 0,
    C = 1,
    D = 2,
    E = 3,
    H = 4,
    L = 5,
    A = 6,
}

impl Reg {
    /// Decode a 3-bit register field. Returns `None` for code 6, the memory
    /// operand `M` addressed through HL.
    #[inline]
    pub const fn from_code(code: u8) -> Option<Reg> {
        match code & 0x07 {
            0 => Some(Reg::B),
            1 => Some(Reg::C),
            2 => Some(Reg::D),
            3 => Some(Reg::E),
            4 => Some(Reg::H),
            5 => Some(Reg::L),
            6 => None,
            _ => Some(Reg::A),
        }
    }
}

/// Register pairs usable for indirect addressing and 16-bit loads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegPair {
    BC,
    DE,
    HL,
}

impl RegPair {
    /// Decode the 2-bit pair field (bits 4–5 of the opcode). Code 3 is SP
    /// or PSW depending on the instruction, so it is not a pair here.
    #[inline]
    pub const fn from_code(code: u8) -> Option<RegPair> {
        match code & 0x03 {
            0 => Some(RegPair::BC),
            1 => Some(RegPair::DE),
            2 => Some(RegPair::HL),
            _ => None,
        }
    }

    #[inline]
    const fn halves(self) -> (Reg, Reg) {
        match self {
            RegPair::BC => (Reg::B, Reg::C),
            RegPair::DE => (Reg::D, Reg::E),
            RegPair::HL => (Reg::H, Reg::L),
        }
    }
}

/// General purpose register file.
///
/// PC and SP live on the CPU itself; they are not derived from any pair.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Registers {
    regs: [u8; 7],
}

impl Registers {
    #[inline]
    pub fn get(&self, reg: Reg) -> u8 {
        self.regs[reg as usize]
    }

    #[inline]
    pub fn set(&mut self, reg: Reg, value: u8) {
        self.regs[reg as usize] = value;
    }

    /// Read a pair as `high:low`.
    #[inline]
    pub fn pair(&self, pair: RegPair) -> u16 {
        let (hi, lo) = pair.halves();
        u16::from_be_bytes([self.get(hi), self.get(lo)])
    }

    #[inline]
    pub fn set_pair(&mut self, pair: RegPair, value: u16) {
        let (hi, lo) = pair.halves();
        let [h, l] = value.to_be_bytes();
        self.set(hi, h);
        self.set(lo, l);
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.get(Reg::A)
    }

    #[inline]
    pub fn set_a(&mut self, value: u8) {
        self.set(Reg::A, value);
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        self.pair(RegPair::HL)
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.set_pair(RegPair::HL, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_pack_high_then_low() {
        let mut regs = Registers::default();
        regs.set(Reg::B, 0x12);
        regs.set(Reg::C, 0x34);
        assert_eq!(regs.pair(RegPair::BC), 0x1234);

        regs.set_pair(RegPair::DE, 0xbeef);
        assert_eq!(regs.get(Reg::D), 0xbe);
        assert_eq!(regs.get(Reg::E), 0xef);

        regs.set_hl(0x2400);
        assert_eq!(regs.get(Reg::H), 0x24);
        assert_eq!(regs.get(Reg::L), 0x00);
    }

    #[test]
    fn register_codes_follow_opcode_encoding() {
        assert_eq!(Reg::from_code(0), Some(Reg::B));
        assert_eq!(Reg::from_code(5), Some(Reg::L));
        assert_eq!(Reg::from_code(6), None);
        assert_eq!(Reg::from_code(7), Some(Reg::A));
        assert_eq!(RegPair::from_code(2), Some(RegPair::HL));
        assert_eq!(RegPair::from_code(3), None);
    }
}
