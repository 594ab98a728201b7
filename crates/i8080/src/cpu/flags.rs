//! Status flags and the rules that derive them.
//!
//! Every helper takes the previous [`Flags`] by value and returns the new
//! set, so each instruction states exactly which flags it touches.

const PSW_CARRY: u8 = 0x01;
const PSW_ALWAYS_ONE: u8 = 0x02;
const PSW_PARITY: u8 = 0x04;
const PSW_AUX_CARRY: u8 = 0x10;
const PSW_ZERO: u8 = 0x40;
const PSW_SIGN: u8 = 0x80;

/// CPU flags for Intel 8080.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Flags {
    pub zero: bool,
    pub sign: bool,
    /// Set when the result has an even number of one bits.
    pub parity: bool,
    pub carry: bool,
    pub aux_carry: bool,
}

impl Flags {
    /// Recompute Z, S and P from `value`; carry and aux carry are kept.
    #[inline]
    pub fn szp(self, value: u8) -> Self {
        Self {
            zero: value == 0,
            sign: value & 0x80 != 0,
            parity: value.count_ones() % 2 == 0,
            ..self
        }
    }

    /// Derive all five flags from the raw (unwrapped) result of an 8-bit
    /// arithmetic or logical operation.
    ///
    /// Carry is set when the intermediate falls outside 0..=255, and aux
    /// carry mirrors carry.
    #[inline]
    pub fn arith(self, raw: i16) -> Self {
        let carry = !(0..=0xff).contains(&raw);
        Self {
            carry,
            aux_carry: carry,
            ..self.szp(raw as u8)
        }
    }

    /// Carry out of a 16-bit add; Z, S, P and aux carry are kept.
    #[inline]
    pub fn carry16(self, sum: u32) -> Self {
        Self {
            carry: sum > 0xffff,
            ..self
        }
    }

    #[inline]
    pub fn with_carry(self, carry: bool) -> Self {
        Self { carry, ..self }
    }

    /// Pack into the PSW flag byte: bit 1 is always set, bits 3 and 5
    /// always clear.
    pub fn to_psw(self) -> u8 {
        let mut f = PSW_ALWAYS_ONE;
        if self.carry {
            f |= PSW_CARRY;
        }
        if self.parity {
            f |= PSW_PARITY;
        }
        if self.aux_carry {
            f |= PSW_AUX_CARRY;
        }
        if self.zero {
            f |= PSW_ZERO;
        }
        if self.sign {
            f |= PSW_SIGN;
        }
        f
    }

    pub fn from_psw(v: u8) -> Self {
        Self {
            zero: v & PSW_ZERO != 0,
            sign: v & PSW_SIGN != 0,
            parity: v & PSW_PARITY != 0,
            carry: v & PSW_CARRY != 0,
            aux_carry: v & PSW_AUX_CARRY != 0,
        }
    }
}

/// Branch conditions encoded in bits 3–5 of conditional jump, call and
/// return opcodes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Condition {
    NotZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Condition {
    #[inline]
    pub const fn from_opcode(opcode: u8) -> Self {
        match (opcode >> 3) & 0x07 {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NoCarry,
            3 => Condition::Carry,
            4 => Condition::ParityOdd,
            5 => Condition::ParityEven,
            6 => Condition::Plus,
            _ => Condition::Minus,
        }
    }

    /// Compare the named flag against the expected value.
    #[inline]
    pub fn holds(self, flags: Flags) -> bool {
        let (flag, expected) = match self {
            Condition::NotZero => (flags.zero, false),
            Condition::Zero => (flags.zero, true),
            Condition::NoCarry => (flags.carry, false),
            Condition::Carry => (flags.carry, true),
            Condition::ParityOdd => (flags.parity, false),
            Condition::ParityEven => (flags.parity, true),
            Condition::Plus => (flags.sign, false),
            Condition::Minus => (flags.sign, true),
        };
        flag == expected
    }
}

/// Decimal adjust of the accumulator.
///
/// Stage one adds 6 when the low nibble is above 9 or aux carry is set,
/// and aux carry becomes the carry out of the low nibble. Stage two adds
/// 0x60 when the (possibly updated) high nibble is above 9 or carry is
/// set, and forces carry. Z, S and P come from the final value.
pub fn daa(a: u8, flags: Flags) -> (u8, Flags) {
    let mut value = a;
    let mut out = flags;

    if value & 0x0f > 9 || flags.aux_carry {
        out.aux_carry = (value & 0x0f) + 0x06 > 0x0f;
        value = value.wrapping_add(0x06);
    } else {
        out.aux_carry = false;
    }

    if value >> 4 > 9 || flags.carry {
        value = value.wrapping_add(0x60);
        out.carry = true;
    }

    (value, out.szp(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn szp_leaves_carry_pair_alone() {
        let flags = Flags {
            carry: true,
            aux_carry: true,
            ..Flags::default()
        };
        let out = flags.szp(0x00);
        assert!(out.zero && out.parity && !out.sign);
        assert!(out.carry && out.aux_carry);

        let out = flags.szp(0x81);
        assert!(!out.zero && out.sign && out.parity);
        let out = flags.szp(0x01);
        assert!(!out.parity);
    }

    #[test]
    fn arith_carry_from_raw_range() {
        let base = Flags::default();
        let out = base.arith(0x100);
        assert!(out.carry && out.aux_carry && out.zero);

        let out = base.arith(-1);
        assert!(out.carry && out.sign);
        assert!(!out.zero);

        let out = base.arith(0xff);
        assert!(!out.carry && !out.aux_carry && out.sign && out.parity);
    }

    #[test]
    fn carry16_only_touches_carry() {
        let flags = Flags {
            zero: true,
            sign: true,
            ..Flags::default()
        };
        let out = flags.carry16(0x1_0000);
        assert!(out.carry && out.zero && out.sign);
        assert!(!flags.carry16(0xffff).carry);
    }

    #[test]
    fn psw_forced_bits() {
        assert_eq!(Flags::default().to_psw(), 0x02);
        let all = Flags {
            zero: true,
            sign: true,
            parity: true,
            carry: true,
            aux_carry: true,
        };
        assert_eq!(all.to_psw(), 0xd7);
        assert_eq!(Flags::from_psw(0xff), all);
        assert_eq!(Flags::from_psw(0x28), Flags::default());
    }

    #[test]
    fn daa_adjusts_both_nibbles() {
        let (a, f) = daa(0x9b, Flags::default());
        assert_eq!(a, 0x01);
        assert!(f.carry);
        assert!(f.aux_carry);
        assert!(!f.zero);
        assert!(!f.parity);

        // Stage one wraps within the byte; the wrap is not a carry.
        let (a, f) = daa(0xfa, Flags::default());
        assert_eq!(a, 0x00);
        assert!(!f.carry);
        assert!(f.aux_carry && f.zero);
    }

    #[test]
    fn daa_uses_incoming_carries() {
        let (a, f) = daa(0x12, Flags::default());
        assert_eq!(a, 0x12);
        assert!(!f.carry && !f.aux_carry);

        let flags = Flags {
            aux_carry: true,
            ..Flags::default()
        };
        let (a, f) = daa(0x41, flags);
        assert_eq!(a, 0x47);
        assert!(!f.carry);

        let flags = Flags {
            carry: true,
            ..Flags::default()
        };
        let (a, f) = daa(0x15, flags);
        assert_eq!(a, 0x75);
        assert!(f.carry);
    }

    #[test]
    fn conditions_decode_from_opcode_bits() {
        let zero = Flags {
            zero: true,
            ..Flags::default()
        };
        assert_eq!(Condition::from_opcode(0xc2), Condition::NotZero);
        assert_eq!(Condition::from_opcode(0xca), Condition::Zero);
        assert_eq!(Condition::from_opcode(0xfc), Condition::Minus);
        assert!(Condition::Zero.holds(zero));
        assert!(!Condition::NotZero.holds(zero));
        assert!(Condition::Plus.holds(zero));
        assert!(Condition::ParityOdd.holds(zero));
    }
}
