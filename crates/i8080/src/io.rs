//! Space Invaders cabinet I/O: the player-one input port and the
//! external 16-bit shift register.

use bitflags::bitflags;

/// `IN 1`: credit, start buttons and player-one controls.
pub const PORT_INPUTS: u8 = 1;
/// `OUT 2`: shift amount (low 3 bits).
pub const PORT_SHIFT_OFFSET: u8 = 2;
/// `IN 3`: shifted result.
pub const PORT_SHIFT_RESULT: u8 = 3;
/// `OUT 4`: shift data.
pub const PORT_SHIFT_DATA: u8 = 4;

/// Bit 3 of port 1 always reads as 1 on the cabinet.
const IN1_ALWAYS_ONE: u8 = 1 << 3;

bitflags! {
    /// Logical button and credit state for port 1, supplied by the
    /// frontend once per frame.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InputState: u8 {
        const CREDIT = 1 << 0;
        const P2_START = 1 << 1;
        const P1_START = 1 << 2;
        const P1_SHOOT = 1 << 4;
        const P1_LEFT = 1 << 5;
        const P1_RIGHT = 1 << 6;
    }
}

/// Dedicated shift hardware used by the game to draw sprites at arbitrary
/// bit offsets.
///
/// Each data write pushes a byte in from the top: the old high byte moves
/// to the low byte. A read returns 8 bits of the 16-bit value starting
/// `offset` bits below the top.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ShiftRegister {
    low: u8,
    high: u8,
    offset: u8,
}

impl ShiftRegister {
    pub fn write_data(&mut self, value: u8) {
        self.low = self.high;
        self.high = value;
    }

    /// Only the low 3 bits of the written value are kept.
    pub fn set_offset(&mut self, value: u8) {
        self.offset = value & 0x07;
    }

    pub fn offset(&self) -> u8 {
        self.offset
    }

    pub fn value(&self) -> u16 {
        u16::from_be_bytes([self.high, self.low])
    }

    pub fn read(&self) -> u8 {
        (self.value() >> (8 - self.offset)) as u8
    }
}

/// Port decoding for the cabinet.
#[derive(Clone, Copy, Debug, Default)]
pub struct InvadersIo {
    pub shift: ShiftRegister,
    pub inputs: InputState,
}

impl InvadersIo {
    pub fn read(&self, port: u8) -> u8 {
        match port {
            PORT_INPUTS => IN1_ALWAYS_ONE | self.inputs.bits(),
            PORT_SHIFT_RESULT => self.shift.read(),
            _ => 0,
        }
    }

    /// Unmapped ports (sound latches, watchdog) are ignored.
    pub fn write(&mut self, port: u8, value: u8) {
        match port {
            PORT_SHIFT_OFFSET => self.shift.set_offset(value),
            PORT_SHIFT_DATA => self.shift.write_data(value),
            _ => {}
        }
    }
}
