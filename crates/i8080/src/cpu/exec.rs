//! State-transition functions referenced from the opcode table.
//!
//! Every function has the [`ExecFn`](super::ExecFn) shape and returns the
//! flag set it leaves behind instead of writing it back. Register and
//! condition fields are decoded from the opcode bits, so one function
//! serves a whole opcode family.

pub(super) mod alu;
pub(super) mod control;
pub(super) mod ld;
pub(super) mod stack;
pub(super) mod system;

/// Destination field, bits 3–5.
#[inline]
fn dst_code(opcode: u8) -> u8 {
    (opcode >> 3) & 0x07
}

/// Source field, bits 0–2.
#[inline]
fn src_code(opcode: u8) -> u8 {
    opcode & 0x07
}

/// Register pair field, bits 4–5.
#[inline]
fn pair_code(opcode: u8) -> u8 {
    (opcode >> 4) & 0x03
}
