//! Intel 8080 emulation core.
//!
//! The crate is split the way the hardware is: a flat [`memory::Memory`]
//! behind the [`memory::Bus8080`] trait, the [`cpu::Cpu8080`] register file
//! and opcode table, the Space Invaders [`io`] ports, and a [`scheduler`]
//! that drives stepping either frame by frame (arcade) or under a trap
//! [`harness`] (CP/M test programs and the 8080 diagnostic).

pub mod cpu;
pub mod error;
pub mod harness;
pub mod io;
pub mod machine;
pub mod memory;
pub mod scheduler;
pub mod trace;

pub use cpu::Cpu8080;
pub use error::{Error, Result};
pub use machine::InvadersMachine;
pub use memory::{Bus8080, FlatBus, Memory};

/// Logical screen width in pixels (Space Invaders is 224x256, rotated).
pub const SCREEN_WIDTH: usize = 224;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 256;
