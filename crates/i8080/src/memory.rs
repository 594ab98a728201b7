/// Total addressable memory size (64 KiB).
pub const MEMORY_SIZE: usize = 0x10000;

/// Start of video RAM used by Space Invaders.
///
/// The cabinet maps the frame buffer at 0x2400..0x3fff.
pub const VRAM_START: usize = 0x2400;
/// Size of video RAM in bytes (0x1c00 = 7168 bytes = 224x256 bits).
pub const VRAM_SIZE: usize = 0x1c00;

/// Simple bus interface for an Intel 8080-compatible CPU core.
///
/// The CPU uses this trait to access memory and IO ports without knowing
/// anything about the concrete machine behind it.
pub trait Bus8080 {
    fn mem_read(&mut self, addr: u16) -> u8;
    fn mem_write(&mut self, addr: u16, value: u8);

    fn io_read(&mut self, port: u8) -> u8;
    fn io_write(&mut self, port: u8, value: u8);
}

/// Flat 64 KiB store with no protection.
///
/// The cabinet's split into ROM (0x0000), work RAM (0x2000), video RAM
/// (0x2400) and the mirror above 0x4000 is advisory only: every address is
/// readable and writable.
#[derive(Clone)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize] = value;
    }

    /// Copy `data` into memory starting at `base`, stopping at the top of
    /// the address space. Returns the number of bytes written.
    pub fn load(&mut self, data: &[u8], base: u16) -> usize {
        let start = base as usize;
        let len = data.len().min(MEMORY_SIZE - start);
        self.bytes[start..start + len].copy_from_slice(&data[..len]);
        len
    }

    /// The whole address space, verbatim.
    pub fn dump(&self) -> &[u8] {
        &self.bytes
    }

    /// The 1bpp frame buffer read by the display.
    pub fn video_ram(&self) -> &[u8] {
        &self.bytes[VRAM_START..VRAM_START + VRAM_SIZE]
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

/// Bus with plain memory and no peripherals: reads from any port return 0
/// and writes are dropped. Used by the CP/M and diagnostic harnesses.
#[derive(Clone, Default)]
pub struct FlatBus {
    pub memory: Memory,
}

impl FlatBus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Bus8080 for FlatBus {
    fn mem_read(&mut self, addr: u16) -> u8 {
        self.memory.read(addr)
    }

    fn mem_write(&mut self, addr: u16, value: u8) {
        self.memory.write(addr, value);
    }

    fn io_read(&mut self, _port: u8) -> u8 {
        0
    }

    fn io_write(&mut self, _port: u8, _value: u8) {}
}
