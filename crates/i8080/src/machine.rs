use crate::cpu::Cpu8080;
use crate::error::Result;
use crate::io::{InputState, InvadersIo};
use crate::memory::{Bus8080, Memory};
use crate::scheduler::{FrameScheduler, SchedulerConfig};
use crate::trace::TraceObserver;

/// Memory and cabinet ports as seen by the CPU.
#[derive(Clone, Default)]
pub struct InvadersBus {
    pub memory: Memory,
    pub io: InvadersIo,
}

impl Bus8080 for InvadersBus {
    fn mem_read(&mut self, addr: u16) -> u8 {
        self.memory.read(addr)
    }

    fn mem_write(&mut self, addr: u16, value: u8) {
        self.memory.write(addr, value);
    }

    fn io_read(&mut self, port: u8) -> u8 {
        self.io.read(port)
    }

    fn io_write(&mut self, port: u8, value: u8) {
        self.io.write(port, value);
    }
}

/// The Space Invaders cabinet: an 8080, its 64 KiB address space, the
/// input and shift-register ports, and the two-interrupt frame timing.
pub struct InvadersMachine {
    cpu: Cpu8080,
    bus: InvadersBus,
    scheduler: FrameScheduler,
}

impl InvadersMachine {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            cpu: Self::power_on_cpu(),
            bus: InvadersBus::default(),
            scheduler: FrameScheduler::new(config),
        }
    }

    /// The cabinet comes up with interrupts enabled.
    fn power_on_cpu() -> Cpu8080 {
        let mut cpu = Cpu8080::new();
        cpu.interrupts_enabled = true;
        cpu
    }

    /// Reset CPU, ports and timing. Memory (ROM and RAM) is preserved.
    pub fn reset(&mut self) {
        self.cpu = Self::power_on_cpu();
        self.bus.io = InvadersIo::default();
        self.scheduler = FrameScheduler::new(self.scheduler.config());
    }

    /// Load the combined game ROM at 0x0000 and point PC at it.
    pub fn load_rom(&mut self, rom: &[u8]) -> usize {
        let loaded = self.bus.memory.load(rom, 0x0000);
        self.cpu.pc = 0x0000;
        log::info!("loaded {loaded} byte arcade ROM");
        loaded
    }

    /// Run one video frame (both interrupts).
    pub fn step_frame(&mut self) -> Result<u32> {
        self.scheduler.run_frame(&mut self.cpu, &mut self.bus, None)
    }

    /// Run one video frame, reporting each step to `observer`.
    pub fn step_frame_traced(&mut self, observer: &mut dyn TraceObserver) -> Result<u32> {
        self.scheduler
            .run_frame(&mut self.cpu, &mut self.bus, Some(observer))
    }

    /// Replace the button state sampled through port 1.
    pub fn set_inputs(&mut self, inputs: InputState) {
        self.bus.io.inputs = inputs;
    }

    pub fn inputs(&self) -> InputState {
        self.bus.io.inputs
    }

    /// The 1bpp frame buffer, column-major and rotated 90 degrees.
    pub fn video_ram(&self) -> &[u8] {
        self.bus.memory.video_ram()
    }

    /// The whole 64 KiB address space.
    pub fn memory_dump(&self) -> &[u8] {
        self.bus.memory.dump()
    }

    pub fn frames(&self) -> u64 {
        self.scheduler.frames()
    }

    pub fn cpu(&self) -> &Cpu8080 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu8080 {
        &mut self.cpu
    }
}

impl Default for InvadersMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{PORT_INPUTS, PORT_SHIFT_RESULT};
    use crate::memory::{VRAM_SIZE, VRAM_START};
    use crate::trace::TraceRecord;

    #[test]
    fn rom_runs_from_zero_with_interrupts_enabled() {
        let mut machine = InvadersMachine::new();
        assert!(machine.cpu().interrupts_enabled);
        // LXI SP,2400; EI; JMP 0004
        let rom = [0x31, 0x00, 0x24, 0xfb, 0xc3, 0x04, 0x00];
        assert_eq!(machine.load_rom(&rom), rom.len());

        // Vector 1 and 2 handlers: store a marker in VRAM, EI, RET.
        // 0008: MVI A,11; STA 2400; EI; RET
        // 0010: MVI A,22; STA 2401; EI; RET
        let mut image = rom.to_vec();
        image.resize(0x18, 0x00);
        image[0x08..0x0f].copy_from_slice(&[0x3e, 0x11, 0x32, 0x00, 0x24, 0xfb, 0xc9]);
        image[0x10..0x17].copy_from_slice(&[0x3e, 0x22, 0x32, 0x01, 0x24, 0xfb, 0xc9]);
        machine.load_rom(&image);

        match machine.step_frame() {
            Ok(cycles) => assert!(cycles >= 33_000),
            Err(err) => panic!("{err}"),
        }
        // Vector 1 handler ran during the frame; vector 2 was delivered
        // at its end and runs at the start of the next one.
        assert_eq!(machine.video_ram()[0], 0x11);
        assert_eq!(machine.video_ram()[1], 0x00);
        assert_eq!(machine.cpu().pc, 0x0010);

        if let Err(err) = machine.step_frame() {
            panic!("{err}");
        }
        assert_eq!(machine.video_ram()[1], 0x22);
        assert_eq!(machine.frames(), 2);
        assert_eq!(machine.video_ram().len(), VRAM_SIZE);
        assert_eq!(machine.memory_dump()[VRAM_START], 0x11);
    }

    #[test]
    fn inputs_and_shift_register_are_visible_on_the_bus() {
        let mut machine = InvadersMachine::new();
        machine.set_inputs(InputState::CREDIT | InputState::P1_SHOOT);
        assert_eq!(machine.bus.io_read(PORT_INPUTS), 0x08 | 0x01 | 0x10);

        // MVI A,FF; OUT 4; MVI A,AA; OUT 4; MVI A,04; OUT 2; IN 3; HLT
        let rom = [
            0x3e, 0xff, 0xd3, 0x04, 0x3e, 0xaa, 0xd3, 0x04, 0x3e, 0x04, 0xd3, 0x02, 0xdb, 0x03,
            0x76,
        ];
        machine.load_rom(&rom);
        // Keep the CPU parked on HLT for the rest of the frame.
        machine.cpu_mut().interrupts_enabled = false;
        let mut records: Vec<TraceRecord> = Vec::new();
        if let Err(err) = machine.step_frame_traced(&mut records) {
            panic!("{err}");
        }
        assert_eq!(records.len(), rom.len() / 2 + 1);
        assert_eq!(machine.cpu().regs.a(), 0xaf);
        assert_eq!(machine.bus.io_read(PORT_SHIFT_RESULT), 0xaf);
    }

    #[test]
    fn reset_keeps_memory() {
        let mut machine = InvadersMachine::new();
        machine.load_rom(&[0x00, 0x00, 0x76]);
        machine.set_inputs(InputState::P1_LEFT);
        machine.cpu_mut().interrupts_enabled = false;
        machine
            .step_frame()
            .unwrap_or_else(|err| panic!("frame failed: {err}"));
        assert!(machine.cpu().halted());
        machine.cpu_mut().pc = 0x1234;
        machine.reset();

        assert_eq!(machine.cpu().pc, 0x0000);
        assert!(machine.cpu().interrupts_enabled);
        assert!(!machine.cpu().halted());
        assert!(machine.inputs().is_empty());
        assert_eq!(machine.memory_dump()[2], 0x76);
        assert_eq!(machine.frames(), 0);
    }
}
