//! Execution drivers.
//!
//! [`FrameScheduler`] runs the arcade timing model: two interrupts per
//! video frame, RST 1 at mid-frame and RST 2 at the end. [`run_with_trap`]
//! runs a program under a [`Trap`] harness that may intercept fixed
//! addresses before each instruction. Neither leaks into
//! [`Cpu8080::step`], which stays unaware of how it is being driven.

use crate::cpu::{Cpu8080, Step};
use crate::error::Result;
use crate::memory::Bus8080;
use crate::trace::{TraceObserver, TraceRecord};

/// Nominal cycles per 60 Hz frame at the cabinet's 2 MHz clock.
pub const DEFAULT_CYCLES_PER_FRAME: u32 = 33_000;

/// Mid-frame interrupt (vector 1, address 0x0008).
pub const MID_FRAME_VECTOR: u8 = 1;
/// End-of-frame interrupt (vector 2, address 0x0010).
pub const END_FRAME_VECTOR: u8 = 2;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SchedulerConfig {
    pub cycles_per_frame: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cycles_per_frame: DEFAULT_CYCLES_PER_FRAME,
        }
    }
}

/// Run one step and hand the result to the observer, if any.
fn step_observed(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    observer: &mut Option<&mut dyn TraceObserver>,
) -> Result<Step> {
    let step = cpu.step(bus)?;
    if let (Some(observer), Some(instr)) = (observer.as_deref_mut(), step.instruction) {
        observer.on_step(&TraceRecord::capture(cpu, instr, step.cycles));
    }
    Ok(step)
}

/// Frame-based driver for the interactive workload.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameScheduler {
    config: SchedulerConfig,
    frames: u64,
    total_cycles: u64,
}

impl FrameScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            frames: 0,
            total_cycles: 0,
        }
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Completed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Run one frame and return the cycles it took.
    ///
    /// Steps until half the budget is spent and requests the mid-frame
    /// interrupt, then steps to the full budget and requests the
    /// end-of-frame interrupt. Each checkpoint fires once per frame; the
    /// counter restarts at zero for the next frame. A masked request is
    /// simply dropped by the CPU.
    pub fn run_frame(
        &mut self,
        cpu: &mut Cpu8080,
        bus: &mut dyn Bus8080,
        mut observer: Option<&mut dyn TraceObserver>,
    ) -> Result<u32> {
        let full = self.config.cycles_per_frame;
        let half = full / 2;
        let mut cycles: u32 = 0;

        while cycles < half {
            cycles = cycles.saturating_add(step_observed(cpu, bus, &mut observer)?.cycles);
        }
        cpu.interrupt(bus, MID_FRAME_VECTOR);

        while cycles < full {
            cycles = cycles.saturating_add(step_observed(cpu, bus, &mut observer)?.cycles);
        }
        cpu.interrupt(bus, END_FRAME_VECTOR);

        self.frames += 1;
        self.total_cycles += u64::from(cycles);
        Ok(cycles)
    }
}

/// Why a trapped run ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StopReason {
    /// The diagnostic reached its success address.
    Passed,
    /// The diagnostic reached its failure address.
    Failed,
    /// A CP/M program jumped to 0x0000.
    WarmBoot,
    /// The guest executed HLT.
    Halted,
    /// The configured step limit ran out.
    StepLimit,
}

/// What a trap wants the driver to do with the instruction at PC.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrapAction {
    Continue,
    Stop(StopReason),
}

/// Interceptor consulted before every instruction of a trapped run.
///
/// A trap may inspect or modify any state (e.g. emulate an operating
/// system call) and then let the instruction at PC run, or end the run.
pub trait Trap {
    fn before_step(&mut self, cpu: &mut Cpu8080, bus: &mut dyn Bus8080) -> Result<TrapAction>;
}

/// Outcome of [`run_with_trap`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RunReport {
    pub reason: StopReason,
    pub steps: u64,
    pub cycles: u64,
    /// Program counter when the run stopped.
    pub pc: u16,
}

/// Step until the trap stops the run, the CPU halts, or `max_steps`
/// instructions have executed.
pub fn run_with_trap(
    cpu: &mut Cpu8080,
    bus: &mut dyn Bus8080,
    trap: &mut dyn Trap,
    mut observer: Option<&mut dyn TraceObserver>,
    max_steps: Option<u64>,
) -> Result<RunReport> {
    let mut steps: u64 = 0;
    let mut cycles: u64 = 0;

    let reason = loop {
        if let TrapAction::Stop(reason) = trap.before_step(cpu, bus)? {
            break reason;
        }
        if max_steps.is_some_and(|max| steps >= max) {
            break StopReason::StepLimit;
        }

        let step = step_observed(cpu, bus, &mut observer)?;
        steps += 1;
        cycles += u64::from(step.cycles);

        if cpu.halted() {
            break StopReason::Halted;
        }
    };

    log::debug!("run stopped: {reason:?} after {steps} steps, {cycles} cycles");
    Ok(RunReport {
        reason,
        steps,
        cycles,
        pc: cpu.pc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::memory::FlatBus;
    use crate::trace::TraceRecord;

    /// EI then spin in place: `JMP 0001`.
    fn spinning_program(bus: &mut FlatBus) {
        bus.memory.load(&[0xfb, 0xc3, 0x01, 0x00], 0x0000);
        // Interrupt handlers: EI; RET.
        bus.memory.load(&[0xfb, 0xc9], 0x0008);
        bus.memory.load(&[0xfb, 0xc9], 0x0010);
    }

    #[test]
    fn frame_fires_both_vectors_in_order() {
        let mut bus = FlatBus::new();
        spinning_program(&mut bus);
        let mut cpu = Cpu8080::new();
        cpu.sp = 0x2400;

        let mut records: Vec<TraceRecord> = Vec::new();
        let mut scheduler = FrameScheduler::new(SchedulerConfig {
            cycles_per_frame: 100,
        });
        let cycles = match scheduler.run_frame(&mut cpu, &mut bus, Some(&mut records)) {
            Ok(cycles) => cycles,
            Err(err) => panic!("{err}"),
        };

        assert!(cycles >= 100 && cycles < 100 + 17);
        assert_eq!(scheduler.frames(), 1);

        let visits: Vec<u16> = records
            .iter()
            .map(|r| r.instruction.pc)
            .filter(|&pc| pc == 0x0008 || pc == 0x0010)
            .collect();
        assert_eq!(visits, vec![0x0008]);

        // The end-of-frame interrupt was delivered last: PC sits on its
        // handler and interrupts are masked until its EI runs.
        assert_eq!(cpu.pc, 0x0010);
        assert!(!cpu.interrupts_enabled);
    }

    #[test]
    fn masked_checkpoints_do_not_fire() {
        let mut bus = FlatBus::new();
        // Spin forever with interrupts disabled.
        bus.memory.load(&[0xc3, 0x00, 0x00], 0x0000);
        let mut cpu = Cpu8080::new();
        cpu.sp = 0x2400;

        let mut scheduler = FrameScheduler::default();
        assert_eq!(scheduler.config().cycles_per_frame, DEFAULT_CYCLES_PER_FRAME);
        for _ in 0..3 {
            if let Err(err) = scheduler.run_frame(&mut cpu, &mut bus, None) {
                panic!("{err}");
            }
        }
        assert_eq!(cpu.sp, 0x2400);
        assert_eq!(scheduler.frames(), 3);
        assert!(scheduler.total_cycles() >= 3 * u64::from(DEFAULT_CYCLES_PER_FRAME));
    }

    #[test]
    fn frame_propagates_unimplemented_opcodes() {
        let mut bus = FlatBus::new();
        bus.memory.write(0x0003, 0xed);
        let mut cpu = Cpu8080::new();
        let mut scheduler = FrameScheduler::default();
        match scheduler.run_frame(&mut cpu, &mut bus, None) {
            Err(Error::UnimplementedOpcode { opcode: 0xed, pc: 0x0003 }) => {}
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(scheduler.frames(), 0);
    }

    struct StopAt(u16);

    impl Trap for StopAt {
        fn before_step(&mut self, cpu: &mut Cpu8080, _bus: &mut dyn Bus8080) -> Result<TrapAction> {
            if cpu.pc == self.0 {
                Ok(TrapAction::Stop(StopReason::Passed))
            } else {
                Ok(TrapAction::Continue)
            }
        }
    }

    #[test]
    fn trap_runs_before_the_instruction() {
        let mut bus = FlatBus::new();
        // NOP; NOP; DB ED (never executed)
        bus.memory.load(&[0x00, 0x00, 0xed], 0x0000);
        let mut cpu = Cpu8080::new();
        let report = match run_with_trap(&mut cpu, &mut bus, &mut StopAt(0x0002), None, None) {
            Ok(report) => report,
            Err(err) => panic!("{err}"),
        };
        assert_eq!(report.reason, StopReason::Passed);
        assert_eq!(report.steps, 2);
        assert_eq!(report.cycles, 8);
        assert_eq!(report.pc, 0x0002);
    }

    #[test]
    fn halt_and_step_limit_end_the_run() {
        let mut bus = FlatBus::new();
        bus.memory.load(&[0x00, 0x76], 0x0000);
        let mut cpu = Cpu8080::new();
        let report = run_with_trap(&mut cpu, &mut bus, &mut StopAt(0xffff), None, None);
        assert!(matches!(
            report,
            Ok(RunReport {
                reason: StopReason::Halted,
                steps: 2,
                cycles: 11,
                pc: 0x0002,
            })
        ));

        let mut bus = FlatBus::new();
        bus.memory.load(&[0xc3, 0x00, 0x00], 0x0000);
        let mut cpu = Cpu8080::new();
        let report = run_with_trap(&mut cpu, &mut bus, &mut StopAt(0xffff), None, Some(5));
        assert!(matches!(
            report,
            Ok(RunReport {
                reason: StopReason::StepLimit,
                steps: 5,
                cycles: 50,
                ..
            })
        ));
    }
}
