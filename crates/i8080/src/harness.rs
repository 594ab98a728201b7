//! Trap harnesses for the non-interactive workloads.
//!
//! [`CpmConsole`] stands in for the two CP/M BDOS console calls the CPU
//! exercisers use. [`DiagnosticTrap`] watches the pass and fail addresses
//! of the 8080 diagnostic image.

use std::io::Write;

use crate::cpu::{Cpu8080, Reg, RegPair};
use crate::error::Result;
use crate::memory::{Bus8080, FlatBus, MEMORY_SIZE};
use crate::scheduler::{StopReason, Trap, TrapAction};

/// Where CP/M loads transient programs.
pub const CPM_LOAD_ADDRESS: u16 = 0x0100;
/// BDOS entry point; programs `CALL 5` with the function number in C.
pub const BDOS_ENTRY: u16 = 0x0005;
/// Jumping here is a warm boot, i.e. program exit.
pub const WARM_BOOT: u16 = 0x0000;

const BDOS_PRINT_CHAR: u8 = 2;
const BDOS_PRINT_STRING: u8 = 9;
const STRING_TERMINATOR: u8 = b'$';

const OP_HLT: u8 = 0x76;
const OP_RET: u8 = 0xc9;

/// Load a CP/M program and prepare the zero page.
///
/// A `HLT` at the warm-boot address backs up the trap, and a `RET` at the
/// BDOS entry returns to the caller once the trap has printed. Returns the
/// number of bytes loaded.
pub fn load_cpm_program(cpu: &mut Cpu8080, bus: &mut FlatBus, program: &[u8]) -> usize {
    bus.memory.write(WARM_BOOT, OP_HLT);
    bus.memory.write(BDOS_ENTRY, OP_RET);
    let loaded = bus.memory.load(program, CPM_LOAD_ADDRESS);
    cpu.pc = CPM_LOAD_ADDRESS;
    log::info!("loaded {loaded} byte CP/M program at {CPM_LOAD_ADDRESS:04X}");
    loaded
}

/// BDOS console emulation writing guest output to `W`.
pub struct CpmConsole<W: Write> {
    out: W,
    calls: u64,
}

impl<W: Write> CpmConsole<W> {
    pub fn new(out: W) -> Self {
        Self { out, calls: 0 }
    }

    /// Number of BDOS calls serviced so far.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bdos(&mut self, cpu: &Cpu8080, bus: &mut dyn Bus8080) -> Result<()> {
        self.calls += 1;
        match cpu.regs.get(Reg::C) {
            BDOS_PRINT_CHAR => {
                let ch = cpu.regs.get(Reg::E);
                self.out.write_all(&[ch])?;
            }
            BDOS_PRINT_STRING => {
                let mut addr = cpu.regs.pair(RegPair::DE);
                let mut text = Vec::new();
                // Bounded so a missing terminator cannot spin forever.
                for _ in 0..MEMORY_SIZE {
                    let byte = bus.mem_read(addr);
                    if byte == STRING_TERMINATOR {
                        break;
                    }
                    text.push(byte);
                    addr = addr.wrapping_add(1);
                }
                self.out.write_all(&text)?;
            }
            function => log::debug!("ignoring BDOS function {function}"),
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Trap for CpmConsole<W> {
    fn before_step(&mut self, cpu: &mut Cpu8080, bus: &mut dyn Bus8080) -> Result<TrapAction> {
        match cpu.pc {
            WARM_BOOT => {
                log::debug!("warm boot after {} BDOS calls", self.calls);
                Ok(TrapAction::Stop(StopReason::WarmBoot))
            }
            BDOS_ENTRY => {
                self.bdos(cpu, bus)?;
                Ok(TrapAction::Continue)
            }
            _ => Ok(TrapAction::Continue),
        }
    }
}

/// Load address of the diagnostic image.
pub const DIAGNOSTIC_LOAD_ADDRESS: u16 = 0x0100;
/// The diagnostic jumps here after its final check succeeds.
pub const DIAGNOSTIC_PASS: u16 = 0x069b;
/// Every failed check ends up here.
pub const DIAGNOSTIC_FAIL: u16 = 0x0689;

/// Load the diagnostic image. Execution starts at 0x0000 and runs through
/// the empty zero page into the image.
pub fn load_diagnostic(cpu: &mut Cpu8080, bus: &mut FlatBus, image: &[u8]) -> usize {
    let loaded = bus.memory.load(image, DIAGNOSTIC_LOAD_ADDRESS);
    cpu.pc = 0x0000;
    log::info!("loaded {loaded} byte diagnostic at {DIAGNOSTIC_LOAD_ADDRESS:04X}");
    loaded
}

/// Stops the run at the diagnostic's pass or fail address.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticTrap {
    pub pass: u16,
    pub fail: u16,
}

impl Default for DiagnosticTrap {
    fn default() -> Self {
        Self {
            pass: DIAGNOSTIC_PASS,
            fail: DIAGNOSTIC_FAIL,
        }
    }
}

impl Trap for DiagnosticTrap {
    fn before_step(&mut self, cpu: &mut Cpu8080, _bus: &mut dyn Bus8080) -> Result<TrapAction> {
        if cpu.pc == self.fail {
            // The diagnostic pushes the address of the failing check first.
            log::debug!("diagnostic failed, sp={:04X}", cpu.sp);
            Ok(TrapAction::Stop(StopReason::Failed))
        } else if cpu.pc == self.pass {
            Ok(TrapAction::Stop(StopReason::Passed))
        } else {
            Ok(TrapAction::Continue)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{run_with_trap, RunReport};
    use std::path::PathBuf;

    fn run_diagnostic(image: &[u8], max_steps: Option<u64>) -> RunReport {
        let mut cpu = Cpu8080::new();
        let mut bus = FlatBus::new();
        load_diagnostic(&mut cpu, &mut bus, image);
        match run_with_trap(&mut cpu, &mut bus, &mut DiagnosticTrap::default(), None, max_steps) {
            Ok(report) => report,
            Err(err) => panic!("diagnostic run failed: {err}"),
        }
    }

    /// A miniature diagnostic: checks DAA and a CALL/RET round trip, then
    /// branches to the pass or fail address.
    fn mini_diagnostic(expected_daa: u8) -> Vec<u8> {
        let mut image = vec![
            0x3e, 0x9b, // MVI A,9B
            0x27, // DAA
            0xd2, 0x89, 0x06, // JNC fail
            0xfe, expected_daa, // CPI expected
            0xc2, 0x89, 0x06, // JNZ fail
            0x31, 0x00, 0x24, // LXI SP,2400
            0xcd, 0x20, 0x01, // CALL 0120
            0xfe, 0x42, // CPI 42
            0xca, 0x9b, 0x06, // JZ pass
            0xc3, 0x89, 0x06, // JMP fail
        ];
        image.resize(0x20, 0x00);
        image.extend_from_slice(&[
            0x3e, 0x42, // MVI A,42
            0xc9, // RET
        ]);
        image
    }

    #[test]
    fn synthetic_diagnostic_passes() {
        let report = run_diagnostic(&mini_diagnostic(0x01), None);
        assert_eq!(report.reason, StopReason::Passed);
        assert_eq!(report.pc, DIAGNOSTIC_PASS);
        // 256 NOPs through the zero page, then the program itself.
        assert_eq!(report.steps, 256 + 11);
    }

    #[test]
    fn synthetic_diagnostic_reports_failure() {
        let report = run_diagnostic(&mini_diagnostic(0x02), None);
        assert_eq!(report.reason, StopReason::Failed);
        assert_eq!(report.pc, DIAGNOSTIC_FAIL);
    }

    #[test]
    fn console_prints_strings_and_characters() {
        let program = [
            0x0e, 0x09, // MVI C,9
            0x11, 0x12, 0x01, // LXI D,0112
            0xcd, 0x05, 0x00, // CALL 5
            0x0e, 0x02, // MVI C,2
            0x1e, b'!', // MVI E,'!'
            0xcd, 0x05, 0x00, // CALL 5
            0xc3, 0x00, 0x00, // JMP 0
            b'O', b'K', b'$',
        ];
        let mut cpu = Cpu8080::new();
        let mut bus = FlatBus::new();
        cpu.sp = 0xf000;
        assert_eq!(load_cpm_program(&mut cpu, &mut bus, &program), program.len());
        assert_eq!(bus.memory.read(WARM_BOOT), OP_HLT);
        assert_eq!(bus.memory.read(BDOS_ENTRY), OP_RET);

        let mut console = CpmConsole::new(Vec::new());
        let report = match run_with_trap(&mut cpu, &mut bus, &mut console, None, Some(1_000)) {
            Ok(report) => report,
            Err(err) => panic!("{err}"),
        };
        assert_eq!(report.reason, StopReason::WarmBoot);
        assert_eq!(console.calls(), 2);
        assert_eq!(console.into_inner(), b"OK!".to_vec());
        assert_eq!(cpu.sp, 0xf000);
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn rom_path(relative: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../assets/roms")
            .join(relative)
    }

    #[test]
    #[ignore]
    fn cpudiag_rom_passes() {
        init_logging();
        let path = rom_path("cpudiag/cpudiag.bin");
        let image = std::fs::read(&path)
            .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
        let report = run_diagnostic(&image, Some(10_000_000));
        assert_eq!(report.reason, StopReason::Passed, "stopped at {:04X}", report.pc);
    }

    #[test]
    #[ignore]
    fn tst8080_rom_reports_operational() {
        init_logging();
        let path = rom_path("TST8080/TST8080.COM");
        let program = std::fs::read(&path)
            .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));

        let mut cpu = Cpu8080::new();
        let mut bus = FlatBus::new();
        load_cpm_program(&mut cpu, &mut bus, &program);
        let mut console = CpmConsole::new(Vec::new());
        let report = run_with_trap(&mut cpu, &mut bus, &mut console, None, Some(10_000_000))
            .unwrap_or_else(|err| panic!("{err}"));
        let output = String::from_utf8_lossy(&console.into_inner()).into_owned();

        assert_eq!(report.reason, StopReason::WarmBoot, "{output}");
        assert!(output.contains("CPU IS OPERATIONAL"), "{output}");
    }
}
