//! Run-mode glue for the `i8080` binary.

use std::path::Path;

use anyhow::{bail, Context, Result};
use i8080::harness::{load_cpm_program, load_diagnostic, CpmConsole, DiagnosticTrap};
use i8080::scheduler::{run_with_trap, RunReport, StopReason, Trap};
use i8080::trace::{LogTracer, TraceObserver};
use i8080::{Cpu8080, FlatBus, InvadersMachine};

pub mod app;
pub mod options;

pub use app::InvadersApp;
pub use options::{parse_args, RunMode, RunOptions, USAGE};

/// Load the ROM selected by `options` and run it to completion.
pub fn run(options: &RunOptions) -> Result<()> {
    let path = options.resolved_rom_path();
    let rom = std::fs::read(&path)
        .with_context(|| format!("failed to read ROM '{}'", path.display()))?;
    log::info!("{:?}: {} bytes from '{}'", options.mode, rom.len(), path.display());

    match options.mode {
        RunMode::Tst8080 => run_tst8080(options, &rom),
        RunMode::Cpudiag => run_cpudiag(options, &rom),
        RunMode::Invaders => run_invaders(options, &rom),
    }
}

fn run_trapped(
    options: &RunOptions,
    cpu: &mut Cpu8080,
    bus: &mut FlatBus,
    trap: &mut dyn Trap,
) -> Result<RunReport> {
    let mut tracer = LogTracer;
    let observer: Option<&mut dyn TraceObserver> = if options.trace {
        Some(&mut tracer)
    } else {
        None
    };
    let report = run_with_trap(cpu, bus, trap, observer, options.max_steps);

    // Dump whatever state the guest reached, even if it faulted.
    if let Some(dump_path) = &options.dump_path {
        write_dump(dump_path, bus.memory.dump())?;
    }

    let report = report.with_context(|| format!("{:?} aborted", options.mode))?;
    log::info!(
        "{:?} stopped ({:?}) at {:04X} after {} steps, {} cycles",
        options.mode,
        report.reason,
        report.pc,
        report.steps,
        report.cycles
    );
    Ok(report)
}

fn run_tst8080(options: &RunOptions, program: &[u8]) -> Result<()> {
    let mut cpu = Cpu8080::new();
    let mut bus = FlatBus::new();
    load_cpm_program(&mut cpu, &mut bus, program);

    let mut console = CpmConsole::new(std::io::stdout());
    let report = run_trapped(options, &mut cpu, &mut bus, &mut console)?;
    println!();

    match report.reason {
        StopReason::WarmBoot => Ok(()),
        reason => bail!("TST8080 did not return to CP/M: {reason:?} at {:04X}", report.pc),
    }
}

fn run_cpudiag(options: &RunOptions, image: &[u8]) -> Result<()> {
    let mut cpu = Cpu8080::new();
    let mut bus = FlatBus::new();
    load_diagnostic(&mut cpu, &mut bus, image);

    let report = run_trapped(options, &mut cpu, &mut bus, &mut DiagnosticTrap::default())?;
    match report.reason {
        StopReason::Passed => {
            println!("CPU IS OPERATIONAL");
            Ok(())
        }
        StopReason::Failed => {
            // The failing check's return address sits on top of the stack.
            let lo = bus.memory.read(cpu.sp);
            let hi = bus.memory.read(cpu.sp.wrapping_add(1));
            bail!(
                "CPU HAS FAILED, error near {:04X}",
                u16::from_le_bytes([lo, hi]).wrapping_sub(3)
            )
        }
        reason => bail!("cpudiag stopped early: {reason:?} at {:04X}", report.pc),
    }
}

fn run_invaders(options: &RunOptions, rom: &[u8]) -> Result<()> {
    let mut machine = InvadersMachine::new();
    machine.load_rom(rom);
    let app = InvadersApp::new(machine)
        .with_scale(options.scale)
        .with_trace(options.trace)
        .with_fps(options.show_fps);

    match options.frames {
        Some(frames) => run_headless(options, app, frames),
        None => run_windowed(options, app),
    }
}

fn run_headless(options: &RunOptions, mut app: InvadersApp, frames: u64) -> Result<()> {
    let mut cycles: u64 = 0;
    let result = (0..frames).try_for_each(|_| {
        cycles += u64::from(app.run_frame()?);
        Ok::<_, i8080::Error>(())
    });

    if let Some(dump_path) = &options.dump_path {
        write_dump(dump_path, app.machine.memory_dump())?;
    }
    result.with_context(|| format!("arcade aborted in frame {}", app.machine.frames()))?;
    log::info!("ran {} frames, {cycles} cycles", app.machine.frames());
    Ok(())
}

#[cfg(feature = "sdl")]
fn run_windowed(options: &RunOptions, app: InvadersApp) -> Result<()> {
    use i8080_common::app::App;
    use i8080_sdl2::{SdlContext, SdlInitInfo};

    if options.dump_path.is_some() {
        log::warn!("--dump is only honoured for headless runs (--frames)");
    }
    let init_info = SdlInitInfo::builder()
        .width(app.width())
        .height(app.height())
        .scale(app.scale())
        .title(app.title())
        .build();
    SdlContext::run(init_info, app)
}

#[cfg(not(feature = "sdl"))]
fn run_windowed(options: &RunOptions, app: InvadersApp) -> Result<()> {
    log::warn!(
        "built without the `sdl` feature; running {} frames headless",
        crate::options::DEFAULT_HEADLESS_FRAMES
    );
    run_headless(options, app, crate::options::DEFAULT_HEADLESS_FRAMES)
}

/// Write the full address space to `path`.
pub fn write_dump(path: &Path, memory: &[u8]) -> Result<()> {
    std::fs::write(path, memory)
        .with_context(|| format!("failed to write memory dump '{}'", path.display()))?;
    log::info!("wrote {} byte memory dump to '{}'", memory.len(), path.display());
    Ok(())
}
