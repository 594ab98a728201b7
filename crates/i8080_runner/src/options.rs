use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use typed_builder::TypedBuilder;

/// Default integer scaling factor for the arcade window.
pub const DEFAULT_SCALE: u32 = 3;
/// Frames run by the arcade mode when no window is opened (10 seconds).
pub const DEFAULT_HEADLESS_FRAMES: u64 = 600;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RunMode {
    /// CP/M CPU exerciser with console output.
    Tst8080,
    /// Diagnostic image with pass/fail addresses.
    Cpudiag,
    /// Space Invaders cabinet.
    #[default]
    Invaders,
}

impl RunMode {
    pub fn default_rom(self) -> &'static str {
        match self {
            RunMode::Tst8080 => "assets/roms/TST8080/TST8080.COM",
            RunMode::Cpudiag => "assets/roms/cpudiag/cpudiag.bin",
            RunMode::Invaders => "assets/roms/invaders/invaders.rom",
        }
    }
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct RunOptions {
    #[builder(default)]
    pub mode: RunMode,
    /// Overrides [`RunMode::default_rom`].
    #[builder(default, setter(strip_option))]
    pub rom_path: Option<PathBuf>,
    /// Log every executed instruction at trace level.
    #[builder(default)]
    pub trace: bool,
    #[builder(default)]
    pub show_fps: bool,
    #[builder(default = DEFAULT_SCALE)]
    pub scale: u32,
    /// Write the 64 KiB address space here after the run.
    #[builder(default, setter(strip_option))]
    pub dump_path: Option<PathBuf>,
    /// Run the arcade mode headless for this many frames.
    #[builder(default, setter(strip_option))]
    pub frames: Option<u64>,
    /// Step limit for the trapped modes.
    #[builder(default, setter(strip_option))]
    pub max_steps: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RunOptions {
    pub fn resolved_rom_path(&self) -> PathBuf {
        self.rom_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.mode.default_rom()))
    }
}

pub const USAGE: &str = "usage: i8080 [-t | -c] [-d] [-f] [-s <scale>] [--dump <path>] \
[--frames <n>] [--steps <n>] [rom]

  -t             run the TST8080 CP/M exerciser
  -c             run the 8080 diagnostic (cpudiag)
                 (default: Space Invaders)
  -d             trace every instruction (RUST_LOG=trace)
  -f             log frames per second
  -s <scale>     window scale factor
  --dump <path>  write memory to <path> after the run
  --frames <n>   run the arcade headless for <n> frames
  --steps <n>    stop the test programs after <n> instructions";

fn value_of<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("missing value for {flag}"))
}

fn number_of<I: Iterator<Item = String>, T: std::str::FromStr>(
    args: &mut I,
    flag: &str,
) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = value_of(args, flag)?;
    value
        .parse()
        .with_context(|| format!("invalid value '{value}' for {flag}"))
}

/// Parse command-line arguments, not including the program name.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<RunOptions> {
    let mut options = RunOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-t" => options.mode = RunMode::Tst8080,
            "-c" => options.mode = RunMode::Cpudiag,
            "-d" => options.trace = true,
            "-f" => options.show_fps = true,
            "-s" => {
                let scale: u32 = number_of(&mut args, "-s")?;
                if scale == 0 {
                    bail!("scale must be at least 1");
                }
                options.scale = scale;
            }
            "--dump" => options.dump_path = Some(PathBuf::from(value_of(&mut args, "--dump")?)),
            "--frames" => options.frames = Some(number_of(&mut args, "--frames")?),
            "--steps" => options.max_steps = Some(number_of(&mut args, "--steps")?),
            flag if flag.starts_with('-') => bail!("unknown option '{flag}'"),
            path => {
                if options.rom_path.is_some() {
                    bail!("more than one ROM path given");
                }
                options.rom_path = Some(PathBuf::from(path));
            }
        }
    }

    Ok(options)
}
