use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use coziboy_cpu::{Cpu, CpuConfig, CpuError, FlatMemory, CYCLES_PER_FRAME};
use thiserror::Error;
use typed_builder::TypedBuilder;

/// Frame budget when `COZIBOY_FRAMES` is not set.
pub const DEFAULT_FRAMES: u32 = 60;

/// Command-line problems detected before anything is emulated.
#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("Usage: coziboy <filename>")]
    Usage,
    #[error("Error: File {} does not exists.", .0.display())]
    NotFound(PathBuf),
}

impl ArgsError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ArgsError::Usage => 1,
            ArgsError::NotFound(_) => 2,
        }
    }
}

/// Validate the arguments (program name already stripped): exactly one
/// path, which must exist.
pub fn parse_args<I>(args: I) -> Result<PathBuf, ArgsError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let (Some(path), None) = (args.next(), args.next()) else {
        return Err(ArgsError::Usage);
    };
    let path = PathBuf::from(path);
    if !path.is_file() {
        return Err(ArgsError::NotFound(path));
    }
    Ok(path)
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct Config {
    #[builder(setter(into))]
    pub rom_path: PathBuf,
    /// Number of 70 224-cycle frames to run.
    #[builder(default = DEFAULT_FRAMES)]
    pub frames: u32,
    /// Skip opcode holes instead of stopping on them.
    #[builder(default = false)]
    pub lenient: bool,
}

impl Config {
    /// Build a config for `rom_path`, taking the frame budget from
    /// `COZIBOY_FRAMES` and the opcode policy from `COZIBOY_LENIENT`.
    pub fn from_env(rom_path: impl Into<PathBuf>) -> Self {
        let frames = std::env::var("COZIBOY_FRAMES")
            .ok()
            .and_then(|value| match value.trim().parse::<u32>() {
                Ok(frames) => Some(frames),
                Err(_) => {
                    log::warn!("ignoring invalid COZIBOY_FRAMES={value:?}");
                    None
                }
            })
            .unwrap_or(DEFAULT_FRAMES);
        let lenient = std::env::var("COZIBOY_LENIENT")
            .map(|value| is_truthy(&value))
            .unwrap_or(false);

        Self::builder()
            .rom_path(rom_path)
            .frames(frames)
            .lenient(lenient)
            .build()
    }

    pub fn cpu_config(&self) -> CpuConfig {
        CpuConfig::builder().strict_opcodes(!self.lenient).build()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// What happened during a run.
#[derive(Clone, Debug)]
pub struct RunReport {
    pub cycles: u64,
    pub instructions: u64,
    /// Register dump at the end of the run.
    pub registers: String,
    /// The error that stopped the CPU early, if any.
    pub fault: Option<CpuError>,
}

/// Load the image at `config.rom_path` into a flat 64 KiB memory at 0x0000
/// and run the CPU for the configured frame budget.
pub fn run(config: &Config) -> Result<RunReport> {
    let image = std::fs::read(&config.rom_path)
        .with_context(|| format!("failed to read {}", config.rom_path.display()))?;
    Ok(run_image(config, &image))
}

/// Same as [`run`] for an image already in memory.
pub fn run_image(config: &Config, image: &[u8]) -> RunReport {
    let mut memory = FlatMemory::new();
    memory.load(0x0000, image);
    let mut cpu = Cpu::with_config(config.cpu_config());

    let budget = u64::from(config.frames) * u64::from(CYCLES_PER_FRAME);
    let mut cycles = 0u64;
    let mut instructions = 0u64;
    let mut fault = None;

    log::info!(
        "running {} frame(s) ({budget} cycles) from {}",
        config.frames,
        display_name(&config.rom_path)
    );

    while cycles < budget {
        match cpu.step(&mut memory) {
            Ok(spent) => {
                cycles += u64::from(spent);
                instructions += 1;
            }
            Err(err) => {
                log::error!("CPU stopped after {instructions} step(s): {err}");
                fault = Some(err);
                break;
            }
        }
    }

    RunReport {
        cycles,
        instructions,
        registers: cpu.dump_registers(),
        fault,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
