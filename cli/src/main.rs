use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use i8080::{Cpu, CpuResult};

/// Run a raw Intel 8080 program image against the emulator core.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a raw binary image, loaded at address 0x0000.
    rom_path: PathBuf,

    /// Stop after this many T-states even if the program never executes HLT.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Log every IN/OUT port access at info level.
    #[arg(long)]
    port_log: bool,
}

struct LoggingIoBus {
    port_log: bool,
}

impl i8080::IoBus for LoggingIoBus {
    fn read_port(&mut self, port: u8) -> CpuResult<u8> {
        if self.port_log {
            info!("in  port={port:#04x} -> 0x00");
        }
        Ok(0)
    }

    fn write_port(&mut self, port: u8, value: u8) -> CpuResult<()> {
        if self.port_log {
            info!("out port={port:#04x} <- {value:#04x}");
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let image = std::fs::read(&args.rom_path)?;
    let mut cpu = Cpu::with_io(Box::new(LoggingIoBus {
        port_log: args.port_log,
    }));
    cpu.load(&image)?;

    let max_cycles = args.max_cycles.unwrap_or(u64::MAX);
    cpu.run_until(max_cycles)?;

    info!(
        "halted={} pc={:#06x} sp={:#06x} cycles={}",
        cpu.halted, cpu.pc, cpu.sp, cpu.cycles
    );
    if !cpu.halted {
        eprintln!(
            "program did not halt within {max_cycles} cycles (pc={:#06x})",
            cpu.pc
        );
        std::process::exit(1);
    }

    Ok(())
}
