//! The core's error taxonomy.
//!
//! The 8080 itself has no trap mechanism, so anything surfaced here is an
//! emulator bug or a host-integration error, never a recoverable in-program
//! condition. `step`/`run` propagate these with `?` and stop.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CpuError {
    /// A memory access landed outside the 64 KiB address space.
    #[error("memory access at {address:#06x} out of bounds (pc={pc:#06x})")]
    OutOfBounds { address: i32, pc: u16 },

    /// A ROM image was larger than the 64 KiB address space.
    #[error("rom image of {size} bytes exceeds the 65536-byte address space")]
    ImageTooLarge { size: usize },

    /// A host-supplied I/O port callback failed.
    #[error("io failure on port {port:#04x}: {message}")]
    IOFailure { port: u8, message: String },

    /// Defensive fallback: every opcode is defined, so this should be
    /// unreachable, but a future ISA extension must fail loudly rather than
    /// silently behave as a NOP.
    #[error("unhandled instruction {opcode:#04x} at pc={pc:#06x}")]
    UnhandledInstruction { opcode: u8, pc: u16 },
}

pub type CpuResult<T> = Result<T, CpuError>;
