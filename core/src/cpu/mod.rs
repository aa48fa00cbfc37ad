//! The CPU: register file, memory, and the fetch-decode-execute loop (C6).
//!
//! http://www.emulator101.com/8080-by-opcode.html

pub mod ops_arith;
pub mod ops_branch;
pub mod ops_control;
pub mod ops_logical;
pub mod ops_stack;
pub mod ops_transfer;

use log::{error, trace, warn};

use crate::error::CpuResult;
use crate::memory::Memory;
use crate::opcodes;
use crate::registers::{Register, Registers};

/// A single 8-bit operand site: either a general-purpose register, or the
/// "M" pseudo-register that routes through `memory[HL]`. Kept as an enum
/// rather than string/byte comparison so every call site is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand8 {
    Reg(Register),
    Memory,
}

/// Host-supplied I/O port handler for the IN/OUT instructions. The default
/// [`NullIoBus`] reads zero and discards writes, matching an 8080 with no
/// peripheral board attached. Fallible so a host backend (a real peripheral,
/// a test harness) can surface `CpuError::IOFailure` back through `step`.
pub trait IoBus {
    fn read_port(&mut self, port: u8) -> CpuResult<u8>;
    fn write_port(&mut self, port: u8, value: u8) -> CpuResult<()>;
}

#[derive(Debug, Default)]
pub struct NullIoBus;

impl IoBus for NullIoBus {
    fn read_port(&mut self, port: u8) -> CpuResult<u8> {
        warn!("read from unwired port {port:#04x}, returning 0");
        Ok(0)
    }

    fn write_port(&mut self, port: u8, _value: u8) -> CpuResult<()> {
        warn!("write to unwired port {port:#04x} discarded");
        Ok(())
    }
}

pub struct Cpu {
    pub registers: Registers,
    pub memory: Memory,
    pub sp: u16,
    pub pc: u16,
    pub inte: bool,
    pub halted: bool,
    pub cycles: u64,
    /// Pending external interrupt, as an RST vector number (0-7).
    pending_interrupt: Option<u8>,
    /// Counts down the one-instruction EI delay; see [`ops_control::ei`].
    ei_delay: u8,
    io: Box<dyn IoBus>,
}

impl Cpu {
    pub fn new() -> Cpu {
        Cpu {
            registers: Registers::new(),
            memory: Memory::new(),
            sp: 0,
            pc: 0,
            inte: false,
            halted: false,
            cycles: 0,
            pending_interrupt: None,
            ei_delay: 0,
            io: Box::new(NullIoBus),
        }
    }

    /// Build a CPU with a caller-supplied I/O port backend in place of the
    /// default no-op one.
    pub fn with_io(io: Box<dyn IoBus>) -> Cpu {
        Cpu {
            io,
            ..Cpu::new()
        }
    }

    pub fn load(&mut self, image: &[u8]) -> CpuResult<()> {
        self.memory.load(image)
    }

    /// Read the operand addressed by `site`, indirecting through `HL` for
    /// the M pseudo-register.
    pub fn read8(&self, site: Operand8) -> u8 {
        match site {
            Operand8::Reg(register) => self.registers.get(register),
            Operand8::Memory => self.memory.read8(self.hl()),
        }
    }

    pub fn write8(&mut self, site: Operand8, value: u8) {
        match site {
            Operand8::Reg(register) => self.registers.set(register, value),
            Operand8::Memory => {
                let address = self.hl();
                self.memory.write8(address, value);
            }
        }
    }

    fn hl(&self) -> u16 {
        self.registers.get_pair(crate::registers::RegisterPair::HL)
    }

    /// Fetch the byte at `pc` and advance `pc` by one.
    pub fn fetch_u8(&mut self) -> u8 {
        let byte = self.memory.read8(self.pc);
        self.pc = self.pc.wrapping_add(1);
        byte
    }

    /// Fetch the little-endian word at `pc` and advance `pc` by two.
    pub fn fetch_u16(&mut self) -> u16 {
        let low = self.fetch_u8();
        let high = self.fetch_u8();
        u16::from_le_bytes([low, high])
    }

    pub fn push16(&mut self, value: u16) {
        self.sp = self.memory.push16(self.sp, value);
    }

    pub fn pop16(&mut self) -> u16 {
        let (value, sp) = self.memory.pop16(self.sp);
        self.sp = sp;
        value
    }

    pub fn read_port(&mut self, port: u8) -> CpuResult<u8> {
        self.io.read_port(port)
    }

    pub fn write_port(&mut self, port: u8, value: u8) -> CpuResult<()> {
        self.io.write_port(port, value)
    }

    /// Latch an external interrupt request carrying an RST vector (0-7).
    /// Delivery happens at the next instruction boundary where interrupts
    /// are actually enabled; see [`Cpu::poll_interrupt`].
    pub fn raise_interrupt(&mut self, vector: u8) {
        self.pending_interrupt = Some(vector & 0x07);
    }

    fn poll_interrupt(&mut self) -> Option<u8> {
        if self.ei_delay > 0 {
            self.ei_delay -= 1;
            return None;
        }
        if self.inte {
            self.pending_interrupt.take()
        } else {
            None
        }
    }

    /// Called by [`ops_control::ei`]: enables interrupts but defers
    /// recognition until the instruction immediately following EI has
    /// fully executed, per the 8080's documented one-instruction delay.
    pub fn enable_interrupts_after_next(&mut self) {
        self.inte = true;
        self.ei_delay = 1;
    }

    pub fn disable_interrupts(&mut self) {
        self.inte = false;
        self.ei_delay = 0;
    }

    fn service_interrupt(&mut self, vector: u8) -> CpuResult<()> {
        self.halted = false;
        self.inte = false;
        self.push16(self.pc);
        self.pc = (vector as u16) * 8;
        self.cycles += 11;
        Ok(())
    }

    /// Run exactly one fetch-decode-execute cycle, or service a pending
    /// interrupt in its place.
    pub fn step(&mut self) -> CpuResult<()> {
        if let Some(vector) = self.poll_interrupt() {
            return self.service_interrupt(vector);
        }
        if self.halted {
            return Ok(());
        }
        let pc_at_fetch = self.pc;
        let opcode = self.fetch_u8();
        trace!(
            "pc={:#06x} opcode={:#04x} ({})",
            pc_at_fetch,
            opcode,
            opcodes::mnemonic(opcode)
        );
        if let Err(err) = opcodes::execute(self, opcode) {
            error!("pc={pc_at_fetch:#06x} opcode={opcode:#04x} failed: {err}");
            return Err(err);
        }
        self.cycles += opcodes::cycles(opcode) as u64;
        Ok(())
    }

    /// Run until halted or `max_cycles` total cycles have been executed,
    /// whichever comes first.
    pub fn run_until(&mut self, max_cycles: u64) -> CpuResult<()> {
        while !self.halted && self.cycles < max_cycles {
            self.step()?;
        }
        Ok(())
    }
}

impl Default for Cpu {
    fn default() -> Cpu {
        Cpu::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fetch_u8_advances_pc() {
        let mut cpu = Cpu::new();
        cpu.load(&[0x11, 0x22]).unwrap();
        assert_eq!(cpu.fetch_u8(), 0x11);
        assert_eq!(cpu.pc, 1);
    }

    #[test]
    fn test_fetch_u16_is_little_endian_and_advances_by_two() {
        let mut cpu = Cpu::new();
        cpu.load(&[0x34, 0x12]).unwrap();
        assert_eq!(cpu.fetch_u16(), 0x1234);
        assert_eq!(cpu.pc, 2);
    }

    #[test]
    fn test_hlt_halts_and_step_becomes_a_no_op() {
        let mut cpu = Cpu::new();
        cpu.load(&[0x76]).unwrap();
        cpu.step().unwrap();
        assert!(cpu.halted);
        let pc_after_halt = cpu.pc;
        cpu.step().unwrap();
        assert_eq!(cpu.pc, pc_after_halt);
    }

    #[test]
    fn test_ei_delays_interrupt_by_one_instruction() {
        let mut cpu = Cpu::new();
        // EI; NOP; NOP
        cpu.load(&[0xFB, 0x00, 0x00]).unwrap();
        cpu.raise_interrupt(1);

        cpu.step().unwrap(); // executes EI
        assert_eq!(cpu.pc, 1, "interrupt must not preempt the EI instruction itself");

        cpu.step().unwrap(); // the one guaranteed instruction after EI
        assert_eq!(cpu.pc, 2, "interrupt must not preempt the instruction right after EI");

        cpu.step().unwrap(); // interrupt now taken instead of fetching pc=2
        assert_eq!(cpu.pc, 8, "RST 1 targets address 1 * 8");
    }

    #[test]
    fn test_interrupt_ignored_while_disabled() {
        let mut cpu = Cpu::new();
        cpu.load(&[0x00, 0x00]).unwrap();
        cpu.raise_interrupt(2);
        cpu.step().unwrap();
        assert_eq!(cpu.pc, 1, "DI is the reset default; no interrupt should fire");
    }
}
