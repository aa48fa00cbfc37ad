//! Data transfer instructions: MOV/MVI/LXI/LDA/STA/LHLD/SHLD/LDAX/STAX/XCHG.
//! None of these touch the condition flags.

use super::{Cpu, Operand8};
use crate::error::CpuResult;
use crate::opcodes::{wide_pair_as_register_pair, WidePair};
use crate::registers::{Register, RegisterPair};

/// Function: {dst} <- {src}
pub fn mov(cpu: &mut Cpu, dst: Operand8, src: Operand8) -> CpuResult<()> {
    let value = cpu.read8(src);
    cpu.write8(dst, value);
    Ok(())
}

/// Function: {dst} <- d8
pub fn mvi(cpu: &mut Cpu, dst: Operand8) -> CpuResult<()> {
    let value = cpu.fetch_u8();
    cpu.write8(dst, value);
    Ok(())
}

/// Function: {pair} <- d16
pub fn lxi(cpu: &mut Cpu, pair: WidePair) -> CpuResult<()> {
    let value = cpu.fetch_u16();
    match wide_pair_as_register_pair(pair) {
        Some(rp) => cpu.registers.set_pair(rp, value),
        None => cpu.sp = value,
    }
    Ok(())
}

/// Function: A <- memory[a16]
pub fn lda(cpu: &mut Cpu) -> CpuResult<()> {
    let address = cpu.fetch_u16();
    let value = cpu.memory.read8(address);
    cpu.registers.set(Register::A, value);
    Ok(())
}

/// Function: memory[a16] <- A
pub fn sta(cpu: &mut Cpu) -> CpuResult<()> {
    let address = cpu.fetch_u16();
    let value = cpu.registers.get(Register::A);
    cpu.memory.write8(address, value);
    Ok(())
}

/// Function: HL <- memory[a16], memory[a16+1]
pub fn lhld(cpu: &mut Cpu) -> CpuResult<()> {
    let address = cpu.fetch_u16();
    let value = cpu.memory.read16(address);
    cpu.registers.set_pair(RegisterPair::HL, value);
    Ok(())
}

/// Function: memory[a16], memory[a16+1] <- HL
pub fn shld(cpu: &mut Cpu) -> CpuResult<()> {
    let address = cpu.fetch_u16();
    let value = cpu.registers.get_pair(RegisterPair::HL);
    cpu.memory.write16(address, value);
    Ok(())
}

/// Function: A <- memory[{pair}]
pub fn ldax(cpu: &mut Cpu, pair: RegisterPair) -> CpuResult<()> {
    let address = cpu.registers.get_pair(pair);
    let value = cpu.memory.read8(address);
    cpu.registers.set(Register::A, value);
    Ok(())
}

/// Function: memory[{pair}] <- A
pub fn stax(cpu: &mut Cpu, pair: RegisterPair) -> CpuResult<()> {
    let address = cpu.registers.get_pair(pair);
    let value = cpu.registers.get(Register::A);
    cpu.memory.write8(address, value);
    Ok(())
}

/// Function: HL <-> DE
pub fn xchg(cpu: &mut Cpu) -> CpuResult<()> {
    let hl = cpu.registers.get_pair(RegisterPair::HL);
    let de = cpu.registers.get_pair(RegisterPair::DE);
    cpu.registers.set_pair(RegisterPair::HL, de);
    cpu.registers.set_pair(RegisterPair::DE, hl);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mov_copies_without_touching_flags() {
        let mut cpu = Cpu::new();
        cpu.registers.set(Register::B, 0x42);
        cpu.registers.flags.zero = true;
        mov(&mut cpu, Operand8::Reg(Register::A), Operand8::Reg(Register::B)).unwrap();
        assert_eq!(cpu.registers.get(Register::A), 0x42);
        assert!(cpu.registers.flags.zero);
    }

    #[test]
    fn test_mov_through_memory_m() {
        let mut cpu = Cpu::new();
        cpu.registers.set_pair(RegisterPair::HL, 0x3000);
        cpu.memory.write8(0x3000, 0x99);
        mov(&mut cpu, Operand8::Reg(Register::A), Operand8::Memory).unwrap();
        assert_eq!(cpu.registers.get(Register::A), 0x99);
    }

    #[test]
    fn test_lxi_sp() {
        let mut cpu = Cpu::new();
        cpu.load(&[0x00, 0x24]).unwrap();
        lxi(&mut cpu, WidePair::SP).unwrap();
        assert_eq!(cpu.sp, 0x2400);
    }

    #[test]
    fn test_lhld_shld_round_trip() {
        let mut cpu = Cpu::new();
        cpu.registers.set_pair(RegisterPair::HL, 0xAE29);
        cpu.pc = 0x1000;
        cpu.memory.write16(0x1000, 0x2000);
        shld(&mut cpu).unwrap();
        assert_eq!(cpu.memory.read16(0x2000), 0xAE29);

        cpu.registers.set_pair(RegisterPair::HL, 0);
        cpu.pc = 0x1000;
        lhld(&mut cpu).unwrap();
        assert_eq!(cpu.registers.get_pair(RegisterPair::HL), 0xAE29);
    }

    #[test]
    fn test_xchg_swaps_hl_and_de() {
        let mut cpu = Cpu::new();
        cpu.registers.set_pair(RegisterPair::HL, 0x1234);
        cpu.registers.set_pair(RegisterPair::DE, 0x5678);
        xchg(&mut cpu).unwrap();
        assert_eq!(cpu.registers.get_pair(RegisterPair::HL), 0x5678);
        assert_eq!(cpu.registers.get_pair(RegisterPair::DE), 0x1234);
    }
}
