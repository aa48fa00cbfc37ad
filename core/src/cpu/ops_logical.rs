//! Logical and rotate instructions: ANA/ORA/XRA, their immediate forms,
//! CMA/CMP/CPI, STC/CMC, and the four rotates.

use super::{Cpu, Operand8};
use crate::error::CpuResult;
use crate::flags;
use crate::registers::Register;

/// Function: A <- A & {src}. Flags: Z S P CY=0 AC={bit3(A)|bit3(src)}
pub fn ana(cpu: &mut Cpu, src: Operand8) -> CpuResult<()> {
    let operand = cpu.read8(src);
    cpu.registers.and(Register::A, operand);
    Ok(())
}

/// Function: A <- A | {src}. Flags: Z S P CY=0 AC=0
pub fn ora(cpu: &mut Cpu, src: Operand8) -> CpuResult<()> {
    let operand = cpu.read8(src);
    cpu.registers.or(Register::A, operand);
    Ok(())
}

/// Function: A <- A ^ {src}. Flags: Z S P CY=0 AC=0
pub fn xra(cpu: &mut Cpu, src: Operand8) -> CpuResult<()> {
    let operand = cpu.read8(src);
    cpu.registers.xor(Register::A, operand);
    Ok(())
}

/// Function: A <- A & d8. Flags: Z S P CY=0 AC={bit3(A)|bit3(d8)}
pub fn ani(cpu: &mut Cpu) -> CpuResult<()> {
    let operand = cpu.fetch_u8();
    cpu.registers.and(Register::A, operand);
    Ok(())
}

/// Function: A <- A | d8. Flags: Z S P CY=0 AC=0
pub fn ori(cpu: &mut Cpu) -> CpuResult<()> {
    let operand = cpu.fetch_u8();
    cpu.registers.or(Register::A, operand);
    Ok(())
}

/// Function: A <- A ^ d8. Flags: Z S P CY=0 AC=0
pub fn xri(cpu: &mut Cpu) -> CpuResult<()> {
    let operand = cpu.fetch_u8();
    cpu.registers.xor(Register::A, operand);
    Ok(())
}

/// Function: A <- !A. No flags.
pub fn cma(cpu: &mut Cpu) -> CpuResult<()> {
    cpu.registers.cpl(Register::A);
    Ok(())
}

fn compare(cpu: &mut Cpu, operand: u8) {
    let a = cpu.registers.get(Register::A);
    let result = a as i32 - operand as i32;
    cpu.registers.flags.carry = flags::carry8(result);
    cpu.registers.flags.aux_carry = !flags::aux_carry_sub(a, operand, false);
    cpu.registers.flags.apply_szp(result as u8);
}

/// Function: flags <- A - {src} (A unchanged). Flags: Z S P CY AC
pub fn cmp(cpu: &mut Cpu, src: Operand8) -> CpuResult<()> {
    let operand = cpu.read8(src);
    compare(cpu, operand);
    Ok(())
}

/// Function: flags <- A - d8 (A unchanged). Flags: Z S P CY AC
pub fn cpi(cpu: &mut Cpu) -> CpuResult<()> {
    let operand = cpu.fetch_u8();
    compare(cpu, operand);
    Ok(())
}

/// Function: CY <- 1
pub fn stc(cpu: &mut Cpu) -> CpuResult<()> {
    cpu.registers.flags.carry = true;
    Ok(())
}

/// Function: CY <- !CY
pub fn cmc(cpu: &mut Cpu) -> CpuResult<()> {
    cpu.registers.flags.carry = !cpu.registers.flags.carry;
    Ok(())
}

/// Function: A <- rotate_left(A); CY <- old bit 7
pub fn rlc(cpu: &mut Cpu) -> CpuResult<()> {
    let carry = cpu.registers.rlc(Register::A);
    cpu.registers.flags.carry = carry;
    Ok(())
}

/// Function: A <- rotate_right(A); CY <- old bit 0
pub fn rrc(cpu: &mut Cpu) -> CpuResult<()> {
    let carry = cpu.registers.rrc(Register::A);
    cpu.registers.flags.carry = carry;
    Ok(())
}

/// Function: A <- rotate_left_through_carry(A, CY); CY <- old bit 7
pub fn ral(cpu: &mut Cpu) -> CpuResult<()> {
    let carry_in = cpu.registers.flags.carry;
    let carry_out = cpu.registers.ral(Register::A, carry_in);
    cpu.registers.flags.carry = carry_out;
    Ok(())
}

/// Function: A <- rotate_right_through_carry(A, CY); CY <- old bit 0
pub fn rar(cpu: &mut Cpu) -> CpuResult<()> {
    let carry_in = cpu.registers.flags.carry;
    let carry_out = cpu.registers.rar(Register::A, carry_in);
    cpu.registers.flags.carry = carry_out;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ana_bit3_or_scenario() {
        // A=0x3A, ANA with 0x0F -> A=0x0A, AC set since bit3(0x3A) is set.
        let mut cpu = Cpu::new();
        cpu.registers.set(Register::A, 0x3A);
        cpu.registers.set(Register::B, 0x0F);
        ana(&mut cpu, Operand8::Reg(Register::B)).unwrap();
        assert_eq!(cpu.registers.get(Register::A), 0x0A);
        assert!(cpu.registers.flags.aux_carry);
        assert!(!cpu.registers.flags.carry);
    }

    #[test]
    fn test_ora_clears_carry_and_aux_carry() {
        let mut cpu = Cpu::new();
        cpu.registers.flags.carry = true;
        cpu.registers.flags.aux_carry = true;
        cpu.registers.set(Register::A, 0x0F);
        cpu.registers.set(Register::B, 0xF0);
        ora(&mut cpu, Operand8::Reg(Register::B)).unwrap();
        assert_eq!(cpu.registers.get(Register::A), 0xFF);
        assert!(!cpu.registers.flags.carry);
        assert!(!cpu.registers.flags.aux_carry);
    }

    #[test]
    fn test_cmp_leaves_a_unchanged() {
        let mut cpu = Cpu::new();
        cpu.registers.set(Register::A, 0x05);
        cpu.registers.set(Register::B, 0x05);
        cmp(&mut cpu, Operand8::Reg(Register::B)).unwrap();
        assert_eq!(cpu.registers.get(Register::A), 0x05);
        assert!(cpu.registers.flags.zero);
    }

    #[test]
    fn test_cmc_flips_carry() {
        let mut cpu = Cpu::new();
        cmc(&mut cpu).unwrap();
        assert!(cpu.registers.flags.carry);
        cmc(&mut cpu).unwrap();
        assert!(!cpu.registers.flags.carry);
    }

    #[test]
    fn test_ral_rotates_through_carry_not_through_bit7() {
        let mut cpu = Cpu::new();
        cpu.registers.set(Register::A, 0x80);
        cpu.registers.flags.carry = false;
        ral(&mut cpu).unwrap();
        assert_eq!(cpu.registers.get(Register::A), 0x00);
        assert!(cpu.registers.flags.carry);
        ral(&mut cpu).unwrap();
        assert_eq!(cpu.registers.get(Register::A), 0x01);
        assert!(!cpu.registers.flags.carry);
    }
}
