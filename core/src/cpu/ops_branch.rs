//! Control-transfer instructions: JMP/Jcc, CALL/Ccc, RET/Rcc, RST, PCHL.
//!
//! Every branch reads its `a16` immediate via `Cpu::fetch_u16` whether or
//! not it is taken, so `pc` always lands on `original + 3` before a taken
//! branch overwrites it — matching the documented "else pc advances by 3"
//! behavior for free.

use super::Cpu;
use crate::error::CpuResult;
use crate::opcodes::{condition_holds, Condition};
use crate::registers::RegisterPair;

/// Function: pc <- a16
pub fn jmp(cpu: &mut Cpu) -> CpuResult<()> {
    let address = cpu.fetch_u16();
    cpu.pc = address;
    Ok(())
}

/// Function: if cc then pc <- a16 else pc <- pc+3
pub fn jmp_if(cpu: &mut Cpu, condition: Condition) -> CpuResult<()> {
    let address = cpu.fetch_u16();
    if condition_holds(cpu, condition) {
        cpu.pc = address;
    }
    Ok(())
}

/// Function: push(pc); pc <- a16
pub fn call(cpu: &mut Cpu) -> CpuResult<()> {
    let address = cpu.fetch_u16();
    cpu.push16(cpu.pc);
    cpu.pc = address;
    Ok(())
}

/// Function: if cc then {push(pc); pc <- a16} else pc <- pc+3
pub fn call_if(cpu: &mut Cpu, condition: Condition) -> CpuResult<()> {
    let address = cpu.fetch_u16();
    if condition_holds(cpu, condition) {
        cpu.push16(cpu.pc);
        cpu.pc = address;
    }
    Ok(())
}

/// Function: pc <- pop()
pub fn ret(cpu: &mut Cpu) -> CpuResult<()> {
    cpu.pc = cpu.pop16();
    Ok(())
}

/// Function: if cc then pc <- pop()
pub fn ret_if(cpu: &mut Cpu, condition: Condition) -> CpuResult<()> {
    if condition_holds(cpu, condition) {
        cpu.pc = cpu.pop16();
    }
    Ok(())
}

/// Function: push(pc); pc <- n*8
pub fn rst(cpu: &mut Cpu, n: u8) -> CpuResult<()> {
    cpu.push16(cpu.pc);
    cpu.pc = (n as u16) * 8;
    Ok(())
}

/// Function: pc <- HL
pub fn pchl(cpu: &mut Cpu) -> CpuResult<()> {
    cpu.pc = cpu.registers.get_pair(RegisterPair::HL);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_jmp_if_not_taken_still_advances_past_the_operand() {
        let mut cpu = Cpu::new();
        cpu.load(&[0x00, 0x30]).unwrap();
        cpu.registers.flags.zero = false;
        jmp_if(&mut cpu, Condition::Z).unwrap();
        assert_eq!(cpu.pc, 2, "untaken branch must still consume the a16 operand");
    }

    #[test]
    fn test_call_pushes_the_return_address_past_the_operand() {
        let mut cpu = Cpu::new();
        cpu.pc = 0x0100;
        cpu.sp = 0x2400;
        cpu.memory.write16(0x0101, 0x1000);
        call(&mut cpu).unwrap();
        assert_eq!(cpu.pc, 0x1000);
        assert_eq!(cpu.pop16(), 0x0103, "return address must be pc after the a16 operand");
    }

    #[test]
    fn test_ret_restores_pc_pushed_by_call() {
        let mut cpu = Cpu::new();
        cpu.pc = 0x0100;
        cpu.sp = 0x2400;
        cpu.memory.write16(0x0101, 0x1000);
        call(&mut cpu).unwrap();
        ret(&mut cpu).unwrap();
        assert_eq!(cpu.pc, 0x0103);
    }

    #[test]
    fn test_rst_targets_vector_times_eight() {
        let mut cpu = Cpu::new();
        cpu.pc = 0x0050;
        cpu.sp = 0x2400;
        rst(&mut cpu, 5).unwrap();
        assert_eq!(cpu.pc, 40);
        assert_eq!(cpu.pop16(), 0x0050);
    }

    #[test]
    fn test_pchl_does_not_push() {
        let mut cpu = Cpu::new();
        cpu.registers.set_pair(RegisterPair::HL, 0x4242);
        cpu.sp = 0x2400;
        pchl(&mut cpu).unwrap();
        assert_eq!(cpu.pc, 0x4242);
        assert_eq!(cpu.sp, 0x2400);
    }
}
