//! Control instructions: NOP, HLT, EI/DI, IN/OUT.

use super::Cpu;
use crate::error::CpuResult;
use crate::registers::Register;

#[cfg(test)]
use super::IoBus;
#[cfg(test)]
use crate::error::CpuError;

/// Function: no operation.
pub fn nop(_cpu: &mut Cpu) -> CpuResult<()> {
    Ok(())
}

/// Function: halt fetch-decode-execute until an enabled interrupt arrives.
pub fn hlt(cpu: &mut Cpu) -> CpuResult<()> {
    cpu.halted = true;
    Ok(())
}

/// Function: inte <- 1, deferred one instruction (see `Cpu::poll_interrupt`).
pub fn ei(cpu: &mut Cpu) -> CpuResult<()> {
    cpu.enable_interrupts_after_next();
    Ok(())
}

/// Function: inte <- 0, effective immediately.
pub fn di(cpu: &mut Cpu) -> CpuResult<()> {
    cpu.disable_interrupts();
    Ok(())
}

/// Function: A <- in(d8)
pub fn in_(cpu: &mut Cpu) -> CpuResult<()> {
    let port = cpu.fetch_u8();
    let value = cpu.read_port(port)?;
    cpu.registers.set(Register::A, value);
    Ok(())
}

/// Function: out(d8) <- A
pub fn out(cpu: &mut Cpu) -> CpuResult<()> {
    let port = cpu.fetch_u8();
    let value = cpu.registers.get(Register::A);
    cpu.write_port(port, value)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_di_cancels_a_pending_ei_delay() {
        let mut cpu = Cpu::new();
        ei(&mut cpu).unwrap();
        di(&mut cpu).unwrap();
        assert!(!cpu.inte);
    }

    #[test]
    fn test_default_io_reads_zero_and_discards_writes() {
        let mut cpu = Cpu::new();
        cpu.registers.set(Register::A, 0xFF);
        out(&mut cpu).unwrap(); // port byte isn't fetched from memory here;
                                 // reads 0x00 from the zeroed program image.
        in_(&mut cpu).unwrap();
        assert_eq!(cpu.registers.get(Register::A), 0);
    }

    struct FailingIoBus;

    impl IoBus for FailingIoBus {
        fn read_port(&mut self, port: u8) -> CpuResult<u8> {
            Err(CpuError::IOFailure {
                port,
                message: "no device attached".to_string(),
            })
        }

        fn write_port(&mut self, port: u8, _value: u8) -> CpuResult<()> {
            Err(CpuError::IOFailure {
                port,
                message: "no device attached".to_string(),
            })
        }
    }

    #[test]
    fn test_in_propagates_io_failure() {
        let mut cpu = Cpu::with_io(Box::new(FailingIoBus));
        cpu.load(&[0x42]).unwrap();
        let err = in_(&mut cpu).unwrap_err();
        assert_eq!(
            err,
            CpuError::IOFailure {
                port: 0x42,
                message: "no device attached".to_string(),
            }
        );
    }

    #[test]
    fn test_out_propagates_io_failure() {
        let mut cpu = Cpu::with_io(Box::new(FailingIoBus));
        cpu.load(&[0x07]).unwrap();
        assert!(out(&mut cpu).is_err());
    }
}
