use log::{debug, error};

use crate::config::Quirks;
use crate::cpu::{Cpu, Cycle};
use crate::error::{Error, Result};
use crate::memory::Memory;
use crate::{Input, RandomNumberProvider};

/// One emulation session: the machine, the program it was loaded with and the
/// fault that halted it, if any.
pub struct Interpreter {
    cpu: Cpu,
    current_rom: Vec<u8>,
    fault: Option<Error>,
    cycles: u64,
}

impl Interpreter {
    pub fn new(quirks: Quirks, random_number_provider: Box<RandomNumberProvider>) -> Self {
        Self {
            cpu: Cpu::new(Memory::default(), quirks, random_number_provider),
            current_rom: Vec::new(),
            fault: None,
            cycles: 0,
        }
    }

    /// Reset the machine and copy `rom` into memory at 0x200.
    ///
    /// An oversized program is rejected before anything is touched.
    pub fn load(&mut self, rom: &[u8]) -> Result<()> {
        let mut memory = Memory::default();
        memory.load_program(rom)?;
        debug!("loaded {} byte program", rom.len());

        self.current_rom = rom.to_vec();
        self.restart(memory);

        Ok(())
    }

    /// Return to the initial state with the last loaded program in memory.
    pub fn reset(&mut self) -> Result<()> {
        let mut memory = Memory::default();
        memory.load_program(&self.current_rom)?;
        debug!("reset after {} cycles", self.cycles);

        self.restart(memory);

        Ok(())
    }

    fn restart(&mut self, memory: Memory) {
        self.cpu.reset(memory);
        self.fault = None;
        self.cycles = 0;
    }

    /// Run one cycle. Once a cycle has failed the interpreter is halted and
    /// keeps returning that error until it is reset or reloaded.
    pub fn cycle(&mut self, input: &dyn Input) -> Result<Cycle> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        match self.cpu.cycle(input) {
            Ok(cycle) => {
                self.cycles += 1;

                Ok(cycle)
            }
            Err(fault) => {
                error!("halted after {} cycles: {}", self.cycles, fault);
                self.fault = Some(fault.clone());

                Err(fault)
            }
        }
    }

    pub fn is_halted(&self) -> bool {
        self.fault.is_some()
    }

    pub fn fault(&self) -> Option<&Error> {
        self.fault.as_ref()
    }

    /// Cycles completed since the last load or reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Acknowledge that the current frame has been presented.
    pub fn clear_dirty(&mut self) {
        self.cpu.clear_dirty();
    }
}
