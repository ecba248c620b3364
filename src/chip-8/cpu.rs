use std::ops::{Index, IndexMut};

use log::trace;

use super::config::Quirks;
use super::display::Framebuffer;
use super::error::{Error, Result};
use super::input::{Input, Keypad};
use super::memory::{Memory, PROGRAM_START};
use super::opcode::Instruction;
use super::timer::Timer;
use super::RandomNumberProvider;

pub const REGISTER_COUNT: usize = 16;
pub const STACK_SIZE: usize = 16;
const FLAG: u8 = 0xF;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Registers([u8; REGISTER_COUNT]);

impl Registers {
    fn as_slice_through(&self, idx: u8) -> &[u8] {
        &self.0[0..=usize::from(idx)]
    }

    fn copy_from_slice(&mut self, slice: &[u8]) {
        self.0[0..slice.len()].copy_from_slice(slice)
    }
}

impl Index<u8> for Registers {
    type Output = u8;

    fn index(&self, register: u8) -> &Self::Output {
        &self.0[usize::from(register)]
    }
}

impl IndexMut<u8> for Registers {
    fn index_mut(&mut self, register: u8) -> &mut Self::Output {
        &mut self.0[usize::from(register)]
    }
}

/// What happened during one call to [`Cpu::cycle`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    /// The sound timer ran out on this cycle.
    pub beep: bool,
    /// An FX0A is still waiting for a key to go down.
    pub awaiting_key: bool,
}

/// The machine: register file, call stack, timers, keypad latch, memory and
/// screen, executing one instruction per cycle.
pub struct Cpu {
    // Registers
    v: Registers,
    i: u16,

    // Program Counter
    pc: u16,

    // Stack
    stack: [u16; STACK_SIZE],
    sp: u8,

    memory: Memory,
    framebuffer: Framebuffer,
    keypad: Keypad,

    delay_timer: Timer,
    sound_timer: Timer,

    quirks: Quirks,
    random_number_provider: Box<RandomNumberProvider>,
}

impl Cpu {
    pub fn new(
        memory: Memory,
        quirks: Quirks,
        random_number_provider: Box<RandomNumberProvider>,
    ) -> Self {
        Self {
            v: Registers::default(),
            i: 0,
            pc: PROGRAM_START,

            sp: 0,
            stack: [0; STACK_SIZE],

            memory,
            framebuffer: Framebuffer::default(),
            keypad: Keypad::default(),

            delay_timer: Timer::default(),
            sound_timer: Timer::default(),

            quirks,
            random_number_provider,
        }
    }

    /// Return to the power-on state with `memory` as the new address space.
    /// The random source and quirks are kept.
    pub fn reset(&mut self, memory: Memory) {
        self.v = Registers::default();
        self.i = 0;
        self.pc = PROGRAM_START;
        self.stack = [0; STACK_SIZE];
        self.sp = 0;
        self.memory = memory;
        self.framebuffer = Framebuffer::default();
        self.keypad = Keypad::default();
        self.delay_timer = Timer::default();
        self.sound_timer = Timer::default();
    }

    /// Latch input, fetch, decode and execute one instruction, then tick the
    /// timers.
    ///
    /// A fatal condition is reported before anything is mutated, the key
    /// latch included.
    pub fn cycle(&mut self, input: &dyn Input) -> Result<Cycle> {
        let opcode = self.fetch()?;
        let instruction =
            Instruction::decode(opcode).ok_or(Error::UnknownOpcode { opcode, pc: self.pc })?;
        trace!("{:03X}: {:04X}  {}", self.pc, opcode, instruction);

        let previous_keypad = self.keypad;
        self.keypad.latch(input);
        let next_pc = match self.execute(instruction) {
            Ok(next_pc) => next_pc,
            Err(error) => {
                self.keypad = previous_keypad;
                return Err(error);
            }
        };
        let awaiting_key = matches!(instruction, Instruction::WaitForKey(_)) && next_pc == self.pc;
        self.pc = next_pc;

        self.delay_timer.tick();
        let beep = self.sound_timer.tick();

        Ok(Cycle { beep, awaiting_key })
    }

    /// Read the big-endian opcode word at the program counter.
    pub fn fetch(&self) -> Result<u16> {
        self.memory
            .read_word(self.pc)
            .map_err(|error| error.at(self.pc))
    }

    /// Apply `instruction` and return the next program counter.
    ///
    /// Every check that can fail runs before the first write, so an `Err`
    /// leaves the machine untouched.
    fn execute(&mut self, instruction: Instruction) -> Result<u16> {
        use Instruction::*;

        let current_pc = self.pc;
        let next = current_pc + 2;
        let skip_if = |condition: bool| if condition { current_pc + 4 } else { next };

        let next_pc = match instruction {
            // 00E0: Clear screen
            ClearScreen => {
                self.framebuffer.cls();

                next
            }

            // 00EE: Return from subroutine
            Return => self.stack_pop()?,

            // 1NNN: Jump to address NNN
            Jump(address) => address,

            // 2NNN: Call NNN. The return address is the instruction after the call.
            Call(address) => {
                self.stack_push(next)?;

                address
            }

            // 3XNN: Skip next instruction if VX is equal to NN.
            SkipIfEqualImmediate(x, value) => skip_if(self.v[x] == value),

            // 4XNN: Skip next instruction if VX is not equal to NN.
            SkipIfNotEqualImmediate(x, value) => skip_if(self.v[x] != value),

            // 5XY0: Skip next instruction if VX is equal to VY.
            SkipIfEqual(x, y) => skip_if(self.v[x] == self.v[y]),

            // 6XNN: Set VX to NN.
            LoadImmediate(x, value) => {
                self.v[x] = value;

                next
            }

            // 7XNN: Add NN to VX, carry flag is not changed.
            AddImmediate(x, value) => {
                self.v[x] = self.v[x].wrapping_add(value);

                next
            }

            // 8XY0: Set VX to the value of VY.
            Move(x, y) => {
                self.v[x] = self.v[y];

                next
            }

            // 8XY1: Set VX to the result of VX | VY
            Or(x, y) => {
                self.v[x] = self.v[x] | self.v[y];

                next
            }

            // 8XY2: Set VX to the result of VX & VY
            And(x, y) => {
                self.v[x] = self.v[x] & self.v[y];

                next
            }

            // 8XY3: Set VX to the result of VX ^ VY
            Xor(x, y) => {
                self.v[x] = self.v[x] ^ self.v[y];

                next
            }

            // 8XY4: Add VY to VX. VF is set to 1 if there is a carry, 0 if not.
            Add(x, y) => {
                let sum = u16::from(self.v[x]) + u16::from(self.v[y]);

                self.v[x] = sum as u8;
                self.v[FLAG] = (sum > 0xFF) as u8;

                next
            }

            // 8XY5: Subtract VY from VX. VF is set to 0 if there is a borrow, 1 if not.
            Sub(x, y) => {
                let (result, no_borrow) = subtract(self.v[x], self.v[y]);

                self.v[x] = result;
                self.v[FLAG] = no_borrow;

                next
            }

            // 8XY6: Store the least significant bit of VX in VF and then shift VX to the
            // right by 1.
            ShiftRight(x) => {
                let shifted_out = self.v[x] & 0x1;

                self.v[x] >>= 1;
                self.v[FLAG] = shifted_out;

                next
            }

            // 8XY7: Set VX to the result of VY - VX. VF is set 0 when there is a borrow, 1
            // if not.
            SubReversed(x, y) => {
                let (result, no_borrow) = subtract(self.v[y], self.v[x]);

                self.v[x] = result;
                self.v[FLAG] = no_borrow;

                next
            }

            // 8XYE: Store the most significant bit of VX in VF and then shift VX to the
            // left by 1.
            ShiftLeft(x) => {
                let shifted_out = (self.v[x] & 0x80) >> 7;

                self.v[x] <<= 1;
                self.v[FLAG] = shifted_out;

                next
            }

            // 9XY0: Skip the next instruction if VX is not equal VY
            SkipIfNotEqual(x, y) => skip_if(self.v[x] != self.v[y]),

            // ANNN: Set `I` to address NNN
            LoadIndex(address) => {
                self.i = address;

                next
            }

            // BNNN: Jump to the address NNN + V0
            JumpOffset(address) => address + u16::from(self.v[0]),

            // CXNN: Set the VX to the result of rand() & NN.
            Random(x, mask) => {
                let random: u8 = (self.random_number_provider)();

                self.v[x] = random & mask;

                next
            }

            // DXYN: Draw a sprite at VX, VY of width 8 and height N.
            Draw(x, y, height) => {
                let sprite = self
                    .memory
                    .as_slice(self.i, usize::from(height))
                    .map_err(|error| error.at(current_pc))?;

                let collided =
                    self.framebuffer
                        .draw_sprite(self.v[x], self.v[y], sprite, self.quirks.edge);
                self.v[FLAG] = collided as u8;

                next
            }

            // EX9E: Skip the next instruction if the key stored in VX is pressed
            SkipIfKeyDown(x) => skip_if(self.keypad.is_down(self.v[x])),

            // EXA1: Skip the next instruction if the key stored in VX isn't pressed
            SkipIfKeyUp(x) => skip_if(!self.keypad.is_down(self.v[x])),

            // FX07: Set the VX value to the value of the delay timer
            LoadDelayTimer(x) => {
                self.v[x] = self.delay_timer.current_value();

                next
            }

            // FX0A: Block until a key goes down. The key is stored in VX. While
            // waiting the instruction is executed again on every cycle.
            WaitForKey(x) => match self.keypad.pressed_edge() {
                Some(key) => {
                    self.v[x] = key;

                    next
                }
                None => current_pc,
            },

            // FX15: Set the delay timer to the value of VX
            SetDelayTimer(x) => {
                self.delay_timer.set_value(self.v[x]);

                next
            }

            // FX18: Set the sound timer to the value of VX
            SetSoundTimer(x) => {
                self.sound_timer.set_value(self.v[x]);

                next
            }

            // FX1E: Add VX to I
            AddIndex(x) => {
                self.i = self.i.wrapping_add(u16::from(self.v[x]));

                next
            }

            // FX29: Set I to the location of the sprite for the character in VX.
            LoadGlyph(x) => {
                self.i = Memory::font_address_for_character(self.v[x]);

                next
            }

            // FX33: Store BCD representation of VX in memory locations I, I+1, and I+2.
            StoreBcd(x) => {
                let value = self.v[x];
                let digits = [value / 100, (value / 10) % 10, value % 10];

                self.memory
                    .copy_from_slice(self.i, &digits)
                    .map_err(|error| error.at(current_pc))?;

                next
            }

            // FX55: Store registers V0 through VX in memory starting at I.
            StoreRegisters(x) => {
                self.memory
                    .copy_from_slice(self.i, self.v.as_slice_through(x))
                    .map_err(|error| error.at(current_pc))?;
                self.advance_index_after_block(x);

                next
            }

            // FX65: Read into registers V0 through VX starting at I.
            LoadRegisters(x) => {
                let block = self
                    .memory
                    .as_slice(self.i, usize::from(x) + 1)
                    .map_err(|error| error.at(current_pc))?;
                self.v.copy_from_slice(block);
                self.advance_index_after_block(x);

                next
            }
        };

        Ok(next_pc)
    }

    fn advance_index_after_block(&mut self, x: u8) {
        if self.quirks.load_store_increments_i {
            self.i = self.i.wrapping_add(u16::from(x) + 1);
        }
    }

    fn stack_push(&mut self, value: u16) -> Result<()> {
        if usize::from(self.sp) >= STACK_SIZE {
            return Err(Error::StackOverflow { pc: self.pc });
        }
        self.stack[usize::from(self.sp)] = value;
        self.sp += 1;

        Ok(())
    }

    fn stack_pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow { pc: self.pc });
        }
        self.sp -= 1;

        Ok(self.stack[usize::from(self.sp)])
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.v.0
    }

    pub fn v(&self, register: u8) -> u8 {
        self.v[register & 0xF]
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Return addresses currently pushed, oldest first.
    pub fn stack(&self) -> &[u16] {
        &self.stack[..usize::from(self.sp)]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.current_value()
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.current_value()
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn clear_dirty(&mut self) {
        self.framebuffer.clear_dirty();
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }
}

/// `minuend - subtrahend` wrapped to a byte, with the no-borrow flag
/// (1 when `minuend >= subtrahend`).
fn subtract(minuend: u8, subtrahend: u8) -> (u8, u8) {
    let minuend = u16::from(minuend);
    let subtrahend = u16::from(subtrahend);

    (
        minuend.wrapping_sub(subtrahend) as u8,
        (minuend >= subtrahend) as u8,
    )
}
