//! A CHIP-8 interpreter core.
//!
//! [`Interpreter`] owns the whole machine and advances it one instruction per
//! [`Interpreter::cycle`]. Loading a program, sampling keys, presenting the
//! framebuffer and pacing cycles are left to the embedding driver.
mod config;
mod cpu;
mod display;
mod error;
mod input;
mod interpreter;
mod memory;
pub mod opcode;
pub mod random;
mod timer;

pub use config::{EdgePolicy, Quirks};
pub use cpu::{Cpu, Cycle, REGISTER_COUNT, STACK_SIZE};
pub use display::{Framebuffer, FRAME_BUFFER_PIXEL_HEIGHT, FRAME_BUFFER_PIXEL_WIDTH};
pub use error::{Error, Result};
pub use input::{Input, Keypad, KEY_COUNT};
pub use interpreter::Interpreter;
pub use memory::{
    AccessError, Memory, FONTSET_BASE_ADDRESS, MEMORY_SIZE, PROGRAM_CAPACITY, PROGRAM_START,
};
pub use opcode::Instruction;

/// Source of bytes for CXNN.
pub type RandomNumberProvider = dyn FnMut() -> u8;
