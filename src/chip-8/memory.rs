use std::ops::Index;

use crate::error::Error;

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const FONTSET_BASE_ADDRESS: u16 = 0x000;
pub const FONT_GLYPH_SIZE: u16 = 5;
const FONTSET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Largest program image that fits between [`PROGRAM_START`] and the end of memory.
pub const PROGRAM_CAPACITY: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// A rejected memory access, before the program counter is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    OutOfBounds { address: usize, len: usize },
    Protected { address: usize },
}

impl AccessError {
    /// Attach the address of the instruction that made the access.
    pub fn at(self, pc: u16) -> Error {
        match self {
            AccessError::OutOfBounds { address, len } => Error::OutOfBounds { address, len, pc },
            AccessError::Protected { address } => Error::ProtectedWrite { address, pc },
        }
    }
}

/// Main memory holding 4KiB of data.
/// The first 0x200 locations are reserved for private
/// use, namely the built in font at [`FONTSET_BASE_ADDRESS`].
///
/// Every access is bounds checked and reported as an [`AccessError`] rather
/// than a panic. Indexed writes below [`PROGRAM_START`] are refused so the font
/// can never be overwritten by a running program.
#[derive(Clone)]
pub struct Memory {
    memory: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Construct a new instance of `Memory`.
    ///
    /// The reserved memory regions will be intiailized appropriately
    /// and a program can be loaded at 0x200 to start execution.
    ///
    fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font_start = FONTSET_BASE_ADDRESS as usize;
        memory[font_start..(font_start + FONTSET.len())].copy_from_slice(&FONTSET);

        Self { memory }
    }

    /// Copy a program image into the load region starting at [`PROGRAM_START`].
    ///
    /// Nothing is written when the image is larger than [`PROGRAM_CAPACITY`].
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Error> {
        if program.len() > PROGRAM_CAPACITY {
            return Err(Error::LoadOverflow {
                size: program.len(),
                capacity: PROGRAM_CAPACITY,
            });
        }

        let start = PROGRAM_START as usize;
        self.memory[start..(start + program.len())].copy_from_slice(program);

        Ok(())
    }

    pub fn font_address_for_character(character: u8) -> u16 {
        FONTSET_BASE_ADDRESS + u16::from(character) * FONT_GLYPH_SIZE
    }

    /// Read the big-endian word at `address` and `address + 1`.
    pub fn read_word(&self, address: u16) -> Result<u16, AccessError> {
        let bytes = self.as_slice(address, 2)?;

        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn as_slice(&self, base_address: u16, length: usize) -> Result<&[u8], AccessError> {
        let start = base_address as usize;
        self.memory
            .get(start..start + length)
            .ok_or(AccessError::OutOfBounds {
                address: start,
                len: length,
            })
    }

    /// Write `slice` starting at `base_address`, all or nothing.
    pub fn copy_from_slice(&mut self, base_address: u16, slice: &[u8]) -> Result<(), AccessError> {
        let start = base_address as usize;
        if slice.is_empty() {
            return Ok(());
        }
        if start < PROGRAM_START as usize {
            return Err(AccessError::Protected { address: start });
        }

        let target = self
            .memory
            .get_mut(start..start + slice.len())
            .ok_or(AccessError::OutOfBounds {
                address: start,
                len: slice.len(),
            })?;
        target.copy_from_slice(slice);

        Ok(())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<u16> for Memory {
    type Output = u8;

    fn index(&self, address: u16) -> &Self::Output {
        &self.memory[address as usize]
    }
}
