/// Fatal conditions raised while loading or running a program.
///
/// None of these are recoverable. Once one is returned from a cycle the
/// [`Interpreter`](crate::Interpreter) stays halted until it is reset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unknown opcode {opcode:#06x} at {pc:#05x}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("stack overflow: call at {pc:#05x} with 16 return addresses already pushed")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at {pc:#05x} with an empty stack")]
    StackUnderflow { pc: u16 },

    #[error("memory access of {len} byte(s) at {address:#06x} is out of bounds (pc {pc:#05x})")]
    OutOfBounds { address: usize, len: usize, pc: u16 },

    #[error("write to reserved address {address:#05x} (pc {pc:#05x})")]
    ProtectedWrite { address: usize, pc: u16 },

    #[error("program of {size} bytes does not fit the {capacity} byte load region")]
    LoadOverflow { size: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
