use std::io;

use thiserror::Error;

/// Everything that can stop the VM.
///
/// A `step` either applies one whole instruction or returns one of these
/// with the machine state untouched, so the host can decide whether to
/// halt or reset.
#[derive(Debug, Error)]
pub enum Error {
    /// The fetched word matched no dispatch entry.
    #[error("unrecognized opcode {opcode:#06x} at {addr:#05x}")]
    UnknownOpcode { opcode: u16, addr: u16 },

    /// CALL with all sixteen stack slots in use.
    #[error("call stack overflow at {addr:#05x}")]
    StackOverflow { addr: u16 },

    /// RET with no return address on the stack.
    #[error("return with empty call stack at {addr:#05x}")]
    StackUnderflow { addr: u16 },

    /// A read or write that would run past the 4KB address space.
    #[error("memory access out of bounds: {len} byte(s) at {addr:#06x}")]
    OutOfBounds { addr: u16, len: usize },

    /// ROM longer than the program area (0x200..0x1000).
    #[error("ROM of {size} bytes exceeds the {max} byte program area")]
    RomTooLarge { size: usize, max: usize },

    /// The audio collaborator refused the tone trigger.
    #[error("sound device: {0}")]
    Sound(Box<dyn std::error::Error>),

    #[error(transparent)]
    Io(#[from] io::Error),
}
