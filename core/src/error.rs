/// Errors surfaced by the Chip-8 while loading or running a program.
///
/// Unknown opcodes are deliberately absent; they execute as no-ops.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("program is too large ({size} bytes), at most {capacity} bytes fit in memory")]
    ProgramTooLarge { size: usize, capacity: usize },

    #[error("stack overflow: call to {address:#05X} exceeds the maximum call depth")]
    StackOverflow { address: u16 },

    #[error("stack underflow: return from a subroutine with an empty call stack")]
    StackUnderflow,

    #[error("memory access out of bounds at address {address:#06X}")]
    AddressOutOfBounds { address: usize },

    #[error("unable to read program")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
