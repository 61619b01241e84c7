use tracing::debug;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, PIXEL_OFF, PROGRAM_CAPACITY, PROGRAM_START,
    SPRITE_SHEET, SPRITE_SHEET_START, STACK_DEPTH,
};
use crate::error::{Error, Result};

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[u32; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of occupied stack slots, 0..=16
///
/// Timers
/// - 2 8-bit timers (delay & sound)
/// - both count down once per cycle and stop at 0
///
/// ## Memory
/// - 16 slot stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x200 is reserved for the interpreter; the sprite sheet sits at 0x050
///     - programs are loaded at 0x200
/// - 32x64 frame buffer of whole-word pixels
///
/// ## Input
/// - the pressed status of keys 0..F
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub keypad: [bool; 16],
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[SPRITE_SHEET_START..SPRITE_SHEET_START + SPRITE_SHEET.len()]
            .copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START as u16,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: [[PIXEL_OFF; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            keypad: [false; 16],
        }
    }

    /// Copies a program into memory at 0x200.
    ///
    /// Memory is left untouched if the program doesn't fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > PROGRAM_CAPACITY {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                capacity: PROGRAM_CAPACITY,
            });
        }
        self.memory[PROGRAM_START..PROGRAM_START + program.len()].copy_from_slice(program);
        debug!(bytes = program.len(), "loaded program");
        Ok(())
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
