use std::io::Read;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::trace;

use crate::constants::MEMORY_SIZE;
use crate::error::{Error, Result};
use crate::instruction::from_op;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the random source behind `Cxkk`, seeded once at construction
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU one instruction at a time
/// - inspecting its frame buffer for rendering by some display
/// - inspecting its timers so some speaker knows when to beep
///
/// There is no clock in here; whoever owns the Chip8 decides how often to call `cycle`.
pub struct Chip8 {
    state: State,
    rng: StdRng,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8 {
            state: State::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// A Chip8 whose random numbers are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Chip8 {
            state: State::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Load a program into memory at 0x200
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.state.load_program(program)
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.load_program(&rom)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn
    /// - clears the draw flag so the same frame isn't handed out twice
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    /// Whether a beep should currently be playing
    pub fn is_sounding(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Replace the pressed status of every key at once
    pub fn set_keypad(&mut self, keypad: [bool; 16]) {
        self.state.keypad = keypad;
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.state.keypad[(key & 0xF) as usize] = true;
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.state.keypad[(key & 0xF) as usize] = false;
    }

    /// Advances the CPU by a single instruction
    /// - fetches the opcode at the pc and moves the pc past it
    /// - decodes and executes the opcode
    /// - ticks both timers down
    ///
    /// A failing instruction leaves the pc on itself and the timers alone.
    pub fn cycle(&mut self) -> Result<()> {
        let op = self.get_op()?;
        trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X} sp{}",
            op,
            self.state.v,
            self.state.i,
            self.state.pc,
            self.state.sp
        );
        self.state.pc += 0x2;

        let instruction = from_op(&op);
        if let Err(e) = instruction(&op, &mut self.state, &mut self.rng) {
            self.state.pc -= 0x2;
            return Err(e);
        }

        self.advance_timers();
        Ok(())
    }

    fn advance_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
        self.state.sound_timer = self.state.sound_timer.saturating_sub(1);
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Result<u16> {
        let pc = self.state.pc as usize;
        if pc + 1 >= MEMORY_SIZE {
            return Err(Error::AddressOutOfBounds {
                address: pc.max(MEMORY_SIZE),
            });
        }
        let left = u16::from(self.state.memory[pc]);
        let right = u16::from(self.state.memory[pc + 1]);
        Ok(left << 8 | right)
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
