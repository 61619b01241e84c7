use std::ops::Range;

use rand::{Rng, RngCore};

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, PIXEL_OFF, PIXEL_ON, SPRITE_HEIGHT,
    SPRITE_SHEET_START, STACK_DEPTH,
};
use crate::error::{Error, Result};
use crate::opcode::Opcode;
use crate::state::State;

// Every operation runs after the pc has already been bumped past the opcode,
// so "skip" means one more bump and jumps simply overwrite it.

/// The memory addresses start..start+len, if they all exist.
fn span(start: u16, len: usize) -> Result<Range<usize>> {
    let start = usize::from(start);
    if len == 0 {
        return Ok(0..0);
    }
    if start + len > MEMORY_SIZE {
        return Err(Error::AddressOutOfBounds {
            address: start.max(MEMORY_SIZE),
        });
    }
    Ok(start..start + len)
}

fn skip_if(state: &mut State, condition: bool) {
    if condition {
        state.pc += 0x2;
    }
}

/// does nothing; unassigned opcodes land here
pub fn nop(_op: &dyn Opcode, _state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    Ok(())
}

/// clear
pub fn clr(_op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.frame_buffer = [[PIXEL_OFF; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.draw_flag = true;
    Ok(())
}

/// PC = STACK.pop()
pub fn rts(_op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    if state.sp == 0 {
        return Err(Error::StackUnderflow);
    }
    state.sp -= 1;
    state.pc = state.stack[state.sp as usize];
    Ok(())
}

/// PC = addr
pub fn jump(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.pc = op.addr();
    Ok(())
}

/// STACK.push(PC); PC = addr
pub fn call(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let sp = state.sp as usize;
    if sp == STACK_DEPTH {
        return Err(Error::StackOverflow { address: op.addr() });
    }
    state.stack[sp] = state.pc;
    state.sp += 1;
    state.pc = op.addr();
    Ok(())
}

/// if Vx == kk then pc += 2
pub fn ske(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let condition = state.v[op.x()] == op.kk();
    skip_if(state, condition);
    Ok(())
}

/// if Vx != kk then pc += 2
pub fn skne(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let condition = state.v[op.x()] != op.kk();
    skip_if(state, condition);
    Ok(())
}

/// if Vx == Vy then pc += 2
pub fn skre(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let condition = state.v[op.x()] == state.v[op.y()];
    skip_if(state, condition);
    Ok(())
}

/// Vx = kk
pub fn load(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.v[op.x()] = op.kk();
    Ok(())
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.v[op.x()] = state.v[op.x()].wrapping_add(op.kk());
    Ok(())
}

/// Vx = Vy
pub fn mv(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.v[op.x()] = state.v[op.y()];
    Ok(())
}

/// Vx |= Vy
pub fn or(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.v[op.x()] |= state.v[op.y()];
    Ok(())
}

/// Vx &= Vy
pub fn and(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.v[op.x()] &= state.v[op.y()];
    Ok(())
}

/// Vx ^= Vy
pub fn xor(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.v[op.x()] ^= state.v[op.y()];
    Ok(())
}

/// Vx += Vy; VF = overflow
pub fn addr(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let (res, over) = state.v[op.x()].overflowing_add(state.v[op.y()]);
    state.v[0xF] = over as u8;
    state.v[op.x()] = res;
    Ok(())
}

/// Vx -= Vy; VF = Vx > Vy
pub fn sub(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let (vx, vy) = (state.v[op.x()], state.v[op.y()]);
    state.v[0xF] = (vx > vy) as u8;
    state.v[op.x()] = vx.wrapping_sub(vy);
    Ok(())
}

/// Vx >>= 1; VF = shifted out bit
pub fn shr(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let vx = state.v[op.x()];
    state.v[0xF] = vx & 0x1;
    state.v[op.x()] = vx >> 1;
    Ok(())
}

/// Vx = Vy - Vx; VF = Vy > Vx
pub fn subn(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let (vx, vy) = (state.v[op.x()], state.v[op.y()]);
    state.v[0xF] = (vy > vx) as u8;
    state.v[op.x()] = vy.wrapping_sub(vx);
    Ok(())
}

/// Vx <<= 1; VF = shifted out bit
pub fn shl(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let vx = state.v[op.x()];
    state.v[0xF] = vx >> 7;
    state.v[op.x()] = vx << 1;
    Ok(())
}

/// if Vx != Vy then pc +=2
pub fn skrne(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let condition = state.v[op.x()] != state.v[op.y()];
    skip_if(state, condition);
    Ok(())
}

/// I = addr
pub fn loadi(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.i = op.addr();
    Ok(())
}

/// PC = V0 + addr
pub fn jumpi(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.pc = u16::from(state.v[0x0]) + op.addr();
    Ok(())
}

/// Vx = rand_byte & kk
pub fn rand(op: &dyn Opcode, state: &mut State, rng: &mut dyn RngCore) -> Result<()> {
    let rand_byte: u8 = rng.gen();
    state.v[op.x()] = rand_byte & op.kk();
    Ok(())
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer.
///
/// The origin wraps onto the screen and each pixel wraps independently, so a
/// sprite hanging off an edge reappears on the opposite one.
/// Sets VF if any pixels were erased.
pub fn draw(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let rows = span(state.i, op.n() as usize)?;
    let origin_x = state.v[op.x()] as usize % DISPLAY_WIDTH;
    let origin_y = state.v[op.y()] as usize % DISPLAY_HEIGHT;

    // Reset the carry flag (used for collision detection)
    state.v[0xF] = 0x0;

    let mut collision = false;
    for (row, &sprite_byte) in state.memory[rows].iter().enumerate() {
        let y = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8usize {
            if sprite_byte & (0x80u8 >> bit) == 0 {
                continue;
            }
            let x = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel = &mut state.frame_buffer[y][x];
            collision |= *pixel == PIXEL_ON;
            *pixel ^= PIXEL_ON;
        }
    }

    state.v[0xF] = collision as u8;
    state.draw_flag = true;
    Ok(())
}

/// if Vx.pressed then pc += 2
pub fn skpr(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let condition = state.keypad[(state.v[op.x()] & 0xF) as usize];
    skip_if(state, condition);
    Ok(())
}

/// if !Vx.pressed then pc += 2
pub fn skup(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let condition = !state.keypad[(state.v[op.x()] & 0xF) as usize];
    skip_if(state, condition);
    Ok(())
}

/// Vx = DT
pub fn getdt(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.v[op.x()] = state.delay_timer;
    Ok(())
}

/// await keypress for Vx
/// Re-runs itself every cycle until a key is down, then stores the lowest one.
pub fn keyd(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    match state.keypad.iter().position(|&pressed| pressed) {
        Some(key) => state.v[op.x()] = key as u8,
        None => state.pc -= 0x2,
    }
    Ok(())
}

/// DT = Vx
pub fn setdt(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.delay_timer = state.v[op.x()];
    Ok(())
}

/// ST = Vx
pub fn setst(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.sound_timer = state.v[op.x()];
    Ok(())
}

/// I += Vx
pub fn addi(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    state.i = state.i.wrapping_add(u16::from(state.v[op.x()]));
    Ok(())
}

/// I = &SPRITE_SHEET[Vx]
/// Set I to the memory address of the sprite for the hex digit in Vx
pub fn ldspr(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let digit = (state.v[op.x()] & 0xF) as usize;
    state.i = (SPRITE_SHEET_START + SPRITE_HEIGHT * digit) as u16;
    Ok(())
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let target = span(state.i, 3)?;
    let vx = state.v[op.x()];
    state.memory[target].copy_from_slice(&[vx / 100, vx / 10 % 10, vx % 10]);
    Ok(())
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let target = span(state.i, op.x() + 1)?;
    state.memory[target].copy_from_slice(&state.v[..=op.x()]);
    Ok(())
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(op: &dyn Opcode, state: &mut State, _rng: &mut dyn RngCore) -> Result<()> {
    let source = span(state.i, op.x() + 1)?;
    state.v[..=op.x()].copy_from_slice(&state.memory[source]);
    Ok(())
}
