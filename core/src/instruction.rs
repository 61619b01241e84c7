use rand::RngCore;

use crate::error::Result;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// Carries out one decoded instruction against the machine state.
pub type Operation = fn(op: &dyn Opcode, state: &mut State, rng: &mut dyn RngCore) -> Result<()>;

/// Selects the correct Instruction for a given Opcode
///
/// The most significant nibble picks the instruction family. Families that
/// share a leading nibble across several instructions (0, 8, E and F) select
/// again on their trailing nibble or byte. Anything left unassigned is a `nop`.
pub fn from_op(op: &dyn Opcode) -> Operation {
    match op.family() {
        0x0 => family_0(op),
        0x1 => jump,
        0x2 => call,
        0x3 => ske,
        0x4 => skne,
        0x5 => skre,
        0x6 => load,
        0x7 => add,
        0x8 => family_8(op),
        0x9 => skrne,
        0xA => loadi,
        0xB => jumpi,
        0xC => rand,
        0xD => draw,
        0xE => family_e(op),
        _ => family_f(op),
    }
}

/// `[___n]`
fn family_0(op: &dyn Opcode) -> Operation {
    match op.n() {
        0x0 => clr,
        0xE => rts,
        _ => nop,
    }
}

/// `[8xyn]`
fn family_8(op: &dyn Opcode) -> Operation {
    match op.n() {
        0x0 => mv,
        0x1 => or,
        0x2 => and,
        0x3 => xor,
        0x4 => addr,
        0x5 => sub,
        0x6 => shr,
        0x7 => subn,
        0xE => shl,
        _ => nop,
    }
}

/// `[Ex_n]`
fn family_e(op: &dyn Opcode) -> Operation {
    match op.n() {
        0xE => skpr,
        0x1 => skup,
        _ => nop,
    }
}

/// `[Fxkk]`
fn family_f(op: &dyn Opcode) -> Operation {
    match op.kk() {
        0x07 => getdt,
        0x0A => keyd,
        0x15 => setdt,
        0x18 => setst,
        0x1E => addi,
        0x29 => ldspr,
        0x33 => bcd,
        0x55 => stor,
        0x65 => read,
        _ => nop,
    }
}
