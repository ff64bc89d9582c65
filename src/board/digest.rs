//! Position digest.
//!
//! A Zobrist-style hash over where every piece is and which way up it lies,
//! plus the state and the player to move. The random draws come from a
//! generator re-seeded on every call, so two boards with the same layout
//! produce the same digest regardless of how they got there.
//!
//! What observers know about pieces is not part of the digest.

use super::board::Board;
use crate::core::{GameRng, PlayerId};
use crate::pieces::Piece;
use crate::stacks::Stack;

const DIGEST_SEED: u64 = 0x5a1e_0f_c0ffee;
const FLIP_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Key for a piece sitting at `height` in some stack.
fn piece_key(piece: &Piece, height: usize) -> u64 {
    let salt = if piece.is_flipped() { FLIP_SALT } else { 0 };
    (piece.tag() ^ salt).rotate_left((height * 7 % 64) as u32)
}

fn stack_keys(stack: &Stack, table: &[Piece], offset: usize) -> u64 {
    stack
        .pieces()
        .iter()
        .enumerate()
        .fold(0, |acc, (h, p)| acc ^ piece_key(&table[p.index()], offset + h))
}

impl Board {
    /// Hash of the full position.
    #[must_use]
    pub fn digest(&self) -> u64 {
        let mut rng = GameRng::new(DIGEST_SEED);
        let table = self.pieces();
        let mut v = 0u64;

        for stack in self.board_stacks() {
            let cell_draw = rng.next_u64();
            let salt = rng.next_u64();
            v ^= cell_draw.wrapping_add(salt ^ stack_keys(stack, table, 0));
        }

        let groups: [Vec<&Stack>; 4] = [
            PlayerId::all().flat_map(move |p| self.rack_stacks(p)).collect(),
            PlayerId::all().flat_map(move |p| self.captive_stacks(p)).collect(),
            PlayerId::all().flat_map(move |p| self.trade_stacks(p)).collect(),
            self.picked_stacks().collect(),
        ];
        for group in &groups {
            let keys = group
                .iter()
                .enumerate()
                .fold(0u64, |acc, (slot, s)| acc ^ stack_keys(s, table, slot * 3));
            v ^= rng.next_u64().wrapping_add(keys);
        }

        let turn = self.state().ordinal() * 10 + self.whose_turn().index() as u64 + 1;
        v ^= rng.next_u64().wrapping_mul(turn);
        v
    }
}
