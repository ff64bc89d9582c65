//! Prisoner exchange.
//!
//! A player proposes by moving captives into their trade pool. The
//! responder must put up an offer at least as large as the best they could
//! assemble without exceeding the proposal.

use crate::board::Board;
use crate::core::PlayerId;

/// The largest subset sum of `values` that does not exceed `ask`, or 0.
///
/// Enumerates every subset; pools hold at most one player's pieces.
#[must_use]
pub fn largest_subset_below(ask: u32, values: &[u32]) -> u32 {
    debug_assert!(values.len() < 32);
    let mut best = 0;
    for mask in 0u32..(1 << values.len()) {
        let sum: u32 = values
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, v)| v)
            .sum();
        if sum <= ask && sum > best {
            best = sum;
            if best == ask {
                break;
            }
        }
    }
    best
}

/// Point values of everything `player` holds in captive and trade pools.
fn held_values(board: &Board, player: PlayerId) -> Vec<u32> {
    board
        .captive_pieces(player)
        .into_iter()
        .chain(board.trade_pieces(player))
        .map(|p| board.piece(p).value())
        .collect()
}

/// The player to move has matched the other side's offer as closely as
/// their holdings allow.
#[must_use]
pub fn exchange_is_legal(board: &Board) -> bool {
    let mover = board.whose_turn();
    let offer = board.trade_value(mover);
    let ask = board.trade_value(mover.opponent());
    offer >= largest_subset_below(ask, &held_values(board, mover))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_largest_subset_below() {
        assert_eq!(largest_subset_below(7, &[5, 3, 3]), 6);
        assert_eq!(largest_subset_below(8, &[5, 3, 3]), 8);
        assert_eq!(largest_subset_below(2, &[5, 3]), 0);
        assert_eq!(largest_subset_below(0, &[1]), 0);
        assert_eq!(largest_subset_below(10, &[]), 0);
    }

    #[test]
    fn test_nothing_offered_is_legal_with_no_ask() {
        let board = Board::new(crate::core::PlateauConfig::default()).unwrap();
        assert!(exchange_is_legal(&board));
    }
}
