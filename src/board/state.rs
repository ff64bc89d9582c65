//! Turn states.
//!
//! The state tag is pure data. Human-readable prompts belong to whatever
//! presents the game and are not part of the engine.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlateauState {
    // Initial two-piece placement.
    Onboard2,
    Onboard2Drop,
    Rack2Drop,
    Onboard2Done,

    // Steady play.
    Play,
    Flipped,
    OnboardDrop,
    RackDrop,
    OnboardDone,

    // A stack crossing the board.
    PlayDrop,
    PlayDone,
    PlayUndone,
    PlayCapture,

    // Prisoner exchange.
    Exchange,
    CaptiveShuffle,
    ExchangeDone,

    // Terminal or near-terminal.
    GameOver,
    Resign,
    Draw,
}

impl PlateauState {
    pub const ALL: [PlateauState; 19] = [
        PlateauState::Onboard2,
        PlateauState::Onboard2Drop,
        PlateauState::Rack2Drop,
        PlateauState::Onboard2Done,
        PlateauState::Play,
        PlateauState::Flipped,
        PlateauState::OnboardDrop,
        PlateauState::RackDrop,
        PlateauState::OnboardDone,
        PlateauState::PlayDrop,
        PlateauState::PlayDone,
        PlateauState::PlayUndone,
        PlateauState::PlayCapture,
        PlateauState::Exchange,
        PlateauState::CaptiveShuffle,
        PlateauState::ExchangeDone,
        PlateauState::GameOver,
        PlateauState::Resign,
        PlateauState::Draw,
    ];

    /// Stable ordinal, mixed into the digest.
    #[must_use]
    pub fn ordinal(self) -> u64 {
        self as u64
    }

    /// States in which `Done` ends the current step.
    #[must_use]
    pub fn is_done_state(self) -> bool {
        matches!(
            self,
            PlateauState::Resign
                | PlateauState::Onboard2Done
                | PlateauState::OnboardDone
                | PlateauState::PlayDone
                | PlateauState::PlayCapture
                | PlateauState::Draw
                | PlateauState::ExchangeDone
                | PlateauState::CaptiveShuffle
        )
    }

    /// A pick from the rack is in hand.
    #[must_use]
    pub fn is_rack_drop(self) -> bool {
        matches!(
            self,
            PlateauState::Onboard2Drop
                | PlateauState::Rack2Drop
                | PlateauState::OnboardDrop
                | PlateauState::RackDrop
        )
    }

    /// Part of the initial placement round.
    #[must_use]
    pub fn is_initial_placement(self) -> bool {
        matches!(
            self,
            PlateauState::Onboard2
                | PlateauState::Onboard2Drop
                | PlateauState::Rack2Drop
                | PlateauState::Onboard2Done
        )
    }

    #[must_use]
    pub fn is_exchange(self) -> bool {
        matches!(
            self,
            PlateauState::Exchange | PlateauState::CaptiveShuffle | PlateauState::ExchangeDone
        )
    }

    #[must_use]
    pub fn is_game_over(self) -> bool {
        self == PlateauState::GameOver
    }
}
