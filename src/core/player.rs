//! The two seats and per-seat storage.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Plateau always has exactly two players.
pub const PLAYER_COUNT: usize = 2;

/// A seat at the board. `P0` places the first initial stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Both seats, `P0` first.
    ///
    /// ```
    /// use plateau_engine::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all().map(|p| p.to_string()).collect();
    /// assert_eq!(seats, ["P0", "P1"]);
    /// ```
    pub fn all() -> impl Iterator<Item = PlayerId> {
        (0..PLAYER_COUNT as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// One value per seat, indexed by `PlayerId`. Array-backed, so a map of
/// `Copy` values is itself `Copy`.
///
/// ```
/// use plateau_engine::core::{PlayerId, PlayerMap};
///
/// let mut min_offer: PlayerMap<u32> = PlayerMap::with_value(0);
/// min_offer[PlayerId::new(1)] = 4;
/// assert_eq!(min_offer[PlayerId::new(0)], 0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: [T; PLAYER_COUNT],
}

impl<T> PlayerMap<T> {
    pub fn new(per_seat: impl Fn(PlayerId) -> T) -> Self {
        Self {
            seats: [per_seat(PlayerId(0)), per_seat(PlayerId(1))],
        }
    }

    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all().zip(self.seats.iter())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        &self.seats[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.seats[player.index()]
    }
}
