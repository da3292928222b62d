//! Bee presence state machine.
//!
//! Bees show up while a grown sunflower is in the garden (or the user calls
//! them manually) and die off when chemical fertilizer is used. Dying always
//! ends in Hidden after a fixed delay; bees only come back once the pesticide
//! is gone.

use serde::{Deserialize, Serialize};

/// Pollinator visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BeeState {
    /// No bees around.
    #[default]
    Hidden,
    /// Bees are active and pollinating.
    Visible,
    /// Bees poisoned by pesticide, about to disappear.
    Dying,
}

/// Garden conditions the bee state is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeeConditions {
    /// Any plot has chemical fertilizer.
    pub pesticide: bool,
    /// A grown sunflower is present.
    pub flowers: bool,
    /// The user enabled bees manually.
    pub manual: bool,
}

impl BeeConditions {
    /// Something is attracting bees.
    #[must_use]
    pub fn attracts_bees(&self) -> bool {
        self.flowers || self.manual
    }
}

impl BeeState {
    /// Compute the next state for the given conditions.
    ///
    /// `Dying` is left alone here; only the death timer moves it to `Hidden`.
    #[must_use]
    pub fn next(self, conditions: BeeConditions) -> Self {
        match self {
            Self::Visible if conditions.pesticide => Self::Dying,
            Self::Visible if !conditions.attracts_bees() => Self::Hidden,
            Self::Hidden if !conditions.pesticide && conditions.attracts_bees() => Self::Visible,
            state => state,
        }
    }

    /// Bees can pollinate in this state.
    #[must_use]
    pub fn allows_pollination(self) -> bool {
        self == Self::Visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOWERS: BeeConditions = BeeConditions {
        pesticide: false,
        flowers: true,
        manual: false,
    };

    #[test]
    fn test_hidden_to_visible() {
        assert_eq!(BeeState::Hidden.next(FLOWERS), BeeState::Visible);
        let manual = BeeConditions {
            manual: true,
            ..BeeConditions::default()
        };
        assert_eq!(BeeState::Hidden.next(manual), BeeState::Visible);
        assert_eq!(BeeState::Hidden.next(BeeConditions::default()), BeeState::Hidden);
    }

    #[test]
    fn test_visible_to_dying_on_pesticide() {
        let poisoned = BeeConditions {
            pesticide: true,
            ..FLOWERS
        };
        assert_eq!(BeeState::Visible.next(poisoned), BeeState::Dying);
    }

    #[test]
    fn test_visible_to_hidden_without_attraction() {
        assert_eq!(BeeState::Visible.next(BeeConditions::default()), BeeState::Hidden);
        assert_eq!(BeeState::Visible.next(FLOWERS), BeeState::Visible);
    }

    #[test]
    fn test_dying_is_sticky() {
        assert_eq!(BeeState::Dying.next(FLOWERS), BeeState::Dying);
        assert_eq!(BeeState::Dying.next(BeeConditions::default()), BeeState::Dying);
    }

    #[test]
    fn test_pesticide_keeps_bees_away() {
        let poisoned = BeeConditions {
            pesticide: true,
            ..FLOWERS
        };
        assert_eq!(BeeState::Hidden.next(poisoned), BeeState::Hidden);
    }

    #[test]
    fn test_only_visible_pollinates() {
        assert!(BeeState::Visible.allows_pollination());
        assert!(!BeeState::Hidden.allows_pollination());
        assert!(!BeeState::Dying.allows_pollination());
    }
}
