//! Visual effect descriptors consumed by the presentation layer.
//!
//! The engine only records which effects are active; timing of their removal
//! follows the scheduled actions that created them.

use garden_common::{EffectId, PlotId};
use serde::{Deserialize, Serialize};

use crate::plants::Species;

/// Pollen line drawn between two plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Effect id.
    pub id: EffectId,
    /// Seeker plot (pollen source).
    pub from: PlotId,
    /// Partner plot.
    pub to: PlotId,
    /// Species being pollinated.
    pub species: Species,
    /// Drawn in both directions (wind) rather than from seeker to partner (bees).
    pub bidirectional: bool,
}

/// Kind of animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationKind {
    /// Bean roots fixing nitrogen.
    NitrogenFixation,
    /// Harvested bean turning into green manure.
    GreenManure,
    /// Bees dying from pesticide.
    BeeDeath,
}

/// Animation playing on a plot or on the whole garden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    /// Effect id.
    pub id: EffectId,
    /// Plot the animation is anchored to (None = whole garden).
    pub plot: Option<PlotId>,
    /// Animation kind.
    pub kind: AnimationKind,
}

/// Active connections and animations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualEffects {
    connections: Vec<Connection>,
    animations: Vec<Animation>,
    #[serde(skip)]
    next_id: u64,
}

impl VisualEffects {
    /// Create an empty effect set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> EffectId {
        let id = EffectId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Show a pollen connection.
    pub fn add_connection(
        &mut self,
        from: PlotId,
        to: PlotId,
        species: Species,
        bidirectional: bool,
    ) -> EffectId {
        let id = self.next_id();
        self.connections.push(Connection {
            id,
            from,
            to,
            species,
            bidirectional,
        });
        id
    }

    /// Start an animation.
    pub fn add_animation(&mut self, kind: AnimationKind, plot: Option<PlotId>) -> EffectId {
        let id = self.next_id();
        self.animations.push(Animation { id, plot, kind });
        id
    }

    /// Remove an effect. Returns false if it was not active.
    pub fn remove(&mut self, id: EffectId) -> bool {
        let before = self.connections.len() + self.animations.len();
        self.connections.retain(|c| c.id != id);
        self.animations.retain(|a| a.id != id);
        before != self.connections.len() + self.animations.len()
    }

    /// Active connections.
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Active animations.
    #[must_use]
    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    /// Check if nothing is playing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty() && self.animations.is_empty()
    }
}
