//! Species pollination policies.
//!
//! Each species dispatches to a static policy with the same three hooks:
//! what happens when one of its plants becomes grown, the ambient pollination
//! attempt (bee tick or wind pass), and the lone-plant fallback. Matches are
//! made immediately and committed later through scheduled actions. A match
//! reserves its offspring spot until the commit, so no other match can claim
//! it; the commit still re-checks that the spot is empty.

use ahash::AHashSet;
use garden_common::{EffectId, PlantId, PlotId};
use tracing::{debug, info};

use crate::effects::AnimationKind;
use crate::garden::{Garden, GardenAction};
use crate::grid::Grid;
use crate::notifications::NotificationKind;
use crate::plants::{
    resolve_offspring_genetics, OffspringGenetics, ParentSnapshot, Plant, PollinationMode,
    Species,
};
use crate::rng::shuffle;

/// Offspring decided at match time, placed when its connection completes.
#[derive(Debug, Clone)]
pub(crate) struct PendingOffspring {
    pub species: Species,
    pub parents: [ParentSnapshot; 2],
    /// Spot reserved at match time; `None` means the garden was full.
    pub spot: Option<PlotId>,
    pub connection: Option<EffectId>,
    /// Notification when the offspring is neither hybrid nor inbred.
    pub default_kind: NotificationKind,
}

/// Pollination behavior of a species.
pub(crate) trait PollinationPolicy: Sync {
    /// A plant of this species just became grown.
    fn on_grown(&self, garden: &mut Garden, plot: PlotId, plant: PlantId);

    /// Ambient pollination attempt. Returns true if a match was made.
    fn try_ambient(&self, garden: &mut Garden, species: Species) -> bool;

    /// Lone-plant fallback. Returns true if an offspring was produced.
    fn try_self_fallback(&self, garden: &mut Garden, plot: PlotId, plant: PlantId) -> bool;
}

/// Bee-pollinated species (Pumpkin, Sunflower, Apple).
struct BeePollination;

/// Wind-pollinated species (Corn).
struct WindPollination;

/// Self-pollinating species (Bean).
struct Autogamy;

static BEES: BeePollination = BeePollination;
static WIND: WindPollination = WindPollination;
static AUTOGAMY: Autogamy = Autogamy;

/// Policy for a species.
pub(crate) fn policy_for(species: Species) -> &'static dyn PollinationPolicy {
    match species.pollination_mode() {
        PollinationMode::Bees => &BEES,
        PollinationMode::Wind => &WIND,
        PollinationMode::Autogamous => &AUTOGAMY,
    }
}

/// One bee tick: Pumpkin, then Sunflower, and Apple only if neither matched.
pub(crate) fn bee_tick(garden: &mut Garden) {
    let pumpkin = policy_for(Species::Pumpkin).try_ambient(garden, Species::Pumpkin);
    let sunflower = policy_for(Species::Sunflower).try_ambient(garden, Species::Sunflower);
    if !pumpkin && !sunflower {
        policy_for(Species::Apple).try_ambient(garden, Species::Apple);
    }
}

/// Pick a seeker and a partner of a species.
///
/// The seeker is the first grown plant (plot order) that has not reproduced
/// this wave; the partner is another grown plant, unreproduced ones first.
/// Returns `None` without side effects when either is missing.
pub(crate) fn select_mates(
    grid: &Grid,
    reproduced: &AHashSet<PlantId>,
    species: Species,
) -> Option<(PlotId, PlotId)> {
    let grown = grid.grown_of(species);
    let (seeker, _) = grown
        .iter()
        .find(|(_, plant)| !reproduced.contains(&plant.id))?;
    let mut partners: Vec<_> = grown.iter().filter(|(plot, _)| plot != seeker).collect();
    partners.sort_by_key(|(_, plant)| reproduced.contains(&plant.id));
    partners.first().map(|(partner, _)| (*seeker, *partner))
}

impl PollinationPolicy for BeePollination {
    fn on_grown(&self, garden: &mut Garden, plot: PlotId, plant: PlantId) {
        let Some(species) = garden.grid.plant_if(plot, plant).map(|p| p.species) else {
            return;
        };
        if species.can_self_pollinate() {
            garden.scheduler.schedule_in(
                garden.config.self_pollination_delay_ms,
                GardenAction::SelfPollinationFallback { plot, plant },
            );
        }
    }

    fn try_ambient(&self, garden: &mut Garden, species: Species) -> bool {
        if !garden.bees.allows_pollination() {
            return false;
        }
        let Some((seeker, partner)) = select_mates(&garden.grid, &garden.reproduced, species)
        else {
            return false;
        };
        garden.begin_cross_pollination(seeker, partner);
        true
    }

    fn try_self_fallback(&self, garden: &mut Garden, plot: PlotId, plant: PlantId) -> bool {
        if garden.bees.allows_pollination() || garden.reproduced.contains(&plant) {
            return false;
        }
        let Some(parent) = garden.grid.plant_if(plot, plant) else {
            debug!(%plot, "self-pollination target gone, skipping");
            return false;
        };
        let species = parent.species;
        if !species.can_self_pollinate() {
            return false;
        }
        let has_partner = garden
            .grid
            .grown_of(species)
            .iter()
            .any(|(other, p)| *other != plot && !garden.reproduced.contains(&p.id));
        if has_partner {
            return false;
        }

        let snapshot = ParentSnapshot::from(parent);
        let genetics = resolve_offspring_genetics(&snapshot, &snapshot);
        garden.reproduced.insert(plant);
        let Some(spot) = garden.nearest_free_spot(plot) else {
            garden.notify(NotificationKind::NoSpace);
            return false;
        };
        let child = Plant::offspring(species, &[plant, plant], genetics);
        info!(%plot, %spot, species = ?species, "self-pollinated");
        garden.place_plant(spot, child);
        garden.notify(NotificationKind::SelfPollination(species));
        true
    }
}

impl PollinationPolicy for WindPollination {
    fn on_grown(&self, _garden: &mut Garden, plot: PlotId, _plant: PlantId) {
        debug!(%plot, "corn grown, waiting for wind");
    }

    fn try_ambient(&self, garden: &mut Garden, species: Species) -> bool {
        garden.run_wind_pollination(species)
    }

    fn try_self_fallback(&self, _garden: &mut Garden, _plot: PlotId, _plant: PlantId) -> bool {
        false
    }
}

impl PollinationPolicy for Autogamy {
    fn on_grown(&self, garden: &mut Garden, plot: PlotId, plant: PlantId) {
        let effect = garden
            .effects
            .add_animation(AnimationKind::NitrogenFixation, Some(plot));
        garden.scheduler.schedule_in(
            garden.config.nitrogen_fixation_ms,
            GardenAction::NitrogenFixation {
                plot,
                plant,
                effect,
            },
        );
    }

    fn try_ambient(&self, _garden: &mut Garden, _species: Species) -> bool {
        false
    }

    fn try_self_fallback(&self, garden: &mut Garden, plot: PlotId, plant: PlantId) -> bool {
        let Some(species) = garden.grid.plant_if(plot, plant).map(|p| p.species) else {
            debug!(%plot, "bean gone before self-pollination, skipping");
            return false;
        };
        let Some(spot) = garden.nearest_free_spot(plot) else {
            garden.notify(NotificationKind::NoSpace);
            return false;
        };
        let child = Plant::offspring(species, &[plant], OffspringGenetics::default());
        info!(%plot, %spot, "bean self-pollinated");
        garden.place_plant(spot, child);
        garden.notify(NotificationKind::BeanSelfPollination);
        true
    }
}

impl Garden {
    /// Nearest empty plot to `center` that no pending offspring holds.
    fn nearest_free_spot(&self, center: PlotId) -> Option<PlotId> {
        self.grid
            .find_nearest_empty_except(center, |plot| self.reserved.contains(&plot))
    }

    /// Pair two plants of one species and schedule their offspring.
    ///
    /// Both plants count as reproduced from here on. A self-incompatible pair
    /// is rejected on the spot.
    pub(crate) fn begin_cross_pollination(&mut self, seeker: PlotId, partner: PlotId) {
        let (species, parents, related) = match (self.grid.plant(seeker), self.grid.plant(partner)) {
            (Some(a), Some(b)) => (
                a.species,
                [ParentSnapshot::from(a), ParentSnapshot::from(b)],
                a.is_direct_relative(b),
            ),
            _ => return,
        };
        self.reproduced.insert(parents[0].id);
        self.reproduced.insert(parents[1].id);

        if species.is_self_incompatible() && related {
            info!(%seeker, %partner, "pollination rejected, parent and child");
            self.notify(NotificationKind::AppleIncompatibility);
            return;
        }

        let spot = self.nearest_free_spot(seeker);
        if let Some(spot) = spot {
            self.reserved.insert(spot);
        }
        let connection = self.effects.add_connection(seeker, partner, species, false);
        debug!(%seeker, %partner, spot = ?spot, "pollination connection started");
        self.scheduler.schedule_in(
            self.config.bee_connection_ms,
            GardenAction::CommitCrossPollination(PendingOffspring {
                species,
                parents,
                spot,
                connection: Some(connection),
                default_kind: NotificationKind::CrossPollination(species),
            }),
        );
    }

    /// Release the reserved spot and place the offspring if it is still empty.
    pub(crate) fn commit_offspring(&mut self, pending: PendingOffspring) {
        if let Some(connection) = pending.connection {
            self.effects.remove(connection);
        }
        let Some(spot) = pending.spot else {
            self.notify(NotificationKind::NoSpace);
            return;
        };
        self.reserved.remove(&spot);
        if !self.grid.is_empty_plot(spot) {
            debug!(%spot, "offspring spot taken, skipping");
            return;
        }

        let [a, b] = &pending.parents;
        let genetics = resolve_offspring_genetics(a, b);
        let child = Plant::offspring(pending.species, &[a.id, b.id], genetics);
        info!(
            %spot,
            species = ?pending.species,
            hybrid = genetics.is_hybrid,
            inbred = genetics.is_inbreeding,
            "offspring placed"
        );
        self.place_plant(spot, child);

        let kind = if genetics.is_hybrid {
            NotificationKind::Heterosis
        } else if genetics.is_inbreeding {
            NotificationKind::InbreedingDepression
        } else {
            pending.default_kind
        };
        self.notify(kind);
    }

    /// One wind pass: pair up the available plants of a species at random.
    ///
    /// Pairs without a free spot are dropped and stay available for the next
    /// pass. Returns true if at least one pair was made.
    pub(crate) fn run_wind_pollination(&mut self, species: Species) -> bool {
        let mut available: Vec<PlotId> = self
            .grid
            .grown_of(species)
            .into_iter()
            .filter(|(_, plant)| !self.reproduced.contains(&plant.id))
            .map(|(plot, _)| plot)
            .collect();
        if available.len() < 2 {
            return false;
        }
        shuffle(self.rng.as_mut(), &mut available);

        let mut batch = Vec::new();
        for pair in available.chunks_exact(2) {
            let (first, second) = (pair[0], pair[1]);
            let mut candidates: Vec<PlotId> = Vec::new();
            for plot in self
                .grid
                .neighbors8(first)
                .into_iter()
                .chain(self.grid.neighbors8(second))
            {
                if self.grid.is_empty_plot(plot)
                    && !self.reserved.contains(&plot)
                    && !candidates.contains(&plot)
                {
                    candidates.push(plot);
                }
            }
            let spot = if candidates.is_empty() {
                self.grid
                    .empty_plots()
                    .into_iter()
                    .find(|plot| !self.reserved.contains(plot))
            } else {
                Some(candidates[self.rng.next_index(candidates.len())])
            };
            let Some(spot) = spot else {
                debug!(%first, %second, "no spot for pair, dropped");
                continue;
            };

            let (Some(a), Some(b)) = (self.grid.plant(first), self.grid.plant(second)) else {
                continue;
            };
            let parents = [ParentSnapshot::from(a), ParentSnapshot::from(b)];
            self.reserved.insert(spot);
            self.reproduced.insert(parents[0].id);
            self.reproduced.insert(parents[1].id);
            let connection = self.effects.add_connection(first, second, species, true);
            batch.push(PendingOffspring {
                species,
                parents,
                spot: Some(spot),
                connection: Some(connection),
                default_kind: NotificationKind::CornPollination,
            });
        }

        if batch.is_empty() {
            self.notify(NotificationKind::NoSpace);
            return false;
        }
        info!(pairs = batch.len(), species = ?species, "wind pollination");
        self.scheduler.schedule_in(
            self.config.corn_connection_ms,
            GardenAction::CommitCornPollination(batch),
        );
        true
    }
}
