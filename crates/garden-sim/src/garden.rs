//! Central simulation context.
//!
//! This module provides the `Garden` struct, the single owner of all
//! simulation state. User commands and scheduled actions are the only paths
//! that mutate it. Every scheduled action re-validates the state it captured
//! (same plant on the plot, spot still empty, plant not yet reproduced) and
//! silently does nothing when the garden moved on in the meantime.

use ahash::{AHashMap, AHashSet};
use garden_common::{EffectId, GardenError, GardenResult, PlantId, PlotId};
use std::collections::VecDeque;
use tracing::{debug, info};

use crate::bees::{BeeConditions, BeeState};
use crate::config::SimConfig;
use crate::effects::{AnimationKind, VisualEffects};
use crate::grid::Grid;
use crate::inventory::Inventory;
use crate::notifications::{Notification, NotificationKind, NotificationLog};
use crate::plants::{GrowthStage, Plant, Species};
use crate::pollination::{self, PendingOffspring};
use crate::rng::{FastRandom, RandomSource};
use crate::scheduler::{Scheduler, TimerId};
use crate::snapshot::GardenSnapshot;
use crate::tools::{Command, Tool};
use crate::weather::{Forecast, Weather, WeatherTransition};

/// Deferred work processed by the scheduler.
#[derive(Debug, Clone)]
pub(crate) enum GardenAction {
    /// Watered sprout finished growing.
    GrowthComplete {
        /// Plot of the sprout.
        plot: PlotId,
        /// Sprout instance.
        plant: PlantId,
    },
    /// Lone pumpkin/sunflower may pollinate itself.
    SelfPollinationFallback {
        /// Plot of the plant.
        plot: PlotId,
        /// Plant instance.
        plant: PlantId,
    },
    /// Periodic bee pollination attempt.
    BeeTick,
    /// Dying bees disappear.
    BeeDeath {
        /// Death animation to stop.
        effect: EffectId,
    },
    /// Bee or hand pollination connection finished.
    CommitCrossPollination(PendingOffspring),
    /// Periodic corn pollination pass while windy.
    CornWindTick,
    /// Corn connections finished.
    CommitCornPollination(Vec<PendingOffspring>),
    /// Bean finished fixing nitrogen.
    NitrogenFixation {
        /// Plot of the bean.
        plot: PlotId,
        /// Bean instance.
        plant: PlantId,
        /// Animation to stop.
        effect: EffectId,
    },
    /// Bean pollinates itself.
    BeanSelfPollination {
        /// Plot of the bean.
        plot: PlotId,
        /// Bean instance.
        plant: PlantId,
    },
    /// Green manure reaches the plots occupied at harvest time.
    GreenManure {
        /// Plots and the plants they held at harvest.
        targets: Vec<(PlotId, PlantId)>,
        /// Animation to stop.
        effect: EffectId,
    },
    /// Automatic forecast advance.
    AutoWeather,
}

/// The garden simulation.
#[derive(Debug)]
pub struct Garden {
    pub(crate) config: SimConfig,
    pub(crate) grid: Grid,
    pub(crate) forecast: Forecast,
    pub(crate) bees: BeeState,
    pub(crate) manual_bees: bool,
    pub(crate) tool: Option<Tool>,
    /// First click of a hand pollination.
    pub(crate) pollination_source: Option<(PlotId, PlantId)>,
    /// Plants that already reproduced in the current wave.
    pub(crate) reproduced: AHashSet<PlantId>,
    /// Offspring spots held by matches waiting to commit.
    pub(crate) reserved: AHashSet<PlotId>,
    /// Bumped after every bee pollination attempt.
    pub(crate) reproduction_trigger: u64,
    /// Growth timers in flight, keyed by plot.
    pub(crate) growing: AHashMap<PlotId, TimerId>,
    /// Plants that just became grown, waiting for their pollination policy.
    pub(crate) newly_grown: VecDeque<(PlotId, PlantId)>,
    pub(crate) bee_timer: Option<TimerId>,
    pub(crate) wind_timer: Option<TimerId>,
    pub(crate) scheduler: Scheduler<GardenAction>,
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) notifications: NotificationLog,
    pub(crate) inventory: Inventory,
    pub(crate) effects: VisualEffects,
}

impl Default for Garden {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl Garden {
    /// Create a garden seeded from `config.seed`.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        let rng = Box::new(FastRandom::new(config.seed));
        Self::with_rng(config, rng)
    }

    /// Create a garden with an explicit random source.
    #[must_use]
    pub fn with_rng(mut config: SimConfig, mut rng: Box<dyn RandomSource>) -> Self {
        config.validate();
        let forecast = Forecast::new(&config.weather_weights, rng.as_mut());
        let mut garden = Self {
            config,
            grid: Grid::new(),
            forecast,
            bees: BeeState::Hidden,
            manual_bees: false,
            tool: None,
            pollination_source: None,
            reproduced: AHashSet::new(),
            reserved: AHashSet::new(),
            reproduction_trigger: 0,
            growing: AHashMap::new(),
            newly_grown: VecDeque::new(),
            bee_timer: None,
            wind_timer: None,
            scheduler: Scheduler::new(),
            rng,
            notifications: NotificationLog::new(),
            inventory: Inventory::new(),
            effects: VisualEffects::new(),
        };
        if let Some(interval) = garden.config.auto_weather_interval_ms {
            garden.scheduler.schedule_in(interval, GardenAction::AutoWeather);
        }
        garden
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current model time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// The plot grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current weather.
    #[must_use]
    pub fn weather(&self) -> Weather {
        self.forecast.current()
    }

    /// Current weather and upcoming forecast.
    #[must_use]
    pub fn forecast(&self) -> &Forecast {
        &self.forecast
    }

    /// Bee presence.
    #[must_use]
    pub fn bee_state(&self) -> BeeState {
        self.bees
    }

    /// Manual bee mode.
    #[must_use]
    pub fn manual_bees(&self) -> bool {
        self.manual_bees
    }

    /// Selected tool.
    #[must_use]
    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    /// Plot picked as source of a hand pollination.
    #[must_use]
    pub fn pollination_source(&self) -> Option<PlotId> {
        self.pollination_source.map(|(plot, _)| plot)
    }

    /// Active visual effects.
    #[must_use]
    pub fn effects(&self) -> &VisualEffects {
        &self.effects
    }

    /// Harvest inventory.
    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Notification log.
    #[must_use]
    pub fn notifications(&self) -> &NotificationLog {
        &self.notifications
    }

    /// Reproduction trigger counter.
    #[must_use]
    pub fn reproduction_trigger(&self) -> u64 {
        self.reproduction_trigger
    }

    /// Check if a plant already reproduced in the current wave.
    #[must_use]
    pub fn has_reproduced(&self, plant: PlantId) -> bool {
        self.reproduced.contains(&plant)
    }

    /// Check if a plot has a growth timer in flight.
    #[must_use]
    pub fn is_growing(&self, plot: PlotId) -> bool {
        self.growing.contains_key(&plot)
    }

    /// Check if a plot is held for an offspring still in flight.
    #[must_use]
    pub fn is_reserved(&self, plot: PlotId) -> bool {
        self.reserved.contains(&plot)
    }

    /// Number of scheduled actions still pending.
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Serializable view of the whole garden.
    #[must_use]
    pub fn snapshot(&self) -> GardenSnapshot {
        GardenSnapshot::capture(self)
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Execute a user command.
    pub fn execute(&mut self, command: Command) -> GardenResult<()> {
        match command {
            Command::SelectTool(tool) => self.select_tool(tool),
            Command::ClearTool => self.clear_tool(),
            Command::ClickPlot(plot) => self.click_plot(plot)?,
            Command::ToggleManualBees => {
                self.toggle_manual_bees();
            },
            Command::AdvanceWeather => {
                self.advance_weather();
            },
            Command::DismissNotification => {
                self.dismiss_notification();
            },
            Command::OpenHistory => self.open_history(),
        }
        Ok(())
    }

    /// Select a tool. Any half-finished hand pollination is abandoned.
    pub fn select_tool(&mut self, tool: Tool) {
        debug!(tool = ?tool, "tool selected");
        self.tool = Some(tool);
        self.pollination_source = None;
    }

    /// Put the current tool away.
    pub fn clear_tool(&mut self) {
        self.tool = None;
        self.pollination_source = None;
    }

    /// Use the selected tool on a plot. Without a tool this does nothing.
    pub fn click_plot(&mut self, plot: PlotId) -> GardenResult<()> {
        self.grid.check(plot)?;
        let Some(tool) = self.tool else {
            debug!(%plot, "click without tool ignored");
            return Ok(());
        };

        match tool {
            Tool::Seed(species) => self.plant_seed(plot, species),
            Tool::WateringCan => self.water(plot),
            Tool::OrganicFertilizer => self.fertilize(plot, false),
            Tool::ChemicalFertilizer => self.fertilize(plot, true),
            Tool::Harvest => self.harvest(plot),
            Tool::Pollinate => self.hand_pollinate(plot),
        }
        self.settle();
        Ok(())
    }

    /// Toggle manual bee mode. Returns the new setting.
    pub fn toggle_manual_bees(&mut self) -> bool {
        self.manual_bees = !self.manual_bees;
        info!(manual = self.manual_bees, "manual bees toggled");
        self.settle();
        self.manual_bees
    }

    /// Advance the forecast one step and apply the weather side effects.
    pub fn advance_weather(&mut self) -> WeatherTransition {
        let transition = self
            .forecast
            .advance(&self.config.weather_weights, self.rng.as_mut());
        info!(
            from = ?transition.previous,
            to = ?transition.current,
            "weather advanced"
        );

        if transition.rain_started() {
            self.start_rain();
        }
        if transition.rain_stopped() {
            for plot in self.grid.iter_mut() {
                plot.is_watered = false;
            }
        }
        if transition.wind_started() {
            self.start_wind();
        }
        if transition.wind_stopped() {
            self.stop_wind();
        }

        self.settle();
        transition
    }

    /// Dismiss the notification on screen.
    pub fn dismiss_notification(&mut self) -> Option<Notification> {
        let now = self.now();
        self.notifications.dismiss(now)
    }

    /// Open the notification history, marking everything read.
    pub fn open_history(&mut self) {
        self.notifications.open_history();
    }

    // ------------------------------------------------------------------
    // Scenario setup
    // ------------------------------------------------------------------

    /// Place a plant directly on an empty plot.
    ///
    /// A grown plant is handed to its pollination policy as if it had just
    /// grown; a sprout on a watered plot starts growing.
    pub fn insert_plant(&mut self, plot: PlotId, plant: Plant) -> GardenResult<()> {
        if !self.grid.plot(plot)?.is_empty() {
            return Err(GardenError::PlotOccupied(plot));
        }
        self.place_plant(plot, plant);
        self.settle();
        Ok(())
    }

    /// Replace the forecast (current weather is set without side effects).
    pub fn set_forecast(&mut self, forecast: Forecast) {
        self.forecast = forecast;
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Run every action due within the next `ms` milliseconds.
    pub fn advance_by(&mut self, ms: u64) {
        let until = self.now().saturating_add(ms);
        self.run_until(until);
    }

    /// Run every action due at or before `time`, then move the clock there.
    pub fn run_until(&mut self, time: u64) {
        while let Some((_, action)) = self.scheduler.pop_due(time) {
            self.dispatch(action);
            self.settle();
        }
        self.scheduler.advance_clock(time);
    }

    fn dispatch(&mut self, action: GardenAction) {
        match action {
            GardenAction::GrowthComplete { plot, plant } => self.complete_growth(plot, plant),
            GardenAction::SelfPollinationFallback { plot, plant } => {
                if let Some(species) = self.grid.plant_if(plot, plant).map(|p| p.species) {
                    pollination::policy_for(species).try_self_fallback(self, plot, plant);
                }
            },
            GardenAction::BeeTick => self.bee_tick(),
            GardenAction::BeeDeath { effect } => {
                self.effects.remove(effect);
                self.bees = BeeState::Hidden;
                info!("bees died from pesticide");
                self.notify(NotificationKind::EnvironmentalHarm);
            },
            GardenAction::CommitCrossPollination(pending) => {
                self.commit_offspring(pending);
            },
            GardenAction::CornWindTick => {
                self.wind_timer = None;
                if self.weather().is_windy() {
                    pollination::policy_for(Species::Corn).try_ambient(self, Species::Corn);
                    self.wind_timer = Some(self.scheduler.schedule_in(
                        self.config.corn_wind_interval_ms,
                        GardenAction::CornWindTick,
                    ));
                }
            },
            GardenAction::CommitCornPollination(batch) => {
                for pending in batch {
                    self.commit_offspring(pending);
                }
            },
            GardenAction::NitrogenFixation {
                plot,
                plant,
                effect,
            } => self.finish_nitrogen_fixation(plot, plant, effect),
            GardenAction::BeanSelfPollination { plot, plant } => {
                pollination::policy_for(Species::Bean).try_self_fallback(self, plot, plant);
            },
            GardenAction::GreenManure { targets, effect } => {
                self.apply_green_manure(&targets, effect);
            },
            GardenAction::AutoWeather => {
                self.advance_weather();
                if let Some(interval) = self.config.auto_weather_interval_ms {
                    self.scheduler.schedule_in(interval, GardenAction::AutoWeather);
                }
            },
        }
    }

    /// Hand newly grown plants to their policies and re-derive the bee state.
    fn settle(&mut self) {
        while let Some((plot, plant)) = self.newly_grown.pop_front() {
            if let Some(species) = self.grid.plant_if(plot, plant).map(|p| p.species) {
                pollination::policy_for(species).on_grown(self, plot, plant);
            }
        }
        self.refresh_bees();
    }

    pub(crate) fn notify(&mut self, kind: NotificationKind) {
        let now = self.now();
        self.notifications.emit(kind, now);
    }

    // ------------------------------------------------------------------
    // Tool handlers
    // ------------------------------------------------------------------

    fn plant_seed(&mut self, plot: PlotId, species: Species) {
        if !self.grid.is_empty_plot(plot) {
            debug!(%plot, "plot occupied, seed not planted");
            return;
        }
        info!(%plot, species = ?species, "seed planted");
        self.place_plant(plot, Plant::new(species));
    }

    fn water(&mut self, plot: PlotId) {
        if let Ok(target) = self.grid.plot_mut(plot) {
            target.is_watered = true;
        }
        self.schedule_growth(plot);
    }

    fn fertilize(&mut self, plot: PlotId, chemical: bool) {
        if let Ok(target) = self.grid.plot_mut(plot) {
            if chemical {
                target.chemical_fertilizer = true;
            } else {
                target.organic_fertilizer = true;
            }
            debug!(%plot, chemical, "fertilizer applied");
        }
    }

    fn harvest(&mut self, plot: PlotId) {
        let Ok(target) = self.grid.plot(plot) else {
            return;
        };
        let Some(plant) = target.plant.as_ref().filter(|p| p.is_grown()) else {
            debug!(%plot, "nothing grown to harvest");
            return;
        };
        let size = plant.harvest_size(target.is_fertilized());
        let chemical = target.chemical_fertilizer;
        let species = plant.species;
        let plant_id = plant.id;

        self.inventory.add(species, size, chemical);
        if let Some(timer) = self.growing.remove(&plot) {
            self.scheduler.cancel(timer);
        }
        let keep_watered = self.weather().is_raining();
        if let Ok(target) = self.grid.plot_mut(plot) {
            target.reset(keep_watered);
        }
        self.reproduced.remove(&plant_id);
        if self.pollination_source.is_some_and(|(src, _)| src == plot) {
            self.pollination_source = None;
        }
        info!(%plot, species = ?species, size = ?size, "harvested");

        if species == Species::Bean {
            self.start_green_manure(plot);
        }
    }

    fn hand_pollinate(&mut self, plot: PlotId) {
        let clicked = self
            .grid
            .plant(plot)
            .filter(|p| p.is_grown())
            .map(|p| (p.id, p.species));

        let Some((source_plot, source_id)) = self.pollination_source.take() else {
            match clicked {
                Some((id, _)) => self.pollination_source = Some((plot, id)),
                None => self.notify(NotificationKind::InvalidPollination),
            }
            return;
        };

        if source_plot == plot {
            debug!(%plot, "hand pollination cancelled");
            return;
        }
        let Some(source_species) = self
            .grid
            .plant_if(source_plot, source_id)
            .filter(|p| p.is_grown())
            .map(|p| p.species)
        else {
            self.notify(NotificationKind::InvalidPollination);
            return;
        };
        match clicked {
            Some((_, species)) if species == source_species => {
                self.begin_cross_pollination(source_plot, plot);
            },
            _ => self.notify(NotificationKind::InvalidPollination),
        }
    }

    // ------------------------------------------------------------------
    // Growth
    // ------------------------------------------------------------------

    /// Put a plant on a plot and start whatever its stage calls for.
    pub(crate) fn place_plant(&mut self, plot: PlotId, plant: Plant) {
        let id = plant.id;
        let grown = plant.is_grown();
        let watered = match self.grid.plot_mut(plot) {
            Ok(target) => {
                target.plant = Some(plant);
                target.is_watered
            },
            Err(_) => return,
        };
        if grown {
            self.newly_grown.push_back((plot, id));
        } else if watered {
            self.schedule_growth(plot);
        }
    }

    /// Start the growth timer for a sprout. Returns false if already in flight.
    fn schedule_growth(&mut self, plot: PlotId) -> bool {
        if self.growing.contains_key(&plot) {
            return false;
        }
        let Some(plant) = self.grid.plant(plot).filter(|p| !p.is_grown()) else {
            return false;
        };
        let action = GardenAction::GrowthComplete {
            plot,
            plant: plant.id,
        };
        let timer = self.scheduler.schedule_in(self.config.growth_delay_ms, action);
        self.growing.insert(plot, timer);
        debug!(%plot, at = self.now() + self.config.growth_delay_ms, "growth scheduled");
        true
    }

    fn complete_growth(&mut self, plot: PlotId, plant: PlantId) {
        self.growing.remove(&plot);
        let Some(sprout) = self
            .grid
            .plant_if_mut(plot, plant)
            .filter(|p| !p.is_grown())
        else {
            debug!(%plot, "growth target gone, skipping");
            return;
        };
        sprout.stage = GrowthStage::Grown;
        info!(%plot, species = ?sprout.species, "plant grown");
        self.newly_grown.push_back((plot, plant));
    }

    // ------------------------------------------------------------------
    // Weather
    // ------------------------------------------------------------------

    fn start_rain(&mut self) {
        for plot in self.grid.iter_mut() {
            plot.is_watered = true;
        }
        for plot in self.grid.occupied_plots() {
            self.schedule_growth(plot);
        }
    }

    fn start_wind(&mut self) {
        self.reproduced.clear();
        if self.grid.grown_of(Species::Corn).len() < 2 {
            self.notify(NotificationKind::NoCornToPollinate);
            return;
        }
        pollination::policy_for(Species::Corn).try_ambient(self, Species::Corn);
        self.wind_timer = Some(self.scheduler.schedule_in(
            self.config.corn_wind_interval_ms,
            GardenAction::CornWindTick,
        ));
    }

    fn stop_wind(&mut self) {
        self.reproduced.clear();
        if let Some(timer) = self.wind_timer.take() {
            self.scheduler.cancel(timer);
        }
    }

    // ------------------------------------------------------------------
    // Bees
    // ------------------------------------------------------------------

    fn refresh_bees(&mut self) {
        let conditions = BeeConditions {
            pesticide: self.grid.has_chemical_fertilizer(),
            flowers: !self.grid.grown_of(Species::Sunflower).is_empty(),
            manual: self.manual_bees,
        };
        let previous = self.bees;
        let next = previous.next(conditions);
        if next == previous {
            return;
        }
        self.bees = next;
        info!(from = ?previous, to = ?next, "bee state changed");

        if let Some(timer) = self.bee_timer.take() {
            self.scheduler.cancel(timer);
        }
        match next {
            BeeState::Visible => {
                // A new wave starts
                self.reproduced.clear();
                self.bee_timer = Some(
                    self.scheduler
                        .schedule_in(self.config.bee_tick_interval_ms, GardenAction::BeeTick),
                );
            },
            BeeState::Dying => {
                let effect = self.effects.add_animation(AnimationKind::BeeDeath, None);
                self.scheduler
                    .schedule_in(self.config.bee_death_ms, GardenAction::BeeDeath { effect });
            },
            BeeState::Hidden => {},
        }
    }

    fn bee_tick(&mut self) {
        self.bee_timer = None;
        if !self.bees.allows_pollination() {
            return;
        }
        pollination::bee_tick(self);
        self.reproduction_trigger += 1;
        self.bee_timer = Some(
            self.scheduler
                .schedule_in(self.config.bee_tick_interval_ms, GardenAction::BeeTick),
        );
    }

    // ------------------------------------------------------------------
    // Bean
    // ------------------------------------------------------------------

    fn finish_nitrogen_fixation(&mut self, plot: PlotId, plant: PlantId, effect: EffectId) {
        self.effects.remove(effect);
        let Some(bean) = self.grid.plant_if_mut(plot, plant) else {
            debug!(%plot, "bean gone before nitrogen fixation finished");
            return;
        };
        bean.is_boosted = true;
        info!(%plot, "bean boosted by nitrogen fixation");
        self.notify(NotificationKind::NitrogenFixation);
        self.scheduler.schedule_in(
            self.config.bean_self_pollination_ms,
            GardenAction::BeanSelfPollination { plot, plant },
        );
    }

    fn start_green_manure(&mut self, harvested: PlotId) {
        self.notify(NotificationKind::GreenManureTip);
        let targets: Vec<(PlotId, PlantId)> = self
            .grid
            .plants()
            .filter(|(plot, _)| *plot != harvested)
            .map(|(plot, plant)| (plot, plant.id))
            .collect();
        let effect = self
            .effects
            .add_animation(AnimationKind::GreenManure, Some(harvested));
        self.scheduler.schedule_in(
            self.config.green_manure_delay_ms,
            GardenAction::GreenManure { targets, effect },
        );
    }

    fn apply_green_manure(&mut self, targets: &[(PlotId, PlantId)], effect: EffectId) {
        self.effects.remove(effect);
        let mut applied = 0;
        for &(plot, plant) in targets {
            if let Ok(target) = self.grid.plot_mut(plot) {
                // Replanted plots hold a different instance and are skipped
                if target.holds(plant) {
                    target.green_manure = true;
                    applied += 1;
                }
            }
        }
        debug!(applied, "green manure applied");
        if applied > 0 {
            self.notify(NotificationKind::GreenManureApplied);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plants::SizeClass;
    use crate::rng::ScriptedRandom;

    fn p(i: usize) -> PlotId {
        PlotId::new(i)
    }

    fn garden() -> Garden {
        Garden::with_rng(SimConfig::default(), Box::new(ScriptedRandom::default()))
    }

    #[test]
    fn test_click_without_tool_is_noop() {
        let mut g = garden();
        g.click_plot(p(3)).expect("in bounds");
        assert!(g.grid().plot(p(3)).expect("plot").is_empty());
        assert!(g.notifications().is_empty());
    }

    #[test]
    fn test_click_out_of_bounds() {
        let mut g = garden();
        assert!(matches!(
            g.click_plot(p(16)),
            Err(GardenError::PlotOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_plant_water_grow() {
        let mut g = garden();
        g.select_tool(Tool::Seed(Species::Corn));
        g.click_plot(p(6)).expect("plant");
        g.select_tool(Tool::WateringCan);
        g.click_plot(p(6)).expect("water");
        assert!(g.is_growing(p(6)));

        g.advance_by(1_999);
        assert_eq!(g.grid().plant(p(6)).map(|x| x.stage), Some(GrowthStage::Sprout));
        g.advance_by(1);
        assert_eq!(g.grid().plant(p(6)).map(|x| x.stage), Some(GrowthStage::Grown));
        assert!(!g.is_growing(p(6)));
    }

    #[test]
    fn test_double_watering_schedules_once() {
        let mut g = garden();
        g.insert_plant(p(0), Plant::new(Species::Pumpkin)).expect("insert");
        g.select_tool(Tool::WateringCan);
        g.click_plot(p(0)).expect("water");
        let pending = g.pending_actions();
        g.click_plot(p(0)).expect("water again");
        assert_eq!(g.pending_actions(), pending);
    }

    #[test]
    fn test_unwatered_sprout_does_not_grow() {
        let mut g = garden();
        g.insert_plant(p(0), Plant::new(Species::Pumpkin)).expect("insert");
        g.advance_by(60_000);
        assert_eq!(g.grid().plant(p(0)).map(|x| x.stage), Some(GrowthStage::Sprout));
    }

    #[test]
    fn test_seed_on_occupied_plot_ignored() {
        let mut g = garden();
        let plant = Plant::new(Species::Apple);
        let id = plant.id;
        g.insert_plant(p(2), plant).expect("insert");
        g.select_tool(Tool::Seed(Species::Corn));
        g.click_plot(p(2)).expect("click");
        assert!(g.grid().plot(p(2)).expect("plot").holds(id));
        assert!(matches!(
            g.insert_plant(p(2), Plant::new(Species::Corn)),
            Err(GardenError::PlotOccupied(_))
        ));
    }

    #[test]
    fn test_harvest_records_size() {
        let mut g = garden();
        g.insert_plant(p(4), Plant::new(Species::Corn).grown()).expect("insert");
        g.select_tool(Tool::OrganicFertilizer);
        g.click_plot(p(4)).expect("fertilize");
        g.select_tool(Tool::Harvest);
        g.click_plot(p(4)).expect("harvest");

        assert_eq!(g.inventory().get(Species::Corn, SizeClass::Large).count, 1);
        let plot = g.grid().plot(p(4)).expect("plot");
        assert!(plot.is_empty());
        assert!(!plot.is_fertilized());
    }

    #[test]
    fn test_harvest_sprout_ignored() {
        let mut g = garden();
        g.insert_plant(p(4), Plant::new(Species::Corn)).expect("insert");
        g.select_tool(Tool::Harvest);
        g.click_plot(p(4)).expect("harvest");
        assert!(!g.grid().plot(p(4)).expect("plot").is_empty());
        assert_eq!(g.inventory().total(Species::Corn), 0);
    }

    #[test]
    fn test_chemical_harvest_counted() {
        let mut g = garden();
        g.insert_plant(p(1), Plant::new(Species::Apple).grown()).expect("insert");
        g.select_tool(Tool::ChemicalFertilizer);
        g.click_plot(p(1)).expect("fertilize");
        g.select_tool(Tool::Harvest);
        g.click_plot(p(1)).expect("harvest");
        let count = g.inventory().get(Species::Apple, SizeClass::Large);
        assert_eq!(count.count, 1);
        assert_eq!(count.chemical, 1);
    }

    #[test]
    fn test_sunflower_brings_bees() {
        let mut g = garden();
        g.insert_plant(p(0), Plant::new(Species::Sunflower)).expect("insert");
        assert_eq!(g.bee_state(), BeeState::Hidden);
        g.select_tool(Tool::WateringCan);
        g.click_plot(p(0)).expect("water");
        g.advance_by(2_000);
        assert_eq!(g.bee_state(), BeeState::Visible);
    }

    #[test]
    fn test_manual_bees_toggle() {
        let mut g = garden();
        assert!(g.toggle_manual_bees());
        assert_eq!(g.bee_state(), BeeState::Visible);
        assert!(!g.toggle_manual_bees());
        assert_eq!(g.bee_state(), BeeState::Hidden);
    }

    #[test]
    fn test_bee_ticks_bump_trigger() {
        let mut g = garden();
        g.toggle_manual_bees();
        g.advance_by(2_000);
        assert_eq!(g.reproduction_trigger(), 4);
        g.toggle_manual_bees();
        g.advance_by(2_000);
        assert_eq!(g.reproduction_trigger(), 4);
    }

    #[test]
    fn test_pesticide_kills_bees() {
        let mut g = garden();
        g.insert_plant(p(0), Plant::new(Species::Sunflower).grown()).expect("insert");
        assert_eq!(g.bee_state(), BeeState::Visible);

        g.select_tool(Tool::ChemicalFertilizer);
        g.click_plot(p(0)).expect("spray");
        assert_eq!(g.bee_state(), BeeState::Dying);
        assert_eq!(g.effects().animations().len(), 1);

        g.advance_by(3_499);
        assert_eq!(g.bee_state(), BeeState::Dying);
        g.advance_by(1);
        assert_eq!(g.bee_state(), BeeState::Hidden);
        assert_eq!(g.notifications().count_of(NotificationKind::EnvironmentalHarm), 1);
        assert!(g.effects().is_empty());

        // Still poisoned: bees stay away
        g.advance_by(10_000);
        assert_eq!(g.bee_state(), BeeState::Hidden);

        // Harvesting the sprayed plot removes the pesticide
        g.select_tool(Tool::Harvest);
        g.click_plot(p(0)).expect("harvest");
        g.toggle_manual_bees();
        assert_eq!(g.bee_state(), BeeState::Visible);
    }

    #[test]
    fn test_environmental_harm_follow_up() {
        let mut g = garden();
        g.toggle_manual_bees();
        g.select_tool(Tool::ChemicalFertilizer);
        g.click_plot(p(9)).expect("spray");
        g.advance_by(3_500);

        let dismissed = g.dismiss_notification().expect("harm shown");
        assert_eq!(dismissed.kind, NotificationKind::EnvironmentalHarm);
        assert_eq!(
            g.notifications().head().map(|n| n.kind),
            Some(NotificationKind::PesticideTip)
        );
    }

    #[test]
    fn test_rain_waters_and_grows() {
        let mut g = garden();
        g.insert_plant(p(4), Plant::new(Species::Bean)).expect("insert");
        g.set_forecast(
            Forecast::from_values(
                Weather::Sunny,
                vec![Weather::Raining, Weather::Sunny, Weather::Sunny, Weather::Sunny],
            )
            .expect("forecast"),
        );

        g.advance_weather();
        assert!(g.grid().iter().all(|plot| plot.is_watered));
        assert!(g.is_growing(p(4)));

        g.advance_by(2_000);
        assert!(g.grid().plant(p(4)).is_some_and(Plant::is_grown));

        g.advance_weather();
        assert!(g.grid().iter().all(|plot| !plot.is_watered));
    }

    #[test]
    fn test_planting_in_rain_starts_growth() {
        let mut g = garden();
        g.set_forecast(Forecast::from_values(Weather::Sunny, vec![Weather::Raining; 4]).expect("forecast"));
        g.advance_weather();
        g.select_tool(Tool::Seed(Species::Pumpkin));
        g.click_plot(p(7)).expect("plant");
        assert!(g.is_growing(p(7)));
    }

    #[test]
    fn test_wind_without_corn_notifies() {
        let mut g = garden();
        g.insert_plant(p(0), Plant::new(Species::Corn).grown()).expect("insert");
        g.set_forecast(Forecast::from_values(Weather::Sunny, vec![Weather::SunnyWindy; 4]).expect("forecast"));
        g.advance_weather();
        assert_eq!(g.notifications().count_of(NotificationKind::NoCornToPollinate), 1);
        // Staying windy is not a new edge
        g.advance_weather();
        assert_eq!(g.notifications().count_of(NotificationKind::NoCornToPollinate), 1);
    }

    #[test]
    fn test_auto_weather() {
        let config = SimConfig {
            auto_weather_interval_ms: Some(10_000),
            ..SimConfig::default()
        };
        let mut g = Garden::with_rng(config, Box::new(ScriptedRandom::default()));
        g.set_forecast(
            Forecast::from_values(
                Weather::Sunny,
                vec![Weather::Raining, Weather::SunnyWindy, Weather::Sunny, Weather::Sunny],
            )
            .expect("forecast"),
        );
        g.advance_by(10_000);
        assert_eq!(g.weather(), Weather::Raining);
        g.advance_by(10_000);
        assert_eq!(g.weather(), Weather::SunnyWindy);
    }

    #[test]
    fn test_execute_commands() {
        let mut g = garden();
        g.execute(Command::SelectTool(Tool::Seed(Species::Sunflower)))
            .expect("select");
        g.execute(Command::ClickPlot(p(5))).expect("click");
        assert!(g.grid().plant(p(5)).is_some());
        g.execute(Command::ClearTool).expect("clear");
        assert_eq!(g.tool(), None);
        g.execute(Command::ToggleManualBees).expect("bees");
        assert!(g.manual_bees());
        g.execute(Command::AdvanceWeather).expect("weather");
        g.execute(Command::OpenHistory).expect("history");
        g.execute(Command::DismissNotification).expect("dismiss");
    }
}
