//! Serializable view of a garden for the presentation layer.

use garden_common::PlotId;
use serde::{Deserialize, Serialize};

use crate::bees::BeeState;
use crate::effects::VisualEffects;
use crate::garden::Garden;
use crate::grid::Plot;
use crate::notifications::Notification;
use crate::plants::{SizeClass, Species};
use crate::tools::Tool;
use crate::weather::Weather;

/// One inventory line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLine {
    /// Species harvested.
    pub species: Species,
    /// Size class.
    pub size: SizeClass,
    /// Plants harvested.
    pub count: u32,
    /// Of those, grown under chemical fertilizer.
    pub chemical: u32,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GardenSnapshot {
    /// Model time in milliseconds.
    pub now_ms: u64,
    /// All plots in id order.
    pub plots: Vec<Plot>,
    /// Current weather.
    pub weather: Weather,
    /// Upcoming weather, soonest first.
    pub forecast: Vec<Weather>,
    /// Bee presence.
    pub bees: BeeState,
    /// Manual bee mode.
    pub manual_bees: bool,
    /// Selected tool.
    pub tool: Option<Tool>,
    /// Source plot of a hand pollination in progress.
    pub pollination_source: Option<PlotId>,
    /// Active connections and animations.
    pub effects: VisualEffects,
    /// Harvest tallies.
    pub inventory: Vec<InventoryLine>,
    /// Notification shown on screen.
    pub notification: Option<Notification>,
    /// Unread history entries.
    pub unread_notifications: usize,
    /// Bee tick counter.
    pub reproduction_trigger: u64,
}

impl GardenSnapshot {
    /// Capture the current state of a garden.
    #[must_use]
    pub fn capture(garden: &Garden) -> Self {
        Self {
            now_ms: garden.now(),
            plots: garden.grid().iter().cloned().collect(),
            weather: garden.weather(),
            forecast: garden.forecast().upcoming(),
            bees: garden.bee_state(),
            manual_bees: garden.manual_bees(),
            tool: garden.tool(),
            pollination_source: garden.pollination_source(),
            effects: garden.effects().clone(),
            inventory: garden
                .inventory()
                .iter()
                .map(|(species, size, tally)| InventoryLine {
                    species,
                    size,
                    count: tally.count,
                    chemical: tally.chemical,
                })
                .collect(),
            notification: garden.notifications().head().cloned(),
            unread_notifications: garden.notifications().unread_count(),
            reproduction_trigger: garden.reproduction_trigger(),
        }
    }

    /// Number of occupied plots.
    #[must_use]
    pub fn plant_count(&self) -> usize {
        self.plots.iter().filter(|plot| !plot.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::plants::Plant;
    use crate::rng::ScriptedRandom;

    #[test]
    fn test_snapshot_reflects_garden() {
        let mut garden = Garden::with_rng(SimConfig::default(), Box::new(ScriptedRandom::default()));
        garden
            .insert_plant(PlotId::new(5), Plant::new(Species::Corn).grown())
            .expect("insert");
        garden.select_tool(Tool::Harvest);
        garden.click_plot(PlotId::new(5)).expect("harvest");
        garden.advance_by(250);

        let snapshot = garden.snapshot();
        assert_eq!(snapshot.now_ms, 250);
        assert_eq!(snapshot.plots.len(), 16);
        assert_eq!(snapshot.plant_count(), 0);
        assert_eq!(snapshot.forecast.len(), 4);
        assert_eq!(snapshot.tool, Some(Tool::Harvest));
        assert_eq!(
            snapshot.inventory,
            vec![InventoryLine {
                species: Species::Corn,
                size: SizeClass::Normal,
                count: 1,
                chemical: 0,
            }]
        );
    }

    #[test]
    fn test_snapshot_json() {
        let garden = Garden::with_rng(SimConfig::default(), Box::new(ScriptedRandom::default()));
        let json = serde_json::to_string(&garden.snapshot()).expect("serialize");
        assert!(json.contains("\"weather\":\"Sunny\""));
        assert!(json.contains("\"bees\":\"Hidden\""));
        let back: GardenSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.plots.len(), 16);
    }
}
