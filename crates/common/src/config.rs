use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{render::Painter, Error, Result};

/// Which cells get repainted after a generation advances.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Repaint {
    Full,
    Changed,
}

impl Default for Repaint {
    fn default() -> Self {
        Repaint::Full
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub cell_size: u32,
    pub cell_inset: u32,
    pub tick_period_ms: u64,
    pub alive_probability: f64,
    pub alive_color: String,
    pub grid_color: String,
    pub intro: bool,
    pub repaint: Repaint,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 20,
            cell_inset: 1,
            tick_period_ms: 1000,
            alive_probability: 0.5,
            alive_color: "white".to_string(),
            grid_color: "rgb(0, 0, 0)".to_string(),
            intro: true,
            repaint: Repaint::Full,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cell_size <= self.cell_inset.saturating_mul(2) {
            return Err(Error::InvalidConfig(format!(
                "cell size {} leaves nothing inside an inset of {}",
                self.cell_size, self.cell_inset
            )));
        }
        if self.tick_period_ms == 0 {
            return Err(Error::InvalidConfig("tick period must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.alive_probability) {
            return Err(Error::InvalidConfig(format!(
                "alive probability {} is outside [0, 1]",
                self.alive_probability
            )));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn painter(&self) -> Painter {
        Painter::new(
            self.cell_size,
            self.cell_inset,
            &self.alive_color,
            &self.grid_color,
        )
    }
}
