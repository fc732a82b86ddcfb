use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::config::env_var_or;
use crate::error::ConfigError;
use crate::infra::Position;
use crate::navigation::RouteStep;

pub const OBSTACLE_BANNER: &str = "前方有障碍物";

/// Screen anchors of the rendered texts, in pixels.
const PANEL_AREA_ANCHOR: (i32, i32) = (12, 24);
const PANEL_LOAD_ANCHOR: (i32, i32) = (12, 64);
const PANEL_SUPPLY_ANCHOR: (i32, i32) = (12, 104);
const BANNER_ANCHOR: (i32, i32) = (360, 640);

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub width: i32,
    pub height: i32,
    pub start: Position,
    pub obstacles: usize,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 64,
            start: Position::new(10, 50),
            obstacles: 0,
            seed: 0,
        }
    }
}

impl SimConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            width: env_var_or("GRIDNAV_MAP_WIDTH", defaults.width)?,
            height: env_var_or("GRIDNAV_MAP_HEIGHT", defaults.height)?,
            start: Position::new(
                env_var_or("GRIDNAV_START_X", defaults.start.x)?,
                env_var_or("GRIDNAV_START_Y", defaults.start.y)?,
            ),
            obstacles: env_var_or("GRIDNAV_OBSTACLES", defaults.obstacles)?,
            seed: env_var_or("GRIDNAV_SEED", defaults.seed)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "map size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !in_bounds(self.width, self.height, self.start) {
            return Err(ConfigError::Invalid(format!(
                "start {} lies outside the {}x{} map",
                self.start, self.width, self.height
            )));
        }
        Ok(())
    }
}

fn in_bounds(width: i32, height: i32, pos: Position) -> bool {
    pos.x >= 0 && pos.x < width && pos.y >= 0 && pos.y < height
}

/// Text drawn on screen at a pixel anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenText {
    pub x: i32,
    pub y: i32,
    pub text: String,
}

/// Bounded grid with impassable cells and a status panel.
#[derive(Debug, Clone)]
pub struct GridWorld {
    pub width: i32,
    pub height: i32,
    area_name: String,
    player: Position,
    blocked: HashSet<Position>,
    banner: Option<String>,
    load: (i32, i32),
    supply: String,
    moves: usize,
}

impl GridWorld {
    pub fn new(width: i32, height: i32, start: Position) -> Self {
        Self {
            width,
            height,
            area_name: "荒野".to_string(),
            player: start,
            blocked: HashSet::new(),
            banner: None,
            load: (12, 100),
            supply: "充足".to_string(),
            moves: 0,
        }
    }

    /// World from `config` with obstacles scattered by a seeded RNG, never on the start cell.
    pub fn generate(config: &SimConfig) -> Self {
        let mut world = Self::new(config.width, config.height, config.start);
        let free_cells = (config.width as usize * config.height as usize).saturating_sub(1);
        let wanted = config.obstacles.min(free_cells);

        let mut rng = StdRng::seed_from_u64(config.seed);
        while world.blocked.len() < wanted {
            let pos = Position::new(
                rng.random_range(0..config.width),
                rng.random_range(0..config.height),
            );
            if pos != config.start {
                world.blocked.insert(pos);
            }
        }

        debug!(
            "Generated {}x{} world with {} obstacles (seed {})",
            config.width,
            config.height,
            world.blocked.len(),
            config.seed
        );
        world
    }

    pub fn block(&mut self, pos: Position) {
        if pos != self.player {
            self.blocked.insert(pos);
        }
    }

    pub fn is_blocked(&self, pos: &Position) -> bool {
        self.blocked.contains(pos)
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn set_area_name(&mut self, name: impl Into<String>) {
        self.area_name = name.into();
    }

    /// Applies one directional action. Walking off the map fails; walking into
    /// an obstacle succeeds without moving and raises the obstacle banner.
    pub fn apply(&mut self, step: RouteStep) -> bool {
        let (dx, dy) = step.delta();
        let next = self.player.checked_offset(dx, dy);

        let Some(next) = next.filter(|&pos| in_bounds(self.width, self.height, pos)) else {
            trace!("{} from {} leaves the map", step.as_str_name(), self.player);
            return false;
        };

        if self.is_blocked(&next) {
            trace!("{} from {} runs into an obstacle", step.as_str_name(), self.player);
            self.banner = Some(OBSTACLE_BANNER.to_string());
            return true;
        }

        self.player = next;
        self.banner = None;
        self.moves += 1;
        true
    }

    /// Everything currently drawn on screen.
    pub fn screen(&self) -> Vec<ScreenText> {
        let mut texts = vec![
            ScreenText {
                x: PANEL_AREA_ANCHOR.0,
                y: PANEL_AREA_ANCHOR.1,
                text: format!("{}（{},{}）", self.area_name, self.player.x, self.player.y),
            },
            ScreenText {
                x: PANEL_LOAD_ANCHOR.0,
                y: PANEL_LOAD_ANCHOR.1,
                text: format!("负重：{}/{}", self.load.0, self.load.1),
            },
            ScreenText {
                x: PANEL_SUPPLY_ANCHOR.0,
                y: PANEL_SUPPLY_ANCHOR.1,
                text: format!("食物：{}", self.supply),
            },
        ];
        if let Some(banner) = &self.banner {
            texts.push(ScreenText {
                x: BANNER_ANCHOR.0,
                y: BANNER_ANCHOR.1,
                text: banner.clone(),
            });
        }
        texts
    }

    pub fn draw_ascii_map(&self, target: Option<Position>) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                let c = if pos == self.player {
                    '@'
                } else if Some(pos) == target {
                    'X'
                } else if self.is_blocked(&pos) {
                    '#'
                } else {
                    '.'
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}
