//! In-process simulated game world that backs the navigator without a game client.

mod handle;
mod world;

pub use handle::SimHandle;
pub use world::{GridWorld, OBSTACLE_BANNER, ScreenText, SimConfig};
