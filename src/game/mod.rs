use bevy::prelude::{App, Plugin};

mod actions;
mod ai;
mod army;
mod campaign;
mod capture;
mod chronicle;
mod combat;
mod dice;
mod economy;
mod error;
mod events;
mod faction;
mod map;
mod modding;
mod movement;
mod snapshot;
mod tactics;
mod territory;
mod turn;

#[cfg(test)]
mod test_support;

pub use actions::*;
pub use ai::*;
pub use army::*;
pub use campaign::*;
pub use capture::*;
pub use chronicle::*;
pub use combat::*;
pub use dice::*;
pub use economy::*;
pub use error::*;
pub use events::*;
pub use faction::*;
pub use map::*;
pub use modding::*;
pub use movement::*;
pub use snapshot::*;
pub use tactics::*;
pub use territory::*;
pub use turn::*;

/// Drives an inserted `Campaign` resource from the app's update loop
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(TurnPlugin);
    }
}
