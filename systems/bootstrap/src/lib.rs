#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Slide Game experience.

use slide_game_core::GridDimensions;
use slide_game_world::{query, World};

/// Rules and controls shown to the player before the first move.
pub const INSTRUCTIONS: &str = "\
Merge tiles holding the same number by sliding them together.

1. The game starts with a single tile of value 1.
2. Every slide that changes the board adds another tile of value 1.
3. Two equal tiles that meet merge into one tile holding their sum.
4. The game ends when the board is full and no neighbours match.

Controls:
  w / a / s / d      slide up / left / down / right
  q / e              slide up-left / up-right
  x / c              slide down-left / down-right
  n                  start a new game
  h                  show these instructions
  quit               leave the game";

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Rules and controls presented alongside the banner.
    #[must_use]
    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    /// Exposes the grid dimensions required for rendering.
    #[must_use]
    pub fn dimensions(&self, world: &World) -> GridDimensions {
        query::dimensions(world)
    }
}
