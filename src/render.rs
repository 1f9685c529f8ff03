//! Text rendering of games and player views.
//!
//! - [`render_ascii`]: omniscient grid for spectators
//! - [`render_fog`]: one player's view, fogged cells shown as `?`
//! - [`render_llm`]: structured summary handed to language-model players
//!
//! Renderers are read-only and work from snapshots, never from the live
//! board.

mod ascii;
mod text;

pub use ascii::{Palette, render_ascii, render_ascii_with, render_fog, render_fog_with};
pub use text::{DIPLOMACY_WINDOW, render_llm};
