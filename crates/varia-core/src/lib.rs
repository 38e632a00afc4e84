//! Generation of asset ID lookup tables from a game disc.
//!
//! Walks every world (MLVL) known to a [`retrodisc::AssetSource`], resolves
//! display names through the game's string tables, and renders generated
//! Rust constants files: one per world for its areas, plus an aggregate
//! world table.

pub mod error;
pub mod extract;
pub mod game;
pub mod naming;
pub mod overrides;
pub mod template;

pub use error::GenError;
pub use extract::create_asset_id_files;
pub use game::Game;
