//! Wire and domain models
//!
//! Data API command envelopes and the entities mapped from normalized rows.

pub mod commands;
pub mod menu;

pub use commands::{DocumentCommand, FindOptions};
pub use menu::{Menu, MENU_TABLE};
