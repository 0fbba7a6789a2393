pub mod collision;
pub mod common;
pub mod helpers;
pub mod message;
pub mod palette;
pub mod persist;
pub mod project;
pub mod record;
pub mod state;
pub mod tile;
pub mod update;
