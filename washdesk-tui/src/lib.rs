//! washdesk TUI library exports.

pub mod actions;
pub mod config;
pub mod error;
pub mod events;
pub mod forms;
pub mod keys;
pub mod logging;
pub mod nav;
pub mod page;
pub mod persistence;
pub mod reference;
pub mod state;
pub mod theme;
pub mod views;
pub mod widgets;
