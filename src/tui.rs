//! Interactive trip screen.

mod app;
mod screens;
mod state;

pub use app::run;
