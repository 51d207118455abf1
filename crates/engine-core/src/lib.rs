pub mod engine;
pub mod error;
pub mod runner;
pub mod settings;
pub mod state;
pub mod tracker;
