//! Stippling pipeline: configuration, sampling runs, events, and brightness-stratified selection.
pub mod config;
pub mod events;
pub mod runner;
pub mod selection;
