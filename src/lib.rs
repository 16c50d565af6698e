#![forbid(unsafe_code)]

pub mod accounting;
pub mod api;
pub mod apply;
pub mod cli;
pub mod config;
pub mod cycle;
pub mod document;
pub mod formats;
pub mod logging;
pub mod participants;
pub mod reconcile;
pub mod render;
pub mod status;
pub mod store;
pub mod update;
