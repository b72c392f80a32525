//! Library side of `forage-cli`: backend client, report workflows and the
//! figures the commands print.

pub mod alerts;
pub mod api;
pub mod auth;
pub mod config;
pub mod listing;
pub mod reports;
pub mod tracking;
pub mod ui;
