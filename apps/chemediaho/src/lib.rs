//! # che media ho? - Application Library
//!
//! HTTP API, CLI and configuration around `chemediaho-core`.
//! The binary in `main.rs` only initializes logging and dispatches to [`cli`].

pub mod api;
pub mod cli;
pub mod config;
