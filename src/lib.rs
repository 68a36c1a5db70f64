//! # Choreust
//!
//! A single-user household task tracker for the terminal. Tasks have a title,
//! a due date, a completion flag and an optional recurrence rule (daily,
//! weekly, monthly or custom), which is stored and displayed but never
//! scheduled.

pub mod actions;
pub mod auth;
pub mod codec;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod storage;
pub mod tui;

pub use error::{Error, Result};
