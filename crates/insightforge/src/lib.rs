//! InsightForge application crate.
//!
//! This crate provides the front ends over the analysis client: the
//! full-screen TUI, the line-oriented chat REPL and the one-shot `analyze`
//! command, plus the view and transcript state they share.

pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod controller;
pub mod error;
pub mod repl;
pub mod transcript;
pub mod tui;
pub mod view;
pub mod worker;

#[cfg(test)]
mod testing;
