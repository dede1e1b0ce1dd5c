//! Terminal User Interface for InsightForge.
//!
//! Three views share one screen layout:
//! - Landing: URL or file input with the deep research toggle
//! - Analyzing: staged loading indicator while the first report runs
//! - Chat: scrollable transcript with sources, mode selector and actions
//!
//! A capacity notice overlays any view after a failed analysis.

mod app;
mod events;
mod ui;

pub use app::{App, SourceKind};
pub use events::run;
