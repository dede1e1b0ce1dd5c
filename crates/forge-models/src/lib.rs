//! Core data models for InsightForge.
//!
//! This crate provides the fundamental data types shared by the resolver,
//! the remote analysis client and the terminal front ends: analysis inputs,
//! transcript messages, citation sources and the view state.

pub mod ids;
pub mod input;
pub mod message;
pub mod mode;
pub mod view;

// Re-export main types
pub use ids::MessageId;
pub use input::AnalysisInput;
pub use message::{DisplayType, Message, Role, Source};
pub use mode::ComplexityMode;
pub use view::ViewState;
