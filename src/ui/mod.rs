//! Rendering Surfaces
//!
//! - [`dashboard`]: ratatui layout (status, payload panel, rolling chart)
//! - [`terminal`]: full-screen event loop around the dashboard
//! - [`plain`]: line-oriented output for pipes and logs

pub mod dashboard;
pub mod plain;
pub mod terminal;
