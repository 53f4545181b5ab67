//! plan-preview-action: plan a pull request with `pipectl plan-preview`
//! and report the pending changes back as a pull request comment.

pub mod action;
pub mod cli;
pub mod config;
pub mod domain;
pub mod event;
pub mod github;
pub mod planner;
pub mod render;
pub mod utils;

pub use domain::{EventDescriptor, PlanPreviewResult};
pub use render::render_comment;
