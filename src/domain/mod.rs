//! Core data types shared by the parser, planner runner and renderer.

pub mod event;
pub mod result;

pub use event::EventDescriptor;
pub use result::{
    ApplicationInfo, ApplicationKind, ApplicationResult, FailureApplication, FailurePiped,
    PipedInfo, PlanPreviewResult, SyncStrategy,
};
