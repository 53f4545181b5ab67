//! Output rendering

pub mod comment;

pub use comment::render_comment;
