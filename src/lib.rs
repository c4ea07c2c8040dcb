//! Coalition
//!
//! Window management core of the Coalition desktop shell: window registry,
//! focus and stacking, drag and resize with edge snapping, layout
//! persistence, dock state and keyboard shortcuts. Nothing here renders;
//! a host feeds pointer, keyboard and surface events into [`shell::Shell`].

pub mod config;
pub mod error;
pub mod input;
pub mod shared;
pub mod shell;
pub mod wm;

pub use error::{WmError, WmResult};
