//! Types shared by the window manager and the shell

pub mod window_state;

pub use window_state::{Geometry, Size, SizeLimits, Vec2, WindowState, clamp_span};
