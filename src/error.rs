//! Errors for rejected window management requests
//!
//! None of these are fatal. The shell logs them and carries on; geometry
//! violations are never reported here because they are clamped silently.

use thiserror::Error;

use crate::wm::WindowId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WmError {
    #[error("window not found: {0}")]
    WindowNotFound(WindowId),

    #[error("no application registered under '{0}'")]
    UnknownApplication(String),

    #[error("window '{0}' is maximized")]
    WindowMaximized(String),

    #[error("window '{0}' is minimized")]
    WindowMinimized(String),

    #[error("only the primary button starts a drag or resize")]
    NotPrimaryButton,

    #[error("pointer is over a window control")]
    ControlRegion,

    #[error("pointer is not over a draggable surface")]
    NotDraggable,

    #[error("pointer is not over a resize handle")]
    NoResizeHandle,

    #[error("pointer {0} does not hold capture and another session is active")]
    PointerCaptured(u32),

    #[error("snap zone 'none' has no layout")]
    InvalidZone,

    #[error("invalid key chord '{0}'")]
    InvalidChord(String),

    #[error("invalid command: {0}")]
    InvalidCommand(String),
}

pub type WmResult<T> = Result<T, WmError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wm::WindowId;

    #[test]
    fn test_error_display() {
        assert_eq!(WmError::WindowNotFound(WindowId(7)).to_string(), "window not found: 7");
        assert_eq!(
            WmError::UnknownApplication("Tetris".into()).to_string(),
            "no application registered under 'Tetris'"
        );
        assert_eq!(
            WmError::PointerCaptured(2).to_string(),
            "pointer 2 does not hold capture and another session is active"
        );
    }
}
