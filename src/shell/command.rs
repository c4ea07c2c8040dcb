//! Text commands for driving the shell headless
//!
//! One command per line, e.g. `open Mail`, `drag Mail 200 -40`,
//! `resize Chat bottom-right 50 50`, `snap Mail left`, `key ctrl+tab`.

use crate::error::{WmError, WmResult};
use crate::wm::keyboard::KeyChord;
use crate::wm::resize::ResizeDirection;
use crate::wm::snap::SnapZone;

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Open { app: String },
    Close { app: String },
    Minimize { app: String },
    Restore { app: String },
    /// Toggle maximized state
    Maximize { app: String },
    Focus { app: String },
    /// Drag by title bar through the pointer path
    Drag { app: String, dx: f32, dy: f32 },
    /// Drag a resize handle through the pointer path
    Resize {
        app: String,
        direction: ResizeDirection,
        dx: f32,
        dy: f32,
    },
    Snap { app: String, zone: SnapZone },
    Cascade,
    Tile,
    MinimizeAll,
    RestoreAll,
    CloseAll,
    Key { chord: KeyChord },
    /// Resize the hosting surface
    Surface { width: f32, height: f32 },
    List,
    Save,
    Suspend,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  open|close|minimize|restore|maximize|focus <app>
  drag <app> <dx> <dy>
  resize <app> <direction> <dx> <dy>
  snap <app> <zone>
  cascade | tile | minimize-all | restore-all | close-all
  key <chord>          e.g. ctrl+tab, cmd+m, escape
  surface <w> <h>
  list | save | suspend | help | quit";

impl ShellCommand {
    pub fn parse(line: &str) -> WmResult<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(WmError::InvalidCommand("empty command".into()));
        };
        let args: Vec<&str> = words.collect();
        let verb = verb.to_ascii_lowercase();

        let command = match (verb.as_str(), args.as_slice()) {
            ("open", [app]) => ShellCommand::Open { app: app.to_string() },
            ("close", [app]) => ShellCommand::Close { app: app.to_string() },
            ("minimize", [app]) => ShellCommand::Minimize { app: app.to_string() },
            ("restore", [app]) => ShellCommand::Restore { app: app.to_string() },
            ("maximize", [app]) => ShellCommand::Maximize { app: app.to_string() },
            ("focus", [app]) => ShellCommand::Focus { app: app.to_string() },
            ("drag", [app, dx, dy]) => ShellCommand::Drag {
                app: app.to_string(),
                dx: number(dx)?,
                dy: number(dy)?,
            },
            ("resize", [app, direction, dx, dy]) => ShellCommand::Resize {
                app: app.to_string(),
                direction: ResizeDirection::parse(direction).ok_or_else(|| {
                    WmError::InvalidCommand(format!("unknown resize direction '{direction}'"))
                })?,
                dx: number(dx)?,
                dy: number(dy)?,
            },
            ("snap", [app, zone]) => ShellCommand::Snap {
                app: app.to_string(),
                zone: SnapZone::parse(zone)
                    .ok_or_else(|| WmError::InvalidCommand(format!("unknown snap zone '{zone}'")))?,
            },
            ("cascade", []) => ShellCommand::Cascade,
            ("tile", []) => ShellCommand::Tile,
            ("minimize-all", []) => ShellCommand::MinimizeAll,
            ("restore-all", []) => ShellCommand::RestoreAll,
            ("close-all", []) => ShellCommand::CloseAll,
            ("key", [chord]) => ShellCommand::Key {
                chord: KeyChord::parse(chord)?,
            },
            ("surface", [width, height]) => ShellCommand::Surface {
                width: number(width)?,
                height: number(height)?,
            },
            ("list", []) => ShellCommand::List,
            ("save", []) => ShellCommand::Save,
            ("suspend", []) => ShellCommand::Suspend,
            ("help", []) => ShellCommand::Help,
            ("quit" | "exit", []) => ShellCommand::Quit,
            _ => return Err(WmError::InvalidCommand(line.trim().to_string())),
        };
        Ok(command)
    }
}

fn number(text: &str) -> WmResult<f32> {
    text.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| WmError::InvalidCommand(format!("'{text}' is not a number")))
}
