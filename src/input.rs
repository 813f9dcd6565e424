//! Pointer and keyboard input.
//!
//! The simulation never polls input itself. Each frame the window builds a
//! [`PointerState`] from the [`Input`] tracker and hands it to
//! [`Simulation::step_frame`](crate::Simulation::step_frame):
//!
//! ```ignore
//! for command in input.take_commands() {
//!     // pause, reset or quit
//! }
//! simulation.step_frame(input.pointer_state(config.render_scale));
//! ```

use glam::Vec2;
use winit::event::{MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pointer position in simulation space plus primary-button state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Pointer position in simulation units.
    pub position: Vec2,
    /// Whether the primary button is held.
    pub held: bool,
}

impl PointerState {
    /// Primary button held at `position`.
    pub fn held_at(position: Vec2) -> Self {
        Self {
            position,
            held: true,
        }
    }

    /// Button not held; the pointer force is inactive.
    pub fn released() -> Self {
        Self::default()
    }
}

/// Viewer actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Space.
    TogglePause,
    /// R.
    Reset,
    /// Escape.
    Quit,
}

impl Command {
    fn for_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Space => Some(Command::TogglePause),
            KeyCode::KeyR => Some(Command::Reset),
            KeyCode::Escape => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Cursor, primary button and queued key commands, fed by window events.
#[derive(Debug, Default)]
pub struct Input {
    // Physical pixels
    cursor: Vec2,
    primary_held: bool,
    commands: Vec<Command>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer in simulation space, dividing window pixels by `render_scale`.
    pub fn pointer_state(&self, render_scale: f32) -> PointerState {
        PointerState {
            position: self.cursor / render_scale,
            held: self.primary_held,
        }
    }

    /// Commands from key presses since the last call, in press order.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                // Auto-repeat would toggle pause every few milliseconds
                if !event.state.is_pressed() || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(command) = Command::for_key(code) {
                        self.commands.push(command);
                    }
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.primary_held = state.is_pressed();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
            }
            // The release never arrives if it happens while unfocused
            WindowEvent::Focused(false) => {
                self.primary_held = false;
            }
            _ => {}
        }
    }
}
