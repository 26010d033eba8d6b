//! Keyboard handling: crossterm events in, camera updates out
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use sr3d_core::math::{cross, direction};
use sr3d_core::{Camera, RenderMode};

/// World units per second
pub const MOVE_SPEED: f32 = 8.0;
/// Radians per second
pub const TURN_SPEED: f32 = 2.0;

/// A single user request decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    StrafeLeft,
    StrafeRight,
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    SetMode(RenderMode),
    TogglePause,
}

/// Everything read from the terminal since the last poll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub quit: bool,
    pub actions: Vec<InputAction>,
    /// New terminal size in cells, if it changed
    pub resized: Option<(u16, u16)>,
}

/// Wait up to `timeout` for input, then drain every pending event
pub fn poll_input(timeout: Duration) -> io::Result<InputState> {
    let mut state = InputState::default();
    let mut wait = timeout;
    while event::poll(wait)? {
        match event::read()? {
            Event::Key(key) => handle_key(&mut state, key),
            Event::Resize(cols, rows) => state.resized = Some((cols, rows)),
            _ => {}
        }
        wait = Duration::ZERO;
    }
    Ok(state)
}

fn handle_key(state: &mut InputState, key: KeyEvent) {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return;
    }
    if is_quit(&key) {
        state.quit = true;
    } else if let Some(action) = action_for(key.code) {
        state.actions.push(action);
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Map a key to its action
pub fn action_for(code: KeyCode) -> Option<InputAction> {
    let action = match code {
        KeyCode::Up => InputAction::MoveUp,
        KeyCode::Down => InputAction::MoveDown,
        KeyCode::Left => InputAction::StrafeLeft,
        KeyCode::Right => InputAction::StrafeRight,
        KeyCode::Char(' ') => InputAction::TogglePause,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => InputAction::Forward,
            's' => InputAction::Backward,
            'a' => InputAction::TurnLeft,
            'd' => InputAction::TurnRight,
            '1'..='4' => {
                let index = c as usize - '1' as usize;
                InputAction::SetMode(RenderMode::ALL[index])
            }
            _ => return None,
        },
        _ => return None,
    };
    Some(action)
}

/// Camera after applying `action` for `dt` seconds.
///
/// Mode and pause actions leave the camera as it is.
pub fn apply(camera: &Camera, action: InputAction, dt: f32) -> Camera {
    let step = MOVE_SPEED * dt;
    let turn = TURN_SPEED * dt;
    let look = camera.look_direction();
    let right = cross(&direction(0.0, 1.0, 0.0), &look);

    match action {
        InputAction::MoveUp => camera.moved(direction(0.0, step, 0.0)),
        InputAction::MoveDown => camera.moved(direction(0.0, -step, 0.0)),
        InputAction::StrafeLeft => camera.moved(right * -step),
        InputAction::StrafeRight => camera.moved(right * step),
        InputAction::Forward => camera.moved(look * step),
        InputAction::Backward => camera.moved(look * -step),
        InputAction::TurnLeft => camera.turned(turn),
        InputAction::TurnRight => camera.turned(-turn),
        InputAction::SetMode(_) | InputAction::TogglePause => *camera,
    }
}
