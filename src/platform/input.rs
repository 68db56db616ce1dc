//! Key and pointer translation
//!
//! Hosts report raw key/pointer events as they arrive; once per tick the
//! accumulated state becomes a [`TickInput`]. Held keys persist, one-shot
//! presses are consumed by the tick that sees them.

use crate::sim::{Steer, TickInput};

/// Logical keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Confirm,
    Back,
    Pause,
    Quit,
    /// Toggle idle/demo mode
    Idle,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` or `.code` value
    pub fn from_code(code: &str) -> Option<Key> {
        let key = match code {
            "ArrowLeft" | "a" | "A" | "KeyA" => Key::Left,
            "ArrowRight" | "d" | "D" | "KeyD" => Key::Right,
            "ArrowUp" | "w" | "W" | "KeyW" => Key::Up,
            "ArrowDown" | "s" | "S" | "KeyS" => Key::Down,
            "Enter" | "NumpadEnter" | " " | "Space" => Key::Confirm,
            "Escape" => Key::Back,
            "p" | "P" | "KeyP" => Key::Pause,
            "q" | "Q" | "KeyQ" => Key::Quit,
            "i" | "I" | "KeyI" => Key::Idle,
            _ => return None,
        };
        Some(key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    pointer_x: Option<f32>,
    // One-shots
    tap: bool,
    up: bool,
    down: bool,
    confirm: bool,
    back: bool,
    pause: bool,
    quit: bool,
    choice: Option<usize>,
    /// Sticky
    pub idle_mode: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Up => self.up = true,
            Key::Down => self.down = true,
            Key::Confirm => self.confirm = true,
            Key::Back => self.back = true,
            Key::Pause => self.pause = true,
            Key::Quit => self.quit = true,
            Key::Idle => {
                self.idle_mode = !self.idle_mode;
                log::info!("Idle mode: {}", self.idle_mode);
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            _ => {}
        }
    }

    /// Press at column `x` (viewport pixels): steers and taps
    pub fn pointer_down(&mut self, x: f32) {
        self.pointer_x = Some(x);
        self.tap = true;
    }

    /// Drag; ignored unless the pointer is held
    pub fn pointer_move(&mut self, x: f32) {
        if self.pointer_x.is_some() {
            self.pointer_x = Some(x);
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer_x = None;
    }

    /// Pick a quiz option directly (clicked answer button)
    pub fn choose(&mut self, option: usize) {
        self.choice = Some(option);
    }

    /// Build this tick's input and clear the one-shots
    pub fn take_tick_input(&mut self, width: f32) -> TickInput {
        // Left wins when both are held
        let steer = if self.left {
            Steer::Left
        } else if self.right {
            Steer::Right
        } else {
            Steer::None
        };
        let pointer_x = self
            .pointer_x
            .filter(|x| x.is_finite())
            .map(|x| x.clamp(0.0, width));

        TickInput {
            steer,
            pointer_x,
            tap: std::mem::take(&mut self.tap),
            up: std::mem::take(&mut self.up),
            down: std::mem::take(&mut self.down),
            confirm: std::mem::take(&mut self.confirm),
            back: std::mem::take(&mut self.back),
            pause: std::mem::take(&mut self.pause),
            quit: std::mem::take(&mut self.quit),
            choice: self.choice.take(),
            idle_mode: self.idle_mode,
        }
    }
}
