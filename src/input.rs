use crate::geometry_utilities::types::ScreenPoint;
use std::collections::HashMap;
use winit::event::{ElementState, Event, KeyboardInput, WindowEvent};

pub use winit::event::{MouseButton, VirtualKeyCode};

#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
enum Button {
    Key(VirtualKeyCode),
    Mouse(MouseButton),
}

/// Whether a button is held, and the frames of its last press and release.
#[derive(Debug, Default, Clone, Copy)]
struct ButtonState {
    held: bool,
    pressed_frame: Option<u64>,
    released_frame: Option<u64>,
}

/// A mouse press that started a drag. It lasts until that same press is released.
#[derive(Debug, Clone, Copy)]
pub struct CapturedClick {
    button: MouseButton,
    frame: u64,
    pub mouse_start: ScreenPoint,
}

impl CapturedClick {
    pub fn is_held(&self, input: &InputManager) -> bool {
        input
            .buttons
            .get(&Button::Mouse(self.button))
            .map_or(false, |state| state.held && state.pressed_frame == Some(self.frame))
    }
}

/// Key and mouse state, sampled per frame.
///
/// Events arriving between two calls to [`InputManager::tick_frame`] all belong to the same frame.
#[derive(Default)]
pub struct InputManager {
    buttons: HashMap<Button, ButtonState>,
    pub mouse_position: ScreenPoint,
    frame: u64,
}

impl InputManager {
    pub fn new() -> InputManager {
        InputManager::default()
    }

    pub fn tick_frame(&mut self) {
        self.frame += 1;
    }

    pub fn event(&mut self, event: &Event<'_, ()>) {
        if let Event::WindowEvent { event, .. } = event {
            match event {
                WindowEvent::CursorMoved { position, .. } => {
                    self.mouse_position = ScreenPoint::new(position.x as f32, position.y as f32);
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => self.record(Button::Key(*key), *state),
                WindowEvent::MouseInput { state, button, .. } => self.record(Button::Mouse(*button), *state),
                _ => {}
            }
        }
    }

    fn record(&mut self, button: Button, element_state: ElementState) {
        let frame = self.frame;
        let state = self.buttons.entry(button).or_default();
        match element_state {
            // Key repeat sends presses while held
            ElementState::Pressed if !state.held => {
                state.held = true;
                state.pressed_frame = Some(frame);
            }
            ElementState::Released if state.held => {
                state.held = false;
                state.released_frame = Some(frame);
            }
            _ => {}
        }
    }

    fn state(&self, button: Button) -> ButtonState {
        self.buttons.get(&button).copied().unwrap_or_default()
    }

    /// Whether `key` went down during the current frame.
    pub fn on_down(&self, key: VirtualKeyCode) -> bool {
        self.state(Button::Key(key)).pressed_frame == Some(self.frame)
    }

    /// Whether `key` was released during the current frame.
    pub fn on_up(&self, key: VirtualKeyCode) -> bool {
        self.state(Button::Key(key)).released_frame == Some(self.frame)
    }

    /// Returns the press of `button` that happened this frame, with the cursor position at that time.
    pub fn capture_click(&self, button: MouseButton) -> Option<CapturedClick> {
        let state = self.state(Button::Mouse(button));
        if state.held && state.pressed_frame == Some(self.frame) {
            Some(CapturedClick {
                button,
                frame: self.frame,
                mouse_start: self.mouse_position,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::point2 as point;

    #[test]
    fn key_release_is_seen_for_one_frame() {
        let mut input = InputManager::new();
        input.record(Button::Key(VirtualKeyCode::Key1), ElementState::Pressed);
        assert!(input.on_down(VirtualKeyCode::Key1));
        assert!(!input.on_up(VirtualKeyCode::Key1));
        input.tick_frame();
        assert!(!input.on_down(VirtualKeyCode::Key1));

        input.record(Button::Key(VirtualKeyCode::Key1), ElementState::Released);
        assert!(input.on_up(VirtualKeyCode::Key1));
        input.tick_frame();
        assert!(!input.on_up(VirtualKeyCode::Key1));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut input = InputManager::new();
        input.record(Button::Key(VirtualKeyCode::Key2), ElementState::Released);
        assert!(!input.on_up(VirtualKeyCode::Key2));
        assert!(!input.on_down(VirtualKeyCode::Key2));
    }

    #[test]
    fn repeated_presses_do_not_restart_the_key() {
        let mut input = InputManager::new();
        input.record(Button::Key(VirtualKeyCode::Escape), ElementState::Pressed);
        input.tick_frame();
        input.record(Button::Key(VirtualKeyCode::Escape), ElementState::Pressed);
        assert!(!input.on_down(VirtualKeyCode::Escape));
    }

    #[test]
    fn click_is_held_until_release() {
        let mut input = InputManager::new();
        input.mouse_position = point(10.0, 20.0);
        input.record(Button::Mouse(MouseButton::Left), ElementState::Pressed);

        let click = input.capture_click(MouseButton::Left).unwrap();
        assert_eq!(click.mouse_start, point(10.0, 20.0));

        input.tick_frame();
        input.tick_frame();
        input.mouse_position = point(30.0, 40.0);
        assert!(click.is_held(&input));
        assert!(input.capture_click(MouseButton::Left).is_none());

        input.record(Button::Mouse(MouseButton::Left), ElementState::Released);
        assert!(!click.is_held(&input));
    }

    #[test]
    fn a_new_press_ends_the_old_click() {
        let mut input = InputManager::new();
        input.record(Button::Mouse(MouseButton::Left), ElementState::Pressed);
        let click = input.capture_click(MouseButton::Left).unwrap();
        input.tick_frame();
        input.record(Button::Mouse(MouseButton::Left), ElementState::Released);
        input.tick_frame();
        input.record(Button::Mouse(MouseButton::Left), ElementState::Pressed);
        assert!(!click.is_held(&input));
        assert!(input.capture_click(MouseButton::Left).unwrap().is_held(&input));
    }

    #[test]
    fn other_buttons_are_not_captured() {
        let mut input = InputManager::new();
        input.record(Button::Mouse(MouseButton::Right), ElementState::Pressed);
        assert!(input.capture_click(MouseButton::Left).is_none());
        assert!(!input.on_down(VirtualKeyCode::Escape));
    }
}
