use winit::event::{ElementState, KeyboardInput, VirtualKeyCode};

/// What a key press asks the widget to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    SetRows(u32),
    AdjustRows(i32),
    CycleShape(i32),
    ToggleAnimation,
    CopyResult,
    ClearPattern,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_keyboard_input(&mut self, input: &KeyboardInput) -> InputAction {
        match input.virtual_keycode {
            Some(key_code) => self.action_for(input.state, key_code),
            None => InputAction::None,
        }
    }

    fn action_for(&self, state: ElementState, key_code: VirtualKeyCode) -> InputAction {
        if state != ElementState::Pressed {
            return InputAction::None;
        }
        match key_code {
            // Digits pick the row count directly, arrows step it.
            VirtualKeyCode::Key2 => InputAction::SetRows(2),
            VirtualKeyCode::Key3 => InputAction::SetRows(3),
            VirtualKeyCode::Key4 => InputAction::SetRows(4),
            VirtualKeyCode::Key5 => InputAction::SetRows(5),
            VirtualKeyCode::Key6 => InputAction::SetRows(6),
            VirtualKeyCode::Key7 => InputAction::SetRows(7),
            VirtualKeyCode::Up => InputAction::AdjustRows(1),
            VirtualKeyCode::Down => InputAction::AdjustRows(-1),

            VirtualKeyCode::Right => InputAction::CycleShape(1),
            VirtualKeyCode::Left => InputAction::CycleShape(-1),

            VirtualKeyCode::A => InputAction::ToggleAnimation,
            VirtualKeyCode::C => InputAction::CopyResult,
            VirtualKeyCode::Escape => InputAction::ClearPattern,

            _ => InputAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_select_row_counts() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.action_for(ElementState::Pressed, VirtualKeyCode::Key2),
            InputAction::SetRows(2)
        );
        assert_eq!(
            handler.action_for(ElementState::Pressed, VirtualKeyCode::Key7),
            InputAction::SetRows(7)
        );
    }

    #[test]
    fn arrows_step_rows_and_shapes() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.action_for(ElementState::Pressed, VirtualKeyCode::Up),
            InputAction::AdjustRows(1)
        );
        assert_eq!(
            handler.action_for(ElementState::Pressed, VirtualKeyCode::Down),
            InputAction::AdjustRows(-1)
        );
        assert_eq!(
            handler.action_for(ElementState::Pressed, VirtualKeyCode::Left),
            InputAction::CycleShape(-1)
        );
    }

    #[test]
    fn releases_do_nothing() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.action_for(ElementState::Released, VirtualKeyCode::Key3),
            InputAction::None
        );
    }

    #[test]
    fn unmapped_keys_do_nothing() {
        let handler = InputHandler::new();
        assert_eq!(
            handler.action_for(ElementState::Pressed, VirtualKeyCode::Z),
            InputAction::None
        );
    }
}
