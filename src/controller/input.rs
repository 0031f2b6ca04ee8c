//! Key event handling

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{AppController, Flow};

/// Key presses the loop understands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Right,
    Left,
    Select,
    Help,
    Quit,
}

pub fn map_key(key: KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Right | KeyCode::Char('l') => Some(Input::Right),
        KeyCode::Left | KeyCode::Char('h') => Some(Input::Left),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Input::Select),
        KeyCode::Char('?') => Some(Input::Help),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Input::Quit),
        _ => None,
    }
}

impl AppController {
    pub(crate) fn handle_input(&mut self, input: Input) -> Flow {
        match input {
            Input::Right => self.model.ui_state.select_next(),
            Input::Left => self.model.ui_state.select_prev(),
            Input::Help => self.model.ui_state.toggle_help(),
            Input::Select => {
                let control = self.model.ui_state.selected_control();
                self.dispatch_control(control);
            }
            Input::Quit => {
                tracing::info!("Quit requested");
                self.model.terminate();
                return Flow::Exit;
            }
        }
        Flow::Continue
    }
}
