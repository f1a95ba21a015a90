//! Normalization of crossterm events into engine input events.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::types::{InputEvent, Key, KeyKind};

/// Map a keyboard event. Keys the engine has no name for yield `None`.
pub fn normalize_key(key: KeyEvent) -> Option<InputEvent> {
    let logical = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };

    let kind = match key.kind {
        KeyEventKind::Press => KeyKind::Press,
        KeyEventKind::Repeat => KeyKind::Repeat,
        KeyEventKind::Release => KeyKind::Release,
    };

    Some(InputEvent {
        key: logical,
        kind,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        pointer: None,
    })
}

/// Map any terminal event. Resize and focus events are not input here.
pub fn normalize_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => normalize_key(key),
        Event::Mouse(mouse) => {
            let kind = match mouse.kind {
                MouseEventKind::Down(_) => KeyKind::Press,
                MouseEventKind::Up(_) => KeyKind::Release,
                _ => return None,
            };
            Some(InputEvent {
                key: Key::Pointer,
                kind,
                ctrl: mouse.modifiers.contains(KeyModifiers::CONTROL),
                pointer: Some((mouse.column, mouse.row)),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton, MouseEvent};

    #[test]
    fn test_char_and_named_keys() {
        assert_eq!(
            normalize_key(KeyEvent::from(KeyCode::Char('q'))),
            Some(InputEvent::char('q'))
        );
        assert_eq!(
            normalize_key(KeyEvent::from(KeyCode::Enter)),
            Some(InputEvent::press(Key::Enter))
        );
        assert_eq!(
            normalize_key(KeyEvent::from(KeyCode::Esc)),
            Some(InputEvent::press(Key::Escape))
        );
        assert_eq!(
            normalize_key(KeyEvent::from(KeyCode::F(2))),
            Some(InputEvent::press(Key::F(2)))
        );
        assert_eq!(
            normalize_key(KeyEvent::from(KeyCode::Left)),
            Some(InputEvent::press(Key::Left))
        );
        assert_eq!(normalize_key(KeyEvent::from(KeyCode::Home)), None);
    }

    #[test]
    fn test_modifiers_and_kind() {
        let ctrl_c =
            normalize_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)).unwrap();
        assert!(ctrl_c.ctrl);
        assert_eq!(ctrl_c.key, Key::Char('c'));

        let release = KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(normalize_key(release).unwrap().kind, KeyKind::Release);
    }

    #[test]
    fn test_mouse_and_ignored_events() {
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        });
        let ev = normalize_event(click).unwrap();
        assert_eq!(ev.key, Key::Pointer);
        assert_eq!(ev.pointer, Some((7, 3)));

        assert_eq!(normalize_event(Event::Resize(80, 24)), None);
        assert_eq!(normalize_event(Event::FocusGained), None);
    }
}
