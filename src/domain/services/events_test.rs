use crossterm::event::Event as CrosstermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use tui_textarea::Key;

use super::EventsService;
use crate::domain::models::Event;

fn key(code: KeyCode, modifiers: KeyModifiers) -> Option<Event> {
    return EventsService::handle_crossterm(CrosstermEvent::Key(KeyEvent::new(code, modifiers)));
}

#[test]
fn it_maps_control_keys() {
    assert!(matches!(
        key(KeyCode::Char('c'), KeyModifiers::CONTROL),
        Some(Event::KeyboardCTRLC())
    ));
    assert!(matches!(
        key(KeyCode::Char('l'), KeyModifiers::CONTROL),
        Some(Event::KeyboardCTRLL())
    ));
    assert!(matches!(
        key(KeyCode::Char('d'), KeyModifiers::CONTROL),
        Some(Event::UIScrollPageDown())
    ));
    assert!(matches!(
        key(KeyCode::Char('u'), KeyModifiers::CONTROL),
        Some(Event::UIScrollPageUp())
    ));
}

#[test]
fn it_maps_navigation_keys() {
    assert!(matches!(
        key(KeyCode::Up, KeyModifiers::NONE),
        Some(Event::UIScrollUp())
    ));
    assert!(matches!(
        key(KeyCode::Down, KeyModifiers::NONE),
        Some(Event::UIScrollDown())
    ));
    assert!(matches!(
        key(KeyCode::Enter, KeyModifiers::NONE),
        Some(Event::KeyboardEnter())
    ));
}

#[test]
fn it_passes_through_characters() {
    match key(KeyCode::Char('l'), KeyModifiers::NONE) {
        Some(Event::KeyboardCharInput(input)) => {
            assert_eq!(input.key, Key::Char('l'));
            assert!(!input.ctrl);
        }
        _ => panic!("expected char input"),
    }
}

#[test]
fn it_maps_mouse_scroll() {
    let event = CrosstermEvent::Mouse(MouseEvent {
        kind: MouseEventKind::ScrollDown,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    });
    assert!(matches!(
        EventsService::handle_crossterm(event),
        Some(Event::UIScrollDown())
    ));

    let ignored = CrosstermEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Moved,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    });
    assert!(EventsService::handle_crossterm(ignored).is_none());
}

#[test]
fn it_maps_paste() {
    match EventsService::handle_crossterm(CrosstermEvent::Paste("hello".to_string())) {
        Some(Event::KeyboardPaste(text)) => assert_eq!(text, "hello"),
        _ => panic!("expected paste"),
    }
}
