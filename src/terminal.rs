// src/terminal.rs
// Raw mode handling, key input and full screen redraws.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::controls::Key;
use crate::logging::log_error;

/// Keeps the terminal in raw mode for as long as it lives.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0));
    }
}

pub fn map_key(key_event: KeyEvent) -> Option<Key> {
    if key_event.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let key = match key_event.code {
        KeyCode::Char('c') if ctrl => Key::CtrlC,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Esc => Key::Esc,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(key)
}

/// Background thread forwarding key presses to the event loop.
pub struct KeyReader {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl KeyReader {
    pub fn spawn(keys: UnboundedSender<Key>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let thread = std::thread::spawn(move || {
            while !flag.load(Ordering::SeqCst) {
                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => match event::read() {
                        Ok(Event::Key(key_event)) => {
                            if let Some(key) = map_key(key_event) {
                                if keys.send(key).is_err() {
                                    break;
                                }
                            }
                        }
                        Ok(_) => {}
                        Err(e) => {
                            log_error(&format!("Failed to read terminal event: {e}"));
                            break;
                        }
                    },
                    Ok(false) => {}
                    Err(e) => {
                        log_error(&format!("Failed to poll terminal: {e}"));
                        break;
                    }
                }
            }
        });
        Self { stop, thread: Some(thread) }
    }
}

impl Drop for KeyReader {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Clear the screen and draw `lines` from the top left corner.
pub fn draw(lines: &[String]) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    for line in lines {
        write!(stdout, "{line}\r\n")?;
    }
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent { code, modifiers, kind, state: KeyEventState::NONE }
    }

    #[test]
    fn test_map_key() {
        let press = KeyEventKind::Press;
        assert_eq!(map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL, press)), Some(Key::CtrlC));
        assert_eq!(map_key(key(KeyCode::Char('c'), KeyModifiers::NONE, press)), Some(Key::Char('c')));
        assert_eq!(map_key(key(KeyCode::F(5), KeyModifiers::NONE, press)), Some(Key::F(5)));
        assert_eq!(map_key(key(KeyCode::Home, KeyModifiers::NONE, press)), None);
    }

    #[test]
    fn test_releases_ignored() {
        assert_eq!(map_key(key(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Release)), None);
    }
}
