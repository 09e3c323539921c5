use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction::{self, *};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    Pause,
    Restart,
    Quit,
    Ignore,
}

pub fn key_action(ev: &KeyEvent) -> KeyAction {
    if is_ctrl_c(ev) {
        return KeyAction::Quit;
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => KeyAction::Turn(Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => KeyAction::Turn(Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => KeyAction::Turn(Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => KeyAction::Turn(Right),
        KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::Pause,
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
        _ => KeyAction::Ignore,
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

/// Latest direction requested by the player.
///
/// Written by the input thread whenever a key arrives and read once per tick.
/// Later writes overwrite earlier ones; nothing is queued.
#[derive(Debug)]
pub struct DirectionCell(AtomicU8);

impl DirectionCell {
    pub fn new(direction: Direction) -> Self {
        DirectionCell(AtomicU8::new(encode(direction)))
    }

    pub fn store(&self, direction: Direction) {
        self.0.store(encode(direction), Ordering::Release);
    }

    pub fn load(&self) -> Direction {
        decode(self.0.load(Ordering::Acquire))
    }
}

fn encode(direction: Direction) -> u8 {
    match direction {
        Up => 0,
        Down => 1,
        Left => 2,
        Right => 3,
    }
}

fn decode(raw: u8) -> Direction {
    match raw {
        0 => Up,
        1 => Down,
        2 => Left,
        _ => Right,
    }
}

/// State shared between the input listener and the tick driver.
#[derive(Debug)]
pub struct Controls {
    pub direction: DirectionCell,
    quit: AtomicBool,
    paused: AtomicBool,
    restart: AtomicBool,
}

impl Controls {
    pub fn new(direction: Direction) -> Self {
        Controls {
            direction: DirectionCell::new(direction),
            quit: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            restart: AtomicBool::new(false),
        }
    }

    /// Applies a key press. Returns `false` once the listener should stop.
    pub fn apply(&self, action: KeyAction) -> bool {
        match action {
            KeyAction::Turn(dir) => self.direction.store(dir),
            KeyAction::Pause => { self.paused.fetch_xor(true, Ordering::AcqRel); },
            KeyAction::Restart => self.restart.store(true, Ordering::Release),
            KeyAction::Quit => self.quit.store(true, Ordering::Release),
            KeyAction::Ignore => {}
        }
        !self.should_quit()
    }

    pub fn should_quit(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Consumes a pending restart request.
    pub fn take_restart(&self) -> bool {
        self.restart.swap(false, Ordering::AcqRel)
    }

    /// Clears everything but quit for a fresh round heading `direction`.
    pub fn reset(&self, direction: Direction) {
        self.direction.store(direction);
        self.paused.store(false, Ordering::Release);
        self.restart.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(key_action(&key(KeyCode::Up)), KeyAction::Turn(Up));
        assert_eq!(key_action(&key(KeyCode::Down)), KeyAction::Turn(Down));
        assert_eq!(key_action(&key(KeyCode::Left)), KeyAction::Turn(Left));
        assert_eq!(key_action(&key(KeyCode::Right)), KeyAction::Turn(Right));
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(key_action(&key(KeyCode::Char('w'))), KeyAction::Turn(Up));
        assert_eq!(key_action(&key(KeyCode::Char('a'))), KeyAction::Turn(Left));
        assert_eq!(key_action(&key(KeyCode::Char('s'))), KeyAction::Turn(Down));
        assert_eq!(key_action(&key(KeyCode::Char('D'))), KeyAction::Turn(Right));
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(key_action(&key(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(key_action(&key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(key_action(&key(KeyCode::Char('p'))), KeyAction::Pause);
        assert_eq!(key_action(&key(KeyCode::Char('r'))), KeyAction::Restart);
        assert_eq!(key_action(&key(KeyCode::Char('x'))), KeyAction::Ignore);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_ctrl_c(&ctrl_c));
        assert_eq!(key_action(&ctrl_c), KeyAction::Quit);
        assert!(!is_ctrl_c(&key(KeyCode::Char('c'))));
    }

    #[test]
    fn test_direction_cell_last_write_wins() {
        let cell = DirectionCell::new(Right);
        assert_eq!(cell.load(), Right);

        cell.store(Up);
        cell.store(Left);
        assert_eq!(cell.load(), Left);
        assert_eq!(cell.load(), Left);
    }

    #[test]
    fn test_direction_roundtrips_through_byte() {
        for &dir in Direction::ALL.iter() {
            assert_eq!(decode(encode(dir)), dir);
        }
    }

    #[test]
    fn test_controls_flags() {
        let controls = Controls::new(Right);
        assert!(!controls.is_paused());

        assert!(controls.apply(KeyAction::Pause));
        assert!(controls.is_paused());
        assert!(controls.apply(KeyAction::Pause));
        assert!(!controls.is_paused());

        assert!(controls.apply(KeyAction::Restart));
        assert!(controls.take_restart());
        assert!(!controls.take_restart());

        assert!(!controls.apply(KeyAction::Quit));
        assert!(controls.should_quit());
    }

    #[test]
    fn test_reset_keeps_quit() {
        let controls = Controls::new(Right);
        controls.apply(KeyAction::Turn(Up));
        controls.apply(KeyAction::Pause);
        controls.apply(KeyAction::Quit);

        controls.reset(Left);
        assert_eq!(controls.direction.load(), Left);
        assert!(!controls.is_paused());
        assert!(controls.should_quit());
    }

    #[test]
    fn test_direction_visible_across_threads() {
        let controls = Arc::new(Controls::new(Right));
        let writer = Arc::clone(&controls);

        thread::spawn(move || {
            writer.apply(KeyAction::Turn(Down));
            writer.apply(KeyAction::Turn(Left));
        })
        .join()
        .unwrap();

        assert_eq!(controls.direction.load(), Left);
    }
}
