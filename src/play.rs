use std::sync::Arc;
use std::thread::{self, sleep};
use std::time::Duration;

use anyhow::{anyhow, ensure, Context, Result};
use crossterm::event::{poll, read, Event};
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::game::{Ending, Game, GameState, MoveResult};
use crate::input::{key_action, Controls, KeyAction};
use crate::snake::Direction;
use crate::term::TermManager;
use crate::world::World;
use crate::{Coords, TermInt};

/// Granularity of every wait: input polling, quit checks and tick countdown.
const POLL_INTERVAL_MS: u64 = 5;
pub const DEFAULT_TICK_MS: u64 = 200;

const SNAKE_BODY_CHAR: char = '█';
const APPLE_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

const STATUS_GAP: TermInt = 2;
const STATUS_WIDTH: TermInt = 20;

#[derive(Debug, Clone, Copy)]
pub struct Settings {
    pub tick: Duration,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings { tick: Duration::from_millis(DEFAULT_TICK_MS), seed: None }
    }
}

/// Runs rounds until the player quits. `new_config` supplies the layout of each round.
pub fn run<F>(new_config: F, settings: Settings) -> Result<()>
where
    F: Fn() -> GameConfig,
{
    let mut term = TermManager::new()?;
    term.setup()?;
    info!("session started, tick {:?}, seed {:?}", settings.tick, settings.seed);

    let controls = Arc::new(Controls::new(Direction::Right));
    let listener = {
        let controls = Arc::clone(&controls);
        thread::Builder::new()
            .name("input".into())
            .spawn(move || listen(&controls, next_event))
            .context("Error spawning input thread")?
    };

    let rng = settings.seed.map(StdRng::seed_from_u64);
    let mut session = Session { term, controls, new_config, tick: settings.tick, rng };
    let played = session.play_rounds();

    // Stops the listener if the rounds ended on an error
    session.controls.apply(KeyAction::Quit);
    let listened = listener.join().map_err(|_| anyhow!("input thread panicked"));
    session.term.restore()?;
    info!("session ended");

    played?;
    listened?
}

fn next_event() -> Result<Option<Event>> {
    if !poll(Duration::from_millis(POLL_INTERVAL_MS)).context("Error polling input")? {
        return Ok(None);
    }
    read().map(Some).context("Error reading input")
}

/// Feeds key presses into `controls` until a quit is requested.
///
/// Quit is also raised when the event source fails, so the tick driver
/// never outlives its input.
fn listen<E>(controls: &Controls, next_event: E) -> Result<()>
where
    E: FnMut() -> Result<Option<Event>>,
{
    let res = feed_keys(controls, next_event);
    if let Err(e) = &res {
        error!("input listener stopped: {:#}", e);
    }
    controls.apply(KeyAction::Quit);
    res
}

fn feed_keys<E>(controls: &Controls, mut next_event: E) -> Result<()>
where
    E: FnMut() -> Result<Option<Event>>,
{
    while !controls.should_quit() {
        if let Some(Event::Key(ev)) = next_event()? {
            let action = key_action(&ev);
            debug!("key {:?} -> {:?}", ev.code, action);
            if !controls.apply(action) {
                break;
            }
        }
    }
    Ok(())
}

/// Terminal size needed for the board plus the status panel, if it fits a `TermInt`.
fn footprint(world: &World) -> Option<(TermInt, TermInt)> {
    let (origin_x, origin_y) = world.origin();
    let width = TermInt::try_from(world.width()).ok()?;
    let height = TermInt::try_from(world.height()).ok()?;

    let needed_w = origin_x
        .checked_add(width)?
        .checked_add(1)?
        .checked_add(STATUS_GAP + STATUS_WIDTH)?;
    let needed_h = origin_y.checked_add(height)?.checked_add(1)?;
    Some((needed_w, needed_h))
}

struct Session<F> {
    term: TermManager,
    controls: Arc<Controls>,
    new_config: F,
    tick: Duration,
    // Only set when the session was started with a seed
    rng: Option<StdRng>,
}

impl<F> Session<F>
where
    F: Fn() -> GameConfig,
{
    fn play_rounds(&mut self) -> Result<()> {
        loop {
            if self.play_round()?.is_none() {
                return Ok(());
            }

            // Drop restarts pressed mid-round, then wait for a fresh one
            self.controls.take_restart();
            loop {
                sleep(Duration::from_millis(POLL_INTERVAL_MS));
                if self.controls.should_quit() {
                    return Ok(());
                }
                if self.controls.take_restart() {
                    info!("restarting");
                    break;
                }
            }
        }
    }

    /// Plays one round. Returns `None` if the player quit before it ended.
    fn play_round(&mut self) -> Result<Option<Ending>> {
        let config = (self.new_config)();
        let mut game = match self.rng.as_mut() {
            Some(rng) => Game::seeded(config, rng.gen())?,
            None => Game::from_entropy(config)?,
        };
        self.fit_check(&game)?;
        self.controls.reset(game.heading());

        self.term.clear()?;
        self.term.draw_walls(game.world())?;
        self.term.set_message_center(self.board_center(&game));
        self.print_snake(&game)?;
        self.print_cell(&game, game.food().pos(), APPLE_CHAR)?;
        self.print_status(&game)?;
        self.term.flush()?;

        let slices_per_step = (self.tick.as_millis() as u64 / POLL_INTERVAL_MS).max(1);
        let mut slices_until_step = slices_per_step;
        let mut paused = false;

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            if self.controls.should_quit() {
                return Ok(None);
            }

            if self.controls.is_paused() != paused {
                paused = !paused;
                self.toggle_pause(paused)?;
            }
            if paused { continue; }

            // Not paused, count down til the next game step
            slices_until_step -= 1;
            if slices_until_step > 0 { continue; }
            slices_until_step = slices_per_step;

            let mov = game.walk(self.controls.direction.load());
            self.print_snake_update(&game, &mov)?;

            if let GameState::Over(ending) = game.state() {
                self.game_over(&game, ending)?;
                return Ok(Some(ending));
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn fit_check(&self, game: &Game) -> Result<()> {
        let world = game.world();
        let (term_w, term_h) = self.term.get_terminal_size();
        let needed = footprint(world).ok_or_else(|| {
            anyhow!("a {}x{} board does not fit any terminal", world.width(), world.height())
        })?;

        ensure!(
            needed.0 <= term_w && needed.1 <= term_h,
            "the terminal is {}x{} but the board needs {}x{}",
            term_w, term_h, needed.0, needed.1
        );
        Ok(())
    }

    fn board_center(&self, game: &Game) -> (TermInt, TermInt) {
        let world = game.world();
        world.to_screen((world.width() / 2, world.height() / 2)).unwrap_or_else(|| {
            let (w, h) = self.term.get_terminal_size();
            (w / 2, h / 2)
        })
    }

    fn status_column(&self, game: &Game) -> TermInt {
        let world = game.world();
        let right_wall = TermInt::try_from(world.width()).unwrap_or(TermInt::MAX);
        world.origin().0.saturating_add(right_wall).saturating_add(1 + STATUS_GAP)
    }

    fn print_cell(&mut self, game: &Game, pos: Coords, ch: char) -> Result<()> {
        match game.world().to_screen(pos) {
            Some(cell) => self.term.print_at(cell, ch),
            None => Ok(()),
        }
    }

    fn print_snake(&mut self, game: &Game) -> Result<()> {
        let head = game.snake().head();

        for pos in game.body() {
            let ch = if pos == head { game.snake().head_char() } else { SNAKE_BODY_CHAR };
            self.print_cell(game, pos, ch)?;
        }

        self.term.flush()
    }

    fn print_snake_update(&mut self, game: &Game, mov: &MoveResult) -> Result<()> {
        if let MoveResult::Moved { new_head, old_head, old_tail, ate } = *mov {
            if let Some(old_tail_pos) = old_tail {
                self.print_cell(game, old_tail_pos, ' ')?;
            }
            self.print_cell(game, old_head, SNAKE_BODY_CHAR)?;
            self.print_cell(game, new_head, game.snake().head_char())?;

            let food = game.food().pos();
            if ate && game.state() != GameState::Over(Ending::BoardFull) {
                self.print_cell(game, food, APPLE_CHAR)?;
            }

            self.print_status(game)?;
            self.term.flush()?;
        }
        Ok(())
    }

    fn print_status(&mut self, game: &Game) -> Result<()> {
        let x = self.status_column(game);
        let y = game.world().origin().1;
        let head = game.snake().head();
        let food = game.food().pos();

        let lines = [
            format!("Score: {}", game.score()),
            format!("Length: {}", game.snake().len()),
            format!("Head: ({}, {})", head.0, head.1),
            format!("Food: ({}, {})", food.0, food.1),
        ];
        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{:<width$}", line, width = STATUS_WIDTH as usize);
            self.term.print_text((x, y + i as TermInt), &padded)?;
        }
        Ok(())
    }

    fn toggle_pause(&mut self, paused: bool) -> Result<()> {
        if paused {
            self.term.show_message(&["Paused", "Press P to resume", "or Q to quit"])
        } else {
            self.term.hide_message()
        }
    }

    fn game_over(&mut self, game: &Game, ending: Ending) -> Result<()> {
        let (title, reason) = match ending {
            Ending::BoardFull => ("You won!", "No room left for food"),
            Ending::Wall => ("Game over!", "Hit a wall"),
            Ending::SelfCollision => ("Game over!", "Ran into itself"),
        };

        if ending != Ending::BoardFull {
            for pos in game.body() {
                self.print_cell(game, pos, DEAD_SNAKE_CHAR)?;
            }
        }

        let score = format!("Score: {}", game.score());
        self.term.show_message(&[
            title,
            reason,
            &score,
            "",
            "Press R to play again,",
            "or Q to quit."
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;
    use crate::world::{BorderWall, Bounds};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Result<Option<Event>> {
        Ok(Some(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))))
    }

    #[test]
    fn test_failed_input_raises_quit() {
        let controls = Controls::new(Right);

        let res = listen(&controls, || Err(anyhow!("no terminal")));
        assert!(res.is_err());
        assert!(controls.should_quit());
    }

    #[test]
    fn test_input_error_after_keys_still_quits() {
        let controls = Controls::new(Right);
        let mut events = vec![Err(anyhow!("gone")), Ok(None), key(KeyCode::Up)];

        let res = listen(&controls, move || events.pop().unwrap_or(Ok(None)));
        assert!(res.is_err());
        assert_eq!(controls.direction.load(), Up);
        assert!(controls.should_quit());
    }

    #[test]
    fn test_listener_stops_on_quit_key() {
        let controls = Controls::new(Right);
        let mut events = vec![key(KeyCode::Char('q')), key(KeyCode::Left)];

        listen(&controls, move || events.pop().unwrap_or(Ok(None))).unwrap();
        assert_eq!(controls.direction.load(), Left);
        assert!(controls.should_quit());
    }

    #[test]
    fn test_footprint_includes_status_panel() {
        let world = World::new(Bounds::new(40, 20), (2, 1), Box::new(BorderWall));
        assert_eq!(footprint(&world), Some((2 + 41 + STATUS_GAP + STATUS_WIDTH, 22)));
    }

    #[test]
    fn test_footprint_rejects_huge_boards() {
        let wide = World::bordered(i32::MAX, 20);
        assert_eq!(footprint(&wide), None);

        let edge = World::new(Bounds::new(TermInt::MAX as i32 - 5, 20), (0, 0), Box::new(BorderWall));
        assert_eq!(footprint(&edge), None);
    }
}
