use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigError, GameConfig};
use crate::food::{BoardFull, Food};
use crate::snake::{Direction::{self, *}, Snake};
use crate::world::World;
use crate::Coords;

/// Why a game ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ending {
    Wall,
    SelfCollision,
    /// The snake covers every free cell, so there is nowhere left to put food.
    BoardFull,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameState {
    Running,
    Over(Ending),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Coords, old_head: Coords, old_tail: Option<Coords>, ate: bool },
    /// The game was already over and nothing changed.
    Frozen,
}

pub struct Game<R = StdRng> {
    world: World,
    snake: Snake,
    food: Food,
    state: GameState,
    rng: R,
}

impl Game<StdRng> {
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Game::new(config, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: GameConfig) -> Result<Self, ConfigError> {
        Game::new(config, StdRng::from_entropy())
    }
}

impl<R: Rng> Game<R> {
    pub fn new(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        let (world, snake, food) = config.build()?;
        Ok(Game { world, snake, food, state: GameState::Running, rng })
    }

    /// Advances the snake one cell towards `direction`.
    ///
    /// Any direction is accepted, including the one the snake came from,
    /// which runs the head straight into the neck.
    pub fn walk(&mut self, direction: Direction) -> MoveResult {
        if self.is_over() {
            return MoveResult::Frozen;
        }

        let old_head = self.snake.head();
        let new_head = self.snake.move_towards(direction);
        let ate = new_head == self.food.pos();

        let old_tail = if ate {
            self.snake.eat();
            debug!("food eaten at {:?}, score {}", new_head, self.snake.score());
            match Food::relocate(&self.world, &self.snake, &mut self.rng) {
                Ok(food) => self.food = food,
                Err(BoardFull) => self.end(Ending::BoardFull),
            }
            None
        } else {
            self.snake.shift_tail()
        };

        if self.world.is_wall(new_head) {
            self.end(Ending::Wall);
        } else if self.snake.detect_self_collision() {
            self.end(Ending::SelfCollision);
        }

        MoveResult::Moved { new_head, old_head, old_tail, ate }
    }

    pub fn walk_up(&mut self) -> MoveResult {
        self.walk(Up)
    }

    pub fn walk_down(&mut self) -> MoveResult {
        self.walk(Down)
    }

    pub fn walk_left(&mut self) -> MoveResult {
        self.walk(Left)
    }

    pub fn walk_right(&mut self) -> MoveResult {
        self.walk(Right)
    }
}

impl<R> Game<R> {
    pub fn is_over(&self) -> bool {
        matches!(self.state, GameState::Over(_))
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.snake.score()
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn body(&self) -> impl Iterator<Item = Coords> + '_ {
        self.snake.body().iter().copied()
    }

    // After Over(BoardFull) this is the cell the head ate last, so it sits on the snake
    pub fn food(&self) -> Food {
        self.food
    }

    pub fn heading(&self) -> Direction {
        self.snake.get_direction()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    fn end(&mut self, ending: Ending) {
        if self.is_over() {
            return;
        }
        info!("game over ({:?}) with score {} and length {}", ending, self.score(), self.snake.len());
        self.state = GameState::Over(ending);
    }
}

impl<R> std::fmt::Debug for Game<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("world", &self.world)
            .field("snake", &self.snake)
            .field("food", &self.food)
            .field("state", &self.state)
            .finish()
    }
}
