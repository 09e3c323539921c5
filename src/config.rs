use std::collections::HashSet;

use thiserror::Error;

use crate::food::Food;
use crate::snake::{Direction, Snake};
use crate::world::{BorderWall, Bounds, WallShape, World};
use crate::{Coords, TermInt};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("a {width}x{height} board has no room to play")]
    TooSmall { width: i32, height: i32 },
    #[error("a {width}x{height} board is larger than a terminal can show")]
    TooLarge { width: i32, height: i32 },
    #[error("the snake needs at least one cell")]
    EmptySnake,
    #[error("snake length is {declared} but the body has {actual} cells")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("snake cell {0:?} appears more than once")]
    SnakeOverlaps(Coords),
    #[error("snake cell {0:?} is inside a wall")]
    SnakeOnWall(Coords),
    #[error("food at {0:?} is inside a wall")]
    FoodOnWall(Coords),
    #[error("food at {0:?} is on the snake")]
    FoodOnSnake(Coords),
}

#[derive(Debug)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub origin: (TermInt, TermInt),
    // Tail first, head last
    pub snake: Vec<Coords>,
    pub length: usize,
    pub heading: Option<Direction>,
    pub food: Coords,
    pub walls: Box<dyn WallShape>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 100,
            height: 100,
            origin: (0, 0),
            snake: vec![(46, 50), (47, 50), (48, 50), (49, 50), (50, 50)],
            length: 5,
            heading: None,
            food: (52, 52),
            walls: Box::new(BorderWall),
        }
    }
}

impl GameConfig {
    pub fn demo() -> Self {
        GameConfig {
            width: 40,
            height: 20,
            snake: vec![(18, 12), (19, 12), (20, 12)],
            length: 3,
            food: (22, 16),
            ..Default::default()
        }
    }

    pub fn sized(width: i32, height: i32) -> Self {
        let head = (width / 2, height / 2);
        let snake = Snake::straight(head, 3, Direction::Right);

        GameConfig {
            width,
            height,
            snake: snake.body().iter().copied().collect(),
            length: 3,
            food: (head.0 + 2, head.1 + (height / 4).max(1)),
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: (TermInt, TermInt)) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_walls<W: WallShape + 'static>(mut self, walls: W) -> Self {
        self.walls = Box::new(walls);
        self
    }

    pub fn build(self) -> Result<(World, Snake, Food), ConfigError> {
        if self.width < 2 || self.height < 2 {
            return Err(ConfigError::TooSmall { width: self.width, height: self.height });
        }
        let max_side = i32::from(TermInt::MAX);
        if self.width > max_side || self.height > max_side {
            return Err(ConfigError::TooLarge { width: self.width, height: self.height });
        }

        if self.length != self.snake.len() {
            return Err(ConfigError::LengthMismatch {
                declared: self.length,
                actual: self.snake.len(),
            });
        }

        let world = World::new(Bounds::new(self.width, self.height), self.origin, self.walls);

        let mut seen = HashSet::with_capacity(self.snake.len());
        for &cell in &self.snake {
            if world.is_wall(cell) {
                return Err(ConfigError::SnakeOnWall(cell));
            }
            if !seen.insert(cell) {
                return Err(ConfigError::SnakeOverlaps(cell));
            }
        }

        let heading = self.heading.unwrap_or_else(|| match self.snake.as_slice() {
            [.., neck, head] => Direction::between(*neck, *head).unwrap_or(Direction::Right),
            _ => Direction::Right,
        });
        let snake = Snake::from_body(self.snake, heading).ok_or(ConfigError::EmptySnake)?;

        if world.is_wall(self.food) {
            return Err(ConfigError::FoodOnWall(self.food));
        }
        if snake.on_snake(self.food) {
            return Err(ConfigError::FoodOnSnake(self.food));
        }

        Ok((world, snake, Food::new(self.food)))
    }
}
