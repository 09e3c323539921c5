use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::snake::Snake;
use crate::world::World;
use crate::Coords;

const MIN_RANDOM_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no free cell left for food")]
pub struct BoardFull;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Food(Coords);

impl Food {
    pub fn new(pos: Coords) -> Self {
        Food(pos)
    }

    pub fn pos(&self) -> Coords {
        self.0
    }

    pub fn relocate<R>(world: &World, snake: &Snake, rng: &mut R) -> Result<Food, BoardFull>
    where
        R: Rng,
    {
        let is_free = |pos: Coords| !world.is_wall(pos) && !snake.on_snake(pos);
        let bounds = world.bounds();
        let attempts = MIN_RANDOM_ATTEMPTS.max(world.open_cells());

        for _ in 0..attempts {
            let pos = (rng.gen_range(0..=bounds.width), rng.gen_range(0..=bounds.height));
            if is_free(pos) {
                debug!("food placed at {:?}", pos);
                return Ok(Food(pos));
            }
        }

        // Crowded board, pick among the free cells directly
        warn!("random food placement gave up after {} attempts, scanning the board", attempts);
        let choices: Vec<Coords> = world.cells().filter(|&pos| is_free(pos)).collect();
        choices.choose(rng).copied().map(Food).ok_or(BoardFull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_relocate_avoids_snake_and_walls() {
        let world = World::bordered(10, 10);
        let snake = Snake::straight((6, 5), 5, Direction::Right);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let food = Food::relocate(&world, &snake, &mut rng).unwrap();
            assert!(!world.is_wall(food.pos()));
            assert!(!snake.on_snake(food.pos()));
        }
    }

    #[test]
    fn test_relocate_finds_last_free_cell() {
        // 3x3 interior, snake covers all but (3, 3)
        let world = World::bordered(4, 4);
        let body = vec![(1, 1), (2, 1), (3, 1), (3, 2), (2, 2), (1, 2), (1, 3), (2, 3)];
        let snake = Snake::from_body(body, Direction::Right).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let food = Food::relocate(&world, &snake, &mut rng).unwrap();
        assert_eq!(food.pos(), (3, 3));
    }

    #[test]
    fn test_relocate_reports_full_board() {
        let world = World::bordered(3, 3);
        let body = vec![(1, 1), (2, 1), (2, 2), (1, 2)];
        let snake = Snake::from_body(body, Direction::Left).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(Food::relocate(&world, &snake, &mut rng), Err(BoardFull));
    }

    #[test]
    fn test_relocate_reaches_every_free_cell() {
        let world = World::bordered(4, 4);
        let snake = Snake::from_body(vec![(1, 1)], Direction::Right).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(Food::relocate(&world, &snake, &mut rng).unwrap().pos());
        }
        assert_eq!(seen.len(), world.open_cells() - 1);
    }
}
