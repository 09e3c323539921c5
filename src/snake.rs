use std::collections::VecDeque;

use crate::Coords;
use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn between(from: Coords, to: Coords) -> Option<Direction> {
        let step = (to.0 - from.0, to.1 - from.1);
        Direction::ALL.iter().copied().find(|dir| dir.delta() == step)
    }

    pub fn step(self, pos: Coords) -> Coords {
        let (dx, dy) = self.delta();
        (pos.0 + dx, pos.1 + dy)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
    score: u32,
}

impl Snake {
    // Cells go tail first, head last
    pub fn from_body<I>(cells: I, direction: Direction) -> Option<Self>
    where
        I: IntoIterator<Item = Coords>,
    {
        let body: VecDeque<Coords> = cells.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Snake { body, direction, score: 0 })
    }

    pub fn straight(head: Coords, size: usize, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        let size = size.max(1) as i32;

        let body = (0..size).rev()
            .map(|i| (head.0 - dx * i, head.1 - dy * i))
            .collect();
        Snake { body, direction, score: 0 }
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> Coords {
        *self.body.back().expect("snake body is never empty")
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    // Leaves the tail alone, the caller decides whether to shift it
    pub fn move_towards(&mut self, direction: Direction) -> Coords {
        self.direction = direction;
        let new_head = direction.step(self.head());
        self.body.push_back(new_head);
        new_head
    }

    pub fn shift_tail(&mut self) -> Option<Coords> {
        self.body.pop_front()
    }

    pub fn eat(&mut self) {
        self.score += 1;
    }

    // Linear scan, fine for the snake lengths a terminal can show.
    pub fn on_snake(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    pub fn detect_self_collision(&self) -> bool {
        let head = self.head();
        self.body.iter().filter(|&&cell| cell == head).count() >= 2
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
