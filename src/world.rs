use std::collections::HashSet;
use std::fmt;

use crate::{Coords, TermInt};

// Cells run from 0 to width/height inclusive
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32) -> Self {
        Bounds { width, height }
    }

    pub fn on_edge(&self, pos: Coords) -> bool {
        pos.0 <= 0 || pos.1 <= 0 || pos.0 >= self.width || pos.1 >= self.height
    }
}

pub trait WallShape: fmt::Debug + Send {
    fn is_wall(&self, bounds: Bounds, pos: Coords) -> bool;
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BorderWall;

impl WallShape for BorderWall {
    fn is_wall(&self, bounds: Bounds, pos: Coords) -> bool {
        bounds.on_edge(pos)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Obstacles {
    blocks: HashSet<Coords>,
}

impl Obstacles {
    pub fn new<I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = Coords>,
    {
        Obstacles { blocks: blocks.into_iter().collect() }
    }
}

impl WallShape for Obstacles {
    fn is_wall(&self, bounds: Bounds, pos: Coords) -> bool {
        bounds.on_edge(pos) || self.blocks.contains(&pos)
    }
}

#[derive(Debug)]
pub struct World {
    bounds: Bounds,
    origin: (TermInt, TermInt),
    walls: Box<dyn WallShape>,
}

impl World {
    pub fn new(bounds: Bounds, origin: (TermInt, TermInt), walls: Box<dyn WallShape>) -> Self {
        World { bounds, origin, walls }
    }

    pub fn bordered(width: i32, height: i32) -> Self {
        World::new(Bounds::new(width, height), (0, 0), Box::new(BorderWall))
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn width(&self) -> i32 {
        self.bounds.width
    }

    pub fn height(&self) -> i32 {
        self.bounds.height
    }

    pub fn origin(&self) -> (TermInt, TermInt) {
        self.origin
    }

    pub fn is_wall(&self, pos: Coords) -> bool {
        self.walls.is_wall(self.bounds, pos)
    }

    pub fn cells(&self) -> impl Iterator<Item = Coords> {
        let Bounds { width, height } = self.bounds;
        (0..=height).flat_map(move |y| (0..=width).map(move |x| (x, y)))
    }

    pub fn open_cells(&self) -> usize {
        self.cells().filter(|&pos| !self.is_wall(pos)).count()
    }

    pub fn to_screen(&self, pos: Coords) -> Option<(TermInt, TermInt)> {
        let x = TermInt::try_from(pos.0 + i32::from(self.origin.0)).ok()?;
        let y = TermInt::try_from(pos.1 + i32::from(self.origin.1)).ok()?;
        Some((x, y))
    }
}
