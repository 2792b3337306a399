//! Grid module - generic 2-D spatial store
//!
//! Maps integer coordinates to an optional occupant. Uses a flat vector in
//! row-major order (`y * width + x`, row 0 at the bottom) for cache locality.
//!
//! The grid is the single source of truth for "what is where". It does not
//! know anything about the occupants: [`Grid::swap`] exchanges stored values
//! only, and callers that cache a position inside the occupant must update it
//! themselves (see [`Board`](crate::Board)).
//!
//! Every accessor fails instead of clamping:
//! - [`GridError::NotInitialized`] before [`Grid::initialize`] succeeded
//! - [`GridError::OutOfBounds`] for coordinates outside the extents

use match3_types::Position;

use crate::error::GridError;

/// Fixed-size 2-D store of optional occupants
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: i32,
    height: i32,
    /// Flat cells, row-major (y * width + x). Empty until initialized.
    cells: Vec<Option<T>>,
    ready: bool,
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            ready: false,
        }
    }
}

impl<T> Grid<T> {
    /// Create and initialize a grid in one step
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        let mut grid = Self::default();
        grid.initialize(width, height)?;
        Ok(grid)
    }

    /// Allocate `width * height` empty cells.
    ///
    /// Fails with [`GridError::InvalidDimensions`] if either side is not positive;
    /// a failed call leaves the grid untouched.
    pub fn initialize(&mut self, width: i32, height: i32) -> Result<(), GridError> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let size = (width as usize) * (height as usize);
        self.cells = std::iter::repeat_with(|| None).take(size).collect();
        self.width = width;
        self.height = height;
        self.ready = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.ready
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// False for an uninitialized grid
    pub fn is_within_bounds(&self, pos: Position) -> bool {
        self.ready && pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    #[inline]
    fn index(&self, pos: Position) -> Result<usize, GridError> {
        if !self.ready {
            return Err(GridError::NotInitialized);
        }
        if !self.is_within_bounds(pos) {
            return Err(GridError::OutOfBounds(pos));
        }
        Ok((pos.y as usize) * (self.width as usize) + (pos.x as usize))
    }

    pub fn is_empty(&self, pos: Position) -> Result<bool, GridError> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx].is_none())
    }

    pub fn get(&self, pos: Position) -> Result<Option<&T>, GridError> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx].as_ref())
    }

    pub fn get_mut(&mut self, pos: Position) -> Result<Option<&mut T>, GridError> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx].as_mut())
    }

    /// Occupant at `pos`, treating out-of-bounds and uninitialized as empty.
    ///
    /// Convenience for scans that walk off the edge on purpose.
    pub fn peek(&self, pos: Position) -> Option<&T> {
        self.get(pos).ok().flatten()
    }

    /// Store `value` at `pos`, returning whatever was displaced
    pub fn set(&mut self, pos: Position, value: T) -> Result<Option<T>, GridError> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx].replace(value))
    }

    /// Empty the cell, returning the removed occupant
    pub fn remove(&mut self, pos: Position) -> Result<Option<T>, GridError> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx].take())
    }

    /// Exchange the stored values of two cells. Validates both positions first,
    /// so a failing call never mutates.
    pub fn swap(&mut self, a: Position, b: Position) -> Result<(), GridError> {
        let ia = self.index(a)?;
        let ib = self.index(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Remove every occupant, yielding them in row-major order
    pub fn drain(&mut self) -> Result<Vec<T>, GridError> {
        if !self.ready {
            return Err(GridError::NotInitialized);
        }
        Ok(self.cells.iter_mut().filter_map(Option::take).collect())
    }

    /// Every coordinate, bottom row first, left to right
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let (width, height) = if self.ready {
            (self.width, self.height)
        } else {
            (0, 0)
        };
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Occupied cells with their coordinates, bottom row first
    pub fn occupied(&self) -> impl Iterator<Item = (Position, &T)> {
        let width = self.width.max(1);
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.as_ref().map(|value| {
                let idx = idx as i32;
                (Position::new(idx % width, idx / width), value)
            })
        })
    }
}
