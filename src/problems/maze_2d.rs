use derive_more::Display;
use nonmax::NonMaxU32;
use thiserror::Error;

use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::Space;
use crate::space::State;

const MAX_ELEMENTS_DISPLAYED: usize = 20;
const RANDOM_STATE_MAX_TRIES: usize = 10_000;

pub(crate) type CoordIntrinsic = u32;
pub type Coord = NonMaxU32;

/// A cell position. `x` is the column, `y` the row, both zero-based from the
/// top-left corner.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
#[display("({x},{y})")]
pub struct Maze2DState {
    pub(crate) x: Coord,
    pub(crate) y: Coord,
}

impl Maze2DState {
    pub(crate) fn new(x: CoordIntrinsic, y: CoordIntrinsic) -> Option<Maze2DState> {
        Some(Maze2DState {
            x: Coord::new(x)?,
            y: Coord::new(y)?,
        })
    }
    pub fn new_from_usize(x: usize, y: usize) -> Option<Maze2DState> {
        let x = (x < CoordIntrinsic::MAX as usize).then_some(x as CoordIntrinsic)?;
        let y = (y < CoordIntrinsic::MAX as usize).then_some(y as CoordIntrinsic)?;

        Maze2DState::new(x, y)
    }
    pub(crate) fn new_from_small_usize(x: usize, y: usize) -> Maze2DState {
        debug_assert!(x < CoordIntrinsic::MAX as usize);
        debug_assert!(y < CoordIntrinsic::MAX as usize);

        Maze2DState::new(x as CoordIntrinsic, y as CoordIntrinsic).unwrap()
    }
    pub(crate) fn safe_dimensions(max_x: usize, max_y: usize) -> bool {
        (max_x < CoordIntrinsic::MAX as usize) && (max_y < CoordIntrinsic::MAX as usize)
    }

    pub fn x(&self) -> usize {
        self.x.get() as usize
    }
    pub fn y(&self) -> usize {
        self.y.get() as usize
    }
}
impl State for Maze2DState {}

/// The four orthogonal steps.
///
/// Expansion always tries them in declaration order (Up, Right, Down, Left).
/// The order decides which equally-short path a search finds when several
/// exist, never whether one is found.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Maze2DAction {
    #[display("↑")]
    Up, // y--
    #[display("→")]
    Right, // x++
    #[display("↓")]
    Down, // y++
    #[display("←")]
    Left, // x--
}
impl Action for Maze2DAction {}

const ALL_ACTIONS: [Maze2DAction; 4] = [
    Maze2DAction::Up,
    Maze2DAction::Right,
    Maze2DAction::Down,
    Maze2DAction::Left,
];

pub type Maze2DCost = CoordIntrinsic;

#[derive(Copy, Clone, Debug, Display, PartialEq)]
pub enum Maze2DCell {
    #[display("░")]
    Empty,
    #[display("█")]
    Wall,
}

#[derive(Debug, Error)]
pub enum Maze2DCellParseError {
    #[error("Invalid character '{0}' found.")]
    InvalidCharacter(char),
}

impl std::convert::TryFrom<char> for Maze2DCell {
    type Error = Maze2DCellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            ' ' | '.' => Ok(Maze2DCell::Empty),
            '#' | '█' => Ok(Maze2DCell::Wall),
            ch => Err(Maze2DCellParseError::InvalidCharacter(ch)),
        }
    }
}

#[derive(Clone)]
pub struct Maze2DSpace {
    pub(crate) map: Vec<Vec<Maze2DCell>>,
}

impl Maze2DSpace {
    pub(crate) fn new_empty_with_dimensions(x: usize, y: usize) -> Self {
        Self {
            map: vec![vec![Maze2DCell::Empty; x]; y],
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        if self.map.is_empty() {
            return (0, 0);
        }
        (self.map[0].len(), self.map.len())
    }

    #[inline(always)]
    pub(crate) fn at(&self, state: &Maze2DState) -> Maze2DCell {
        debug_assert!(self.valid(state));
        self.map[state.y()][state.x()]
    }
}

impl Space<Maze2DState, Maze2DAction, Maze2DCost> for Maze2DSpace {
    /// Steps to the adjacent open cell, or `None` when the step leaves the
    /// grid or runs into a wall.
    #[inline(always)]
    fn apply(&self, state: &Maze2DState, action: &Maze2DAction) -> Option<Maze2DState> {
        let x = state.x.get();
        let y = state.y.get();

        #[rustfmt::skip]
        let (x, y) = match action {
            Maze2DAction::Up    => (Some(x),           y.checked_sub(1)),
            Maze2DAction::Right => (x.checked_add(1),  Some(y)),
            Maze2DAction::Down  => (Some(x),           y.checked_add(1)),
            Maze2DAction::Left  => (x.checked_sub(1),  Some(y)),
        };

        let next = Maze2DState::new(x?, y?)?;
        (self.valid(&next) && self.at(&next) != Maze2DCell::Wall).then_some(next)
    }

    #[inline(always)]
    fn valid(&self, state: &Maze2DState) -> bool {
        let (max_x, max_y) = self.dimensions();

        state.x() < max_x && state.y() < max_y
    }

    /// Gets the open neighbours of a given position.
    ///
    /// NOTE: These states can only be used with the current maze.
    fn neighbours(&self, state: &Maze2DState) -> Vec<(Maze2DState, Maze2DAction)> {
        let mut v = Vec::<(Maze2DState, Maze2DAction)>::with_capacity(4);
        for action in ALL_ACTIONS {
            if let Some(s) = self.apply(state, &action) {
                v.push((s, action));
            }
        }
        v
    }

    fn size(&self) -> Option<usize> {
        let (max_x, max_y) = self.dimensions();
        Some(max_x * max_y)
    }

    fn supports_random_state() -> bool {
        true
    }
    fn random_state<R: rand::Rng>(&self, r: &mut R) -> Option<Maze2DState> {
        let (max_x, max_y) = self.dimensions();
        if max_x == 0 || max_y == 0 || !Maze2DState::safe_dimensions(max_x, max_y) {
            return None;
        }
        let (max_x, max_y) = (max_x as CoordIntrinsic, max_y as CoordIntrinsic);

        for _tries in 0..RANDOM_STATE_MAX_TRIES {
            let x = r.random::<CoordIntrinsic>() % max_x;
            let y = r.random::<CoordIntrinsic>() % max_y;
            if self.map[y as usize][x as usize] == Maze2DCell::Empty {
                return Maze2DState::new(x, y);
            }
        }

        None
    }
}

impl std::fmt::Display for Maze2DSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let d = self.dimensions();
        writeln!(f, "Maze2D({}x{}):", d.0, d.1)?;
        for line in self.map.iter().take(MAX_ELEMENTS_DISPLAYED) {
            for cell in line.iter().take(MAX_ELEMENTS_DISPLAYED) {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Maze2DSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Maze2D{:?}", self.dimensions())
    }
}

/// A cell in a problem description: a maze cell or an endpoint marker.
#[derive(Copy, Clone, Debug, Display, PartialEq)]
pub enum Maze2DProblemCell {
    Cell(Maze2DCell),
    #[display("S")]
    Start,
    #[display("G")]
    Goal,
}

impl std::convert::TryFrom<char> for Maze2DProblemCell {
    type Error = Maze2DCellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            'S' => Ok(Maze2DProblemCell::Start),
            // Goal is spelled 'E' in some corpora.
            'G' | 'E' => Ok(Maze2DProblemCell::Goal),
            ch => Ok(Maze2DProblemCell::Cell(Maze2DCell::try_from(ch)?)),
        }
    }
}

#[derive(Debug, Error)]
pub enum Maze2DProblemError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Line {line} does not match the width of the first line")]
    RaggedInput { line: usize },
    #[error("Invalid cell {e} found at ({x},{y})")]
    InvalidCell {
        e: Maze2DCellParseError,
        x: usize,
        y: usize,
    },
    #[error("No start marker found")]
    MissingStart,
    #[error("No goal marker found")]
    MissingGoal,
    #[error("Second start marker found at ({x},{y})")]
    DuplicateStart { x: usize, y: usize },
    #[error("Second goal marker found at ({x},{y})")]
    DuplicateGoal { x: usize, y: usize },
    #[error("Endpoint ({x},{y}) is outside the grid")]
    OutOfBounds { x: usize, y: usize },
    #[error("Endpoint ({x},{y}) is a wall cell")]
    WallEndpoint { x: usize, y: usize },
}

/// A single-start single-goal maze.
#[derive(Clone, Debug)]
pub struct Maze2DProblem {
    space: Maze2DSpace,
    start: Maze2DState,
    goal: Maze2DState,
}

impl Maze2DProblem {
    /// Builds a problem over `space`, failing fast on endpoints that are
    /// outside the grid or on walls.
    pub fn new(
        space: Maze2DSpace,
        start: Maze2DState,
        goal: Maze2DState,
    ) -> Result<Self, Maze2DProblemError> {
        for endpoint in [&start, &goal] {
            if !space.valid(endpoint) {
                return Err(Maze2DProblemError::OutOfBounds {
                    x: endpoint.x(),
                    y: endpoint.y(),
                });
            }
            if space.at(endpoint) == Maze2DCell::Wall {
                return Err(Maze2DProblemError::WallEndpoint {
                    x: endpoint.x(),
                    y: endpoint.y(),
                });
            }
        }

        Ok(Self { space, start, goal })
    }

    /// Builds a maze from numeric rows: `0` is open, anything else a wall.
    ///
    /// Endpoints are `(row, column)` pairs, matching how the rows read.
    pub fn from_numeric(
        rows: &[Vec<u8>],
        start: (usize, usize),
        goal: (usize, usize),
    ) -> Result<Self, Maze2DProblemError> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(Maze2DProblemError::EmptyInput);
        }

        let max_x = rows[0].len();
        let max_y = rows.len();
        if !Maze2DState::safe_dimensions(max_x, max_y) {
            return Err(Maze2DProblemError::OutOfBounds { x: max_x, y: max_y });
        }

        let mut space = Maze2DSpace::new_empty_with_dimensions(max_x, max_y);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != max_x {
                return Err(Maze2DProblemError::RaggedInput { line: y });
            }
            for (x, &value) in row.iter().enumerate() {
                space.map[y][x] = if value == 0 {
                    Maze2DCell::Empty
                } else {
                    Maze2DCell::Wall
                };
            }
        }

        // (row, column) -> (x, y)
        let (start_y, start_x) = start;
        let (goal_y, goal_x) = goal;
        let start = Maze2DState::new_from_usize(start_x, start_y)
            .ok_or(Maze2DProblemError::OutOfBounds {
                x: start_x,
                y: start_y,
            })?;
        let goal = Maze2DState::new_from_usize(goal_x, goal_y)
            .ok_or(Maze2DProblemError::OutOfBounds { x: goal_x, y: goal_y })?;

        Maze2DProblem::new(space, start, goal)
    }

    /// Re-draws the endpoints among the open cells. Keeps the maze.
    pub fn randomize<R: rand::Rng>(&self, r: &mut R) -> Option<Maze2DProblem> {
        let start = self.space.random_state(r)?;
        let goal = self.space.random_state(r)?;

        Maze2DProblem::new(self.space.clone(), start, goal).ok()
    }
}

impl Problem<Maze2DSpace, Maze2DState, Maze2DAction, Maze2DCost> for Maze2DProblem {
    fn space(&self) -> &Maze2DSpace {
        &self.space
    }
    fn start(&self) -> Maze2DState {
        self.start
    }
    fn goal(&self) -> Maze2DState {
        self.goal
    }
}

impl std::convert::TryFrom<&str> for Maze2DProblem {
    type Error = Maze2DProblemError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let lines: Vec<&str> = s.lines().collect();

        if lines.is_empty() || lines[0].is_empty() {
            return Err(Maze2DProblemError::EmptyInput);
        }

        let max_x = lines[0].chars().count();
        let max_y = lines.len();
        if !Maze2DState::safe_dimensions(max_x, max_y) {
            return Err(Maze2DProblemError::OutOfBounds { x: max_x, y: max_y });
        }

        let mut space = Maze2DSpace::new_empty_with_dimensions(max_x, max_y);
        let mut start: Option<Maze2DState> = None;
        let mut goal: Option<Maze2DState> = None;

        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() != max_x {
                return Err(Maze2DProblemError::RaggedInput { line: y });
            }
            for (x, ch) in line.chars().enumerate() {
                let cell = Maze2DProblemCell::try_from(ch)
                    .map_err(|e| Maze2DProblemError::InvalidCell { e, x, y })?;

                space.map[y][x] = match cell {
                    Maze2DProblemCell::Start => {
                        if start.is_some() {
                            return Err(Maze2DProblemError::DuplicateStart { x, y });
                        }
                        start = Some(Maze2DState::new_from_small_usize(x, y));
                        Maze2DCell::Empty
                    }
                    Maze2DProblemCell::Goal => {
                        if goal.is_some() {
                            return Err(Maze2DProblemError::DuplicateGoal { x, y });
                        }
                        goal = Some(Maze2DState::new_from_small_usize(x, y));
                        Maze2DCell::Empty
                    }
                    Maze2DProblemCell::Cell(c) => c,
                }
            }
        }

        let start = start.ok_or(Maze2DProblemError::MissingStart)?;
        let goal = goal.ok_or(Maze2DProblemError::MissingGoal)?;
        Maze2DProblem::new(space, start, goal)
    }
}

impl std::fmt::Display for Maze2DProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let d = self.space.dimensions();
        debug_assert!(Maze2DState::safe_dimensions(d.0, d.1));

        writeln!(
            f,
            "Maze2DProblem({}x{}) (s:{}, g:{}):",
            d.0, d.1, self.start, self.goal
        )?;
        let map = &self.space.map;
        for (y, line) in map.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
            for (x, cell) in line.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
                let s = Maze2DState::new_from_small_usize(x, y);

                if s == self.start {
                    write!(f, "S")?;
                } else if s == self.goal {
                    write!(f, "G")?;
                } else {
                    write!(f, "{cell}")?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Manhattan distance to the goal.
///
/// Admissible on 4-connected unit-cost grids: every step closes at most one
/// unit of `|dx| + |dy|`.
#[derive(Debug)]
pub struct Maze2DHeuristicManhattan;

impl Heuristic<Maze2DProblem, Maze2DSpace, Maze2DState, Maze2DAction, Maze2DCost>
    for Maze2DHeuristicManhattan
{
    #[inline(always)]
    fn h(p: &Maze2DProblem, s: &Maze2DState) -> Maze2DCost {
        let goal = p.goal();
        let delta_x = s.x.get().abs_diff(goal.x.get());
        let delta_y = s.y.get().abs_diff(goal.y.get());

        delta_x + delta_y
    }
}
