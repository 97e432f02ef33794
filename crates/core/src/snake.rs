//! Snake module - body, heading and the per-tick movement rule
//!
//! The body is a deque with the head at the front. A move pushes a new head
//! and, unless the snake is growing, pops the tail. The board is updated in
//! the same call so occupancy always mirrors the body.

use std::collections::{HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, BoardObject, Occupant};
use crate::error::PlacementError;
use crate::score::Score;
use crate::types::{Direction, Position};

/// Why a move ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collision {
    /// Left the grid with `gameover_on_exit` set
    Wall,
    /// Ran into its own body
    SelfCollision,
}

/// Result of one [`Snake::move_step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// Shifted forward one tile, length unchanged
    Moved { head: Position, vacated: Position },
    /// Ate the fruit at `head` and kept its tail
    Grew { head: Position },
    /// The move was refused; snake and board are unchanged
    Crashed(Collision),
}

impl MoveOutcome {
    pub fn is_crash(&self) -> bool {
        matches!(self, MoveOutcome::Crashed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    /// Body segments, head at index 0
    body: VecDeque<Position>,
    /// Direction used by the last move
    heading: Direction,
    /// Direction the next move will use
    pending: Direction,
    gameover_on_exit: bool,
    points: u32,
}

impl Snake {
    /// Straight snake with `head` leading in `direction` and the body trailing behind.
    ///
    /// No bounds are checked; callers place it where it fits.
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (d_row, d_col) = direction.offset();
        let body = (0..length.max(1) as i32)
            .map(|i| head.offset(-d_row * i, -d_col * i))
            .collect();

        Self {
            body,
            heading: direction,
            pending: direction,
            gameover_on_exit: true,
            points: 0,
        }
    }

    /// Snake from explicit segments, head first.
    ///
    /// Segments must be distinct and each one must be a single step from the
    /// previous one.
    pub fn from_segments<I>(segments: I, direction: Direction) -> Result<Self, PlacementError>
    where
        I: IntoIterator<Item = Position>,
    {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            return Err(PlacementError::ZeroLength);
        }

        let mut seen = HashSet::with_capacity(body.len());
        if let Some(&dup) = body.iter().find(|&&pos| !seen.insert(pos)) {
            return Err(PlacementError::Repeated(dup));
        }
        if let Some((&from, &to)) = body
            .iter()
            .zip(body.iter().skip(1))
            .find(|&(&from, &to)| direction_between(from, to).is_none())
        {
            return Err(PlacementError::Disconnected { from, to });
        }

        Ok(Self {
            body,
            heading: direction,
            pending: direction,
            gameover_on_exit: true,
            points: 0,
        })
    }

    pub fn with_gameover_on_exit(mut self, gameover_on_exit: bool) -> Self {
        self.gameover_on_exit = gameover_on_exit;
        self
    }

    /// Random snake that fits entirely on an `nb_lines x nb_cols` grid.
    ///
    /// Straight placements are preferred, and among those the ones whose head
    /// does not face the edge. When the snake is longer than either side of
    /// the grid a window of a serpentine walk over the grid is used instead.
    pub fn create_random<R: Rng + ?Sized>(
        nb_lines: u16,
        nb_cols: u16,
        length: usize,
        gameover_on_exit: bool,
        rng: &mut R,
    ) -> Result<Self, PlacementError> {
        if length == 0 {
            return Err(PlacementError::ZeroLength);
        }
        if length > nb_lines as usize * nb_cols as usize {
            return Err(PlacementError::TooLong {
                length,
                nb_lines,
                nb_cols,
            });
        }

        let in_bounds = |p: Position| {
            p.row >= 0 && p.row < nb_lines as i32 && p.col >= 0 && p.col < nb_cols as i32
        };
        let span = length as i32 - 1;

        let mut open = Vec::new();
        let mut facing_edge = Vec::new();
        for row in 0..nb_lines as i32 {
            for col in 0..nb_cols as i32 {
                let head = Position::new(row, col);
                for dir in Direction::ALL {
                    let (d_row, d_col) = dir.offset();
                    if !in_bounds(head.offset(-d_row * span, -d_col * span)) {
                        continue;
                    }
                    if in_bounds(head.step(dir)) {
                        open.push((head, dir));
                    } else {
                        facing_edge.push((head, dir));
                    }
                }
            }
        }

        let pool = if open.is_empty() { &facing_edge } else { &open };
        let snake = match pool.choose(rng) {
            Some(&(head, dir)) => Snake::new(head, dir, length),
            None => {
                let walk = serpentine(nb_lines, nb_cols);
                let start = rng.gen_range(0..=walk.len() - length);
                let mut window = walk[start..start + length].to_vec();
                if rng.gen::<bool>() {
                    window.reverse();
                }
                // Serpentine neighbours are always adjacent, and this branch implies length >= 2.
                let dir = direction_between(window[1], window[0]).unwrap_or(Direction::Right);
                Snake::from_segments(window, dir)?
            }
        };

        Ok(snake.with_gameover_on_exit(gameover_on_exit))
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Segments, head first
    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake has at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Direction of the last move
    pub fn direction(&self) -> Direction {
        self.heading
    }

    /// Direction the next move will take
    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    pub fn gameover_on_exit(&self) -> bool {
        self.gameover_on_exit
    }

    /// Fruit eaten in this run
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Score of the current run, unnamed
    pub fn score(&self) -> Score {
        Score::new("", self.points)
    }

    /// Request a turn for the next move.
    ///
    /// A request opposite to the current heading is ignored while the snake is
    /// longer than one segment. Returns whether the request was accepted.
    pub fn set_direction(&mut self, dir: Direction) -> bool {
        if self.body.len() > 1 && dir.is_opposite(self.heading) {
            return false;
        }
        self.pending = dir;
        true
    }

    /// Advance one tile, updating `board` to match.
    ///
    /// A crash leaves the snake, including its heading, and the board as they were.
    pub fn move_step(&mut self, board: &mut Board) -> MoveOutcome {
        let heading = self.pending;

        let mut next = self.head().step(heading);
        if !board.in_bounds(next) {
            if self.gameover_on_exit {
                return MoveOutcome::Crashed(Collision::Wall);
            }
            next = board.wrap(next);
        }

        let growing = board.occupant_at(next) == Some(Occupant::Fruit);

        // The tail moves out of the way this tick unless the snake grows.
        let last = self.body.len() - 1;
        let hits_body = self
            .body
            .iter()
            .enumerate()
            .any(|(i, &seg)| seg == next && (growing || i != last));
        if hits_body {
            return MoveOutcome::Crashed(Collision::SelfCollision);
        }

        self.heading = heading;
        if growing {
            board.consume_fruit(next);
            board.occupy(next, Occupant::Snake);
            self.body.push_front(next);
            self.points += 1;
            MoveOutcome::Grew { head: next }
        } else {
            let vacated = self.tail();
            self.body.pop_back();
            board.vacate(vacated);
            board.occupy(next, Occupant::Snake);
            self.body.push_front(next);
            MoveOutcome::Moved {
                head: next,
                vacated,
            }
        }
    }
}

impl BoardObject for Snake {
    fn occupant(&self) -> Occupant {
        Occupant::Snake
    }

    fn tiles(&self) -> impl Iterator<Item = Position> + '_ {
        self.segments()
    }
}

/// Boustrophedon walk: row 0 left to right, row 1 right to left, ...
fn serpentine(nb_lines: u16, nb_cols: u16) -> Vec<Position> {
    let mut walk = Vec::with_capacity(nb_lines as usize * nb_cols as usize);
    for row in 0..nb_lines as i32 {
        if row % 2 == 0 {
            walk.extend((0..nb_cols as i32).map(|col| Position::new(row, col)));
        } else {
            walk.extend((0..nb_cols as i32).rev().map(|col| Position::new(row, col)));
        }
    }
    walk
}

/// Direction of a single step from `from` to `to`, if they are adjacent
fn direction_between(from: Position, to: Position) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|&dir| from.step(dir) == to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fruit::Fruit;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn placed(snake: &Snake, nb_lines: u16, nb_cols: u16) -> Board {
        let mut board = Board::new(nb_lines, nb_cols);
        board.add_object(snake).unwrap();
        board
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        let body: Vec<_> = snake.segments().collect();
        assert_eq!(
            body,
            vec![Position::new(5, 5), Position::new(5, 4), Position::new(5, 3)]
        );
        assert_eq!(snake.direction(), Direction::Right);
        assert_eq!(snake.points(), 0);
    }

    #[test]
    fn test_serpentine_is_a_path() {
        let walk = serpentine(3, 4);
        assert_eq!(walk.len(), 12);
        for pair in walk.windows(2) {
            assert!(direction_between(pair[0], pair[1]).is_some());
        }
    }

    #[test]
    fn test_create_random_rejects_impossible_lengths() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            Snake::create_random(3, 3, 0, true, &mut rng),
            Err(PlacementError::ZeroLength)
        );
        assert_eq!(
            Snake::create_random(3, 3, 10, true, &mut rng),
            Err(PlacementError::TooLong {
                length: 10,
                nb_lines: 3,
                nb_cols: 3
            })
        );
    }

    #[test]
    fn test_create_random_fills_whole_grid() {
        let mut rng = StdRng::seed_from_u64(5);
        let snake = Snake::create_random(3, 3, 9, true, &mut rng).unwrap();
        let board = placed(&snake, 3, 3);
        assert_eq!(board.free_count(), 0);
    }

    #[test]
    fn test_reverse_rejected_unless_single_segment() {
        let mut snake = Snake::new(Position::new(2, 2), Direction::Right, 3);
        assert!(!snake.set_direction(Direction::Left));
        assert_eq!(snake.pending_direction(), Direction::Right);

        let mut single = Snake::new(Position::new(2, 2), Direction::Right, 1);
        assert!(single.set_direction(Direction::Left));
    }

    #[test]
    fn test_quick_double_turn_cannot_fold_into_neck() {
        let mut snake = Snake::new(Position::new(2, 2), Direction::Right, 3);
        assert!(snake.set_direction(Direction::Up));
        // Still heading right until the next move; left stays forbidden.
        assert!(!snake.set_direction(Direction::Left));
        assert_eq!(snake.pending_direction(), Direction::Up);
    }

    #[test]
    fn test_crash_keeps_previous_heading() {
        let mut snake = Snake::new(Position::new(0, 2), Direction::Right, 3);
        let mut board = placed(&snake, 5, 5);

        assert!(snake.set_direction(Direction::Up));
        assert_eq!(
            snake.move_step(&mut board),
            MoveOutcome::Crashed(Collision::Wall)
        );
        assert_eq!(snake.direction(), Direction::Right);
        // Reversal is still judged against the last completed move.
        assert!(!snake.set_direction(Direction::Left));
    }

    #[test]
    fn test_wall_crash_leaves_state_untouched() {
        let snake = Snake::new(Position::new(0, 2), Direction::Up, 3);
        let mut board = placed(&snake, 5, 5);
        let mut moving = snake.clone();

        assert_eq!(
            moving.move_step(&mut board),
            MoveOutcome::Crashed(Collision::Wall)
        );
        assert_eq!(moving.segments().collect::<Vec<_>>(), snake.segments().collect::<Vec<_>>());
        assert_eq!(board.count(Occupant::Snake), 3);
    }

    #[test]
    fn test_moving_into_vacated_tail_is_allowed() {
        // A 2x2 loop: the head chases its own tail.
        let mut snake = Snake::from_segments(
            [
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(0, 1),
            ],
            Direction::Up,
        )
        .unwrap();
        let mut board = placed(&snake, 2, 2);

        assert!(snake.set_direction(Direction::Right));
        assert_eq!(
            snake.move_step(&mut board),
            MoveOutcome::Moved {
                head: Position::new(0, 1),
                vacated: Position::new(0, 1)
            }
        );
        assert_eq!(board.count(Occupant::Snake), 4);
    }

    #[test]
    fn test_growing_fills_grid_and_keeps_chasing_tail() {
        let mut snake = Snake::from_segments(
            [
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(1, 1),
            ],
            Direction::Up,
        )
        .unwrap();
        let mut board = placed(&snake, 2, 2);
        board.add_object(&Fruit::new(Position::new(0, 1))).unwrap();

        snake.set_direction(Direction::Right);
        assert_eq!(
            snake.move_step(&mut board),
            MoveOutcome::Grew {
                head: Position::new(0, 1)
            }
        );
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.points(), 1);
        assert_eq!(board.free_count(), 0);
        assert_eq!(board.fruit(), None);

        // The tail leaves (1, 1) on this tick, so the head may take it.
        snake.set_direction(Direction::Down);
        assert_eq!(
            snake.move_step(&mut board),
            MoveOutcome::Moved {
                head: Position::new(1, 1),
                vacated: Position::new(1, 1)
            }
        );
    }

    #[test]
    fn test_self_collision() {
        // Head at (1, 1) heading left, body curls around above it.
        let mut snake = Snake::from_segments(
            [
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(0, 2),
                Position::new(0, 1),
                Position::new(0, 0),
            ],
            Direction::Left,
        )
        .unwrap();
        let mut board = placed(&snake, 3, 3);

        snake.set_direction(Direction::Up);
        assert_eq!(
            snake.move_step(&mut board),
            MoveOutcome::Crashed(Collision::SelfCollision)
        );
        assert_eq!(snake.head(), Position::new(1, 1));
    }
}
