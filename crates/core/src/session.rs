//! Session - the game state machine
//!
//! A [`Session`] owns the board, the snake, the fruit slot and the score
//! table for the lifetime of the program. The presentation layer feeds it
//! [`GameInput`] events with [`Session::handle_input`] and advances it once per
//! frame with [`Session::tick`].
//!
//! | State     | Leaves on                              | Goes to   |
//! |-----------|----------------------------------------|-----------|
//! | Scores    | space                                  | Play      |
//! | Play      | crash, or the grid filling up          | GameOver  |
//! | GameOver  | countdown expired, high score          | InputName |
//! | GameOver  | countdown expired, no high score       | Scores    |
//! | InputName | Enter                                  | Scores    |
//! | any       | quit signal, or `q` outside InputName  | Quit      |

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::{Board, BoardObject};
use crate::config::GameConfig;
use crate::error::{BoardError, GameError};
use crate::score::{PlayerName, Score, ScoreTable};
use crate::snake::{MoveOutcome, Snake};
use crate::snapshot::GameSnapshot;
use crate::types::{GameInput, GameState, MAX_NAME_LEN};

#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    board: Board,
    snake: Snake,
    scores: ScoreTable,
    state: GameState,
    /// Name typed so far in `InputName`
    name: PlayerName,
    /// Points of the run that just ended
    last_points: u32,
    /// Ticks left on the game-over screen
    countdown: u32,
    tick: u64,
    save_failed: bool,
    rng: StdRng,
}

impl Session {
    /// Validate `config` and set up the board with a fresh snake and fruit.
    pub fn new(config: GameConfig, scores: ScoreTable, mut rng: StdRng) -> Result<Self, GameError> {
        config.validate()?;

        let mut board = Board::new(config.height, config.width);
        let snake = Snake::create_random(
            config.height,
            config.width,
            config.start_length,
            config.gameover_on_exit,
            &mut rng,
        )?;
        board.add_object(&snake)?;
        board.create_fruit(&mut rng)?;

        log::debug!(
            "session ready: {}x{} grid, snake of {} at {}",
            config.width,
            config.height,
            snake.len(),
            snake.head()
        );

        Ok(Self {
            config,
            board,
            snake,
            scores,
            state: GameState::Scores,
            name: PlayerName::new(),
            last_points: 0,
            countdown: 0,
            tick: 0,
            save_failed: false,
            rng,
        })
    }

    /// Build a session from configuration alone, loading the score table from
    /// `config.scores_file` when one is set.
    pub fn from_config(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        let scores = match &config.scores_file {
            Some(path) => ScoreTable::load_or_default(path, config.max_scores),
            None => ScoreTable::default_table(config.max_scores),
        };
        Self::new(config, scores, StdRng::seed_from_u64(seed))
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_quit(&self) -> bool {
        self.state == GameState::Quit
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    /// Name typed so far
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Points shown on screen: the live run while playing, the last run otherwise
    pub fn points(&self) -> u32 {
        match self.state {
            GameState::Play => self.snake.points(),
            _ => self.last_points,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn save_failed(&self) -> bool {
        self.save_failed
    }

    /// Apply one input event. Inputs with no meaning in the current state are ignored.
    pub fn handle_input(&mut self, input: GameInput) {
        if input == GameInput::Quit {
            self.set_state(GameState::Quit);
            return;
        }

        match self.state {
            GameState::Scores => match input {
                GameInput::Char(' ') => self.set_state(GameState::Play),
                GameInput::Char('q' | 'Q') => self.set_state(GameState::Quit),
                _ => {}
            },
            GameState::Play => match input {
                GameInput::Turn(dir) => {
                    if !self.snake.set_direction(dir) {
                        log::trace!("turn {:?} rejected", dir);
                    }
                }
                GameInput::Char('q' | 'Q') => self.set_state(GameState::Quit),
                _ => {}
            },
            GameState::GameOver => {
                if let GameInput::Char('q' | 'Q') = input {
                    self.set_state(GameState::Quit);
                }
            }
            GameState::InputName => match input {
                GameInput::Char(ch) => self.push_name_char(ch),
                GameInput::Backspace => {
                    self.name.pop();
                }
                GameInput::Confirm => self.commit_name(),
                _ => {}
            },
            GameState::Quit => {}
        }
    }

    /// Advance the simulation by one frame.
    pub fn tick(&mut self) -> Result<(), GameError> {
        self.tick += 1;
        match self.state {
            GameState::Play => self.play_tick(),
            GameState::GameOver => self.countdown_tick(),
            GameState::Scores | GameState::InputName | GameState::Quit => Ok(()),
        }
    }

    fn play_tick(&mut self) -> Result<(), GameError> {
        match self.snake.move_step(&mut self.board) {
            MoveOutcome::Moved { .. } => Ok(()),
            MoveOutcome::Grew { head } => {
                log::debug!("ate fruit at {head}, {} points", self.snake.points());
                match self.board.create_fruit(&mut self.rng) {
                    Ok(_) => Ok(()),
                    Err(BoardError::Full) => {
                        log::info!("grid full with {} points", self.snake.points());
                        self.end_run()
                    }
                    Err(err) => Err(err.into()),
                }
            }
            MoveOutcome::Crashed(collision) => {
                log::debug!("crash ({:?}) at {}", collision, self.snake.head());
                self.end_run()
            }
        }
    }

    /// Enter GameOver; the banner stays up for the next `countdown_ticks` ticks.
    fn end_run(&mut self) -> Result<(), GameError> {
        self.last_points = self.snake.points();
        self.countdown = self.config.countdown_ticks();
        self.set_state(GameState::GameOver);
        Ok(())
    }

    fn countdown_tick(&mut self) -> Result<(), GameError> {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return Ok(());
        }

        self.reset_snake()?;
        if self.scores.is_high_score(self.last_points) {
            self.name.clear();
            self.set_state(GameState::InputName);
        } else {
            self.set_state(GameState::Scores);
        }
        Ok(())
    }

    /// Replace the snake with a fresh random one.
    pub fn reset_snake(&mut self) -> Result<(), GameError> {
        let snake = Snake::create_random(
            self.config.height,
            self.config.width,
            self.config.start_length,
            self.config.gameover_on_exit,
            &mut self.rng,
        )?;
        self.reset_with(snake)
    }

    /// Replace the snake with `snake`, moving the fruit if the new body covers it.
    ///
    /// The board is left unchanged if `snake` does not fit on the grid.
    pub fn reset_with(&mut self, snake: Snake) -> Result<(), GameError> {
        if let Some(pos) = snake.tiles().find(|&pos| !self.board.in_bounds(pos)) {
            return Err(BoardError::InvalidPlacement(pos).into());
        }

        self.board.remove_object(&self.snake);
        if let Some(fruit) = self.board.fruit() {
            if snake.contains(fruit.position()) {
                self.board.remove_object(&fruit);
            }
        }
        self.board.add_object(&snake)?;
        self.snake = snake;

        if self.board.fruit().is_none() {
            self.board.create_fruit(&mut self.rng)?;
        }
        Ok(())
    }

    fn push_name_char(&mut self, ch: char) {
        if ch.is_control() || self.name.chars().count() >= MAX_NAME_LEN {
            return;
        }
        if self.name.try_push(ch).is_err() {
            log::warn!("name buffer full, dropping {ch:?}");
        }
    }

    fn commit_name(&mut self) {
        let score = Score::new(&self.name, self.last_points);
        if self.scores.add_score(score) {
            log::info!("new high score: {} with {}", score.name(), score.score());
        }
        self.persist_scores();
        self.name.clear();
        self.set_state(GameState::Scores);
    }

    fn persist_scores(&mut self) {
        let Some(path) = self.config.scores_file.as_deref() else {
            return;
        };
        match self.scores.save(path) {
            Ok(()) => self.save_failed = false,
            Err(err) => {
                log::error!("{err}: {err:?}");
                self.save_failed = true;
            }
        }
    }

    fn set_state(&mut self, next: GameState) {
        if self.state != next {
            log::debug!("state {} -> {}", self.state, next);
            self.state = next;
        }
    }

    /// Fill `out` with the current view, reusing its buffers
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.state = self.state;
        out.nb_lines = self.board.nb_lines();
        out.nb_cols = self.board.nb_cols();
        out.snake.clear();
        out.snake.extend(self.snake.segments());
        out.heading = self.snake.direction();
        out.fruit = self.board.fruit().map(|f| f.position());
        out.points = self.points();
        out.scores.clear();
        out.scores.extend(self.scores.iter().copied());
        out.name_entry = (self.state == GameState::InputName)
            .then(|| Score::new(&self.name, self.last_points));
        out.countdown = self.countdown;
        out.tick = self.tick;
        out.save_failed = self.save_failed;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Occupant;
    use crate::types::{Direction, Position};

    fn session(config: GameConfig) -> Session {
        Session::new(
            config,
            ScoreTable::default_table(5),
            StdRng::seed_from_u64(42),
        )
        .unwrap()
    }

    /// Snake of length 3 heading right along the top row, head at (0, 2)
    fn top_row_snake() -> Snake {
        Snake::new(Position::new(0, 2), Direction::Right, 3)
    }

    fn crash_into_right_wall(s: &mut Session) {
        s.reset_with(top_row_snake()).unwrap();
        s.handle_input(GameInput::Char(' '));
        while s.state() == GameState::Play {
            s.tick().unwrap();
        }
    }

    fn wait_out_game_over(s: &mut Session) {
        while s.state() == GameState::GameOver {
            s.tick().unwrap();
        }
    }

    #[test]
    fn test_new_session_layout() {
        let s = session(GameConfig::small());
        assert_eq!(s.state(), GameState::Scores);
        assert_eq!(s.board().count(Occupant::Snake), 3);
        assert_eq!(s.board().count(Occupant::Fruit), 1);
        let fruit = s.board().fruit().unwrap();
        assert!(!s.snake().contains(fruit.position()));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            width: 0,
            ..GameConfig::small()
        };
        let err = Session::new(config, ScoreTable::default_table(5), StdRng::seed_from_u64(1));
        assert!(matches!(err, Err(GameError::Config(_))));
    }

    #[test]
    fn test_scores_ignores_turns_and_ticks() {
        let mut s = session(GameConfig::small());
        let before = s.snake().clone();
        s.handle_input(GameInput::Turn(Direction::Up));
        s.tick().unwrap();
        assert_eq!(s.state(), GameState::Scores);
        assert_eq!(s.snake(), &before);
    }

    #[test]
    fn test_crash_counts_down_then_asks_for_name() {
        let config = GameConfig {
            fps: 4,
            ..GameConfig::small()
        };
        let mut s = session(config);
        crash_into_right_wall(&mut s);

        assert_eq!(s.state(), GameState::GameOver);
        assert_eq!(s.countdown(), 4);
        for left in (1..4).rev() {
            s.tick().unwrap();
            assert_eq!(s.state(), GameState::GameOver);
            assert_eq!(s.countdown(), left);
        }
        s.tick().unwrap();

        // Zero points still ranks: the default table has a free slot.
        assert_eq!(s.state(), GameState::InputName);
        assert_eq!(s.snake().points(), 0);
        assert_eq!(s.board().count(Occupant::Snake), 3);
        assert_eq!(s.board().count(Occupant::Fruit), 1);
    }

    #[test]
    fn test_crash_without_high_score_goes_to_scores() {
        let mut s = Session::new(
            GameConfig {
                fps: 1,
                ..GameConfig::small()
            },
            ScoreTable::default_table(4),
            StdRng::seed_from_u64(3),
        )
        .unwrap();
        crash_into_right_wall(&mut s);
        assert_eq!(s.state(), GameState::GameOver);
        s.tick().unwrap();
        assert_eq!(s.state(), GameState::Scores);
    }

    #[test]
    fn test_game_over_is_visible_at_one_fps() {
        let mut s = session(GameConfig {
            fps: 1,
            ..GameConfig::small()
        });
        crash_into_right_wall(&mut s);

        let snap = s.snapshot();
        assert_eq!(snap.state, GameState::GameOver);
        assert_eq!(snap.countdown, 1);
        s.tick().unwrap();
        assert_eq!(s.state(), GameState::InputName);
    }

    #[test]
    fn test_quit_from_game_over() {
        let mut s = session(GameConfig::small());
        crash_into_right_wall(&mut s);
        s.handle_input(GameInput::Char('Q'));
        assert!(s.is_quit());
    }

    #[test]
    fn test_name_entry_treats_q_as_text() {
        let mut s = session(GameConfig {
            fps: 1,
            ..GameConfig::small()
        });
        crash_into_right_wall(&mut s);
        wait_out_game_over(&mut s);
        assert_eq!(s.state(), GameState::InputName);

        s.handle_input(GameInput::Char('q'));
        s.handle_input(GameInput::Char('\u{7}'));
        s.handle_input(GameInput::Turn(Direction::Up));
        assert_eq!(s.name(), "q");
        assert_eq!(s.state(), GameState::InputName);

        s.handle_input(GameInput::Quit);
        assert!(s.is_quit());
    }

    #[test]
    fn test_name_is_capped_and_editable() {
        let mut s = session(GameConfig {
            fps: 1,
            ..GameConfig::small()
        });
        crash_into_right_wall(&mut s);
        wait_out_game_over(&mut s);

        for ch in "Maximilian".chars() {
            s.handle_input(GameInput::Char(ch));
        }
        assert_eq!(s.name(), "Maximili");
        s.handle_input(GameInput::Backspace);
        s.handle_input(GameInput::Backspace);
        assert_eq!(s.name(), "Maximi");

        let snap = s.snapshot();
        assert_eq!(snap.name_entry, Some(Score::new("Maximi", s.points())));

        s.handle_input(GameInput::Confirm);
        assert_eq!(s.state(), GameState::Scores);
        assert_eq!(s.scores().len(), 5);
        assert_eq!(s.scores().lowest().map(Score::name), Some("Maximi"));
    }

    #[test]
    fn test_eating_grows_and_respawns_fruit() {
        let mut s = session(GameConfig::small());
        let fruit = s.board().fruit().unwrap().position();
        let dir = if fruit.col > 0 {
            Direction::Right
        } else {
            Direction::Left
        };
        s.reset_with(Snake::new(fruit.step(dir.opposite()), dir, 1))
            .unwrap();
        s.handle_input(GameInput::Char(' '));
        s.tick().unwrap();

        assert_eq!(s.state(), GameState::Play);
        assert_eq!(s.snake().len(), 2);
        assert_eq!(s.snake().head(), fruit);
        assert_eq!(s.points(), 1);
        let respawned = s.board().fruit().unwrap().position();
        assert!(!s.snake().contains(respawned));
        assert_eq!(s.board().count(Occupant::Fruit), 1);
    }

    #[test]
    fn test_reset_moves_covered_fruit() {
        let mut s = session(GameConfig::small());
        let fruit = s.board().fruit().unwrap().position();
        let snake = Snake::from_segments([fruit], Direction::Right).unwrap();

        s.reset_with(snake).unwrap();
        assert_eq!(s.board().occupant_at(fruit), Some(Occupant::Snake));
        assert_eq!(s.board().count(Occupant::Snake), 1);
        let moved = s.board().fruit().unwrap().position();
        assert_ne!(moved, fruit);
        assert_eq!(s.board().occupant_at(moved), Some(Occupant::Fruit));
    }

    #[test]
    fn test_reset_rejects_off_grid_snake() {
        let mut s = session(GameConfig::small());
        let before = s.board().clone();
        let snake = Snake::new(Position::new(0, 1), Direction::Right, 4);
        assert!(matches!(
            s.reset_with(snake),
            Err(GameError::Board(BoardError::InvalidPlacement(_)))
        ));
        assert_eq!(s.board(), &before);
    }

    #[test]
    fn test_snapshot_into_reuses_buffers() {
        let mut s = session(GameConfig::small());
        let mut snap = GameSnapshot::default();
        s.snapshot_into(&mut snap);
        assert_eq!(snap.snake.len(), 3);
        assert_eq!(snap.head(), Some(s.snake().head()));
        assert_eq!(snap.scores.len(), 4);
        assert_eq!(snap.name_entry, None);

        s.handle_input(GameInput::Char(' '));
        s.tick().unwrap();
        s.snapshot_into(&mut snap);
        assert_eq!(snap.snake.len(), s.snake().len());
        assert_eq!(snap.tick, 1);
        assert!(snap.is_playing());
    }
}
