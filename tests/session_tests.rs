//! End-to-end session scenarios driven through `GameInput`.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use tui_snake::core::{GameConfig, Occupant, Score, ScoreTable, Session, Snake};
use tui_snake::types::{Direction, GameInput, GameState, Position};

fn config() -> GameConfig {
    GameConfig {
        fps: 3,
        ..GameConfig::small()
    }
}

fn session_with(config: GameConfig) -> Session {
    Session::new(config, ScoreTable::default_table(5), StdRng::seed_from_u64(17)).unwrap()
}

fn type_text(session: &mut Session, text: &str) {
    for ch in text.chars() {
        session.handle_input(GameInput::Char(ch));
    }
}

/// Put a length-3 snake on the top row heading right and play until it hits the wall.
fn play_into_wall(session: &mut Session) {
    session
        .reset_with(Snake::new(Position::new(0, 2), Direction::Right, 3))
        .unwrap();
    session.handle_input(GameInput::Char(' '));
    assert_eq!(session.state(), GameState::Play);

    for _ in 0..100 {
        session.tick().unwrap();
        if session.state() != GameState::Play {
            return;
        }
    }
    panic!("snake never reached the wall");
}

#[test]
fn test_space_starts_and_q_quits() {
    let mut session = session_with(config());
    session.handle_input(GameInput::Char('x'));
    assert_eq!(session.state(), GameState::Scores);

    session.handle_input(GameInput::Char(' '));
    assert_eq!(session.state(), GameState::Play);
    session.handle_input(GameInput::Char('q'));
    assert_eq!(session.state(), GameState::Quit);

    let mut session = session_with(config());
    session.handle_input(GameInput::Char('Q'));
    assert!(session.is_quit());
}

#[test]
fn test_quit_signal_works_everywhere() {
    let mut session = session_with(config());
    session.handle_input(GameInput::Char(' '));
    session.handle_input(GameInput::Quit);
    assert!(session.is_quit());

    // Nothing brings a quit session back.
    session.handle_input(GameInput::Char(' '));
    session.tick().unwrap();
    assert!(session.is_quit());
}

#[test]
fn test_crash_then_countdown_then_name_entry() {
    let mut session = session_with(config());
    play_into_wall(&mut session);

    assert_eq!(session.state(), GameState::GameOver);
    assert_eq!(session.snapshot().countdown, 3);

    for _ in 0..2 {
        session.tick().unwrap();
        assert_eq!(session.state(), GameState::GameOver);
    }
    session.tick().unwrap();
    assert_eq!(session.state(), GameState::InputName);
    assert_eq!(session.snapshot().name_entry, Some(Score::new("", session.points())));
}

#[test]
fn test_running_into_own_body_ends_the_run() {
    let mut session = session_with(config());
    session
        .reset_with(Snake::new(Position::new(5, 5), Direction::Right, 5))
        .unwrap();
    session.handle_input(GameInput::Char(' '));

    for turn in [Direction::Up, Direction::Left] {
        session.handle_input(GameInput::Turn(turn));
        session.tick().unwrap();
        assert_eq!(session.state(), GameState::Play);
    }
    assert_eq!(session.snake().head(), Position::new(4, 4));

    // (5, 4) is still part of the body and not the tail.
    session.handle_input(GameInput::Turn(Direction::Down));
    session.tick().unwrap();

    assert_eq!(session.state(), GameState::GameOver);
    assert_eq!(session.snake().head(), Position::new(4, 4));
    assert_eq!(session.snake().direction(), Direction::Left);
    assert_eq!(
        session.board().count(Occupant::Snake),
        session.snake().len()
    );
}

#[test]
fn test_reset_rejects_snakes_that_do_not_fit() {
    let mut session = session_with(config());
    let before = session.snake().clone();

    let snake = Snake::from_segments(
        [Position::new(0, 1), Position::new(0, 0), Position::new(0, -1)],
        Direction::Right,
    )
    .unwrap();
    assert!(session.reset_with(snake).is_err());
    assert_eq!(session.snake(), &before);
    assert_eq!(session.board().count(Occupant::Snake), before.len());
}

#[test]
fn test_low_score_returns_to_scores() {
    let full = ScoreTable::new(
        3,
        vec![Score::new("a", 90), Score::new("b", 80), Score::new("c", 70)],
    );
    let mut session = Session::new(config(), full, StdRng::seed_from_u64(4)).unwrap();
    play_into_wall(&mut session);
    for _ in 0..3 {
        session.tick().unwrap();
    }
    assert_eq!(session.state(), GameState::Scores);
    assert_eq!(session.scores().len(), 3);
}

#[test]
fn test_name_entry_commits_and_saves() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.json");
    let mut session = session_with(GameConfig {
        scores_file: Some(path.clone()),
        ..config()
    });

    play_into_wall(&mut session);
    while session.state() == GameState::GameOver {
        session.tick().unwrap();
    }
    assert_eq!(session.state(), GameState::InputName);

    type_text(&mut session, "Quintessa!");
    assert_eq!(session.name(), "Quintess");
    session.handle_input(GameInput::Backspace);
    type_text(&mut session, "\u{1b}");
    assert_eq!(session.name(), "Quintes");

    let points = session.points();
    session.handle_input(GameInput::Confirm);
    assert_eq!(session.state(), GameState::Scores);
    assert!(!session.save_failed());

    let saved = ScoreTable::load(&path, 5).unwrap();
    assert_eq!(saved, *session.scores());
    assert!(saved.iter().any(|s| *s == Score::new("Quintes", points)));
}

#[test]
fn test_failed_save_is_flagged_not_fatal() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "").unwrap();

    let mut session = session_with(GameConfig {
        scores_file: Some(blocker.join("scores.json")),
        ..config()
    });
    play_into_wall(&mut session);
    while session.state() == GameState::GameOver {
        session.tick().unwrap();
    }
    type_text(&mut session, "Ann");
    session.handle_input(GameInput::Confirm);

    assert_eq!(session.state(), GameState::Scores);
    assert!(session.save_failed());
    assert!(session.snapshot().save_failed);
    assert_eq!(session.scores().len(), 5);
}

#[test]
fn test_wrap_around_when_edges_are_open() {
    let mut session = session_with(GameConfig {
        gameover_on_exit: false,
        ..config()
    });
    session
        .reset_with(Snake::new(Position::new(4, 9), Direction::Right, 3).with_gameover_on_exit(false))
        .unwrap();
    session.handle_input(GameInput::Char(' '));
    session.tick().unwrap();

    assert_eq!(session.state(), GameState::Play);
    assert_eq!(session.snake().head(), Position::new(4, 0));
    assert_eq!(
        session.board().occupant_at(Position::new(4, 0)),
        Some(Occupant::Snake)
    );
}

#[test]
fn test_turns_only_apply_while_playing() {
    let mut session = session_with(config());
    session
        .reset_with(Snake::new(Position::new(5, 5), Direction::Right, 3))
        .unwrap();

    session.handle_input(GameInput::Turn(Direction::Up));
    assert_eq!(session.snake().pending_direction(), Direction::Right);

    session.handle_input(GameInput::Char(' '));
    session.handle_input(GameInput::Turn(Direction::Left));
    assert_eq!(session.snake().pending_direction(), Direction::Right);
    session.handle_input(GameInput::Turn(Direction::Up));
    session.tick().unwrap();
    assert_eq!(session.snake().head(), Position::new(4, 5));
}

#[test]
fn test_same_seed_same_game() {
    let run = |seed| {
        let mut session =
            Session::new(config(), ScoreTable::default_table(5), StdRng::seed_from_u64(seed))
                .unwrap();
        session.handle_input(GameInput::Char(' '));
        for _ in 0..5 {
            session.tick().unwrap();
        }
        session.snapshot()
    };
    assert_eq!(run(31), run(31));
}

#[test]
fn test_from_config_without_score_file() {
    let session = Session::from_config(config(), 1).unwrap();
    assert_eq!(session.scores(), &ScoreTable::default_table(5));
    assert_eq!(session.state(), GameState::Scores);
}
