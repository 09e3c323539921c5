//! Fixed move sequences on known boards.

use termsnake::{Ending, Game, GameConfig, GameState, MoveResult};

fn demo() -> Game {
    Game::seeded(GameConfig::demo(), 42).unwrap()
}

fn default_board() -> Game {
    Game::seeded(GameConfig::default(), 42).unwrap()
}

#[test]
fn walking_right_hits_the_east_wall() {
    let mut game = demo();

    for step in 1..=19 {
        game.walk_right();
        assert!(!game.is_over(), "step {} should not end the game", step);
    }
    assert_eq!(game.snake().head(), (39, 12));

    game.walk_right();
    assert_eq!(game.state(), GameState::Over(Ending::Wall));
    assert_eq!(game.snake().head(), (40, 12));

    assert_eq!(game.walk_right(), MoveResult::Frozen);
    assert_eq!(game.snake().head(), (40, 12));
}

#[test]
fn default_board_wall_after_fifty_steps() {
    let mut game = default_board();

    for step in 1..=49 {
        game.walk_right();
        assert!(!game.is_over(), "step {} should not end the game", step);
    }
    game.walk_right();
    assert!(game.is_over());
}

#[test]
fn default_board_turning_back_into_body() {
    let mut game = default_board();

    game.walk_up();
    assert!(!game.is_over());
    game.walk_left();
    assert!(!game.is_over());
    game.walk_down();
    assert_eq!(game.state(), GameState::Over(Ending::SelfCollision));
}

#[test]
fn short_snake_can_follow_its_own_tail() {
    // With three cells the tail leaves (19, 12) on the same step the head arrives
    let mut game = demo();

    game.walk_up();
    game.walk_left();
    game.walk_down();
    assert!(!game.is_over());
    assert_eq!(game.snake().head(), (19, 12));
    assert_eq!(game.body().collect::<Vec<_>>(), vec![(20, 11), (19, 11), (19, 12)]);
}

#[test]
fn default_board_eats_food() {
    let mut game = default_board();
    let init_len = game.snake().len();

    for _ in 0..2 {
        game.walk_right();
        assert!(!game.is_over());
        assert_eq!(game.snake().len(), init_len);
    }
    game.walk_down();
    assert!(!game.is_over());
    assert_eq!(game.snake().len(), init_len);

    game.walk_down();
    assert!(!game.is_over());
    assert_eq!(game.snake().len(), init_len + 1);
    assert_eq!(game.score(), 1);
    assert_ne!(game.food().pos(), (52, 52));
}

#[test]
fn same_seed_places_food_the_same_way() {
    let run = |seed| {
        let mut game = Game::seeded(GameConfig::demo(), seed).unwrap();
        game.walk_right();
        game.walk_right();
        for _ in 0..4 {
            game.walk_down();
        }
        game.food().pos()
    };

    assert_eq!(run(5), run(5));
}
