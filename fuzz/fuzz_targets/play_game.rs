#![no_main]
use cardchess::chess::core::Coordinate;
use cardchess::chess::game::{Game, GameOptions};
use cardchess::config::Rules;
use libfuzzer_sys::fuzz_target;

// Every byte pair is a click on the board, 0xff draws cards instead.
fuzz_target!(|data: &[u8]| {
    let mut game = Game::new(
        Rules::standard().unwrap(),
        &GameOptions {
            seed: Some(0),
            ..GameOptions::default()
        },
    )
    .unwrap();
    for click in data.chunks_exact(2) {
        if click[0] == 0xff {
            let _ = game.draw_cards();
            continue;
        }
        let coordinate = Coordinate::new(i32::from(click[0] % 8), i32::from(click[1] % 8));
        let _ = game.select(coordinate).expect("coordinate is on the board");
        for piece in game.board().all_pieces() {
            assert!(game.board().in_bounds(piece.position));
        }
    }
});
