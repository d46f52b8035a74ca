#![no_main]
use cardchess::chess::board::Board;
use cardchess::chess::core::Coordinate;
use cardchess::config::BoardConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = Coordinate::try_from(s);
        if let Ok(config) = BoardConfig::from_json(s) {
            // Accepted placements are always inside of the board.
            let _ = Board::from_config(&config).expect("validated placement");
        }
    }
});
