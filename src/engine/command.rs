use crate::chess::core::Coordinate;

/// A single line of the text protocol.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    /// `select <square>` or a bare square.
    Select(Coordinate),
    /// Draw cards instead of moving.
    Draw,
    Board,
    Hand,
    /// Legal moves of the selected piece.
    Legal,
    Quit,
    /// Empty line.
    Empty,
    Unknown(String),
}

fn parse_select(input: &str, square: &str) -> Command {
    Coordinate::try_from(square)
        .map_or_else(|_| Command::Unknown(input.to_string()), Command::Select)
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let input = input.trim();
        let parts: Vec<&str> = input.split_whitespace().collect();

        match parts.as_slice() {
            [] => Self::Empty,
            ["select", square] => parse_select(input, square),
            ["draw"] => Self::Draw,
            ["board" | "d"] => Self::Board,
            ["hand"] => Self::Hand,
            ["legal" | "moves"] => Self::Legal,
            ["quit"] => Self::Quit,
            [square] => parse_select(input, square),
            _ => Self::Unknown(input.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn select() {
        assert_eq!(
            Command::parse("select E2\n"),
            Command::Select(Coordinate::new(4, 1))
        );
        assert_eq!(Command::parse("a8"), Command::Select(Coordinate::new(0, 7)));
        assert_eq!(
            Command::parse("select"),
            Command::Unknown("select".to_string())
        );
        assert_eq!(
            Command::parse("select 9Z"),
            Command::Unknown("select 9Z".to_string())
        );
    }

    #[test]
    fn parse_actions() {
        assert_eq!(Command::parse("draw"), Command::Draw);
        assert_eq!(Command::parse("board"), Command::Board);
        assert_eq!(Command::parse("d"), Command::Board);
        assert_eq!(Command::parse("hand"), Command::Hand);
        assert_eq!(Command::parse("legal"), Command::Legal);
        assert_eq!(Command::parse("  quit  "), Command::Quit);
        assert_eq!(Command::parse(""), Command::Empty);
    }

    #[test]
    fn unknown() {
        assert_eq!(
            Command::parse("unknown command"),
            Command::Unknown("unknown command".to_string())
        );
    }
}
