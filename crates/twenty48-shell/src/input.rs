use twenty48_grid::engine::Move;

/// A parsed player intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(Move),
    NewGame,
    Dismiss,
    Quit,
}

/// Map one raw input token (key name or letter, any case) to an action.
/// WASD and arrow-key names drive the four directions; an empty line acts
/// as enter and dismisses whatever overlay is up.
pub fn parse(token: &str) -> Option<Action> {
    match token.trim().to_ascii_lowercase().as_str() {
        "w" | "up" | "arrowup" => Some(Action::Shift(Move::Up)),
        "d" | "right" | "arrowright" => Some(Action::Shift(Move::Right)),
        "s" | "down" | "arrowdown" => Some(Action::Shift(Move::Down)),
        "a" | "left" | "arrowleft" => Some(Action::Shift(Move::Left)),
        "n" | "new" => Some(Action::NewGame),
        "" | "enter" | "space" => Some(Action::Dismiss),
        "q" | "quit" | "exit" => Some(Action::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_wasd_and_arrows() {
        assert_eq!(parse("w"), Some(Action::Shift(Move::Up)));
        assert_eq!(parse("ArrowRight"), Some(Action::Shift(Move::Right)));
        assert_eq!(parse("S"), Some(Action::Shift(Move::Down)));
        assert_eq!(parse("left"), Some(Action::Shift(Move::Left)));
    }

    #[test]
    fn it_maps_control_tokens() {
        assert_eq!(parse("n"), Some(Action::NewGame));
        assert_eq!(parse("  "), Some(Action::Dismiss));
        assert_eq!(parse("quit"), Some(Action::Quit));
        assert_eq!(parse("x"), None);
    }
}
