use slide_game_core::Direction;

/// Player request decoded from a line of terminal input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Slide the board toward the direction.
    Move(Direction),
    /// Abandon the current board and start over.
    NewGame,
    /// Print the instructions again.
    Help,
    /// Leave the game.
    Quit,
    /// Token that matched no binding.
    Unknown(String),
}

/// Decodes every whitespace separated token on the line.
///
/// Whole words such as `left` or `quit` are matched first. Anything else is
/// treated as a run of single-key bindings, so `wasd` yields four moves.
pub(crate) fn parse_line(line: &str) -> Vec<Action> {
    let mut actions = Vec::new();
    for token in line.split_whitespace() {
        let token = token.to_ascii_lowercase();
        if let Some(action) = parse_word(&token) {
            actions.push(action);
        } else if let Some(keys) = token.chars().map(parse_key).collect::<Option<Vec<_>>>() {
            actions.extend(keys);
        } else {
            actions.push(Action::Unknown(token));
        }
    }
    actions
}

fn parse_word(word: &str) -> Option<Action> {
    let action = match word {
        "left" => Action::Move(Direction::Left),
        "right" => Action::Move(Direction::Right),
        "up" => Action::Move(Direction::Up),
        "down" => Action::Move(Direction::Down),
        "up-left" | "upleft" => Action::Move(Direction::UpLeft),
        "up-right" | "upright" => Action::Move(Direction::UpRight),
        "down-left" | "downleft" => Action::Move(Direction::DownLeft),
        "down-right" | "downright" => Action::Move(Direction::DownRight),
        "new" | "restart" => Action::NewGame,
        "help" => Action::Help,
        "quit" | "exit" => Action::Quit,
        _ => return None,
    };
    Some(action)
}

fn parse_key(key: char) -> Option<Action> {
    let action = match key {
        'a' => Action::Move(Direction::Left),
        'd' => Action::Move(Direction::Right),
        'w' => Action::Move(Direction::Up),
        's' => Action::Move(Direction::Down),
        'q' => Action::Move(Direction::UpLeft),
        'e' => Action::Move(Direction::UpRight),
        'x' => Action::Move(Direction::DownLeft),
        'c' => Action::Move(Direction::DownRight),
        'n' => Action::NewGame,
        'h' => Action::Help,
        _ => return None,
    };
    Some(action)
}
