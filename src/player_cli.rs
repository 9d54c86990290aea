use std::io::{self, BufRead, Write};
use std::string::String;

use crate::{
    ai::Density,
    board::{BoardView, CellView},
    common::{Coord, GuessResult},
    config::GameConfig,
    game::{AttackOutcome, GameEngine, Side},
    player::Player,
    player_ai::AiPlayer,
    ship::Orientation,
};
use rand::rngs::SmallRng;

/// Format a coordinate the way players type it, e.g. `(4, 0)` -> `A5`.
pub fn coord_to_string(r: usize, c: usize) -> String {
    let col = (b'A' + c as u8) as char;
    std::format!("{}{}", col, r + 1)
}

/// Parse `A5`-style input on a `size×size` grid.
pub fn parse_coord(input: &str, size: usize) -> Result<Coord, String> {
    let input = input.trim();
    if input.len() < 2 {
        return Err("Too short - need column letter and row number (e.g., A5)".to_string());
    }
    let mut chars = input.chars();
    let col_ch = chars.next().ok_or("No column letter")?.to_ascii_uppercase();
    let last_col = (b'A' + size.saturating_sub(1) as u8) as char;
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("Invalid column '{}' - must be a letter A-{}", col_ch, last_col));
    }
    let col = (col_ch as u8 - b'A') as usize;
    if col >= size {
        return Err(format!("Column '{}' out of bounds - must be A-{}", col_ch, last_col));
    }
    let row_str: String = chars.collect();
    let row: usize = row_str
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-{}", row_str, size))?;
    if row == 0 || row > size {
        return Err(format!("Row {} out of bounds - must be 1-{}", row, size));
    }
    Ok((row - 1, col))
}

/// Parse `A5 H` / `A5 V` placement input. Orientation defaults to horizontal.
pub fn parse_placement(input: &str, size: usize) -> Result<(Coord, Orientation), String> {
    let mut parts = input.split_whitespace();
    let coord = parse_coord(parts.next().unwrap_or(""), size)?;
    let orientation = match parts.next().map(|p| p.to_ascii_uppercase()) {
        None => Orientation::Horizontal,
        Some(p) if p.starts_with('H') => Orientation::Horizontal,
        Some(p) if p.starts_with('V') => Orientation::Vertical,
        Some(p) => return Err(format!("Unknown orientation '{}' - use H or V", p)),
    };
    Ok((coord, orientation))
}

fn cell_char(cell: CellView) -> char {
    match cell {
        CellView::Water => '.',
        CellView::Ship => 'S',
        CellView::Hit => 'X',
        CellView::Sunk => '#',
        CellView::Miss => 'o',
    }
}

/// Print a board projection with coordinates around it.
pub fn print_board(view: &BoardView) {
    std::print!("    ");
    for c in 0..view.size() {
        std::print!(" {}", (b'A' + c as u8) as char);
    }
    std::println!();
    for (r, row) in view.rows().enumerate() {
        std::print!("  {:2}", r + 1);
        for &cell in row {
            std::print!(" {}", cell_char(cell));
        }
        std::println!();
    }
    std::println!("    Legend: S=Ship  X=Hit  #=Sunk  o=Miss  .=Water");
}

/// Print density scores, blanking cells that have already been tried.
pub fn print_probability_board(density: &Density) {
    std::println!("\nShip density:");
    std::print!("    ");
    for c in 0..density.size() {
        std::print!(" {:>3}", (b'A' + c as u8) as char);
    }
    std::println!();
    for r in 0..density.size() {
        std::print!("  {:2}", r + 1);
        for c in 0..density.size() {
            match density.get(r, c) {
                0 => std::print!("   -"),
                v => std::print!(" {:3}", v),
            }
        }
        std::println!();
    }
}

/// Display the opponent board (top) and the player's board (bottom).
pub fn print_player_view(engine: &GameEngine) {
    std::println!("Opponent board:");
    print_board(&engine.opponent_view());
    std::println!("\nYour board:");
    print_board(&engine.player_view());
}

/// One-line description of an attack for the status line.
pub fn describe_outcome(outcome: &AttackOutcome) -> String {
    let who = match outcome.target {
        Side::Opponent => "You",
        Side::Player => "Opponent",
    };
    let at = coord_to_string(outcome.row, outcome.col);
    match (outcome.result, outcome.ship_size) {
        (GuessResult::Miss, _) => format!("{} fired at {} - miss.", who, at),
        (GuessResult::Hit, _) => format!("{} fired at {} - hit!", who, at),
        (GuessResult::Sink, Some(size)) => {
            format!("{} fired at {} - hit! A ship of size {} is sunk!", who, at, size)
        }
        (GuessResult::Sink, None) => format!("{} fired at {} - sunk!", who, at),
    }
}

/// Human player at the terminal. Keeps an [`AiPlayer`] of its own to offer
/// a suggested target in the prompt.
pub struct CliPlayer<R = io::StdinLock<'static>> {
    input: R,
    size: usize,
    advisor: AiPlayer,
}

impl CliPlayer {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_input(config, io::stdin().lock())
    }
}

impl<R: BufRead> CliPlayer<R> {
    /// Read commands from `input` instead of stdin.
    pub fn with_input(config: &GameConfig, input: R) -> Self {
        Self {
            input,
            size: config.grid_size(),
            advisor: AiPlayer::new(config),
        }
    }

    /// Density over the opponent grid as far as this player knows it.
    pub fn density(&self) -> Density {
        self.advisor.density()
    }

    /// Prompt and read one trimmed line. `None` on end of input.
    pub fn prompt(&mut self, text: &str) -> Option<String> {
        std::print!("{}", text);
        let _ = io::stdout().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl<R: BufRead> Player for CliPlayer<R> {
    fn select_target(&mut self, rng: &mut SmallRng) -> Option<Coord> {
        let suggestion = self.advisor.suggest(rng);
        let hint = suggestion
            .map(|(r, c)| coord_to_string(r, c))
            .unwrap_or_default();
        loop {
            let line = self.prompt(&format!("Enter target [{}] or 'quit': ", hint))?;
            if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("q") {
                return None;
            }
            if line.is_empty() {
                if suggestion.is_some() {
                    return suggestion;
                }
                continue;
            }
            match parse_coord(&line, self.size) {
                Ok(coord) => return Some(coord),
                Err(msg) => std::println!("{}", msg),
            }
        }
    }

    fn handle_guess_result(&mut self, coord: Coord, result: GuessResult) {
        if let Err(e) = self.advisor.record_result(coord.0, coord.1, result) {
            log::debug!("advisor ignored result: {}", e);
        }
    }

    fn handle_opponent_guess(&mut self, coord: Coord, result: GuessResult) {
        log::debug!("opponent fired at {} -> {:?}", coord_to_string(coord.0, coord.1), result);
    }

    fn reset(&mut self) {
        self.advisor.reset();
    }
}
