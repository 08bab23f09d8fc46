use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::game::Game;
use crate::models::{CLIConfig, HealthInfo, LetterScore, ScoredGuess};

pub fn banner(cfg: &CLIConfig) {
    println!("Word of the Day");
    println!("API: {}", cfg.base_url);
    println!("Type a guess and press enter. Type /help for commands.");
}

pub fn prompt(tries_left: usize) {
    print!("[{}]> ", tries_left);
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  /help                 Show commands");
    println!("  /exit | /quit         Exit");
    println!("  /new                  Fetch the word again (a finished day stays finished)");
    println!("  /board                Show your guesses and letter status");
    println!("  /health               Show server status");
    println!("  /config               Show current config");
    println!("  /base <url>           Update base URL");
    println!("Legend: [A] right spot  (A) wrong spot   a  not in word");
}

pub fn guess_row(guess: &ScoredGuess) -> String {
    guess
        .word
        .chars()
        .zip(guess.scores.iter())
        .map(|(letter, score)| match score {
            LetterScore::Correct => format!("[{}]", letter),
            LetterScore::Present => format!("({})", letter),
            LetterScore::Absent => format!(" {} ", letter.to_ascii_lowercase()),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn guess(guess: &ScoredGuess) {
    println!("  {}", guess_row(guess));
}

pub fn board(game: &Game) {
    if game.guesses.is_empty() {
        println!("no guesses yet ({} letters)", game.word_length());
        return;
    }
    for item in &game.guesses {
        guess(item);
    }
    println!();
    for row in keyboard_rows(&game.letter_states()) {
        println!("  {}", row);
    }
}

const KEYBOARD: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

/// Keyboard rows in the guess legend; `.` marks letters ruled out, untried
/// letters stay plain.
pub fn keyboard_rows(states: &BTreeMap<char, LetterScore>) -> Vec<String> {
    KEYBOARD
        .iter()
        .map(|row| {
            row.chars()
                .map(|letter| match states.get(&letter) {
                    Some(LetterScore::Correct) => format!("[{}]", letter),
                    Some(LetterScore::Present) => format!("({})", letter),
                    Some(LetterScore::Absent) => " . ".to_string(),
                    None => format!(" {} ", letter),
                })
                .collect::<Vec<_>>()
                .join("")
        })
        .collect()
}

pub fn new_game(game: &Game) {
    if !game.guesses.is_empty() {
        println!("Resuming today's game.");
        board(game);
        if let Some(text) = game.status_text() {
            println!("{}", text);
        }
        return;
    }
    println!(
        "New game: {} letters, {} tries.",
        game.word_length(),
        game.tries_left()
    );
}

pub fn health(info: &HealthInfo) {
    println!("status: {}  version: {}", info.status, info.version);
    println!("words picked so far: {}", info.history_length);
    if let Some(updated) = &info.last_updated {
        println!("last rotation: {}", updated);
    }
}

pub fn config(cfg: &CLIConfig) {
    println!("config:");
    println!("  base: {}", cfg.base_url);
    println!("  tries: {}", cfg.max_tries);
    println!("  state: {}", cfg.state_path.display());
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_marks_each_letter() {
        let row = guess_row(&ScoredGuess {
            word: "CRANE".to_string(),
            scores: vec![
                LetterScore::Correct,
                LetterScore::Present,
                LetterScore::Absent,
                LetterScore::Absent,
                LetterScore::Correct,
            ],
        });

        assert_eq!(row, "[C] (R)  a   n  [E]");
    }

    #[test]
    fn keyboard_shows_best_known_letter_state() {
        let mut states = BTreeMap::new();
        states.insert('Q', LetterScore::Absent);
        states.insert('W', LetterScore::Present);
        states.insert('E', LetterScore::Correct);

        let rows = keyboard_rows(&states);

        assert_eq!(rows.len(), 3);
        assert!(rows[0].starts_with(" . (W)[E] R "));
        assert_eq!(rows[2], " Z  X  C  V  B  N  M ");
    }
}
