use std::collections::{BTreeMap, HashSet};

use crate::models::{GameStatus, LetterScore, ScoredGuess};
use crate::saved::SavedGame;

#[derive(Debug, PartialEq, Eq)]
pub enum GuessError {
    GameOver,
    NotLetters,
    WrongLength { expected: usize },
    UnknownWord(String),
}

impl std::fmt::Display for GuessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuessError::GameOver => write!(f, "the game is over, come back when the word changes"),
            GuessError::NotLetters => write!(f, "guesses may only contain letters"),
            GuessError::WrongLength { expected } => write!(f, "guess must be {} letters", expected),
            GuessError::UnknownWord(word) => write!(f, "{} is not in the word list", word),
        }
    }
}

/// Scores `guess` against `answer`. Exact matches are taken first, then
/// misplaced letters each consume one unmatched occurrence in the answer.
pub fn score(answer: &str, guess: &str) -> Vec<LetterScore> {
    let answer: Vec<char> = answer.to_uppercase().chars().collect();
    let guess: Vec<char> = guess.to_uppercase().chars().collect();

    let mut remaining: Vec<Option<char>> = answer.iter().copied().map(Some).collect();
    let mut scores = vec![LetterScore::Absent; guess.len()];

    for (idx, letter) in guess.iter().enumerate() {
        if answer.get(idx) == Some(letter) {
            scores[idx] = LetterScore::Correct;
            remaining[idx] = None;
        }
    }

    for (idx, letter) in guess.iter().enumerate() {
        if scores[idx] == LetterScore::Correct {
            continue;
        }
        if let Some(pos) = remaining.iter().position(|left| *left == Some(*letter)) {
            scores[idx] = LetterScore::Present;
            remaining[pos] = None;
        }
    }

    scores
}

fn rank(score: LetterScore) -> u8 {
    match score {
        LetterScore::Absent => 0,
        LetterScore::Present => 1,
        LetterScore::Correct => 2,
    }
}

pub struct Game {
    answer: String,
    valid_words: HashSet<String>,
    max_tries: usize,
    pub guesses: Vec<ScoredGuess>,
}

impl Game {
    pub fn new(answer: &str, valid_words: &[String], max_tries: usize) -> Self {
        Self {
            answer: answer.trim().to_uppercase(),
            valid_words: valid_words.iter().map(|word| word.to_lowercase()).collect(),
            max_tries,
            guesses: Vec::new(),
        }
    }

    /// Picks up `saved` when it was played against the same answer,
    /// otherwise starts a fresh board.
    pub fn restore(answer: &str, valid_words: &[String], max_tries: usize, saved: Option<&SavedGame>) -> Self {
        let mut game = Self::new(answer, valid_words, max_tries);
        let saved = match saved {
            Some(saved) if saved.answer.trim().eq_ignore_ascii_case(&game.answer) => saved,
            _ => return game,
        };
        for word in &saved.guesses {
            if game.status() != GameStatus::Playing {
                break;
            }
            let word = word.trim().to_uppercase();
            if word.chars().count() != game.word_length() {
                continue;
            }
            let scores = score(&game.answer, &word);
            game.guesses.push(ScoredGuess { word, scores });
        }
        game
    }

    pub fn to_saved(&self) -> SavedGame {
        SavedGame {
            answer: self.answer.clone(),
            guesses: self.guesses.iter().map(|guess| guess.word.clone()).collect(),
        }
    }

    /// Best score seen so far for every guessed letter.
    pub fn letter_states(&self) -> BTreeMap<char, LetterScore> {
        let mut states = BTreeMap::new();
        for guess in &self.guesses {
            for (letter, score) in guess.word.chars().zip(guess.scores.iter().copied()) {
                states
                    .entry(letter)
                    .and_modify(|best: &mut LetterScore| {
                        if rank(score) > rank(*best) {
                            *best = score;
                        }
                    })
                    .or_insert(score);
            }
        }
        states
    }

    pub fn word_length(&self) -> usize {
        self.answer.chars().count()
    }

    pub fn tries_left(&self) -> usize {
        self.max_tries.saturating_sub(self.guesses.len())
    }

    pub fn status(&self) -> GameStatus {
        match self.guesses.last() {
            Some(last) if last.word == self.answer => GameStatus::Won,
            _ if self.guesses.len() >= self.max_tries => GameStatus::Lost,
            _ => GameStatus::Playing,
        }
    }

    pub fn guess(&mut self, raw: &str) -> Result<&ScoredGuess, GuessError> {
        if self.status() != GameStatus::Playing {
            return Err(GuessError::GameOver);
        }
        let word = raw.trim().to_uppercase();
        if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(GuessError::NotLetters);
        }
        if word.chars().count() != self.word_length() {
            return Err(GuessError::WrongLength {
                expected: self.word_length(),
            });
        }
        if !self.valid_words.contains(&word.to_lowercase()) {
            return Err(GuessError::UnknownWord(word));
        }

        let scores = score(&self.answer, &word);
        self.guesses.push(ScoredGuess { word, scores });
        Ok(&self.guesses[self.guesses.len() - 1])
    }

    pub fn status_text(&self) -> Option<String> {
        match self.status() {
            GameStatus::Playing => None,
            GameStatus::Won => {
                let tries = self.guesses.len();
                let unit = if tries == 1 { "try" } else { "tries" };
                Some(format!("Congrats! You guessed the word {} in {} {}.", self.answer, tries, unit))
            }
            GameStatus::Lost => Some(format!(
                "The correct word is {}. You may try again tomorrow!",
                self.answer
            )),
        }
    }
}
