use std::io;

use crate::client::HTTPClient;
use crate::game::Game;
use crate::models::{CLIConfig, GameStatus};
use crate::render;
use crate::saved;

pub struct REPL {
    pub config: CLIConfig,
    pub client: HTTPClient,
    pub game: Option<Game>,
}

impl REPL {
    pub fn new(config: CLIConfig, client: HTTPClient) -> Self {
        Self {
            config,
            client,
            game: None,
        }
    }

    pub fn run(&mut self) {
        render::banner(&self.config);
        self.start_game();
        loop {
            let tries_left = self.game.as_ref().map(Game::tries_left).unwrap_or(0);
            render::prompt(tries_left);
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                if self.handle_command(&line) {
                    break;
                }
                continue;
            }
            self.play(&line);
        }
    }

    fn handle_command(&mut self, line: &str) -> bool {
        let mut parts = line.splitn(2, ' ');
        let cmd = parts.next().unwrap_or("").trim_start_matches('/');
        let rest = parts.next().unwrap_or("").trim();
        match cmd {
            "exit" | "quit" => return true,
            "help" => render::help(),
            "new" => self.start_game(),
            "board" => match &self.game {
                Some(game) => render::board(game),
                None => render::info("no game loaded, use /new"),
            },
            "health" => match self.client.health() {
                Ok(info) => render::health(&info),
                Err(err) => render::error(&err),
            },
            "config" => render::config(&self.config),
            "base" => {
                if rest.is_empty() {
                    render::info(&format!("base: {}", self.config.base_url));
                } else {
                    self.config.base_url = rest.to_string();
                    self.client.base_url = rest.to_string();
                    render::info("base URL updated, use /new to fetch the word");
                }
            }
            _ => render::error(&format!("unknown command: /{}", cmd)),
        }
        false
    }

    fn start_game(&mut self) {
        let word = match self.client.word() {
            Ok(word) => word,
            Err(err) => {
                render::error(&format!("fetching word: {}", err));
                return;
            }
        };
        let valid_words = match self.client.valid_words() {
            Ok(words) => words,
            Err(err) => {
                render::error(&format!("fetching word list: {}", err));
                return;
            }
        };
        let previous = saved::load(&self.config.state_path);
        let game = Game::restore(&word, &valid_words, self.config.max_tries, previous.as_ref());
        render::new_game(&game);
        self.game = Some(game);
    }

    fn play(&mut self, line: &str) {
        let game = match self.game.as_mut() {
            Some(game) => game,
            None => {
                render::info("no game loaded, use /new");
                return;
            }
        };
        match game.guess(line) {
            Ok(scored) => render::guess(scored),
            Err(err) => {
                render::error(&err.to_string());
                return;
            }
        }
        if let Err(err) = saved::save(&self.config.state_path, &game.to_saved()) {
            render::error(&format!("saving game: {}", err));
        }
        if game.status() != GameStatus::Playing {
            if let Some(text) = game.status_text() {
                render::info(&text);
            }
        }
    }
}
