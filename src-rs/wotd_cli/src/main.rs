mod cli;
mod client;
mod game;
mod models;
mod repl;
mod render;
mod saved;

use client::HTTPClient;
use repl::REPL;

fn main() {
    let config = cli::parse_config();
    let client = match HTTPClient::new(&config.base_url) {
        Ok(client) => client,
        Err(err) => {
            render::error(&err);
            std::process::exit(1);
        }
    };
    let mut repl = REPL::new(config, client);
    repl.run();
}
