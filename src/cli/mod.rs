pub mod commands;

use std::io::{self, Write};
use std::sync::Arc;

use crate::cli::commands::Commands;
use crate::client::{Game, GameBackend, RemoteBackend};
use crate::config::AppConfig;
use crate::game::{ViewModel, RETRY_OPTION};
use crate::llm::ProviderFactory;
use crate::session::{SessionService, SessionStore};

pub async fn run_cli(command: Commands, config_path: String) {
    let config = match AppConfig::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return;
        }
    };

    match command {
        Commands::Serve => {
            eprintln!("Serve is handled by the HTTP entry point");
        }
        Commands::Play { server: Some(url) } => {
            println!("Connecting to relay at {}", url);
            let game = Game::new(RemoteBackend::new(url), config.game.opening_prompt.clone());
            run_repl(game).await;
        }
        Commands::Play { server: None } => {
            let Some(llm) = ProviderFactory::create_default(&config) else {
                eprintln!("No usable '{}' provider block in config", config.llm.provider);
                return;
            };
            let service = SessionService::new(
                Arc::new(SessionStore::new()),
                llm,
                config.generation.clone(),
            );
            let game = Game::new(service, config.game.opening_prompt.clone());
            run_repl(game).await;
        }
    }
}

enum Action {
    Quit,
    Retry,
    Submit(String),
}

/// Maps a line typed at the prompt onto a game action. Numbers pick one of
/// the offered options.
fn read_action(line: &str, view: &ViewModel) -> Option<Action> {
    let text = line.trim();
    if text.is_empty() {
        return None;
    }
    if text == "/exit" || text == "/quit" {
        return Some(Action::Quit);
    }
    if text.eq_ignore_ascii_case("r") {
        return Some(Action::Retry);
    }

    let chosen = text
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| view.options.get(i));

    match chosen {
        Some(option) if option == RETRY_OPTION && view.is_error() => Some(Action::Retry),
        Some(option) => Some(Action::Submit(option.clone())),
        None => Some(Action::Submit(text.to_string())),
    }
}

fn render(view: &ViewModel) {
    println!();
    println!("{}", view.story);
    println!();
    println!(
        "Player: {} | HP: {} | Location: {}",
        view.player.name, view.player.hp, view.player.location
    );
    println!("Inventory: {}", view.player.inventory_line());
    if view.session_expired {
        println!("(The session has expired; retrying starts a new game.)");
    }
    for (i, option) in view.options.iter().enumerate() {
        println!("  {}) {}", i + 1, option);
    }
}

async fn run_repl<B: GameBackend>(mut game: Game<B>) {
    println!("--- Story Relay ---");
    println!("Pick an option by number, type your own action, or /exit to quit.");
    println!("-------------------");

    render(game.begin().await);

    loop {
        print!("\n> ");
        let _ = io::stdout().flush();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let view = match read_action(&input, game.view()) {
            None => continue,
            Some(Action::Quit) => break,
            Some(Action::Retry) => game.retry().await,
            Some(Action::Submit(text)) => game.submit(&text).await,
        };
        render(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with(options: &[&str], error: bool) -> ViewModel {
        ViewModel {
            options: options.iter().map(|o| o.to_string()).collect(),
            last_error: error.then(|| "boom".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn numbers_pick_offered_options() {
        let view = view_with(&["Enter", "Leave"], false);
        assert!(matches!(read_action("2", &view), Some(Action::Submit(s)) if s == "Leave"));
        assert!(matches!(read_action("7", &view), Some(Action::Submit(s)) if s == "7"));
    }

    #[test]
    fn retry_option_maps_to_retry() {
        let view = view_with(&[RETRY_OPTION], true);
        assert!(matches!(read_action("1", &view), Some(Action::Retry)));
        assert!(matches!(read_action("R", &view), Some(Action::Retry)));
    }

    #[test]
    fn blank_and_exit_lines() {
        let view = view_with(&[], false);
        assert!(read_action("   ", &view).is_none());
        assert!(matches!(read_action("/exit", &view), Some(Action::Quit)));
    }
}
