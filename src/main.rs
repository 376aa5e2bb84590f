mod cli;
mod client;
mod models;
mod sync;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use client::ApiClient;
use sync::SyncController;
use ui::run_tui;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let rt = tokio::runtime::Runtime::new()?;
    let mut controller = SyncController::new(ApiClient::new(cli.endpoint.clone()));

    match cli.command {
        Some(Commands::List) => {
            rt.block_on(controller.refresh())?;
            print_cards(&controller);
        }
        Some(Commands::Add { title }) => {
            controller.set_input(title);
            rt.block_on(controller.submit())?;
            print_cards(&controller);
        }
        Some(Commands::Done { id }) => {
            rt.block_on(controller.mark_done(&id))?;
            print_cards(&controller);
        }
        Some(Commands::Undo { id }) => {
            rt.block_on(controller.undo(&id))?;
            print_cards(&controller);
        }
        Some(Commands::Delete { id }) => {
            rt.block_on(controller.delete(&id))?;
            print_cards(&controller);
        }
        Some(Commands::Tui) => {
            run_tui(controller, rt)?;
        }
        None => {
            // Default behavior: launch TUI
            run_tui(controller, rt)?;
        }
    }

    Ok(())
}

fn print_cards(controller: &SyncController<ApiClient>) {
    if controller.cards().is_empty() {
        println!("No articles");
        return;
    }
    for card in controller.cards() {
        println!("[{:6}] {} ({})", card.color.name(), card.title, card.id);
    }
}
