//! Score a game from the terminal
//!
//! Reads one command per line (`ball`, `strike`, `outcome single`,
//! `runner score`, `undo`, `restart`, `menu stats`, `status`) against an
//! in-memory league, printing the scoreboard after each one.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use scorebook_client::{
    GameSession, GameView, Matchup, MemoryStore, MenuTarget, RetiredSide, RunnerPrompt,
    SessionConfig, SessionHandler, TeamId, load_lineup, parse_command, run_handler,
};
use scorebook_game::query::{batting_average, format_rate, on_base_percentage, slugging_percentage};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

struct Printer;

#[async_trait]
impl SessionHandler for Printer {
    async fn on_prompt(&mut self, prompt: &RunnerPrompt) {
        let choices: Vec<_> = prompt.choices.iter().map(|c| c.as_str()).collect();
        println!(
            "Runner on {} ({}/{}): runner <{}>",
            prompt.base.label(),
            prompt.index + 1,
            prompt.total,
            choices.join("|")
        );
    }

    async fn on_side_retired(&mut self, retired: RetiredSide) {
        println!("Side retired: {} in inning {}", retired.side.label(), retired.inning);
    }

    async fn on_batter(&mut self, label: &str) {
        println!("Now batting: {}", label);
    }

    async fn on_persistence_failed(&mut self, operation: &str, error: &str) {
        println!("Could not save ({}): {}", operation, error);
    }
}

fn demo_league() -> serde_json::Value {
    json!({
        "Teams": {
            "owls": {
                "name": "Owls",
                "lineup": {"1": "o1", "2": "o2", "3": "o3"}
            },
            "bats": {
                "name": "Bats",
                "lineup": {"1": "b1", "2": "b2"}
            }
        },
        "Players": {
            "o1": {"name": "Ada Park", "position": "SS", "number": 2, "teamId": "owls"},
            "o2": {"name": "Lee Cruz", "position": "CF", "number": 8, "teamId": "owls"},
            "o3": {"name": "Sam Oduya", "position": "1B", "number": 21, "teamId": "owls"},
            "b1": {"name": "Kim Reyes", "position": "2B", "number": 4, "teamId": "bats"},
            "b2": {"name": "Jo Hart", "position": "C", "number": "12", "teamId": "bats"}
        }
    })
}

fn print_view(view: &GameView) {
    println!("{}", view.scoreline());
}

async fn print_stats(store: &MemoryStore, team: &TeamId) -> Result<()> {
    println!("{}", team);
    println!(
        "{:<4}{:<14}{:>4}{:>4}{:>4}{:>7}{:>7}{:>7}",
        "#", "Player", "PA", "H", "BB", "AVG", "OBP", "SLG"
    );
    for entry in load_lineup(store, team).await? {
        let Some(player) = entry.player else {
            println!("{:<4}(empty)", entry.slot);
            continue;
        };
        let s = &player.stats;
        println!(
            "{:<4}{:<14}{:>4}{:>4}{:>4}{:>7}{:>7}{:>7}",
            entry.slot,
            player.name,
            s.plate_appearances,
            s.hits,
            s.walks,
            format_rate(batting_average(s)),
            format_rate(on_base_percentage(s)),
            format_rate(slugging_percentage(s)),
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let store = Arc::new(MemoryStore::from_value(demo_league()));
    let matchup = Matchup::from_selection(Some("bats"), Some("owls"))?;
    let session =
        GameSession::start(store.clone(), matchup.clone(), SessionConfig::from_env()?).await?;

    let events = session.events();
    let printer = tokio::spawn(async move { run_handler(events, &mut Printer).await });

    print_view(&session.view().await?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                println!("Error: {}", e);
                continue;
            }
        };

        match session.execute(command.clone()).await {
            Ok(view) => print_view(&view),
            Err(e) => println!("Error: {}", e),
        }

        if let scorebook_client::ScorerCommand::Menu(MenuTarget::Stats) = command {
            session.flush().await?;
            for side in [&matchup.away, &matchup.home] {
                print_stats(&store, side).await?;
            }
        }
    }

    session.shutdown().await?;
    drop(session);
    printer.await??;
    Ok(())
}
