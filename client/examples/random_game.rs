//! Play random plate appearances until nine innings are done

use std::sync::Arc;

use anyhow::Result;
use rand::Rng;
use rand::seq::SliceRandom;
use scorebook_client::{GameSession, Matchup, MemoryStore, OutcomeKey, SessionConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let matchup = Matchup::new("home", "away");
    let session = GameSession::start(store.clone(), matchup, SessionConfig::default()).await?;
    let mut rng = rand::thread_rng();

    let outcomes = [
        OutcomeKey::Single,
        OutcomeKey::Double,
        OutcomeKey::Triple,
        OutcomeKey::HomeRun,
        OutcomeKey::Walk,
        OutcomeKey::Strikeout,
        OutcomeKey::Groundout,
        OutcomeKey::Groundout,
        OutcomeKey::Flyout,
        OutcomeKey::Flyout,
    ];

    let mut plays = 0;
    loop {
        let view = session.view().await?;
        if view.state.inning > 9 {
            break;
        }

        if let Some(prompt) = &view.prompt {
            if let Some(choice) = prompt.choices.choose(&mut rng) {
                session.answer(*choice).await?;
            }
            continue;
        }

        if rng.gen_bool(0.3) {
            session.ball().await?;
        } else if let Some(outcome) = outcomes.choose(&mut rng) {
            let view = session.outcome(*outcome).await?;
            plays += 1;
            println!("{:<10} {}", outcome.label(), view.scoreline());
        }
    }

    session.flush().await?;
    let view = session.view().await?;
    println!(
        "Final after {} plays: Away {} - Home {}",
        plays, view.state.away_runs, view.state.home_runs
    );
    println!("Stored teams: {}", store.snapshot()["Teams"]);

    session.shutdown().await?;
    Ok(())
}
