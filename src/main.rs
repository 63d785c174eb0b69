//! Pet Haven - Entry Point
//!
//! An interactive shell over the progression engine: adopt a pet, look
//! after it, play mini-games and spend coins in the shop.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use pet_haven::catalog::Catalog;
use pet_haven::core::clock::SystemClock;
use pet_haven::core::config::EngineConfig;
use pet_haven::core::types::{PetId, PetType, PlayerId};
use pet_haven::minigame::{GameInput, GameType};
use pet_haven::pet::Pet;
use pet_haven::PetEngine;

/// Pet Haven - look after a virtual pet from the terminal
#[derive(Parser, Debug)]
#[command(name = "pet-haven")]
#[command(about = "Interactive virtual pet progression engine")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Engine config file (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with actions.toml, achievements.toml, games.toml and items.toml
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Player id to act as
    #[arg(long, default_value = "player")]
    player: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("pet_haven=info")
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let catalog = match &args.catalog {
        Some(dir) => Catalog::load_dir(dir)?,
        None => Catalog::embedded()?,
    };

    let engine = PetEngine::new(config, Arc::new(catalog), Arc::new(SystemClock))?;
    let player = PlayerId::new(args.player);
    let mut current: Option<PetId> = None;

    println!("\n=== PET HAVEN ===");
    print_help();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        if current.is_some_and(|id| engine.get_pet(id).is_err()) {
            current = None;
        }
        if current.is_none() {
            current = engine.pets_of(&player).first().map(|p| p.id);
        }

        match command {
            "quit" | "q" => break,
            "help" | "h" => print_help(),
            "adopt" => adopt(&engine, &player, rest, &mut current),
            "status" | "s" => {
                let pets = engine.pets_of(&player);
                if pets.is_empty() {
                    println!("You have no pets yet. Try: adopt <name> [species]");
                }
                for pet in &pets {
                    print_pet(&engine, pet, Some(pet.id) == current);
                }
            }
            "switch" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => match engine.pets_of(&player).get(n - 1) {
                    Some(pet) => {
                        current = Some(pet.id);
                        println!("Now caring for {}", pet.name);
                    }
                    None => println!("No pet number {}", n),
                },
                _ => println!("Usage: switch <pet number>"),
            },
            "release" => match current {
                Some(id) => match engine.delete_pet(id) {
                    Ok(()) => {
                        current = None;
                        println!("Said goodbye.");
                    }
                    Err(e) => println!("{}", e),
                },
                None => println!("No pet selected"),
            },
            "act" | "a" => match current {
                Some(id) => match engine.execute_action(id, rest) {
                    Ok(outcome) => {
                        println!("{}", outcome.message);
                        if outcome.coins_earned > 0 {
                            println!("  +{} coins!", outcome.coins_earned);
                        }
                        if outcome.leveled_up {
                            println!("  Level up! Now level {}", outcome.pet.level());
                        }
                        for unlocked in &outcome.newly_unlocked {
                            println!("  {} Achievement unlocked: {}", unlocked.icon, unlocked.name);
                        }
                    }
                    Err(e) => println!("{}", e),
                },
                None => println!("Adopt a pet first"),
            },
            "actions" => match current {
                Some(id) => match engine.available_actions(id) {
                    Ok(actions) => {
                        for action in actions {
                            println!("  {} {:<14} {}", action.icon, action.name, action.description);
                        }
                    }
                    Err(e) => println!("{}", e),
                },
                None => println!("Adopt a pet first"),
            },
            "games" => {
                for game in engine.catalog().games() {
                    println!(
                        "  {} {:<20} difficulty {} | up to {} coins | {}",
                        game.icon,
                        game.game_type.as_str(),
                        game.difficulty,
                        game.max_reward,
                        game.description
                    );
                }
            }
            "game" | "g" => match GameType::parse(rest) {
                Some(game) => match engine.start_minigame(&player, game) {
                    Ok(session) => {
                        println!("Started {} (round 1 of {})", game.as_str(), session.max_rounds);
                        println!("{}", serde_json::to_string_pretty(&session.payload)?);
                    }
                    Err(e) => println!("{}", e),
                },
                None => println!("Unknown game. Try: games"),
            },
            "input" | "i" => match engine.active_session(&player) {
                Some(session) => match serde_json::from_str::<GameInput>(rest) {
                    Ok(input) => match engine.submit_game_input(session.id, &input) {
                        Ok(turn) => {
                            println!("{} ({:+} points)", turn.outcome.message, turn.outcome.points);
                            println!(
                                "  score {} | round {}/{} | combo {}",
                                turn.session.score,
                                turn.session.current_round,
                                turn.session.max_rounds,
                                turn.session.combo
                            );
                            match turn.settlement {
                                Some(s) if s.success => println!(
                                    "  You won! +{} coins, +{} experience",
                                    s.coins, s.experience
                                ),
                                Some(_) => println!("  Game over."),
                                None if turn.session.current_round != session.current_round => {
                                    println!("{}", serde_json::to_string_pretty(&turn.session.payload)?)
                                }
                                None => {}
                            }
                            for unlocked in &turn.newly_unlocked {
                                println!("  {} Achievement unlocked: {}", unlocked.icon, unlocked.name);
                            }
                        }
                        Err(e) => println!("{}", e),
                    },
                    Err(e) => println!("Could not read input: {}", e),
                },
                None => println!("No game in progress"),
            },
            "pause" | "resume" => match engine.active_session(&player) {
                Some(session) => {
                    let result = if command == "pause" {
                        engine.pause_game(session.id)
                    } else {
                        engine.resume_game(session.id)
                    };
                    match result {
                        Ok(session) => println!("Game is now {:?}", session.state()),
                        Err(e) => println!("{}", e),
                    }
                }
                None => println!("No game in progress"),
            },
            "shop" => {
                let coins = engine.get_ledger(&player).coins;
                println!("You have {} coins", coins);
                for item in engine.shop_items() {
                    println!(
                        "  {} {:<14} {:>4} coins  {}",
                        item.icon, item.id, item.cost, item.description
                    );
                }
            }
            "buy" => match engine.buy_item(&player, rest) {
                Ok(purchase) => {
                    println!(
                        "Bought {} {}. {} coins left.",
                        purchase.item.icon, purchase.item.name, purchase.coins_left
                    );
                    for unlocked in &purchase.newly_unlocked {
                        println!("  {} Achievement unlocked: {}", unlocked.icon, unlocked.name);
                    }
                }
                Err(e) => println!("{}", e),
            },
            "use" => match current {
                Some(id) => match engine.use_item(id, rest) {
                    Ok(used) => println!("{} ({} left)", used.message, used.remaining),
                    Err(e) => println!("{}", e),
                },
                None => println!("Adopt a pet first"),
            },
            "ledger" | "l" => {
                let ledger = engine.get_ledger(&player);
                let counters = engine.player_counters(&player);
                println!(
                    "Coins: {} (earned {}, spent {})",
                    ledger.coins, ledger.lifetime_earned, ledger.lifetime_spent
                );
                for (item, qty) in &ledger.items {
                    println!("  {} x{}", item, qty);
                }
                println!(
                    "Fed {} | played {} | games won {}/{} | items bought {}",
                    counters.feed_count,
                    counters.play_count,
                    counters.games_won,
                    counters.games_played,
                    counters.items_bought
                );
            }
            "achievements" => {
                for status in engine.get_achievements(&player) {
                    let mark = if status.progress.unlocked { "✔" } else { " " };
                    println!(
                        "  [{}] {} {:<22} {}/{}",
                        mark,
                        status.definition.icon,
                        status.definition.name,
                        status.progress.current,
                        status.definition.target
                    );
                }
                let titles = engine.titles(&player);
                if !titles.is_empty() {
                    println!("Titles: {}", titles.join(", "));
                }
            }
            _ => println!("Unknown command. Type 'help' for a list."),
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

fn adopt(engine: &PetEngine, player: &PlayerId, rest: &str, current: &mut Option<PetId>) {
    let mut parts = rest.split_whitespace();
    let Some(name) = parts.next() else {
        println!("Usage: adopt <name> [species]");
        return;
    };
    let pet_type = match parts.next() {
        Some(species) => match PetType::parse(species) {
            Some(t) => t,
            None => {
                let known: Vec<_> = PetType::ALL.iter().map(|t| format!("{:?}", t)).collect();
                println!("Unknown species. Choose one of: {}", known.join(", "));
                return;
            }
        },
        None => PetType::Cat,
    };

    match engine.create_pet(player, name, pet_type, serde_json::Value::Null) {
        Ok(pet) => {
            println!("{} Welcome home, {} the {}!", pet_type.icon(), pet.name, pet_type.display_name());
            if current.is_none() {
                *current = Some(pet.id);
            }
        }
        Err(e) => println!("{}", e),
    }
}

fn print_pet(engine: &PetEngine, pet: &Pet, selected: bool) {
    let now = engine.now();
    let marker = if selected { "*" } else { " " };
    println!(
        "{} {} {} | level {} | {:?} | {}",
        marker,
        pet.pet_type.icon(),
        pet.name,
        pet.level(),
        pet.growth_stage(now),
        pet.status_line()
    );
    println!(
        "    hunger {:>3}  clean {:>3}  happy {:>3}  energy {:>3}  health {:>3}  exp {}",
        pet.stats.hunger(),
        pet.stats.cleanliness(),
        pet.stats.happiness(),
        pet.stats.energy(),
        pet.stats.health(),
        pet.stats.experience()
    );
    if pet.needs_attention(now) {
        println!("    Suggested: {}", pet.recommended_actions().join(", "));
    }
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  adopt <name> [species]  - Adopt a pet (cat, dog, rabbit, hamster, dragon, panda, penguin)");
    println!("  status / s              - Show your pets");
    println!("  switch <n>              - Care for pet number n");
    println!("  release                 - Say goodbye to the current pet");
    println!("  act <action> / a        - Perform a care action (feed, clean, play, sleep, ...)");
    println!("  actions                 - List actions available right now");
    println!("  games                   - List mini-games");
    println!("  game <type> / g         - Start a mini-game");
    println!("  input <json> / i        - Send input, e.g. {{\"type\":\"taps\",\"count\":20}}");
    println!("  pause / resume          - Pause or resume the current game");
    println!("  shop / buy <item> / use <item>");
    println!("  ledger / l              - Coins, inventory and counters");
    println!("  achievements            - Achievement progress");
    println!("  quit / q                - Exit");
    println!();
}
