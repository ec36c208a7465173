use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use clap::Parser;
use dice_party::cli::{PlayerInstance, StatisticsAccumulator, create_player, print_player_help};
use dice_party::env::SimulatedDice;
use dice_party::game::game::TURNS_LIMIT;
use dice_party::game::{Game, GameConfig};
use dice_party::types::PoolProfile;

#[derive(Debug, Parser, Clone)]
#[command(name = "dice-party-sim")]
#[command(about = "Dice party simulator - play headless games between throwing styles")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 5)]
    num: u32,

    /// Comma-separated player codes (e.g., R,R,S)
    /// Use ':' to set player-specific params (e.g., S:0.4 for intensity)
    #[arg(long, default_value = "R,R,S,S")]
    players: String,

    /// Random seed for reproducibility (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Steps from start to goal (overrides the config file)
    #[arg(long)]
    board_length: Option<usize>,

    /// Event pool profile: CLASSIC or ENHANCED
    #[arg(long)]
    profile: Option<String>,

    /// JSON file with GameConfig overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chance per die of leaving the bowl on a full-strength throw
    #[arg(long, default_value_t = 0.05)]
    drop_chance: f64,

    /// Deliver every stop report twice
    #[arg(long)]
    echo: bool,

    /// Swap the trailing player for a guest every N turns
    #[arg(long)]
    churn: Option<u32>,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,

    /// Silence console output
    #[arg(long)]
    quiet: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.help_players {
        print_player_help();
        return;
    }

    let config = load_config(&args).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    });

    let player_keys: Vec<&str> = args.players.split(',').collect();
    if !(config.min_players..=config.max_players).contains(&player_keys.len()) {
        eprintln!(
            "Error: Must specify {}-{} players",
            config.min_players, config.max_players
        );
        std::process::exit(1);
    }

    let mut players: Vec<PlayerInstance> = Vec::new();
    for key in &player_keys {
        let parts: Vec<&str> = key.split(':').collect();
        let code = parts[0];
        let params = parts[1..].to_vec();
        match create_player(code, params) {
            Some(player) => players.push(player),
            None => {
                eprintln!("Error: Unknown player code '{}'", code);
                eprintln!("Use --help-players to see available codes");
                std::process::exit(1);
            }
        }
    }

    let mut stats = StatisticsAccumulator::new();
    run_simulations(&args, &config, &players, &mut stats);

    if !args.quiet {
        print_summary(&stats, &players);
    }
}

fn load_config(args: &Args) -> Result<GameConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
            GameConfig::from_json(&json).map_err(|err| err.to_string())?
        }
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(board_length) = args.board_length {
        config.board_length = board_length;
    }
    if let Some(profile) = &args.profile {
        config.profile = PoolProfile::from_str(profile)
            .map_err(|_| format!("invalid profile '{profile}'. Use CLASSIC or ENHANCED"))?;
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

fn run_simulations(
    args: &Args,
    base: &GameConfig,
    players: &[PlayerInstance],
    stats: &mut StatisticsAccumulator,
) {
    for game_idx in 0..args.num {
        let config = GameConfig {
            seed: base.seed + u64::from(game_idx),
            ..base.clone()
        };

        let start = Instant::now();
        let dice = SimulatedDice::new(config.seed.wrapping_mul(31))
            .with_drop_chance(args.drop_chance)
            .with_echo(args.echo);
        let mut game = match Game::new(config, players.len()) {
            Ok(game) => game.with_dice(dice),
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        };
        let winner = match args.churn {
            Some(every) if every > 0 => play_with_churn(&mut game, players, every),
            _ => game.play(players),
        };
        let duration = start.elapsed();

        stats.after(&game, duration);

        if !args.quiet {
            let last_n = 10;
            if game_idx < last_n || game_idx >= args.num.saturating_sub(last_n) {
                let order = game.session.roster().turn_order().join(",");
                println!(
                    "Game {:>4}: Order=[{}], Winner={:>10}, Turns={:>4}, Rolls={:>4}, Duration={:?}",
                    game_idx + 1,
                    order,
                    winner.as_deref().unwrap_or("None"),
                    game.session.turns_played,
                    game.session.rolls,
                    duration
                );
            } else if (game_idx + 1) % 100 == 0 {
                print!(".");
                use std::io::Write;
                let _ = std::io::stdout().flush();
            }
        }
    }
}

fn play_with_churn(game: &mut Game, players: &[PlayerInstance], every: u32) -> Option<String> {
    let mut next_swap = every;
    while !game.session.is_finished() && game.session.turns_played < TURNS_LIMIT {
        if game.play_tick(players).is_none() {
            break;
        }
        if game.session.turns_played >= next_swap {
            next_swap += every;
            if let Err(err) = game.rotate_seat() {
                log::warn!("seat rotation failed: {err}");
            }
        }
    }
    game.winner().map(str::to_string)
}

fn print_summary(stats: &StatisticsAccumulator, players: &[PlayerInstance]) {
    println!("\n{}", "=".repeat(80));
    println!("SIMULATION SUMMARY");
    println!("{}", "=".repeat(80));

    println!("\nSeat Summary:");
    println!(
        "{:<15} {:<10} {:<12} {:<12}",
        "Seat", "Wins", "Win Rate", "Avg Score"
    );
    println!("{}", "-".repeat(50));

    for (idx, player) in players.iter().enumerate() {
        let piece = idx as u8;
        let wins = stats.stats.wins.get(&piece).copied().unwrap_or(0);
        let win_rate = if stats.stats.games > 0 {
            (wins as f64 / stats.stats.games as f64) * 100.0
        } else {
            0.0
        };
        println!(
            "{:<15} {:<10} {:<11.1}% {:<12.2}",
            format!("{} (#{})", player.label(), idx + 1),
            wins,
            win_rate,
            stats.stats.get_avg_score(piece)
        );
    }

    println!("\nGame Summary:");
    println!("  Total Games: {}", stats.stats.games);
    println!("  Unfinished: {}", stats.stats.unfinished);
    println!("  Avg Turns: {:.2}", stats.stats.get_avg_turns());
    println!("  Avg Rolls: {:.2}", stats.stats.get_avg_rolls());
    println!("  Dropped Dice: {}", stats.stats.dropped_dice);
    println!("  Avg Duration: {:.2?}", stats.stats.get_avg_duration());
}
