use sea_battle::{
    auto_place, describe_outcome, init_logging, print_board, print_player_view,
    print_probability_board, parse_placement, AiPlayer, CliPlayer, GameConfig, GameEngine,
    GamePhase, PlacementProgress, Player, Side, DEFAULT_FLEET, DEFAULT_GRID_SIZE,
};

use clap::{Args, Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct ConfigArgs {
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE, help = "Grid side length")]
    size: usize,
    #[arg(long, value_delimiter = ',', help = "Ship sizes, e.g. --fleet 4,3,3,2,2,2,1,1,1,1")]
    fleet: Option<Vec<usize>>,
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
}

impl ConfigArgs {
    fn config(&self) -> anyhow::Result<GameConfig> {
        let fleet = self.fleet.clone().unwrap_or_else(|| DEFAULT_FLEET.to_vec());
        GameConfig::new(self.size, fleet).map_err(|e| anyhow::anyhow!(e))
    }

    fn rng(&self, stream: u64) -> SmallRng {
        match self.seed {
            Some(s) => SmallRng::seed_from_u64(s.wrapping_add(stream)),
            None => SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer in the terminal.
    Play {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long, help = "Place your fleet randomly instead of by hand")]
        auto_place: bool,
        #[arg(long, help = "Show the ship density map before each shot")]
        heatmap: bool,
    },
    /// Measure how many shots the computer needs to sink a random fleet.
    Sim {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long, default_value_t = 100)]
        games: usize,
    },
}

#[derive(Serialize)]
struct SimSummary<'a> {
    config: &'a GameConfig,
    games: usize,
    mean_shots: f64,
    min_shots: usize,
    max_shots: usize,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            config,
            auto_place,
            heatmap,
        } => play(&config, auto_place, heatmap),
        Commands::Sim { config, games } => sim(&config, games),
    }
}

fn play(args: &ConfigArgs, auto_place: bool, heatmap: bool) -> anyhow::Result<()> {
    let config = args.config()?;
    if let Some(s) = args.seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
    }
    let mut engine =
        GameEngine::from_rng(config.clone(), args.rng(0)).map_err(|e| anyhow::anyhow!(e))?;
    let mut rng = args.rng(1);
    let mut player = CliPlayer::new(&config);

    loop {
        if auto_place {
            engine.randomize_placement().map_err(|e| anyhow::anyhow!(e))?;
        } else if !place_fleet(&mut engine, &mut player)? {
            return Ok(());
        }

        println!("\nThe battle begins! Fire at the opponent's grid.");
        while engine.phase() == GamePhase::InProgress {
            println!();
            print_player_view(&engine);
            if heatmap {
                print_probability_board(&player.density());
            }
            let Some((r, c)) = player.select_target(&mut rng) else {
                println!("Goodbye.");
                return Ok(());
            };
            match engine.play_turn(r, c) {
                Ok(turn) => {
                    player.handle_guess_result((r, c), turn.player.result);
                    println!("{}", describe_outcome(&turn.player));
                    if let Some(reply) = turn.reply {
                        player.handle_opponent_guess((reply.row, reply.col), reply.result);
                        println!("{}", describe_outcome(&reply));
                    }
                }
                Err(e) if e.is_recoverable() => println!("{}", e),
                Err(e) => return Err(anyhow::anyhow!(e)),
            }
        }

        println!("\n=== GAME OVER ===\n");
        print_player_view(&engine);
        match engine.winner() {
            Some(Side::Player) => println!("\nVictory! You have sunk all enemy ships."),
            _ => println!("\nDefeat. All your ships have been destroyed."),
        }
        println!(
            "Shots fired: you {}, opponent {}",
            engine.shots_fired(Side::Opponent),
            engine.shots_fired(Side::Player)
        );

        match player.prompt("\nPlay again? [y/N]: ") {
            Some(answer) if answer.eq_ignore_ascii_case("y") => {
                engine.new_match(config.clone()).map_err(|e| anyhow::anyhow!(e))?;
                player.reset();
            }
            _ => return Ok(()),
        }
    }
}

/// Interactive placement. Returns `false` if input ended before the fleet was placed.
fn place_fleet(engine: &mut GameEngine, player: &mut CliPlayer) -> anyhow::Result<bool> {
    println!("Place your ships (e.g. A5 H or B2 V). Type 'random' or press ENTER for random placement, 'reset' to start over.");
    while let Some(size) = engine.next_ship_size() {
        println!();
        print_board(&engine.player_view());
        let Some(line) = player.prompt(&format!("Place ship of size {}: ", size)) else {
            return Ok(false);
        };
        if line.is_empty() || line.eq_ignore_ascii_case("random") {
            engine.randomize_placement().map_err(|e| anyhow::anyhow!(e))?;
            break;
        }
        if line.eq_ignore_ascii_case("reset") {
            engine.reset_placement().map_err(|e| anyhow::anyhow!(e))?;
            continue;
        }
        let ((r, c), orientation) = match parse_placement(&line, engine.config().grid_size()) {
            Ok(p) => p,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };
        match engine.try_place(r, c, orientation) {
            Ok(PlacementProgress::Complete) => break,
            Ok(PlacementProgress::Next(_)) => {}
            Err(e) => println!("Error: {}", e),
        }
    }
    Ok(true)
}

fn sim(args: &ConfigArgs, games: usize) -> anyhow::Result<()> {
    let config = args.config()?;
    let mut rng = args.rng(0);
    let mut ai = AiPlayer::new(&config);
    let mut shots = Vec::with_capacity(games);

    for _ in 0..games {
        let mut board = auto_place(&config, &mut rng).map_err(|e| anyhow::anyhow!(e))?;
        ai.reset();
        let mut fired = 0;
        while !board.all_sunk() {
            let (r, c) = ai
                .next_attack(&mut rng)
                .ok_or_else(|| anyhow::anyhow!("ran out of cells before sinking the fleet"))?;
            let report = board.receive_attack(r, c).map_err(|e| anyhow::anyhow!(e))?;
            ai.record_result(r, c, report.result)
                .map_err(|e| anyhow::anyhow!(e))?;
            fired += 1;
        }
        shots.push(fired);
    }

    let summary = SimSummary {
        config: &config,
        games,
        mean_shots: if games == 0 {
            0.0
        } else {
            shots.iter().sum::<usize>() as f64 / games as f64
        },
        min_shots: shots.iter().copied().min().unwrap_or(0),
        max_shots: shots.iter().copied().max().unwrap_or(0),
    };
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
