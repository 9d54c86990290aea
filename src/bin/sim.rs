use clap::Parser;
use rand::{rngs::SmallRng, SeedableRng};
use sea_battle::{auto_place, init_logging, AiPlayer, Board, GameConfig, Player};
use serde_json::json;

/// Computer-vs-computer match on two auto-placed default fleets.
#[derive(Parser)]
struct Args {
    seed1: u64,
    seed2: u64,
}

struct Contender {
    rng: SmallRng,
    player: AiPlayer,
    /// The board this contender fires at.
    target: Board,
    guesses: usize,
}

impl Contender {
    /// Fire one shot. Returns `true` once the target fleet is gone.
    fn fire(&mut self) -> anyhow::Result<bool> {
        let (r, c) = self
            .player
            .select_target(&mut self.rng)
            .ok_or_else(|| anyhow::anyhow!("no cells left to attack"))?;
        let report = self
            .target
            .receive_attack(r, c)
            .map_err(|e| anyhow::anyhow!(e))?;
        self.player.handle_guess_result((r, c), report.result);
        self.guesses += 1;
        Ok(self.target.all_sunk())
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();
    let config = GameConfig::default();

    let mut rng1 = SmallRng::seed_from_u64(args.seed1);
    let mut rng2 = SmallRng::seed_from_u64(args.seed2);
    let board1 = auto_place(&config, &mut rng1).map_err(|e| anyhow::anyhow!(e))?;
    let board2 = auto_place(&config, &mut rng2).map_err(|e| anyhow::anyhow!(e))?;

    let mut p1 = Contender {
        rng: rng1,
        player: AiPlayer::new(&config),
        target: board2,
        guesses: 0,
    };
    let mut p2 = Contender {
        rng: rng2,
        player: AiPlayer::new(&config),
        target: board1,
        guesses: 0,
    };

    let winner = loop {
        if p1.fire()? {
            break "player1";
        }
        if p2.fire()? {
            break "player2";
        }
    };

    let status = |name: &str| if name == winner { "Won" } else { "Lost" };
    let result = json!({
        "player1": {"status": status("player1"), "guesses": p1.guesses},
        "player2": {"status": status("player2"), "guesses": p2.guesses},
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
