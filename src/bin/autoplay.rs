use clap::Parser;
use match3_engine::config::SessionConfig;
use match3_engine::hints::Strategy;
use match3_engine::session::Session;
use match3_engine::source::RandomSource;
use match3_engine::state::Phase;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::error::Error;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Evaluate move strategies over seeded sessions", long_about = None)]
struct Args {
    /// Number of sessions per strategy
    #[clap(short, long, default_value_t = 20)]
    games: u64,

    /// Seed of the first session; session i uses start_seed + i
    #[clap(short, long, default_value_t = 0)]
    start_seed: u64,

    /// TOML file with session parameters; defaults are used if it is missing
    #[clap(short, long, default_value = "match3.toml")]
    config: PathBuf,

    /// Strategies to evaluate (max-score, first, random); all if omitted
    #[clap(long, value_delimiter = ',')]
    strategies: Vec<Strategy>,
}

#[derive(Debug, Default)]
struct Tally {
    wins: u32,
    losses: u32,
    stuck: u32,
    total_score: u64,
}

/// How a single automated session ended.
enum Finish {
    Won(u32),
    Lost(u32),
    /// No swap on the board produced a match.
    Stuck(u32),
}

fn play_one(config: &SessionConfig, strategy: Strategy, seed: u64) -> Result<Finish, Box<dyn Error>> {
    // Same seed, same starting board for every strategy.
    let mut session = Session::create(config.clone(), RandomSource::with_seed(seed))?;
    let mut rng = SmallRng::seed_from_u64(seed);

    loop {
        let state = session.state();
        match state.phase() {
            Phase::Won => return Ok(Finish::Won(state.score())),
            Phase::Lost => return Ok(Finish::Lost(state.score())),
            _ => {}
        }

        let choice = match strategy.choose(session.grid(), config.adjacent_only, &mut rng) {
            Some(choice) => choice,
            None => return Ok(Finish::Stuck(state.score())),
        };

        let outcome = session.request_swap(choice.a, choice.b);
        if let Some(reason) = outcome.rejection {
            warn!(%strategy, seed, a = choice.a, b = choice.b, %reason, "strategy picked a refused swap");
            return Ok(Finish::Stuck(state.score()));
        }
        debug!(%strategy, seed, delta = outcome.score_delta, steps = outcome.steps.len(), "swap resolved");
        session.drain_events();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config = SessionConfig::load_or_default(&args.config)?;
    let strategies = if args.strategies.is_empty() {
        Strategy::ALL.to_vec()
    } else {
        args.strategies.clone()
    };

    println!(
        "Evaluating {} strategies over {} sessions ({}x{}, {} types, {} moves, target {})...",
        strategies.len(),
        args.games,
        config.size,
        config.size,
        config.num_types,
        config.max_moves,
        config.target_score
    );

    let mut results: Vec<(Strategy, Tally)> = Vec::new();
    for &strategy in &strategies {
        let mut tally = Tally::default();
        for i in 0..args.games {
            let seed = args.start_seed + i;
            let score = match play_one(&config, strategy, seed)? {
                Finish::Won(score) => {
                    tally.wins += 1;
                    score
                }
                Finish::Lost(score) => {
                    tally.losses += 1;
                    score
                }
                Finish::Stuck(score) => {
                    tally.stuck += 1;
                    score
                }
            };
            tally.total_score += u64::from(score);
        }
        results.push((strategy, tally));
    }

    println!("\n--- Results ---");
    results.sort_by(|a, b| b.1.total_score.cmp(&a.1.total_score));
    let games = args.games.max(1) as f64;
    for (strategy, tally) in &results {
        println!(
            "Strategy {:<10}: win rate {:>5.1}%, average score {:>8.1} (won {}, lost {}, stuck {})",
            strategy.to_string(),
            100.0 * f64::from(tally.wins) / games,
            tally.total_score as f64 / games,
            tally.wins,
            tally.losses,
            tally.stuck
        );
    }

    Ok(())
}
