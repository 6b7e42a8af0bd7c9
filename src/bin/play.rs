use clap::Parser;
use match3_engine::config::SessionConfig;
use match3_engine::hints;
use match3_engine::session::{Event, Session};
use match3_engine::source::RandomSource;
use match3_engine::state::Phase;
use match3_engine::utils::grid_from_text;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play a match-3 session on the command line", long_about = None)]
struct Args {
    /// TOML file with session parameters; defaults are used if it is missing
    #[clap(short, long, default_value = "match3.toml")]
    config: PathBuf,

    /// Seed for board generation and refills (random if omitted)
    #[clap(short, long)]
    seed: Option<u64>,

    /// Start from a board file (one row of digits per line) instead of a random board
    #[clap(short, long)]
    board: Option<PathBuf>,

    /// Override the move budget
    #[clap(long)]
    moves: Option<u32>,

    /// Override the target score
    #[clap(long)]
    target: Option<u32>,

    /// Only allow swapping orthogonal neighbours
    #[clap(long)]
    adjacent_only: bool,
}

fn build_session(args: &Args) -> Result<Session<RandomSource>, Box<dyn Error>> {
    let mut config = SessionConfig::load_or_default(&args.config)?;
    if let Some(moves) = args.moves {
        config.max_moves = moves;
    }
    if let Some(target) = args.target {
        config.target_score = target;
    }
    if args.adjacent_only {
        config.adjacent_only = true;
    }

    let source = match args.seed {
        Some(seed) => RandomSource::with_seed(seed),
        None => RandomSource::from_entropy(),
    };

    let session = match &args.board {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
            let grid = grid_from_text(&content)?;
            config.size = grid.size();
            Session::with_grid(config, grid, source)?
        }
        None => Session::create(config, source)?,
    };
    Ok(session)
}

fn print_status(session: &Session<RandomSource>) {
    let state = session.state();
    println!("---------------------");
    println!(
        "Moves left: {}, Score: {} / {}",
        state.moves_remaining(),
        state.score(),
        session.config().target_score
    );
    println!("{}", session.grid());
}

fn print_events(events: Vec<Event>) {
    for event in events {
        match event {
            Event::Matched { matches } => {
                for m in matches {
                    println!("  Matched {} x{} ({:?}) for {}", m.symbol, m.len(), m.axis, m.score());
                }
            }
            Event::CascadeStep(step) => {
                println!(
                    "  Cleared {} cells, +{} (combo {})",
                    step.cleared.len(),
                    step.score_delta,
                    step.combo
                );
            }
            Event::Won { score } => println!("🎉 Target reached with {} points!", score),
            Event::Lost { score } => println!("Out of moves. Final score: {}", score),
        }
    }
}

/// Parses "r1 c1 r2 c2" into two cell indices.
fn parse_swap(input: &str, size: usize) -> Result<(usize, usize), String> {
    let nums = input
        .split_whitespace()
        .map(|p| p.parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| "Please enter numbers, e.g. '0 1 0 2'.".to_string())?;
    if nums.len() != 4 {
        return Err("Use 'r1 c1 r2 c2', 'h', 'r' or 'q'.".into());
    }
    if nums.iter().any(|&n| n >= size) {
        return Err(format!("Rows and columns must be between 0 and {}.", size - 1));
    }
    Ok((nums[0] * size + nums[1], nums[2] * size + nums[3]))
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut session = build_session(&args)?;
    println!("Welcome to Match-3!");

    loop {
        print_status(&session);

        if session.state().phase().is_terminal() {
            let verdict = if session.state().phase() == Phase::Won { "YOU WIN" } else { "GAME OVER" };
            println!("{}! Final score: {}", verdict, session.state().score());
            print!("Enter 'r' to restart or 'q' to quit: ");
        } else {
            if !session.has_valid_swap() {
                println!("No swap on this board makes a match. Enter 'r' to restart.");
            }
            print!("Enter your swap (r1 c1 r2 c2), 'h' for a hint, 'r' to restart, 'q' to quit: ");
        }
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        match input {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "r" => {
                session.restart();
                println!("New board.");
                continue;
            }
            "h" => {
                let config = session.config();
                match hints::choose_swap_max_score(session.grid(), config.adjacent_only) {
                    Some(hint) => {
                        let a = session.grid().to_coord(hint.a);
                        let b = session.grid().to_coord(hint.b);
                        println!(
                            "Try {} {} {} {} (worth {} before chains)",
                            a.row, a.col, b.row, b.col, hint.immediate_score
                        );
                    }
                    None => println!("No hint available."),
                }
                continue;
            }
            _ => {}
        }

        if session.state().phase().is_terminal() {
            continue;
        }

        let (a, b) = match parse_swap(input, session.grid().size()) {
            Ok(pair) => pair,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };

        let outcome = session.request_swap(a, b);
        match outcome.rejection {
            Some(reason) => println!("Swap refused: {}", reason),
            None => {
                println!("Swap accepted: +{}", outcome.score_delta);
                print_events(session.drain_events());
                if !outcome.settled {
                    println!("The cascade was cut short; some matches are still on the board.");
                }
            }
        }
    }

    Ok(())
}
