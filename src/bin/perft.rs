// Perft do jogo de números: valida os geradores e mede a velocidade do seletor de lances

use anyhow::Result;
use boardgame_ai::engine::{perft, perft_cached, perft_divide, perft_parallel, PerftCache};
use boardgame_ai::games::{RepeatGame, SmallRepeatGame};
use boardgame_ai::{Depth, Eager, Game};
use clap::Parser;
use std::io::Write;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Leaf counts of the number game tree", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Deepest level to count
    #[arg(long, default_value_t = 12)]
    depth: Depth,

    /// Use the small instance (numbers up to 100)
    #[arg(long)]
    small: bool,

    /// Print the per-move split of the deepest level
    #[arg(long)]
    divide: bool,
}

fn report<G: Game + Sync>(game: &mut G, args: &Args) {
    let mut cache = PerftCache::new();
    for depth in 1..=args.depth {
        let start = Instant::now();
        let nodes = perft(game, depth);
        let elapsed = start.elapsed();
        let cached = perft_cached(game, depth, &mut cache);
        let parallel = perft_parallel(game, depth);
        let nps = if elapsed.as_secs_f64() > 0.0 {
            (nodes as f64 / elapsed.as_secs_f64()) as u64
        } else {
            0
        };
        println!("perft({:2}) = {:>12}  {:>8.2}ms  {:>12} nps", depth, nodes, elapsed.as_secs_f64() * 1000.0, nps);
        if cached != nodes || parallel != nodes {
            log::error!("depth {}: cached {} parallel {} disagree with {}", depth, cached, parallel, nodes);
        }
    }
    log::info!("perft cache hit rate {:.3}", cache.hit_rate());

    if args.divide {
        for (mv, nodes) in perft_divide(game, args.depth) {
            println!("{}: {}", mv, nodes);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    )
    .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
    .init();

    if args.small {
        println!("lazy ordering");
        report(&mut SmallRepeatGame::new(), &args);
        println!("static ordering");
        report(&mut Eager(SmallRepeatGame::new()), &args);
    } else {
        println!("lazy ordering");
        report(&mut RepeatGame::new(), &args);
        println!("static ordering");
        report(&mut Eager(RepeatGame::new()), &args);
    }
    Ok(())
}
