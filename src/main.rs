// BoardGame AI - resolve o jogo de números e joga contra si próprio ou contra um humano

use anyhow::{bail, Context, Result};
use boardgame_ai::games::{RepeatGame, RepeatGameExt, SmallRepeatGame, NUM_POSSIBLE_MOVES};
use boardgame_ai::search::*;
use boardgame_ai::*;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Play the small instance (numbers up to 100) instead of the full game
    #[arg(long)]
    small: bool,

    /// Maximum search depth in plies
    #[arg(long, default_value_t = 20)]
    depth: Depth,

    /// Transposition table size in MB
    #[arg(long, default_value_t = 256)]
    tt_mb: usize,

    /// Search without a transposition table
    #[arg(long)]
    no_tt: bool,

    /// Single search at the maximum depth instead of iterative deepening
    #[arg(long)]
    no_iterative: bool,

    /// Enable the counter-move ordering heuristic
    #[arg(long)]
    counter_moves: bool,

    /// Worker threads splitting the root moves (0 = one per CPU)
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Time budget per search in milliseconds
    #[arg(long)]
    time_ms: Option<u64>,

    /// After solving, let the AI play a whole game against itself
    #[arg(long)]
    self_play: bool,

    /// After solving, play against the AI as player 1 or 2
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    play_as: Option<u8>,
}

fn init_logger(debug: bool) {
    let log_level = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    );
    builder
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .target(env_logger::Target::Stderr)
        .init();
}

fn boxed<G, const ID: bool, const TT: bool, const CM: bool>(
    builder: EngineBuilder<G, ID, TT, CM>,
    threads: usize,
) -> Result<Box<dyn Search<G>>, ConfigError>
where
    G: Game + Send + 'static,
{
    if threads > 1 {
        Ok(Box::new(ParallelSearcher::new(threads, || builder.build())?))
    } else {
        Ok(Box::new(builder.build()?))
    }
}

/// Escolhe a combinação de opções (resolvida em tempo de compilação) pedida na linha de comandos
fn build_searcher<G: Game + Send + 'static>(args: &Args) -> Result<Box<dyn Search<G>>, ConfigError> {
    let threads = if args.threads == 0 { default_threads() } else { args.threads };
    let base = EngineBuilder::<G>::new();
    let tt_mb = args.tt_mb;
    match (!args.no_iterative, !args.no_tt, args.counter_moves) {
        (true, true, true) => boxed(base.iterative_deepening().transposition_table(tt_mb).counter_moves(), threads),
        (true, true, false) => boxed(base.iterative_deepening().transposition_table(tt_mb), threads),
        (true, false, true) => boxed(base.iterative_deepening().counter_moves(), threads),
        (true, false, false) => boxed(base.iterative_deepening(), threads),
        (false, true, true) => boxed(base.transposition_table(tt_mb).counter_moves(), threads),
        (false, true, false) => boxed(base.transposition_table(tt_mb), threads),
        (false, false, true) => boxed(base.counter_moves(), threads),
        (false, false, false) => boxed(base, threads),
    }
}

fn prompt(text: &str) -> io::Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn run<const MAX_VAL: u32, const TRACK_P1: bool, const EVAL_SHIFT: u32>(
    mut game: RepeatGameExt<MAX_VAL, TRACK_P1, EVAL_SHIFT>,
    args: &Args,
) -> Result<()> {
    let mut limits = SearchLimits::depth(args.depth);
    if let Some(ms) = args.time_ms {
        limits = limits.with_time_limit(Duration::from_millis(ms));
    }
    limits.validate()?;

    let mut searcher = build_searcher::<RepeatGameExt<MAX_VAL, TRACK_P1, EVAL_SHIFT>>(args)
        .context("building the search engine")?;
    let tracked = RepeatGameExt::<MAX_VAL, TRACK_P1, EVAL_SHIFT>::tracked_player();

    log::info!("solving numbers up to {} at depth {}", MAX_VAL, args.depth);
    let result = searcher.search_with(&mut game, &limits);
    let stats = searcher.stats();
    log::info!(
        "{} nodes in {}ms, tt hit rate {:.3}",
        stats.nodes_searched,
        stats.time_elapsed.as_millis(),
        stats.tt_hit_rate()
    );

    println!("{}", result);
    let interpretation = RepeatGameExt::<MAX_VAL, TRACK_P1, EVAL_SHIFT>::interpret_eval(result.value);
    println!(
        "P1 advantage: {}, {} max value bound: {}",
        interpretation.advantage, tracked, interpretation.tracked_number_bound
    );
    let enough_depth = result.termination == Termination::Resolved;
    println!("Used enough depth: {}", enough_depth);
    if result.termination == Termination::TimeLimit {
        println!("Stopped by the time limit after depth {}", result.depth);
    }
    println!("{} == loser: {}", tracked, TRACK_P1 != interpretation.advantage);
    let next_bound = RepeatGameExt::<MAX_VAL, TRACK_P1, EVAL_SHIFT>::largest_next(
        interpretation.tracked_number_bound,
    );
    println!("Compare {} <= {}: {}", next_bound, MAX_VAL, next_bound <= MAX_VAL);

    let human = match (args.self_play, args.play_as) {
        (true, _) => None,
        (false, Some(1)) => Some(Player::First),
        (false, Some(_)) => Some(Player::Second),
        (false, None) => return Ok(()),
    };

    println!();
    println!("Now starting interactive session");
    game.set_favor_wins_in_eval(true);
    // A avaliação mudou: resultados guardados já não valem
    searcher.clear();

    print!("{}", game.curr_number());
    while !game.is_game_over() {
        if Some(game.current_player()) == human {
            println!();
            let moves = game.legal_moves();
            let listed: Vec<String> = moves.iter().map(|mv| mv.to_string()).collect();
            println!("Your possible moves: {}", listed.join(" "));
            loop {
                let Some(line) = prompt("You play: ")? else {
                    bail!("input closed before the game ended");
                };
                let mv = match line.parse::<Move>() {
                    Ok(mv) => mv,
                    Err(_) => {
                        println!("{}", GameError::Parse(line.trim().to_string()));
                        continue;
                    }
                };
                match game.try_make_move(mv) {
                    Ok(()) => break,
                    Err(GameError::IllegalMove { reason, .. }) => println!("{}", reason),
                    Err(err) => println!("{}", err),
                }
            }
        } else {
            let result = searcher.search_with(&mut game, &limits);
            log::debug!("AI plays {} ({})", result.best_move, result);
            if result.best_move == RepeatGameExt::<MAX_VAL, TRACK_P1, EVAL_SHIFT>::NO_MOVE {
                bail!("search returned no move in a running game");
            }
            game.make_move(result.best_move);
        }
        print!(" {}", game.curr_number());
        io::stdout().flush()?;
    }
    println!();

    let loser = game.current_player();
    match human {
        Some(player) => {
            println!("{}", if player == loser { "YOU LOSE" } else { "YOU WIN" });
            println!("Explanation:");
            for id in 1..=NUM_POSSIBLE_MOVES {
                println!("{}", game.explain_illegal_move(Move(id)));
            }
        }
        None => println!("Winner: {}", !loser),
    }
    println!("Max observed {} number: {}", tracked, game.max_tracked_number());
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logger(args.debug);

    let outcome = if args.small {
        run(SmallRepeatGame::new(), &args)
    } else {
        run(RepeatGame::new(), &args)
    };

    if let Err(err) = outcome {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}
