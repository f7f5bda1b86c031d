// Busca paralela na raiz: cada thread tem o seu jogo e o seu motor

use super::alpha_beta::{Search, SearchResult, SearchStats, Termination};
use super::config::SearchLimits;
use super::move_picker::MovePicker;
use crate::core::*;
use crate::error::ConfigError;
use crossbeam::channel;
use std::time::Instant;

/// Número de threads por omissão: uma por CPU lógico
pub fn default_threads() -> usize {
    num_cpus::get().max(1)
}

/// Busca com divisão na raiz. Os lances da raiz passam por uma fila
/// partilhada; cada thread joga o lance na sua cópia do jogo e procura a
/// resposta com o seu próprio motor, sem tabelas partilhadas.
///
/// O orçamento de tempo é um prazo único para a busca toda: cada filho
/// recebe só o tempo que resta e, esgotado o prazo, os lances ainda na fila
/// ficam por procurar.
pub struct ParallelSearcher<E> {
    engines: Vec<E>,
    stats: SearchStats,
}

impl<E> ParallelSearcher<E> {
    /// Um motor por thread, criado por `factory`
    pub fn new<F>(threads: usize, mut factory: F) -> Result<Self, ConfigError>
    where
        F: FnMut() -> Result<E, ConfigError>,
    {
        if threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        let engines = (0..threads).map(|_| factory()).collect::<Result<Vec<_>, _>>()?;
        log::debug!("parallel searcher with {} workers", threads);
        Ok(ParallelSearcher {
            engines,
            stats: SearchStats::default(),
        })
    }

    pub fn threads(&self) -> usize {
        self.engines.len()
    }
}

/// Lances da raiz pela ordem de um seletor novo
fn root_moves<G: Game>(game: &G) -> Vec<Move> {
    let mut picker = MovePicker::<G>::new(G::NO_MOVE);
    std::iter::from_fn(|| {
        let mv = picker.next_move(game, None);
        (mv != G::NO_MOVE).then_some(mv)
    })
    .collect()
}

impl<G, E> Search<G> for ParallelSearcher<E>
where
    G: Game + Send,
    E: Search<G> + Send,
{
    fn search_with(&mut self, game: &mut G, limits: &SearchLimits) -> SearchResult {
        let start = Instant::now();
        self.stats = SearchStats::default();

        let mut evaluation = SearchResult {
            value: game.evaluate(),
            best_move: G::NO_MOVE,
            depth: 0,
            termination: Termination::DepthLimit,
        };
        if game.is_game_over() {
            evaluation.termination = Termination::Resolved;
            return evaluation;
        }
        if limits.max_depth == 0 {
            return evaluation;
        }
        let moves = root_moves(game);
        if moves.is_empty() {
            return evaluation;
        }

        let (work_tx, work_rx) = channel::unbounded::<(usize, Move)>();
        for entry in moves.iter().copied().enumerate() {
            // O recetor vive até ao fim do scope
            let _ = work_tx.send(entry);
        }
        drop(work_tx);

        let child_depth = limits.max_depth - 1;
        let deadline = limits.time_limit.map(|limit| start + limit);

        let root: &G = game;
        let scoped = crossbeam::scope(|s| {
            let handles: Vec<_> = self
                .engines
                .iter_mut()
                .map(|engine| {
                    let work_rx = work_rx.clone();
                    let mut local = root.clone();
                    s.spawn(move |_| {
                        let mut results = Vec::new();
                        let mut stats = SearchStats::default();
                        while let Ok((index, mv)) = work_rx.recv() {
                            let time_limit = match deadline {
                                Some(deadline) => {
                                    let remaining = deadline.saturating_duration_since(Instant::now());
                                    if remaining.is_zero() {
                                        break;
                                    }
                                    Some(remaining)
                                }
                                None => None,
                            };
                            let child_limits = SearchLimits {
                                max_depth: child_depth,
                                time_limit,
                            };
                            local.make_move(mv);
                            let child = engine.search_with(&mut local, &child_limits);
                            local.undo_move();
                            log::trace!("root move {} value {}", mv, -child.value);
                            results.push((index, mv, child));

                            let child_stats = engine.stats();
                            stats.nodes_searched += child_stats.nodes_searched;
                            stats.tt_hits += child_stats.tt_hits;
                            stats.tt_probes += child_stats.tt_probes;
                            stats.beta_cutoffs += child_stats.beta_cutoffs;
                        }
                        (results, stats)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        });

        let joined = match scoped {
            Ok(joined) => joined,
            Err(panic) => std::panic::resume_unwind(panic),
        };

        let mut results = Vec::with_capacity(moves.len());
        for worker in joined {
            match worker {
                Ok((worker_results, stats)) => {
                    results.extend(worker_results);
                    self.stats.nodes_searched += stats.nodes_searched;
                    self.stats.tt_hits += stats.tt_hits;
                    self.stats.tt_probes += stats.tt_probes;
                    self.stats.beta_cutoffs += stats.beta_cutoffs;
                }
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }

        // Lances que ficaram na fila ou cujo filho não terminou nenhuma
        // iteração não entram no máximo
        let searched = results.len();
        results.retain(|(_, _, child)| child.has_completed_iteration());
        let timed_out = searched < moves.len()
            || results.len() < searched
            || results
                .iter()
                .any(|(_, _, child)| child.termination == Termination::TimeLimit);

        // Empates ficam com o primeiro lance na ordem da raiz
        results.sort_by_key(|&(index, _, _)| index);
        let resolved = results
            .iter()
            .all(|(_, _, child)| child.termination == Termination::Resolved);
        let mut best = evaluation;
        let mut best_value = -VALUE_INFINITE;
        let mut depth = 0;
        for (_, mv, child) in results {
            let value = -child.value;
            depth = depth.max(child.depth.saturating_add(1));
            if best.best_move == G::NO_MOVE || value > best_value {
                best_value = value;
                best.best_move = mv;
                best.value = value;
            }
        }
        best.depth = depth.min(limits.max_depth);
        best.termination = if timed_out {
            Termination::TimeLimit
        } else if resolved {
            Termination::Resolved
        } else {
            Termination::DepthLimit
        };
        if best.best_move == G::NO_MOVE {
            // Nenhum filho terminou: qualquer lance legal serve
            best.best_move = moves[0];
            best.depth = 0;
        }

        self.stats.nodes_searched += 1;
        self.stats.time_elapsed = start.elapsed();
        log::debug!(
            "parallel search: {} root moves, {} workers, value {} best {} nodes {} time {}ms",
            moves.len(),
            self.threads(),
            best.value,
            best.best_move,
            self.stats.nodes_searched,
            self.stats.time_elapsed.as_millis()
        );
        best
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }

    fn clear(&mut self) {
        for engine in &mut self.engines {
            engine.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{RepeatGame, SmallRepeatGame};
    use crate::search::EngineBuilder;
    use std::time::Duration;

    #[test]
    fn test_zero_threads_rejected() {
        let result = ParallelSearcher::new(0, || EngineBuilder::<SmallRepeatGame>::new().build());
        assert_eq!(result.err(), Some(ConfigError::ZeroThreads));
    }

    #[test]
    fn test_matches_sequential_search() {
        let mut game = SmallRepeatGame::new();
        game.make_move(Move(3));

        for depth in [1, 3, 6, 30] {
            let mut sequential = EngineBuilder::<SmallRepeatGame>::new().build().unwrap();
            let expected = sequential.search(&mut game, depth);

            let mut parallel = ParallelSearcher::new(3, || {
                EngineBuilder::<SmallRepeatGame>::new()
                    .iterative_deepening()
                    .transposition_table(1)
                    .build()
            })
            .unwrap();
            let result = Search::search(&mut parallel, &mut game, depth);
            assert_eq!(result.value, expected.value, "depth {depth}");
            assert!(game.legal_moves().contains(&result.best_move));
            assert!(Search::<SmallRepeatGame>::stats(&parallel).nodes_searched > 0);
        }
        assert_eq!(game.curr_number(), 7);
    }

    #[test]
    fn test_game_over_root() {
        let mut game = SmallRepeatGame::new();
        while !game.is_game_over() {
            let mv = game.legal_moves()[0];
            game.make_move(mv);
        }
        let mut parallel =
            ParallelSearcher::new(2, || EngineBuilder::<SmallRepeatGame>::new().build()).unwrap();
        let result = Search::search(&mut parallel, &mut game, 5);
        assert_eq!(result.best_move, SmallRepeatGame::NO_MOVE);
        assert_eq!(result.value, game.evaluate());
        assert_eq!(result.termination, Termination::Resolved);
    }

    #[test]
    fn test_deadline_is_shared_by_all_root_moves() {
        let mut game = RepeatGame::new();
        game.make_move(Move(3));
        let mut parallel = ParallelSearcher::new(1, || {
            EngineBuilder::<RepeatGame>::new()
                .iterative_deepening()
                .transposition_table(1)
                .build()
        })
        .unwrap();
        assert_eq!(parallel.threads(), 1);

        let budget = Duration::from_millis(100);
        let limits = SearchLimits::depth(60).with_time_limit(budget);
        let start = Instant::now();
        let result = Search::search_with(&mut parallel, &mut game, &limits);
        let elapsed = start.elapsed();

        // Três lances na raiz e uma só thread: o prazo não se multiplica
        assert!(elapsed < budget * 2, "took {elapsed:?}");
        assert_eq!(result.termination, Termination::TimeLimit);
        assert!(game.legal_moves().contains(&result.best_move));
        assert_eq!(game.curr_number(), 7);
    }

    #[test]
    fn test_zero_budget_falls_back_to_first_root_move() {
        let mut game = SmallRepeatGame::new();
        game.make_move(Move(3));
        let mut parallel = ParallelSearcher::new(2, || {
            EngineBuilder::<SmallRepeatGame>::new()
                .iterative_deepening()
                .build()
        })
        .unwrap();
        let limits = SearchLimits::depth(30).with_time_limit(Duration::ZERO);
        let result = Search::search_with(&mut parallel, &mut game, &limits);
        assert_eq!(result.termination, Termination::TimeLimit);
        assert_eq!(result.depth, 0);
        assert_eq!(result.best_move, root_moves(&game)[0]);
        assert_eq!(result.value, game.evaluate());
    }
}
