use super::config::SearchLimits;
use super::counter_move::CounterMoveTable;
use super::move_picker::MovePicker;
use super::transposition_table::{Bound, TranspositionTable};
use crate::core::*;
use std::marker::PhantomData;
use std::time::{Duration, Instant};

/// Nós entre duas leituras do relógio
const TIME_CHECK_INTERVAL: u64 = 1024;

/// Porque é que a busca parou
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Chegou à profundidade máxima pedida
    DepthLimit,
    /// A árvore foi explorada até às posições terminais
    Resolved,
    /// O orçamento de tempo acabou antes da profundidade máxima
    TimeLimit,
}

/// Resultado de uma busca
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub value: Value,
    pub best_move: Move,
    /// Profundidade da última iteração completa
    pub depth: Depth,
    pub termination: Termination,
}

impl SearchResult {
    /// Falso quando o tempo acabou antes de qualquer iteração terminar:
    /// o valor é então só uma estimativa.
    pub fn has_completed_iteration(&self) -> bool {
        self.termination != Termination::TimeLimit || self.depth > 0
    }
}

impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Value: {}, Best Move: {}, Depth: {}",
            self.value, self.best_move, self.depth
        )
    }
}

/// Contadores da última busca
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub nodes_searched: u64,
    pub tt_hits: u64,
    pub tt_probes: u64,
    pub beta_cutoffs: u64,
    pub time_elapsed: Duration,
}

impl SearchStats {
    pub fn tt_hit_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_hits as f64 / self.tt_probes as f64
        }
    }
}

/// Tudo o que escolhe um lance para `G`: cada configuração do motor e a
/// busca paralela na raiz.
pub trait Search<G: Game> {
    fn search_with(&mut self, game: &mut G, limits: &SearchLimits) -> SearchResult;

    fn search(&mut self, game: &mut G, max_depth: Depth) -> SearchResult {
        self.search_with(game, &SearchLimits::depth(max_depth))
    }

    fn stats(&self) -> SearchStats;

    /// Esquece resultados em cache e heurísticas (novo jogo)
    fn clear(&mut self);
}

/// Motor negamax com poda alfa-beta.
///
/// `ID`, `TT` e `CM` ligam o aprofundamento iterativo, a tabela de
/// transposição e a heurística de contra-lance. Construído com
/// [`EngineBuilder`](super::EngineBuilder).
pub struct Engine<G: Game, const ID: bool, const TT: bool, const CM: bool> {
    tt: Option<TranspositionTable>,
    counter_moves: Option<CounterMoveTable>,
    stats: SearchStats,
    start_time: Instant,
    time_limit: Option<Duration>,
    aborted: bool,
    // Folhas cortadas pelo horizonte; sem mudança numa subárvore quer dizer
    // que ela foi explorada até ao fim
    horizon_leaves: u64,
    _game: PhantomData<fn() -> G>,
}

impl<G: Game, const ID: bool, const TT: bool, const CM: bool> Engine<G, ID, TT, CM> {
    pub(crate) fn from_parts(
        tt: Option<TranspositionTable>,
        counter_moves: Option<CounterMoveTable>,
    ) -> Self {
        Engine {
            tt,
            counter_moves,
            stats: SearchStats::default(),
            start_time: Instant::now(),
            time_limit: None,
            aborted: false,
            horizon_leaves: 0,
            _game: PhantomData,
        }
    }

    pub fn transposition_table(&self) -> Option<&TranspositionTable> {
        self.tt.as_ref()
    }

    pub fn counter_move_table(&self) -> Option<&CounterMoveTable> {
        self.counter_moves.as_ref()
    }

    /// Busca principal - interface pública
    pub fn search(&mut self, game: &mut G, max_depth: Depth) -> SearchResult {
        self.search_with(game, &SearchLimits::depth(max_depth))
    }

    pub fn search_with(&mut self, game: &mut G, limits: &SearchLimits) -> SearchResult {
        self.reset_search(limits);

        let mut result = SearchResult {
            value: game.evaluate(),
            best_move: G::NO_MOVE,
            depth: 0,
            termination: Termination::DepthLimit,
        };
        if game.is_game_over() {
            result.termination = Termination::Resolved;
            return result;
        }
        if limits.max_depth == 0 {
            return result;
        }
        debug_assert!(game.max_possible_evaluation() < VALUE_INFINITE);

        let first_depth = if ID { 1 } else { limits.max_depth };
        let mut previous_best = G::NO_MOVE;

        for depth in first_depth..=limits.max_depth {
            if self.out_of_time() {
                log::debug!("time limit reached before depth {}", depth);
                result.termination = Termination::TimeLimit;
                break;
            }

            let horizon_before = self.horizon_leaves;
            let (value, best_move) = self.alpha_beta_root(game, depth, previous_best);

            if self.aborted {
                // Iteração incompleta: fica com a anterior, ou com o melhor
                // lance parcial se nenhuma terminou
                if result.best_move == G::NO_MOVE && best_move != G::NO_MOVE {
                    result.best_move = best_move;
                    result.value = value;
                }
                log::debug!("search stopped by time limit during depth {}", depth);
                result.termination = Termination::TimeLimit;
                break;
            }

            result = SearchResult {
                value,
                best_move,
                depth,
                termination: Termination::DepthLimit,
            };
            previous_best = best_move;

            self.stats.time_elapsed = self.start_time.elapsed();
            log::debug!(
                "depth {} value {} best {} nodes {} cutoffs {} tt hit rate {:.3} tt usage {}‰ time {}ms",
                depth,
                value,
                best_move,
                self.stats.nodes_searched,
                self.stats.beta_cutoffs,
                self.stats.tt_hit_rate(),
                self.tt.as_ref().map_or(0, |tt| tt.usage()),
                self.stats.time_elapsed.as_millis()
            );

            if self.horizon_leaves == horizon_before {
                log::debug!("game tree resolved at depth {}", depth);
                result.termination = Termination::Resolved;
                break;
            }
        }

        if result.best_move == G::NO_MOVE {
            // Sem iteração útil: qualquer lance legal serve
            result.best_move = MovePicker::<G>::new(G::NO_MOVE).next_move(game, None);
        }

        self.stats.time_elapsed = self.start_time.elapsed();
        result
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn clear(&mut self) {
        if let Some(tt) = self.tt.as_mut() {
            tt.clear();
        }
        if let Some(counter_moves) = self.counter_moves.as_mut() {
            counter_moves.clear();
        }
    }

    fn reset_search(&mut self, limits: &SearchLimits) {
        self.stats = SearchStats::default();
        self.start_time = Instant::now();
        self.time_limit = limits.time_limit;
        self.aborted = false;
        self.horizon_leaves = 0;
        if let Some(tt) = self.tt.as_mut() {
            tt.new_search();
        }
    }

    fn out_of_time(&self) -> bool {
        self.time_limit
            .is_some_and(|limit| self.start_time.elapsed() >= limit)
    }

    /// Verifica se deve parar a busca
    #[inline]
    fn should_stop(&mut self) -> bool {
        if !self.aborted
            && self.stats.nodes_searched % TIME_CHECK_INTERVAL == 0
            && self.out_of_time()
        {
            self.aborted = true;
        }
        self.aborted
    }

    #[inline]
    fn counter_table(&self) -> Option<&CounterMoveTable> {
        if CM {
            self.counter_moves.as_ref()
        } else {
            None
        }
    }

    #[inline]
    fn probe_tt(&mut self, hash: u64) -> Option<super::transposition_table::TTEntry> {
        if !TT {
            return None;
        }
        let tt = self.tt.as_mut()?;
        self.stats.tt_probes += 1;
        let entry = tt.probe(hash);
        if entry.is_some() {
            self.stats.tt_hits += 1;
        }
        entry
    }

    /// Raiz: como `alpha_beta`, mas devolve também o melhor lance. Sem TT
    /// tenta primeiro o melhor lance da iteração anterior.
    fn alpha_beta_root(&mut self, game: &mut G, depth: Depth, previous_best: Move) -> (Value, Move) {
        self.stats.nodes_searched += 1;
        let hash = game.position_hash();
        let horizon_before = self.horizon_leaves;

        let tt_move = match self.probe_tt(hash) {
            Some(entry) => entry.best_move,
            None => previous_best,
        };

        let mut alpha = -VALUE_INFINITE;
        let beta = VALUE_INFINITE;
        let mut best_value = -VALUE_INFINITE;
        let mut best_move = G::NO_MOVE;
        let ceiling = game.max_possible_evaluation();

        let mut picker = MovePicker::<G>::new(tt_move);
        loop {
            let mv = picker.next_move(game, self.counter_table());
            if mv == G::NO_MOVE {
                break;
            }

            game.make_move(mv);
            let value = -self.alpha_beta(game, depth - 1, -beta, -alpha);
            game.undo_move();

            if self.aborted {
                return (best_value, best_move);
            }

            log::trace!("root move {} value {} at depth {}", mv, value, depth);

            if value > best_value {
                best_value = value;
                best_move = mv;
                if value > alpha {
                    alpha = value;
                }
            }
            // Nenhum lance pode valer mais do que isto
            if best_value >= ceiling {
                break;
            }
        }

        if best_move == G::NO_MOVE {
            return (game.evaluate(), G::NO_MOVE);
        }

        if let Some(tt) = self.tt.as_mut() {
            let complete = self.horizon_leaves == horizon_before;
            tt.store(hash, depth, best_value, Bound::Exact, best_move, complete);
        }
        (best_value, best_move)
    }

    /// Negamax com poda alfa-beta, valor do ponto de vista de quem joga
    fn alpha_beta(&mut self, game: &mut G, depth: Depth, mut alpha: Value, beta: Value) -> Value {
        self.stats.nodes_searched += 1;
        if self.should_stop() {
            return 0;
        }

        if game.is_game_over() {
            return game.evaluate();
        }
        if depth == 0 {
            self.horizon_leaves += 1;
            return game.evaluate();
        }

        let hash = game.position_hash();
        let horizon_before = self.horizon_leaves;
        let original_alpha = alpha;

        // ========== TT PROBE ==========
        let mut tt_move = G::NO_MOVE;
        if let Some(entry) = self.probe_tt(hash) {
            if let Some(value) = entry.cutoff_value(depth, alpha, beta) {
                if !entry.complete {
                    self.horizon_leaves += 1;
                }
                return value;
            }
            tt_move = entry.best_move;
        }

        let mut best_value = -VALUE_INFINITE;
        let mut best_move = G::NO_MOVE;

        let mut picker = MovePicker::<G>::new(tt_move);
        loop {
            let mv = picker.next_move(game, self.counter_table());
            if mv == G::NO_MOVE {
                break;
            }

            game.make_move(mv);
            let value = -self.alpha_beta(game, depth - 1, -beta, -alpha);
            game.undo_move();

            if self.aborted {
                return 0;
            }

            if value > best_value {
                best_value = value;
                best_move = mv;
                if value > alpha {
                    alpha = value;
                    if alpha >= beta {
                        self.stats.beta_cutoffs += 1;
                        if CM {
                            if let Some(table) = self.counter_moves.as_mut() {
                                table.record(game.map_last_move_to_counter_move_state(), mv);
                            }
                        }
                        break;
                    }
                }
            }
        }

        // Sem lances apesar de o jogo não ter terminado
        if best_move == G::NO_MOVE {
            return game.evaluate();
        }

        // ========== TT STORE ==========
        if TT {
            let bound = if best_value <= original_alpha {
                Bound::UpperBound
            } else if best_value >= beta {
                Bound::LowerBound
            } else {
                Bound::Exact
            };
            let complete = self.horizon_leaves == horizon_before;
            if let Some(tt) = self.tt.as_mut() {
                tt.store(hash, depth, best_value, bound, best_move, complete);
            }
        }

        best_value
    }
}

impl<G: Game, const ID: bool, const TT: bool, const CM: bool> Search<G> for Engine<G, ID, TT, CM> {
    fn search_with(&mut self, game: &mut G, limits: &SearchLimits) -> SearchResult {
        Engine::search_with(self, game, limits)
    }

    fn stats(&self) -> SearchStats {
        Engine::stats(self)
    }

    fn clear(&mut self) {
        Engine::clear(self)
    }
}
