// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tournament scheduler
//!
//! Runs a knockout bracket round by round. Every match of a round runs as
//! its own task; the next round starts only after all of them resolve.
//! Match tasks append straight to the tournament log, whose lock orders
//! appends, so each match's events stay in order while matches interleave
//! by arrival.

use crate::error::{EngineError, SchedulerError};
use crate::game::{GameEngine, GameSetup, Seat};
use crate::sink::MatchSink;
use crate::stop::{stop_pair, StopHandle, StopSignal};
use crate::tournament::bracket::build_bracket;
use crate::tournament::draw::{adjudicate, by_seed, first_colors, Coins};
use crate::tournament::standings::compute_standings;
use joust_adapters::{Agent, TracedAgent};
use joust_core::{
    Bracket, Decision, DrawPolicy, GameOverReason, GameResult, GameSession, GameSummary, IdGen,
    MatchRecord, Participant, ResolvedPairing, Round, Slot, StandingEntry, TournamentConfig,
    TournamentEvent,
};
use joust_storage::{Broadcaster, EventLog, LogError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;
use tracing::Instrument;

/// A participant as selected; seeds follow selection order
#[derive(Clone)]
pub struct Entrant {
    pub name: String,
    pub agent: Arc<dyn Agent>,
}

impl Entrant {
    pub fn new(name: impl Into<String>, agent: Arc<dyn Agent>) -> Self {
        Self {
            name: name.into(),
            agent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TournamentOutcome {
    pub tournament_id: String,
    pub winner: Participant,
    pub results: Vec<MatchRecord>,
    pub standings: Vec<StandingEntry>,
}

#[derive(Default)]
struct ControlState {
    halted: bool,
    live: HashMap<String, StopHandle>,
}

/// Stops matches of a running tournament. Cheap to clone.
#[derive(Clone, Default)]
pub struct TournamentControl {
    state: Arc<Mutex<ControlState>>,
}

impl TournamentControl {
    /// Stop one live match; it resolves by seed. Returns false if not live.
    pub fn stop_match(&self, match_id: &str) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match state.live.get(match_id) {
            Some(handle) => {
                tracing::info!(match_id, "stopping match");
                handle.stop();
                true
            }
            None => false,
        }
    }

    /// Stop every live match and halt the tournament after this round
    pub fn stop_all(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.halted = true;
        for handle in state.live.values() {
            handle.stop();
        }
        tracing::info!(live = state.live.len(), "stopping tournament");
    }

    pub fn is_halted(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).halted
    }

    pub fn live_matches(&self) -> Vec<String> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<String> = state.live.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn register(&self, match_id: &str) -> StopSignal {
        let (handle, signal) = stop_pair();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.halted {
            handle.stop();
        }
        state.live.insert(match_id.to_string(), handle);
        signal
    }

    fn release(&self, match_id: &str) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .live
            .remove(match_id);
    }
}

pub struct TournamentScheduler<I: IdGen> {
    engine: GameEngine,
    config: TournamentConfig,
    id_gen: I,
    control: TournamentControl,
}

impl<I: IdGen> TournamentScheduler<I> {
    pub fn new(engine: GameEngine, config: TournamentConfig, id_gen: I) -> Self {
        Self {
            engine,
            config,
            id_gen,
            control: TournamentControl::default(),
        }
    }

    pub fn control(&self) -> TournamentControl {
        self.control.clone()
    }

    /// Open a tournament session on `broadcaster` and run it
    pub async fn run_on(
        &self,
        broadcaster: &Broadcaster,
        entrants: Vec<Entrant>,
    ) -> Result<TournamentOutcome, SchedulerError> {
        let id = self.id_gen.next("tournament");
        let log = broadcaster.open_tournament(&id)?;
        self.run(&id, entrants, log).await
    }

    /// Run a tournament to completion, recording it in `log`.
    ///
    /// The log is closed on completion and failed on abort.
    pub async fn run(
        &self,
        tournament_id: &str,
        entrants: Vec<Entrant>,
        log: EventLog<TournamentEvent>,
    ) -> Result<TournamentOutcome, SchedulerError> {
        let span = tracing::info_span!("tournament", tournament_id);
        self.drive(tournament_id, entrants, log)
            .instrument(span)
            .await
    }

    async fn drive(
        &self,
        tournament_id: &str,
        entrants: Vec<Entrant>,
        log: EventLog<TournamentEvent>,
    ) -> Result<TournamentOutcome, SchedulerError> {
        let participants: Vec<Participant> = entrants
            .iter()
            .enumerate()
            .map(|(i, e)| Participant::new(i as u32 + 1, &e.name))
            .collect();
        let agents: HashMap<u32, Arc<dyn Agent>> = entrants
            .into_iter()
            .zip(&participants)
            .map(|(e, p)| {
                let traced: Arc<dyn Agent> = Arc::new(TracedAgent::new(e.name, e.agent));
                (p.seed, traced)
            })
            .collect();

        let bracket = match build_bracket(&participants) {
            Ok(bracket) => bracket,
            Err(e) => {
                log.fail(e.to_string());
                return Err(e);
            }
        };

        let mut results = Vec::new();
        let played = self
            .play(tournament_id, &participants, &agents, &bracket, &log, &mut results)
            .await;
        let winner = match played {
            Ok(winner) => winner,
            Err(reason) => return Err(self.abort(&log, reason, &participants, &results)),
        };

        let standings = compute_standings(&participants, &results);
        let complete = TournamentEvent::TournamentComplete {
            winner: winner.clone(),
            results: results.clone(),
            standings: standings.clone(),
        };
        if let Err(e) = log.append_terminal(complete) {
            return Err(self.abort(&log, log_failure(e), &participants, &results));
        }
        log.close();
        tracing::info!(winner = %winner, "tournament complete");

        Ok(TournamentOutcome {
            tournament_id: tournament_id.to_string(),
            winner,
            results,
            standings,
        })
    }

    /// Play every round; `Err` carries the abort reason
    async fn play(
        &self,
        tournament_id: &str,
        participants: &[Participant],
        agents: &HashMap<u32, Arc<dyn Agent>>,
        bracket: &Bracket,
        log: &EventLog<TournamentEvent>,
        results: &mut Vec<MatchRecord>,
    ) -> Result<Participant, String> {
        log.append(TournamentEvent::TournamentStart {
            tournament_id: tournament_id.to_string(),
            participants: participants.to_vec(),
            bracket: bracket.clone(),
            draw_policy: self.config.draw_policy,
        })
        .map_err(log_failure)?;
        tracing::info!(
            participants = participants.len(),
            rounds = bracket.total_rounds(),
            policy = %self.config.draw_policy,
            "tournament started"
        );

        let mut coins = Coins::new(self.config.rng_seed);
        let mut winners: HashMap<String, Participant> = HashMap::new();

        for round in &bracket.rounds {
            if self.control.is_halted() {
                return Err("stopped".to_string());
            }
            let pairings = resolve(round, participants, &winners)?;
            log.append(TournamentEvent::RoundStart {
                round: round.number,
                total_rounds: bracket.total_rounds(),
                pairings: pairings.clone(),
            })
            .map_err(log_failure)?;
            tracing::info!(round = round.number, matches = pairings.len(), "round started");

            let mut round_results: Vec<(usize, MatchRecord)> = Vec::new();
            let mut set = JoinSet::new();
            for (index, pairing) in pairings.into_iter().enumerate() {
                let Some(b) = pairing.b else {
                    let record = MatchRecord {
                        match_id: pairing.match_id.clone(),
                        round: round.number,
                        a: pairing.a.clone(),
                        b: None,
                        games: Vec::new(),
                        winner: pairing.a,
                        decision: Decision::Bye,
                    };
                    log.append(TournamentEvent::MatchComplete {
                        match_id: pairing.match_id,
                        round: round.number,
                        record: record.clone(),
                    })
                    .map_err(log_failure)?;
                    round_results.push((index, record));
                    continue;
                };

                let (white, black) =
                    first_colors(self.config.colors, &pairing.a, &b, &mut coins);
                let task = MatchTask {
                    engine: self.engine.clone(),
                    id_gen: self.id_gen.clone(),
                    log: log.clone(),
                    stop: self.control.register(&pairing.match_id),
                    coins: coins.split(),
                    policy: self.config.draw_policy,
                    max_rematches: self.config.max_rematches,
                    round: round.number,
                    agent_a: agent_for(agents, &pairing.a)?,
                    agent_b: agent_for(agents, &b)?,
                    match_id: pairing.match_id,
                    a: pairing.a,
                    b,
                    white,
                    black,
                };
                let span = tracing::info_span!("match", match_id = %task.match_id, round = round.number);
                set.spawn(
                    async move {
                        let match_id = task.match_id.clone();
                        (index, match_id, task.run().await)
                    }
                    .instrument(span),
                );
            }

            let mut failure: Option<String> = None;
            while let Some(joined) = set.join_next().await {
                match joined {
                    Ok((index, match_id, Ok(record))) => {
                        self.control.release(&match_id);
                        round_results.push((index, record));
                    }
                    Ok((_, match_id, Err(e))) => {
                        self.control.release(&match_id);
                        tracing::error!(match_id = %match_id, error = %e, "match failed");
                        failure.get_or_insert_with(|| format!("match {} failed: {}", match_id, e));
                        self.control.stop_all();
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "match task failed");
                        failure.get_or_insert_with(|| format!("match task failed: {}", e));
                        self.control.stop_all();
                    }
                }
            }
            if let Some(reason) = failure {
                return Err(reason);
            }

            round_results.sort_by_key(|(index, _)| *index);
            let records: Vec<MatchRecord> = round_results.into_iter().map(|(_, r)| r).collect();
            for record in &records {
                winners.insert(record.match_id.clone(), record.winner.clone());
            }
            results.extend(records.iter().cloned());
            let standings = compute_standings(participants, results);
            log.append(TournamentEvent::RoundComplete {
                round: round.number,
                results: records,
                standings,
            })
            .map_err(log_failure)?;
            tracing::info!(round = round.number, "round complete");
        }

        if self.control.is_halted() {
            return Err("stopped".to_string());
        }
        bracket
            .rounds
            .last()
            .and_then(|r| r.pairings.first())
            .and_then(|p| winners.get(&p.match_id))
            .cloned()
            .ok_or_else(|| "bracket produced no winner".to_string())
    }

    /// Record the abort in the log's reserved slot, then fail the log
    fn abort(
        &self,
        log: &EventLog<TournamentEvent>,
        reason: String,
        participants: &[Participant],
        results: &[MatchRecord],
    ) -> SchedulerError {
        tracing::error!(reason = %reason, "tournament aborted");
        let standings = compute_standings(participants, results);
        if let Err(e) = log.append_terminal(TournamentEvent::TournamentAborted {
            reason: reason.clone(),
            standings,
        }) {
            tracing::warn!(error = %e, "could not record abort");
        }
        log.fail(reason.clone());
        SchedulerError::Aborted(reason)
    }
}

fn log_failure(e: LogError) -> String {
    format!("event log failure: {}", e)
}

fn agent_for(
    agents: &HashMap<u32, Arc<dyn Agent>>,
    participant: &Participant,
) -> Result<Arc<dyn Agent>, String> {
    agents
        .get(&participant.seed)
        .cloned()
        .ok_or_else(|| format!("no agent for seed {}", participant.seed))
}

/// Replace slot references with participants
fn resolve(
    round: &Round,
    participants: &[Participant],
    winners: &HashMap<String, Participant>,
) -> Result<Vec<ResolvedPairing>, String> {
    let lookup = |slot: &Slot| -> Result<Option<Participant>, String> {
        match slot {
            Slot::Seed(seed) => participants
                .iter()
                .find(|p| p.seed == *seed)
                .cloned()
                .map(Some)
                .ok_or_else(|| format!("unknown seed {}", seed)),
            Slot::WinnerOf(id) => winners
                .get(id)
                .cloned()
                .map(Some)
                .ok_or_else(|| format!("match {} has no winner", id)),
            Slot::Bye => Ok(None),
        }
    };

    round
        .pairings
        .iter()
        .map(|pairing| {
            let (a, b) = match (lookup(&pairing.a)?, lookup(&pairing.b)?) {
                (Some(a), b) => (a, b),
                (None, Some(b)) => (b, None),
                (None, None) => return Err(format!("match {} has no players", pairing.match_id)),
            };
            Ok(ResolvedPairing {
                match_id: pairing.match_id.clone(),
                a,
                b,
            })
        })
        .collect()
}

/// One match, possibly several games under the rematch policy
struct MatchTask<I> {
    engine: GameEngine,
    id_gen: I,
    log: EventLog<TournamentEvent>,
    stop: StopSignal,
    coins: Coins,
    policy: DrawPolicy,
    max_rematches: u32,
    round: u32,
    match_id: String,
    a: Participant,
    b: Participant,
    agent_a: Arc<dyn Agent>,
    agent_b: Arc<dyn Agent>,
    white: Participant,
    black: Participant,
}

impl<I: IdGen> MatchTask<I> {
    fn seat(&self, participant: &Participant) -> Seat {
        let agent = if participant.seed == self.a.seed {
            Arc::clone(&self.agent_a)
        } else {
            Arc::clone(&self.agent_b)
        };
        Seat::new(&participant.name, agent)
    }

    async fn run(mut self) -> Result<MatchRecord, EngineError> {
        let mut white = self.white.clone();
        let mut black = self.black.clone();
        let mut games = Vec::new();
        let mut game_number = 1;

        let (winner, decision) = loop {
            self.log.append(TournamentEvent::MatchStart {
                match_id: self.match_id.clone(),
                round: self.round,
                game_number,
                white: white.clone(),
                black: black.clone(),
            })?;
            let setup = GameSetup {
                game_id: self.id_gen.next("game"),
                white: self.seat(&white),
                black: self.seat(&black),
            };
            let mut sink = MatchSink::new(self.log.clone(), &self.match_id);
            let session = self
                .engine
                .run(setup, &mut sink, self.stop.clone())
                .await?;

            let summary = self.summarize(&session, &white, &black);
            let result = summary.result;
            let decisive = summary.winner().cloned();
            games.push(summary);

            if let Some(winner) = decisive {
                break (winner, Decision::Played);
            }
            if result == GameResult::Unfinished || self.stop.is_stopped() {
                break (by_seed(&self.a, &self.b), Decision::Stopped);
            }
            match self.policy {
                DrawPolicy::Rematch if game_number <= self.max_rematches => {
                    tracing::info!(game_number, "drawn, rematch with colors swapped");
                    std::mem::swap(&mut white, &mut black);
                    game_number += 1;
                }
                DrawPolicy::Rematch => {
                    tracing::warn!(game_number, "rematch limit reached, seed rule applies");
                    let winner = adjudicate(DrawPolicy::Seed, &self.a, &self.b, &mut self.coins);
                    break (
                        winner,
                        Decision::Adjudicated {
                            policy: DrawPolicy::Seed,
                        },
                    );
                }
                policy => {
                    let winner = adjudicate(policy, &self.a, &self.b, &mut self.coins);
                    break (winner, Decision::Adjudicated { policy });
                }
            }
        };

        tracing::info!(winner = %winner, games = games.len(), "match complete");
        let record = MatchRecord {
            match_id: self.match_id.clone(),
            round: self.round,
            a: self.a.clone(),
            b: Some(self.b.clone()),
            games,
            winner,
            decision,
        };
        self.log.append(TournamentEvent::MatchComplete {
            match_id: self.match_id.clone(),
            round: self.round,
            record: record.clone(),
        })?;
        Ok(record)
    }

    fn summarize(
        &self,
        session: &GameSession,
        white: &Participant,
        black: &Participant,
    ) -> GameSummary {
        let (result, reason) = session
            .outcome
            .as_ref()
            .map_or((GameResult::Unfinished, GameOverReason::Interrupted), |o| {
                (o.result, o.reason)
            });
        GameSummary {
            game_id: session.id.clone(),
            white: white.clone(),
            black: black.clone(),
            result,
            reason,
            plies: session.plies.len() as u32,
            export: self.engine.export(session),
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
