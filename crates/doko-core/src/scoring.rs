//! Round scoring engine.
//!
//! Turns one round outcome (mode, winners, point value) into per-player
//! deltas for every active seat, and records the round on the evening.
//! In 5-player evenings the dealer sits out and the dealer cursor moves one
//! seat forward after every recorded round.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DokoError, DokoResult, RoundRejection};
use crate::evening::EveningSession;
use crate::roster::MemberId;

/// How a round was played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Two against two.
    #[default]
    Normal,
    /// One soloist against the other three, stakes tripled.
    Solo,
}

impl GameMode {
    /// Most winners that can be selected while entering a round.
    pub fn max_winners(self) -> usize {
        match self {
            Self::Normal => 2,
            Self::Solo => 3,
        }
    }

    /// Whether `count` winners make a valid round in this mode.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Normal => count == 2,
            Self::Solo => count == 1 || count == 3,
        }
    }

    /// Human-readable winner-count rule.
    pub fn winner_rule(self) -> &'static str {
        match self {
            Self::Normal => "2",
            Self::Solo => "1 or 3",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Solo => write!(f, "Solo"),
        }
    }
}

/// A recorded round. Never modified after it is appended.
///
/// Stored as `winners` and `dealerIndex`, with `isSolo` written next to
/// `mode` so older readers still see solos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredRound", into = "StoredRound")]
pub struct Round {
    /// Timestamp-derived id, increasing within an evening.
    pub id: i64,
    /// When the round was recorded.
    pub timestamp: DateTime<Utc>,
    /// Point value entered by the operator.
    pub points: u32,
    /// Normal or solo.
    pub mode: GameMode,
    /// Members credited with the win, in selection order.
    pub winner_ids: Vec<MemberId>,
    /// Seat of the sitting-out dealer, for 5-player evenings only.
    pub dealer_index_at_time: Option<usize>,
}

/// A round as stored. Older data carries `isSolo` instead of `mode`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRound {
    id: i64,
    timestamp: DateTime<Utc>,
    points: u32,
    mode: Option<GameMode>,
    #[serde(default)]
    is_solo: bool,
    #[serde(default)]
    winners: Vec<MemberId>,
    dealer_index: Option<usize>,
}

impl From<StoredRound> for Round {
    fn from(stored: StoredRound) -> Self {
        let legacy_mode = if stored.is_solo {
            GameMode::Solo
        } else {
            GameMode::Normal
        };
        Self {
            id: stored.id,
            timestamp: stored.timestamp,
            points: stored.points,
            mode: stored.mode.unwrap_or(legacy_mode),
            winner_ids: stored.winners,
            dealer_index_at_time: stored.dealer_index,
        }
    }
}

impl From<Round> for StoredRound {
    fn from(round: Round) -> Self {
        Self {
            id: round.id,
            timestamp: round.timestamp,
            points: round.points,
            mode: Some(round.mode),
            is_solo: round.mode == GameMode::Solo,
            winners: round.winner_ids,
            dealer_index: round.dealer_index_at_time,
        }
    }
}

/// Compute the point delta for every active player, in the order given.
///
/// Normal: winners `+p`, losers `-p`. Solo with one winner: soloist `+3p`,
/// others `-p`. Solo with three winners: winners `+p`, the soloist `-3p`.
/// The deltas of a valid round always sum to zero.
pub fn point_deltas(
    mode: GameMode,
    active: &[MemberId],
    winners: &[MemberId],
    points: u32,
) -> Result<Vec<i64>, RoundRejection> {
    if points == 0 {
        return Err(RoundRejection::NonPositivePoints);
    }
    for (i, winner) in winners.iter().enumerate() {
        if winners[..i].contains(winner) {
            return Err(RoundRejection::DuplicateWinner(*winner));
        }
        if !active.contains(winner) {
            return Err(RoundRejection::WinnerNotActive(*winner));
        }
    }
    if !mode.accepts(winners.len()) {
        return Err(RoundRejection::WinnerCount {
            mode,
            selected: winners.len(),
        });
    }

    let p = i64::from(points);
    let (win, lose) = match (mode, winners.len()) {
        (GameMode::Solo, 1) => (3 * p, -p),
        (GameMode::Solo, _) => (p, -3 * p),
        (GameMode::Normal, _) => (p, -p),
    };
    Ok(active
        .iter()
        .map(|id| if winners.contains(id) { win } else { lose })
        .collect())
}

/// In-progress round entry: the mode, the winners picked so far, and the
/// point field as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundDraft {
    mode: GameMode,
    winners: Vec<MemberId>,
    points: String,
}

impl RoundDraft {
    /// Empty draft in normal mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Winners selected so far.
    pub fn winners(&self) -> &[MemberId] {
        &self.winners
    }

    /// Raw point text.
    pub fn points_text(&self) -> &str {
        &self.points
    }

    /// Switch mode. Clears the winner selection.
    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.winners.clear();
    }

    /// Toggle a winner. A selected member is deselected; otherwise the member
    /// is added unless the mode's maximum is already reached, in which case
    /// the selection is left alone. Returns whether the selection changed.
    pub fn toggle_winner(&mut self, id: MemberId) -> bool {
        if let Some(pos) = self.winners.iter().position(|w| *w == id) {
            self.winners.remove(pos);
            return true;
        }
        if self.winners.len() >= self.mode.max_winners() {
            tracing::warn!(member_id = %id, mode = %self.mode, "winner selection full, ignoring");
            return false;
        }
        self.winners.push(id);
        true
    }

    /// Replace the point text.
    pub fn set_points(&mut self, text: impl Into<String>) {
        self.points = text.into();
    }

    /// Parse the point text as a positive whole number.
    pub fn parsed_points(&self) -> Result<u32, RoundRejection> {
        match self.points.trim().parse::<u32>() {
            Ok(p) if p > 0 => Ok(p),
            _ => Err(RoundRejection::NonPositivePoints),
        }
    }

    /// Whether the draft would pass the count and points checks.
    pub fn is_complete(&self) -> bool {
        self.mode.accepts(self.winners.len()) && self.parsed_points().is_ok()
    }

    /// Back to an empty normal-mode draft.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl EveningSession {
    /// Record the drafted round.
    ///
    /// On success every active player's total moves by its delta, the round
    /// is appended, the dealer advances (5 players only), and the draft is
    /// reset. On failure nothing changes, the draft included.
    pub fn record_round(&mut self, draft: &mut RoundDraft) -> DokoResult<&Round> {
        if self.finished {
            return Err(DokoError::AlreadyFinished);
        }

        let active = self.active_indices();
        let active_ids: Vec<MemberId> = active.iter().map(|&i| self.players[i].member_id).collect();
        let deltas = draft
            .parsed_points()
            .and_then(|points| {
                point_deltas(draft.mode(), &active_ids, draft.winners(), points)
                    .map(|deltas| (points, deltas))
            })
            .inspect_err(|reason| {
                tracing::warn!(evening_id = self.id, %reason, "round rejected");
            });
        let (points, deltas) = deltas?;

        for (&seat, delta) in active.iter().zip(&deltas) {
            self.players[seat].total_points += delta;
            tracing::debug!(
                seat,
                member_id = %self.players[seat].member_id,
                delta,
                "points applied"
            );
        }

        let now = Utc::now();
        let floor = self.games.last().map(|r| r.id + 1).unwrap_or(0);
        let dealer_index_at_time = self.rotates_dealer().then_some(self.dealer_index);
        self.games.push(Round {
            id: now.timestamp_millis().max(floor),
            timestamp: now,
            points,
            mode: draft.mode(),
            winner_ids: draft.winners().to_vec(),
            dealer_index_at_time,
        });
        if self.rotates_dealer() {
            self.dealer_index = (self.dealer_index + 1) % self.players.len();
        }
        draft.reset();

        tracing::info!(
            evening_id = self.id,
            round = self.games.len(),
            points,
            "round recorded"
        );
        let last = self.games.len() - 1;
        Ok(&self.games[last])
    }
}
