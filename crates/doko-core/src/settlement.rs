//! Settlement engine: turns final standings into who pays what.
//!
//! Participants are ranked by points, best first, and pay a base amount from
//! a fixed table (the worse the rank, the more), plus their penalties. A host
//! is paid by every other participant. Everyone, absent members included,
//! adds the flat contribution; absent members pay the evening's average game
//! total on top.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{DokoError, DokoResult};
use crate::evening::{EveningSession, PlayerStanding};
use crate::roster::{MemberId, Roster};

/// Base payout by rank for a table of four.
pub const BASE_PAYOUT_FOUR: [f64; 4] = [2.0, 3.0, 4.0, 5.0];
/// Base payout by rank for a table of five.
pub const BASE_PAYOUT_FIVE: [f64; 5] = [2.0, 3.0, 4.0, 5.0, 6.0];

/// Base payout table for a table size, if the size is playable.
pub fn base_payouts(player_count: usize) -> Option<&'static [f64]> {
    match player_count {
        4 => Some(&BASE_PAYOUT_FOUR),
        5 => Some(&BASE_PAYOUT_FIVE),
        _ => None,
    }
}

/// Settlement line for a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredParticipant")]
pub struct ParticipantSettlement {
    /// The participant.
    #[serde(rename = "id")]
    pub member_id: MemberId,
    /// Name at settlement time.
    pub name: String,
    /// 1-based rank, 1 being the best point total.
    pub rank: usize,
    /// Final point total.
    pub points: i64,
    /// Final penalty count.
    pub penalties: u32,
    /// Amount from the base table for this rank.
    pub base_payout: f64,
    /// `penalties × penaltyCost`.
    pub penalty_cost: f64,
    /// `basePayout + penaltyCost`, before the host adjustment.
    pub game_total: f64,
    /// Signed host adjustment: `-(n-1) × hostBonus` for the host,
    /// `+hostBonus` for everyone else, zero without a host.
    pub host_adjustment: f64,
    /// `gameTotal + hostAdjustment`.
    pub adjusted_total: f64,
    /// Flat per-head contribution.
    pub fixed_contribution: f64,
    /// `adjustedTotal + fixedContribution`.
    pub total_payout: f64,
    /// Whether this participant hosted.
    pub is_host: bool,
}

/// Settlement line for a member who did not attend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonParticipantSettlement {
    /// The absent member.
    #[serde(rename = "id")]
    pub member_id: MemberId,
    /// Member name.
    pub name: String,
    /// Average participant game total.
    pub game_total: f64,
    /// Flat per-head contribution.
    pub fixed_contribution: f64,
    /// `gameTotal + fixedContribution`.
    pub total_payout: f64,
}

/// The fixed monetary outcome of a finished evening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredSettlement")]
pub struct Settlement {
    /// Participants ranked best to worst.
    pub participants: Vec<ParticipantSettlement>,
    /// Members who were absent.
    #[serde(default)]
    pub non_participants: Vec<NonParticipantSettlement>,
    /// When the settlement was computed.
    pub timestamp: DateTime<Utc>,
}

/// A participant line as stored. Older data has no rank and keeps an
/// unsigned `hostPayment` instead of the signed adjustment.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredParticipant {
    id: MemberId,
    name: String,
    #[serde(default)]
    rank: usize,
    points: i64,
    penalties: u32,
    base_payout: f64,
    penalty_cost: f64,
    game_total: f64,
    host_adjustment: Option<f64>,
    #[serde(default)]
    host_payment: f64,
    adjusted_total: Option<f64>,
    fixed_contribution: f64,
    total_payout: f64,
    #[serde(default)]
    is_host: bool,
}

impl From<StoredParticipant> for ParticipantSettlement {
    fn from(stored: StoredParticipant) -> Self {
        let host_adjustment = stored.host_adjustment.unwrap_or(if stored.is_host {
            -stored.host_payment
        } else {
            stored.host_payment
        });
        Self {
            member_id: stored.id,
            name: stored.name,
            rank: stored.rank,
            points: stored.points,
            penalties: stored.penalties,
            base_payout: stored.base_payout,
            penalty_cost: stored.penalty_cost,
            game_total: stored.game_total,
            host_adjustment,
            adjusted_total: stored
                .adjusted_total
                .unwrap_or(stored.game_total + host_adjustment),
            fixed_contribution: stored.fixed_contribution,
            total_payout: stored.total_payout,
            is_host: stored.is_host,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettlement {
    participants: Vec<ParticipantSettlement>,
    #[serde(default)]
    non_participants: Vec<NonParticipantSettlement>,
    timestamp: DateTime<Utc>,
}

impl From<StoredSettlement> for Settlement {
    fn from(stored: StoredSettlement) -> Self {
        // Stored participants are already in rank order.
        let participants = stored
            .participants
            .into_iter()
            .enumerate()
            .map(|(i, mut p)| {
                if p.rank == 0 {
                    p.rank = i + 1;
                }
                p
            })
            .collect();
        Self {
            participants,
            non_participants: stored.non_participants,
            timestamp: stored.timestamp,
        }
    }
}

impl Settlement {
    /// Sum of every payout, participants and absent members alike.
    pub fn total_income(&self) -> f64 {
        self.participants.iter().map(|p| p.total_payout).sum::<f64>()
            + self.non_participants.iter().map(|p| p.total_payout).sum::<f64>()
    }

    /// What a member owes for this evening, attending or not.
    pub fn payout_for(&self, member_id: MemberId) -> Option<f64> {
        self.participants
            .iter()
            .find(|p| p.member_id == member_id)
            .map(|p| p.total_payout)
            .or_else(|| {
                self.non_participants
                    .iter()
                    .find(|p| p.member_id == member_id)
                    .map(|p| p.total_payout)
            })
    }
}

/// Compute a settlement from final standings. Pure and deterministic: the
/// same standings, roster, settings and timestamp give the same result.
///
/// Ties in points keep seat order.
pub fn compute_settlement(
    players: &[PlayerStanding],
    host_id: Option<MemberId>,
    roster: &Roster,
    settings: &Settings,
    timestamp: DateTime<Utc>,
) -> DokoResult<Settlement> {
    let base = base_payouts(players.len())
        .ok_or(DokoError::InvalidParticipantCount(players.len()))?;
    let others = (players.len() - 1) as f64;

    let mut ranked: Vec<&PlayerStanding> = players.iter().collect();
    ranked.sort_by(|a, b| b.total_points.cmp(&a.total_points));

    let participants: Vec<ParticipantSettlement> = ranked
        .iter()
        .zip(base)
        .enumerate()
        .map(|(i, (player, &base_payout))| {
            let penalty_cost = f64::from(player.penalties) * settings.penalty_cost_rate;
            let game_total = base_payout + penalty_cost;
            let is_host = host_id == Some(player.member_id);
            let host_adjustment = match host_id {
                None => 0.0,
                Some(_) if is_host => -others * settings.host_bonus_rate,
                Some(_) => settings.host_bonus_rate,
            };
            let adjusted_total = game_total + host_adjustment;
            ParticipantSettlement {
                member_id: player.member_id,
                name: player.name.clone(),
                rank: i + 1,
                points: player.total_points,
                penalties: player.penalties,
                base_payout,
                penalty_cost,
                game_total,
                host_adjustment,
                adjusted_total,
                fixed_contribution: settings.fixed_contribution,
                total_payout: adjusted_total + settings.fixed_contribution,
                is_host,
            }
        })
        .collect();

    let average =
        participants.iter().map(|p| p.game_total).sum::<f64>() / participants.len() as f64;
    let non_participants = roster
        .iter()
        .filter(|m| !players.iter().any(|p| p.member_id == m.id))
        .map(|m| NonParticipantSettlement {
            member_id: m.id,
            name: m.name.clone(),
            game_total: average,
            fixed_contribution: settings.fixed_contribution,
            total_payout: average + settings.fixed_contribution,
        })
        .collect();

    Ok(Settlement {
        participants,
        non_participants,
        timestamp,
    })
}

impl EveningSession {
    /// Close the evening and fix its settlement. Can run only once.
    pub fn finish(&mut self, roster: &Roster, settings: &Settings) -> DokoResult<&Settlement> {
        if self.finished {
            return Err(DokoError::AlreadyFinished);
        }
        let settlement =
            compute_settlement(&self.players, self.host_id, roster, settings, Utc::now())?;
        tracing::info!(
            evening_id = self.id,
            rounds = self.games.len(),
            income = settlement.total_income(),
            "evening settled"
        );
        self.finished = true;
        Ok(&*self.settlement.insert(settlement))
    }
}
