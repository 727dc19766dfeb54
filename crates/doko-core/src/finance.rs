//! Club finances across all settled evenings.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::roster::MemberId;
use crate::snapshot::ClubSnapshot;

/// What one member has paid over all settled evenings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBalance {
    /// The member.
    pub member_id: MemberId,
    /// Member name.
    pub name: String,
    /// Sum of payouts, attended or not.
    pub total_paid: f64,
    /// Settled evenings the member attended.
    pub evenings_attended: usize,
}

/// Income of one settled evening.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EveningIncome {
    /// Evening id.
    pub evening_id: i64,
    /// Evening date.
    pub date: DateTime<Utc>,
    /// Rounds played.
    pub rounds: usize,
    /// Sum of all payouts.
    pub income: f64,
}

/// Aggregated finances.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceOverview {
    /// Number of settled evenings.
    pub settled_evenings: usize,
    /// Income over all settled evenings.
    pub total_income: f64,
    /// Mean income per settled evening, zero when there are none.
    pub average_income: f64,
    /// Current roster members, highest total paid first.
    pub members: Vec<MemberBalance>,
    /// Settled evenings, oldest first.
    pub evenings: Vec<EveningIncome>,
}

impl FinanceOverview {
    /// Aggregate the settled evenings of a club. Payouts of members no longer
    /// on the roster count towards income but get no balance row.
    pub fn from_snapshot(club: &ClubSnapshot) -> Self {
        let mut members: Vec<MemberBalance> = club
            .members
            .iter()
            .map(|m| MemberBalance {
                member_id: m.id,
                name: m.name.clone(),
                total_paid: 0.0,
                evenings_attended: 0,
            })
            .collect();
        let mut evenings = Vec::new();

        for evening in &club.evenings {
            let Some(settlement) = evening.settlement().filter(|_| evening.is_finished()) else {
                continue;
            };
            for balance in &mut members {
                if let Some(paid) = settlement.payout_for(balance.member_id) {
                    balance.total_paid += paid;
                }
                if evening.participant_ids().contains(&balance.member_id) {
                    balance.evenings_attended += 1;
                }
            }
            evenings.push(EveningIncome {
                evening_id: evening.id(),
                date: evening.date(),
                rounds: evening.games().len(),
                income: settlement.total_income(),
            });
        }

        members.sort_by(|a, b| b.total_paid.total_cmp(&a.total_paid));
        let total_income: f64 = evenings.iter().map(|e| e.income).sum();
        let average_income = if evenings.is_empty() {
            0.0
        } else {
            total_income / evenings.len() as f64
        };

        Self {
            settled_evenings: evenings.len(),
            total_income,
            average_income,
            members,
            evenings,
        }
    }
}
