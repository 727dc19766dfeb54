//! The whole club state as loaded from and saved to storage: roster,
//! evenings, settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{DokoError, DokoResult};
use crate::evening::{EveningSession, Venue};
use crate::roster::{MemberId, Roster};
use crate::settlement::Settlement;

/// Everything the engine reads and writes, in one value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubSnapshot {
    /// Club members.
    #[serde(default)]
    pub members: Roster,
    /// Evenings, oldest first.
    #[serde(default)]
    pub evenings: Vec<EveningSession>,
    /// Settlement rates.
    #[serde(default)]
    pub settings: Settings,
    /// When the snapshot was last written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl ClubSnapshot {
    /// Parse a stored snapshot. Missing sections take their defaults and
    /// evenings stored without standings get zeroed ones. An evening that
    /// breaks its invariants fails the whole load with `CorruptEvening`.
    pub fn from_json(json: &str) -> DokoResult<Self> {
        let mut snapshot: Self = serde_json::from_str(json)?;
        for evening in &mut snapshot.evenings {
            evening.fill_missing_standings(&snapshot.members);
            evening.check_invariants()?;
        }
        Ok(snapshot)
    }

    /// Serialize for storage.
    pub fn to_json_pretty(&self) -> DokoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Stamp the snapshot with the current time before writing it out.
    pub fn mark_saved(&mut self) {
        self.saved_at = Some(Utc::now());
    }

    /// Add a member to the roster.
    pub fn add_member(&mut self, name: &str) -> DokoResult<MemberId> {
        self.members.add(name)
    }

    /// Remove a member who appears in no evening.
    pub fn remove_member(&mut self, id: MemberId) -> DokoResult<()> {
        if !self.members.contains(id) {
            return Err(DokoError::UnknownMember(id));
        }
        if self.evenings.iter().any(|e| e.participant_ids.contains(&id)) {
            return Err(DokoError::MemberReferenced(id));
        }
        self.members.remove(id)?;
        Ok(())
    }

    /// Resolve a member by name, or by numeric id.
    pub fn resolve_member(&self, name_or_id: &str) -> DokoResult<MemberId> {
        if let Some(member) = self.members.find_by_name(name_or_id) {
            return Ok(member.id);
        }
        name_or_id
            .trim()
            .parse::<i64>()
            .ok()
            .map(MemberId)
            .filter(|id| self.members.contains(*id))
            .ok_or_else(|| DokoError::UnknownPlayerName(name_or_id.to_string()))
    }

    /// Open a new evening and return its id. Ids increase with every evening.
    pub fn create_evening(
        &mut self,
        participant_ids: &[MemberId],
        venue: Venue,
    ) -> DokoResult<i64> {
        let mut evening = EveningSession::create(&self.members, participant_ids, venue)?;
        let floor = self.evenings.iter().map(|e| e.id + 1).max().unwrap_or(0);
        evening.id = evening.id.max(floor);
        let id = evening.id;
        self.evenings.push(evening);
        Ok(id)
    }

    /// Look up an evening.
    pub fn evening(&self, id: i64) -> DokoResult<&EveningSession> {
        self.evenings
            .iter()
            .find(|e| e.id == id)
            .ok_or(DokoError::EveningNotFound(id))
    }

    /// Look up an evening for mutation.
    pub fn evening_mut(&mut self, id: i64) -> DokoResult<&mut EveningSession> {
        self.evenings
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(DokoError::EveningNotFound(id))
    }

    /// The most recently created evening that is still open.
    pub fn latest_open_evening(&self) -> Option<&EveningSession> {
        self.evenings.iter().rev().find(|e| !e.is_finished())
    }

    /// Settle an evening with the current roster and settings.
    pub fn finish_evening(&mut self, id: i64) -> DokoResult<&Settlement> {
        let evening = self
            .evenings
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(DokoError::EveningNotFound(id))?;
        evening.finish(&self.members, &self.settings)
    }
}
