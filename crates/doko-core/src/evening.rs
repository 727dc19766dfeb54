//! Evening sessions: one game night with a fixed table of 4 or 5 players.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DokoError, DokoResult};
use crate::roster::{MemberId, Roster};
use crate::scoring::Round;
use crate::settlement::Settlement;

/// Location tag for a neutral venue.
pub const PUB_LOCATION: &str = "kneipe";

/// Where an evening takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    /// A neutral venue. Nobody hosts.
    Pub,
    /// At a member's home; that member is the host.
    Home(MemberId),
}

impl Venue {
    /// Parse a stored location tag (`"kneipe"` or `"member_<id>"`).
    pub fn parse(tag: &str) -> Option<Self> {
        if tag == PUB_LOCATION {
            return Some(Self::Pub);
        }
        tag.strip_prefix("member_")
            .and_then(|id| id.parse().ok())
            .map(|id| Self::Home(MemberId(id)))
    }

    /// The host, if any.
    pub fn host(self) -> Option<MemberId> {
        match self {
            Self::Pub => None,
            Self::Home(id) => Some(id),
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pub => write!(f, "{PUB_LOCATION}"),
            Self::Home(id) => write!(f, "member_{id}"),
        }
    }
}

/// One player's running standing for the evening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStanding {
    /// The member sitting in this seat.
    #[serde(rename = "id")]
    pub member_id: MemberId,
    /// Name at the time the evening was created.
    pub name: String,
    /// Signed point total.
    pub total_points: i64,
    /// Penalty count, never below zero.
    pub penalties: u32,
}

impl PlayerStanding {
    fn fresh(member_id: MemberId, name: impl Into<String>) -> Self {
        Self {
            member_id,
            name: name.into(),
            total_points: 0,
            penalties: 0,
        }
    }
}

/// A single game night.
///
/// `players` keeps the seat order fixed at creation; the dealer is a cursor
/// into that order and the array itself is never rotated. Once finished, the
/// games, standings and dealer are frozen and only the settlement is new.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EveningSession {
    pub(crate) id: i64,
    pub(crate) date: DateTime<Utc>,
    pub(crate) participant_ids: Vec<MemberId>,
    #[serde(default)]
    pub(crate) host_id: Option<MemberId>,
    pub(crate) location: String,
    #[serde(default)]
    pub(crate) games: Vec<Round>,
    #[serde(rename = "currentDealerIndex", default)]
    pub(crate) dealer_index: usize,
    #[serde(rename = "playerData", default)]
    pub(crate) players: Vec<PlayerStanding>,
    #[serde(default)]
    pub(crate) finished: bool,
    #[serde(default)]
    pub(crate) settlement: Option<Settlement>,
}

impl EveningSession {
    /// Open a new evening for the given participants, seated in the order
    /// given.
    pub fn create(roster: &Roster, participant_ids: &[MemberId], venue: Venue) -> DokoResult<Self> {
        if !(4..=5).contains(&participant_ids.len()) {
            return Err(DokoError::InvalidParticipantCount(participant_ids.len()));
        }
        for (i, id) in participant_ids.iter().enumerate() {
            if participant_ids[..i].contains(id) {
                return Err(DokoError::DuplicateParticipant(*id));
            }
        }

        let players = participant_ids
            .iter()
            .map(|&id| {
                roster
                    .get(id)
                    .map(|m| PlayerStanding::fresh(id, m.name.clone()))
                    .ok_or(DokoError::UnknownMember(id))
            })
            .collect::<DokoResult<Vec<_>>>()?;

        let host_id = venue.host();
        if let Some(host) = host_id.filter(|host| !participant_ids.contains(host)) {
            return Err(DokoError::InvalidHost(host));
        }

        let now = Utc::now();
        let evening = Self {
            id: now.timestamp_millis(),
            date: now,
            participant_ids: participant_ids.to_vec(),
            host_id,
            location: venue.to_string(),
            games: Vec::new(),
            dealer_index: 0,
            players,
            finished: false,
            settlement: None,
        };
        tracing::info!(
            evening_id = evening.id,
            players = evening.players.len(),
            location = %evening.location,
            "evening created"
        );
        Ok(evening)
    }

    /// Rebuild zeroed standings for evenings stored before standings were
    /// persisted. Participants missing from the roster are named `?`.
    pub(crate) fn fill_missing_standings(&mut self, roster: &Roster) {
        if !self.players.is_empty() {
            return;
        }
        self.players = self
            .participant_ids
            .iter()
            .map(|&id| {
                let name = roster.get(id).map(|m| m.name.as_str()).unwrap_or("?");
                PlayerStanding::fresh(id, name)
            })
            .collect();
    }

    /// Check a loaded evening against the shape `create` and
    /// `record_round` maintain: 4 or 5 seats, one standing per participant
    /// in seat order, the dealer cursor on a seat, and for open evenings a
    /// host who sits at the table.
    pub(crate) fn check_invariants(&self) -> DokoResult<()> {
        let corrupt = |reason: String| Err(DokoError::CorruptEvening(self.id, reason));
        let seats = self.participant_ids.len();
        if !(4..=5).contains(&seats) {
            return corrupt(format!("{seats} participants"));
        }
        let standing_ids: Vec<MemberId> = self.players.iter().map(|p| p.member_id).collect();
        if standing_ids != self.participant_ids {
            return corrupt("standings do not match the participants".to_string());
        }
        if self.dealer_index >= seats {
            return corrupt(format!("dealer index {} outside {seats} seats", self.dealer_index));
        }
        let outside_host = self
            .host_id
            .filter(|host| !self.finished && !self.participant_ids.contains(host));
        if let Some(host) = outside_host {
            return corrupt(format!("host {host} is not a participant"));
        }
        Ok(())
    }

    /// Evening id.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// When the evening was created.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Participants in seat order.
    pub fn participant_ids(&self) -> &[MemberId] {
        &self.participant_ids
    }

    /// The host, if the evening is at a member's home.
    pub fn host_id(&self) -> Option<MemberId> {
        self.host_id
    }

    /// Stored location tag.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Parsed venue, if the tag is one of the known forms.
    pub fn venue(&self) -> Option<Venue> {
        Venue::parse(&self.location)
    }

    /// Rounds in the order they were recorded.
    pub fn games(&self) -> &[Round] {
        &self.games
    }

    /// Standings in seat order.
    pub fn players(&self) -> &[PlayerStanding] {
        &self.players
    }

    /// Standing of one participant.
    pub fn player(&self, id: MemberId) -> Option<&PlayerStanding> {
        self.players.iter().find(|p| p.member_id == id)
    }

    /// Whether a dealer sits out each round.
    pub fn rotates_dealer(&self) -> bool {
        self.players.len() == 5
    }

    /// Raw dealer cursor. Only meaningful when [`rotates_dealer`] is true.
    ///
    /// [`rotates_dealer`]: Self::rotates_dealer
    pub fn dealer_index(&self) -> usize {
        self.dealer_index
    }

    /// The sitting-out dealer for the next round, in 5-player evenings.
    pub fn dealer(&self) -> Option<&PlayerStanding> {
        if self.rotates_dealer() {
            self.players.get(self.dealer_index)
        } else {
            None
        }
    }

    /// Seats that play the next round.
    pub fn active_indices(&self) -> Vec<usize> {
        (0..self.players.len())
            .filter(|&i| !self.rotates_dealer() || i != self.dealer_index)
            .collect()
    }

    /// Players of the next round, in seat order.
    pub fn active_players(&self) -> Vec<&PlayerStanding> {
        self.active_indices()
            .into_iter()
            .map(|i| &self.players[i])
            .collect()
    }

    /// Whether the evening has been settled.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The settlement, once finished.
    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Member;

    fn roster() -> Roster {
        Roster::from_members((1..=6).map(|i| Member::new(i, format!("M{i}"))).collect())
    }

    fn ids(raw: &[i64]) -> Vec<MemberId> {
        raw.iter().copied().map(MemberId).collect()
    }

    #[test]
    fn create_four_at_pub() {
        let e = EveningSession::create(&roster(), &ids(&[3, 1, 2, 4]), Venue::Pub).unwrap();
        assert_eq!(e.location(), "kneipe");
        assert_eq!(e.host_id(), None);
        let seats: Vec<_> = e.players().iter().map(|p| p.member_id.0).collect();
        assert_eq!(seats, vec![3, 1, 2, 4]);
        assert!(e.dealer().is_none());
        assert_eq!(e.active_players().len(), 4);
        assert!(!e.is_finished());
    }

    #[test]
    fn create_five_at_home() {
        let e = EveningSession::create(
            &roster(),
            &ids(&[1, 2, 3, 4, 5]),
            Venue::Home(MemberId(2)),
        )
        .unwrap();
        assert_eq!(e.host_id(), Some(MemberId(2)));
        assert_eq!(e.location(), "member_2");
        assert_eq!(e.venue(), Some(Venue::Home(MemberId(2))));
        assert_eq!(e.dealer().unwrap().member_id, MemberId(1));
        assert_eq!(e.active_indices(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn rejects_bad_participant_counts() {
        for raw in [&[1, 2, 3][..], &[1, 2, 3, 4, 5, 6][..]] {
            let err = EveningSession::create(&roster(), &ids(raw), Venue::Pub).unwrap_err();
            assert!(matches!(err, DokoError::InvalidParticipantCount(n) if n == raw.len()));
        }
    }

    #[test]
    fn rejects_host_outside_table() {
        let err = EveningSession::create(&roster(), &ids(&[1, 2, 3, 4]), Venue::Home(MemberId(6)))
            .unwrap_err();
        assert!(matches!(err, DokoError::InvalidHost(MemberId(6))));
    }

    #[test]
    fn rejects_duplicates_and_unknown_members() {
        let err = EveningSession::create(&roster(), &ids(&[1, 2, 2, 4]), Venue::Pub).unwrap_err();
        assert!(matches!(err, DokoError::DuplicateParticipant(MemberId(2))));

        let err = EveningSession::create(&roster(), &ids(&[1, 2, 3, 99]), Venue::Pub).unwrap_err();
        assert!(matches!(err, DokoError::UnknownMember(MemberId(99))));
    }

    #[test]
    fn venue_tags() {
        assert_eq!(Venue::parse("kneipe"), Some(Venue::Pub));
        assert_eq!(Venue::parse("member_17"), Some(Venue::Home(MemberId(17))));
        assert_eq!(Venue::parse("garden"), None);
        assert_eq!(Venue::Home(MemberId(5)).to_string(), "member_5");
    }

    #[test]
    fn legacy_evening_without_standings() {
        let json = r#"{
            "id": 1700000000000,
            "date": "2024-03-01T19:00:00Z",
            "participantIds": [1, 2, 3, 4],
            "hostId": null,
            "location": "kneipe",
            "games": [],
            "settlement": null,
            "finished": false
        }"#;
        let mut e: EveningSession = serde_json::from_str(json).unwrap();
        assert!(e.players().is_empty());
        e.fill_missing_standings(&roster());
        assert_eq!(e.players().len(), 4);
        assert_eq!(e.players()[0].name, "M1");
        assert_eq!(e.dealer_index(), 0);
    }

    fn stored(participants: &str, standings: &str, dealer: usize, host: &str) -> EveningSession {
        let json = format!(
            r#"{{"id": 7, "date": "2024-03-01T19:00:00Z", "participantIds": {participants},
                "hostId": {host}, "location": "kneipe", "games": [],
                "currentDealerIndex": {dealer}, "playerData": {standings},
                "finished": false}}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    fn standings(raw: &[i64]) -> String {
        let rows: Vec<String> = raw
            .iter()
            .map(|id| {
                format!(r#"{{"id": {id}, "name": "M{id}", "totalPoints": 0, "penalties": 0}}"#)
            })
            .collect();
        format!("[{}]", rows.join(","))
    }

    #[test]
    fn stored_evening_passes_checks() {
        let e = stored("[1,2,3,4,5]", &standings(&[1, 2, 3, 4, 5]), 4, "3");
        assert!(e.check_invariants().is_ok());
    }

    #[test]
    fn rejects_dealer_outside_table() {
        let e = stored("[1,2,3,4,5]", &standings(&[1, 2, 3, 4, 5]), 5, "null");
        let err = e.check_invariants().unwrap_err();
        assert!(matches!(err, DokoError::CorruptEvening(7, ref r) if r.contains("dealer")));
    }

    #[test]
    fn rejects_standings_out_of_step() {
        for rows in [standings(&[1, 2, 3]), standings(&[1, 2, 4, 3]), standings(&[1, 2, 3, 9])] {
            let e = stored("[1,2,3,4]", &rows, 0, "null");
            assert!(matches!(e.check_invariants(), Err(DokoError::CorruptEvening(7, _))));
        }
    }

    #[test]
    fn rejects_stored_table_size() {
        let e = stored("[1,2,3]", &standings(&[1, 2, 3]), 0, "null");
        let err = e.check_invariants().unwrap_err();
        assert_eq!(err.to_string(), "evening 7 is corrupt: 3 participants");
    }

    #[test]
    fn rejects_open_evening_with_outside_host() {
        let mut e = stored("[1,2,3,4]", &standings(&[1, 2, 3, 4]), 0, "6");
        assert!(matches!(e.check_invariants(), Err(DokoError::CorruptEvening(7, _))));
        e.finished = true;
        assert!(e.check_invariants().is_ok());
    }
}
