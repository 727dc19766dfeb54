//! Club roster: the fixed list of members evenings are drawn from.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{DokoError, DokoResult};

/// Stable identifier of a club member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub i64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A club member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Unique, stable id.
    pub id: MemberId,
    /// Display name.
    pub name: String,
}

impl Member {
    /// Create a member with an explicit id.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: MemberId(id),
            name: name.into(),
        }
    }
}

/// Ordered list of club members.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from existing members, keeping their order.
    pub fn from_members(members: Vec<Member>) -> Self {
        Self { members }
    }

    /// Add a member by name. The id is derived from the current time and is
    /// always greater than every id already on the roster.
    pub fn add(&mut self, name: &str) -> DokoResult<MemberId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DokoError::EmptyName);
        }
        let floor = self.members.iter().map(|m| m.id.0 + 1).max().unwrap_or(0);
        let id = MemberId(Utc::now().timestamp_millis().max(floor));
        self.members.push(Member {
            id,
            name: name.to_string(),
        });
        tracing::info!(member_id = %id, name, "member added");
        Ok(id)
    }

    /// Remove a member by id.
    pub fn remove(&mut self, id: MemberId) -> DokoResult<Member> {
        let pos = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or(DokoError::UnknownMember(id))?;
        Ok(self.members.remove(pos))
    }

    /// Look up a member by id.
    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Find a member by name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Member> {
        let lower = name.trim().to_lowercase();
        self.members.iter().find(|m| m.name.to_lowercase() == lower)
    }

    /// Whether a member with this id exists.
    pub fn contains(&self, id: MemberId) -> bool {
        self.get(id).is_some()
    }

    /// All members in roster order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Iterate over members.
    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_assigns_increasing_ids() {
        let mut roster = Roster::new();
        let a = roster.add("Anna").unwrap();
        let b = roster.add("Bernd").unwrap();
        assert!(b > a);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn add_trims_and_rejects_empty() {
        let mut roster = Roster::new();
        let id = roster.add("  Carla ").unwrap();
        assert_eq!(roster.get(id).unwrap().name, "Carla");
        assert!(matches!(roster.add("   "), Err(DokoError::EmptyName)));
    }

    #[test]
    fn find_case_insensitive() {
        let roster = Roster::from_members(vec![Member::new(1, "Dieter")]);
        assert_eq!(roster.find_by_name("dieter").unwrap().id, MemberId(1));
        assert!(roster.find_by_name("nobody").is_none());
    }

    #[test]
    fn remove_member() {
        let mut roster = Roster::from_members(vec![Member::new(1, "A"), Member::new(2, "B")]);
        assert_eq!(roster.remove(MemberId(1)).unwrap().name, "A");
        assert!(!roster.contains(MemberId(1)));
        assert!(matches!(
            roster.remove(MemberId(9)),
            Err(DokoError::UnknownMember(MemberId(9)))
        ));
    }

    #[test]
    fn serializes_as_plain_array() {
        let roster = Roster::from_members(vec![Member::new(7, "Eva")]);
        let json = serde_json::to_string(&roster).unwrap();
        assert_eq!(json, r#"[{"id":7,"name":"Eva"}]"#);
    }
}
