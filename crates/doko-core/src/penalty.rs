//! Penalty tracker. Counts are adjusted one step at a time, independently of
//! rounds, and never drop below zero.

use crate::error::{DokoError, DokoResult};
use crate::evening::EveningSession;
use crate::roster::MemberId;

/// A single penalty step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenaltyDelta {
    /// One more penalty.
    Add,
    /// One penalty fewer.
    Remove,
}

impl PenaltyDelta {
    /// Parse `+` / `-` (also `add` / `remove`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "+" | "+1" | "add" => Some(Self::Add),
            "-" | "-1" | "remove" => Some(Self::Remove),
            _ => None,
        }
    }

    fn apply(self, count: u32) -> u32 {
        match self {
            Self::Add => count.saturating_add(1),
            Self::Remove => count.saturating_sub(1),
        }
    }
}

impl EveningSession {
    /// Adjust a participant's penalty count and return the new count.
    /// Removing from zero leaves it at zero.
    pub fn adjust_penalty(&mut self, member_id: MemberId, delta: PenaltyDelta) -> DokoResult<u32> {
        if self.finished {
            return Err(DokoError::AlreadyFinished);
        }
        let evening_id = self.id;
        let player = self
            .players
            .iter_mut()
            .find(|p| p.member_id == member_id)
            .ok_or(DokoError::PlayerNotInEvening(member_id))?;
        player.penalties = delta.apply(player.penalties);
        tracing::info!(
            evening_id,
            member_id = %member_id,
            penalties = player.penalties,
            "penalty adjusted"
        );
        Ok(player.penalties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evening::Venue;
    use crate::roster::{Member, Roster};
    use proptest::prelude::*;

    fn evening() -> EveningSession {
        let roster =
            Roster::from_members((1..=4).map(|i| Member::new(i, format!("M{i}"))).collect());
        let ids: Vec<MemberId> = (1..=4).map(MemberId).collect();
        EveningSession::create(&roster, &ids, Venue::Pub).unwrap()
    }

    #[test]
    fn add_and_remove() {
        let mut e = evening();
        assert_eq!(e.adjust_penalty(MemberId(2), PenaltyDelta::Add).unwrap(), 1);
        assert_eq!(e.adjust_penalty(MemberId(2), PenaltyDelta::Add).unwrap(), 2);
        assert_eq!(e.adjust_penalty(MemberId(2), PenaltyDelta::Remove).unwrap(), 1);
        assert_eq!(e.player(MemberId(2)).unwrap().penalties, 1);
        assert_eq!(e.player(MemberId(1)).unwrap().penalties, 0);
    }

    #[test]
    fn remove_clamps_at_zero() {
        let mut e = evening();
        assert_eq!(e.adjust_penalty(MemberId(3), PenaltyDelta::Remove).unwrap(), 0);
    }

    #[test]
    fn unknown_player() {
        let mut e = evening();
        assert!(matches!(
            e.adjust_penalty(MemberId(9), PenaltyDelta::Add),
            Err(DokoError::PlayerNotInEvening(MemberId(9)))
        ));
    }

    #[test]
    fn finished_evening_is_frozen() {
        let mut e = evening();
        e.finished = true;
        assert!(matches!(
            e.adjust_penalty(MemberId(1), PenaltyDelta::Add),
            Err(DokoError::AlreadyFinished)
        ));
    }

    #[test]
    fn parse_steps() {
        assert_eq!(PenaltyDelta::parse("+"), Some(PenaltyDelta::Add));
        assert_eq!(PenaltyDelta::parse("-1"), Some(PenaltyDelta::Remove));
        assert_eq!(PenaltyDelta::parse("x"), None);
    }

    proptest! {
        #[test]
        fn count_matches_clamped_walk(steps in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut e = evening();
            let mut expected: u32 = 0;
            for add in steps {
                let delta = if add { PenaltyDelta::Add } else { PenaltyDelta::Remove };
                expected = if add { expected + 1 } else { expected.saturating_sub(1) };
                let got = e.adjust_penalty(MemberId(1), delta).unwrap();
                prop_assert_eq!(got, expected);
            }
        }
    }
}
