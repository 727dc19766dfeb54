//! Line-oriented round entry for one evening.
//!
//! `TableConsole` keeps the in-progress [`RoundDraft`] and turns operator
//! commands (`win Anna`, `points 2`, `add`, ...) into engine calls. Every reply
//! says whether the club state changed so the caller can save right away.

use crate::error::{DokoError, DokoResult, RoundRejection};
use crate::evening::EveningSession;
use crate::penalty::PenaltyDelta;
use crate::roster::MemberId;
use crate::scoring::{GameMode, RoundDraft};
use crate::settlement::Settlement;
use crate::snapshot::ClubSnapshot;

/// Result of one console command.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleReply {
    /// Text to show the operator.
    pub text: String,
    /// Whether the club snapshot was mutated and should be saved.
    pub changed: bool,
    /// Whether the operator asked to leave.
    pub quit: bool,
}

impl ConsoleReply {
    fn view(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            changed: false,
            quit: false,
        }
    }

    fn mutation(text: impl Into<String>) -> Self {
        Self {
            changed: true,
            ..Self::view(text)
        }
    }
}

/// Interactive front for one open (or finished, read-only) evening.
pub struct TableConsole<'a> {
    club: &'a mut ClubSnapshot,
    evening_id: i64,
    draft: RoundDraft,
}

impl<'a> TableConsole<'a> {
    /// Attach to an evening of the club.
    pub fn new(club: &'a mut ClubSnapshot, evening_id: i64) -> DokoResult<Self> {
        club.evening(evening_id)?;
        Ok(Self {
            club,
            evening_id,
            draft: RoundDraft::new(),
        })
    }

    /// The round being entered.
    pub fn draft(&self) -> &RoundDraft {
        &self.draft
    }

    /// The club this console writes to, for saving.
    pub fn club_mut(&mut self) -> &mut ClubSnapshot {
        &mut *self.club
    }

    /// The evening this console drives.
    pub fn evening(&self) -> DokoResult<&EveningSession> {
        self.club.evening(self.evening_id)
    }

    /// Process one line of input.
    pub fn process(&mut self, input: &str) -> DokoResult<ConsoleReply> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(ConsoleReply::view(""));
        }

        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");

        match cmd.as_str() {
            "normal" => self.do_mode(GameMode::Normal),
            "solo" => self.do_mode(GameMode::Solo),
            "win" | "w" => self.do_win(rest),
            "points" | "p" => self.do_points(rest),
            "add" => self.do_add(),
            "penalty" => self.do_penalty(rest),
            "status" | "s" => self.do_status(),
            "finish" => self.do_finish(),
            "help" | "?" => Ok(ConsoleReply::view(HELP)),
            "quit" | "q" => Ok(ConsoleReply {
                quit: true,
                ..ConsoleReply::view("Goodbye!")
            }),
            _ => Err(DokoError::UnknownCommand(parts[0].to_string())),
        }
    }

    fn open_evening(&self) -> DokoResult<&EveningSession> {
        let evening = self.evening()?;
        if evening.is_finished() {
            return Err(DokoError::AlreadyFinished);
        }
        Ok(evening)
    }

    fn find_player(&self, name_or_id: &str) -> DokoResult<MemberId> {
        let evening = self.evening()?;
        let lower = name_or_id.trim().to_lowercase();
        evening
            .players()
            .iter()
            .find(|p| p.name.to_lowercase() == lower || p.member_id.to_string() == lower)
            .map(|p| p.member_id)
            .ok_or_else(|| DokoError::UnknownPlayerName(name_or_id.to_string()))
    }

    fn name_of(&self, id: MemberId) -> String {
        self.evening()
            .ok()
            .and_then(|e| e.player(id))
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn do_mode(&mut self, mode: GameMode) -> DokoResult<ConsoleReply> {
        self.open_evening()?;
        self.draft.set_mode(mode);
        let hint = match mode {
            GameMode::Normal => "select the 2 winners",
            GameMode::Solo => "select the soloist, or the 3 winners of a lost solo",
        };
        Ok(ConsoleReply::view(format!("Mode: {mode} ({hint})")))
    }

    fn do_win(&mut self, rest: &str) -> DokoResult<ConsoleReply> {
        if rest.is_empty() {
            return Err(DokoError::InvalidInput("usage: win <player>".to_string()));
        }
        self.open_evening()?;
        let id = self.find_player(rest)?;
        let evening = self.evening()?;
        if !evening.active_players().iter().any(|p| p.member_id == id) {
            return Err(RoundRejection::WinnerNotActive(id).into());
        }

        let name = self.name_of(id);
        if !self.draft.toggle_winner(id) {
            return Ok(ConsoleReply::view(format!(
                "Selection full ({}/{}), ignored {name}",
                self.draft.winners().len(),
                self.draft.mode().max_winners()
            )));
        }
        let names: Vec<String> = self.draft.winners().iter().map(|w| self.name_of(*w)).collect();
        Ok(ConsoleReply::view(format!(
            "Winners ({}/{}): {}",
            names.len(),
            self.draft.mode().max_winners(),
            if names.is_empty() { "-".to_string() } else { names.join(", ") }
        )))
    }

    fn do_points(&mut self, rest: &str) -> DokoResult<ConsoleReply> {
        self.open_evening()?;
        self.draft.set_points(rest);
        Ok(ConsoleReply::view(format!("Points: {rest}")))
    }

    fn do_add(&mut self) -> DokoResult<ConsoleReply> {
        let before: Vec<i64> = self
            .evening()?
            .players()
            .iter()
            .map(|p| p.total_points)
            .collect();

        let evening = self.club.evening_mut(self.evening_id)?;
        let (mode, points) = {
            let round = evening.record_round(&mut self.draft)?;
            (round.mode, round.points)
        };
        let mut out = format!(
            "Round {} recorded: {mode} for {points} points",
            evening.games().len()
        );
        for (player, old) in evening.players().iter().zip(before) {
            let delta = player.total_points - old;
            if delta != 0 {
                out.push_str(&format!("\n  {:<12} {:+}", player.name, delta));
            }
        }
        if let Some(dealer) = evening.dealer() {
            out.push_str(&format!("\nNext dealer (sits out): {}", dealer.name));
        }
        Ok(ConsoleReply::mutation(out))
    }

    fn do_penalty(&mut self, rest: &str) -> DokoResult<ConsoleReply> {
        let usage = || DokoError::InvalidInput("usage: penalty <+|-> <player>".to_string());
        let (sign, who) = rest.split_once(' ').ok_or_else(usage)?;
        let delta = PenaltyDelta::parse(sign).ok_or_else(usage)?;
        let id = self.find_player(who)?;
        let name = self.name_of(id);
        let count = self.club.evening_mut(self.evening_id)?.adjust_penalty(id, delta)?;
        Ok(ConsoleReply::mutation(format!("{name}: {count} penalties")))
    }

    fn do_status(&self) -> DokoResult<ConsoleReply> {
        let evening = self.evening()?;
        let mut out = format_standings(evening);
        if let Some(settlement) = evening.settlement() {
            out.push('\n');
            out.push_str(&format_settlement(settlement));
        } else {
            let names: Vec<String> = self
                .draft
                .winners()
                .iter()
                .map(|w| self.name_of(*w))
                .collect();
            out.push_str(&format!(
                "\nDraft: {} | winners: {} | points: {}",
                self.draft.mode(),
                if names.is_empty() { "-".to_string() } else { names.join(", ") },
                if self.draft.points_text().is_empty() { "-" } else { self.draft.points_text() }
            ));
            if self.draft.is_complete() {
                out.push_str(" | ready, type 'add'");
            }
        }
        Ok(ConsoleReply::view(out))
    }

    fn do_finish(&mut self) -> DokoResult<ConsoleReply> {
        let settlement = self.club.finish_evening(self.evening_id)?;
        Ok(ConsoleReply::mutation(format_settlement(settlement)))
    }
}

const HELP: &str = "\
Round entry:
  normal | solo           Select the game mode (clears winners)
  win <player>            Toggle a winner
  points <n>              Set the round's point value
  add                     Record the round
Evening:
  penalty <+|-> <player>  Adjust a penalty count
  status                  Show standings and the current draft
  finish                  Close the evening and settle
  help | quit";

/// Standings in seat order, marking the sitting-out dealer.
pub fn format_standings(evening: &EveningSession) -> String {
    let dealer = evening.dealer().map(|d| d.member_id);
    let mut out = format!(
        "{} rounds played{}",
        evening.games().len(),
        if evening.is_finished() { ", finished" } else { "" }
    );
    for player in evening.players() {
        let marker = if Some(player.member_id) == dealer { "*" } else { " " };
        out.push_str(&format!(
            "\n{marker} {:<12} {:>+5}  penalties {}",
            player.name, player.total_points, player.penalties
        ));
    }
    if dealer.is_some() {
        out.push_str("\n(* deals and sits out)");
    }
    out
}

/// Settlement lines, ranked, with absent members at the end.
pub fn format_settlement(settlement: &Settlement) -> String {
    let mut out = String::from("Settlement:");
    for p in &settlement.participants {
        out.push_str(&format!(
            "\n  {}. {:<12} {:>+5} pts  {:>8.2}{}",
            p.rank,
            p.name,
            p.points,
            p.total_payout,
            if p.is_host { "  (host)" } else { "" }
        ));
    }
    for p in &settlement.non_participants {
        out.push_str(&format!("\n  -  {:<12} absent     {:>8.2}", p.name, p.total_payout));
    }
    out.push_str(&format!("\n  Total income: {:.2}", settlement.total_income()));
    out
}
