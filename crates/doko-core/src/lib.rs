//! Scoring and settlement engine for Doppelkopf club evenings.
//!
//! A club keeps a [`Roster`] of members. Each game night is an
//! [`EveningSession`] with 4 or 5 players: rounds are recorded through the
//! round scoring engine, penalties through the penalty tracker, and closing
//! the evening runs the settlement engine, which fixes who pays what,
//! absent members included. [`ClubSnapshot`] bundles everything for storage.

/// Settlement rates and the versioned settings loader.
pub mod config;
/// Line-oriented round entry for an evening.
pub mod console;
/// Error types used throughout the crate.
pub mod error;
/// Evening sessions, seating, and the dealer cursor.
pub mod evening;
/// Totals across all settled evenings.
pub mod finance;
/// Penalty tracking.
pub mod penalty;
/// Club members.
pub mod roster;
/// Round scoring rules and round entry state.
pub mod scoring;
/// Settlement computation.
pub mod settlement;
/// Whole-club snapshot for persistence.
pub mod snapshot;

/// Re-export settings.
pub use config::Settings;
/// Re-export the console.
pub use console::{ConsoleReply, TableConsole};
/// Re-export error types.
pub use error::{DokoError, DokoResult, RoundRejection};
/// Re-export evening types.
pub use evening::{EveningSession, PlayerStanding, Venue};
/// Re-export finance types.
pub use finance::FinanceOverview;
/// Re-export penalty types.
pub use penalty::PenaltyDelta;
/// Re-export roster types.
pub use roster::{Member, MemberId, Roster};
/// Re-export scoring types.
pub use scoring::{GameMode, Round, RoundDraft};
/// Re-export settlement types.
pub use settlement::{NonParticipantSettlement, ParticipantSettlement, Settlement};
/// Re-export the snapshot.
pub use snapshot::ClubSnapshot;
