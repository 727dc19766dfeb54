//! Club settings and their versioned loader.
//!
//! Stored settings went through two shapes. Version 1 (no `schemaVersion`
//! field) predates the flat per-head contribution; a missing or zero
//! `fixedContribution` there means "not set" and takes the default. From
//! version 2 on every field is explicit and any missing one takes its default.

use serde::{Deserialize, Serialize};

use crate::error::{DokoError, DokoResult};

/// Settings schema version written by this crate.
pub const SETTINGS_SCHEMA_VERSION: u32 = 2;

/// Default cost per penalty.
pub const DEFAULT_PENALTY_COST_RATE: f64 = 0.5;
/// Default amount each non-host participant pays the host.
pub const DEFAULT_HOST_BONUS_RATE: f64 = 20.0;
/// Default flat contribution per member and evening.
pub const DEFAULT_FIXED_CONTRIBUTION: f64 = 10.0;

/// Monetary rates applied when an evening is settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSettings")]
pub struct Settings {
    /// Schema version of the stored form.
    pub schema_version: u32,
    /// Currency per penalty.
    #[serde(rename = "penaltyCost")]
    pub penalty_cost_rate: f64,
    /// Currency each non-host participant pays the host.
    #[serde(rename = "hostBonus")]
    pub host_bonus_rate: f64,
    /// Flat currency per head and evening, absent members included.
    pub fixed_contribution: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: SETTINGS_SCHEMA_VERSION,
            penalty_cost_rate: DEFAULT_PENALTY_COST_RATE,
            host_bonus_rate: DEFAULT_HOST_BONUS_RATE,
            fixed_contribution: DEFAULT_FIXED_CONTRIBUTION,
        }
    }
}

impl Settings {
    /// Set the penalty cost rate.
    pub fn with_penalty_cost_rate(mut self, rate: f64) -> Self {
        self.penalty_cost_rate = rate;
        self
    }

    /// Set the host bonus rate.
    pub fn with_host_bonus_rate(mut self, rate: f64) -> Self {
        self.host_bonus_rate = rate;
        self
    }

    /// Set the flat contribution.
    pub fn with_fixed_contribution(mut self, amount: f64) -> Self {
        self.fixed_contribution = amount;
        self
    }

    /// Check that every rate is a finite, non-negative number.
    pub fn validate(&self) -> DokoResult<()> {
        for (name, value) in [
            ("penaltyCost", self.penalty_cost_rate),
            ("hostBonus", self.host_bonus_rate),
            ("fixedContribution", self.fixed_contribution),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DokoError::InvalidSettings(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Load settings from their stored JSON form.
    pub fn from_json(json: &str) -> DokoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Settings exactly as found on disk, before defaults and upgrades.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSettings {
    schema_version: Option<u32>,
    #[serde(alias = "penaltyCostRate")]
    penalty_cost: Option<f64>,
    #[serde(alias = "hostBonusRate")]
    host_bonus: Option<f64>,
    fixed_contribution: Option<f64>,
}

impl TryFrom<RawSettings> for Settings {
    type Error = DokoError;

    fn try_from(raw: RawSettings) -> DokoResult<Self> {
        let version = raw.schema_version.unwrap_or(1);
        if version > SETTINGS_SCHEMA_VERSION {
            tracing::warn!(version, "settings written by a newer version, reading known fields");
        }

        let fixed_contribution = match raw.fixed_contribution {
            Some(v) if version < 2 && v == 0.0 => None,
            other => other,
        };
        if fixed_contribution.is_none() {
            tracing::debug!(version, "fixedContribution missing, using default");
        }

        let settings = Self {
            schema_version: SETTINGS_SCHEMA_VERSION,
            penalty_cost_rate: raw.penalty_cost.unwrap_or(DEFAULT_PENALTY_COST_RATE),
            host_bonus_rate: raw.host_bonus.unwrap_or(DEFAULT_HOST_BONUS_RATE),
            fixed_contribution: fixed_contribution.unwrap_or(DEFAULT_FIXED_CONTRIBUTION),
        };
        settings.validate()?;
        Ok(settings)
    }
}
