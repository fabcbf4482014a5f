use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::KickTable;

/// A movement timing value that cannot be turned into a [`Duration`].
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("invalid {field} value {value}: expected a finite, non-negative number of seconds")]
pub struct SettingsError {
    pub field: &'static str,
    pub value: f64,
}

/// Player-tunable game settings.
///
/// [`Settings::default`] is the tuned set used when no settings file is
/// given. Inside a file, a missing timing value reads as zero seconds and a
/// missing `DAS_cancel` as `true`, matching settings files written for the
/// desktop game. A missing `rotation` section selects SRS+.
///
/// # Example
///
/// ```
/// use srstris_engine::{KickTable, Settings};
///
/// let settings: Settings =
///     serde_json::from_str(r#"{ "movement": { "DAS": 0.1 } }"#).unwrap();
/// assert_eq!(settings.movement.das, 0.1);
/// assert_eq!(settings.movement.arr, 0.0);
/// assert!(settings.movement.das_cancel);
/// assert_eq!(settings.rotation.kick_table, KickTable::SrsPlus);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "MovementSettings::unset")]
    pub movement: MovementSettings,
    #[serde(default)]
    pub rotation: RotationSettings,
}

/// Auto-repeat timing, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementSettings {
    /// Delayed auto shift: how long a direction is held before it repeats.
    #[serde(rename = "DAS", default)]
    pub das: f64,
    /// Auto repeat rate: interval between repeated shifts. Zero snaps.
    #[serde(rename = "ARR", default)]
    pub arr: f64,
    /// Soft drop rate: interval between soft drop steps. Zero snaps.
    #[serde(rename = "SDR", default)]
    pub sdr: f64,
    /// Restart the DAS charge when the held direction flips.
    #[serde(rename = "DAS_cancel", default = "enabled")]
    pub das_cancel: bool,
}

const fn enabled() -> bool {
    true
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            das: 0.167,
            arr: 0.033,
            sdr: 0.0,
            das_cancel: true,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    pub kick_table: KickTable,
}

/// Validated repeat timing used by the input controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatTiming {
    pub das: Duration,
    pub arr: Duration,
    pub sdr: Duration,
    pub reset_das_on_direction_change: bool,
}

impl Default for RepeatTiming {
    fn default() -> Self {
        let movement = MovementSettings::default();
        Self {
            das: Duration::from_secs_f64(movement.das),
            arr: Duration::from_secs_f64(movement.arr),
            sdr: Duration::from_secs_f64(movement.sdr),
            reset_das_on_direction_change: movement.das_cancel,
        }
    }
}

fn seconds(field: &'static str, value: f64) -> Result<Duration, SettingsError> {
    Duration::try_from_secs_f64(value).map_err(|_| SettingsError { field, value })
}

impl MovementSettings {
    /// Values read for an empty `movement` section.
    #[must_use]
    pub const fn unset() -> Self {
        Self {
            das: 0.0,
            arr: 0.0,
            sdr: 0.0,
            das_cancel: enabled(),
        }
    }

    /// Converts the second counts to durations.
    pub fn timing(&self) -> Result<RepeatTiming, SettingsError> {
        Ok(RepeatTiming {
            das: seconds("DAS", self.das)?,
            arr: seconds("ARR", self.arr)?,
            sdr: seconds("SDR", self.sdr)?,
            reset_das_on_direction_change: self.das_cancel,
        })
    }
}
