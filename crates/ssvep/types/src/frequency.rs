//! Stimulus frequencies and the frequency-to-command table
//!
//! Each command tile flickers at its own frequency. A detected frequency is
//! resolved to the command label of the tile flickering at that rate.

use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors raised when constructing a [`Frequency`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrequencyError {
    #[error("frequency must be a finite number, got {0}")]
    NonFinite(f64),
}

/// Stimulus frequency in hertz
///
/// Always finite. Negative zero is stored as zero so that equal frequencies
/// hash identically.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(try_from = "f64")]
pub struct Frequency(f64);

/// 2^53: every integer below this magnitude is exact in an `f64`
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// JSON number formatting switches to exponent form outside this range
const MAX_PLAIN: f64 = 1e21;
const MIN_PLAIN: f64 = 1e-6;

impl Frequency {
    pub fn new(hz: f64) -> Result<Self, FrequencyError> {
        if !hz.is_finite() {
            return Err(FrequencyError::NonFinite(hz));
        }
        // -0.0 == 0.0, but their bit patterns differ
        let hz = if hz == 0.0 { 0.0 } else { hz };
        Ok(Self(hz))
    }

    pub fn hz(&self) -> f64 {
        self.0
    }

    /// The frequency as an exact integer, if it has no fractional part
    fn exact_integer(&self) -> Option<i64> {
        (self.0.fract() == 0.0 && self.0.abs() < MAX_EXACT_INTEGER).then(|| self.0 as i64)
    }

    /// The frequency as whole hertz, if it has no fractional part
    pub fn whole_hz(&self) -> Option<u32> {
        let hz = self.0;
        if hz.fract() == 0.0 && hz >= 0.0 && hz <= f64::from(u32::MAX) {
            Some(hz as u32)
        } else {
            None
        }
    }
}

impl From<u32> for Frequency {
    fn from(hz: u32) -> Self {
        Self(f64::from(hz))
    }
}

impl TryFrom<f64> for Frequency {
    type Error = FrequencyError;

    fn try_from(hz: f64) -> Result<Self, Self::Error> {
        Self::new(hz)
    }
}

impl From<Frequency> for f64 {
    fn from(frequency: Frequency) -> Self {
        frequency.0
    }
}

impl PartialEq for Frequency {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frequency {}

impl PartialOrd for Frequency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frequency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Frequency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Whole values go out as integers (`15`), the rest as floats (`12.5`)
impl Serialize for Frequency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.exact_integer() {
            Some(whole) => serializer.serialize_i64(whole),
            None => serializer.serialize_f64(self.0),
        }
    }
}

/// Prints like a JavaScript number: `15`, `12.5`, `1e+21`, `1.5e-7`
impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.abs();
        if magnitude < MAX_PLAIN && (magnitude >= MIN_PLAIN || magnitude == 0.0) {
            return write!(f, "{}", self.0);
        }

        let scientific = format!("{:e}", self.0);
        match scientific.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                write!(f, "{}e+{}", mantissa, exponent)
            }
            _ => f.write_str(&scientific),
        }
    }
}

/// One row of the frequency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyCommand {
    pub frequency: u32,
    pub command: String,
}

/// Fixed mapping from whole-hertz frequencies to command labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    commands: BTreeMap<u32, String>,
}

impl FrequencyTable {
    /// The standard eight-tile command grid
    pub fn standard() -> Self {
        let commands: [(u32, &str); 8] = [
            (10, "Yes"),
            (12, "No"),
            (15, "Water"),
            (17, "Help"),
            (20, "Food"),
            (22, "Bathroom"),
            (25, "Pain"),
            (27, "Doctor"),
        ];
        commands.into_iter().collect()
    }

    /// Look up the command mapped to a frequency
    pub fn lookup(&self, frequency: Frequency) -> Option<&str> {
        frequency
            .whole_hz()
            .and_then(|hz| self.commands.get(&hz))
            .map(String::as_str)
    }

    /// Resolve a frequency to a command label.
    ///
    /// Total over all frequencies: unmapped values get a synthesized
    /// `Custom Command (<hz> Hz)` label.
    pub fn resolve(&self, frequency: Frequency) -> String {
        match self.lookup(frequency) {
            Some(command) => command.to_string(),
            None => format!("Custom Command ({} Hz)", frequency),
        }
    }

    /// Table rows in ascending frequency order
    pub fn entries(&self) -> Vec<FrequencyCommand> {
        self.commands
            .iter()
            .map(|(frequency, command)| FrequencyCommand {
                frequency: *frequency,
                command: command.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        Self {
            commands: iter
                .into_iter()
                .map(|(hz, command)| (hz, command.into()))
                .collect(),
        }
    }
}
