//! Analytics derived from the selection log

use crate::activity::UserActivity;
use crate::log::LogEntry;
use crate::wire::iso_millis;
use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Width of the "recent activity" window
pub const RECENT_WINDOW_HOURS: i64 = 24;

/// Placeholder availability figure shown on the dashboard
pub const SYSTEM_UPTIME: &str = "99.9%";

/// Aggregate statistics over a set of log entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAnalytics {
    pub total_selections: usize,
    pub unique_commands: usize,

    /// Mean frequency, 0 for an empty set
    pub average_frequency: f64,

    /// Most selected command and its count.
    ///
    /// On a tie the command whose first selection is oldest wins.
    pub most_used_command: Option<(String, usize)>,

    /// Entry count per local hour of day; hours without entries are absent
    pub hourly_distribution: BTreeMap<u32, usize>,

    /// Entries younger than [`RECENT_WINDOW_HOURS`] at computation time
    pub recent_activity: usize,
}

impl LogAnalytics {
    /// Compute analytics over `entries`, given in insertion order.
    ///
    /// Hours of day are taken in `tz`.
    pub fn compute<'a, I, Tz>(entries: I, now: DateTime<Utc>, tz: &Tz) -> Self
    where
        I: IntoIterator<Item = &'a LogEntry>,
        Tz: TimeZone,
    {
        let window = Duration::hours(RECENT_WINDOW_HOURS);

        let mut total = 0usize;
        let mut frequency_sum = 0.0;
        let mut commands: HashSet<&str> = HashSet::new();
        // (count, first-seen rank) per command
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        let mut hourly: BTreeMap<u32, usize> = BTreeMap::new();
        let mut recent = 0usize;

        for entry in entries {
            let rank = counts.len();
            counts.entry(entry.command.as_str()).or_insert((0, rank)).0 += 1;
            commands.insert(entry.command.as_str());

            frequency_sum += entry.frequency.hz();
            total += 1;

            let hour = entry.timestamp.with_timezone(tz).hour();
            *hourly.entry(hour).or_insert(0) += 1;

            if now - entry.timestamp < window {
                recent += 1;
            }
        }

        let most_used_command = counts
            .into_iter()
            .max_by(|(_, (count_a, rank_a)), (_, (count_b, rank_b))| {
                count_a.cmp(count_b).then(rank_b.cmp(rank_a))
            })
            .map(|(command, (count, _))| (command.to_string(), count));

        let average_frequency = if total > 0 {
            frequency_sum / total as f64
        } else {
            0.0
        };

        Self {
            total_selections: total,
            unique_commands: commands.len(),
            average_frequency,
            most_used_command,
            hourly_distribution: hourly,
            recent_activity: recent,
        }
    }
}

/// Process-wide log statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    /// Distinct users with an activity record
    pub total_users: usize,

    /// Unfiltered log length
    pub total_logs: usize,

    pub system_uptime: String,

    #[serde(with = "iso_millis")]
    pub last_backup: DateTime<Utc>,
}

impl SystemStats {
    /// Stats with the dashboard placeholders filled in relative to `now`
    pub fn new(total_users: usize, total_logs: usize, now: DateTime<Utc>) -> Self {
        Self {
            total_users,
            total_logs,
            system_uptime: SYSTEM_UPTIME.to_string(),
            last_backup: now - Duration::hours(2),
        }
    }
}

/// Response to a log query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    /// Most recent entries first, at most `limit` of them
    pub logs: Vec<LogEntry>,

    /// Computed over every entry matching the filter, not only `logs`
    pub analytics: LogAnalytics,

    pub user_activity: Option<UserActivity>,

    pub system_stats: SystemStats,
}
