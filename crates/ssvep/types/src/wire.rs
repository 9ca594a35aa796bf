//! Serde helpers for the JSON wire format

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix
pub(crate) mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Per-frequency counters keyed by the frequency as printed (`{"10": 2}`)
pub(crate) mod usage_map {
    use crate::frequency::Frequency;
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S>(usage: &BTreeMap<Frequency, u64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(usage.len()))?;
        for (frequency, count) in usage {
            map.serialize_entry(&frequency.to_string(), count)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<Frequency, u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, u64>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, count)| {
                let hz: f64 = key.parse().map_err(D::Error::custom)?;
                let frequency = Frequency::new(hz).map_err(D::Error::custom)?;
                Ok::<_, D::Error>((frequency, count))
            })
            .collect()
    }
}
