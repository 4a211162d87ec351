use std::ops::Deref;

use serde::Deserialize;

/// Human readable duration, e.g. `"10s"`, `"1500ms"` or `"1m 30s"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.split_whitespace()
            .try_fold(std::time::Duration::ZERO, |acc, part| {
                acc.checked_add(parse_part(part)?)
            })
            .map(Self)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid duration {s:?}")))
    }
}

fn parse_part(part: &str) -> Option<std::time::Duration> {
    let (value, unit) = part.split_at(part.find(|c: char| !c.is_ascii_digit())?);
    let value = value.parse::<u64>().ok()?;

    let seconds = match unit {
        "ms" => return Some(std::time::Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        _ => return None,
    };

    value
        .checked_mul(seconds)
        .map(std::time::Duration::from_secs)
}
