use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::QuotaError;

/// Measurement unit of a resource as the quota service names it.
///
/// Byte units are base-1024. `None` marks countable resources (cores, instances).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    None,
    Bytes,
    Kibibytes,
    Mebibytes,
    Gibibytes,
    Tebibytes,
    Pebibytes,
    Exbibytes,
}

const BYTE_UNITS: [Unit; 7] = [
    Unit::Bytes,
    Unit::Kibibytes,
    Unit::Mebibytes,
    Unit::Gibibytes,
    Unit::Tebibytes,
    Unit::Pebibytes,
    Unit::Exbibytes,
];

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::None => "",
            Unit::Bytes => "B",
            Unit::Kibibytes => "KiB",
            Unit::Mebibytes => "MiB",
            Unit::Gibibytes => "GiB",
            Unit::Tebibytes => "TiB",
            Unit::Pebibytes => "PiB",
            Unit::Exbibytes => "EiB",
        }
    }

    /// Number of bytes in one of this unit, or `None` for countable resources.
    fn bytes(self) -> Option<u128> {
        let exp = match self {
            Unit::None => return None,
            Unit::Bytes => 0,
            Unit::Kibibytes => 1,
            Unit::Mebibytes => 2,
            Unit::Gibibytes => 3,
            Unit::Tebibytes => 4,
            Unit::Pebibytes => 5,
            Unit::Exbibytes => 6,
        };
        Some(1024u128.pow(exp))
    }

    /// Largest byte unit in which `value` (given in `self`) is still at least 1.
    ///
    /// Countable units and zero values keep their unit.
    pub fn best_fit(self, value: u64) -> Unit {
        let Some(base) = self.bytes() else {
            return self;
        };
        if value == 0 {
            return self;
        }
        let total = u128::from(value) * base;
        BYTE_UNITS
            .iter()
            .rev()
            .copied()
            .find(|u| u.bytes().is_some_and(|b| total >= b))
            .unwrap_or(self)
    }

    /// Format `value` (given in `self`) in `target`, with at most two decimals.
    ///
    /// A non-zero value too small to show in `target` renders as `<0.01`, never as `0`.
    pub fn format_in(self, value: u64, target: Unit) -> String {
        let (Some(base), Some(divisor)) = (self.bytes(), target.bytes()) else {
            return value.to_string();
        };
        let total = u128::from(value) * base;
        if total % divisor == 0 {
            return (total / divisor).to_string();
        }
        if total * 100 < divisor {
            return "<0.01".to_string();
        }

        let mut s = format!("{:.2}", total as f64 / divisor as f64);
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
        s
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = QuotaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Unit::None),
            "B" => Ok(Unit::Bytes),
            "KiB" => Ok(Unit::Kibibytes),
            "MiB" => Ok(Unit::Mebibytes),
            "GiB" => Ok(Unit::Gibibytes),
            "TiB" => Ok(Unit::Tebibytes),
            "PiB" => Ok(Unit::Pebibytes),
            "EiB" => Ok(Unit::Exbibytes),
            other => Err(QuotaError::InvalidInput(format!("unknown unit: {other:?}"))),
        }
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
