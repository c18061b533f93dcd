use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

static FY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:fy)?\s*(\d{4})\s*-\s*(\d{2}|\d{4})$").expect("financial year pattern")
});

/// Indian financial year (1 April to 31 March), identified by its starting
/// calendar year. FY 2024-25 is `FinancialYear(2024)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FinancialYear(pub i32);

impl FinancialYear {
    pub fn start_year(&self) -> i32 {
        self.0
    }

    /// Parses `2024-25`, `FY2024-25`, `FY 2024-25` or `2024-2025`.
    /// The second year must follow the first.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = FY_PATTERN.captures(s.trim())?;
        let start: i32 = caps[1].parse().ok()?;
        let end = &caps[2];
        let expected_end = start + 1;
        let matches = match end.len() {
            2 => end.parse::<i32>().ok()? == expected_end % 100,
            _ => end.parse::<i32>().ok()? == expected_end,
        };
        matches.then_some(Self(start))
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}-{:02}", self.0, (self.0 + 1) % 100)
    }
}

impl Serialize for FinancialYear {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FinancialYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        FinancialYear::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid financial year '{s}'")))
    }
}
