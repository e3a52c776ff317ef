use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Candle granularity code that is not part of the fixed OANDA catalog.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("unknown granularity: {0}")]
pub struct UnknownGranularity(pub String);

/// Bucket duration a single candle represents.
///
/// ### Notes
/// Every variant maps to exactly one [`TimeDelta`] (see [`Granularity::duration`]) and one
/// OANDA wire identifier (see [`Granularity::as_str`]).
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize,
)]
pub enum Granularity {
    S5,
    S10,
    S15,
    S30,
    M1,
    M2,
    M3,
    M4,
    M5,
    M10,
    M15,
    M30,
    H1,
    H2,
    H3,
    H4,
    H6,
    H8,
    H12,
    D,
    W,
}

impl Granularity {
    /// Every catalog entry, finest first.
    pub const ALL: [Granularity; 21] = [
        Granularity::S5,
        Granularity::S10,
        Granularity::S15,
        Granularity::S30,
        Granularity::M1,
        Granularity::M2,
        Granularity::M3,
        Granularity::M4,
        Granularity::M5,
        Granularity::M10,
        Granularity::M15,
        Granularity::M30,
        Granularity::H1,
        Granularity::H2,
        Granularity::H3,
        Granularity::H4,
        Granularity::H6,
        Granularity::H8,
        Granularity::H12,
        Granularity::D,
        Granularity::W,
    ];

    /// Return the OANDA wire identifier of this [`Granularity`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::S5 => "S5",
            Granularity::S10 => "S10",
            Granularity::S15 => "S15",
            Granularity::S30 => "S30",
            Granularity::M1 => "M1",
            Granularity::M2 => "M2",
            Granularity::M3 => "M3",
            Granularity::M4 => "M4",
            Granularity::M5 => "M5",
            Granularity::M10 => "M10",
            Granularity::M15 => "M15",
            Granularity::M30 => "M30",
            Granularity::H1 => "H1",
            Granularity::H2 => "H2",
            Granularity::H3 => "H3",
            Granularity::H4 => "H4",
            Granularity::H6 => "H6",
            Granularity::H8 => "H8",
            Granularity::H12 => "H12",
            Granularity::D => "D",
            Granularity::W => "W",
        }
    }

    /// Return the time span covered by one candle of this [`Granularity`].
    pub fn duration(&self) -> TimeDelta {
        match self {
            Granularity::S5 => TimeDelta::seconds(5),
            Granularity::S10 => TimeDelta::seconds(10),
            Granularity::S15 => TimeDelta::seconds(15),
            Granularity::S30 => TimeDelta::seconds(30),
            Granularity::M1 => TimeDelta::minutes(1),
            Granularity::M2 => TimeDelta::minutes(2),
            Granularity::M3 => TimeDelta::minutes(3),
            Granularity::M4 => TimeDelta::minutes(4),
            Granularity::M5 => TimeDelta::minutes(5),
            Granularity::M10 => TimeDelta::minutes(10),
            Granularity::M15 => TimeDelta::minutes(15),
            Granularity::M30 => TimeDelta::minutes(30),
            Granularity::H1 => TimeDelta::hours(1),
            Granularity::H2 => TimeDelta::hours(2),
            Granularity::H3 => TimeDelta::hours(3),
            Granularity::H4 => TimeDelta::hours(4),
            Granularity::H6 => TimeDelta::hours(6),
            Granularity::H8 => TimeDelta::hours(8),
            Granularity::H12 => TimeDelta::hours(12),
            Granularity::D => TimeDelta::days(1),
            Granularity::W => TimeDelta::weeks(1),
        }
    }
}

/// Look up the candle time span of a granularity code, eg/ "H1".
pub fn duration_of(code: &str) -> Result<TimeDelta, UnknownGranularity> {
    code.parse::<Granularity>().map(|granularity| granularity.duration())
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Granularity {
    type Err = UnknownGranularity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Granularity::ALL
            .into_iter()
            .find(|granularity| granularity.as_str() == s)
            .ok_or_else(|| UnknownGranularity(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_table() {
        let expected = [
            ("S5", TimeDelta::seconds(5)),
            ("S10", TimeDelta::seconds(10)),
            ("S15", TimeDelta::seconds(15)),
            ("S30", TimeDelta::seconds(30)),
            ("M1", TimeDelta::seconds(60)),
            ("M2", TimeDelta::seconds(120)),
            ("M3", TimeDelta::seconds(180)),
            ("M4", TimeDelta::seconds(240)),
            ("M5", TimeDelta::seconds(300)),
            ("M10", TimeDelta::seconds(600)),
            ("M15", TimeDelta::seconds(900)),
            ("M30", TimeDelta::seconds(1800)),
            ("H1", TimeDelta::seconds(3600)),
            ("H2", TimeDelta::seconds(7200)),
            ("H3", TimeDelta::seconds(10800)),
            ("H4", TimeDelta::seconds(14400)),
            ("H6", TimeDelta::seconds(21600)),
            ("H8", TimeDelta::seconds(28800)),
            ("H12", TimeDelta::seconds(43200)),
            ("D", TimeDelta::seconds(86400)),
            ("W", TimeDelta::seconds(604800)),
        ];

        for (code, duration) in expected {
            assert_eq!(duration_of(code).unwrap(), duration, "duration of {code}");
        }
        assert_eq!(expected.len(), Granularity::ALL.len());
    }

    #[test]
    fn test_from_str_roundtrip() {
        for variant in Granularity::ALL {
            let parsed: Granularity = variant.as_str().parse().unwrap_or_else(|e| {
                panic!("failed to parse {:?} from {:?}: {e}", variant, variant.as_str())
            });
            assert_eq!(parsed, variant, "roundtrip failed for {:?}", variant);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        let result = "H5".parse::<Granularity>();
        assert_eq!(result, Err(UnknownGranularity("H5".to_string())));
        assert!(duration_of("h1").is_err(), "codes are case-sensitive");
        assert_eq!(
            duration_of("Y1").unwrap_err().to_string(),
            "unknown granularity: Y1"
        );
    }

    #[test]
    fn test_de_granularity() {
        assert_eq!(
            serde_json::from_str::<Granularity>(r#""H12""#).unwrap(),
            Granularity::H12
        );
        assert_eq!(serde_json::to_string(&Granularity::D).unwrap(), r#""D""#);
    }

    #[test]
    fn test_catalog_is_ordered_by_duration() {
        let durations: Vec<_> = Granularity::ALL.iter().map(Granularity::duration).collect();
        assert!(durations.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
