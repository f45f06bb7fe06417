use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Coarse delivery area used for demand aggregation and travel time lookups.
#[derive(
    Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    North,
    South,
    East,
    West,
    Central,
}

impl Zone {
    pub const ALL: [Zone; 5] = [
        Zone::North,
        Zone::South,
        Zone::East,
        Zone::West,
        Zone::Central,
    ];

    pub const COUNT: usize = Self::ALL.len();

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Zone::North => "North",
            Zone::South => "South",
            Zone::East => "East",
            Zone::West => "West",
            Zone::Central => "Central",
        };

        write!(f, "{name}")
    }
}

/// Maps postal codes to zones by longest matching prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneResolver {
    prefixes: Vec<(String, Zone)>,
    fallback: Zone,
}

impl ZoneResolver {
    pub fn new(prefixes: Vec<(String, Zone)>, fallback: Zone) -> Self {
        Self { prefixes, fallback }
    }

    pub fn prefixes(&self) -> &[(String, Zone)] {
        &self.prefixes
    }

    pub fn fallback(&self) -> Zone {
        self.fallback
    }

    pub fn resolve(&self, postal_code: &str) -> Zone {
        let postal_code = postal_code.trim();

        self.prefixes
            .iter()
            .filter(|(prefix, _)| !prefix.is_empty() && postal_code.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|&(_, zone)| zone)
            .unwrap_or(self.fallback)
    }
}

impl Default for ZoneResolver {
    fn default() -> Self {
        let by_first_digit = [
            Zone::North,
            Zone::North,
            Zone::East,
            Zone::East,
            Zone::South,
            Zone::South,
            Zone::West,
            Zone::West,
            Zone::Central,
            Zone::Central,
        ];

        Self {
            prefixes: by_first_digit
                .into_iter()
                .enumerate()
                .map(|(digit, zone)| (digit.to_string(), zone))
                .collect(),
            fallback: Zone::Central,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolver_uses_first_digit() {
        let resolver = ZoneResolver::default();

        assert_eq!(resolver.resolve("10115"), Zone::North);
        assert_eq!(resolver.resolve("20095"), Zone::East);
        assert_eq!(resolver.resolve("50667"), Zone::South);
        assert_eq!(resolver.resolve(" 70173"), Zone::West);
        assert_eq!(resolver.resolve("80331"), Zone::Central);
    }

    #[test]
    fn test_unknown_postal_code_falls_back() {
        let resolver = ZoneResolver::default();

        assert_eq!(resolver.resolve(""), Zone::Central);
        assert_eq!(resolver.resolve("SW1A"), Zone::Central);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let resolver = ZoneResolver::new(
            vec![("1".to_owned(), Zone::North), ("12".to_owned(), Zone::East)],
            Zone::West,
        );

        assert_eq!(resolver.resolve("12345"), Zone::East);
        assert_eq!(resolver.resolve("13345"), Zone::North);
        assert_eq!(resolver.resolve("99999"), Zone::West);
    }
}
