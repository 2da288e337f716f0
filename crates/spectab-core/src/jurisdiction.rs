//! # Jurisdictions
//!
//! The closed set of regulatory jurisdictions a band can apply in: the three
//! ITU regions and the two US categories (Federal, Non-Federal).
//!
//! The declaration order is the rank used everywhere a deterministic
//! tie-break is needed: band sorting, set ordering, and composite view
//! construction. Adding a jurisdiction forces every exhaustive `match` in the
//! workspace to handle it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpectabError;

/// A regulatory jurisdiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Jurisdiction {
    /// ITU Region 1 (Europe, Africa, the Middle East, northern Asia).
    ItuRegion1,
    /// ITU Region 2 (the Americas).
    ItuRegion2,
    /// ITU Region 3 (southern Asia and Oceania).
    ItuRegion3,
    /// US Federal users (NTIA-administered).
    UsFederal,
    /// US Non-Federal users (FCC-administered).
    UsNonFederal,
}

impl Jurisdiction {
    /// All jurisdictions in rank order.
    pub fn all() -> &'static [Jurisdiction] {
        &[
            Self::ItuRegion1,
            Self::ItuRegion2,
            Self::ItuRegion3,
            Self::UsFederal,
            Self::UsNonFederal,
        ]
    }

    /// The three ITU regions.
    pub fn itu_regions() -> &'static [Jurisdiction] {
        &[Self::ItuRegion1, Self::ItuRegion2, Self::ItuRegion3]
    }

    /// The two US categories.
    pub fn usa() -> &'static [Jurisdiction] {
        &[Self::UsFederal, Self::UsNonFederal]
    }

    /// Short canonical name (`"ITU-R1"`, `"F"`, ...). Used for serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ItuRegion1 => "ITU-R1",
            Self::ItuRegion2 => "ITU-R2",
            Self::ItuRegion3 => "ITU-R3",
            Self::UsFederal => "F",
            Self::UsNonFederal => "NF",
        }
    }

    /// Accepted aliases; the first is the human-readable display form.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::ItuRegion1 => &["ITU Region 1", "ITU R1", "R1", "Region 1"],
            Self::ItuRegion2 => &["ITU Region 2", "ITU R2", "R2", "Region 2"],
            Self::ItuRegion3 => &["ITU Region 3", "ITU R3", "R3", "Region 3"],
            Self::UsFederal => &["USA Federal", "Fed"],
            Self::UsNonFederal => &["USA Non-Federal", "Non-Fed"],
        }
    }

    /// True for the ITU regions.
    pub fn is_international(&self) -> bool {
        matches!(self, Self::ItuRegion1 | Self::ItuRegion2 | Self::ItuRegion3)
    }

    /// Position in the rank order.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.aliases()[0])
    }
}

impl FromStr for Jurisdiction {
    type Err = SpectabError;

    /// Case-insensitive match against the canonical name and all aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .iter()
            .find(|j| {
                std::iter::once(j.as_str())
                    .chain(j.aliases().iter().copied())
                    .any(|candidate| candidate.to_lowercase() == wanted)
            })
            .copied()
            .ok_or_else(|| SpectabError::UnknownJurisdiction(s.to_string()))
    }
}

impl Serialize for Jurisdiction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Jurisdiction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_order_matches_declaration() {
        let all = Jurisdiction::all();
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(Jurisdiction::UsFederal.index(), 3);
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("ITU-R1".parse::<Jurisdiction>().unwrap(), Jurisdiction::ItuRegion1);
        assert_eq!("region 2".parse::<Jurisdiction>().unwrap(), Jurisdiction::ItuRegion2);
        assert_eq!("R3".parse::<Jurisdiction>().unwrap(), Jurisdiction::ItuRegion3);
        assert_eq!("Fed".parse::<Jurisdiction>().unwrap(), Jurisdiction::UsFederal);
        assert_eq!("usa non-federal".parse::<Jurisdiction>().unwrap(), Jurisdiction::UsNonFederal);
    }

    #[test]
    fn rejects_unknown() {
        assert!("Region 4".parse::<Jurisdiction>().is_err());
        assert!("".parse::<Jurisdiction>().is_err());
    }

    #[test]
    fn display_uses_first_alias() {
        assert_eq!(Jurisdiction::ItuRegion1.to_string(), "ITU Region 1");
        assert_eq!(Jurisdiction::UsNonFederal.to_string(), "USA Non-Federal");
    }

    #[test]
    fn international_flag() {
        assert!(Jurisdiction::itu_regions().iter().all(|j| j.is_international()));
        assert!(Jurisdiction::usa().iter().all(|j| !j.is_international()));
    }

    #[test]
    fn serde_uses_canonical_name() {
        let json = serde_json::to_string(&Jurisdiction::UsFederal).unwrap();
        assert_eq!(json, "\"F\"");
        let parsed: Jurisdiction = serde_json::from_str("\"ITU Region 3\"").unwrap();
        assert_eq!(parsed, Jurisdiction::ItuRegion3);
        assert!(serde_json::from_str::<Jurisdiction>("\"Mars\"").is_err());
    }

    #[test]
    fn exhaustive_match_compiles() {
        fn administered_by(j: &Jurisdiction) -> &'static str {
            match j {
                Jurisdiction::ItuRegion1 | Jurisdiction::ItuRegion2 | Jurisdiction::ItuRegion3 => {
                    "ITU"
                }
                Jurisdiction::UsFederal => "NTIA",
                Jurisdiction::UsNonFederal => "FCC",
            }
        }
        for j in Jurisdiction::all() {
            assert!(!administered_by(j).is_empty());
        }
    }
}
