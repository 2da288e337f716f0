//! # Radiocommunication Services
//!
//! The registry of ITU-R services that can appear in an allocation table,
//! with the abbreviations and science flags used by reporting collaborators.
//!
//! Services are `'static` registry entries; allocations hold a
//! [`ServiceRef`] rather than an owned copy. Identity is the lowercase
//! canonical name.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// A service that can be allocated to a band.
#[derive(Debug)]
pub struct Service {
    name: &'static str,
    abbreviation: Option<&'static str>,
    science: bool,
    science_support: bool,
    aliases: &'static [&'static str],
}

/// Shared reference to a registry entry.
pub type ServiceRef = &'static Service;

impl Service {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            abbreviation: None,
            science: false,
            science_support: false,
            aliases: &[],
        }
    }

    const fn abbreviated(mut self, abbreviation: &'static str) -> Self {
        self.abbreviation = Some(abbreviation);
        self
    }

    const fn science(mut self) -> Self {
        self.science = true;
        self
    }

    const fn science_support(mut self) -> Self {
        self.science_support = true;
        self
    }

    const fn aliased(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Lowercase canonical name, e.g. `"radio astronomy"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Abbreviation (e.g. `"RAS"`), falling back to the name.
    pub fn abbreviation(&self) -> &'static str {
        self.abbreviation.unwrap_or(self.name)
    }

    /// True for the passive/active science services.
    pub fn is_science(&self) -> bool {
        self.science
    }

    /// True for services that support science (space research, metaids, ...).
    pub fn is_science_support(&self) -> bool {
        self.science_support
    }

    /// Alternative spellings found in scraped tables.
    pub fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    fn candidates(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

impl PartialEq for Service {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Service {}

impl Hash for Service {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for Service {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name)
    }
}

static SERVICES: [Service; 32] = [
    Service::new("aeronautical mobile"),
    Service::new("aeronautical mobile-satellite"),
    Service::new("aeronautical radionavigation").aliased(&["aeronautical radionavi-gation"]),
    Service::new("amateur"),
    Service::new("amateur-satellite"),
    Service::new("broadcasting"),
    Service::new("broadcasting-satellite").abbreviated("BSS"),
    Service::new("earth exploration-satellite").abbreviated("EESS").science(),
    Service::new("fixed"),
    Service::new("fixed-satellite").abbreviated("FSS"),
    Service::new("inter-satellite"),
    Service::new("land mobile"),
    Service::new("maritime mobile"),
    Service::new("maritime mobile-satellite"),
    Service::new("maritime radionavigation"),
    Service::new("meteorological aids").science_support(),
    Service::new("meteorological-satellite").science_support(),
    Service::new("mobile except aeronautical mobile"),
    Service::new("mobile"),
    Service::new("mobile-satellite except aeronautical mobile-satellite"),
    Service::new("mobile-satellite except maritime mobile-satellite"),
    Service::new("mobile-satellite").abbreviated("MSS"),
    Service::new("radio astronomy").abbreviated("RAS").science(),
    Service::new("radiodetermination-satellite").aliased(&["radiodetermination-satel-lite"]),
    Service::new("radiolocation"),
    Service::new("radiolocation-satellite"),
    Service::new("radionavigation"),
    Service::new("radionavigation-satellite").abbreviated("RNSS"),
    Service::new("space operation"),
    Service::new("space research").science_support(),
    Service::new("standard frequency and time signal")
        .abbreviated("Time")
        .science_support(),
    Service::new("standard frequency and time signal-satellite")
        .abbreviated("Time")
        .science_support(),
];

/// Every registered service.
pub fn all_services() -> &'static [Service] {
    &SERVICES
}

/// Identify the service a line of table text starts with.
///
/// Returns the service together with the byte length of the matched
/// prefix. Matching is case-insensitive; the longest matching name or
/// alias wins, so `"MOBILE except aeronautical mobile"` beats `"MOBILE"`.
pub fn identify_service_prefix(line: &str) -> Option<(ServiceRef, usize)> {
    let lower = line.to_lowercase();
    let mut best: Option<(ServiceRef, usize)> = None;
    for service in SERVICES.iter() {
        for candidate in service.candidates() {
            if !lower.starts_with(candidate) {
                continue;
            }
            // Only accept the match at a word boundary.
            let boundary = lower[candidate.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
            if !boundary {
                continue;
            }
            if best.map_or(true, |(_, len)| candidate.len() > len) {
                best = Some((service, candidate.len()));
            }
        }
    }
    best
}

/// Identify the service a line of table text refers to.
pub fn identify_service(line: &str) -> Option<ServiceRef> {
    identify_service_prefix(line).map(|(service, _)| service)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_names_are_unique_and_lowercase() {
        let mut seen = std::collections::HashSet::new();
        for s in all_services() {
            assert!(seen.insert(s.name()), "duplicate service {s}");
            assert_eq!(s.name(), s.name().to_lowercase());
        }
    }

    #[test]
    fn longest_prefix_wins() {
        let s = identify_service("MOBILE except aeronautical mobile 5.384A").unwrap();
        assert_eq!(s.name(), "mobile except aeronautical mobile");
        let s = identify_service("MOBILE-SATELLITE (Earth-to-space)").unwrap();
        assert_eq!(s.name(), "mobile-satellite");
        let s = identify_service("Mobile 5.380").unwrap();
        assert_eq!(s.name(), "mobile");
    }

    #[test]
    fn aliases_resolve_to_service() {
        let (s, len) = identify_service_prefix("AERONAUTICAL RADIONAVI-GATION 5.444").unwrap();
        assert_eq!(s.name(), "aeronautical radionavigation");
        assert_eq!(len, "aeronautical radionavi-gation".len());
    }

    #[test]
    fn prefix_requires_word_boundary() {
        // "fixed" must not match "fixedly"
        assert!(identify_service("Fixedly 5.1").is_none());
        assert!(identify_service("5.149 5.340").is_none());
    }

    #[test]
    fn abbreviations_and_flags() {
        let ras = identify_service("RADIO ASTRONOMY").unwrap();
        assert_eq!(ras.abbreviation(), "RAS");
        assert!(ras.is_science());
        let fixed = identify_service("FIXED").unwrap();
        assert_eq!(fixed.abbreviation(), "fixed");
        assert!(!fixed.is_science());
        let sr = identify_service("SPACE RESEARCH (passive)").unwrap();
        assert!(sr.is_science_support());
    }

    #[test]
    fn serializes_as_name() {
        let s = identify_service("EARTH EXPLORATION-SATELLITE").unwrap();
        assert_eq!(serde_json::to_string(s).unwrap(), "\"earth exploration-satellite\"");
    }
}
