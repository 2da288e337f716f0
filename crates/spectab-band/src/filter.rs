//! Allocation predicates used by band queries and collection searches.

use serde::{Deserialize, Serialize};

use crate::allocation::Allocation;
use crate::band::Metadata;

/// Selects allocations by glob pattern and flag values.
///
/// Unset flags match anything. The pattern is matched against the
/// allocation rendered without footnotes; `but_not` against the full
/// rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationFilter {
    /// Glob the allocation must match.
    pub pattern: String,
    /// Glob the allocation must not match.
    #[serde(default)]
    pub but_not: Option<String>,
    /// Required primary flag.
    #[serde(default)]
    pub primary: Option<bool>,
    /// Required secondary flag.
    #[serde(default)]
    pub secondary: Option<bool>,
    /// Required footnote-mention flag.
    #[serde(default)]
    pub footnote_mention: Option<bool>,
    /// Required co-primary flag.
    #[serde(default)]
    pub co_primary: Option<bool>,
    /// Required exclusive flag.
    #[serde(default)]
    pub exclusive: Option<bool>,
    /// Match case exactly.
    #[serde(default)]
    pub case_sensitive: bool,
    /// Key/value pairs the allocation's user annotations must contain.
    #[serde(default)]
    pub user_annotations: Metadata,
}

impl AllocationFilter {
    /// Filter on `pattern` alone.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Exclude allocations matching `pattern`.
    pub fn but_not(mut self, pattern: impl Into<String>) -> Self {
        self.but_not = Some(pattern.into());
        self
    }

    /// Require the primary flag.
    pub fn primary(mut self, value: bool) -> Self {
        self.primary = Some(value);
        self
    }

    /// Require the secondary flag.
    pub fn secondary(mut self, value: bool) -> Self {
        self.secondary = Some(value);
        self
    }

    /// Require the footnote-mention flag.
    pub fn footnote_mention(mut self, value: bool) -> Self {
        self.footnote_mention = Some(value);
        self
    }

    /// Require the co-primary flag.
    pub fn co_primary(mut self, value: bool) -> Self {
        self.co_primary = Some(value);
        self
    }

    /// Require the exclusive flag.
    pub fn exclusive(mut self, value: bool) -> Self {
        self.exclusive = Some(value);
        self
    }

    /// Match case exactly.
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Require a user annotation.
    pub fn user_annotation(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.user_annotations.insert(key.into(), value);
        self
    }

    /// Whether `allocation` passes every criterion.
    pub fn accepts(&self, allocation: &Allocation) -> bool {
        if !allocation.matches(&self.pattern, self.case_sensitive, true, false) {
            return false;
        }
        let flags = [
            (self.primary, allocation.is_primary()),
            (self.secondary, allocation.is_secondary()),
            (self.footnote_mention, allocation.is_footnote_mention()),
            (self.co_primary, allocation.is_co_primary()),
            (self.exclusive, allocation.is_exclusive()),
        ];
        if flags
            .iter()
            .any(|(wanted, actual)| wanted.is_some_and(|w| w != *actual))
        {
            return false;
        }
        if let Some(but_not) = &self.but_not {
            if allocation.matches(but_not, self.case_sensitive, false, false) {
                return false;
            }
        }
        self.user_annotations
            .iter()
            .all(|(key, value)| allocation.user_annotations().get(key) == Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Band, Bounds};

    fn band() -> Band {
        Band::builder(Bounds::parse("1400-1427 MHz", None).unwrap())
            .primary(Allocation::parse("EARTH EXPLORATION-SATELLITE (passive)").unwrap())
            .primary(Allocation::parse("RADIO ASTRONOMY").unwrap())
            .primary(Allocation::parse("SPACE RESEARCH (passive) 5.340").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn pattern_ignores_footnotes() {
        let b = band();
        assert!(b.has_allocation(&AllocationFilter::new("space research (passive)")));
        assert!(b.has_allocation(&AllocationFilter::new("*passive*").co_primary(true)));
        assert!(!b.has_allocation(&AllocationFilter::new("*").exclusive(true)));
    }

    #[test]
    fn but_not_excludes() {
        let b = band();
        let found = b
            .find_allocation(&AllocationFilter::new("*(passive)*").but_not("earth*"))
            .unwrap();
        assert_eq!(found.service().name(), "space research");
    }

    #[test]
    fn case_sensitive_filter() {
        let b = band();
        assert!(!b.has_allocation(&AllocationFilter::new("Radio astronomy").case_sensitive()));
        assert!(b.has_allocation(&AllocationFilter::new("RADIO ASTRONOMY").case_sensitive()));
    }

    #[test]
    fn user_annotations_must_all_match() {
        let mut notes = Metadata::new();
        notes.insert("watch".into(), serde_json::json!(true));
        let b = Band::builder(Bounds::parse("1-2 MHz", None).unwrap())
            .primary(Allocation::parse("FIXED").unwrap().with_user_annotations(notes))
            .primary(Allocation::parse("MOBILE").unwrap())
            .build()
            .unwrap();
        let watched = AllocationFilter::new("*").user_annotation("watch", serde_json::json!(true));
        assert_eq!(b.find_allocation(&watched).unwrap().to_string(), "FIXED");
        let other = AllocationFilter::new("mobile").user_annotation("watch", serde_json::json!(true));
        assert!(!b.has_allocation(&other));
    }

    #[test]
    fn deserializes_with_defaults() {
        let f: AllocationFilter = serde_json::from_str(r#"{"pattern": "radio astronomy*"}"#).unwrap();
        assert_eq!(f, AllocationFilter::new("radio astronomy*"));
    }
}
