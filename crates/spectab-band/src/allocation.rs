//! # Allocations
//!
//! An [`Allocation`] is one service's claim on a band: the service, its
//! [`Priority`], whether it was introduced by footnote text, any
//! parenthesised modifiers, and the footnotes attached to it.
//!
//! ## Table Conventions
//!
//! The Radio Regulations encode priority in typography:
//!
//! ```text
//! RADIO ASTRONOMY 5.149      primary (upper case)
//! Radio astronomy            secondary (capitalised)
//! radio astronomy            footnote mention without a rank
//! ```
//!
//! ## Derived Flags
//!
//! `co_primary` and `exclusive` describe the allocation's standing inside
//! the band that holds it. They are recomputed by [`crate::Band::finalize`]
//! and take no part in equality.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use spectab_core::{glob_match, identify_service_prefix, AllocationError, ServiceRef};

use crate::band::Metadata;

/// Rank of an allocation within a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Primary allocation.
    Primary,
    /// Secondary allocation.
    Secondary,
    /// Neither primary nor secondary. Only footnote mentions carry this.
    Unranked,
}

impl Priority {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Unranked => "unranked",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service assignment within a band.
#[derive(Debug, Clone, Serialize)]
pub struct Allocation {
    service: ServiceRef,
    priority: Priority,
    footnote_mention: bool,
    modifiers: Vec<String>,
    footnotes: Vec<String>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    user_annotations: Metadata,
    co_primary: bool,
    exclusive: bool,
}

impl Allocation {
    /// Create an allocation. [`Priority::Unranked`] requires `footnote_mention`.
    pub fn new(
        service: ServiceRef,
        priority: Priority,
        footnote_mention: bool,
    ) -> Result<Self, AllocationError> {
        if priority == Priority::Unranked && !footnote_mention {
            return Err(AllocationError::ConflictingPriority {
                service: service.name().to_string(),
            });
        }
        Ok(Self {
            service,
            priority,
            footnote_mention,
            modifiers: Vec::new(),
            footnotes: Vec::new(),
            user_annotations: Metadata::new(),
            co_primary: false,
            exclusive: false,
        })
    }

    /// A primary allocation of `service`.
    pub fn primary(service: ServiceRef) -> Self {
        Self::ranked(service, Priority::Primary)
    }

    /// A secondary allocation of `service`.
    pub fn secondary(service: ServiceRef) -> Self {
        Self::ranked(service, Priority::Secondary)
    }

    fn ranked(service: ServiceRef, priority: Priority) -> Self {
        Self {
            service,
            priority,
            footnote_mention: false,
            modifiers: Vec::new(),
            footnotes: Vec::new(),
            user_annotations: Metadata::new(),
            co_primary: false,
            exclusive: false,
        }
    }

    /// Replace the modifiers.
    pub fn with_modifiers<I, S>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modifiers = modifiers.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the footnotes. Duplicates are dropped, first occurrence kept.
    pub fn with_footnotes<I, S>(mut self, footnotes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.footnotes.clear();
        for footnote in footnotes {
            push_unique(&mut self.footnotes, footnote.into());
        }
        self
    }

    /// Replace the user annotations.
    pub fn with_user_annotations(mut self, user_annotations: Metadata) -> Self {
        self.user_annotations = user_annotations;
        self
    }

    /// Flag this allocation as introduced by footnote text.
    pub fn into_footnote_mention(mut self) -> Self {
        self.footnote_mention = true;
        self
    }

    /// Parse one line of table text, e.g. `"MOBILE except aeronautical mobile 5.384A"`.
    ///
    /// Priority comes from the case of the service's first word.
    pub fn parse(line: &str) -> Result<Self, AllocationError> {
        let (service, invocation, remainder) = split_service(line)?;
        let priority = if is_upper(first_word(invocation)) {
            Priority::Primary
        } else {
            Priority::Secondary
        };
        let (modifiers, footnotes) = parse_remainder(remainder, line)?;
        Ok(Self::ranked(service, priority)
            .with_modifiers(modifiers)
            .with_footnotes(footnotes))
    }

    /// Parse a footnote-introduced allocation such as `"radio astronomy 5.149#"`.
    ///
    /// An all-lowercase service yields an unranked mention. The result
    /// always has `footnote_mention` set.
    pub fn parse_footnote_mention(line: &str) -> Result<Self, AllocationError> {
        let (service, invocation, remainder) = split_service(line)?;
        let word = first_word(invocation);
        let priority = if is_upper(word) {
            Priority::Primary
        } else if is_lower(invocation) {
            Priority::Unranked
        } else {
            Priority::Secondary
        };
        let (modifiers, footnotes) = parse_remainder(remainder, line)?;
        Ok(Self::ranked(service, priority)
            .into_footnote_mention()
            .with_modifiers(modifiers)
            .with_footnotes(footnotes))
    }

    /// The service allocated.
    pub fn service(&self) -> ServiceRef {
        self.service
    }

    /// Rank within the band.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// True for a primary allocation.
    pub fn is_primary(&self) -> bool {
        self.priority == Priority::Primary
    }

    /// True for a secondary allocation.
    pub fn is_secondary(&self) -> bool {
        self.priority == Priority::Secondary
    }

    /// True if introduced by footnote text rather than the table itself.
    pub fn is_footnote_mention(&self) -> bool {
        self.footnote_mention
    }

    /// True if the containing band has more than one primary allocation.
    pub fn is_co_primary(&self) -> bool {
        self.co_primary
    }

    /// True if this is the only ranked allocation of the containing band.
    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    /// Parenthesised modifiers, e.g. `Earth-to-space`.
    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    /// Footnotes attached to this allocation.
    pub fn footnotes(&self) -> &[String] {
        &self.footnotes
    }

    /// User-supplied annotations.
    pub fn user_annotations(&self) -> &Metadata {
        &self.user_annotations
    }

    pub(crate) fn set_derived(&mut self, co_primary: bool, exclusive: bool) {
        self.co_primary = co_primary;
        self.exclusive = exclusive;
    }

    /// Render in table typography, optionally without footnotes or modifiers.
    pub fn render(&self, omit_footnotes: bool, omit_modifiers: bool) -> String {
        let name = self.service.name();
        let mut result = match self.priority {
            Priority::Primary => name.to_uppercase(),
            Priority::Secondary => capitalize(name),
            Priority::Unranked => name.to_lowercase(),
        };
        if !omit_modifiers {
            for modifier in &self.modifiers {
                result.push_str(" (");
                result.push_str(modifier);
                result.push(')');
            }
        }
        if self.priority == Priority::Unranked {
            result.push_str(" (by footnote)");
        }
        if !omit_footnotes && !self.footnotes.is_empty() {
            result.push(' ');
            result.push_str(&self.footnotes.join(" "));
        }
        result
    }

    /// Glob-match `pattern` against the rendered allocation.
    pub fn matches(
        &self,
        pattern: &str,
        case_sensitive: bool,
        omit_footnotes: bool,
        omit_modifiers: bool,
    ) -> bool {
        glob_match(
            pattern,
            &self.render(omit_footnotes, omit_modifiers),
            case_sensitive,
        )
    }

    fn identity(&self) -> (Priority, bool, &str, &[String], &[String]) {
        (
            self.priority,
            self.footnote_mention,
            self.service.name(),
            &self.modifiers,
            &self.footnotes,
        )
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false, false))
    }
}

impl PartialEq for Allocation {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Allocation {}

impl Hash for Allocation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl PartialOrd for Allocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Allocation {
    /// Alphabetical by rendering, then by the identity fields.
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string()
            .cmp(&other.to_string())
            .then_with(|| self.identity().cmp(&other.identity()))
    }
}

// ─── Line parsing helpers ────────────────────────────────────────────

fn split_service(line: &str) -> Result<(ServiceRef, &str, &str), AllocationError> {
    let line = line.trim();
    let not_allocation = || AllocationError::NotAllocation(line.to_string());
    let (service, len) = identify_service_prefix(line).ok_or_else(not_allocation)?;
    if !line.is_char_boundary(len) {
        return Err(not_allocation());
    }
    let (invocation, remainder) = line.split_at(len);
    Ok((service, invocation, remainder))
}

/// Split the text after the service into modifiers and footnotes.
///
/// Parenthesised groups become modifiers wherever they appear; every other
/// whitespace-separated token is a footnote.
fn parse_remainder(
    remainder: &str,
    line: &str,
) -> Result<(Vec<String>, Vec<String>), AllocationError> {
    let mut modifiers = Vec::new();
    let mut footnotes = Vec::new();
    let mut rest = remainder.trim_start();
    while !rest.is_empty() {
        if let Some(inner) = rest.strip_prefix('(') {
            let close = inner
                .find(')')
                .ok_or_else(|| AllocationError::Corrupted(line.trim().to_string()))?;
            modifiers.push(inner[..close].trim().to_string());
            rest = inner[close + 1..].trim_start();
        } else {
            let end = rest
                .find(|c: char| c.is_whitespace() || c == '(')
                .unwrap_or(rest.len());
            push_unique(&mut footnotes, rest[..end].to_string());
            rest = rest[end..].trim_start();
        }
    }
    Ok((modifiers, footnotes))
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

fn first_word(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

/// At least one cased character and no lowercase ones.
fn is_upper(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// At least one cased character and no uppercase ones.
fn is_lower(text: &str) -> bool {
    text.chars().any(char::is_lowercase) && !text.chars().any(char::is_uppercase)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
