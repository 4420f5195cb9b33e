// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative structural grouping rules.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Matches a structural node name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pattern {
    /// The whole name.
    Exact(String),
    /// A leading part of the name.
    Prefix(String),
    /// Any part of the name.
    Contains(String),
}

impl Pattern {
    /// Whether `name` matches.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(p) => name == p,
            Self::Prefix(p) => name.starts_with(p.as_str()),
            Self::Contains(p) => name.contains(p.as_str()),
        }
    }

    /// Specificity rank: `Exact` > `Prefix` > `Contains`.
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Exact(_) => 2,
            Self::Prefix(_) => 1,
            Self::Contains(_) => 0,
        }
    }

    /// Pattern text.
    pub fn text(&self) -> &str {
        match self {
            Self::Exact(p) | Self::Prefix(p) | Self::Contains(p) => p,
        }
    }
}

/// How a rule's group behaves.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupKind {
    /// A plain group.
    Ordinary,
    /// While any element lands here, every other group is hidden.
    ///
    /// Among several overlay rules the highest `priority` wins.
    Overlay {
        /// Higher wins.
        priority: i32,
    },
    /// A collapsible section behind a disclosure widget.
    ///
    /// Every matching ancestor forms its own instance. The element whose name
    /// matches `toggle` is the disclosure widget, the rest are members.
    Folder {
        /// Pattern for the disclosure widget.
        toggle: Pattern,
    },
}

/// One entry of the rule table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupRule {
    /// Group label to present.
    pub label: String,
    /// Pattern matched against ancestor names.
    pub pattern: Pattern,
    /// Group behavior.
    pub kind: GroupKind,
}

impl GroupRule {
    /// An ordinary group.
    pub fn ordinary(label: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            label: label.into(),
            pattern,
            kind: GroupKind::Ordinary,
        }
    }

    /// An overlay-exclusive group.
    pub fn overlay(label: impl Into<String>, pattern: Pattern, priority: i32) -> Self {
        Self {
            label: label.into(),
            pattern,
            kind: GroupKind::Overlay { priority },
        }
    }

    /// A folder group.
    pub fn folder(label: impl Into<String>, pattern: Pattern, toggle: Pattern) -> Self {
        Self {
            label: label.into(),
            pattern,
            kind: GroupKind::Folder { toggle },
        }
    }
}

/// Problems found while validating a rule table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleError {
    /// A rule (or folder toggle) has an empty pattern.
    EmptyPattern {
        /// Label of the offending rule.
        label: String,
    },
    /// Two rules share a label.
    DuplicateLabel(String),
    /// A folder's toggle pattern is the same as its scope pattern.
    ToggleIsScope {
        /// Label of the offending rule.
        label: String,
    },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPattern { label } => write!(f, "group rule `{label}` has an empty pattern"),
            Self::DuplicateLabel(label) => write!(f, "group label `{label}` is declared twice"),
            Self::ToggleIsScope { label } => {
                write!(f, "folder rule `{label}` uses its scope pattern as the toggle")
            }
        }
    }
}

impl core::error::Error for RuleError {}

/// Validated, ordered rule table.
///
/// Declaration order is significant: it breaks specificity ties and fixes
/// the order groups are presented in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<GroupRule>,
    catch_all: String,
}

impl Default for RuleTable {
    /// A table with no rules; everything lands in the catch-all group.
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            catch_all: String::from("Other"),
        }
    }
}

impl RuleTable {
    /// Validate `rules` into a table.
    pub fn new(rules: Vec<GroupRule>) -> Result<Self, RuleError> {
        for (i, rule) in rules.iter().enumerate() {
            if rule.pattern.text().is_empty() {
                return Err(RuleError::EmptyPattern {
                    label: rule.label.clone(),
                });
            }
            if let GroupKind::Folder { toggle } = &rule.kind {
                if toggle.text().is_empty() {
                    return Err(RuleError::EmptyPattern {
                        label: rule.label.clone(),
                    });
                }
                if *toggle == rule.pattern {
                    return Err(RuleError::ToggleIsScope {
                        label: rule.label.clone(),
                    });
                }
            }
            if rules[..i].iter().any(|r| r.label == rule.label) {
                return Err(RuleError::DuplicateLabel(rule.label.clone()));
            }
        }
        Ok(Self {
            rules,
            ..Self::default()
        })
    }

    /// Replace the catch-all label (defaults to `"Other"`).
    pub fn with_catch_all_label(mut self, label: impl Into<String>) -> Self {
        self.catch_all = label.into();
        self
    }

    /// Catch-all label.
    pub fn catch_all_label(&self) -> &str {
        &self.catch_all
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[GroupRule] {
        &self.rules
    }

    /// Rule at `index`.
    pub fn get(&self, index: usize) -> Option<&GroupRule> {
        self.rules.get(index)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Best rule for a single name: highest rank, then longest pattern, then
    /// earliest declaration.
    pub(crate) fn best_match(&self, name: &str) -> Option<usize> {
        let mut best: Option<(usize, u8, usize)> = None;
        for (i, rule) in self.rules.iter().enumerate() {
            if !rule.pattern.matches(name) {
                continue;
            }
            let rank = rule.pattern.rank();
            let len = rule.pattern.text().len();
            let better = match best {
                None => true,
                Some((_, r, l)) => (rank, len) > (r, l),
            };
            if better {
                best = Some((i, rank, len));
            }
        }
        best.map(|(i, ..)| i)
    }
}
