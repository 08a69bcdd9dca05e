//! Core role vocabulary: `Role`, `RunKey`, and the keyword aliases used by
//! explicit detection.

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

/// The canonical role names, comma-joined, for error messages and prompts.
pub const VALID_ROLE_NAMES: &str = "Researcher, Writer, Summarizer, Reviewer, Emailer";

/// The five specialist roles a request can be routed to.
///
/// Variant declaration order is the canonical dispatch order; the derived
/// `Ord` therefore sorts roles canonically, and a `BTreeMap` keyed by
/// [`RunKey`] iterates in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Researcher,
    Writer,
    Summarizer,
    Reviewer,
    Emailer,
}

impl Role {
    /// All roles in canonical order.
    pub const ALL: [Role; 5] = [
        Role::Researcher,
        Role::Writer,
        Role::Summarizer,
        Role::Reviewer,
        Role::Emailer,
    ];

    /// Canonical capitalized name, as used in result keys and prompts.
    pub fn name(self) -> &'static str {
        match self {
            Role::Researcher => "Researcher",
            Role::Writer => "Writer",
            Role::Summarizer => "Summarizer",
            Role::Reviewer => "Reviewer",
            Role::Emailer => "Emailer",
        }
    }

    /// Keyword aliases that select this role during explicit detection.
    ///
    /// Includes common misspellings ("reseach", "summerize") so a typo'd
    /// request still routes to the intended role. Matching is substring
    /// containment over the lowercased request.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Role::Researcher => &["research", "reseach", "reaearch", "investigate", "explore"],
            Role::Writer => &["write", "writer", "article", "draft", "compose"],
            Role::Summarizer => &["summarize", "summary", "summarise", "summerize"],
            Role::Reviewer => &["review", "critique", "evaluate"],
            Role::Emailer => &[
                "email",
                "e-mail",
                "mail",
                "send mail",
                "send email",
                "send a mail",
                "send to",
                "mail to",
            ],
        }
    }

    /// Whether this role contributes a content section to a composed email.
    ///
    /// The Emailer's output only informs the subject line; it is never a
    /// body section.
    pub fn is_content(self) -> bool {
        !matches!(self, Role::Emailer)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Role {
    type Err = DispatchError;

    /// Case-insensitive exact-name match. Unknown names report the valid set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DispatchError::UnknownRole {
                name: wanted.to_string(),
                valid: VALID_ROLE_NAMES,
            })
    }
}

/// Key type for the per-run output map.
///
/// Derived `Ord` places the five roles first (canonical order), then the
/// synthetic delivery entry, so iteration over a `BTreeMap<RunKey, String>`
/// renders results in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RunKey {
    Role(Role),
    EmailDelivery,
}

impl std::fmt::Display for RunKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunKey::Role(role) => f.write_str(role.name()),
            RunKey::EmailDelivery => f.write_str("Email Delivery"),
        }
    }
}
