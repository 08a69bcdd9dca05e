//! Output sanitization.
//!
//! Generated text tends to arrive wrapped in email boilerplate ("Subject:",
//! "Dear ...", sign-offs), credential-looking `KEY=value` lines, and
//! bracketed placeholders. [`SanitizePolicy`] strips those line by line
//! before text is merged into a deliverable. Surviving lines keep their
//! relative order, and the operation is idempotent.

use regex::Regex;

/// Exact lines (lowercased) removed outright.
const UNWANTED_EXACT: &[&str] = &["this concludes the structured research brief."];

/// Case-insensitive line patterns removed outright.
const LINE_PATTERNS: &[&str] = &[
    r"(?i)^subject\s*:.*$",
    r"(?i)^to\s*:.*$",
    r"(?i)^body\s*:.*$",
    r"(?i)^dear\s+.+,$",
    r"(?i)^best\s+regards,?\s*$",
    r"(?i)^email content\s*:.*$",
    r"(?i)^contact\s*$",
    r"(?i)smtp_[a-z_]+\s*=.*",
    r"(?i)imap_[a-z_]+\s*=.*",
    r"(?i)openai_api_key\s*=.*",
];

/// Default block-skip trigger: an instruction line about how to send the
/// email suppresses itself and everything up to the next blank line.
const DEFAULT_TRIGGER: &str = r"(?i)^to\s+send\s+this\s+.*email.*$";

/// Compiled sanitization rules.
///
/// The block-skip trigger is configurable because a false match silently
/// deletes content up to the next blank line; callers with different
/// boilerplate can supply their own pattern via [`SanitizePolicy::with_trigger`].
#[derive(Debug, Clone)]
pub struct SanitizePolicy {
    patterns: Vec<Regex>,
    trigger: Regex,
    placeholder: Regex,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        SanitizePolicy {
            patterns: LINE_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("static sanitize pattern"))
                .collect(),
            trigger: Regex::new(DEFAULT_TRIGGER).expect("static trigger pattern"),
            placeholder: Regex::new(r"^\[[^\]]+\]$").expect("static placeholder pattern"),
        }
    }
}

impl SanitizePolicy {
    /// Replace the block-skip trigger pattern.
    pub fn with_trigger(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.trigger = Regex::new(pattern)?;
        Ok(self)
    }

    /// Strip boilerplate, credentials, placeholders, and blank lines from
    /// `text`, preserving the relative order of surviving lines.
    pub fn sanitize(&self, text: &str) -> String {
        let mut kept: Vec<&str> = Vec::new();
        let mut skip_until_blank = false;

        for line in text.split('\n') {
            let raw = line.trim_end_matches('\r');
            if skip_until_blank {
                if raw.trim().is_empty() {
                    skip_until_blank = false;
                }
                continue;
            }
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            if UNWANTED_EXACT.contains(&trimmed.to_lowercase().as_str()) {
                continue;
            }
            if self.trigger.is_match(raw) {
                skip_until_blank = true;
                continue;
            }
            if self.patterns.iter().any(|rx| rx.is_match(raw)) {
                continue;
            }
            if self.placeholder.is_match(trimmed) {
                continue;
            }
            kept.push(raw);
        }

        kept.join("\n").trim().to_string()
    }
}

/// Sanitize with the default policy.
pub fn sanitize(text: &str) -> String {
    SanitizePolicy::default().sanitize(text)
}
