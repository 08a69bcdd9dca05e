//! Email composition and the transport seam.
//!
//! Composition is pure: recipients are scraped from the request text, the
//! subject comes from the Emailer role's raw output (or a default), and the
//! body is a fixed greeting/sections/closing/signature layout over the
//! sanitized and normalized content-role outputs. Actual delivery happens
//! behind [`MailTransport`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::error::MailError;
use crate::plaintext::to_plain_text;
use crate::roles::{Role, RunKey};
use crate::sanitize::SanitizePolicy;

/// Subject used when the Emailer output carries no `Subject:` line.
pub const DEFAULT_SUBJECT: &str = "Requested topic results";

static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_.+\-]+@[A-Za-z0-9\-]+\.[A-Za-z0-9\-.]+").expect("static regex")
});

/// A composed (subject, body) pair ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

/// The outbound mail seam.
///
/// Implementations (the lettre SMTP adapter in `crewline-mail`, recording
/// fakes in tests) return a human-readable confirmation on success; every
/// failure mode is a [`MailError`], never a panic.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(
        &self,
        subject: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<String, MailError>;
}

/// Extract email addresses from free text, in order of first appearance.
///
/// Duplicates are retained; deduplication is the transport's concern, if it
/// cares at all. The input is never modified.
pub fn extract_recipients(text: &str) -> Vec<String> {
    ADDRESS
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Derive a display name from the local part of an address.
///
/// Splits on `.`, `_`, and `-`, drops numeric-only tokens, and title-cases
/// the rest: `jane.doe42@corp.example` → "Jane Doe". Falls back to the raw
/// address when nothing survives, or "Sender" for an empty address.
pub fn infer_display_name(addr: &str) -> String {
    let local = addr.split('@').next().unwrap_or("");
    let words: Vec<String> = local
        .split(['.', '_', '-'])
        .filter(|part| !part.is_empty() && !part.chars().all(|c| c.is_ascii_digit()))
        .map(capitalize)
        .collect();
    if words.is_empty() {
        if addr.is_empty() {
            "Sender".to_string()
        } else {
            addr.to_string()
        }
    } else {
        words.join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().to_string() + &chars.as_str().to_lowercase(),
    }
}

/// Assemble the fixed body layout: greeting, sections, closing, signature.
pub fn format_email(
    subject: &str,
    greeting: &str,
    sections: &[(String, String)],
    closing: &str,
    signature_lines: &[String],
) -> EmailDraft {
    let mut lines: Vec<String> = Vec::new();
    if !greeting.is_empty() {
        lines.push(greeting.trim().to_string());
        lines.push(String::new());
    }
    for (title, content) in sections {
        let title = title.trim();
        if !title.is_empty() {
            lines.push(title.to_string());
        }
        if !content.is_empty() {
            lines.push(content.trim().to_string());
        }
        lines.push(String::new());
    }
    if !closing.is_empty() {
        lines.push(closing.trim().to_string());
    }
    let signature: Vec<&str> = signature_lines
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !signature.is_empty() {
        lines.push(String::new());
        for line in signature {
            lines.push(line.to_string());
        }
    }
    let body = format!("{}\n", lines.join("\n").trim());
    EmailDraft {
        subject: subject.trim().to_string(),
        body,
    }
}

/// Find a `subject:` line (case-insensitive) in the Emailer's raw output.
fn infer_subject(emailer_output: &str) -> Option<String> {
    for line in emailer_output.lines() {
        if line.trim_start().to_lowercase().starts_with("subject:") {
            let rest = line.splitn(2, ':').nth(1).unwrap_or("").trim();
            if !rest.is_empty() {
                return Some(rest.to_string());
            }
        }
    }
    None
}

/// Compose the deliverable from a run's outputs.
///
/// Content-role outputs (Researcher, Writer, Summarizer, Reviewer) present
/// in `outputs` are sanitized, normalized, and appended as `=== Role ===`
/// sections in canonical order. The signature carries the inferred display
/// name and the sender address.
pub fn compose(
    outputs: &BTreeMap<RunKey, String>,
    sender: &str,
    policy: &SanitizePolicy,
) -> EmailDraft {
    let mut sections: Vec<(String, String)> = Vec::new();
    for role in Role::ALL.into_iter().filter(|r| r.is_content()) {
        if let Some(raw) = outputs.get(&RunKey::Role(role)) {
            let plain = to_plain_text(&policy.sanitize(raw));
            sections.push((format!("=== {role} ==="), plain));
        }
    }

    let subject = outputs
        .get(&RunKey::Role(Role::Emailer))
        .and_then(|raw| infer_subject(raw))
        .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());

    format_email(
        &subject,
        "Dear Recipient,",
        &sections,
        "Best regards,",
        &[infer_display_name(sender), sender.to_string()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_recipients_in_order_with_duplicates() {
        let text = "contact a@b.com or c@d.org, then a@b.com again";
        assert_eq!(
            extract_recipients(text),
            vec!["a@b.com", "c@d.org", "a@b.com"]
        );
    }

    #[test]
    fn test_extract_recipients_empty_when_none() {
        assert!(extract_recipients("no addresses here").is_empty());
    }

    #[test]
    fn test_infer_display_name_splits_and_titlecases() {
        assert_eq!(infer_display_name("jane.doe@corp.example"), "Jane Doe");
        assert_eq!(infer_display_name("mark_twain-77@x.dev"), "Mark Twain");
    }

    #[test]
    fn test_infer_display_name_numeric_only_falls_back_to_address() {
        assert_eq!(infer_display_name("12345@x.dev"), "12345@x.dev");
        assert_eq!(infer_display_name(""), "Sender");
    }

    #[test]
    fn test_format_email_layout() {
        let draft = format_email(
            " Hi ",
            "Dear Recipient,",
            &[("=== Researcher ===".to_string(), "findings".to_string())],
            "Best regards,",
            &["Jane Doe".to_string(), "jane@x.dev".to_string()],
        );
        assert_eq!(draft.subject, "Hi");
        assert_eq!(
            draft.body,
            "Dear Recipient,\n\n=== Researcher ===\nfindings\n\nBest regards,\n\nJane Doe\njane@x.dev\n"
        );
    }

    #[test]
    fn test_compose_uses_emailer_subject_line() {
        let mut outputs = BTreeMap::new();
        outputs.insert(RunKey::Role(Role::Researcher), "some findings".to_string());
        outputs.insert(
            RunKey::Role(Role::Emailer),
            "Subject: Weekly digest\nhello".to_string(),
        );
        let draft = compose(&outputs, "ops@x.dev", &SanitizePolicy::default());
        assert_eq!(draft.subject, "Weekly digest");
        assert!(draft.body.contains("=== Researcher ==="));
        // Emailer output never becomes a body section.
        assert!(!draft.body.contains("=== Emailer ==="));
    }

    #[test]
    fn test_compose_falls_back_to_default_subject() {
        let mut outputs = BTreeMap::new();
        outputs.insert(RunKey::Role(Role::Writer), "an article".to_string());
        let draft = compose(&outputs, "ops@x.dev", &SanitizePolicy::default());
        assert_eq!(draft.subject, DEFAULT_SUBJECT);
    }

    #[test]
    fn test_compose_sections_follow_canonical_order() {
        let mut outputs = BTreeMap::new();
        outputs.insert(RunKey::Role(Role::Reviewer), "review".to_string());
        outputs.insert(RunKey::Role(Role::Researcher), "research".to_string());
        let draft = compose(&outputs, "ops@x.dev", &SanitizePolicy::default());
        let research_at = draft.body.find("=== Researcher ===").unwrap();
        let review_at = draft.body.find("=== Reviewer ===").unwrap();
        assert!(research_at < review_at);
    }

    #[test]
    fn test_compose_sanitizes_section_content() {
        let mut outputs = BTreeMap::new();
        outputs.insert(
            RunKey::Role(Role::Researcher),
            "SMTP_PASSWORD=secret123\nreal findings".to_string(),
        );
        let draft = compose(&outputs, "ops@x.dev", &SanitizePolicy::default());
        assert!(!draft.body.contains("secret123"));
        assert!(draft.body.contains("real findings"));
    }
}
