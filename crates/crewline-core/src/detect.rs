//! Role detection: deterministic keyword matching with a delegated fallback.
//!
//! The explicit pass never touches the completion provider. The delegated
//! pass asks the provider to pick roles and parses the answer defensively —
//! unknown tokens and duplicates are discarded, never errors.

use tracing::debug;

use crate::completion::CompletionProvider;
use crate::error::{DispatchError, Result};
use crate::roles::{Role, VALID_ROLE_NAMES};

/// Scan `request` for role keywords.
///
/// Returns matched roles in canonical order, without duplicates. Matching is
/// substring containment over the lowercased request, so "Summarise this"
/// and "summarizer" both select the Summarizer.
pub fn detect_explicit(request: &str) -> Vec<Role> {
    let text = request.to_lowercase();
    Role::ALL
        .into_iter()
        .filter(|role| role.keywords().iter().any(|kw| text.contains(kw)))
        .collect()
}

/// Parse a comma-separated role-name response from the delegated decider.
///
/// Tokens are split on commas and newlines, trimmed, and matched
/// case-insensitively against the canonical names. Unmatched and duplicate
/// tokens are dropped; parsing stops once `max_roles` roles are collected.
/// The surviving roles are returned in canonical order.
pub fn parse_role_list(response: &str, max_roles: usize) -> Vec<Role> {
    let mut roles: Vec<Role> = Vec::new();
    for token in response.split(['\n', ',']) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if let Some(role) = Role::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(token))
        {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        if roles.len() >= max_roles {
            break;
        }
    }
    roles.sort();
    roles
}

/// Parse a single-role response: the first canonical name contained anywhere
/// in the text (case-insensitive), or `None` when no name appears.
pub fn parse_single_role(response: &str) -> Option<Role> {
    let text = response.to_lowercase();
    Role::ALL
        .into_iter()
        .find(|role| text.contains(&role.name().to_lowercase()))
}

/// Ask the provider to choose up to `max_roles` roles for `request`.
///
/// `max_roles` is clamped to 1..=5. Returns the usable roles in canonical
/// order; an empty vec means the answer contained no canonical name, which
/// callers must treat as [`DispatchError::NoRolesDecided`], not as "no roles
/// needed".
pub async fn decide_roles(
    provider: &dyn CompletionProvider,
    request: &str,
    max_roles: usize,
) -> Result<Vec<Role>> {
    let num = max_roles.clamp(1, 5);
    let prompt = format!(
        "You are the Orchestrator. Choose the top roles that should work on the user's request.\n\
         Valid roles: {VALID_ROLE_NAMES}.\n\
         Return only the role names, comma-separated, no extra words.\n\
         Number of roles to return: {num}\n\n\
         User request: {request}"
    );
    let expected = "Comma-separated list of roles from: Researcher, Writer, Summarizer, Reviewer, Emailer";

    let response = provider
        .complete(&prompt, expected)
        .await
        .map_err(|e| DispatchError::Completion(e.to_string()))?;

    let roles = parse_role_list(&response, num);
    debug!(?roles, raw = %response.trim(), "delegated role decision");
    Ok(roles)
}

/// Ask the provider to choose exactly one role for `request`.
///
/// Returns `Ok(None)` when the answer contains none of the canonical names.
pub async fn decide_single_role(
    provider: &dyn CompletionProvider,
    request: &str,
) -> Result<Option<Role>> {
    let prompt = format!(
        "You are the Orchestrator. Decide which single role should handle the user's request.\n\
         Valid roles: {VALID_ROLE_NAMES}.\n\
         Return only the role name with no extra words.\n\n\
         User request: {request}"
    );
    let expected = "One of: Researcher | Writer | Summarizer | Reviewer | Emailer";

    let response = provider
        .complete(&prompt, expected)
        .await
        .map_err(|e| DispatchError::Completion(e.to_string()))?;

    Ok(parse_single_role(&response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct CannedProvider(String);

    #[async_trait]
    impl CompletionProvider for CannedProvider {
        async fn complete(&self, _prompt: &str, _expected: &str) -> anyhow::Result<String> {
            Ok(self.0.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl CompletionProvider for FailingProvider {
        async fn complete(&self, _prompt: &str, _expected: &str) -> anyhow::Result<String> {
            anyhow::bail!("backend unreachable")
        }
    }

    #[test]
    fn test_detect_explicit_returns_canonical_order() {
        let roles = detect_explicit("Review this draft and then summarize it");
        // "draft" → Writer, "summarize" → Summarizer, "review" → Reviewer
        assert_eq!(roles, vec![Role::Writer, Role::Summarizer, Role::Reviewer]);
    }

    #[test]
    fn test_detect_explicit_handles_misspellings() {
        assert_eq!(detect_explicit("please summerize this"), vec![Role::Summarizer]);
        assert_eq!(detect_explicit("reseach black holes"), vec![Role::Researcher]);
        assert_eq!(detect_explicit("send an e-mail about it"), vec![Role::Emailer]);
    }

    #[test]
    fn test_detect_explicit_never_duplicates() {
        let roles = detect_explicit("research and research and investigate");
        assert_eq!(roles, vec![Role::Researcher]);
    }

    #[test]
    fn test_detect_explicit_empty_for_neutral_text() {
        assert!(detect_explicit("hello there").is_empty());
    }

    #[test]
    fn test_parse_role_list_discards_junk_and_duplicates() {
        let roles = parse_role_list("Writer, Plumber, writer,\nReviewer", 5);
        assert_eq!(roles, vec![Role::Writer, Role::Reviewer]);
    }

    #[test]
    fn test_parse_role_list_caps_then_sorts_canonically() {
        let roles = parse_role_list("Emailer, Reviewer, Researcher", 2);
        // Cap keeps the first two usable tokens, then sorts canonically.
        assert_eq!(roles, vec![Role::Reviewer, Role::Emailer]);
    }

    #[test]
    fn test_parse_role_list_empty_response() {
        assert!(parse_role_list("", 3).is_empty());
        assert!(parse_role_list("none of the above", 3).is_empty());
    }

    #[test]
    fn test_parse_single_role_matches_by_containment() {
        assert_eq!(
            parse_single_role("The best fit is the Writer role."),
            Some(Role::Writer)
        );
        assert_eq!(parse_single_role("no idea"), None);
    }

    #[tokio::test]
    async fn test_decide_roles_parses_provider_answer() {
        let provider = CannedProvider("Reviewer, Writer".to_string());
        let roles = decide_roles(&provider, "do something", 5).await.unwrap();
        assert_eq!(roles, vec![Role::Writer, Role::Reviewer]);
    }

    #[tokio::test]
    async fn test_decide_roles_clamps_max() {
        let provider = CannedProvider("Researcher, Writer, Summarizer".to_string());
        let roles = decide_roles(&provider, "do something", 0).await.unwrap();
        assert_eq!(roles, vec![Role::Researcher]);
    }

    #[tokio::test]
    async fn test_decide_roles_surfaces_provider_failure() {
        let err = decide_roles(&FailingProvider, "do something", 3)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Completion(_)));
    }

    #[tokio::test]
    async fn test_decide_single_role_none_for_unusable_answer() {
        let provider = CannedProvider("42".to_string());
        assert_eq!(decide_single_role(&provider, "x").await.unwrap(), None);
    }
}
