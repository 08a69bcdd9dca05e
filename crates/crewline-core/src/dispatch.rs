//! The dispatcher: role selection, per-role execution, delivery gate.
//!
//! A [`Pipeline`] owns the injected completion provider and (optionally) a
//! mail transport. Each call to [`Pipeline::run`] is self-contained: it
//! builds a fresh [`RunResult`] and shares no state with other runs.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::completion::CompletionProvider;
use crate::detect::{decide_roles, detect_explicit};
use crate::email::{compose, extract_recipients, MailTransport};
use crate::error::{DispatchError, Result};
use crate::roles::{Role, RunKey};
use crate::sanitize::SanitizePolicy;
use crate::task::TaskSpec;

/// Placeholder recorded for roles outside a forced-role run.
pub const NOT_RELATED: &str = "Not related to this agent";

/// Placeholder the caller may render for roles an orchestrated run skipped.
pub const NOT_SELECTED: &str = "Not selected";

/// Delivery-gate message when no address was found in the request.
pub const NO_RECIPIENTS: &str = "No valid email addresses found in the prompt.";

/// How a run selects its roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Execute every role, independent of request content.
    All,
    /// Execute exactly one role; fill the rest with [`NOT_RELATED`].
    Forced(Role),
    /// Keyword detection, delegated fallback, delivery gate.
    Orchestrated { max_roles: usize },
}

/// Per-run output map: role (and delivery) key → produced text or
/// placeholder. `BTreeMap` over [`RunKey`] keeps canonical ordering.
pub type RunResult = BTreeMap<RunKey, String>;

/// The role dispatch and delivery pipeline.
pub struct Pipeline {
    provider: Arc<dyn CompletionProvider>,
    mail: Option<Arc<dyn MailTransport>>,
    sender: String,
    policy: SanitizePolicy,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Pipeline {
            provider,
            mail: None,
            sender: String::new(),
            policy: SanitizePolicy::default(),
        }
    }

    /// Attach an outbound transport and the configured sender address.
    pub fn with_mail(mut self, mail: Arc<dyn MailTransport>, sender: impl Into<String>) -> Self {
        self.mail = Some(mail);
        self.sender = sender.into();
        self
    }

    /// Override the sanitization policy applied before composition.
    pub fn with_sanitize_policy(mut self, policy: SanitizePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Execute `request` under `mode`.
    ///
    /// Decision failures ([`DispatchError::NoRolesDecided`]) are errors;
    /// everything past role selection degrades into result entries instead
    /// — a failing role or a failing send never discards sibling outputs.
    #[instrument(skip(self, request), fields(mode = ?mode))]
    pub async fn run(&self, request: &str, mode: RunMode) -> Result<RunResult> {
        match mode {
            RunMode::All => self.run_all(request).await,
            RunMode::Forced(role) => self.run_forced(request, role).await,
            RunMode::Orchestrated { max_roles } => self.run_orchestrated(request, max_roles).await,
        }
    }

    async fn run_all(&self, request: &str) -> Result<RunResult> {
        let mut outputs = RunResult::new();
        for role in Role::ALL {
            let text = self.run_role(role, request).await;
            outputs.insert(RunKey::Role(role), text);
        }
        Ok(outputs)
    }

    async fn run_forced(&self, request: &str, role: Role) -> Result<RunResult> {
        let mut outputs = RunResult::new();
        for other in Role::ALL {
            outputs.insert(RunKey::Role(other), NOT_RELATED.to_string());
        }
        let text = self.run_role(role, request).await;
        outputs.insert(RunKey::Role(role), text);
        Ok(outputs)
    }

    async fn run_orchestrated(&self, request: &str, max_roles: usize) -> Result<RunResult> {
        let explicit = detect_explicit(request);
        let roles = if explicit.is_empty() {
            decide_roles(self.provider.as_ref(), request, max_roles).await?
        } else {
            explicit
        };
        if roles.is_empty() {
            return Err(DispatchError::NoRolesDecided);
        }
        info!(?roles, "dispatching selected roles");

        let mut outputs = RunResult::new();
        for role in &roles {
            let text = self.run_role(*role, request).await;
            outputs.insert(RunKey::Role(*role), text);
        }

        let recipients = extract_recipients(request);
        if roles.contains(&Role::Emailer) || !recipients.is_empty() {
            let outcome = self.deliver(&outputs, &recipients).await;
            outputs.insert(RunKey::EmailDelivery, outcome);
        }

        Ok(outputs)
    }

    /// Run one role, isolating provider failures into a message entry.
    async fn run_role(&self, role: Role, request: &str) -> String {
        let spec = TaskSpec::for_role(role, request);
        match self
            .provider
            .complete(&spec.description, spec.expected_output)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(role = %role, error = %e, "role completion failed");
                format!("{role} failed: {e}")
            }
        }
    }

    /// The delivery gate. Only called when the gate condition held.
    async fn deliver(&self, outputs: &RunResult, recipients: &[String]) -> String {
        if recipients.is_empty() {
            return NO_RECIPIENTS.to_string();
        }
        let draft = compose(outputs, &self.sender, &self.policy);
        let Some(mail) = &self.mail else {
            return "SMTP not configured. Set SMTP_HOST, SMTP_PORT, SMTP_USERNAME, SMTP_PASSWORD, and SMTP_FROM."
                .to_string();
        };
        match mail.send(&draft.subject, &draft.body, recipients).await {
            Ok(confirmation) => {
                info!(recipients = recipients.len(), "email delivered");
                confirmation
            }
            Err(e) => {
                warn!(error = %e, "email delivery failed");
                format!("Failed to send email: {e}")
            }
        }
    }
}
