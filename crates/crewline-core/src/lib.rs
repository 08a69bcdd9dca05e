//! Crewline Core Library
//!
//! Routes a single free-text request to one or more specialist roles,
//! executes each against a pluggable completion provider, sanitizes and
//! merges the outputs, and optionally composes an email deliverable.
//!
//! # Module layout
//!
//! - [`roles`] — `Role`, `RunKey`, keyword aliases
//! - [`task`] — per-role `TaskSpec` templates
//! - [`completion`] — `CompletionProvider` seam
//! - [`detect`] — explicit keyword pass + delegated decision
//! - [`sanitize`] — boilerplate/credential/placeholder stripping
//! - [`plaintext`] — markdown-to-plain-text normalization
//! - [`email`] — recipient extraction, composition, `MailTransport` seam
//! - [`dispatch`] — `Pipeline`, `RunMode`, `RunResult`, delivery gate
//! - [`error`] — `DispatchError`, `MailError`
//! - [`telemetry`] — tracing init

pub mod completion;
pub mod detect;
pub mod dispatch;
pub mod email;
pub mod error;
pub mod plaintext;
pub mod roles;
pub mod sanitize;
pub mod task;
pub mod telemetry;

pub use completion::CompletionProvider;
pub use detect::{decide_roles, decide_single_role, detect_explicit, parse_role_list, parse_single_role};
pub use dispatch::{Pipeline, RunMode, RunResult, NOT_RELATED, NOT_SELECTED, NO_RECIPIENTS};
pub use email::{
    compose, extract_recipients, format_email, infer_display_name, EmailDraft, MailTransport,
    DEFAULT_SUBJECT,
};
pub use error::{DispatchError, MailError, Result};
pub use plaintext::to_plain_text;
pub use roles::{Role, RunKey, VALID_ROLE_NAMES};
pub use sanitize::{sanitize, SanitizePolicy};
pub use task::TaskSpec;
pub use telemetry::init_tracing;

/// Crewline version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
