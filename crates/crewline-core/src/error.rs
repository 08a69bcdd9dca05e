//! Error taxonomy for dispatch and delivery.

/// Errors produced by the dispatch layer.
///
/// Delivery-side problems (unconfigured transport, send failures) are never
/// surfaced here — they become result strings under the `Email Delivery`
/// key so partial results always reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown role '{name}': valid roles are {valid}")]
    UnknownRole { name: String, valid: &'static str },

    #[error("no role could be decided for the request")]
    NoRolesDecided,

    #[error("completion provider error: {0}")]
    Completion(String),
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Errors produced by a mail transport.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("SMTP not configured: set {missing}")]
    NotConfigured { missing: String },

    #[error("invalid email address '{0}'")]
    InvalidAddress(String),

    #[error("message build failed: {0}")]
    Build(String),

    #[error("smtp send failed: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_display_names_the_valid_set() {
        let err = DispatchError::UnknownRole {
            name: "Planner".to_string(),
            valid: "Researcher, Writer",
        };
        let msg = err.to_string();
        assert!(msg.contains("unknown role 'Planner'"));
        assert!(msg.contains("Researcher, Writer"));
    }

    #[test]
    fn test_mail_error_not_configured_lists_missing_vars() {
        let err = MailError::NotConfigured {
            missing: "SMTP_USERNAME, SMTP_PASSWORD".to_string(),
        };
        assert!(err.to_string().contains("SMTP_USERNAME, SMTP_PASSWORD"));
    }
}
