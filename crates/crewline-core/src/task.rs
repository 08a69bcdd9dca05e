//! Per-role task generation.
//!
//! A [`TaskSpec`] is a pure rendering of (role, request): the same pair
//! always produces the same spec, and no role's task depends on another
//! role's output.

use crate::roles::Role;

/// A rendered unit of work for one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub role: Role,
    /// Full instruction prompt, embedding the verbatim request text.
    pub description: String,
    /// Contract describing the expected shape of the role's answer.
    pub expected_output: &'static str,
}

impl TaskSpec {
    /// Render the fixed instruction template for `role` around `request`.
    pub fn for_role(role: Role, request: &str) -> TaskSpec {
        let (description, expected_output) = match role {
            Role::Researcher => (
                format!(
                    "You are the Researcher. Conduct thorough, factual research on the topic below.\n\
                     - Provide structured sections with bullet points.\n\
                     - Cite key sources or references (titles/links if known).\n\
                     - Avoid writing prose articles; focus on findings.\n\n\
                     Topic: {request}"
                ),
                "A structured research brief with key findings, evidence, and sources.",
            ),
            Role::Writer => (
                format!(
                    "You are the Writer. Create an engaging, well-structured article based on the topic below.\n\
                     - Include a clear intro, body with subheadings, and a conclusion.\n\
                     - Maintain a cohesive narrative; do not list bullets only.\n\n\
                     Topic: {request}"
                ),
                "A polished article (500-800 words) with headings and clear flow.",
            ),
            Role::Summarizer => (
                format!(
                    "You are the Summarizer. Produce a concise summary of the topic below.\n\
                     - Capture only the most important points.\n\
                     - Use short bullet points and keep it under 150 words.\n\n\
                     Topic: {request}"
                ),
                "A bullet-point summary under 150 words highlighting key takeaways.",
            ),
            Role::Reviewer => (
                format!(
                    "You are the Reviewer. Critically review the content/topic below.\n\
                     - Identify strengths, weaknesses, and potential improvements.\n\
                     - Provide 3-5 actionable suggestions.\n\n\
                     Subject: {request}"
                ),
                "A concise review with strengths, weaknesses, and 3-5 concrete improvements.",
            ),
            Role::Emailer => (
                format!(
                    "You are the Emailer. Draft a concise, professional email based on the user's request and any prior content.\n\
                     - Include a clear subject line.\n\
                     - Keep the body brief with key points.\n\
                     - Close with an appropriate sign-off.\n\n\
                     Prompt: {request}"
                ),
                "A subject line and short email body ready to be sent.",
            ),
        };
        TaskSpec {
            role,
            description,
            expected_output,
        }
    }
}
