//! The generation-capability seam.
//!
//! The dispatcher only ever sees [`CompletionProvider`]; concrete backends
//! (the OpenAI-compatible HTTP client in `crewline-llm`, scripted fakes in
//! tests) are injected as `Arc<dyn CompletionProvider>`.

use async_trait::async_trait;

/// An opaque text-completion service.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Produce text for `prompt`.
    ///
    /// `expected_output` is a short contract describing the shape of the
    /// desired answer; backends typically pass it as a system instruction.
    /// Callers must tolerate empty responses — an empty string is a valid
    /// (if useless) completion, not an error.
    async fn complete(&self, prompt: &str, expected_output: &str) -> anyhow::Result<String>;
}
