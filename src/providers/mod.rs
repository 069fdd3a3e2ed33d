//! Generation provider implementations

use async_trait::async_trait;

pub mod gemini;

// Re-export for convenience
pub use gemini::GeminiClient;

/// Something that can humanize text with one remote call.
///
/// Implementations must be stateless and reentrant. Every failure is
/// reported as `Error::GenerationFailed`; the detailed cause goes to the log.
#[async_trait]
pub trait Humanize: Send + Sync
{   async fn humanize(
      &self
    , request: &crate::HumanizeRequest
    ) -> Result<String, crate::error::Error>;
}
