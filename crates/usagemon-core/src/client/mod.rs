//! Transport to the usage-recording service.
//!
//! [`UsageService`] is the seam the controller talks to; [`HttpUsageClient`]
//! is the production implementation speaking HTTP/JSON.

mod error;
mod http;

use std::future::Future;

pub use error::{BoxError, ClientError};
pub use http::{HttpUsageClient, CHAT_PATH, SUMMARY_PATH};

use crate::usage::{ChatRequest, ChatResponse, UsageRow};

/// The two operations the usage-recording service offers.
///
/// Each call performs exactly one exchange with the service. Implementations
/// never retry and never cache.
pub trait UsageService: Send + Sync + 'static {
    /// Forward a prompt to the model provider through the service
    fn submit_chat(
        &self,
        req: ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, ClientError>> + Send;

    /// Fetch the current per-(model, user) usage rows
    fn fetch_usage_summary(
        &self,
    ) -> impl Future<Output = Result<Vec<UsageRow>, ClientError>> + Send;
}
