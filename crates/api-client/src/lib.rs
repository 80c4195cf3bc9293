pub mod client;
pub mod error;
pub mod feeds;
pub mod providers;
pub mod retry;
pub mod slack;
pub mod voice;

pub use client::{DashboardClient, OpsClient};
pub use error::ClientError;
pub use feeds::{GovernmentClient, NewsApiClient};
pub use jarvis_api;
pub use providers::ChatClient;
pub use retry::RetryConfig;
pub use slack::SlackNotifier;
pub use voice::ElevenLabsClient;
