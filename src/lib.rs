// Receipt Points - Core Library
// Rule engine + receipt store, with the HTTP layer behind the `server` feature

pub mod error;
pub mod receipt;
pub mod rules;
pub mod store;

#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod config;

// Re-export commonly used types
pub use error::ReceiptError;
pub use receipt::{Item, ItemPayload, Receipt, ReceiptPayload};
pub use rules::{RuleContribution, RuleEngine, ScoreBreakdown, ScoringRule};
pub use store::{ReceiptStore, ScoreRecord};

#[cfg(feature = "server")]
pub use api::{router, AppState};
#[cfg(feature = "server")]
pub use config::ServerConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
