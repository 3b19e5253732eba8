pub mod anthropic;
pub mod base;
pub mod factory;
pub mod openai;
pub mod openrouter;

pub use base::{ChatMessage, ChatProvider, ProviderReply, UsageReport};
pub use factory::{create_provider, ProviderKind};
