//! Client for the chat-completions gateway used by the code generators.
//!
//! Prompts are forwarded with a fixed system prompt per generation type and
//! the streamed response is decoded from Server-Sent Events.

pub mod client;
pub mod prompts;
pub mod sse;

pub use client::{GatewayClient, GatewayConfig, GatewayError};
pub use prompts::GenerationType;
pub use sse::{collect_deltas, SseDecoder};
