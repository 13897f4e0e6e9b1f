//! Generation client abstraction layer
//!
//! This module provides a trait-based abstraction for talking to a text
//! generation service, allowing different backends (GenAI, Mock) to be used
//! interchangeably.

mod client;
mod error;
mod genai;
mod mock;
mod types;

pub use client::LLMClient;
pub use error::BackendError;
pub use genai::GenAIClient;
pub use mock::{MockLLMClient, MockResponse};
pub use types::{GenerationRequest, GenerationResponse, ResponseFormat};
