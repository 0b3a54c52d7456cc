//! Thin client for the hosted generative text and image models used by the
//! chat widget and the image lab.
//!
//! The HTTP layer is abstracted behind [`Transport`] so the same code runs
//! over `fetch` in the browser and over an in-memory fake in tests.

pub mod chat;
pub mod client;
pub mod error;
pub mod image;
pub mod prompt;
pub mod wire;

pub use chat::{ChatHistory, ChatSession, Role, Turn, send_message};
pub use client::{GenAiClient, HttpResponse, LocalBoxFuture, Transport};
pub use error::GenAiError;
pub use image::{ImageSize, generate_image};
pub use prompt::{enhance_prompt, fast_generate};
