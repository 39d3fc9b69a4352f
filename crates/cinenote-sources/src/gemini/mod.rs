pub mod api;
pub mod client;
pub mod parse;
pub mod prompts;

pub use client::GeminiClient;
pub use prompts::quick_picks;
