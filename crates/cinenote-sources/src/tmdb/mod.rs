pub mod api;
pub mod client;
pub mod ranking;

pub use client::TmdbClient;
