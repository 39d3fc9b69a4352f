pub mod auth;
pub mod clear;
pub mod config;
pub mod context;
pub mod discover;
pub mod prompts;
pub mod review;
pub mod spinner;
pub mod stats;
