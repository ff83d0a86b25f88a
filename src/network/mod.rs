//! Network helpers for engine adapters

mod client;

pub use client::HttpClient;
