//! Real-time push channel for fleet state changes.

pub mod websocket;

pub use websocket::FeedServer;
