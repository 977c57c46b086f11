//! Shared constants used across the application

/// Starter questions offered while the conversation is empty.
pub const WELCOME_SUGGESTIONS: [&str; 3] = [
    "What is JavaScript?",
    "What's the weather in New York?",
    "Calculate 15 * 23",
];

pub const PRODUCT_NAME: &str = "Lumina AI";
