//! Presentation layer.
//!
//! - [`markdown`]: classification and safe HTML rendering of assistant
//!   answers.
//! - [`chat_loop`]: the interactive terminal loop that feeds input to
//!   [`crate::commands`] and applies the resulting actions.
//! - [`transcript`]: the standalone HTML page mirroring a conversation.
//!
//! Ownership boundary: this layer presents and captures interaction state,
//! while [`crate::core`] owns domain logic and backend coordination.

pub mod chat_loop;
pub mod markdown;
pub mod transcript;
