//! Unicode presentation classification.
//!
//! Answers one question for the resolver: absent an explicit variation
//! selector, should a codepoint render as text or as emoji? The table is
//! the `Emoji_Presentation` property from the UCD `emoji-data.txt` file.

mod presentation;

pub use presentation::{VS15, VS16, default_presentation, is_emoji_presentation, variation_selector};
