// SPDX-License-Identifier: MIT

pub mod events;
pub mod graph;
pub mod prompts;
pub mod router;
pub mod state;
pub mod steps;

use crate::adk::error::QuillError;

/// Reject topics a run cannot start from
pub fn validate_topic(topic: &str) -> Result<&str, QuillError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(QuillError::InvalidInput(
            "Please enter a blog topic to get started".to_string(),
        ));
    }
    Ok(topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_topic() {
        assert_eq!(validate_topic("  Rust async  ").unwrap(), "Rust async");
        assert!(matches!(
            validate_topic("   "),
            Err(QuillError::InvalidInput(_))
        ));
    }
}
