// SPDX-License-Identifier: MIT

//! Prompt templates for the blog pipeline steps

pub fn title(topic: &str) -> String {
    format!(
        "Generate compelling blog title options about {topic} that are:\n\
         - SEO-friendly\n\
         - Attention-grabbing\n\
         - Between 6-12 words"
    )
}

/// Drafting prompt. `feedback` is only set when regeneration is allowed to
/// see the previous critique.
pub fn content(title: &str, feedback: Option<&str>) -> String {
    let mut prompt = format!(
        "Write a comprehensive blog post titled \"{title}\" with:\n\
         1. Engaging introduction with hook\n\
         2. 3-5 subheadings with detailed content\n\
         3. Practical examples/statistics\n\
         4. Clear transitions between sections\n\
         5. Actionable conclusion\n\
         Style: Professional yet conversational (Flesch-Kincaid 60-70). Use markdown formatting"
    );

    if let Some(feedback) = feedback {
        prompt.push_str("\n\nAddress this editorial feedback on the previous draft:\n");
        prompt.push_str(feedback);
    }

    prompt
}

pub fn review(content: &str) -> String {
    format!(
        "Critically review this blog content:\n\
         - Clarity & Structure\n\
         - Grammar & Style\n\
         - SEO optimization\n\
         - Reader engagement\n\
         Provide specific improvement suggestions. Content:\n{content}"
    )
}

pub fn evaluate(content: &str, feedback: &str) -> String {
    format!(
        "Evaluate blog content against editorial feedback (Pass/Fail):\n\
         Content: {content}\n\
         Feedback: {feedback}\n\
         Answer only Pass or Fail:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prompt_mentions_topic() {
        assert!(title("Generative AI in Healthcare").contains("about Generative AI in Healthcare"));
    }

    #[test]
    fn test_content_prompt_without_feedback() {
        let prompt = content("Title One", None);
        assert!(prompt.contains("titled \"Title One\""));
        assert!(!prompt.contains("editorial feedback"));
    }

    #[test]
    fn test_content_prompt_with_feedback() {
        let prompt = content("Title One", Some("needs work"));
        assert!(prompt.ends_with("needs work"));
    }

    #[test]
    fn test_evaluate_prompt_carries_both_inputs() {
        let prompt = evaluate("Draft body", "looks good");
        assert!(prompt.contains("Content: Draft body"));
        assert!(prompt.contains("Feedback: looks good"));
    }
}
