// Prompt construction for the summarization call
use crate::summary::SummaryLength;

pub const SYSTEM_MESSAGE: &str =
    "You are a helpful assistant that creates clear, concise summaries of text content.";

/// Sampling temperature for every summary request.
pub const SUMMARY_TEMPERATURE: f32 = 0.3;

const PREAMBLE: &str = "Please summarize the following text:";
const CLOSING: &str = "Focus on the main arguments, key facts, and important conclusions. Make the summary clear and well-structured.";

/// Instruction text and output budget for one tier
#[derive(Debug, PartialEq, Eq)]
pub struct TierPolicy {
    pub instruction: &'static str,
    pub max_output_tokens: usize,
}

static SHORT: TierPolicy = TierPolicy {
    instruction: "Provide a brief 2-3 sentence summary highlighting only the most critical points.",
    max_output_tokens: 200,
};

static MEDIUM: TierPolicy = TierPolicy {
    instruction: "Create a balanced summary in 1-2 paragraphs covering the main points and key details.",
    max_output_tokens: 500,
};

static DETAILED: TierPolicy = TierPolicy {
    instruction: "Generate a comprehensive summary that covers all important aspects, organized into clear paragraphs.",
    max_output_tokens: 1000,
};

impl SummaryLength {
    pub fn policy(self) -> &'static TierPolicy {
        match self {
            SummaryLength::Short => &SHORT,
            SummaryLength::Medium => &MEDIUM,
            SummaryLength::Detailed => &DETAILED,
        }
    }
}

/// Messages and budget handed to the completion service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_message: String,
    pub user_message: String,
    pub max_output_tokens: usize,
}

pub fn build_prompt(text: &str, tier: SummaryLength) -> Prompt {
    let policy = tier.policy();
    Prompt {
        system_message: SYSTEM_MESSAGE.to_string(),
        user_message: format!(
            "{}\n\n{}\n\n{}\n\n{}",
            PREAMBLE, text, policy.instruction, CLOSING
        ),
        max_output_tokens: policy.max_output_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_budgets() {
        assert_eq!(SummaryLength::Short.policy().max_output_tokens, 200);
        assert_eq!(SummaryLength::Medium.policy().max_output_tokens, 500);
        assert_eq!(SummaryLength::Detailed.policy().max_output_tokens, 1000);
    }

    #[test]
    fn user_message_layout() {
        let prompt = build_prompt("The body.", SummaryLength::Short);
        assert_eq!(
            prompt.user_message,
            "Please summarize the following text:\n\nThe body.\n\n\
             Provide a brief 2-3 sentence summary highlighting only the most critical points.\n\n\
             Focus on the main arguments, key facts, and important conclusions. \
             Make the summary clear and well-structured."
        );
        assert_eq!(prompt.system_message, SYSTEM_MESSAGE);
        assert_eq!(prompt.max_output_tokens, 200);
    }

    #[test]
    fn detailed_prompt_carries_full_text() {
        let text = "word ".repeat(400);
        let prompt = build_prompt(&text, SummaryLength::Detailed);
        assert!(prompt.user_message.contains(&text));
        assert!(prompt.user_message.contains("comprehensive summary"));
        assert_eq!(prompt.max_output_tokens, 1000);
    }
}
