use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// The review instruction sent to the model. The six numbered categories and
/// the markdown instruction are the contract; the diff is substituted for
/// `{diff}` verbatim.
const REVIEW_TEMPLATE: &str = r#"You are an AI code reviewer.
Review the following Git diff and provide:

1. Problems / bugs
2. Security issues
3. Cleanliness and best practices
4. Performance issues
5. Suggested improvements
6. Summary

Respond in markdown.

DIFF:
{diff}"#;

const TRUNCATION_MARKER: &str = "\n[diff truncated]";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    pub template: String,

    /// Upper bound on embedded diff size, in bytes. Oversized diffs are cut
    /// at a char boundary and marked. Zero disables the limit.
    pub max_diff_chars: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: REVIEW_TEMPLATE.to_string(),
            max_diff_chars: 240_000,
        }
    }
}

pub struct PromptBuilder {
    config: PromptConfig,
}

impl PromptBuilder {
    pub fn new(config: PromptConfig) -> Self {
        Self { config }
    }

    /// Substitute the diff into the template, truncating oversized input.
    pub fn build(&self, diff: &str) -> String {
        let diff_text = self.bounded_diff(diff);
        self.config.template.replace("{diff}", &diff_text)
    }

    fn bounded_diff<'a>(&self, diff: &'a str) -> Cow<'a, str> {
        let limit = self.config.max_diff_chars;
        if limit == 0 || diff.len() <= limit {
            return Cow::Borrowed(diff);
        }

        let mut cut = limit;
        while !diff.is_char_boundary(cut) {
            cut -= 1;
        }

        let mut truncated = diff[..cut].to_string();
        truncated.push_str(TRUNCATION_MARKER);
        Cow::Owned(truncated)
    }
}
