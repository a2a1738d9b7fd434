//! AI-assisted article drafting.
//!
//! The pieces the generation endpoint composes: prompt construction, the
//! completion-to-draft conversion, and the usage row recorded per call.
//! Everything here is pure; the handler owns the remote call and the
//! best-effort usage insert.

use media_types::NewAiUsage;
use serde_json::json;
use uuid::Uuid;

use crate::document::Node;
use crate::markdown::{excerpt, markdown_to_doc};
use crate::openai::TokenUsage;
use crate::usage::estimated_cost;

/// Characters kept in the stored excerpt.
pub const EXCERPT_CHARS: usize = 200;

/// Request type recorded with each drafting call.
pub const REQUEST_TYPE: &str = "article_generation";

/// System prompt fixing the publication's voice and the Markdown subset
/// the converter understands.
pub const SYSTEM_PROMPT: &str = "\
You are a staff writer for 3125 Media, a technology and gadget publication.
Write an article of roughly 3000 characters from the title and key points
you are given.

Structure:
- Introduction: one or two paragraphs that pull the reader in
- Body: several sections, each under a heading, covering the details
- Closing: one or two paragraphs summarising the takeaways

Formatting rules:
1. Headings are written as \"## Heading text\"
2. Paragraphs are separated by blank lines
3. Lists use \"- \" or \"1. \" markers
4. Keep paragraphs short, three to five sentences each

Tone: conversational but trustworthy. Explain jargon in plain words, lean
on concrete examples, and talk to the reader directly.";

/// A generated draft ready to hand back to the editor.
#[derive(Debug, Clone)]
pub struct ArticleDraft {
    pub content: Node,
    pub excerpt: String,
}

/// Builds the user prompt for a title and the author's outline.
pub fn user_prompt(title: &str, prompt: &str) -> String {
    format!(
        "Write the article from the following brief.\n\n\
         Title: {title}\n\n\
         Key points:\n{prompt}\n\n\
         Aim for roughly 3000 characters of readable prose."
    )
}

/// Converts a completion into stored draft content: the editor document
/// tree plus the plain-text excerpt.
pub fn build_draft(generated: &str) -> ArticleDraft {
    ArticleDraft {
        content: markdown_to_doc(generated),
        excerpt: excerpt(generated, EXCERPT_CHARS),
    }
}

/// Builds the usage row recorded for one drafting call.
pub fn usage_record(
    user_id: Option<Uuid>,
    model: &str,
    usage: TokenUsage,
    title: &str,
    prompt_length: usize,
) -> NewAiUsage {
    NewAiUsage {
        user_id,
        model: model.to_owned(),
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
        total_tokens: usage.total_tokens,
        estimated_cost: estimated_cost(model, usage.prompt_tokens, usage.completion_tokens),
        request_type: REQUEST_TYPE.to_owned(),
        metadata: json!({
            "title": title,
            "prompt_length": prompt_length,
        }),
    }
}
