//! System prompt assembly from retrieved documents.

use amanah_core::ScoredDocument;

/// Standing instructions for the assistant.
pub const SYSTEM_INSTRUCTIONS: &str = "\
You are an expert Islamic finance and Sharia law consultant specializing in corporate and personal finance. Provide comprehensive, Sharia-compliant guidance on Islamic financial matters.

### Primary Guidelines:

**Content Priorities:**
- Base responses primarily on provided context when available
- Supplement with your Islamic finance knowledge as needed
- Never deviate from Islamic finance and Sharia law topics
- Maintain strict focus on financial and business matters only

**Response Style:**
- Use natural, conversational structure suited to the question
- Write in plain language, avoiding unnecessary jargon
- Provide brief explanations for Islamic/legal terminology
- Maintain professional yet accessible tone

### Expertise Coverage:
- Islamic financial instruments (mudaraba, musharaka, ijara, qard hasan)
- Halal investment screening and compliance assessment
- Islamic banking contracts and operational structures
- Sharia-compliant business practices and transactions

### Response Standards:
- Deliver precise, accurate Islamic finance guidance
- Include relevant Quranic verses, hadith, or fiqh sources when applicable
- State clearly if insufficient information exists for definitive ruling
- Refuse requests outside Islamic finance scope or violating Sharia principles";

/// `Document: {title}\n{content}` per document, separated by blank lines.
pub fn build_context(docs: &[ScoredDocument]) -> String {
    docs.iter()
        .map(|d| format!("Document: {}\n{}", d.title, d.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Instructions followed by a `Context:` block when there are documents.
pub fn build_system_prompt(instructions: &str, docs: &[ScoredDocument]) -> String {
    if docs.is_empty() {
        return instructions.to_string();
    }
    format!("{instructions}\n\nContext:\n{}", build_context(docs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(title: &str, content: &str) -> ScoredDocument {
        ScoredDocument {
            id: title.to_lowercase(),
            title: title.into(),
            content: content.into(),
            similarity: 0.9,
        }
    }

    #[test]
    fn context_joins_documents_with_blank_lines() {
        let docs = [doc("Riba", "Interest is prohibited."), doc("Ijarah", "Leasing.")];
        assert_eq!(
            build_context(&docs),
            "Document: Riba\nInterest is prohibited.\n\nDocument: Ijarah\nLeasing."
        );
        assert_eq!(build_context(&[]), "");
    }

    #[test]
    fn context_block_only_with_documents() {
        assert_eq!(build_system_prompt("Be helpful.", &[]), "Be helpful.");
        assert_eq!(
            build_system_prompt("Be helpful.", &[doc("Riba", "No interest.")]),
            "Be helpful.\n\nContext:\nDocument: Riba\nNo interest."
        );
    }

    #[test]
    fn default_instructions_stay_on_topic() {
        assert!(SYSTEM_INSTRUCTIONS.starts_with("You are an expert Islamic finance"));
        assert!(!SYSTEM_INSTRUCTIONS.contains("Context:"));
    }
}
