//! Answer optimization: FAQ sections, questions, definitions and how-tos.

use scraper::{ElementRef, Node};
use serde::{Deserialize, Serialize};

use crate::lexicon::{DEFINITION_PHRASES, FAQ_INDICATORS, HOW_TO, count_occurrences};
use crate::parse::Document;
use crate::structure::{ListCounts, list_counts};
use crate::text::{element_text, truncate_chars};

/// Questions that get a direct answer preview.
pub const MAX_DIRECT_ANSWERS: usize = 5;

/// Characters kept from a question or an answer.
pub const PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectAnswer {
    pub question: String,
    pub answer_preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOptimization {
    pub has_faq_section: bool,
    /// Text nodes ending in a question mark.
    pub qa_pairs_count: usize,
    pub definition_count: usize,
    pub how_to_sections: usize,
    pub list_usage: ListCounts,
    pub direct_answers: Vec<DirectAnswer>,
}

/// `page_text` is the lowercased text of every node outside script and style,
/// hidden containers included.
pub fn analyze(doc: &Document, page_text: &str) -> AnswerOptimization {
    let has_faq_section = FAQ_INDICATORS.iter().any(|indicator| page_text.contains(indicator));
    let definition_count = DEFINITION_PHRASES.iter().map(|phrase| count_occurrences(page_text, phrase)).sum();
    let how_to_sections = HOW_TO.find_iter(page_text).count();
    let (qa_pairs_count, direct_answers) = questions_and_answers(doc);

    AnswerOptimization {
        has_faq_section,
        qa_pairs_count,
        definition_count,
        how_to_sections,
        list_usage: list_counts(doc),
        direct_answers,
    }
}

/// Walks the tree once in document order.
///
/// Question text nodes queue up until the next `p`, `div` or `li` element
/// opens; that element answers every queued question. Only the first
/// [`MAX_DIRECT_ANSWERS`] questions are queued, but all are counted.
/// A queued question keeps its surrounding whitespace; the cut is taken from
/// the raw text node.
fn questions_and_answers(doc: &Document) -> (usize, Vec<DirectAnswer>) {
    let mut count = 0;
    let mut queued = 0;
    let mut pending: Vec<String> = Vec::new();
    let mut answers = Vec::new();

    for node in doc.html().root_element().descendants() {
        match node.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                let in_script = node
                    .ancestors()
                    .any(|a| a.value().as_element().is_some_and(|el| matches!(el.name(), "script" | "style")));
                if !trimmed.ends_with('?') || in_script {
                    continue;
                }
                count += 1;
                if queued < MAX_DIRECT_ANSWERS {
                    queued += 1;
                    pending.push(truncate_chars(text, PREVIEW_CHARS).to_string());
                }
            }
            Node::Element(el) if !pending.is_empty() && matches!(el.name(), "p" | "div" | "li") => {
                let Some(answer) = ElementRef::wrap(node) else { continue };
                let preview = preview(&element_text(answer));
                answers.extend(
                    pending.drain(..).map(|question| DirectAnswer { question, answer_preview: preview.clone() }),
                );
            }
            _ => {}
        }
    }

    (count, answers)
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        format!("{}...", truncate_chars(text, PREVIEW_CHARS))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{TextMode, raw_text};

    fn answers(html: &str) -> AnswerOptimization {
        let doc = Document::parse(html);
        let page_text = raw_text(&doc, TextMode::Full).to_lowercase();
        analyze(&doc, &page_text)
    }

    #[test]
    fn test_faq_case_insensitive() {
        assert!(answers("<h2>FREQUENTLY ASKED QUESTIONS</h2>").has_faq_section);
        assert!(answers("<p>See our Q&amp;A below</p>").has_faq_section);
        assert!(!answers("<p>Nothing to see</p>").has_faq_section);
    }

    #[test]
    fn test_faq_in_hidden_container() {
        let facts = answers(r#"<div hidden style="display:none"><span>FAQ</span></div><p>Body</p>"#);
        assert!(facts.has_faq_section);
    }

    #[test]
    fn test_faq_in_script_ignored() {
        assert!(!answers("<script>var faq = 1;</script><p>Body</p>").has_faq_section);
    }

    #[test]
    fn test_question_followed_by_answer() {
        let facts = answers("<h3>What is a widget?</h3><p>A small device.</p>");
        assert_eq!(facts.qa_pairs_count, 1);
        assert_eq!(facts.direct_answers.len(), 1);
        assert_eq!(facts.direct_answers[0].question, "What is a widget?");
        assert_eq!(facts.direct_answers[0].answer_preview, "A small device.");
    }

    #[test]
    fn test_question_without_following_block() {
        let facts = answers("<p>Intro</p><h3>Anyone there?</h3>");
        assert_eq!(facts.qa_pairs_count, 1);
        assert!(facts.direct_answers.is_empty());
    }

    #[test]
    fn test_consecutive_questions_share_answer() {
        let facts = answers("<h3>Why?</h3><h3>How?</h3><li>Because.</li>");
        assert_eq!(facts.direct_answers.len(), 2);
        assert!(facts.direct_answers.iter().all(|a| a.answer_preview == "Because."));
    }

    #[test]
    fn test_answer_preview_truncated() {
        let long = "x".repeat(150);
        let facts = answers(&format!("<h3>Long?</h3><p>{long}</p>"));
        let preview = &facts.direct_answers[0].answer_preview;
        assert_eq!(preview.chars().count(), 103);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_question_cut_from_raw_text() {
        let question = format!("{}?", "q".repeat(120));
        let facts = answers(&format!("<h3>\n    {question}</h3><p>Yes.</p>"));
        let kept = &facts.direct_answers[0].question;
        assert_eq!(kept.chars().count(), PREVIEW_CHARS);
        assert!(kept.starts_with("\n    q"));
        assert!(!kept.ends_with('?'));
    }

    #[test]
    fn test_at_most_five_direct_answers() {
        let html: String = (0..8).map(|i| format!("<h3>Question {i}?</h3><p>Answer {i}</p>")).collect();
        let facts = answers(&html);
        assert_eq!(facts.qa_pairs_count, 8);
        assert_eq!(facts.direct_answers.len(), 5);
        assert_eq!(facts.direct_answers[4].answer_preview, "Answer 4");
    }

    #[test]
    fn test_definitions_and_how_to() {
        let facts = answers("<p>What is Rust? It refers to a language. How to start: read the Guide.</p>");
        assert_eq!(facts.definition_count, 2);
        assert_eq!(facts.how_to_sections, 2);
    }

    #[test]
    fn test_list_usage() {
        let facts = answers("<ul><li>a</li></ul><ol><li>b</li></ol><ul></ul><dl></dl>");
        assert_eq!(facts.list_usage, ListCounts { ordered: 1, unordered: 2, definition: 1 });
    }
}
