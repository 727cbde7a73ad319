//! Free-text advisory.
//!
//! An [`Advisor`] answers prompts: prose advice from a plain-text summary of
//! the facts, or the JSON replies [`crate::strategy`] asks for. Analysis never
//! depends on one: when no advisor is configured, or the configured one fails,
//! [`fallback_advisory`] supplies static guidance.

use crate::Result;
use crate::classify::ContentFacts;
use crate::structure::StructuralFacts;

/// Static guidance returned when no advisor output is available.
pub const FALLBACK_ADVISORY: &str = "AI-powered recommendations are not available (no advisor configured).

Based on the technical analysis, here are general recommendations:

1. **Top Priority Improvements:**
   - Ensure you have exactly one H1 tag per page
   - Add meta descriptions to all pages
   - Implement structured data (Schema.org)
   - Add robots.txt and sitemap.xml files

2. **Content Structure:**
   - Use semantic HTML5 elements (article, section, nav, etc.)
   - Create a clear heading hierarchy (H1 → H2 → H3)
   - Break content into logical sections

3. **Technical SEO:**
   - Add alt text to all images
   - Implement Open Graph and Twitter Card tags
   - Add canonical tags to prevent duplicate content issues
   - Specify language with html lang attribute

4. **Accessibility:**
   - Ensure all interactive elements are keyboard accessible
   - Use ARIA labels where appropriate
   - Maintain good color contrast

5. **Quick Wins:**
   - Add charset meta tag
   - Compress images
   - Minify CSS and JavaScript";

/// Answers prompts with text.
pub trait Advisor: Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Returns the reply to a complete prompt.
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;

    /// Returns advice for the page described by `summary`.
    fn advise(&self, summary: &str) -> impl Future<Output = Result<String>> + Send {
        let prompt = advisor_prompt(summary);
        async move { self.complete(&prompt).await }
    }
}

/// Returns the static guidance text.
pub fn fallback_advisory() -> String {
    FALLBACK_ADVISORY.to_string()
}

/// Asks `advisor` for advice, falling back to static guidance when there is
/// no advisor, it fails, or it returns nothing.
pub async fn advisory_or_fallback<A: Advisor>(advisor: Option<&A>, summary: &str) -> String {
    let Some(advisor) = advisor else {
        return fallback_advisory();
    };

    match advisor.advise(summary).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            tracing::warn!(advisor = advisor.name(), "advisor returned empty text, using fallback");
            fallback_advisory()
        }
        Err(e) => {
            tracing::warn!(advisor = advisor.name(), error = %e, "advisor failed, using fallback");
            fallback_advisory()
        }
    }
}

/// An advisor that always answers with the same text.
#[derive(Debug, Clone)]
pub struct StaticAdvisor {
    text: String,
}

impl StaticAdvisor {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Advisor for StaticAdvisor {
    fn name(&self) -> &str {
        "static"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.text.clone())
    }
}

fn present(flag: bool) -> &'static str {
    if flag { "Present" } else { "Missing" }
}

fn or_unspecified(value: &str) -> &str {
    if value.is_empty() { "Not specified" } else { value }
}

/// Renders the facts as the plain-text summary advisors receive.
pub fn facts_summary(structure: &StructuralFacts, content: Option<&ContentFacts>) -> String {
    let mut out = String::new();
    let h = &structure.headings;
    let minor_headings: usize = (3..=6).map(|level| h.level(level).len()).sum();
    let semantic = structure.semantic_elements.non_zero();
    let breakdown: Vec<String> = semantic.iter().map(|(name, n)| format!("{}: {}", name, n)).collect();

    out.push_str("Website Analysis Summary:\n");
    out.push_str(&format!("- URL: {}\n", structure.url));
    out.push_str(&format!("- Title: {}\n", structure.title));
    out.push_str(&format!("- Meta Description: {}\n", present(!structure.meta_description.is_empty())));
    out.push_str(&format!("- HTML Language: {}\n", or_unspecified(&structure.html_lang)));
    out.push_str(&format!("- Charset: {}\n", or_unspecified(&structure.meta_charset)));
    out.push('\n');
    out.push_str("Content Structure:\n");
    out.push_str(&format!("- H1 tags: {}\n", h.h1.len()));
    out.push_str(&format!("- H2 tags: {}\n", h.h2.len()));
    out.push_str(&format!("- H3-H6 tags: {}\n", minor_headings));
    out.push_str(&format!(
        "- Semantic HTML5 elements: {} total ({})\n",
        structure.semantic_elements.total(),
        breakdown.join(", ")
    ));
    out.push('\n');
    out.push_str("Media & Links:\n");
    out.push_str(&format!(
        "- Total images: {} ({} missing alt text)\n",
        structure.images.total, structure.images.without_alt
    ));
    out.push_str(&format!("- Internal links: {}\n", structure.links.internal));
    out.push_str(&format!("- External links: {}\n", structure.links.external));
    out.push('\n');
    out.push_str("Technical SEO:\n");
    out.push_str(&format!("- Robots.txt: {}\n", present(structure.robots_txt)));
    out.push_str(&format!("- Sitemap.xml: {}\n", present(structure.sitemap_xml)));
    out.push_str(&format!("- llms.txt: {}\n", present(structure.llms_txt)));
    out.push_str(&format!("- Canonical tag: {}\n", present(!structure.canonical_tag.is_empty())));
    out.push_str(&format!("- Structured data (JSON-LD): {}\n", if structure.structured_data { "Yes" } else { "No" }));
    out.push_str(&format!("- Open Graph tags: {} found\n", structure.open_graph_tags.len()));
    out.push_str(&format!("- Twitter Card tags: {} found\n", structure.twitter_card_tags.len()));
    out.push('\n');
    out.push_str("Data Organization:\n");
    out.push_str(&format!("- Tables: {}\n", structure.tables));
    out.push_str(&format!("- Forms: {}\n", structure.forms));

    if let Some(content) = content {
        let readability = match content.readability.flesch_reading_ease {
            Some(ease) => format!("{:.1} ({})", ease, content.readability.interpretation),
            None => content.readability.interpretation.clone(),
        };
        out.push('\n');
        out.push_str("Content Quality:\n");
        out.push_str(&format!("- Word count: {}\n", content.content_quality.word_count));
        out.push_str(&format!("- Readability: {}\n", readability));
        out.push_str(&format!("- Promotional density: {}%\n", content.promotional_language.promotional_density));
        out.push_str(&format!("- Factual score: {}\n", content.factual_content.factual_score));
        out.push_str(&format!("- FAQ section: {}\n", present(content.answer_optimization.has_faq_section)));
        out.push_str(&format!("- Credibility score: {}\n", content.credibility.credibility_score));
        out.push_str(&format!("- Brevity score: {}\n", content.brevity.brevity_score));
    }

    out
}

/// The request sent to a generative advisor around a facts summary.
pub fn advisor_prompt(summary: &str) -> String {
    format!(
        "Based on this website analysis, provide specific recommendations to improve the page's \
discoverability and crawlability for AI/LLM systems. Focus on practical, actionable improvements.

{summary}
Please structure your response with:
1. Top 3 Priority Improvements (most impactful changes)
2. Content Structure Recommendations
3. Technical SEO Improvements
4. Accessibility Enhancements
5. Quick Wins (easy changes with good impact)

Keep recommendations concise and actionable. Focus on changes that will help AI systems better understand \
and process the content."
    )
}

#[cfg(feature = "fetch")]
pub use anthropic::{API_KEY_VAR, AnthropicAdvisor, DEFAULT_MODEL};

#[cfg(feature = "fetch")]
mod anthropic {
    use std::time::Duration;

    use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
    use serde::{Deserialize, Serialize};

    use super::Advisor;
    use crate::{AiscoutError, Result};

    const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
    const API_VERSION: &str = "2023-06-01";
    pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
    pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

    /// Advisor backed by the Anthropic messages API.
    #[derive(Debug, Clone)]
    pub struct AnthropicAdvisor {
        api_key: String,
        model: String,
        max_tokens: usize,
        client: reqwest::Client,
    }

    impl AnthropicAdvisor {
        /// # Errors
        ///
        /// Returns [`AiscoutError::AdvisorError`] if the HTTP client cannot be built.
        pub fn new(api_key: impl Into<String>) -> Result<Self> {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .map_err(|e| AiscoutError::AdvisorError(format!("failed to build Anthropic HTTP client: {}", e)))?;
            Ok(Self { api_key: api_key.into(), model: DEFAULT_MODEL.to_string(), max_tokens: 1500, client })
        }

        /// Builds an advisor from `ANTHROPIC_API_KEY`, or `None` when unset or blank.
        pub fn from_env() -> Option<Self> {
            let key = std::env::var(API_KEY_VAR).ok().filter(|k| !k.trim().is_empty())?;
            match Self::new(key) {
                Ok(advisor) => Some(advisor),
                Err(e) => {
                    tracing::warn!(error = %e, "advisor disabled");
                    None
                }
            }
        }

        pub fn with_model(mut self, model: impl Into<String>) -> Self {
            self.model = model.into();
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
            self.max_tokens = max_tokens;
            self
        }

        fn headers(&self) -> Result<HeaderMap> {
            let mut headers = HeaderMap::new();
            headers.insert(
                "x-api-key",
                HeaderValue::from_str(self.api_key.trim())
                    .map_err(|_| AiscoutError::AdvisorError("invalid Anthropic API key".to_string()))?,
            );
            headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            Ok(headers)
        }
    }

    impl Advisor for AnthropicAdvisor {
        fn name(&self) -> &str {
            "anthropic"
        }

        async fn complete(&self, prompt: &str) -> Result<String> {
            let body = MessagesRequest {
                model: &self.model,
                max_tokens: self.max_tokens,
                messages: vec![Message { role: "user", content: prompt }],
            };

            let response = self
                .client
                .post(MESSAGES_URL)
                .headers(self.headers()?)
                .json(&body)
                .send()
                .await
                .map_err(|e| AiscoutError::AdvisorError(format!("failed to call Anthropic messages API: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_else(|_| "<body unavailable>".to_string());
                return Err(AiscoutError::AdvisorError(format!("Anthropic returned {}: {}", status, text)));
            }

            let parsed: MessagesResponse = response
                .json()
                .await
                .map_err(|e| AiscoutError::AdvisorError(format!("failed to parse Anthropic response: {}", e)))?;
            text_of(parsed)
        }
    }

    fn text_of(response: MessagesResponse) -> Result<String> {
        let text = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ResponseBlock::Text { text } => Some(text),
                ResponseBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        if text.is_empty() {
            return Err(AiscoutError::AdvisorError("Anthropic response missing text content".to_string()));
        }
        Ok(text)
    }

    #[derive(Serialize)]
    struct MessagesRequest<'a> {
        model: &'a str,
        max_tokens: usize,
        messages: Vec<Message<'a>>,
    }

    #[derive(Serialize)]
    struct Message<'a> {
        role: &'a str,
        content: &'a str,
    }

    #[derive(Debug, Deserialize)]
    struct MessagesResponse {
        content: Vec<ResponseBlock>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum ResponseBlock {
        Text {
            text: String,
        },
        #[serde(other)]
        Other,
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AiscoutError;
    use crate::parse::Document;
    use crate::structure::{SiteFiles, analyze_structure};

    struct FailingAdvisor;

    impl Advisor for FailingAdvisor {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(AiscoutError::AdvisorError("boom".to_string()))
        }
    }

    struct EchoAdvisor;

    impl Advisor for EchoAdvisor {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }
    }

    fn block_on<F: Future<Output = String> + Send + 'static>(future: F) -> String {
        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(future)
        })
        .join()
        .unwrap()
    }

    #[test]
    fn test_fallback_has_five_sections() {
        let text = fallback_advisory();
        for section in ["Top Priority Improvements", "Content Structure", "Technical SEO", "Accessibility", "Quick Wins"] {
            assert!(text.contains(section), "missing {section}");
        }
    }

    #[test]
    fn test_no_advisor_uses_fallback() {
        let text = block_on(async { advisory_or_fallback::<StaticAdvisor>(None, "summary").await });
        assert_eq!(text, FALLBACK_ADVISORY);
    }

    #[test]
    fn test_static_advisor() {
        let text = block_on(async {
            let advisor = StaticAdvisor::new("Add an FAQ.");
            advisory_or_fallback(Some(&advisor), "summary").await
        });
        assert_eq!(text, "Add an FAQ.");
    }

    #[test]
    fn test_failing_advisor_falls_back() {
        let text = block_on(async { advisory_or_fallback(Some(&FailingAdvisor), "summary").await });
        assert_eq!(text, FALLBACK_ADVISORY);
    }

    #[test]
    fn test_blank_advice_falls_back() {
        let text = block_on(async {
            let advisor = StaticAdvisor::new("   ");
            advisory_or_fallback(Some(&advisor), "summary").await
        });
        assert_eq!(text, FALLBACK_ADVISORY);
    }

    #[test]
    fn test_facts_summary_layout() {
        let html = r#"<html lang="en"><head><title>Docs</title></head>
            <body><main><h1>A</h1><h3>B</h3><img src="x"></main></body></html>"#;
        let facts = analyze_structure(&Document::parse(html), "https://example.com/", SiteFiles::default());
        let summary = facts_summary(&facts, None);
        assert!(summary.contains("- URL: https://example.com/"));
        assert!(summary.contains("- Title: Docs"));
        assert!(summary.contains("- Meta Description: Missing"));
        assert!(summary.contains("- HTML Language: en"));
        assert!(summary.contains("- Charset: Not specified"));
        assert!(summary.contains("- H3-H6 tags: 1"));
        assert!(summary.contains("- Semantic HTML5 elements: 1 total (main: 1)"));
        assert!(summary.contains("- Total images: 1 (1 missing alt text)"));
        assert!(!summary.contains("Content Quality:"));
        assert!(summary.starts_with("Website Analysis Summary:\n- URL: "));
        assert!(summary.contains("- Charset: Not specified\n\nContent Structure:\n- H1 tags: 1\n"));
        assert!(summary.ends_with("- Tables: 0\n- Forms: 0\n"));
    }

    #[test]
    fn test_advise_sends_wrapped_summary() {
        let text = block_on(async { EchoAdvisor.advise("SUMMARY LINE\n").await.unwrap() });
        assert_eq!(text, advisor_prompt("SUMMARY LINE\n"));
    }

    #[test]
    fn test_prompt_wraps_summary() {
        let prompt = advisor_prompt("SUMMARY\n");
        assert!(prompt.contains("SUMMARY"));
        assert!(prompt.contains("5. Quick Wins"));
    }
}
