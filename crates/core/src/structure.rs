//! Structural analysis of a parsed page.
//!
//! Walks the document once per concern and produces [`StructuralFacts`]:
//! titles, meta tags, headings, images, links, semantic elements, JSON-LD
//! schemas and list usage. Every step degrades to an empty or default value
//! on malformed markup; nothing here returns an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::lexicon::{
    OPEN_GRAPH_PROPERTY, ORGANIZATION_SCHEMA_TYPES, QA_SCHEMA_TYPES, REVIEW_SCHEMA_TYPES, TWITTER_CARD_NAME,
};
use crate::parse::Document;

/// Title recorded when a page has no `<title>` element.
pub const NO_TITLE: &str = "No title found";

/// Heading texts per level, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
}

impl Headings {
    /// Gets the headings for a level in `1..=6`; other levels are empty.
    pub fn level(&self, level: usize) -> &[String] {
        match level {
            1 => &self.h1,
            2 => &self.h2,
            3 => &self.h3,
            4 => &self.h4,
            5 => &self.h5,
            6 => &self.h6,
            _ => &[],
        }
    }

    fn level_mut(&mut self, level: usize) -> Option<&mut Vec<String>> {
        match level {
            1 => Some(&mut self.h1),
            2 => Some(&mut self.h2),
            3 => Some(&mut self.h3),
            4 => Some(&mut self.h4),
            5 => Some(&mut self.h5),
            6 => Some(&mut self.h6),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCounts {
    pub total: usize,
    pub with_alt: usize,
    pub without_alt: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticCounts {
    pub article: usize,
    pub section: usize,
    pub nav: usize,
    pub aside: usize,
    pub header: usize,
    pub footer: usize,
    pub main: usize,
}

impl SemanticCounts {
    pub fn total(&self) -> usize {
        self.article + self.section + self.nav + self.aside + self.header + self.footer + self.main
    }

    /// Non-zero counts as `(tag, count)` pairs, in a fixed order.
    pub fn non_zero(&self) -> Vec<(&'static str, usize)> {
        [
            ("article", self.article),
            ("section", self.section),
            ("nav", self.nav),
            ("aside", self.aside),
            ("header", self.header),
            ("footer", self.footer),
            ("main", self.main),
        ]
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCounts {
    pub ordered: usize,
    pub unordered: usize,
    pub definition: usize,
}

impl ListCounts {
    pub fn total(&self) -> usize {
        self.ordered + self.unordered + self.definition
    }
}

/// Schema.org families detected in JSON-LD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFlags {
    pub qa_schema: bool,
    pub review_schema: bool,
    pub organization_schema: bool,
}

/// Presence of well-known files at the site origin.
///
/// Filled by a probe collaborator; defaults to all absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFiles {
    pub robots_txt: bool,
    pub sitemap_xml: bool,
    pub llms_txt: bool,
}

/// Everything the structural pass learns about a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralFacts {
    pub url: String,
    /// First `<title>` text, or [`NO_TITLE`].
    pub title: String,
    /// Empty when absent.
    pub meta_description: String,
    pub headings: Headings,
    pub images: ImageCounts,
    pub links: LinkCounts,
    pub structured_data: bool,
    /// Every JSON-LD `@type` seen, in document order.
    pub json_ld_types: Vec<String>,
    pub tables: usize,
    pub forms: usize,
    pub semantic_elements: SemanticCounts,
    pub robots_txt: bool,
    pub sitemap_xml: bool,
    pub llms_txt: bool,
    pub open_graph_tags: Vec<String>,
    pub twitter_card_tags: Vec<String>,
    pub canonical_tag: String,
    pub html_lang: String,
    pub meta_charset: String,
    pub schemas: SchemaFlags,
    pub lists: ListCounts,
}

impl StructuralFacts {
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty() && self.title != NO_TITLE
    }

    pub fn site_files(&self) -> SiteFiles {
        SiteFiles { robots_txt: self.robots_txt, sitemap_xml: self.sitemap_xml, llms_txt: self.llms_txt }
    }
}

/// Runs the structural pass.
///
/// `url` is the page's own address; it decides which absolute links count as
/// internal. `site_files` carries the probe results, which this pass never
/// fetches itself.
///
/// # Example
///
/// ```rust
/// use aiscout_core::parse::Document;
/// use aiscout_core::structure::{NO_TITLE, SiteFiles, analyze_structure};
///
/// let doc = Document::parse("<html><head></head><body><p>Hi</p></body></html>");
/// let facts = analyze_structure(&doc, "https://example.com", SiteFiles::default());
/// assert_eq!(facts.title, NO_TITLE);
/// assert!(facts.headings.h1.is_empty());
/// ```
pub fn analyze_structure(doc: &Document, url: &str, site_files: SiteFiles) -> StructuralFacts {
    let json_ld_types = json_ld_types(doc);
    let schemas = schema_flags(&json_ld_types);

    StructuralFacts {
        url: url.to_string(),
        title: doc.title().map(|t| t.trim().to_string()).unwrap_or_else(|| NO_TITLE.to_string()),
        meta_description: meta_content(doc, r#"meta[name="description"]"#),
        headings: headings(doc),
        images: images(doc),
        links: links(doc, url),
        structured_data: doc.count(r#"script[type="application/ld+json"]"#) > 0,
        json_ld_types,
        tables: doc.count("table"),
        forms: doc.count("form"),
        semantic_elements: semantic_counts(doc),
        robots_txt: site_files.robots_txt,
        sitemap_xml: site_files.sitemap_xml,
        llms_txt: site_files.llms_txt,
        open_graph_tags: meta_attr_matching(doc, "property", |v| OPEN_GRAPH_PROPERTY.is_match(v)),
        twitter_card_tags: meta_attr_matching(doc, "name", |v| TWITTER_CARD_NAME.is_match(v)),
        canonical_tag: doc
            .select_first(r#"link[rel~="canonical"]"#)
            .and_then(|el| el.attr("href"))
            .unwrap_or_default()
            .to_string(),
        html_lang: doc.root().attr("lang").unwrap_or_default().to_string(),
        meta_charset: doc
            .select_first("meta[charset]")
            .and_then(|el| el.attr("charset"))
            .unwrap_or_default()
            .to_string(),
        schemas,
        lists: list_counts(doc),
    }
}

fn meta_content(doc: &Document, selector: &str) -> String {
    doc.select_first(selector)
        .and_then(|el| el.attr("content"))
        .unwrap_or_default()
        .to_string()
}

fn meta_attr_matching(doc: &Document, attr: &str, matches: impl Fn(&str) -> bool) -> Vec<String> {
    doc.select("meta")
        .unwrap_or_default()
        .iter()
        .filter_map(|el| el.attr(attr))
        .filter(|value| !value.is_empty() && matches(value))
        .map(str::to_string)
        .collect()
}

fn headings(doc: &Document) -> Headings {
    let mut headings = Headings::default();
    for level in 1..=6 {
        let texts = doc
            .select(&format!("h{}", level))
            .unwrap_or_default()
            .iter()
            .map(|el| el.text().trim().to_string())
            .collect();
        if let Some(slot) = headings.level_mut(level) {
            *slot = texts;
        }
    }
    headings
}

fn images(doc: &Document) -> ImageCounts {
    let mut counts = ImageCounts::default();
    for img in doc.select("img").unwrap_or_default() {
        if img.attr("alt").is_some_and(|alt| !alt.is_empty()) {
            counts.with_alt += 1;
        } else {
            counts.without_alt += 1;
        }
    }
    counts.total = counts.with_alt + counts.without_alt;
    counts
}

/// Where a link points relative to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Internal,
    External,
    /// Relative paths without a leading `/` or `#`, other schemes and
    /// unparseable hrefs. Counted in the total only.
    Unclassified,
}

/// Classifies an href against the page URL.
///
/// Root-relative and fragment links are internal. Absolute http(s) links are
/// internal when scheme and host match the page, external otherwise.
pub fn classify_link(href: &str, page: Option<&Url>) -> LinkKind {
    if href.starts_with('/') || href.starts_with('#') {
        return LinkKind::Internal;
    }
    if !href.starts_with("http") {
        return LinkKind::Unclassified;
    }
    let Ok(target) = Url::parse(href) else {
        return LinkKind::Unclassified;
    };
    if !matches!(target.scheme(), "http" | "https") {
        return LinkKind::Unclassified;
    }
    match page {
        Some(page) if page.scheme() == target.scheme() && page.host_str() == target.host_str() => LinkKind::Internal,
        _ => LinkKind::External,
    }
}

fn links(doc: &Document, url: &str) -> LinkCounts {
    let page = doc.base_url().cloned().or_else(|| Url::parse(url).ok());
    let mut counts = LinkCounts::default();
    for link in doc.select("a[href]").unwrap_or_default() {
        counts.total += 1;
        match classify_link(link.attr("href").unwrap_or_default(), page.as_ref()) {
            LinkKind::Internal => counts.internal += 1,
            LinkKind::External => counts.external += 1,
            LinkKind::Unclassified => {}
        }
    }
    counts
}

fn semantic_counts(doc: &Document) -> SemanticCounts {
    SemanticCounts {
        article: doc.count("article"),
        section: doc.count("section"),
        nav: doc.count("nav"),
        aside: doc.count("aside"),
        header: doc.count("header"),
        footer: doc.count("footer"),
        main: doc.count("main"),
    }
}

pub(crate) fn list_counts(doc: &Document) -> ListCounts {
    ListCounts { ordered: doc.count("ol"), unordered: doc.count("ul"), definition: doc.count("dl") }
}

/// Collects `@type` values from every JSON-LD block.
///
/// Blocks that fail to parse are skipped without affecting the others.
/// Top-level arrays and `@graph` members are walked.
fn json_ld_types(doc: &Document) -> Vec<String> {
    let mut types = Vec::new();
    for script in doc.select(r#"script[type="application/ld+json"]"#).unwrap_or_default() {
        match serde_json::from_str::<Value>(script.text().trim()) {
            Ok(value) => collect_types(&value, &mut types),
            Err(e) => tracing::debug!("skipping malformed JSON-LD block: {}", e),
        }
    }
    types
}

fn collect_types(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_types(item, out)),
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(t)) => out.push(t.clone()),
                Some(Value::Array(ts)) => out.extend(ts.iter().filter_map(Value::as_str).map(str::to_string)),
                _ => {}
            }
            if let Some(graph) = map.get("@graph") {
                collect_types(graph, out);
            }
        }
        _ => {}
    }
}

fn schema_flags(types: &[String]) -> SchemaFlags {
    let any_of = |family: &[&str]| types.iter().any(|t| family.contains(&t.as_str()));
    SchemaFlags {
        qa_schema: any_of(&QA_SCHEMA_TYPES),
        review_schema: any_of(&REVIEW_SCHEMA_TYPES),
        organization_schema: any_of(&ORGANIZATION_SCHEMA_TYPES),
    }
}
