//! Main-content extraction from static HTML.
//!
//! The extractor picks the region most likely to hold the article body, drops
//! noise widgets from it, then walks it once in document order. Every visited
//! element becomes a [`ContentPart`]; text nested in a visited element belongs
//! to the nearest visited ancestor only, so nothing is emitted twice.

use std::fmt;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use crate::error::ExtractError;

pub const MIN_PARAGRAPH_LENGTH: usize = 20;
pub const MIN_HEADING_LENGTH: usize = 3;

pub const TITLE_PREFIX: &str = "【TITLE】 ";
pub const CAPTION_PREFIX: &str = "【CAPTION】 ";

const PART_SEPARATOR: &str = "\n\n";

/// Prioritized; the first selector with a match wins.
const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    "#main",
    "#content",
    ".post-content",
    ".article-content",
    ".article-body",
    ".entry-content",
    ".story-body",
    ".markdown-body",
    ".readme",
];

const NOISE_SELECTORS: &[&str] = &[
    ".related-posts",
    ".social-share",
    ".share-buttons",
    ".comments",
    "#comments",
    ".ad-banner",
    ".advertisement",
];

/// Only stripped when no main-content selector matched.
const CHROME_SELECTORS: &[&str] = &[
    "header", "footer", "nav", "aside", ".sidebar", "script", "style", "form",
];

const SILENT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements whose text must not run into the text of their neighbours.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

struct SelectorSet {
    main_content: Vec<Selector>,
    noise: Vec<Selector>,
    chrome: Vec<Selector>,
}

fn parse_all(raw: &[&str]) -> Vec<Selector> {
    raw.iter()
        .filter_map(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(err) => {
                tracing::warn!(selector = s, ?err, "skipping unparseable selector");
                None
            }
        })
        .collect()
}

static SELECTORS: LazyLock<SelectorSet> = LazyLock::new(|| SelectorSet {
    main_content: parse_all(MAIN_CONTENT_SELECTORS),
    noise: parse_all(NOISE_SELECTORS),
    chrome: parse_all(CHROME_SELECTORS),
});

/// Length thresholds applied to headings and paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Paragraphs and blockquotes are kept only when longer than this.
    pub min_paragraph_chars: usize,
    /// Headings are kept only when longer than this.
    pub min_heading_chars: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_paragraph_chars: MIN_PARAGRAPH_LENGTH,
            min_heading_chars: MIN_HEADING_LENGTH,
        }
    }
}

/// One formatted fragment of the extracted document, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Title(String),
    Heading { level: u8, text: String },
    Paragraph(String),
    ListItem(String),
    Table {
        caption: Option<String>,
        rows: Vec<Vec<String>>,
    },
    Code(String),
}

impl fmt::Display for ContentPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title(title) => write!(f, "{TITLE_PREFIX}{title}"),
            Self::Heading { text, .. } => write!(f, "## {text}"),
            Self::Paragraph(text) | Self::ListItem(text) => f.write_str(text),
            Self::Table { caption, rows } => {
                let mut lines = Vec::with_capacity(rows.len() + 1);
                if let Some(caption) = caption {
                    lines.push(format!("{CAPTION_PREFIX}{caption}"));
                }
                lines.extend(rows.iter().map(|row| row.join(" | ")));
                f.write_str(&lines.join("\n"))
            }
            Self::Code(code) => write!(f, "```\n{code}\n```"),
        }
    }
}

/// Outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Parts joined by a blank line.
    pub text: String,
    /// False when the page title was the only thing found.
    pub body_found: bool,
}

pub fn extract_content(html: &[u8]) -> Result<Extraction, ExtractError> {
    extract_content_with(html, &ExtractOptions::default())
}

pub fn extract_content_with(
    html: &[u8],
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let parts = extract_parts(html, options)?;
    assemble(parts)
}

/// Parses `html` and returns its content parts without validating them.
pub fn extract_parts(
    html: &[u8],
    options: &ExtractOptions,
) -> Result<Vec<ContentPart>, ExtractError> {
    if looks_binary(html) {
        return Err(ExtractError::Parse(
            "input looks like binary data, not HTML".to_owned(),
        ));
    }

    let source = String::from_utf8_lossy(html);
    let document = Html::parse_document(&source);

    let mut parts = Vec::new();
    if let Some(title) = page_title(&document) {
        parts.push(ContentPart::Title(title));
    }

    let region = MainRegion::locate(&document);
    tracing::debug!(
        region = region.root.value().name(),
        fallback = region.fallback,
        "located main content region"
    );
    region.walk(options, &mut parts);

    Ok(parts)
}

fn assemble(parts: Vec<ContentPart>) -> Result<Extraction, ExtractError> {
    match parts.as_slice() {
        [] => Err(ExtractError::NothingExtracted),
        [title @ ContentPart::Title(_)] => Ok(Extraction {
            text: title.to_string(),
            body_found: false,
        }),
        _ => Ok(Extraction {
            text: parts
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(PART_SEPARATOR),
            body_found: true,
        }),
    }
}

fn looks_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(1024).any(|b| *b == 0)
}

/// Collapses every whitespace run to one space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn page_title(document: &Html) -> Option<String> {
    let title = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "title")?;
    let text = title.text().collect::<String>().trim().to_owned();
    (!text.is_empty()).then_some(text)
}

/// Element kinds the walk dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Heading(u8),
    Paragraph,
    ListItem,
    Table,
    Code,
}

impl ElementKind {
    /// `inside_text` is true below a heading, paragraph or list item; an
    /// inline `<code>` there stays part of the surrounding text.
    fn classify(el: &ElementRef<'_>, inside_text: bool) -> Option<Self> {
        let name = el.value().name();
        match name {
            "p" | "blockquote" => Some(Self::Paragraph),
            "li" => Some(Self::ListItem),
            "table" => Some(Self::Table),
            "pre" => Some(Self::Code),
            "code" if !inside_text => Some(Self::Code),
            _ => heading_level(name).map(Self::Heading),
        }
    }

    /// Emitted as its own part even when nested in another content element.
    fn stands_alone(self) -> bool {
        matches!(self, Self::Table | Self::Code | Self::ListItem)
    }
}

fn heading_level(name: &str) -> Option<u8> {
    match name.as_bytes() {
        [b'h', level @ b'1'..=b'6'] => Some(level - b'0'),
        _ => None,
    }
}

/// Walk state inherited from ancestors.
#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    /// Below a heading, paragraph, blockquote or list item.
    inside_text: bool,
    /// Below an element whose text was emitted.
    absorbed: bool,
}

struct MainRegion<'a> {
    root: ElementRef<'a>,
    /// No main-content selector matched; structural chrome is stripped too.
    fallback: bool,
}

impl<'a> MainRegion<'a> {
    fn locate(document: &'a Html) -> Self {
        for selector in &SELECTORS.main_content {
            if let Some(root) = document.select(selector).next() {
                return Self {
                    root,
                    fallback: false,
                };
            }
        }

        let root = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .unwrap_or_else(|| document.root_element());
        Self {
            root,
            fallback: true,
        }
    }

    fn is_skipped(&self, el: &ElementRef<'_>) -> bool {
        SILENT_ELEMENTS.contains(&el.value().name())
            || SELECTORS.noise.iter().any(|s| s.matches(el))
            || (self.fallback && SELECTORS.chrome.iter().any(|s| s.matches(el)))
    }

    /// Single pre-order pass over the region.
    fn walk(&self, options: &ExtractOptions, parts: &mut Vec<ContentPart>) {
        let mut stack = vec![(self.root, Scope::default())];

        while let Some((el, scope)) = stack.pop() {
            if el.id() != self.root.id() && self.is_skipped(&el) {
                continue;
            }

            let kind = ElementKind::classify(&el, scope.inside_text);
            let mut emitted = false;
            match kind {
                Some(ElementKind::Table) => {
                    if let Some(part) = self.table_part(&el) {
                        parts.push(part);
                    }
                    continue;
                }
                Some(ElementKind::Code) => {
                    if let Some(part) = code_part(&el) {
                        parts.push(part);
                    }
                    continue;
                }
                // Already part of the enclosing element's text.
                Some(kind) if scope.absorbed && !kind.stands_alone() => {}
                Some(kind) => {
                    if let Some(part) = self.text_part(&el, kind, options) {
                        parts.push(part);
                        emitted = true;
                    }
                }
                None => {}
            }

            let scope = Scope {
                inside_text: scope.inside_text || kind.is_some(),
                absorbed: scope.absorbed || emitted,
            };
            let children = el.children().filter_map(ElementRef::wrap).collect::<Vec<_>>();
            stack.extend(children.into_iter().rev().map(|child| (child, scope)));
        }
    }

    fn text_part(
        &self,
        el: &ElementRef<'_>,
        kind: ElementKind,
        options: &ExtractOptions,
    ) -> Option<ContentPart> {
        let text = normalize_whitespace(&self.own_text(el));
        if text.is_empty() {
            return None;
        }
        let length = text.chars().count();

        match kind {
            ElementKind::Heading(level) => {
                (length > options.min_heading_chars).then_some(ContentPart::Heading { level, text })
            }
            ElementKind::Paragraph => {
                (length > options.min_paragraph_chars).then_some(ContentPart::Paragraph(text))
            }
            ElementKind::ListItem => Some(ContentPart::ListItem(text)),
            ElementKind::Table | ElementKind::Code => None,
        }
    }

    /// Text of `el` minus table, code and list-item descendants, which are
    /// emitted as parts of their own.
    fn own_text(&self, el: &ElementRef<'_>) -> String {
        let mut out = String::new();
        self.collect_text(el, true, &mut out);
        out
    }

    fn collect_text(&self, el: &ElementRef<'_>, exclude_parts: bool, out: &mut String) {
        for child in el.children() {
            match child.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) if element.name() == "br" => out.push(' '),
                Node::Element(_) => {
                    let Some(child) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if self.is_skipped(&child) {
                        continue;
                    }
                    if exclude_parts
                        && ElementKind::classify(&child, true).is_some_and(ElementKind::stands_alone)
                    {
                        continue;
                    }
                    let block = is_block(child.value().name());
                    if block {
                        out.push(' ');
                    }
                    self.collect_text(&child, exclude_parts, out);
                    if block {
                        out.push(' ');
                    }
                }
                _ => {}
            }
        }
    }

    fn table_part(&self, table: &ElementRef<'_>) -> Option<ContentPart> {
        let caption = table
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "caption")
            .map(|caption| normalize_whitespace(&self.plain_text(&caption)))
            .filter(|caption| !caption.is_empty());

        let rows = table
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "tr")
            .map(|row| {
                row.descendants()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| matches!(el.value().name(), "th" | "td"))
                    .map(|cell| normalize_whitespace(&self.plain_text(&cell)))
                    .collect::<Vec<_>>()
            })
            .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
            .collect::<Vec<_>>();

        if rows.is_empty() {
            return None;
        }
        Some(ContentPart::Table { caption, rows })
    }

    fn plain_text(&self, el: &ElementRef<'_>) -> String {
        let mut out = String::new();
        self.collect_text(el, false, &mut out);
        out
    }
}

fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

fn code_part(el: &ElementRef<'_>) -> Option<ContentPart> {
    let raw = el.text().collect::<String>();
    let code = raw.trim();
    (!code.is_empty()).then(|| ContentPart::Code(code.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const LONG_PARAGRAPH: &str =
        "This is a long paragraph with more than twenty characters and it should be extracted as body content.";

    fn extract(html: &str) -> Extraction {
        extract_content(html.as_bytes()).unwrap()
    }

    #[test]
    fn empty_document_extracts_nothing() {
        let err = extract_content(b"<html><head><title></title></head><body></body></html>")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NothingExtracted);
    }

    #[test]
    fn short_paragraph_leaves_title_only() {
        let result = extract(
            "<html><head><title>Test Title</title></head><body><p>Short text</p></body></html>",
        );
        assert!(!result.body_found);
        assert_eq!(result.text, "【TITLE】 Test Title");
    }

    #[test]
    fn title_is_trimmed() {
        let result = extract("<html><head><title>  Spaced Title \n</title></head></html>");
        assert_eq!(result.text, "【TITLE】 Spaced Title");
    }

    #[test]
    fn main_content_with_title() {
        let result = extract(&format!(
            "<html><head><title>Title</title></head><body><main><p>{LONG_PARAGRAPH}</p></main></body></html>"
        ));
        assert!(result.body_found);
        assert_eq!(result.text, format!("【TITLE】 Title\n\n{LONG_PARAGRAPH}"));
    }

    #[test]
    fn headings_and_paragraphs_keep_order_and_thresholds() {
        let result = extract(&format!(
            "<html><head><title>Test Page</title></head><body><article>
                <h1>Heading 1 Long Enough Title</h1>
                <p>Short</p>
                <h3>Abc</h3>
                <h2>H2 Long Enough</h2>
                <p>{LONG_PARAGRAPH}</p>
            </article></body></html>"
        ));
        assert_eq!(
            result.text,
            format!(
                "【TITLE】 Test Page\n\n## Heading 1 Long Enough Title\n\n## H2 Long Enough\n\n{LONG_PARAGRAPH}"
            )
        );
    }

    #[test]
    fn paragraph_threshold_is_strict() {
        let exactly_twenty = "abcdefghij abcdefghi";
        assert_eq!(exactly_twenty.chars().count(), 20);
        let twenty_one = "abcdefghij abcdefghij";

        let result = extract(&format!(
            "<html><body><article><p>{exactly_twenty}</p><p>{twenty_one}</p></article></body></html>"
        ));
        assert_eq!(result.text, twenty_one);
    }

    #[test]
    fn heading_of_four_chars_is_kept() {
        let result = extract("<html><body><article><h2>Abcd</h2><h2>Abc</h2></article></body></html>");
        assert_eq!(result.text, "## Abcd");
    }

    #[test]
    fn thresholds_count_characters_not_bytes() {
        // 13 characters, 39 bytes.
        let japanese = "日本語のテキストです。短い";
        let result = extract(&format!(
            "<html><head><title>T</title></head><body><article><p>{japanese}</p></article></body></html>"
        ));
        assert!(!result.body_found);
    }

    #[test]
    fn table_and_pre_in_document_order() {
        let result = extract(
            "<html><head><title>Code Table</title></head><body><main>
               <article>
                  <p>Intro text</p>
                  <table><caption>Data Table</caption><tr><td>Col1</td><td>Val1</td></tr></table>
                  <pre>func hello() {}</pre>
               </article>
             </main></body></html>",
        );
        assert!(result.body_found);
        assert_eq!(
            result.text,
            "【TITLE】 Code Table\n\n【CAPTION】 Data Table\nCol1 | Val1\n\n```\nfunc hello() {}\n```"
        );
    }

    #[test]
    fn heading_paragraph_table_order() {
        let result = extract(&format!(
            "<html><body><article>
                <h1>First heading</h1>
                <p>{LONG_PARAGRAPH}</p>
                <table><tr><th>Name</th><th>Value</th></tr><tr><td>a</td><td>1</td></tr></table>
            </article></body></html>"
        ));
        let heading = result.text.find("## First heading").unwrap();
        let paragraph = result.text.find(LONG_PARAGRAPH).unwrap();
        let table = result.text.find("Name | Value\na | 1").unwrap();
        assert!(heading < paragraph && paragraph < table);
    }

    #[test]
    fn list_items_are_always_kept() {
        let result = extract(
            "<html><head><title>List Test</title></head><body><main><ul><li>Item 1</li><li>Item 2</li></ul></main></body></html>",
        );
        assert_eq!(result.text, "【TITLE】 List Test\n\nItem 1\n\nItem 2");
    }

    #[test]
    fn nested_list_items_are_not_duplicated() {
        let result = extract(
            "<html><body><main><ul><li>Outer <ul><li>Inner</li></ul></li></ul></main></body></html>",
        );
        assert_eq!(result.text, "Outer\n\nInner");
    }

    #[test]
    fn list_item_wrapping_paragraph_is_kept() {
        let result = extract(
            "<html><body><div class=\"markdown-body\"><ul>
                <li><p>Item 1</p></li>
                <li><p>Item 2</p></li>
            </ul></div></body></html>",
        );
        assert_eq!(result.text, "Item 1\n\nItem 2");
    }

    #[test]
    fn block_children_of_list_item_form_one_part() {
        let parts = extract_parts(
            b"<html><body><main><ol><li><h3>Step one</h3><p>Do it</p><pre>make</pre></li></ol></main></body></html>",
            &ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(
            parts,
            vec![
                ContentPart::ListItem("Step one Do it".to_owned()),
                ContentPart::Code("make".to_owned()),
            ]
        );
    }

    #[test]
    fn blockquote_of_short_paragraphs_is_kept() {
        let result = extract(
            "<html><body><article><blockquote><p>Short line one</p><p>Short line two</p></blockquote></article></body></html>",
        );
        assert_eq!(result.text, "Short line one Short line two");
    }

    #[test]
    fn code_keeps_internal_whitespace() {
        let result = extract(
            "<html><body><article><pre>\n  fn main() {\n      println!(\"hi\");\n  }\n</pre></article></body></html>",
        );
        assert_eq!(
            result.text,
            "```\nfn main() {\n      println!(\"hi\");\n  }\n```"
        );
    }

    #[test]
    fn inline_code_stays_in_paragraph() {
        let result = extract(
            "<html><body><article><p>Call <code>extract_content</code> with the raw page bytes.</p></article></body></html>",
        );
        assert_eq!(result.text, "Call extract_content with the raw page bytes.");
    }

    #[test]
    fn table_nested_in_paragraph_appears_once() {
        let result = extract(&format!(
            "<html><body><div class=\"entry-content\"><blockquote>{LONG_PARAGRAPH}<table><tr><td>Only</td><td>Once</td></tr></table></blockquote></div></body></html>"
        ));
        assert_eq!(result.text, format!("{LONG_PARAGRAPH}\n\nOnly | Once"));
        assert_eq!(result.text.matches("Only").count(), 1);
    }

    #[test]
    fn pre_nested_in_list_item_is_excluded_from_item_text() {
        let result = extract(
            "<html><body><main><ul><li>Run it:<pre>cargo run</pre></li></ul></main></body></html>",
        );
        assert_eq!(result.text, "Run it:\n\n```\ncargo run\n```");
    }

    #[test]
    fn noise_regions_are_removed() {
        let result = extract(&format!(
            "<html><body><article>
                <p>{LONG_PARAGRAPH}</p>
                <div class=\"related-posts\"><p>Related post that should never be extracted.</p></div>
                <div class=\"social-share\"><li>Share</li></div>
                <section class=\"comments\"><p>A comment that should never be extracted here.</p></section>
                <div class=\"advertisement\"><p>Buy something now from our sponsor today!</p></div>
            </article></body></html>"
        ));
        assert_eq!(result.text, LONG_PARAGRAPH);
    }

    #[test]
    fn region_root_with_noise_class_is_kept() {
        let result = extract(&format!(
            "<html><body><article class=\"entry comments\">
                <p>{LONG_PARAGRAPH}</p>
                <div class=\"comments\"><p>A nested comment thread that is still noise.</p></div>
            </article></body></html>"
        ));
        assert_eq!(result.text, LONG_PARAGRAPH);
    }

    #[test]
    fn selector_priority_prefers_article_over_earlier_content_div() {
        let result = extract(&format!(
            "<html><body>
                <div id=\"content\"><p>Content container paragraph outside the article.</p>
                  <article><p>{LONG_PARAGRAPH}</p></article>
                </div>
            </body></html>"
        ));
        assert_eq!(result.text, LONG_PARAGRAPH);
    }

    #[test]
    fn fallback_strips_structural_chrome() {
        let result = extract(&format!(
            "<html><head><title>Fallback</title><style>.x {{ color: red }}</style></head><body>
                <header><p>Site header with a long enough line of text.</p></header>
                <nav><ul><li>Home</li></ul></nav>
                <div><p>{LONG_PARAGRAPH}</p></div>
                <aside><p>Sidebar text that is definitely long enough.</p></aside>
                <div class=\"sidebar\"><li>Archive</li></div>
                <form><p>Subscribe to the newsletter for more updates.</p></form>
                <script>var long = 'script text should never be extracted';</script>
                <footer><p>Footer content that is long enough to pass.</p></footer>
            </body></html>"
        ));
        assert_eq!(result.text, format!("【TITLE】 Fallback\n\n{LONG_PARAGRAPH}"));
    }

    #[test]
    fn inline_markup_does_not_split_words() {
        let result = extract(
            "<html><body><article><p>An un<em>believ</em>able <a href=\"/x\">linked</a> sentence here.</p><div><p>First block</p>second block text that is long</div></article></body></html>",
        );
        // Loose text directly under a <div> belongs to no content element.
        assert_eq!(result.text, "An unbelievable linked sentence here.");
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(
            normalize_whitespace("  Hello \t  world \n\n  test  "),
            "Hello world test"
        );
        let result = extract(
            "<html><body><article><p>\n\tSpread   across\n   several\t\tlines of markup text\n</p></article></body></html>",
        );
        assert_eq!(result.text, "Spread across several lines of markup text");
    }

    #[test]
    fn empty_table_rows_are_skipped() {
        let result = extract(
            "<html><body><article><table><caption>Empty</caption><tr><td> </td></tr></table><h2>Tail heading</h2></article></body></html>",
        );
        assert_eq!(result.text, "## Tail heading");
    }

    #[test]
    fn table_cells_are_normalized() {
        let part = ContentPart::Table {
            caption: None,
            rows: vec![vec!["a".to_owned(), "b".to_owned()]],
        };
        assert_eq!(part.to_string(), "a | b");

        let result = extract(
            "<html><body><article><table><tr><th>  Multi\n line  </th><td>x</td></tr></table></article></body></html>",
        );
        assert_eq!(result.text, "Multi line | x");
    }

    #[test]
    fn binary_input_is_a_parse_failure() {
        let err = extract_content(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
    }

    #[test]
    fn malformed_html_is_best_effort() {
        let result = extract(&format!("<html><body><article><p>{LONG_PARAGRAPH}<div><p>unclosed"));
        assert!(result.body_found);
        assert!(result.text.starts_with(LONG_PARAGRAPH));
    }

    #[test]
    fn custom_thresholds_apply() {
        let options = ExtractOptions {
            min_paragraph_chars: 3,
            min_heading_chars: 0,
        };
        let result = extract_content_with(
            b"<html><body><article><h2>Hi</h2><p>Tiny</p></article></body></html>",
            &options,
        )
        .unwrap();
        assert_eq!(result.text, "## Hi\n\nTiny");
    }

    #[test]
    fn parts_carry_element_kinds() {
        let parts = extract_parts(
            b"<html><head><title>T</title></head><body><article><h3>Section</h3><li>x</li><code>let a = 1;</code></article></body></html>",
            &ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(
            parts,
            vec![
                ContentPart::Title("T".to_owned()),
                ContentPart::Heading {
                    level: 3,
                    text: "Section".to_owned()
                },
                ContentPart::ListItem("x".to_owned()),
                ContentPart::Code("let a = 1;".to_owned()),
            ]
        );
    }
}
