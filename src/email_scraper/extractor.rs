// src/email_scraper/extractor.rs
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;

/// Class/id substrings that mark an element as worth re-scanning.
const EMAIL_INDICATORS: [&str; 4] = ["email", "mail", "e-mail", "contact"];

/// Attributes that sometimes carry an address.
const EMAIL_ATTRS: [&str; 5] = ["href", "data-email", "title", "alt", "content"];

pub struct EmailExtractor {
    plain: Regex,
    obfuscated: Regex,
    mailto: Regex,
    encoded: Regex,
    strict: Regex,
}

impl EmailExtractor {
    pub fn new() -> Self {
        Self {
            // Standard address
            plain: Regex::new(r"(?i)[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap(),
            // Tolerates [at]/(at) separators and stray whitespace
            obfuscated: Regex::new(
                r"(?i)[a-zA-Z0-9._%+-]+\s*(?:@|\\u0040|\[at\]|\(at\))\s*[a-zA-Z0-9.-]+\s*(?:\.|\[dot\]|\(dot\))\s*[a-zA-Z]{2,}",
            )
            .unwrap(),
            // mailto: links, with or without spaces
            mailto: Regex::new(r"(?i)mailto:\s*([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})")
                .unwrap(),
            // Entity/percent-encoded addresses
            encoded: Regex::new(
                r"(?i)[a-zA-Z0-9._%+-]+\s*(?:%40|&#64;|&64;)\s*[a-zA-Z0-9.-]+\s*(?:\.|&#46;|&46;)\s*[a-zA-Z]{2,}",
            )
            .unwrap(),
            strict: Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap(),
        }
    }

    /// Normalize one candidate: strip whitespace, undo common obfuscation,
    /// URL/entity-decode, lower-case. `None` when the result fails the
    /// strict pattern.
    pub fn clean_email(&self, candidate: &str) -> Option<String> {
        let compact: String = candidate.split_whitespace().collect();
        let replaced = compact
            .to_lowercase()
            .replace("[at]", "@")
            .replace("(at)", "@")
            .replace("\\u0040", "@")
            .replace("&#64;", "@")
            .replace("[dot]", ".")
            .replace("(dot)", ".")
            .replace("&#46;", ".")
            .replace("mailto:", "");
        let decoded = urlencoding::decode(&replaced)
            .map(|d| d.into_owned())
            .unwrap_or(replaced);

        if self.strict.is_match(&decoded) {
            Some(decoded)
        } else {
            None
        }
    }

    /// Run all four patterns over a chunk of text or markup.
    pub fn extract_from_text(&self, text: &str, emails: &mut HashSet<String>) {
        for pattern in [&self.plain, &self.obfuscated, &self.mailto, &self.encoded] {
            for captures in pattern.captures_iter(text) {
                let candidate = captures
                    .get(1)
                    .or_else(|| captures.get(0))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                if let Some(cleaned) = self.clean_email(candidate) {
                    emails.insert(cleaned);
                }
            }
        }
    }

    /// Extract every address found in a page's text, markup, and the usual
    /// hiding spots (flagged elements, mailto anchors, attributes).
    pub fn extract_from_page(&self, html: &str, url: &str) -> HashSet<String> {
        let document = Html::parse_document(html);
        let mut emails = HashSet::new();

        // Elements whose class or id suggests contact content
        let any_selector = Selector::parse("*").unwrap();
        for element in document.select(&any_selector) {
            let class = element.value().attr("class").unwrap_or_default();
            let id = element.value().attr("id").unwrap_or_default();
            let class = class.to_lowercase();
            let id = id.to_lowercase();
            if EMAIL_INDICATORS
                .iter()
                .any(|ind| class.contains(ind) || id.contains(ind))
            {
                self.extract_from_text(&element.html(), &mut emails);
            }
        }

        // mailto anchors
        let anchor_selector = Selector::parse("a[href]").unwrap();
        for anchor in document.select(&anchor_selector) {
            if let Some(href) = anchor.value().attr("href") {
                if href.to_lowercase().contains("mailto:") {
                    if let Some(cleaned) = self.clean_email(href) {
                        emails.insert(cleaned);
                    }
                }
            }
        }

        // Visible text and the raw markup (catches script-embedded addresses)
        let text = document.root_element().text().collect::<Vec<_>>().join(" ");
        self.extract_from_text(&text, &mut emails);
        self.extract_from_text(html, &mut emails);

        // Common tags: element text plus address-bearing attributes
        let tag_selector = Selector::parse("a, p, div, span, strong, li").unwrap();
        for element in document.select(&tag_selector) {
            let element_text = element.text().collect::<Vec<_>>().join(" ");
            self.extract_from_text(&element_text, &mut emails);

            for attr in EMAIL_ATTRS {
                if let Some(value) = element.value().attr(attr) {
                    self.extract_from_text(value, &mut emails);
                }
            }
        }

        debug!("Extracted {} unique emails from {}", emails.len(), url);
        emails
    }
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EmailExtractor {
        EmailExtractor::new()
    }

    #[test]
    fn cleans_bracket_and_paren_obfuscation() {
        let ex = extractor();
        assert_eq!(
            ex.clean_email("sales [at] example.com"),
            Some("sales@example.com".to_string())
        );
        assert_eq!(
            ex.clean_email("info(at)example(dot)com"),
            Some("info@example.com".to_string())
        );
        assert_eq!(
            ex.clean_email("Office [At] Example [Dot] COM"),
            Some("office@example.com".to_string())
        );
    }

    #[test]
    fn cleans_mailto_and_encoded_forms() {
        let ex = extractor();
        assert_eq!(
            ex.clean_email("mailto:Info@Example.COM"),
            Some("info@example.com".to_string())
        );
        assert_eq!(
            ex.clean_email("team%40example.com"),
            Some("team@example.com".to_string())
        );
        assert_eq!(
            ex.clean_email("hello&#64;example&#46;com"),
            Some("hello@example.com".to_string())
        );
    }

    #[test]
    fn rejects_candidates_failing_strict_validation() {
        let ex = extractor();
        assert_eq!(ex.clean_email("not-an-email"), None);
        assert_eq!(ex.clean_email("user@nodot"), None);
        assert_eq!(ex.clean_email(""), None);
        assert_eq!(ex.clean_email("a@b.c"), None); // TLD too short
    }

    #[test]
    fn text_extraction_covers_all_pattern_families() {
        let ex = extractor();
        let mut emails = HashSet::new();
        ex.extract_from_text(
            "write plain@example.com or sales [at] example.com, \
             maybe mailto: linked@example.com or enc%40example.com",
            &mut emails,
        );

        assert!(emails.contains("plain@example.com"));
        assert!(emails.contains("sales@example.com"));
        assert!(emails.contains("linked@example.com"));
        assert!(emails.contains("enc@example.com"));
    }

    #[test]
    fn page_extraction_finds_mailto_anchor_and_obfuscated_text() {
        let ex = extractor();
        let html = r#"
            <html><body>
              <a href="mailto:info@example.com">Contact</a>
              <p>Reach sales [at] example.com for quotes.</p>
            </body></html>
        "#;

        let emails = ex.extract_from_page(html, "https://example.com");
        let mut found: Vec<_> = emails.into_iter().collect();
        found.sort();
        assert_eq!(found, vec!["info@example.com", "sales@example.com"]);
    }

    #[test]
    fn page_extraction_reads_flagged_elements_and_attributes() {
        let ex = extractor();
        let html = r#"
            <html><body>
              <div class="email-box"><!-- office [at] example.com --></div>
              <span data-email="direct@example.com">write us</span>
              <li title="alt [at] example.com">alt channel</li>
            </body></html>
        "#;

        let emails = ex.extract_from_page(html, "https://example.com");
        assert!(emails.contains("office@example.com"));
        assert!(emails.contains("direct@example.com"));
        assert!(emails.contains("alt@example.com"));
    }

    #[test]
    fn extraction_is_idempotent_on_the_same_document() {
        let ex = extractor();
        let html = r#"
            <html><body>
              <a href="mailto:info@example.com">Contact</a>
              <p>plain@example.com and sales (at) example (dot) com</p>
            </body></html>
        "#;

        let first = ex.extract_from_page(html, "https://example.com");
        let second = ex.extract_from_page(html, "https://example.com");
        assert_eq!(first, second);
    }
}
