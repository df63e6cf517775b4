use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    errors::{AppError, AppResult},
    models::domain::SourceKind,
};

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static SCRIPT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").unwrap());
static WHITESPACE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Turns a generation request's source into plain text for the prompt.
///
/// Text, pdf and youtube sources arrive as already-extracted text and only
/// get cleaned and truncated. Url sources are fetched here.
pub struct SourceService {
    http: reqwest::Client,
    max_chars: usize,
}

impl SourceService {
    pub fn new(max_chars: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            max_chars,
        }
    }

    pub async fn prepare(&self, kind: SourceKind, source: &str) -> AppResult<String> {
        let text = match kind {
            SourceKind::Text | SourceKind::Pdf | SourceKind::Youtube => source.to_string(),
            SourceKind::Url => self.fetch_page(source).await?,
        };

        let cleaned = clean_text(&text, self.max_chars);
        if cleaned.is_empty() {
            return Err(AppError::ValidationError(
                "Source material is empty".to_string(),
            ));
        }
        Ok(cleaned)
    }

    async fn fetch_page(&self, url: &str) -> AppResult<String> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::ValidationError(format!(
                "Not a fetchable URL: {}",
                url
            )));
        }

        log::info!("Fetching source material from {}", url);
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::UpstreamError(format!(
                "Source URL returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        Ok(strip_html(&body))
    }
}

fn strip_html(html: &str) -> String {
    let without_scripts = SCRIPT_PATTERN.replace_all(html, " ");
    TAG_PATTERN.replace_all(&without_scripts, " ").into_owned()
}

fn clean_text(text: &str, max_chars: usize) -> String {
    let collapsed = WHITESPACE_PATTERN.replace_all(text.trim(), " ");
    collapsed.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_html_removes_tags_and_scripts() {
        let html = "<html><head><script>alert(1)</script><style>p{}</style></head>\
                    <body><h1>Title</h1><p>Body text.</p></body></html>";

        let text = clean_text(&strip_html(html), 1000);

        assert_eq!(text, "Title Body text.");
    }

    #[test]
    fn clean_text_collapses_whitespace_and_truncates() {
        let text = clean_text("  a \n\n b \t c  ", 3);
        assert_eq!(text, "a b");
    }

    #[tokio::test]
    async fn text_sources_pass_through_cleaned() {
        let service = SourceService::new(100);

        let prepared = service
            .prepare(SourceKind::Text, "  Ownership   and borrowing.  ")
            .await
            .unwrap();

        assert_eq!(prepared, "Ownership and borrowing.");
    }

    #[tokio::test]
    async fn empty_source_is_rejected() {
        let service = SourceService::new(100);

        let result = service.prepare(SourceKind::Text, "   ").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn non_http_url_is_rejected_without_a_request() {
        let service = SourceService::new(100);

        let result = service.prepare(SourceKind::Url, "ftp://example.com").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
