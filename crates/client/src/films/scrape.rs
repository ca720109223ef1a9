//! Film-diary page scraping.
//!
//! Fetches the configured diary page and reads the latest entry out of the
//! markup: title, poster, and star rating. The poster URL arrives as a
//! thumbnail and is rewritten to the larger rendition the site displays.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

use super::FilmDetails;
use crate::fetch::{FetchClient, FetchConfig};
use folio_core::Error;
use folio_core::config::AppConfig;

fn poster_size_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-0-(\d+)-0-(\d+)").expect("invalid regex"))
}

/// Rewrite a thumbnail poster URL to the larger rendition.
pub fn upscale_poster_url(src: &str) -> String {
    let upscaled = src.replacen("35", "100", 1);
    poster_size_re().replace(&upscaled, "-0-70-0-105").into_owned()
}

/// Read the latest diary entry out of the page markup.
///
/// The entry cell must be present; everything inside it is optional and
/// simply absent from the result when missing. Placeholder posters count
/// as missing.
pub fn parse_diary(html: &str) -> Result<FilmDetails, Error> {
    let document = Html::parse_document(html);

    let entry_selector = Selector::parse(".td-film-details").expect("invalid selector");
    let title_selector = Selector::parse("h3.headline-3 a").expect("invalid selector");
    let poster_selector = Selector::parse("img").expect("invalid selector");
    let rating_selector = Selector::parse("span.rating").expect("invalid selector");

    let Some(entry) = document.select(&entry_selector).next() else {
        return Err(Error::Scrape("no diary entry found".into()));
    };

    let title = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let image_url = entry
        .select(&poster_selector)
        .next()
        .and_then(|el| el.value().attr("src"))
        .filter(|src| !src.contains("empty-poster"))
        .map(upscale_poster_url);

    let stars = document
        .select(&rating_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(FilmDetails { title, image_url, stars })
}

/// Scraper bound to one diary URL.
#[derive(Debug, Clone)]
pub struct DiaryScraper {
    fetch: FetchClient,
    url: String,
}

impl DiaryScraper {
    pub fn new(fetch: FetchClient, url: impl Into<String>) -> Self {
        Self { fetch, url: url.into() }
    }

    /// Build a scraper for the diary URL named by the configuration.
    pub fn from_app(config: &AppConfig) -> Result<Self, Error> {
        let fetch = FetchClient::new(FetchConfig::from_app(config))?;
        Ok(Self::new(fetch, config.diary_url.clone()))
    }

    /// The diary URL this scraper reads.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the diary page and parse its latest entry.
    pub async fn scrape(&self) -> Result<FilmDetails, Error> {
        let response = self.fetch.fetch(&self.url).await?;
        let details = parse_diary(&response.text())?;
        tracing::debug!("films: scraped latest entry {:?}", details.title);
        Ok(details)
    }
}
