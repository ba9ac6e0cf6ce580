pub mod extractor;
pub mod scraper;

pub use scraper::EmailScraper;
