// Job posting scraping: fetch a page, reduce it to visible text, and locate
// the job description within it.

pub mod fetcher;
pub mod locator;

pub use fetcher::{FetchError, JobFetcher};
