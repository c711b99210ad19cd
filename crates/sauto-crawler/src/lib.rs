pub mod audit;
pub mod client;
pub mod crawl;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod sink;
pub mod total;
pub mod types;

pub use audit::{LineAudit, RequestAudit};
pub use client::SautoClient;
pub use crawl::{CrawlTotals, Crawler};
pub use error::CrawlerError;
pub use sink::{RecordSink, VecSink};
pub use types::{Codebook, ListingRecord, SearchListing, SellerType};
