pub mod aggregator;
pub mod fetcher;

pub use aggregator::ChainAggregator;
pub use fetcher::MetricsFetcher;
