// Service exports
pub mod detail;
pub mod ports;
pub mod postgres;
pub mod rate_limit;
pub mod search;

pub use detail::PlaceDetailClient;
pub use ports::{
    PlaceDetailProvider, PlaceSearchProvider, PreferenceStore, ProviderError, SearchPage,
    SearchQuery, StoreError,
};
pub use postgres::PostgresPreferenceStore;
pub use rate_limit::provider_limiter;
pub use search::LocalSearchClient;
