pub mod adapters;
pub mod aggregate;
pub mod fetcher;
pub mod identifier;
pub mod links;
pub mod orchestrator;
pub mod registry;
pub mod runner;
pub mod store;

pub use adapters::{AdapterSet, FetchOutcome, PlatformAdapter};
pub use aggregate::{aggregate, DenominatorBasis};
pub use fetcher::{FetchError, FetchedPage, HttpPageFetcher, PageFetcher};
pub use identifier::{detect_platform, normalize, profile_url};
pub use links::{discover_platform_links, DiscoveredLinks};
pub use orchestrator::{BatchReport, BatchSummary, GranteeReport, ScrapeOrchestrator, ScrapeStage};
pub use presence_common::{
    CanonicalIdentifier, Config, EngagementMetrics, LinkSource, Platform, PlatformLink, Post,
    ProfileStats, ScrapeError, ScrapeErrorKind, ScrapeResult,
};
pub use registry::{load_registry, parse_registry, GranteeTarget};
pub use runner::ActorRunner;
pub use store::{JsonFileStore, ResultStore};
