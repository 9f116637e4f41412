//! # Estuary
//!
//! Builds bounded, per-category video listings from several upstream
//! sources.
//!
//! ## Architecture
//!
//! Every category runs the same pipeline:
//!
//! ```text
//! Source → Normalizer → FilterChain → Dedup → Cap → Artifact → Store
//! ```
//!
//! - [`source`]: keyed search and public feed adapters that soft-fail
//! - [`normalizer`]: entry-scoped feed parsing and record normalization
//! - [`filter`]: inclusion, exclusion and time-window stages
//! - [`pipeline`]: ordered merge, dedup, capping and category builds
//! - [`store`]: JSON artifact writer
//!
//! ## Quick Start
//!
//! ```bash
//! # Build every configured category
//! YOUTUBE_API_KEY=... estuary build
//!
//! # Build one category into a different directory
//! estuary build --category football --output /tmp/content
//!
//! # Show the window used for "last night" categories
//! estuary window --at 2024-03-31T12:00:00Z
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the fetcher,
/// source adapters, category builder and artifact writer.
pub mod app;

/// Command-line interface using clap.
///
/// - `build [--category NAME]...` - Build and write artifacts
/// - `categories` - List configured categories
/// - `window [--at INSTANT]` - Show the previous-day window
/// - `daemon --interval 6h` - Rebuild periodically
pub mod cli;

/// Configuration loaded from `~/.config/estuary/config.toml`.
pub mod config;

/// Foreground daemon for periodic rebuilds.
pub mod daemon;

/// Core domain models.
///
/// - [`SourceQuery`](domain::SourceQuery): one configured upstream call
/// - [`RawCandidate`](domain::RawCandidate): a record before normalization
/// - [`ContentItem`](domain::ContentItem): the canonical output unit
/// - [`FeedArtifact`](domain::FeedArtifact): a finished category listing
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for a single GET
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Filter chain stages and civil-day time windows.
pub mod filter;

/// Feed parsing and record normalization.
pub mod normalizer;

/// Category builds: ordered merge, dedup and capping.
pub mod pipeline;

/// Source adapters for search and feed providers.
pub mod source;

/// Artifact persistence.
pub mod store;
