pub mod artifact;
pub mod category;
pub mod item;
pub mod query;

pub use artifact::FeedArtifact;
pub use category::{Category, WindowRule};
pub use item::{is_video_id, ContentItem, RawCandidate};
pub use query::{SourceKind, SourceQuery, MAX_RESULTS_PER_CALL};
