// ABOUTME: Versioned release orchestration using the type state pattern.
// ABOUTME: Plan, upload every artifact, then cut the CDN over to the new prefix.

mod artifact;
mod cutover;
mod error;
mod flow;
mod planner;
mod state;
mod upload;

pub use artifact::{
    Artifact, COMPRESSIBLE_EXTENSIONS, CachePolicy, ContentEncoding, ENTRY_POINTS, compress,
};
pub use cutover::{
    CutoverReport, DEFAULT_CUTOVER_ATTEMPTS, INVALIDATE_ALL, InvalidationOutcome, SPA_ENTRY,
    cutover, cutover_with_retry, live_version, origin_for,
};
pub use error::{CutoverError, ReleaseError, ReleaseErrorKind, UploadError};
pub use flow::Release;
pub use planner::{Override, RedeployPolicy, check_idempotent};
pub use state::{Live, Planned, Uploaded};
pub use upload::{
    DEFAULT_UPLOAD_CONCURRENCY, NoProgress, UploadProgress, collect_artifacts, upload,
};
