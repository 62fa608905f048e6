//! Environment sampling: direction generation, ray batches and their
//! aggregation into acoustic estimates.

mod direction;
mod estimate;
mod sampler;

pub use direction::DirectionSampler;
pub use estimate::{AcousticEstimate, CastRay, MissPolicy, SampleBatch};
pub use sampler::{AcousticSampler, RayKind, RayObserver, RayRecord, SourceAcoustics};
