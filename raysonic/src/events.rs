//! Event types for RaySonic

use crate::sampling::{AcousticEstimate, SourceAcoustics};
use crate::world::{ListenerId, SourceId};

/// Why a scheduled pass produced no new control values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The listener has no current pose
    ListenerUnavailable,
    /// The source has no current pose
    SourceUnavailable,
    /// The tracked source is no longer registered in the world
    SourceRemoved,
    /// No ray tracer is installed
    NoRayTracer,
    /// No mixer is installed
    NoMixer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RaySonicEvent {
    ListenerUpdated {
        listener_id: ListenerId,
        estimate: AcousticEstimate,
        parameters_written: usize,
    },
    SourceUpdated {
        listener_id: ListenerId,
        source_id: SourceId,
        acoustics: SourceAcoustics,
        parameters_written: usize,
    },
    ListenerSkipped {
        listener_id: ListenerId,
        reason: SkipReason,
    },
    PairSkipped {
        listener_id: ListenerId,
        source_id: SourceId,
        reason: SkipReason,
    },
    DegenerateConfiguration {
        listener_id: Option<ListenerId>,
        source_id: Option<SourceId>,
        message: String,
    },
}

impl RaySonicEvent {
    pub fn listener_id(&self) -> Option<ListenerId> {
        match self {
            Self::ListenerUpdated { listener_id, .. }
            | Self::SourceUpdated { listener_id, .. }
            | Self::ListenerSkipped { listener_id, .. }
            | Self::PairSkipped { listener_id, .. } => Some(*listener_id),
            Self::DegenerateConfiguration { listener_id, .. } => *listener_id,
        }
    }

    pub fn source_id(&self) -> Option<SourceId> {
        match self {
            Self::SourceUpdated { source_id, .. } | Self::PairSkipped { source_id, .. } => {
                Some(*source_id)
            }
            Self::DegenerateConfiguration { source_id, .. } => *source_id,
            _ => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::ListenerSkipped { .. } | Self::PairSkipped { .. }
        )
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::ListenerSkipped { reason, .. } | Self::PairSkipped { reason, .. } => {
                Some(*reason)
            }
            _ => None,
        }
    }
}
