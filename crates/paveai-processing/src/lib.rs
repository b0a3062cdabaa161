//! Video processing collaborators for the PaveAI backend.

pub mod detector;

pub use detector::{ScriptDetector, VideoDetector};
