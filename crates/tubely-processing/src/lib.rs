//! Tubely media processing
//!
//! Video inspection via an external `ffprobe` executable and aspect-ratio classification
//! of the result.

pub mod aspect;
pub mod probe;

pub use aspect::{classify, AspectRatio, ASPECT_TOLERANCE};
pub use probe::{parse_probe_output, ProbeError, ProbeOutput, ProbeStream, VideoProber};
