//! High-level procedures tying the [`core`](crate::core) models and the
//! [`engine`](crate::engine) tasks together.
//!
//! [`annotate::InteractionPipeline`] is the entry point: it validates a structure,
//! detects residue contacts and classifies the hydrogen bonds between them.

pub mod annotate;
