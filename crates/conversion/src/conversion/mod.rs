pub mod queue;
pub mod systems;

pub use queue::{PendingReplacement, PendingReplacements};
pub use systems::{apply_pending_replacements, queue_barricade_replacements, ConversionSettings};
