//! Outline editing core
//!
//! The canonical outline is a flat sequence of lines whose hierarchy is
//! implied by leading spaces. Everything else is derived from it:
//!
//! - `indent.rs` - Levels, children and subtrees from indentation
//! - `sequence.rs` - The canonical line store
//! - `cursor.rs` - Absolute offsets and line/column positions
//! - `collapse.rs` - The set of collapsed lines
//! - `ops.rs` - Structural edit operations
//! - `projector.rs` - Displayed view with fold indicators, and its inverse
//! - `session.rs` - One open outline, bridging displayed and canonical space

pub mod collapse;
pub mod cursor;
pub mod indent;
pub mod ops;
pub mod projector;
pub mod sequence;
pub mod session;

pub use collapse::CollapseSet;
pub use cursor::LinePosition;
pub use ops::{EditOutcome, EditState};
pub use projector::{project, reconcile, FoldMarker, ProjectedView};
pub use sequence::LineSequence;
pub use session::{Caret, OutlineSession, SaveStatus};
