// Applying fixes to source files

mod editor;
mod safe_fix;

pub use editor::FileEditor;
pub use safe_fix::{select_fixes, FixSummary, SafeFixer};
