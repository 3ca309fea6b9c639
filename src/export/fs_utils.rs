use crate::errors::{AppError, AppResult};
use crate::ui::prompt::ask_confirmation;
use std::path::Path;

/// An export target may be written when it does not exist yet, when
/// `force` is set, or when the user agrees to replace it.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if force || !path.exists() {
        return Ok(());
    }

    if ask_confirmation(&format!("'{}' already exists. Overwrite it?", path.display())) {
        Ok(())
    } else {
        Err(AppError::Export(format!(
            "{} left untouched, export cancelled",
            path.display()
        )))
    }
}
