use directories::ProjectDirs;
use std::path::PathBuf;

use crate::error::StoreError;

pub const APP_QUALIFIER: &str = "com";
pub const APP_ORG: &str = "bookshelf";
pub const APP_NAME: &str = "bookshelf";

pub const SESSION_FILE: &str = "session.json";

pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME).ok_or(StoreError::NoDataDir)?;
    Ok(dirs.data_dir().to_path_buf())
}
