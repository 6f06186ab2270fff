use std::{fs, io::ErrorKind, path::Path};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use roshambo_types::Result;

use crate::store_error;

/// Reads a whole workbook. A missing file yields the empty workbook.
pub(crate) fn read_workbook<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("Workbook {:?} not found; starting empty", path);
            return Ok(T::default());
        }
        Err(err) => return Err(err.into()),
    };
    if contents.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(&contents)
        .map_err(|err| store_error(format!("malformed workbook {}: {err}", path.display())))
}

/// Overwrites the whole workbook via a sibling temp file and a rename.
pub(crate) fn write_workbook<T: Serialize>(path: &Path, workbook: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let doc = serde_json::to_string_pretty(workbook)?;
    fs::write(&tmp, doc)?;
    fs::rename(&tmp, path)?;
    debug!("Wrote workbook {:?}", path);
    Ok(())
}
