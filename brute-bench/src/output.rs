//! Report persistence.
//!
//! Reports are pretty-printed JSON with a 4 space indent:
//!
//! ```text
//! { "<group>": { "<length>": { "input_set", "target_length", "test_count",
//!                              "permutation_count", "attempts": [
//!                                  { "password", "hash", "runtime", "index" } ] } } }
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use brute_keyspace::Report;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::Error;

/// Serializes `report` in the on-disk layout.
pub fn to_json(report: &Report) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::with_capacity(64 * 1024);
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    report.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Writes `report` to `path`.
///
/// Refuses to replace an existing file unless `force` is set. The JSON goes to
/// a sibling temporary file first and is renamed into place, so a failed write
/// never leaves a truncated report behind. Write failures are
/// [`Error::SerializationFailure`]; the report itself is untouched and can be
/// written again.
pub fn write_report(path: &Path, report: &Report, force: bool) -> Result<(), Error> {
    if path.exists() && !force {
        return Err(Error::FileExists { path: path.to_path_buf() });
    }

    let bytes = to_json(report)?;
    let tmp = tmp_path(path);
    let fail = |source| Error::SerializationFailure { path: path.to_path_buf(), source };

    let written = fs::File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));

    if let Err(source) = written {
        let _ = fs::remove_file(&tmp);
        return Err(fail(source));
    }

    Ok(())
}

/// Loads a report written by [`write_report`].
pub fn read_report(path: &Path) -> Result<Report, Error> {
    let contents = fs::read(path)?;
    Ok(serde_json::from_slice(&contents)?)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
