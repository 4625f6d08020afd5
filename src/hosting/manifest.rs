// ABOUTME: Minimal vercel.json written into the working tree when the project has none.
// ABOUTME: Declares the build source and turns on git-triggered deployments.

use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::Path;

pub const MANIFEST_FILENAME: &str = "vercel.json";

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    version: u8,
    builds: [BuildEntry<'a>; 1],
    git: GitSettings,
}

#[derive(Debug, Serialize)]
struct BuildEntry<'a> {
    src: &'a str,
    #[serde(rename = "use")]
    builder: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GitSettings {
    deployment_enabled: bool,
}

/// Render the manifest for `builder` (e.g. `@vercel/next`).
pub fn render(builder: &str) -> String {
    let manifest = Manifest {
        version: 2,
        builds: [BuildEntry {
            src: "package.json",
            builder,
        }],
        git: GitSettings {
            deployment_enabled: true,
        },
    };
    // Serializing plain structs of strings and bools cannot fail.
    serde_json::to_string_pretty(&manifest).unwrap_or_default()
}

/// Write the manifest into `dir` unless one already exists.
///
/// Returns `true` only if this call created the file.
pub fn write_if_absent(dir: &Path, builder: &str) -> io::Result<bool> {
    create_if_absent(&dir.join(MANIFEST_FILENAME), |file| {
        file.write_all(render(builder).as_bytes())?;
        file.write_all(b"\n")
    })
}

/// Create `path` and fill it. `Ok(false)` if it already existed.
///
/// A failed fill removes the partial file before the error is returned.
fn create_if_absent<F>(path: &Path, fill: F) -> io::Result<bool>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e),
    };

    if let Err(e) = fill(&mut file) {
        drop(file);
        if let Err(remove) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), "could not remove partial file: {}", remove);
        }
        return Err(e);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_enables_git_deployments() {
        let value: serde_json::Value = serde_json::from_str(&render("@vercel/next")).unwrap();
        assert_eq!(value["version"], 2);
        assert_eq!(value["builds"][0]["src"], "package.json");
        assert_eq!(value["builds"][0]["use"], "@vercel/next");
        assert_eq!(value["git"]["deploymentEnabled"], true);
    }

    #[test]
    fn existing_manifest_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILENAME);
        std::fs::write(&path, "{\"custom\": true}").unwrap();

        assert!(!write_if_absent(dir.path(), "@vercel/next").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"custom\": true}");
    }

    #[test]
    fn missing_manifest_is_created() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_if_absent(dir.path(), "@vercel/next").unwrap());
        assert!(dir.path().join(MANIFEST_FILENAME).exists());
    }

    #[test]
    fn failed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILENAME);

        let err = create_if_absent(&path, |file| {
            file.write_all(b"{\"version\"")?;
            Err(io::Error::new(ErrorKind::StorageFull, "disk full"))
        })
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StorageFull);
        assert!(!path.exists());
    }
}
