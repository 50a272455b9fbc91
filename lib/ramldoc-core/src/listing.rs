use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::fs;

use crate::config::FileFilter;
use crate::error::Error;

/// Lists the files under `path` accepted by `filter`.
///
/// A single file yields `[path]` when the filter accepts it, nothing
/// otherwise. A directory yields its matching file entries in name order,
/// descending into subdirectories only when `recursive` is set. A missing
/// path is an [`Error::InputNotFound`], propagated to the caller.
pub(crate) fn list_files<'a>(
    path: &'a Path,
    recursive: bool,
    filter: &'a FileFilter,
) -> BoxFuture<'a, Result<Vec<PathBuf>, Error>> {
    async move {
        let metadata = fs::metadata(path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                Error::InputNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io(source)
            }
        })?;

        if !metadata.is_dir() {
            let matched = filter.matches(path);
            return Ok(if matched {
                vec![path.to_path_buf()]
            } else {
                Vec::new()
            });
        }

        // Name-sorted so the listing order does not depend on the platform's
        // readdir order.
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(path).await?;
        while let Some(entry) = dir.next_entry().await? {
            let file_type = entry.file_type().await?;
            entries.push((entry.path(), file_type.is_dir()));
        }
        entries.sort();

        let mut files = Vec::new();
        for (entry_path, is_dir) in entries {
            if is_dir {
                if recursive {
                    files.extend(list_files(&entry_path, recursive, filter).await?);
                }
            } else if filter.matches(&entry_path) {
                files.push(entry_path);
            }
        }
        Ok(files)
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_list_a_single_matching_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("api.raml");
        std::fs::write(&file, "#%RAML 1.0\ntitle: A\n")?;

        let files = list_files(&file, false, &FileFilter::default()).await?;
        assert_eq!(files, vec![file]);
        Ok(())
    }

    #[tokio::test]
    async fn should_skip_a_single_rejected_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "notes")?;

        let files = list_files(&file, false, &FileFilter::default()).await?;
        assert!(files.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn should_skip_subdirectories_unless_recursive() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("b.raml"), "#%RAML 1.0\n")?;
        std::fs::write(dir.path().join("a.raml"), "#%RAML 1.0\n")?;
        std::fs::write(dir.path().join("skip.yaml"), "")?;
        std::fs::create_dir(dir.path().join("nested"))?;
        std::fs::write(dir.path().join("nested/c.raml"), "#%RAML 1.0\n")?;

        let flat = list_files(dir.path(), false, &FileFilter::default()).await?;
        assert_eq!(
            flat,
            vec![dir.path().join("a.raml"), dir.path().join("b.raml")]
        );

        let deep = list_files(dir.path(), true, &FileFilter::default()).await?;
        assert_eq!(
            deep,
            vec![
                dir.path().join("a.raml"),
                dir.path().join("b.raml"),
                dir.path().join("nested/c.raml"),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn should_fail_on_missing_path() {
        let result = list_files(Path::new("/does/not/exist"), false, &FileFilter::default()).await;
        assert!(matches!(result, Err(Error::InputNotFound { .. })));
    }
}
