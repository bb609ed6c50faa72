use std::io::IsTerminal;
use std::path::Path;

use crate::error::ReviewError;

/// Conventional diff location when nothing else is given, matching the CI
/// step that writes the PR diff next to the checkout.
pub const DEFAULT_DIFF_PATH: &str = "diff.txt";

/// Load the diff to review: an explicit path, piped stdin, or `diff.txt`.
///
/// The contents are opaque; no diff-format validation happens here or
/// anywhere downstream.
pub async fn load_diff(path: Option<&Path>) -> Result<String, ReviewError> {
    let diff = match path {
        Some(p) => read_diff_file(p).await?,
        None if !std::io::stdin().is_terminal() => {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
        None => read_diff_file(Path::new(DEFAULT_DIFF_PATH)).await?,
    };

    if diff.trim().is_empty() {
        return Err(ReviewError::Config(
            "diff input is empty, nothing to review".to_string(),
        ));
    }

    Ok(diff)
}

async fn read_diff_file(path: &Path) -> Result<String, ReviewError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ReviewError::DiffRead {
            path: path.to_path_buf(),
            source,
        })
}
