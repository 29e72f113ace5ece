use tokio::io::AsyncReadExt;
use tracing::{debug, error};

/// Reads a whole text file from `path`; `-` reads standard input instead.
///
/// ```ignore
/// let payload = pulse_util::read_text("./buffer/hisHq.json").await?;
/// ```
pub async fn read_text(path: &str) -> std::io::Result<String> {
    let mut text = String::new();
    if path == "-" {
        debug!("reading payload from stdin");
        tokio::io::stdin().read_to_string(&mut text).await?;
    } else {
        debug!("reading payload from {path}");
        text = tokio::fs::read_to_string(path).await.map_err(|e| {
            error!("failed to read {path}: {e}");
            e
        })?;
    }
    Ok(text)
}
