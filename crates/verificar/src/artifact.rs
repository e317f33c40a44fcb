//! Artifact capture: screenshots, console logs, and page HTML dumps.
//!
//! Capture failures are reported as [`VerifyError::Artifact`] and never
//! change an already-decided outcome; the runner logs them and moves on.

use std::path::Path;

use tracing::debug;

use crate::result::{VerifyError, VerifyResult};
use crate::scenario::{Artifact, ArtifactKind};
use crate::session::Session;

/// Capture one artifact from the session to its declared path.
///
/// Parent directories are created; an existing file is overwritten.
pub async fn capture(session: &Session, artifact: &Artifact) -> VerifyResult<()> {
    match artifact.kind {
        ArtifactKind::Screenshot => {
            let bytes = session
                .screenshot_bytes()
                .await
                .map_err(|e| VerifyError::artifact(e.to_string()))?;
            write_bytes(&artifact.path, &bytes).await?;
        }
        ArtifactKind::ConsoleLog => {
            let lines = session.console_lines().await;
            let mut body = lines.join("\n");
            if !body.is_empty() {
                body.push('\n');
            }
            write_bytes(&artifact.path, body.as_bytes()).await?;
        }
        ArtifactKind::PageHtml => {
            let html = session
                .page_html()
                .await
                .map_err(|e| VerifyError::artifact(e.to_string()))?;
            write_bytes(&artifact.path, html.as_bytes()).await?;
        }
    }
    debug!(path = %artifact.path.display(), "artifact written");
    Ok(())
}

async fn write_bytes(path: &Path, bytes: &[u8]) -> VerifyResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| VerifyError::artifact(format!("{}: {e}", parent.display())))?;
        }
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| VerifyError::artifact(format!("{}: {e}", path.display())))
}

#[cfg(all(test, not(feature = "browser")))]
mod tests {
    use super::*;
    use crate::scenario::Artifact;
    use crate::session::SessionConfig;

    #[tokio::test]
    async fn test_screenshot_written_and_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("shot.png");
        let mut session = Session::open(SessionConfig::new()).await.unwrap();

        capture(&session, &Artifact::screenshot(&path)).await.unwrap();
        assert!(path.exists());

        // Second capture overwrites the same path
        capture(&session, &Artifact::screenshot(&path)).await.unwrap();
        assert!(path.exists());
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_console_log_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.log");
        let mut session = Session::open(SessionConfig::new()).await.unwrap();
        session.navigate("http://localhost:5174/").await.unwrap();
        session.push_console_line("[error] delta sync failed");

        capture(&session, &Artifact::console_log(&path)).await.unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("loaded http://localhost:5174/"));
        assert!(body.contains("delta sync failed"));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_page_html_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        let mut session = Session::open(SessionConfig::new()).await.unwrap();
        session
            .navigate("http://localhost:5173/create-character")
            .await
            .unwrap();

        capture(&session, &Artifact::page_html(&path)).await.unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.contains("create-character"));
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_unwritable_path_is_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not a directory").unwrap();
        let path = blocker.join("shot.png");

        let mut session = Session::open(SessionConfig::new()).await.unwrap();
        let err = capture(&session, &Artifact::screenshot(&path))
            .await
            .unwrap_err();
        assert!(matches!(err, VerifyError::Artifact { .. }));
        session.close().await.unwrap();
    }
}
