//! Headless-renderer bridge.
//!
//! The CDP driver is a blocking API, so the capture sequence runs on a
//! dedicated blocking task and the async judge awaits its result. The
//! artifact is written to a temp file owned by the closure, so cleanup
//! happens on every exit path including panics and timeouts.

use std::io::Write;
use std::time::Duration;

use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from the render/capture sequence. All of them degrade the
/// validation stage to the text-only path; none abort a run.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("renderer unavailable: {0}")]
    Unavailable(String),

    #[error("render failed: {0}")]
    Failed(String),

    #[error("render timed out after {0:?}")]
    Timeout(Duration),
}

/// Drives a headless Chromium to render a document and capture a
/// full-page PNG screenshot.
pub struct PageRenderer {
    window_size: (u32, u32),
    timeout: Duration,
}

impl PageRenderer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            window_size: (1280, 1024),
            timeout,
        }
    }

    /// Whether a renderer binary can be located at all.
    pub fn is_available() -> bool {
        headless_chrome::browser::default_executable().is_ok()
    }

    /// Render `document` and return PNG bytes.
    ///
    /// Load → wait for navigation quiescence → capture. Any failure,
    /// including exceeding the configured timeout, is an error the caller
    /// degrades on.
    pub async fn capture_document(&self, document: String) -> Result<Vec<u8>, RenderError> {
        let window_size = self.window_size;
        let timeout = self.timeout;

        let task = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, RenderError> {
            // The temp file lives exactly as long as this closure.
            let mut file = tempfile::Builder::new()
                .prefix("protoforge-render-")
                .suffix(".html")
                .tempfile()
                .map_err(|e| RenderError::Failed(format!("temp file: {}", e)))?;
            file.write_all(document.as_bytes())
                .map_err(|e| RenderError::Failed(format!("temp write: {}", e)))?;
            file.flush()
                .map_err(|e| RenderError::Failed(format!("temp flush: {}", e)))?;

            let url = format!("file://{}", file.path().display());

            let options = LaunchOptions::default_builder()
                .headless(true)
                .window_size(Some(window_size))
                .idle_browser_timeout(timeout)
                .build()
                .map_err(|e| RenderError::Unavailable(e.to_string()))?;
            let browser =
                Browser::new(options).map_err(|e| RenderError::Unavailable(e.to_string()))?;

            let tab = browser
                .new_tab()
                .map_err(|e| RenderError::Failed(e.to_string()))?;
            tab.set_default_timeout(timeout);
            tab.navigate_to(&url)
                .map_err(|e| RenderError::Failed(e.to_string()))?;
            tab.wait_until_navigated()
                .map_err(|e| RenderError::Failed(e.to_string()))?;

            let png = tab
                .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
                .map_err(|e| RenderError::Failed(e.to_string()))?;

            debug!(bytes = png.len(), "captured screenshot");
            Ok(png)
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(RenderError::Failed(join_error.to_string())),
            Err(_) => {
                warn!(timeout = ?self.timeout, "render capture timed out");
                Err(RenderError::Timeout(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_probe_does_not_panic() {
        // Environment dependent; only assert it answers.
        let _ = PageRenderer::is_available();
    }

    #[tokio::test]
    async fn test_capture_fails_cleanly_without_a_browser() {
        if PageRenderer::is_available() {
            return; // only meaningful where no browser is installed
        }
        let renderer = PageRenderer::new(Duration::from_secs(2));
        let result = renderer
            .capture_document("<!DOCTYPE html><html><body>x</body></html>".to_string())
            .await;
        assert!(result.is_err());
    }
}
