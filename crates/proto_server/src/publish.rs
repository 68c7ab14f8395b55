//! Finalization: materialize an approved (or exhausted) artifact to disk
//! and expose it over the preview server.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use proto_core::{check_artifact, Artifact, CheckMode, EngineResult, Published, Publisher, RunId};

use crate::error::{ServerError, ServerResult};
use crate::preview::PreviewRegistry;

/// A prototype file in the output directory.
#[derive(Debug, Clone, Serialize)]
pub struct PrototypeEntry {
    pub filename: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// Writes prototypes into an output directory and keeps a preview server
/// running over it.
pub struct PreviewPublisher {
    registry: Arc<PreviewRegistry>,
    output_dir: PathBuf,
    preferred_port: u16,
}

impl PreviewPublisher {
    pub fn new(
        registry: Arc<PreviewRegistry>,
        output_dir: impl Into<PathBuf>,
        preferred_port: u16,
    ) -> Self {
        Self {
            registry,
            output_dir: output_dir.into(),
            preferred_port,
        }
    }

    /// The filename a run publishes under.
    pub fn filename_for(run_id: &RunId) -> String {
        format!("prototype_{}.html", run_id.short())
    }

    async fn publish_artifact(
        &self,
        run_id: &RunId,
        artifact: &Artifact,
    ) -> ServerResult<Published> {
        if artifact.markup.trim().is_empty() {
            return Err(ServerError::EmptyArtifact);
        }

        // Strict mode for the document that actually lands on disk; what
        // was only a warning during iteration blocks publishing here.
        let report = check_artifact(artifact, CheckMode::Document);
        if !report.is_valid {
            return Err(ServerError::InvalidArtifact(report.error_summary()));
        }

        std::fs::create_dir_all(&self.output_dir)?;

        let filename = Self::filename_for(run_id);
        let path = self.output_dir.join(&filename);
        // Run ids are unique, so a collision means something else owns the
        // file. Never overwrite it.
        if path.exists() {
            return Err(ServerError::AlreadyExists(path));
        }

        let document = artifact.to_document(&format!("Prototype {}", run_id.short()));
        tokio::fs::write(&path, document).await?;

        let handle = self
            .registry
            .ensure_started(&self.output_dir, self.preferred_port)
            .await?;

        let url = format!("{}/{}", handle.url, filename);
        info!(run_id = %run_id, url = %url, "prototype published");
        Ok(Published { url, filename })
    }

    /// All prototype files currently in the output directory, sorted by
    /// filename. An absent directory is an empty listing, not an error.
    pub fn list_prototypes(&self) -> ServerResult<Vec<PrototypeEntry>> {
        let entries = match std::fs::read_dir(&self.output_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut prototypes = Vec::new();
        for entry in entries {
            let entry = entry?;
            let filename = entry.file_name().to_string_lossy().to_string();
            if !filename.ends_with(".html") {
                continue;
            }
            let metadata = entry.metadata()?;
            prototypes.push(PrototypeEntry {
                filename,
                size: metadata.len(),
                modified: metadata.modified().map(DateTime::from).unwrap_or_else(|_| Utc::now()),
            });
        }
        prototypes.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(prototypes)
    }
}

#[async_trait]
impl Publisher for PreviewPublisher {
    async fn publish(&self, run_id: &RunId, artifact: &Artifact) -> EngineResult<Published> {
        self.publish_artifact(run_id, artifact)
            .await
            .map_err(Into::into)
    }
}
