//! Model artifact persistence
//!
//! Layout: 8 magic bytes, a little-endian u32 format version, then the
//! bincode-encoded [`ModelArtifact`].

use super::PremiumPipeline;
use crate::error::{PremiumError, Result};
use crate::training::EvaluationSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

pub const MAGIC: &[u8; 8] = b"PREMPIPE";
pub const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = MAGIC.len() + 4;

/// Everything persisted after a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub crate_version: String,
    pub evaluation: EvaluationSummary,
    pub pipeline: PremiumPipeline,
}

impl ModelArtifact {
    pub fn new(pipeline: PremiumPipeline, evaluation: EvaluationSummary) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            created_at: Utc::now(),
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            evaluation,
            pipeline,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let body = bincode::serialize(self)?;
        let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN || &bytes[..MAGIC.len()] != MAGIC {
            return Err(PremiumError::ArtifactError(
                "not a premium model artifact".to_string(),
            ));
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[MAGIC.len()..HEADER_LEN]);
        let version = u32::from_le_bytes(version);
        if version != FORMAT_VERSION {
            return Err(PremiumError::ArtifactError(format!(
                "unsupported artifact format version {} (expected {})",
                version, FORMAT_VERSION
            )));
        }

        let artifact: Self = bincode::deserialize(&bytes[HEADER_LEN..])
            .map_err(|e| PremiumError::ArtifactError(format!("corrupt artifact: {}", e)))?;
        if artifact.pipeline.classes().is_empty() {
            return Err(PremiumError::ArtifactError("artifact holds an unfitted pipeline".to_string()));
        }
        Ok(artifact)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&self.to_bytes()?)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut bytes = Vec::new();
        File::open(path.as_ref())?.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }
}
