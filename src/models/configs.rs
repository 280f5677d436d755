use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GenError;

/// BuildConfigRequest for rendering one device configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildConfigRequest {
    /// Template file name; falls back to the `TEMPLATE` field, then the kind's default
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// RenderedArtifact is a finished configuration ready to be saved by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedArtifact {
    pub preview: String,
    pub filename: String,
    pub unidade: String,
    pub loja: String,
}

/// BuildOutcome is what the front end receives for every build attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BuildOutcome {
    Ok(RenderedArtifact),
    Error { error: String },
}

impl From<Result<RenderedArtifact, GenError>> for BuildOutcome {
    fn from(result: Result<RenderedArtifact, GenError>) -> Self {
        match result {
            Ok(artifact) => Self::Ok(artifact),
            Err(e) => Self::Error { error: e.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_outcome_ok_shape() {
        let outcome = BuildOutcome::from(Ok(RenderedArtifact {
            preview: "x".into(),
            filename: "1-A.rsc".into(),
            unidade: "Centro".into(),
            loja: "1".into(),
        }));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["preview"], "x");
        assert_eq!(json["filename"], "1-A.rsc");
        assert_eq!(json["unidade"], "Centro");
        assert_eq!(json["loja"], "1");
    }

    #[test]
    fn test_build_outcome_error_shape() {
        let outcome = BuildOutcome::from(Err(GenError::EmptyLine));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "error": "line to insert is empty"})
        );
    }
}
