use crate::pipeline::UpscaleConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct UpscaleToolConfig {
    pub input: PathBuf,
    /// Number of successive 2× doublings.
    #[serde(default = "default_levels")]
    pub levels: usize,
    #[serde(default)]
    pub upscale: UpscaleConfig,
    pub output: UpscaleOutputConfig,
}

fn default_levels() -> usize {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpscaleOutputConfig {
    pub image: PathBuf,
    /// Optional JSON file receiving the per-level report.
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<UpscaleToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RefinerKind;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg: UpscaleToolConfig =
            serde_json::from_str(r#"{"input": "in.png", "output": {"image": "out.png"}}"#).unwrap();
        assert_eq!(cfg.levels, 1);
        assert_eq!(cfg.upscale, UpscaleConfig::default());
        assert!(cfg.output.report_json.is_none());
    }

    #[test]
    fn full_config_parses() {
        let cfg: UpscaleToolConfig = serde_json::from_str(
            r#"{
                "input": "in.png",
                "levels": 2,
                "upscale": {"refiner": "diagonalComposite", "compositePasses": 2},
                "output": {"image": "out/big.png", "reportJson": "out/report.json"}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.levels, 2);
        assert_eq!(cfg.upscale.refiner, RefinerKind::DiagonalComposite);
        assert_eq!(cfg.upscale.composite_passes, 2);
        assert_eq!(
            cfg.output.report_json.as_deref(),
            Some(Path::new("out/report.json"))
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/upscale.json")).unwrap_err();
        assert!(err.contains("/nonexistent/upscale.json"));
    }
}
