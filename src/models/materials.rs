// src/models/materials.rs

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

// Arquivos listados no manifest.json do bucket de materiais
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct MaterialFiles {
    pub videos: Vec<String>,
    pub narration: Vec<String>,
    pub music: Vec<String>,
}

impl MaterialFiles {
    /// Cada chave aceita uma string ou uma lista de strings. O resto é ignorado.
    pub fn from_manifest(manifest: &Value) -> Self {
        Self {
            videos: one_or_many(manifest.get("videos")),
            narration: one_or_many(manifest.get("narration")),
            music: one_or_many(manifest.get("music")),
        }
    }

    /// Caminhos relativos viram URLs completas a partir da base.
    pub fn resolved(&self, base_url: &str) -> Self {
        let resolve = |files: &[String]| -> Vec<String> {
            files
                .iter()
                .map(|f| {
                    if f.starts_with("http") {
                        f.clone()
                    } else {
                        format!("{base_url}{f}")
                    }
                })
                .collect()
        };
        Self {
            videos: resolve(&self.videos),
            narration: resolve(&self.narration),
            music: resolve(&self.music),
        }
    }
}

fn one_or_many(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MaterialsResponse {
    #[serde(rename = "baseUrl")]
    #[schema(example = "https://firemode.s3.us-east-1.amazonaws.com/firemode/imob/CA2598/")]
    pub base_url: String,
    pub files: MaterialFiles,
    pub urls: MaterialFiles,
    #[schema(value_type = Object)]
    pub listing: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_strings_and_lists() {
        let files = MaterialFiles::from_manifest(&json!({
            "videos": ["v1.mp4", "v2.mp4"],
            "narration": "narracao.mp3",
            "music": ["trilha.mp3", 7, null]
        }));
        assert_eq!(files.videos, ["v1.mp4", "v2.mp4"]);
        assert_eq!(files.narration, ["narracao.mp3"]);
        assert_eq!(files.music, ["trilha.mp3"]);
    }

    #[test]
    fn missing_keys_are_empty_lists() {
        assert_eq!(MaterialFiles::from_manifest(&json!({})), MaterialFiles::default());
        assert_eq!(MaterialFiles::from_manifest(&json!("oops")), MaterialFiles::default());
    }

    #[test]
    fn resolves_relative_paths_only() {
        let files = MaterialFiles {
            videos: vec!["v1.mp4".into(), "https://cdn.example.com/v2.mp4".into()],
            ..MaterialFiles::default()
        };
        let urls = files.resolved("https://bucket/imob/CA1/");
        assert_eq!(
            urls.videos,
            ["https://bucket/imob/CA1/v1.mp4", "https://cdn.example.com/v2.mp4"]
        );
    }
}
