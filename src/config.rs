use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{DocqaError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub db_path: PathBuf,
    pub chunking: ChunkConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub synthesizer: SynthesizerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            chunking: ChunkConfig::default(),
            embedding: EmbeddingConfig::default(),
            retrieval: RetrievalConfig::default(),
            synthesizer: SynthesizerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    pub max_size: usize,
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_size: 1500,
            overlap: 400,
        }
    }
}

impl ChunkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(DocqaError::Config("chunk max_size must be positive".into()));
        }
        if self.overlap >= self.max_size {
            return Err(DocqaError::Config(format!(
                "chunk overlap ({}) must be smaller than max_size ({})",
                self.overlap, self.max_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "all-MiniLM-L6-v2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 7 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizerConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "llama-3.1-8b-instant".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
        }
    }
}

fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "docqa").map_or_else(
        || PathBuf::from(".docqa/index"),
        |d| d.data_dir().join("index"),
    )
}

impl Config {
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project()?;
        let merged = Self::merge(global, project);
        Ok(merged.with_env_overrides())
    }

    fn load_global() -> Result<Self> {
        let config_dir = directories::ProjectDirs::from("", "", "docqa").map_or_else(
            || PathBuf::from("~/.config/docqa"),
            |d| d.config_dir().to_path_buf(),
        );

        Self::load_file(config_dir.join("config.toml"))
    }

    fn load_project() -> Result<Self> {
        Self::load_file(PathBuf::from(".docqa.toml"))
    }

    fn load_file(path: PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)
                .map_err(|e| DocqaError::Config(format!("{}: {e}", path.display())))
        } else {
            Ok(Self::default())
        }
    }

    fn merge(global: Self, project: Self) -> Self {
        let mut synthesizer = project.synthesizer;
        if synthesizer.api_key.is_none() {
            synthesizer.api_key = global.synthesizer.api_key;
        }

        Self {
            db_path: if project.db_path == default_db_path() {
                global.db_path
            } else {
                project.db_path
            },
            chunking: project.chunking,
            embedding: project.embedding,
            retrieval: project.retrieval,
            synthesizer,
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            self.synthesizer.api_key = Some(key);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.chunking.max_size, 1500);
        assert_eq!(config.chunking.overlap, 400);
        assert_eq!(config.retrieval.top_k, 7);
        assert_eq!(config.embedding.model, "all-MiniLM-L6-v2");
    }

    #[test]
    fn overlap_must_be_smaller_than_max_size() {
        let config = ChunkConfig {
            max_size: 100,
            overlap: 100,
        };
        assert!(matches!(config.validate(), Err(DocqaError::Config(_))));

        let config = ChunkConfig {
            max_size: 100,
            overlap: 250,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_max_size_is_rejected() {
        let config = ChunkConfig {
            max_size: 0,
            overlap: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn valid_config_passes() {
        assert!(ChunkConfig::default().validate().is_ok());
    }
}
