//! Configuração do servidor via variáveis de ambiente.
//!
//! | Variável             | Padrão          | Uso                                   |
//! |----------------------|-----------------|---------------------------------------|
//! | `COMANDO_ADDR`       | `0.0.0.0:3000`  | endereço de escuta                    |
//! | `COMANDO_VOCABULARY` | catálogo demo   | JSON `{colors, categories, ...}`      |
//! | `COMANDO_KEYWORDS`   | tabelas pt-BR   | JSON com as tabelas de palavras-chave |

use std::path::PathBuf;

use comando_core::{catalog::demo_vocabulary, CatalogError, Interpreter, KeywordTables, Vocabulary};
use tracing::info;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: String,
    pub vocabulary_path: Option<PathBuf>,
    pub keywords_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            vocabulary_path: None,
            keywords_path: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            addr: non_empty("COMANDO_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            vocabulary_path: non_empty("COMANDO_VOCABULARY").map(PathBuf::from),
            keywords_path: non_empty("COMANDO_KEYWORDS").map(PathBuf::from),
        }
    }

    pub fn build_interpreter(&self) -> Result<Interpreter, CatalogError> {
        let vocabulary = match &self.vocabulary_path {
            Some(path) => {
                info!(path = %path.display(), "carregando vocabulário");
                Vocabulary::load(path)?
            }
            None => demo_vocabulary(),
        };
        let tables = match &self.keywords_path {
            Some(path) => {
                info!(path = %path.display(), "carregando palavras-chave");
                KeywordTables::load(path)?
            }
            None => KeywordTables::default(),
        };
        Interpreter::new(vocabulary, tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_env_is_empty() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
        assert!(config.build_interpreter().is_ok());
    }

    #[test]
    fn test_reads_overrides() {
        let env: HashMap<&str, &str> = [
            ("COMANDO_ADDR", "127.0.0.1:8080"),
            ("COMANDO_VOCABULARY", "/tmp/vocab.json"),
            ("COMANDO_KEYWORDS", "  "),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.addr, "127.0.0.1:8080");
        assert_eq!(config.vocabulary_path, Some(PathBuf::from("/tmp/vocab.json")));
        assert_eq!(config.keywords_path, None);
    }

    #[test]
    fn test_missing_vocabulary_file_is_an_error() {
        let config = ServerConfig {
            vocabulary_path: Some(PathBuf::from("/caminho/inexistente.json")),
            ..Default::default()
        };
        assert!(matches!(
            config.build_interpreter(),
            Err(CatalogError::Io { .. })
        ));
    }
}
