//! Erros de carregamento de catálogo e configuração.
//!
//! A interpretação em si nunca falha; só a montagem do interpretador
//! (leitura de arquivos, compilação de padrões) pode dar errado.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("não foi possível ler {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("padrão inválido para '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
