//! # Vocabulário do Catálogo e Correspondência Aproximada
//!
//! O vocabulário é fornecido pelo catálogo (cores, categorias, fornecedores
//! e materiais) e nunca é modificado pelo interpretador. Cada busca resolve
//! uma palavra falada para a entidade canônica do catálogo.
//!
//! ## Regra de correspondência
//!
//! Token e nome do candidato são normalizados e o candidato casa quando:
//!
//! 1. as formas normalizadas são iguais, **ou**
//! 2. o nome do candidato contém o token, **ou**
//! 3. o token contém o nome do candidato.
//!
//! O primeiro candidato na ordem do catálogo vence. Não há pontuação nem
//! distância de edição: "azul" e "marinho" resolvem ambos para "Azul Marinho".

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::normalizer::normalize;

/// Cor do catálogo. O `group` (família de cor) é usado pela UI para destacar variações.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Categoria ou fornecedor do catálogo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
}

/// As quatro coleções consultadas pelo interpretador, em ordem de catálogo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default)]
    pub colors: Vec<ColorEntry>,
    #[serde(default)]
    pub categories: Vec<CatalogEntry>,
    #[serde(default)]
    pub suppliers: Vec<CatalogEntry>,
    #[serde(default)]
    pub materials: Vec<String>,
}

impl Vocabulary {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Lê o vocabulário de um arquivo JSON `{colors, categories, suppliers, materials}`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Nome canônico da cor correspondente ao token.
    pub fn find_color(&self, token: &str) -> Option<&str> {
        find_first(&self.colors, token, |c| c.name.as_str()).map(|c| c.name.as_str())
    }

    /// Identificador da categoria correspondente ao token.
    pub fn find_category(&self, token: &str) -> Option<&str> {
        find_first(&self.categories, token, |c| c.name.as_str()).map(|c| c.id.as_str())
    }

    /// Identificador do fornecedor correspondente ao token.
    pub fn find_supplier(&self, token: &str) -> Option<&str> {
        find_first(&self.suppliers, token, |s| s.name.as_str()).map(|s| s.id.as_str())
    }

    /// Nome do material correspondente ao token.
    pub fn find_material(&self, token: &str) -> Option<&str> {
        find_first(&self.materials, token, |m| m.as_str()).map(|m| m.as_str())
    }

    /// Família da cor canônica `name`, se o catálogo a informar.
    pub fn color_group(&self, name: &str) -> Option<&str> {
        self.colors
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.group.as_deref())
    }

    /// Nome de exibição de uma categoria a partir do seu id.
    pub fn category_name(&self, id: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }
}

/// Containment bidirecional sobre formas normalizadas.
///
/// `query` já deve estar normalizado.
pub fn fuzzy_matches(query: &str, candidate: &str) -> bool {
    let candidate = normalize(candidate);
    if query.is_empty() || candidate.is_empty() {
        return false;
    }
    candidate == query || candidate.contains(query) || query.contains(&candidate)
}

fn find_first<'a, T>(
    items: &'a [T],
    token: &str,
    name_of: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    let query = normalize(token);
    if query.is_empty() {
        return None;
    }
    items.iter().find(|item| fuzzy_matches(&query, name_of(*item)))
}
