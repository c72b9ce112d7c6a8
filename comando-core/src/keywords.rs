//! # Tabelas de Palavras-chave
//!
//! Dados, não lógica: cada grupo liga um conceito (`key`, o termo entregue ao
//! vocabulário) às palavras que o disparam numa frase. Novos sinônimos entram
//! aqui e em nenhum outro lugar.
//!
//! As tabelas são passadas explicitamente ao [`Interpreter`](crate::Interpreter),
//! então cada catálogo ou localidade pode carregar as suas a partir de JSON.
//! O `Default` traz as tabelas em Português Brasileiro.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::normalizer::{contains_at_word_start, normalize};

/// Um conceito e as palavras que o disparam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub key: String,
    pub triggers: Vec<String>,
}

impl KeywordGroup {
    pub fn new(key: &str, triggers: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Primeiro gatilho presente no texto normalizado.
    pub fn first_trigger_in(&self, text: &str) -> Option<&str> {
        first_in(text, &self.triggers)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTables {
    /// Conceitos de categoria, em ordem de prioridade.
    pub categories: Vec<KeywordGroup>,
    /// Nomes comuns de cores usados como âncora antes do vocabulário.
    pub colors: Vec<KeywordGroup>,
    /// Conceitos "ecológicos"; a chave é resolvida como material.
    pub eco: Vec<KeywordGroup>,
    /// Materiais aceitos após "de"/"em" (ex: "caneca de vidro").
    pub material_anchors: Vec<String>,
    pub clear_phrases: Vec<String>,
    pub stock_phrases: Vec<String>,
    pub featured_words: Vec<String>,
    pub kit_words: Vec<String>,
}

impl KeywordTables {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Cópia com todos os gatilhos normalizados (chaves preservadas).
    pub fn normalized(&self) -> Self {
        let groups = |gs: &[KeywordGroup]| -> Vec<KeywordGroup> {
            gs.iter()
                .map(|g| KeywordGroup {
                    key: g.key.clone(),
                    triggers: normalize_all(&g.triggers),
                })
                .collect()
        };
        Self {
            categories: groups(&self.categories),
            colors: groups(&self.colors),
            eco: groups(&self.eco),
            material_anchors: normalize_all(&self.material_anchors),
            clear_phrases: normalize_all(&self.clear_phrases),
            stock_phrases: normalize_all(&self.stock_phrases),
            featured_words: normalize_all(&self.featured_words),
            kit_words: normalize_all(&self.kit_words),
        }
    }
}

impl Default for KeywordTables {
    fn default() -> Self {
        let list = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            categories: vec![
                KeywordGroup::new("caneta", &["caneta", "esferográfica", "lapiseira"]),
                KeywordGroup::new("mochila", &["mochila"]),
                KeywordGroup::new("bolsa", &["bolsa", "sacola", "ecobag", "necessaire"]),
                KeywordGroup::new("caneca", &["caneca", "xícara"]),
                KeywordGroup::new("copo", &["copo", "taça"]),
                KeywordGroup::new("garrafa", &["garrafa", "squeeze", "térmica"]),
                KeywordGroup::new("chaveiro", &["chaveiro"]),
                KeywordGroup::new("caderno", &["caderno", "agenda", "bloco de notas", "bloquinho"]),
                KeywordGroup::new("camiseta", &["camiseta", "camisa", "polo"]),
                KeywordGroup::new("bone", &["boné", "bone"]),
                KeywordGroup::new("guarda-chuva", &["guarda-chuva", "guarda chuva", "sombrinha"]),
                KeywordGroup::new("pen drive", &["pen drive", "pendrive"]),
                KeywordGroup::new("power bank", &["power bank", "powerbank", "carregador portátil"]),
                KeywordGroup::new("toalha", &["toalha"]),
            ],
            colors: vec![
                KeywordGroup::new("azul", &["azul", "azuis"]),
                KeywordGroup::new("vermelho", &["vermelho", "vermelha"]),
                KeywordGroup::new("verde", &["verde"]),
                KeywordGroup::new("amarelo", &["amarelo", "amarela"]),
                KeywordGroup::new("preto", &["preto", "preta"]),
                KeywordGroup::new("branco", &["branco", "branca"]),
                KeywordGroup::new("cinza", &["cinza"]),
                KeywordGroup::new("rosa", &["rosa"]),
                KeywordGroup::new("roxo", &["roxo", "roxa"]),
                KeywordGroup::new("laranja", &["laranja"]),
                KeywordGroup::new("marrom", &["marrom", "marrons"]),
                KeywordGroup::new("dourado", &["dourado", "dourada"]),
                KeywordGroup::new("prata", &["prata", "prateado", "prateada"]),
                KeywordGroup::new("bege", &["bege"]),
                KeywordGroup::new("vinho", &["vinho"]),
            ],
            eco: vec![
                KeywordGroup::new("bambu", &["bambu"]),
                KeywordGroup::new("reciclado", &["reciclado", "reciclada", "reciclável"]),
                KeywordGroup::new("cortiça", &["cortiça"]),
                KeywordGroup::new("kraft", &["kraft"]),
                KeywordGroup::new("algodão", &["algodão"]),
                KeywordGroup::new("ecológico", &["ecológico", "ecológica", "sustentável", "sustentáveis"]),
            ],
            material_anchors: list(&[
                "metal", "plástico", "vidro", "silicone", "couro", "tecido", "alumínio", "inox",
            ]),
            clear_phrases: list(&["limpar filtros", "remover filtros", "limpar", "resetar"]),
            stock_phrases: list(&["em estoque", "disponível", "disponíveis"]),
            featured_words: list(&["destaque", "destacado", "destacada"]),
            kit_words: list(&["kit"]),
        }
    }
}

/// Primeiro item de `candidates` presente em `text` no início de uma palavra.
pub fn first_in<'a>(text: &str, candidates: &'a [String]) -> Option<&'a str> {
    candidates
        .iter()
        .find(|c| contains_at_word_start(text, c))
        .map(|c| c.as_str())
}

fn normalize_all(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect()
}
