//! # Comandos Interpretados
//!
//! Tipos de saída do interpretador. Um [`ParsedCommand`] é criado a cada
//! frase, consumido pelo despachante de filtros da aplicação e descartado.
//!
//! ## Formato JSON
//!
//! | Variante   | Exemplo                                                                 |
//! |------------|-------------------------------------------------------------------------|
//! | `clear`    | `{"type":"clear","action":"Limpar todos os filtros"}`                  |
//! | `sort`     | `{"type":"sort","sortValue":"price-desc","action":"..."}`              |
//! | `filter`   | `{"type":"filter","filterKey":"colors","value":["Azul"],"action":"..."}` |
//! | `compound` | `{"type":"compound","filters":[{"filterKey":...,"value":...}],"action":"..."}` |
//! | `search`   | `{"type":"search","value":"brindes","action":"..."}`                   |

use serde::{Deserialize, Serialize};

use crate::vocabulary::Vocabulary;

/// Separador entre os rótulos de um comando composto.
pub const COMPOUND_SEPARATOR: &str = " • ";

/// Chaves do estado de filtros que o painel do catálogo entende.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKey {
    Categories,
    Colors,
    PriceRange,
    Materials,
    InStock,
    Featured,
    IsKit,
}

/// Como um fragmento novo se combina com um existente da mesma chave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Acumula valores, sem repetir nomes canônicos.
    AppendUnique,
    /// Substitui o valor, mantendo a posição original do fragmento.
    Replace,
    /// Mantém o primeiro fragmento e ignora os seguintes.
    FirstWins,
}

impl FilterKey {
    pub fn merge_strategy(&self) -> MergeStrategy {
        match self {
            FilterKey::Colors => MergeStrategy::AppendUnique,
            FilterKey::PriceRange => MergeStrategy::Replace,
            FilterKey::Categories | FilterKey::Materials => MergeStrategy::FirstWins,
            FilterKey::InStock | FilterKey::Featured | FilterKey::IsKit => MergeStrategy::Replace,
        }
    }
}

/// Valor de um filtro: texto simples ou lista.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Text(String),
    List(Vec<String>),
}

impl FilterValue {
    pub fn flag() -> Self {
        FilterValue::Text("true".to_string())
    }

    pub fn single(item: &str) -> Self {
        FilterValue::List(vec![item.to_string()])
    }

    pub fn as_list(&self) -> &[String] {
        match self {
            FilterValue::List(items) => items,
            FilterValue::Text(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterFragment {
    #[serde(rename = "filterKey")]
    pub filter_key: FilterKey,
    pub value: FilterValue,
}

impl FilterFragment {
    pub fn new(filter_key: FilterKey, value: FilterValue) -> Self {
        Self { filter_key, value }
    }

    /// Rótulo legível usado na mensagem de retorno ao usuário.
    pub fn label(&self, vocabulary: &Vocabulary) -> String {
        match (&self.filter_key, &self.value) {
            (FilterKey::Categories, value) => value
                .as_list()
                .iter()
                .map(|id| vocabulary.category_name(id).unwrap_or(id.as_str()).to_string())
                .collect::<Vec<_>>()
                .join(", "),
            (FilterKey::Colors, value) => match value.as_list() {
                [only] => format!("cor {}", only),
                many => format!("cores {}", join_pt(many)),
            },
            (FilterKey::PriceRange, value) => match value.as_list() {
                [min, max] if is_zero(min) => format!("até R$ {}", max),
                [min, max] => format!("entre R$ {} e R$ {}", min, max),
                other => format!("preço {}", other.join("-")),
            },
            (FilterKey::Materials, value) => format!("material {}", value.as_list().join(", ")),
            (FilterKey::InStock, _) => "em estoque".to_string(),
            (FilterKey::Featured, _) => "em destaque".to_string(),
            (FilterKey::IsKit, _) => "kits".to_string(),
        }
    }
}

/// Diretivas de ordenação aceitas pelo catálogo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortValue {
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "stock")]
    Stock,
}

impl SortValue {
    pub fn action(&self) -> &'static str {
        match self {
            SortValue::PriceAsc => "Ordenar por menor preço",
            SortValue::PriceDesc => "Ordenar por maior preço",
            SortValue::Name => "Ordenar por nome",
            SortValue::Stock => "Ordenar por estoque",
        }
    }
}

/// Resultado de uma interpretação. Exatamente uma variante por frase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParsedCommand {
    Clear {
        action: String,
    },
    Sort {
        #[serde(rename = "sortValue")]
        sort_value: SortValue,
        action: String,
    },
    Filter {
        #[serde(rename = "filterKey")]
        filter_key: FilterKey,
        value: FilterValue,
        action: String,
    },
    /// Sempre com dois ou mais fragmentos, na ordem em que foram extraídos.
    Compound {
        filters: Vec<FilterFragment>,
        action: String,
    },
    Search {
        value: String,
        action: String,
    },
    /// Nunca produzido: a busca livre é o fallback universal.
    Unknown {
        action: String,
    },
}

impl ParsedCommand {
    pub fn clear() -> Self {
        ParsedCommand::Clear {
            action: "Limpar todos os filtros".to_string(),
        }
    }

    pub fn sort(sort_value: SortValue) -> Self {
        ParsedCommand::Sort {
            sort_value,
            action: sort_value.action().to_string(),
        }
    }

    pub fn filter(fragment: FilterFragment, label: &str) -> Self {
        ParsedCommand::Filter {
            filter_key: fragment.filter_key,
            value: fragment.value,
            action: format!("Filtrar por {}", label),
        }
    }

    pub fn search(value: &str) -> Self {
        ParsedCommand::Search {
            value: value.to_string(),
            action: format!("Buscar \"{}\"", value),
        }
    }

    /// Nome da variante, igual ao campo `type` do JSON.
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedCommand::Clear { .. } => "clear",
            ParsedCommand::Sort { .. } => "sort",
            ParsedCommand::Filter { .. } => "filter",
            ParsedCommand::Compound { .. } => "compound",
            ParsedCommand::Search { .. } => "search",
            ParsedCommand::Unknown { .. } => "unknown",
        }
    }

    pub fn action(&self) -> &str {
        match self {
            ParsedCommand::Clear { action }
            | ParsedCommand::Sort { action, .. }
            | ParsedCommand::Filter { action, .. }
            | ParsedCommand::Compound { action, .. }
            | ParsedCommand::Search { action, .. }
            | ParsedCommand::Unknown { action } => action,
        }
    }

    /// Fragmentos do comando (vazio para clear/sort/search).
    pub fn fragments(&self) -> Vec<FilterFragment> {
        match self {
            ParsedCommand::Filter { filter_key, value, .. } => {
                vec![FilterFragment::new(*filter_key, value.clone())]
            }
            ParsedCommand::Compound { filters, .. } => filters.clone(),
            _ => vec![],
        }
    }
}

/// "A", "A e B", "A, B e C"
fn join_pt(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} e {}", init.join(", "), last),
    }
}

fn is_zero(value: &str) -> bool {
    value.parse::<f64>().map(|v| v == 0.0).unwrap_or(false)
}
