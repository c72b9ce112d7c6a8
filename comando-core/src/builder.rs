//! # Construtor de Comandos Compostos
//!
//! Executa os extratores de filtro numa ordem fixa e funde os fragmentos
//! segundo a estratégia de cada chave ([`FilterKey::merge_strategy`]):
//!
//! | Chave                          | Estratégia      |
//! |--------------------------------|-----------------|
//! | `colors`                       | acumula sem repetir |
//! | `priceRange`                   | substitui (mesma posição) |
//! | `categories`, `materials`      | o primeiro vence |
//! | `inStock`, `featured`, `isKit` | substitui       |
//!
//! A ordem dos fragmentos no resultado é a ordem dos passos, e é nessa
//! ordem que o despachante aplica os filtros.

use serde::{Deserialize, Serialize};

use crate::command::{
    FilterFragment, FilterValue, MergeStrategy, ParsedCommand, COMPOUND_SEPARATOR,
};
use crate::extractors::{self, ExtractContext, StepOutcome};
use crate::vocabulary::Vocabulary;

/// Passos do construtor, na ordem de execução.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Category,
    Color,
    PriceCeiling,
    PriceRange,
    EcoMaterial,
    MaterialPhrase,
    InStock,
    Featured,
    Kit,
}

pub type Extractor = fn(&ExtractContext<'_>, &str) -> StepOutcome;

/// A faixa "entre" roda depois do limite superior para substituí-lo.
pub const PIPELINE: &[(Step, Extractor)] = &[
    (Step::Category, extractors::extract_category),
    (Step::Color, extractors::extract_colors),
    (Step::PriceCeiling, extractors::extract_price_ceiling),
    (Step::PriceRange, extractors::extract_price_range),
    (Step::EcoMaterial, extractors::extract_eco_material),
    (Step::MaterialPhrase, extractors::extract_material_phrase),
    (Step::InStock, extractors::extract_in_stock),
    (Step::Featured, extractors::extract_featured),
    (Step::Kit, extractors::extract_kit),
];

/// Fragmentos acumulados de uma frase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentSet {
    fragments: Vec<FilterFragment>,
}

impl FragmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Funde um fragmento. Retorna `false` quando ele foi descartado.
    pub fn merge(&mut self, fragment: FilterFragment) -> bool {
        let Some(idx) = self
            .fragments
            .iter()
            .position(|f| f.filter_key == fragment.filter_key)
        else {
            self.fragments.push(fragment);
            return true;
        };
        let existing = &mut self.fragments[idx];

        match fragment.filter_key.merge_strategy() {
            MergeStrategy::FirstWins => false,
            MergeStrategy::Replace => {
                existing.value = fragment.value;
                true
            }
            MergeStrategy::AppendUnique => {
                let mut merged = existing.value.as_list().to_vec();
                let before = merged.len();
                for item in fragment.value.as_list() {
                    if !merged.contains(item) {
                        merged.push(item.clone());
                    }
                }
                let changed = merged.len() != before;
                existing.value = FilterValue::List(merged);
                changed
            }
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragments(&self) -> &[FilterFragment] {
        &self.fragments
    }

    /// Converte em comando: 2+ → `compound`, 1 → `filter`, 0 → `None`.
    pub fn into_command(self, vocabulary: &Vocabulary) -> Option<ParsedCommand> {
        match self.fragments.len() {
            0 => None,
            1 => {
                let fragment = self.fragments.into_iter().next()?;
                let label = fragment.label(vocabulary);
                Some(ParsedCommand::filter(fragment, &label))
            }
            _ => {
                let action = self
                    .fragments
                    .iter()
                    .map(|f| f.label(vocabulary))
                    .collect::<Vec<_>>()
                    .join(COMPOUND_SEPARATOR);
                Some(ParsedCommand::Compound {
                    filters: self.fragments,
                    action,
                })
            }
        }
    }
}
