//! # Extratores de Padrões
//!
//! Cada extrator é uma função pura sobre a frase **já normalizada**. Os
//! extratores de filtro devolvem um [`StepOutcome`]: no máximo um fragmento
//! e a lista de conceitos mencionados que o vocabulário não reconheceu.
//!
//! Limpar e ordenar não produzem fragmentos: são verificados antes de tudo
//! e encerram a interpretação quando casam.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::command::{FilterFragment, FilterKey, FilterValue, SortValue};
use crate::error::CatalogError;
use crate::keywords::{first_in, KeywordTables};
use crate::normalizer::{contains_at_word_start, normalize};
use crate::vocabulary::Vocabulary;

/// "1.500,00" (milhar com ponto) ou "30", "29,90", "12.5".
const NUMBER: &str = r"(\d{1,3}(?:\.\d{3})+(?:,\d+)?|\d+(?:[.,]\d+)?)";

static THOUSANDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(?:\.\d{3})+(?:,\d+)?$").unwrap());

static SORT_VERB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:ordenar|ordene|ordena|ordem)\b").unwrap());
static SORT_PRICE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:preco|precos|valor)\b").unwrap());
static SORT_DESC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:maior|mais caro)").unwrap());
static SORT_ASC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:menor|mais barato)").unwrap());
static SORT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bnome\b").unwrap());
static SORT_STOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bestoque\b").unwrap());

/// Limite superior: "até 30", "menos de 30", "abaixo de r$ 30", "no máximo 30"
static PRICE_CEILING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?:ate|menos de|abaixo de|no maximo)\s+(?:r\$\s*)?{}",
        NUMBER
    ))
    .unwrap()
});
/// "30 reais", "30 r$"
static PRICE_CURRENCY_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"{}\s*(?:reais|r\$)", NUMBER)).unwrap());
/// "r$ 30"
static PRICE_CURRENCY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"r\$\s*{}", NUMBER)).unwrap());
/// "entre 10 e 50", "entre r$ 10 e r$ 50"
static PRICE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\bentre\s+(?:r\$\s*)?{}\s*(?:reais\s+)?e\s+(?:r\$\s*)?{}",
        NUMBER, NUMBER
    ))
    .unwrap()
});

static MATERIAL_NAMED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bmaterial\s+(\w+)").unwrap());

/// Resultado de um passo de extração.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    pub fragment: Option<FilterFragment>,
    /// Conceitos citados na frase que não resolveram no vocabulário.
    pub dropped: Vec<String>,
}

impl StepOutcome {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn matched(fragment: FilterFragment) -> Self {
        Self {
            fragment: Some(fragment),
            dropped: vec![],
        }
    }

    pub fn dropped(token: &str) -> Self {
        Self {
            fragment: None,
            dropped: vec![token.to_string()],
        }
    }
}

/// Tudo que os extratores consultam, sem estado mutável.
pub struct ExtractContext<'a> {
    pub vocabulary: &'a Vocabulary,
    /// Tabelas com gatilhos já normalizados.
    pub tables: &'a KeywordTables,
    /// "de/em <material>", montado a partir de `tables.material_anchors`.
    pub material_anchor: Option<&'a Regex>,
}

/// Monta `\b(?:de|em)\s+(metal|plastico|...)\b` a partir das âncoras normalizadas.
pub fn build_material_anchor(anchors: &[String]) -> Result<Option<Regex>, CatalogError> {
    if anchors.is_empty() {
        return Ok(None);
    }
    let alternatives = anchors
        .iter()
        .map(|a| regex::escape(a))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"\b(?:de|em)\s+({})\b", alternatives);
    Regex::new(&pattern)
        .map(Some)
        .map_err(|source| CatalogError::Pattern { pattern, source })
}

pub fn detect_clear(text: &str, tables: &KeywordTables) -> bool {
    first_in(text, &tables.clear_phrases).is_some()
}

/// "ordenar"/"ordem" + preço/valor (maior/menor), nome ou estoque.
///
/// A direção vem da primeira palavra de direção citada, então
/// "do menor para o maior" é crescente.
pub fn detect_sort(text: &str) -> Option<SortValue> {
    if !SORT_VERB.is_match(text) {
        return None;
    }
    if SORT_PRICE.is_match(text) {
        let desc = SORT_DESC.find(text).map(|m| m.start());
        let asc = SORT_ASC.find(text).map(|m| m.start());
        let descending = match (desc, asc) {
            (Some(d), Some(a)) => d < a,
            (Some(_), None) => true,
            _ => false,
        };
        return Some(if descending {
            SortValue::PriceDesc
        } else {
            SortValue::PriceAsc
        });
    }
    if SORT_NAME.is_match(text) {
        return Some(SortValue::Name);
    }
    if SORT_STOCK.is_match(text) {
        return Some(SortValue::Stock);
    }
    None
}

/// Primeiro conceito de categoria citado que o vocabulário reconhece.
pub fn extract_category(ctx: &ExtractContext<'_>, text: &str) -> StepOutcome {
    let mut outcome = StepOutcome::none();
    for group in &ctx.tables.categories {
        if group.first_trigger_in(text).is_none() {
            continue;
        }
        match ctx.vocabulary.find_category(&group.key) {
            Some(id) => {
                outcome.fragment = Some(FilterFragment::new(
                    FilterKey::Categories,
                    FilterValue::single(id),
                ));
                return outcome;
            }
            None => outcome.dropped.push(group.key.clone()),
        }
    }
    outcome
}

/// Todas as cores citadas, acumuladas num único fragmento sem repetição.
pub fn extract_colors(ctx: &ExtractContext<'_>, text: &str) -> StepOutcome {
    let mut names: Vec<String> = vec![];
    let mut dropped = vec![];
    for group in &ctx.tables.colors {
        let Some(trigger) = group.first_trigger_in(text) else {
            continue;
        };
        let resolved = spelled_out_color(ctx.vocabulary, text, trigger)
            .or_else(|| ctx.vocabulary.find_color(&group.key));
        match resolved {
            Some(name) if !names.iter().any(|n| n.as_str() == name) => names.push(name.to_string()),
            Some(_) => {}
            None => dropped.push(group.key.clone()),
        }
    }
    StepOutcome {
        fragment: (!names.is_empty())
            .then(|| FilterFragment::new(FilterKey::Colors, FilterValue::List(names))),
        dropped,
    }
}

/// Cor composta do catálogo citada por extenso a partir do gatilho ("azul marinho").
fn spelled_out_color<'v>(vocabulary: &'v Vocabulary, text: &str, trigger: &str) -> Option<&'v str> {
    vocabulary.colors.iter().map(|c| c.name.as_str()).find(|name| {
        let full = normalize(name);
        full.contains(' ') && full.starts_with(trigger) && contains_at_word_start(text, &full)
    })
}

/// Limite superior de preço → faixa `[0, N]`.
pub fn extract_price_ceiling(_ctx: &ExtractContext<'_>, text: &str) -> StepOutcome {
    let captured = [&*PRICE_CEILING, &*PRICE_CURRENCY_SUFFIX, &*PRICE_CURRENCY_PREFIX]
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1).map(|m| decimal(m.as_str())));
    match captured {
        Some(max) => StepOutcome::matched(price_range("0".to_string(), max)),
        None => StepOutcome::none(),
    }
}

/// Faixa explícita "entre N e M" → `[N, M]`.
pub fn extract_price_range(_ctx: &ExtractContext<'_>, text: &str) -> StepOutcome {
    match PRICE_RANGE.captures(text) {
        Some(caps) => {
            let min = decimal(&caps[1]);
            let max = decimal(&caps[2]);
            StepOutcome::matched(price_range(min, max))
        }
        None => StepOutcome::none(),
    }
}

/// Conceitos ecológicos resolvidos como material ("bambu", "reciclado"...).
pub fn extract_eco_material(ctx: &ExtractContext<'_>, text: &str) -> StepOutcome {
    let mut outcome = StepOutcome::none();
    for group in &ctx.tables.eco {
        if group.first_trigger_in(text).is_none() {
            continue;
        }
        match ctx.vocabulary.find_material(&group.key) {
            Some(material) => {
                outcome.fragment = Some(material_fragment(material));
                return outcome;
            }
            None => outcome.dropped.push(group.key.clone()),
        }
    }
    outcome
}

/// "material X" ou "de/em <âncora>", resolvido pelo vocabulário de materiais.
pub fn extract_material_phrase(ctx: &ExtractContext<'_>, text: &str) -> StepOutcome {
    let token = MATERIAL_NAMED
        .captures(text)
        .or_else(|| ctx.material_anchor.and_then(|re| re.captures(text)))
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()));
    let Some(token) = token else {
        return StepOutcome::none();
    };
    match ctx.vocabulary.find_material(&token) {
        Some(material) => StepOutcome::matched(material_fragment(material)),
        None => StepOutcome::dropped(&token),
    }
}

pub fn extract_in_stock(ctx: &ExtractContext<'_>, text: &str) -> StepOutcome {
    flag(text, &ctx.tables.stock_phrases, FilterKey::InStock)
}

pub fn extract_featured(ctx: &ExtractContext<'_>, text: &str) -> StepOutcome {
    flag(text, &ctx.tables.featured_words, FilterKey::Featured)
}

pub fn extract_kit(ctx: &ExtractContext<'_>, text: &str) -> StepOutcome {
    flag(text, &ctx.tables.kit_words, FilterKey::IsKit)
}

fn flag(text: &str, phrases: &[String], key: FilterKey) -> StepOutcome {
    if first_in(text, phrases).is_some() {
        StepOutcome::matched(FilterFragment::new(key, FilterValue::flag()))
    } else {
        StepOutcome::none()
    }
}

fn material_fragment(material: &str) -> FilterFragment {
    FilterFragment::new(FilterKey::Materials, FilterValue::single(material))
}

fn price_range(min: String, max: String) -> FilterFragment {
    FilterFragment::new(FilterKey::PriceRange, FilterValue::List(vec![min, max]))
}

/// Formato pt-BR para decimal com ponto: "29,90" → "29.90", "1.500,00" → "1500.00".
fn decimal(raw: &str) -> String {
    if THOUSANDS.is_match(raw) {
        raw.replace('.', "").replace(',', ".")
    } else {
        raw.replace(',', ".")
    }
}
