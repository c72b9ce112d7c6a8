//! # Fallback de Filtro Único (padrões legados)
//!
//! Só é consultado quando o construtor composto não encontrou nenhum
//! fragmento. Prioridade: cor → categoria → verbo de busca. Se nada casar,
//! a frase original inteira vira uma busca livre.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::command::{FilterFragment, FilterKey, FilterValue, ParsedCommand};
use crate::normalizer::words;
use crate::vocabulary::Vocabulary;

const COLOR_MARKERS: &[&str] = &["cor"];
const CATEGORY_MARKERS: &[&str] = &["categoria", "tipo"];

/// "buscar X", aplicado à frase original para preservar acentos.
static LEGACY_SEARCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:buscar|procurar|pesquisar)\s+(.+)").unwrap());

/// Qual regra legada produziu o comando.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackRule {
    Color,
    Category,
    SearchVerb,
    FreeText,
}

/// Sempre devolve um comando; `normalized` é a forma normalizada de `original`.
pub fn legacy_command(
    original: &str,
    normalized: &str,
    vocabulary: &Vocabulary,
) -> (FallbackRule, ParsedCommand) {
    let tokens = words(normalized);

    if let Some(name) = word_after(&tokens, COLOR_MARKERS).and_then(|t| vocabulary.find_color(t)) {
        let fragment = FilterFragment::new(FilterKey::Colors, FilterValue::single(name));
        let label = fragment.label(vocabulary);
        return (FallbackRule::Color, ParsedCommand::filter(fragment, &label));
    }

    if let Some(id) =
        word_after(&tokens, CATEGORY_MARKERS).and_then(|t| vocabulary.find_category(t))
    {
        let fragment = FilterFragment::new(FilterKey::Categories, FilterValue::single(id));
        let label = fragment.label(vocabulary);
        return (FallbackRule::Category, ParsedCommand::filter(fragment, &label));
    }

    if let Some(rest) = LEGACY_SEARCH
        .captures(original.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    {
        let rest = rest.trim();
        if !rest.is_empty() {
            return (FallbackRule::SearchVerb, ParsedCommand::search(rest));
        }
    }

    (FallbackRule::FreeText, ParsedCommand::search(original))
}

/// Palavra que segue o primeiro marcador encontrado ("cor azul" → "azul").
fn word_after<'t>(tokens: &'t [String], markers: &[&str]) -> Option<&'t str> {
    tokens
        .windows(2)
        .find(|pair| markers.contains(&pair[0].as_str()))
        .map(|pair| pair[1].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::demo_vocabulary;
    use crate::normalizer::normalize;

    fn run(text: &str) -> (FallbackRule, ParsedCommand) {
        legacy_command(text, &normalize(text), &demo_vocabulary())
    }

    #[test]
    fn test_legacy_color() {
        let (rule, cmd) = run("Filtrar por cor marinho");
        assert_eq!(rule, FallbackRule::Color);
        assert_eq!(
            cmd,
            ParsedCommand::Filter {
                filter_key: FilterKey::Colors,
                value: FilterValue::single("Azul Marinho"),
                action: "Filtrar por cor Azul Marinho".into(),
            }
        );
    }

    #[test]
    fn test_legacy_category() {
        let (rule, cmd) = run("tipo squeezes");
        assert_eq!(rule, FallbackRule::Category);
        assert_eq!(cmd.fragments()[0].value, FilterValue::single("cat-garrafas"));
    }

    #[test]
    fn test_search_verb_keeps_original_text() {
        let (rule, cmd) = run("Procurar Brindes Promocionais");
        assert_eq!(rule, FallbackRule::SearchVerb);
        assert_eq!(cmd, ParsedCommand::search("Brindes Promocionais"));
    }

    #[test]
    fn test_marker_without_following_word() {
        let (rule, cmd) = run("qual cor");
        assert_eq!(rule, FallbackRule::FreeText);
        assert_eq!(cmd, ParsedCommand::search("qual cor"));
    }

    #[test]
    fn test_unmatched_color_falls_to_free_text() {
        let (rule, cmd) = run("cor turquesa");
        assert_eq!(rule, FallbackRule::FreeText);
        assert_eq!(cmd, ParsedCommand::search("cor turquesa"));
    }
}
