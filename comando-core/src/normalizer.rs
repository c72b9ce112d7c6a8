//! # Normalizador de Texto
//!
//! Toda comparação do interpretador acontece sobre texto normalizado:
//! minúsculas, sem acentos e sem espaços nas bordas. Assim "Preço",
//! "preco" e "PREÇO" são a mesma palavra para os extratores.
//!
//! ## Exemplo
//!
//! ```rust
//! use comando_core::normalizer::normalize;
//!
//! assert_eq!(normalize("  Canetas ECOLÓGICAS "), "canetas ecologicas");
//! assert_eq!(normalize(&normalize("Alumínio")), normalize("Alumínio"));
//! ```

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Converte para minúsculas, decompõe (NFD), remove marcas diacríticas e apara espaços.
///
/// A conversão para minúsculas vem antes da decomposição: algumas letras
/// (ex: `İ`) ganham uma marca combinante ao virar minúsculas, e ela também
/// precisa ser removida para que a função seja idempotente.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Palavras do texto normalizado, segmentadas pelas regras Unicode.
pub fn words(text: &str) -> Vec<String> {
    normalize(text)
        .unicode_words()
        .map(|w| w.to_string())
        .collect()
}

/// Verifica se `needle` aparece em `haystack` começando no início de uma palavra.
///
/// Ambos já devem estar normalizados. O fim da ocorrência é livre, então
/// "caneta" encontra "canetas", mas "ouro" não encontra "couro".
pub fn contains_at_word_start(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(idx, _)| {
        haystack[..idx]
            .chars()
            .next_back()
            .map(|c| !c.is_alphanumeric())
            .unwrap_or(true)
    })
}
