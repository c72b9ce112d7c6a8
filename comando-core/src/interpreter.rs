//! # Interpretador: Orquestrador com Eventos Observáveis
//!
//! Liga todos os estágios: normalização, atalhos (limpar/ordenar), o
//! construtor composto e o fallback legado. Opcionalmente emite eventos de
//! cada passo por um canal (`mpsc`), para que a interface mostre o
//! "raciocínio" do interpretador enquanto o usuário fala.
//!
//! ## Fluxo
//!
//! 1. `Normalized`: frase normalizada.
//! 2. `ShortCircuit`: limpar ou ordenar casou; fim.
//! 3. `StepMatched` / `ConceptDropped` (loop): resultado de cada extrator.
//! 4. `FallbackUsed`: nenhum fragmento; regra legada aplicada.
//! 5. `Done`: comando final.
//!
//! A interpretação nunca falha: toda frase produz exatamente um comando.

use std::sync::mpsc;
use std::time::Instant;

use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::builder::{FragmentSet, Step, PIPELINE};
use crate::command::{FilterFragment, ParsedCommand};
use crate::error::CatalogError;
use crate::extractors::{build_material_anchor, detect_clear, detect_sort, ExtractContext};
use crate::fallback::{legacy_command, FallbackRule};
use crate::keywords::KeywordTables;
use crate::normalizer::normalize;
use crate::vocabulary::Vocabulary;

/// Eventos emitidos durante uma interpretação.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InterpretEvent {
    Normalized {
        original: String,
        normalized: String,
    },
    /// Limpar ou ordenar casou e a varredura de filtros foi pulada.
    ShortCircuit {
        rule: String,
    },
    StepMatched {
        step: Step,
        fragment: FilterFragment,
        /// `false` quando a estratégia de fusão descartou o fragmento.
        merged: bool,
    },
    /// Conceito citado sem correspondência no vocabulário.
    ConceptDropped {
        step: Step,
        token: String,
    },
    FallbackUsed {
        rule: FallbackRule,
    },
    Done {
        command: ParsedCommand,
        processing_us: u64,
    },
}

/// O interpretador de comandos. Imutável depois de construído e `Sync`,
/// então pode ser compartilhado entre threads sem coordenação.
#[derive(Debug, Clone)]
pub struct Interpreter {
    vocabulary: Vocabulary,
    /// Tabelas com gatilhos normalizados.
    tables: KeywordTables,
    material_anchor: Option<Regex>,
}

impl Interpreter {
    pub fn new(vocabulary: Vocabulary, tables: KeywordTables) -> Result<Self, CatalogError> {
        let tables = tables.normalized();
        let material_anchor = build_material_anchor(&tables.material_anchors)?;
        Ok(Self {
            vocabulary,
            tables,
            material_anchor,
        })
    }

    /// Interpretador com as tabelas pt-BR padrão.
    pub fn with_defaults(vocabulary: Vocabulary) -> Result<Self, CatalogError> {
        Self::new(vocabulary, KeywordTables::default())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Interpreta uma frase.
    pub fn interpret(&self, utterance: &str) -> ParsedCommand {
        self.run(utterance, &mut |_| {})
    }

    /// Interpreta enviando cada passo pelo canal. O último evento é sempre `Done`.
    pub fn interpret_streaming(&self, utterance: &str, tx: mpsc::Sender<InterpretEvent>) {
        let start = Instant::now();
        let command = self.run(utterance, &mut |event| {
            let _ = tx.send(event);
        });
        let _ = tx.send(InterpretEvent::Done {
            command,
            processing_us: start.elapsed().as_micros() as u64,
        });
    }

    /// Interpreta várias frases em paralelo, preservando a ordem de entrada.
    pub fn interpret_batch(&self, utterances: &[String]) -> Vec<ParsedCommand> {
        utterances
            .par_iter()
            .map(|u| self.interpret(u))
            .collect()
    }

    fn run(&self, utterance: &str, emit: &mut dyn FnMut(InterpretEvent)) -> ParsedCommand {
        let text = normalize(utterance);
        emit(InterpretEvent::Normalized {
            original: utterance.to_string(),
            normalized: text.clone(),
        });

        // === Atalhos: limpar sempre vence, depois ordenar ===
        if detect_clear(&text, &self.tables) {
            emit(InterpretEvent::ShortCircuit { rule: "clear".into() });
            debug!(utterance, "comando: clear");
            return ParsedCommand::clear();
        }
        if let Some(sort_value) = detect_sort(&text) {
            emit(InterpretEvent::ShortCircuit { rule: "sort".into() });
            debug!(utterance, ?sort_value, "comando: sort");
            return ParsedCommand::sort(sort_value);
        }

        // === Construtor composto ===
        let ctx = ExtractContext {
            vocabulary: &self.vocabulary,
            tables: &self.tables,
            material_anchor: self.material_anchor.as_ref(),
        };
        let mut set = FragmentSet::new();
        for (step, extract) in PIPELINE {
            let outcome = extract(&ctx, &text);
            for token in outcome.dropped {
                trace!(?step, %token, "conceito sem correspondência no vocabulário");
                emit(InterpretEvent::ConceptDropped { step: *step, token });
            }
            if let Some(fragment) = outcome.fragment {
                let merged = set.merge(fragment.clone());
                trace!(?step, merged, "fragmento extraído");
                emit(InterpretEvent::StepMatched {
                    step: *step,
                    fragment,
                    merged,
                });
            }
        }

        if let Some(command) = set.into_command(&self.vocabulary) {
            debug!(utterance, kind = command.kind(), "comando composto");
            return command;
        }

        // === Fallback legado e busca livre ===
        let (rule, command) = legacy_command(utterance, &text, &self.vocabulary);
        emit(InterpretEvent::FallbackUsed { rule });
        debug!(utterance, ?rule, kind = command.kind(), "comando via fallback");
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{demo_utterances, demo_vocabulary};
    use crate::command::{FilterKey, FilterValue, SortValue};
    use crate::vocabulary::ColorEntry;

    fn interpreter() -> Interpreter {
        Interpreter::with_defaults(demo_vocabulary()).unwrap()
    }

    fn list(items: &[&str]) -> FilterValue {
        FilterValue::List(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_total_function() {
        let interp = interpreter();
        for text in ["", "   ", "?!...", "ññññ", "12345", "\u{0}\u{301}", "🎉🎉"] {
            let cmd = interp.interpret(text);
            assert_eq!(cmd.kind(), "search", "falhou para {:?}", text);
        }
    }

    #[test]
    fn test_clear_precedence() {
        let interp = interpreter();
        assert_eq!(interp.interpret("limpar filtros de cor azul"), ParsedCommand::clear());
        assert_eq!(interp.interpret("Limpar filtros"), ParsedCommand::clear());
        assert_eq!(
            interp.interpret("remover filtros e ordenar por nome"),
            ParsedCommand::clear()
        );
    }

    #[test]
    fn test_sort_precedence() {
        let interp = interpreter();
        let sort_value = |text: &str| match interp.interpret(text) {
            ParsedCommand::Sort { sort_value, .. } => Some(sort_value),
            _ => None,
        };
        assert_eq!(sort_value("ordenar por maior preço"), Some(SortValue::PriceDesc));
        assert_eq!(sort_value("ordenar por menor preço"), Some(SortValue::PriceAsc));
        assert_eq!(sort_value("ordenar por nome"), Some(SortValue::Name));
        // ordenação ignora filtros na mesma frase
        assert_eq!(sort_value("canetas azuis ordenar por nome"), Some(SortValue::Name));
    }

    #[test]
    fn test_compound_extraction() {
        let cmd = interpreter().interpret("canetas azuis até 30 reais");
        match cmd {
            ParsedCommand::Compound { filters, action } => {
                assert_eq!(
                    filters,
                    vec![
                        FilterFragment::new(FilterKey::Categories, list(&["cat-canetas"])),
                        FilterFragment::new(FilterKey::Colors, list(&["Azul"])),
                        FilterFragment::new(FilterKey::PriceRange, list(&["0", "30"])),
                    ]
                );
                assert_eq!(action, "Canetas • cor Azul • até R$ 30");
            }
            other => panic!("esperava compound, veio {:?}", other),
        }
    }

    #[test]
    fn test_single_filter_degrade() {
        let cmd = interpreter().interpret("mochilas ecológicas");
        assert_eq!(
            cmd,
            ParsedCommand::Filter {
                filter_key: FilterKey::Categories,
                value: list(&["cat-mochilas"]),
                action: "Filtrar por Mochilas".into(),
            }
        );
    }

    #[test]
    fn test_color_accumulation() {
        let cmd = interpreter().interpret("produtos azuis e vermelhos");
        assert_eq!(
            cmd,
            ParsedCommand::Filter {
                filter_key: FilterKey::Colors,
                value: list(&["Azul", "Vermelho"]),
                action: "Filtrar por cores Azul e Vermelho".into(),
            }
        );
    }

    #[test]
    fn test_universal_fallback_keeps_original() {
        let text = "Qual o sentido da vida?";
        assert_eq!(interpreter().interpret(text), ParsedCommand::search(text));
    }

    #[test]
    fn test_vocabulary_bidirectionality() {
        let vocab = Vocabulary {
            colors: vec![ColorEntry {
                id: "1".into(),
                name: "Azul Marinho".into(),
                group: Some("Azul".into()),
            }],
            ..Default::default()
        };
        let interp = Interpreter::with_defaults(vocab).unwrap();
        assert_eq!(interp.vocabulary().find_color("azul"), Some("Azul Marinho"));
        assert_eq!(interp.vocabulary().find_color("marinho"), Some("Azul Marinho"));
        assert_eq!(
            interp.interpret("canecas azuis").fragments(),
            vec![FilterFragment::new(FilterKey::Colors, list(&["Azul Marinho"]))]
        );
    }

    #[test]
    fn test_range_replaces_ceiling() {
        let cmd = interpreter().interpret("garrafas entre 20 e 60 reais em estoque");
        assert_eq!(
            cmd.fragments(),
            vec![
                FilterFragment::new(FilterKey::Categories, list(&["cat-garrafas"])),
                FilterFragment::new(FilterKey::PriceRange, list(&["20", "60"])),
                FilterFragment::new(FilterKey::InStock, FilterValue::flag()),
            ]
        );
        assert_eq!(cmd.action(), "Garrafas e Squeezes • entre R$ 20 e R$ 60 • em estoque");
    }

    #[test]
    fn test_price_with_thousands_separator() {
        let cmd = interpreter().interpret("canetas até R$ 1.500,00");
        assert_eq!(
            cmd.fragments()[1],
            FilterFragment::new(FilterKey::PriceRange, list(&["0", "1500.00"]))
        );
    }

    #[test]
    fn test_spelled_out_compound_color() {
        let cmd = interpreter().interpret("canetas azul marinho");
        assert_eq!(
            cmd.fragments()[1],
            FilterFragment::new(FilterKey::Colors, list(&["Azul Marinho"]))
        );
    }

    #[test]
    fn test_first_material_wins() {
        let cmd = interpreter().interpret("chaveiros de metal material bambu");
        let fragments = cmd.fragments();
        let materials: Vec<_> = fragments
            .iter()
            .filter(|f| f.filter_key == FilterKey::Materials)
            .collect();
        assert_eq!(materials.len(), 1);
        // "bambu" é conceito ecológico e roda antes da frase "de metal"
        assert_eq!(materials[0].value, list(&["Bambu"]));
    }

    #[test]
    fn test_full_step_order() {
        let cmd = interpreter()
            .interpret("kit de canecas pretas de vidro até 80 reais em estoque em destaque");
        let keys: Vec<FilterKey> = cmd.fragments().iter().map(|f| f.filter_key).collect();
        assert_eq!(
            keys,
            vec![
                FilterKey::Categories,
                FilterKey::Colors,
                FilterKey::PriceRange,
                FilterKey::Materials,
                FilterKey::InStock,
                FilterKey::Featured,
                FilterKey::IsKit,
            ]
        );
    }

    #[test]
    fn test_legacy_paths() {
        let interp = interpreter();
        assert_eq!(
            interp.interpret("cor marinho").fragments(),
            vec![FilterFragment::new(FilterKey::Colors, list(&["Azul Marinho"]))]
        );
        assert_eq!(
            interp.interpret("buscar brindes para eventos"),
            ParsedCommand::search("brindes para eventos")
        );
    }

    #[test]
    fn test_streaming_matches_interpret() {
        let interp = interpreter();
        for (_, text) in demo_utterances() {
            let (tx, rx) = mpsc::channel();
            interp.interpret_streaming(text, tx);
            let events: Vec<InterpretEvent> = rx.try_iter().collect();

            assert!(matches!(events.first(), Some(InterpretEvent::Normalized { .. })));
            match events.last() {
                Some(InterpretEvent::Done { command, .. }) => {
                    assert_eq!(command, &interp.interpret(text), "divergiu para {:?}", text)
                }
                other => panic!("último evento deveria ser Done: {:?}", other),
            }
        }
    }

    #[test]
    fn test_streaming_reports_dropped_concepts() {
        let (tx, rx) = mpsc::channel();
        interpreter().interpret_streaming("mochilas ecológicas", tx);
        let dropped: Vec<String> = rx
            .try_iter()
            .filter_map(|e| match e {
                InterpretEvent::ConceptDropped { token, .. } => Some(token),
                _ => None,
            })
            .collect();
        assert_eq!(dropped, vec!["ecológico".to_string()]);
    }

    #[test]
    fn test_batch_preserves_order() {
        let interp = interpreter();
        let texts: Vec<String> = demo_utterances().iter().map(|(_, t)| t.to_string()).collect();
        let expected: Vec<ParsedCommand> = texts.iter().map(|t| interp.interpret(t)).collect();
        assert_eq!(interp.interpret_batch(&texts), expected);
    }

    #[test]
    fn test_event_wire_format() {
        let event = InterpretEvent::FallbackUsed { rule: FallbackRule::FreeText };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "FallbackUsed");
        assert_eq!(json["data"]["rule"], "free_text");
    }
}
