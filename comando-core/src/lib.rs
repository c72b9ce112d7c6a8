//! # comando-core: Interpretador de Comandos de Voz para Catálogo
//!
//! Converte uma frase livre, falada ou digitada, em Português Brasileiro
//! num comando estruturado para o painel de filtros do catálogo: um ou
//! mais filtros, uma ordenação, uma busca ou a limpeza dos filtros.
//!
//! ## Arquitetura
//!
//! 1.  **Normalização** ([`normalizer`]): minúsculas, sem acentos.
//! 2.  **Atalhos** ([`extractors`]): "limpar filtros" e "ordenar por ..." encerram a análise.
//! 3.  **Construtor composto** ([`builder`]): extratores em ordem fixa, consultando
//!     as [`keywords`] e o [`vocabulary`] do catálogo, com fusão por chave.
//! 4.  **Fallback legado** ([`fallback`]): "cor X", "categoria Y", "buscar Z".
//! 5.  **Saída**: exatamente um [`ParsedCommand`]; a busca livre é a rede de segurança.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use comando_core::{catalog::demo_vocabulary, Interpreter, ParsedCommand};
//!
//! let interpreter = Interpreter::with_defaults(demo_vocabulary()).unwrap();
//!
//! let command = interpreter.interpret("canetas azuis até 30 reais");
//! assert_eq!(command.kind(), "compound");
//! assert_eq!(command.action(), "Canetas • cor Azul • até R$ 30");
//!
//! let command = interpreter.interpret("qual o sentido da vida");
//! assert_eq!(command, ParsedCommand::search("qual o sentido da vida"));
//! ```

pub mod builder;
pub mod catalog;
pub mod command;
pub mod error;
pub mod extractors;
pub mod fallback;
pub mod interpreter;
pub mod keywords;
pub mod normalizer;
pub mod vocabulary;

pub use command::{FilterFragment, FilterKey, FilterValue, ParsedCommand, SortValue};
pub use error::CatalogError;
pub use interpreter::{InterpretEvent, Interpreter};
pub use keywords::KeywordTables;
pub use vocabulary::Vocabulary;
