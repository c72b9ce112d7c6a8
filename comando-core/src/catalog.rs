//! # Catálogo de Demonstração
//!
//! Vocabulário de um catálogo de brindes promocionais e frases de exemplo.
//! Usado nos testes e pelo servidor web quando nenhum arquivo de vocabulário
//! é configurado. Em produção o vocabulário vem do catálogo real.

use crate::vocabulary::{CatalogEntry, ColorEntry, Vocabulary};

pub fn demo_vocabulary() -> Vocabulary {
    let color = |id: &str, name: &str, group: &str| ColorEntry {
        id: id.to_string(),
        name: name.to_string(),
        group: Some(group.to_string()),
    };
    let entry = |id: &str, name: &str| CatalogEntry {
        id: id.to_string(),
        name: name.to_string(),
    };

    Vocabulary {
        colors: vec![
            color("cor-azul", "Azul", "Azul"),
            color("cor-azul-marinho", "Azul Marinho", "Azul"),
            color("cor-vermelho", "Vermelho", "Vermelho"),
            color("cor-verde", "Verde", "Verde"),
            color("cor-amarelo", "Amarelo", "Amarelo"),
            color("cor-preto", "Preto", "Preto"),
            color("cor-branco", "Branco", "Branco"),
            color("cor-cinza", "Cinza", "Cinza"),
            color("cor-rosa", "Rosa", "Rosa"),
            color("cor-roxo", "Roxo", "Roxo"),
            color("cor-laranja", "Laranja", "Laranja"),
            color("cor-dourado", "Dourado", "Metálico"),
            color("cor-prata", "Prata", "Metálico"),
        ],
        categories: vec![
            entry("cat-canetas", "Canetas"),
            entry("cat-mochilas", "Mochilas"),
            entry("cat-bolsas", "Bolsas e Sacolas"),
            entry("cat-canecas", "Canecas"),
            entry("cat-copos", "Copos e Taças"),
            entry("cat-garrafas", "Garrafas e Squeezes"),
            entry("cat-chaveiros", "Chaveiros"),
            entry("cat-cadernos", "Cadernos e Agendas"),
            entry("cat-camisetas", "Camisetas"),
            entry("cat-bones", "Bonés"),
            entry("cat-guarda-chuvas", "Guarda-chuvas"),
            entry("cat-pen-drives", "Pen Drives"),
            entry("cat-power-banks", "Power Banks"),
            entry("cat-toalhas", "Toalhas"),
        ],
        suppliers: vec![
            entry("forn-paulista", "Brindes Paulista"),
            entry("forn-xbz", "XBZ Brindes"),
            entry("forn-asia", "Asia Import"),
            entry("forn-spot", "Spot Gifts"),
        ],
        materials: [
            "Metal",
            "Plástico",
            "Vidro",
            "Silicone",
            "Couro",
            "Tecido",
            "Alumínio",
            "Aço Inox",
            "Bambu",
            "Madeira",
            "Cortiça",
            "Papel Kraft",
            "Algodão",
            "PET Reciclado",
        ]
        .iter()
        .map(|m| m.to_string())
        .collect(),
    }
}

/// Frases de exemplo: (descrição, frase).
pub fn demo_utterances() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Composto", "canetas azuis até 30 reais"),
        ("Cores acumuladas", "produtos azuis e vermelhos"),
        ("Faixa de preço", "garrafas entre 20 e 60 reais em estoque"),
        ("Material", "canecas de vidro em destaque"),
        ("Ecológico", "mochilas ecológicas"),
        ("Ordenação", "ordenar por maior preço"),
        ("Limpar", "limpar filtros"),
        ("Legado", "cor marinho"),
        ("Busca", "buscar brindes para eventos"),
        ("Busca livre", "qual o sentido da vida"),
    ]
}
