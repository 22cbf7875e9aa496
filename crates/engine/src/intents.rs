//! Intent table: exact trigger phrases -> intent key.
//!
//! Matching is exact membership after lowercasing and trimming the input.
//! Intents are scanned in declaration order and the first hit wins, so a
//! phrase listed under two intents always resolves to the earlier one.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::IntentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub key: String,
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentTable {
    #[serde(rename = "intent", default)]
    intents: Vec<Intent>,
}

/// A phrase claimed by more than one intent. `winner` is the one that resolves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhraseOverlap {
    pub phrase: String,
    pub winner: String,
    pub shadowed: String,
}

/// Lowercase and trim user input before matching.
pub fn normalize(input: &str) -> String {
    input.to_lowercase().trim().to_string()
}

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "cargo_mensual",
        &[
            "ventas",
            "cargo mensual",
            "acumulado mensual",
            "cómo van las ventas",
            "informe de ventas",
            "total de ventas este mes",
            "ventas acumuladas",
        ],
    ),
    (
        "ventas",
        &["dime los canales de ventas", "canales de ventas", "informe canales de ventas", "canales"],
    ),
    (
        "clientes",
        &[
            "cuántos clientes nuevos",
            "clientes ganados",
            "estadísticas de clientes",
            "informe de clientes",
            "nuevos clientes trimestre",
        ],
    ),
    (
        "cobertura",
        &[
            "cobertura",
            "rendimiento de cobertura",
            "coberturas",
            "coberturas disponibles",
            "estadísticas de cobertura",
        ],
    ),
    ("poliza", &["poliza", "tipo poliza", "polizas", "generar poliza"]),
    ("saludo", &["hola", "buenas", "qué tal", "hey", "saludos"]),
];

impl Default for IntentTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IntentTable {
    /// The stock Spanish phrase table.
    pub fn builtin() -> Self {
        Self {
            intents: BUILTIN
                .iter()
                .map(|(key, phrases)| Intent {
                    key: key.to_string(),
                    phrases: phrases.iter().map(|p| p.to_string()).collect(),
                })
                .collect(),
        }
    }

    pub fn new(intents: Vec<Intent>) -> Result<Self, IntentError> {
        let table = Self { intents };
        table.validate()?;
        Ok(table)
    }

    /// Parse a `[[intent]]` table list. Declaration order is preserved.
    pub fn from_toml(input: &str) -> Result<Self, IntentError> {
        let table: IntentTable =
            toml::from_str(input).map_err(|e| IntentError::Parse(e.to_string()))?;
        table.validate()?;
        for overlap in table.overlapping_phrases() {
            log::warn!(
                "phrase '{}' is listed under '{}' and '{}'; '{}' wins",
                overlap.phrase,
                overlap.winner,
                overlap.shadowed,
                overlap.winner
            );
        }
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), IntentError> {
        let mut seen = HashSet::new();
        for (position, intent) in self.intents.iter().enumerate() {
            if intent.key.trim().is_empty() {
                return Err(IntentError::EmptyKey { position: position + 1 });
            }
            if !seen.insert(intent.key.as_str()) {
                return Err(IntentError::DuplicateKey(intent.key.clone()));
            }
            if intent.phrases.is_empty() {
                return Err(IntentError::NoPhrases(intent.key.clone()));
            }
        }
        Ok(())
    }

    /// Phrases (compared lowercased) that appear under more than one intent.
    pub fn overlapping_phrases(&self) -> Vec<PhraseOverlap> {
        let mut owner: HashMap<String, &str> = HashMap::new();
        let mut overlaps = Vec::new();
        for intent in &self.intents {
            for phrase in &intent.phrases {
                let lowered = phrase.to_lowercase();
                match owner.get(&lowered) {
                    Some(first) if *first != intent.key => overlaps.push(PhraseOverlap {
                        phrase: lowered,
                        winner: first.to_string(),
                        shadowed: intent.key.clone(),
                    }),
                    Some(_) => {}
                    None => {
                        owner.insert(lowered, &intent.key);
                    }
                }
            }
        }
        overlaps
    }

    /// Resolve raw user text to an intent key; `None` when nothing matches.
    pub fn resolve(&self, input: &str) -> Option<&str> {
        let needle = normalize(input);
        self.intents
            .iter()
            .find(|intent| intent.phrases.iter().any(|p| p.to_lowercase() == needle))
            .map(|intent| intent.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intent> {
        self.intents.iter()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}
