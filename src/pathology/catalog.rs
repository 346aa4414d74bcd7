// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ordered pathology → Hoppr model catalog

use serde::Serialize;
use thiserror::Error;

/// Pathology used when a lookup or filename detection finds nothing
pub const DEFAULT_PATHOLOGY: &str = "atelectasis";

/// Model version suffix shared by the chest radiography models
const MODEL_VERSION: &str = "v1.20250828";

/// Built-in chest radiography pathologies, in the order they are tried
const BUILTIN_PATHOLOGIES: &[&str] = &[
    "atelectasis",
    "pneumothorax",
    "cardiomegaly",
    "lung_opacity",
    "pleural_effusion",
    "consolidation",
    "infiltration",
    "pleural_thickening",
    "aortic_enlargement",
    "calcification",
    "pulmonary_fibrosis",
    "ild",
    "normal",
];

/// Strict lookup miss
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown pathology '{requested}'")]
pub struct UnknownPathology {
    /// The key as the caller supplied it
    pub requested: String,
    /// Every key the catalog knows, in catalog order
    pub available: Vec<String>,
}

/// One catalog row
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PathologyEntry {
    pub key: String,
    pub display_name: String,
    pub model_id: String,
}

/// Immutable, insertion-ordered mapping from pathology key to remote model id.
///
/// Built once at startup and shared read-only between request handlers.
#[derive(Debug, Clone)]
pub struct PathologyCatalog {
    entries: Vec<(String, String)>,
    default_key: String,
}

impl Default for PathologyCatalog {
    fn default() -> Self {
        let entries = BUILTIN_PATHOLOGIES
            .iter()
            .map(|key| {
                (
                    key.to_string(),
                    format!("mc_chestradiography_{}:{}", key, MODEL_VERSION),
                )
            })
            .collect();

        Self {
            entries,
            default_key: DEFAULT_PATHOLOGY.to_string(),
        }
    }
}

impl PathologyCatalog {
    /// Build a catalog from explicit entries.
    ///
    /// Duplicate keys are dropped (first declaration wins). The default
    /// pathology must be one of the keys.
    pub fn new<K, M>(entries: Vec<(K, M)>, default_key: &str) -> Result<Self, String>
    where
        K: Into<String>,
        M: Into<String>,
    {
        let mut deduped: Vec<(String, String)> = Vec::with_capacity(entries.len());
        for (key, model) in entries {
            let key: String = key.into();
            let key = normalize_key(&key);
            if key.is_empty() {
                return Err("pathology key must not be empty".to_string());
            }
            if deduped.iter().any(|(k, _)| *k == key) {
                continue;
            }
            deduped.push((key, model.into()));
        }

        let default_key = normalize_key(default_key);
        if !deduped.iter().any(|(k, _)| *k == default_key) {
            return Err(format!(
                "default pathology '{}' is not in the catalog",
                default_key
            ));
        }

        Ok(Self {
            entries: deduped,
            default_key,
        })
    }

    /// Key used when nothing else matches
    pub fn default_pathology(&self) -> &str {
        &self.default_key
    }

    /// Model id of the default pathology
    pub fn default_model(&self) -> &str {
        self.model_for(&self.default_key).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup on an already-normalized key
    fn model_for(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, m)| m.as_str())
    }

    /// Normalizing lookup shared by the lenient and strict resolvers.
    ///
    /// `"Lung Opacity"`, `"lung-opacity"` and `"LUNG_OPACITY"` all land on
    /// `lung_opacity`; if that misses, separators are ignored entirely so
    /// `"pneumo thorax"` still finds `pneumothorax`.
    fn lookup(&self, pathology: &str) -> Option<&(String, String)> {
        let normalized = normalize_key(pathology);
        if let Some(entry) = self.entries.iter().find(|(k, _)| *k == normalized) {
            return Some(entry);
        }

        let collapsed = normalized.replace('_', "");
        if collapsed.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(k, _)| k.replace('_', "") == collapsed)
    }

    /// Resolve a pathology name to its model id, falling back to the default
    /// pathology's model when the name is not recognized.
    pub fn resolve_model(&self, pathology: &str) -> &str {
        match self.lookup(pathology) {
            Some((_, model)) => model,
            None => self.default_model(),
        }
    }

    /// Like [`resolve_model`](Self::resolve_model) but reports a miss instead
    /// of silently defaulting.
    pub fn resolve_model_strict(&self, pathology: &str) -> Result<&str, UnknownPathology> {
        self.lookup(pathology)
            .map(|(_, model)| model.as_str())
            .ok_or_else(|| UnknownPathology {
                requested: pathology.to_string(),
                available: self.list_pathologies().iter().map(|k| k.to_string()).collect(),
            })
    }

    /// Pathology keys in declaration order
    pub fn list_pathologies(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Model ids in declaration order
    pub fn all_models(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, m)| m.as_str()).collect()
    }

    /// (pathology, model id) pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, m)| (k.as_str(), m.as_str()))
    }

    /// Reverse lookup: which pathology does this model id belong to
    pub fn pathology_for_model(&self, model_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, m)| m == model_id)
            .map(|(k, _)| k.as_str())
    }

    /// Best-effort pathology detection from an uploaded file's name.
    ///
    /// Each key is tried in catalog order as-is, with underscores as spaces,
    /// and with underscores removed; the first substring hit wins.
    pub fn detect_from_filename(&self, filename: &str) -> &str {
        let lowered = filename.to_lowercase();

        for (key, _) in &self.entries {
            let variants = [key.clone(), key.replace('_', " "), key.replace('_', "")];
            if variants.iter().any(|v| lowered.contains(v.as_str())) {
                return key;
            }
        }

        &self.default_key
    }

    /// Rows for listing endpoints
    pub fn entries(&self) -> Vec<PathologyEntry> {
        self.entries
            .iter()
            .map(|(key, model_id)| PathologyEntry {
                key: key.clone(),
                display_name: display_name(key),
                model_id: model_id.clone(),
            })
            .collect()
    }
}

/// Lowercase, trim, and turn spaces and hyphens into underscores
pub fn normalize_key(pathology: &str) -> String {
    pathology
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// `lung_opacity` → `Lung Opacity`
pub fn display_name(pathology_key: &str) -> String {
    pathology_key
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
