use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};

/// Expression row: a human-readable label plus the action-unit codes it
/// activates, in configuration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionEntry {
    pub label: String,
    pub action_units: Vec<String>,
}

/// Named, colored muscle region. `color` keeps the "#RRGGBB" form from
/// the document; the renderer decodes it.
#[derive(Debug, Clone, PartialEq)]
pub struct MuscleUnitEntry {
    pub name: String,
    pub color: String,
}

/// One polygon vertex as a weighted sum of landmark coordinates.
/// `weights` and `indices` always have equal length; records violating
/// that are dropped at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexDef {
    pub weights: Vec<f32>,
    pub indices: Vec<usize>,
}

/// The four lookup indices the rest of the pipeline runs on. Built fresh
/// from the mapping document on every `MappingStore::load` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingIndices {
    /// class-id string -> expression entry (first occurrence wins)
    pub expressions: HashMap<String, ExpressionEntry>,
    /// AU code -> muscle-unit codes, accumulated across duplicate rows
    pub action_units: HashMap<String, Vec<String>>,
    /// MU code -> name/color (first occurrence wins)
    pub muscle_units: HashMap<String, MuscleUnitEntry>,
    /// MU code -> vertex definitions; a missing key is not an error
    pub geometry: HashMap<String, Vec<VertexDef>>,
}

#[derive(Debug, Deserialize)]
struct ExpToAuRecord {
    exp_num: String,
    exp: String,
    au_no: String,
}

#[derive(Debug, Deserialize)]
struct AuToMuRecord {
    au_no: String,
    mu_no: String,
}

#[derive(Debug, Deserialize)]
struct MuToNaRecord {
    mu_no: String,
    mu_na: String,
    mu_color: String,
}

#[derive(Debug, Deserialize)]
struct VertexRecord {
    #[serde(default)]
    p: Option<String>,
    #[serde(default)]
    v: Option<String>,
}

/// Wire schema of the mapping document. Geometry lives in top-level keys
/// named after each MU code, hence the flatten.
#[derive(Debug, Deserialize)]
struct MappingDocument {
    exp_to_au: Vec<ExpToAuRecord>,
    au_to_mu: Vec<AuToMuRecord>,
    mu_to_na: Vec<MuToNaRecord>,
    #[serde(flatten)]
    geometry: HashMap<String, Vec<VertexRecord>>,
}

fn split_codes(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_owned).collect()
}

fn parse_vertex(record: &VertexRecord) -> Option<VertexDef> {
    let p = record.p.as_deref()?;
    let v = record.v.as_deref()?;
    let weights = p
        .split_whitespace()
        .map(|t| t.parse::<f32>().ok())
        .collect::<Option<Vec<_>>>()?;
    let indices = v
        .split_whitespace()
        .map(|t| t.parse::<usize>().ok())
        .collect::<Option<Vec<_>>>()?;
    if weights.len() != indices.len() {
        return None;
    }
    Some(VertexDef { weights, indices })
}

/// parse_document parses mapping-document text into the four indices.
///
/// Fails with `Error::Config` when the text is not valid JSON or one of
/// the required keys (`exp_to_au`, `au_to_mu`, `mu_to_na`) is absent.
/// Malformed per-vertex records are skipped with a warning, never fatal.
///
/// # Arguments
/// * `text` - JSON mapping document
///
/// # Returns
/// * `Result<MappingIndices>`
pub fn parse_document(text: &str) -> Result<MappingIndices> {
    let doc: MappingDocument =
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;

    let mut indices = MappingIndices::default();

    for record in doc.exp_to_au {
        let entry = ExpressionEntry {
            label: record.exp,
            action_units: split_codes(&record.au_no),
        };
        indices.expressions.entry(record.exp_num).or_insert(entry);
    }

    for record in doc.au_to_mu {
        indices
            .action_units
            .entry(record.au_no)
            .or_default()
            .extend(split_codes(&record.mu_no));
    }

    for record in doc.mu_to_na {
        let entry = MuscleUnitEntry {
            name: record.mu_na,
            color: record.mu_color,
        };
        indices.muscle_units.entry(record.mu_no).or_insert(entry);
    }

    for (mu_code, records) in doc.geometry {
        let mut defs = Vec::with_capacity(records.len());
        for record in &records {
            match parse_vertex(record) {
                Some(def) => defs.push(def),
                None => {
                    warn!(%mu_code, "dropping malformed vertex record");
                }
            }
        }
        indices.geometry.insert(mu_code, defs);
    }

    Ok(indices)
}

/// MappingStore owns the path of the mapping document and re-reads it on
/// every `load`, so edits to the file take effect on the next request
/// without a restart or invalidation logic.
#[derive(Debug, Clone)]
pub struct MappingStore {
    path: PathBuf,
}

impl MappingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        MappingStore { path: path.into() }
    }

    pub fn load(&self) -> Result<MappingIndices> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            Error::Config(format!(
                "cannot read mapping document {}: {e}",
                self.path.display()
            ))
        })?;
        parse_document(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "exp_to_au": [
            {"exp_num": "3", "exp": "happy", "au_no": "AU6 AU12"},
            {"exp_num": "3", "exp": "shadowed", "au_no": "AU99"},
            {"exp_num": "4", "exp": "angry", "au_no": "AU4"}
        ],
        "au_to_mu": [
            {"au_no": "AU6", "mu_no": "M1 M2"},
            {"au_no": "AU6", "mu_no": "M3"},
            {"au_no": "AU12", "mu_no": "M2"},
            {"au_no": "AU4", "mu_no": "M4"}
        ],
        "mu_to_na": [
            {"mu_no": "M1", "mu_na": "Orbicularis Oculi", "mu_color": "#FF0000"},
            {"mu_no": "M1", "mu_na": "Shadowed Name", "mu_color": "#000001"},
            {"mu_no": "M2", "mu_na": "Zygomaticus Major", "mu_color": "#00FF00"},
            {"mu_no": "M3", "mu_na": "Levator Labii", "mu_color": "#0000FF"},
            {"mu_no": "M4", "mu_na": "Corrugator", "mu_color": "#123456"}
        ],
        "M1": [
            {"p": "0.5 0.5", "v": "10 11"},
            {"p": "1.0", "v": "12"}
        ],
        "M2": [
            {"p": "1.0 2.0", "v": "5"},
            {"v": "7"},
            {"p": "abc", "v": "7"},
            {"p": "0.25", "v": "7"}
        ]
    }"##;

    #[test]
    fn test_indices_are_built() {
        let indices = parse_document(SAMPLE).unwrap();

        let happy = indices.expressions.get("3").unwrap();
        assert_eq!(happy.label, "happy");
        assert_eq!(happy.action_units, vec!["AU6", "AU12"]);

        // duplicate AU rows accumulate in document order
        assert_eq!(indices.action_units["AU6"], vec!["M1", "M2", "M3"]);
        assert_eq!(indices.action_units["AU12"], vec!["M2"]);

        assert_eq!(indices.muscle_units["M4"].color, "#123456");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let indices = parse_document(SAMPLE).unwrap();
        assert_eq!(indices.expressions["3"].label, "happy");
        assert_eq!(indices.muscle_units["M1"].name, "Orbicularis Oculi");
    }

    #[test]
    fn test_geometry_parsing_skips_bad_records() {
        let indices = parse_document(SAMPLE).unwrap();

        let m1 = &indices.geometry["M1"];
        assert_eq!(m1.len(), 2);
        assert_eq!(m1[0].weights, vec![0.5, 0.5]);
        assert_eq!(m1[0].indices, vec![10, 11]);

        // M2: token-count mismatch, missing "p", unparseable "p" all dropped
        let m2 = &indices.geometry["M2"];
        assert_eq!(m2.len(), 1);
        assert_eq!(m2[0].indices, vec![7]);

        // a MU with no geometry key is simply absent, not an error
        assert!(!indices.geometry.contains_key("M3"));
    }

    #[test]
    fn test_missing_required_key_is_config_error() {
        let err = parse_document(r#"{"exp_to_au": [], "au_to_mu": []}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unparseable_document_is_config_error() {
        let err = parse_document("not json at all").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_store_reads_fresh_from_disk() {
        let path = std::env::temp_dir().join("rs_expression_pipeline_mapping_fresh.json");
        std::fs::write(&path, SAMPLE).unwrap();
        let store = MappingStore::new(&path);
        assert_eq!(store.load().unwrap().expressions["3"].label, "happy");

        let edited = SAMPLE.replacen("happy", "joyful", 1);
        std::fs::write(&path, edited).unwrap();
        assert_eq!(store.load().unwrap().expressions["3"].label, "joyful");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_store_missing_file_is_config_error() {
        let store = MappingStore::new("/definitely/not/a/real/mapping.json");
        assert!(matches!(store.load().unwrap_err(), Error::Config(_)));
    }
}
