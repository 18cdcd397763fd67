use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::mapping::mapping::MappingIndices;

/// Label returned for class ids with no expression entry. Resolving an
/// unknown class is a defined fallback outcome, not an error.
pub const UNKNOWN_EXPRESSION: &str = "unknown";

/// One resolved muscle region, in resolution order. The same code can
/// appear more than once when several action units share a muscle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMuscle {
    pub code: String,
    pub name: String,
    pub color: String,
}

/// resolve walks the expression -> action-unit -> muscle-unit chain for
/// one classified expression.
///
/// Muscle codes are appended in action-unit order without deduplication;
/// duplicates are observable behavior the callers rely on. Codes missing
/// from the name table are dropped entirely rather than rendered with
/// placeholder data.
///
/// # Arguments
/// * `class_id` - classifier output index, compared as a string
/// * `indices` - mapping indices from `MappingStore::load`
///
/// # Returns
/// * `(String, Vec<ResolvedMuscle>)` - expression label and ordered muscles
pub fn resolve(class_id: &str, indices: &MappingIndices) -> (String, Vec<ResolvedMuscle>) {
    let Some(entry) = indices.expressions.get(class_id) else {
        debug!(class_id, "no expression entry for class id");
        return (UNKNOWN_EXPRESSION.to_string(), Vec::new());
    };

    let mut mu_codes: Vec<&str> = Vec::new();
    for au_code in &entry.action_units {
        match indices.action_units.get(au_code) {
            Some(codes) => mu_codes.extend(codes.iter().map(String::as_str)),
            None => debug!(%au_code, "action unit has no muscle mapping"),
        }
    }

    let mut resolved = Vec::with_capacity(mu_codes.len());
    for code in mu_codes {
        match indices.muscle_units.get(code) {
            Some(mu) => resolved.push(ResolvedMuscle {
                code: code.to_owned(),
                name: mu.name.clone(),
                color: mu.color.clone(),
            }),
            None => warn!(code, "muscle unit missing from name table, dropped"),
        }
    }

    (entry.label.clone(), resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::mapping::{ExpressionEntry, MuscleUnitEntry};

    fn scenario_indices() -> MappingIndices {
        let mut indices = MappingIndices::default();
        indices.expressions.insert(
            "3".to_string(),
            ExpressionEntry {
                label: "happy".to_string(),
                action_units: vec!["AU1".to_string(), "AU2".to_string()],
            },
        );
        indices
            .action_units
            .insert("AU1".to_string(), vec!["M1".to_string(), "M2".to_string()]);
        indices
            .action_units
            .insert("AU2".to_string(), vec!["M2".to_string()]);
        indices.muscle_units.insert(
            "M1".to_string(),
            MuscleUnitEntry {
                name: "Brow Raiser".to_string(),
                color: "#FF0000".to_string(),
            },
        );
        indices.muscle_units.insert(
            "M2".to_string(),
            MuscleUnitEntry {
                name: "Cheek Raiser".to_string(),
                color: "#00FF00".to_string(),
            },
        );
        indices
    }

    #[test]
    fn test_duplicate_muscles_are_preserved() {
        let indices = scenario_indices();
        let (label, muscles) = resolve("3", &indices);

        assert_eq!(label, "happy");
        let flat: Vec<(&str, &str, &str)> = muscles
            .iter()
            .map(|m| (m.code.as_str(), m.name.as_str(), m.color.as_str()))
            .collect();
        // M2 is reachable through both AU1 and AU2 and must appear twice
        assert_eq!(
            flat,
            vec![
                ("M1", "Brow Raiser", "#FF0000"),
                ("M2", "Cheek Raiser", "#00FF00"),
                ("M2", "Cheek Raiser", "#00FF00"),
            ]
        );
    }

    #[test]
    fn test_unknown_class_id_is_fallback_not_error() {
        let indices = scenario_indices();
        let (label, muscles) = resolve("42", &indices);
        assert_eq!(label, UNKNOWN_EXPRESSION);
        assert!(muscles.is_empty());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let indices = scenario_indices();
        assert_eq!(resolve("3", &indices), resolve("3", &indices));
    }

    #[test]
    fn test_unresolvable_codes_are_dropped() {
        let mut indices = scenario_indices();
        // AU3 maps to a muscle with no name-table entry
        indices
            .expressions
            .get_mut("3")
            .unwrap()
            .action_units
            .push("AU3".to_string());
        indices
            .action_units
            .insert("AU3".to_string(), vec!["M9".to_string()]);

        let (_, muscles) = resolve("3", &indices);
        assert_eq!(muscles.len(), 3);
        assert!(muscles.iter().all(|m| m.code != "M9"));
    }

    #[test]
    fn test_all_codes_reachable_via_au_chain() {
        let indices = scenario_indices();
        let (_, muscles) = resolve("3", &indices);

        let entry = &indices.expressions["3"];
        for muscle in &muscles {
            let reachable = entry.action_units.iter().any(|au| {
                indices
                    .action_units
                    .get(au)
                    .is_some_and(|codes| codes.contains(&muscle.code))
            });
            assert!(reachable, "{} not reachable for class 3", muscle.code);
        }
    }
}
