//! Parameter mapping loader.
//!
//! The mapping document is a JSON object keyed by procedure name. Each value
//! is an array with one entry per transaction parameter slot, where an entry
//! is one of:
//! - `null` — no inference rule for that slot
//! - `["queryName", paramIndex]` — a single candidate
//! - `[["q1", "q2"], [0, 3]]` — an ordered candidate list (equal lengths)
//!
//! All rules are normalized to candidate-list form here, at load time, so the
//! mapping is immutable for the rest of the run and the inference engine
//! never touches shared state.

use crate::utils::error::MappingError;
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One (query name, query parameter index) pair considered during inference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub query_name: String,
    pub param_index: usize,
}

/// An ordered candidate list for one transaction parameter slot.
///
/// Candidates are tried in order; the first one that yields a non-null
/// value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceRule {
    pub candidates: Vec<Candidate>,
}

/// The loaded, normalized mapping for every procedure in the document
///
/// **Public** - shared read-only across the whole scan
#[derive(Debug, Clone, Default)]
pub struct ParamMappings {
    rules: HashMap<String, Vec<Option<InferenceRule>>>,
}

/// Raw per-slot rule forms accepted in the mapping file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawRule {
    Single(String, usize),
    Multi(Vec<String>, Vec<usize>),
}

impl ParamMappings {
    /// Load and normalize a mapping document from disk
    ///
    /// **Public** - called once at startup when `fixparams` is selected
    ///
    /// # Errors
    /// * `MappingError::Io` - file cannot be read
    /// * `MappingError::JsonError` - document is not valid JSON of the expected shape
    /// * `MappingError::CandidateMismatch` - name/index lists differ in length
    /// * `MappingError::EmptyRule` - a rule has zero candidates
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and normalize a mapping document from a JSON string
    pub fn from_json_str(text: &str) -> Result<Self, MappingError> {
        let raw: HashMap<String, Vec<Option<RawRule>>> = serde_json::from_str(text)?;

        let mut rules = HashMap::with_capacity(raw.len());
        for (procedure, slots) in raw {
            let mut normalized = Vec::with_capacity(slots.len());
            for (index, slot) in slots.into_iter().enumerate() {
                normalized.push(match slot {
                    None => None,
                    Some(rule) => Some(normalize_rule(&procedure, index, rule)?),
                });
            }
            debug!(
                "Loaded mapping for {} ({} parameter slots)",
                procedure,
                normalized.len()
            );
            rules.insert(procedure, normalized);
        }
        Ok(Self { rules })
    }

    /// Rule slots for one procedure, or None if the document has no entry
    pub fn get(&self, procedure: &str) -> Option<&[Option<InferenceRule>]> {
        self.rules.get(procedure).map(Vec::as_slice)
    }

    /// Number of procedures covered by the document
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Normalize one raw rule to candidate-list form
///
/// **Private** - the scalar form becomes a one-element list; the list form
/// is validated for equal lengths and zipped.
fn normalize_rule(
    procedure: &str,
    index: usize,
    raw: RawRule,
) -> Result<InferenceRule, MappingError> {
    let candidates = match raw {
        RawRule::Single(query_name, param_index) => vec![Candidate {
            query_name,
            param_index,
        }],
        RawRule::Multi(names, indices) => {
            if names.len() != indices.len() {
                return Err(MappingError::CandidateMismatch {
                    procedure: procedure.to_string(),
                    index,
                    names: names.len(),
                    indices: indices.len(),
                });
            }
            names
                .into_iter()
                .zip(indices)
                .map(|(query_name, param_index)| Candidate {
                    query_name,
                    param_index,
                })
                .collect()
        }
    };

    if candidates.is_empty() {
        return Err(MappingError::EmptyRule {
            procedure: procedure.to_string(),
            index,
        });
    }

    Ok(InferenceRule { candidates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn candidate(name: &str, index: usize) -> Candidate {
        Candidate {
            query_name: name.to_string(),
            param_index: index,
        }
    }

    #[test]
    fn test_scalar_rule_becomes_one_element_list() {
        let mappings =
            ParamMappings::from_json_str(r#"{"proc": [null, ["getX", 2]]}"#).unwrap();
        let slots = mappings.get("proc").unwrap();
        assert_eq!(slots.len(), 2);
        assert!(slots[0].is_none());
        assert_eq!(
            slots[1].as_ref().unwrap().candidates,
            vec![candidate("getX", 2)]
        );
    }

    #[test]
    fn test_list_rule_zips_in_order() {
        let mappings =
            ParamMappings::from_json_str(r#"{"proc": [[["q1", "q2"], [0, 3]]]}"#).unwrap();
        let slots = mappings.get("proc").unwrap();
        assert_eq!(
            slots[0].as_ref().unwrap().candidates,
            vec![candidate("q1", 0), candidate("q2", 3)]
        );
    }

    #[test]
    fn test_mismatched_lists_are_rejected() {
        let err = ParamMappings::from_json_str(r#"{"proc": [[["q1", "q2"], [0]]]}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            MappingError::CandidateMismatch { index: 0, names: 2, indices: 1, .. }
        ));
    }

    #[test]
    fn test_empty_candidate_list_is_rejected() {
        let err = ParamMappings::from_json_str(r#"{"proc": [[[], []]]}"#).unwrap_err();
        assert!(matches!(err, MappingError::EmptyRule { index: 0, .. }));
    }

    #[test]
    fn test_unknown_procedure_lookup_is_none() {
        let mappings = ParamMappings::from_json_str(r#"{"proc": []}"#).unwrap();
        assert!(mappings.get("other").is_none());
        assert_eq!(mappings.len(), 1);
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        assert!(ParamMappings::from_json_str(r#"{"proc": [42]}"#).is_err());
        assert!(ParamMappings::from_json_str("[]").is_err());
    }
}
