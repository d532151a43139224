//! Parameter inference engine.
//!
//! Fills unset transaction parameters from nested query parameters, guided
//! by the per-procedure mapping. This is the one piece of real logic in the
//! tool; everything around it is line iteration and bookkeeping.

use crate::mapping::{InferenceRule, ParamMappings};
use crate::model::{is_set, Transaction};
use crate::utils::error::InferError;
use log::debug;
use serde_json::Value;

/// Fill unset transaction parameters from matching query parameters
///
/// **Public** - main entry point for the fixparams command
///
/// For each transaction parameter slot in ascending order:
/// 1. Skip if the slot already holds a value — never overwrite.
/// 2. Skip if the mapping has no rule for that slot.
/// 3. Otherwise try the rule's candidates in order. For each candidate,
///    walk the transaction's queries with that name in execution order;
///    the first non-null value at the candidate's parameter index wins,
///    and no further instances or candidates are consulted for this slot.
///
/// # Arguments
/// * `txn` - record to reconstruct, mutated in place
/// * `mappings` - normalized mapping, must cover `txn.catalog_name`
///
/// # Returns
/// Whether any parameter slot was filled, so the caller can decide between
/// emitting the reconstructed record and the untouched original line.
///
/// # Errors
/// * `InferError::UnknownProcedure` - mapping has no entry for this procedure
/// * `InferError::SlotCountMismatch` - rule slots != parameter slots
/// * `InferError::CandidateOutOfRange` - a candidate indexes past the end of
///   a matched query's parameter list
///
/// These are configuration errors and abort the run rather than skip the
/// record: the mapping must be correct up front.
pub fn infer_parameters(
    txn: &mut Transaction,
    mappings: &ParamMappings,
) -> Result<bool, InferError> {
    let rules = mappings
        .get(&txn.catalog_name)
        .ok_or_else(|| InferError::UnknownProcedure(txn.catalog_name.clone()))?;

    if rules.len() != txn.params.len() {
        return Err(InferError::SlotCountMismatch {
            procedure: txn.catalog_name.clone(),
            params: txn.params.len(),
            rules: rules.len(),
        });
    }

    let mut changed = false;
    for slot in 0..txn.params.len() {
        if is_set(&txn.params[slot]) {
            continue;
        }
        let Some(rule) = &rules[slot] else { continue };

        if let Some(value) = first_candidate_value(txn, rule)? {
            txn.params[slot] = value;
            changed = true;
            debug!("Fixed {} parameter #{}", txn.catalog_name, slot);
        }
    }
    Ok(changed)
}

/// First non-null value produced by a rule, in candidate order then
/// execution order
///
/// **Private** - a candidate matching zero query instances contributes
/// nothing and the next candidate is tried.
fn first_candidate_value(
    txn: &Transaction,
    rule: &InferenceRule,
) -> Result<Option<Value>, InferError> {
    for candidate in &rule.candidates {
        for query in txn.queries_named(&candidate.query_name) {
            let value = query.params.get(candidate.param_index).ok_or_else(|| {
                InferError::CandidateOutOfRange {
                    procedure: txn.catalog_name.clone(),
                    query: candidate.query_name.clone(),
                    index: candidate.param_index,
                    len: query.params.len(),
                }
            })?;
            if is_set(value) {
                debug!(
                    "Using parameter {} from {} for {}",
                    candidate.param_index, candidate.query_name, txn.catalog_name
                );
                return Ok(Some(value.clone()));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn txn(params: &str, queries: &str) -> Transaction {
        let line = format!(
            r#"{{"CATALOG_NAME":"proc","ID":1,"params":{params},"queries":{queries}}}"#
        );
        Transaction::parse(&line).unwrap()
    }

    fn mappings(doc: &str) -> ParamMappings {
        ParamMappings::from_json_str(doc).unwrap()
    }

    #[test]
    fn test_fills_unset_slot_from_query() {
        let mut t = txn(
            "[5, null]",
            r#"[{"name":"getX","params":[1, 1, 1, 42]}]"#,
        );
        let m = mappings(r#"{"proc": [null, ["getX", 3]]}"#);

        let changed = infer_parameters(&mut t, &m).unwrap();
        assert!(changed);
        assert_eq!(t.params, vec![json!(5), json!(42)]);
    }

    #[test]
    fn test_never_overwrites_set_slot() {
        let mut t = txn("[5, 6]", r#"[{"name":"getX","params":[42]}]"#);
        let m = mappings(r#"{"proc": [["getX", 0], ["getX", 0]]}"#);

        let changed = infer_parameters(&mut t, &m).unwrap();
        assert!(!changed);
        assert_eq!(t.params, vec![json!(5), json!(6)]);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let mut t = txn("[null]", r#"[{"name":"getX","params":[7]}]"#);
        let m = mappings(r#"{"proc": [["getX", 0]]}"#);

        assert!(infer_parameters(&mut t, &m).unwrap());
        assert_eq!(t.params, vec![json!(7)]);

        // Second run sees a set slot and reports no change.
        assert!(!infer_parameters(&mut t, &m).unwrap());
        assert_eq!(t.params, vec![json!(7)]);
    }

    #[test]
    fn test_first_candidate_wins_over_later_ones() {
        let mut t = txn(
            "[null]",
            r#"[{"name":"q2","params":[200]},{"name":"q1","params":[100]}]"#,
        );
        let m = mappings(r#"{"proc": [[["q1", "q2"], [0, 0]]]}"#);

        infer_parameters(&mut t, &m).unwrap();
        // q1 is the first candidate even though q2 executed first.
        assert_eq!(t.params, vec![json!(100)]);
    }

    #[test]
    fn test_first_instance_in_execution_order_wins() {
        let mut t = txn(
            "[null]",
            r#"[{"name":"q1","params":[null]},{"name":"q1","params":[8]},{"name":"q1","params":[9]}]"#,
        );
        let m = mappings(r#"{"proc": [["q1", 0]]}"#);

        infer_parameters(&mut t, &m).unwrap();
        assert_eq!(t.params, vec![json!(8)]);
    }

    #[test]
    fn test_falls_through_to_next_candidate() {
        // q1 exists but only holds null; q3 does not exist at all.
        let mut t = txn(
            "[null]",
            r#"[{"name":"q1","params":[null]},{"name":"q2","params":[55]}]"#,
        );
        let m = mappings(r#"{"proc": [[["q3", "q1", "q2"], [0, 0, 0]]]}"#);

        infer_parameters(&mut t, &m).unwrap();
        assert_eq!(t.params, vec![json!(55)]);
    }

    #[test]
    fn test_no_match_leaves_slot_unset() {
        let mut t = txn("[null]", r#"[{"name":"q1","params":[null]}]"#);
        let m = mappings(r#"{"proc": [["q1", 0]]}"#);

        let changed = infer_parameters(&mut t, &m).unwrap();
        assert!(!changed);
        assert_eq!(t.params, vec![Value::Null]);
    }

    #[test]
    fn test_null_rule_is_skipped() {
        let mut t = txn("[null]", r#"[{"name":"q1","params":[3]}]"#);
        let m = mappings(r#"{"proc": [null]}"#);

        assert!(!infer_parameters(&mut t, &m).unwrap());
        assert_eq!(t.params, vec![Value::Null]);
    }

    #[test]
    fn test_missing_procedure_is_an_error() {
        let mut t = txn("[null]", "[]");
        let m = mappings(r#"{"other": []}"#);

        let err = infer_parameters(&mut t, &m).unwrap_err();
        assert!(matches!(err, InferError::UnknownProcedure(name) if name == "proc"));
    }

    #[test]
    fn test_slot_count_mismatch_is_an_error() {
        let mut t = txn("[null, null]", "[]");
        let m = mappings(r#"{"proc": [null]}"#);

        let err = infer_parameters(&mut t, &m).unwrap_err();
        assert!(matches!(
            err,
            InferError::SlotCountMismatch { params: 2, rules: 1, .. }
        ));
    }

    #[test]
    fn test_out_of_range_candidate_is_an_error() {
        let mut t = txn("[null]", r#"[{"name":"q1","params":[1]}]"#);
        let m = mappings(r#"{"proc": [["q1", 5]]}"#);

        let err = infer_parameters(&mut t, &m).unwrap_err();
        assert!(matches!(
            err,
            InferError::CandidateOutOfRange { index: 5, len: 1, .. }
        ));
    }

    #[test]
    fn test_non_numeric_values_are_copied_verbatim() {
        let mut t = txn(
            "[null]",
            r#"[{"name":"q1","params":["W_NAME"]}]"#,
        );
        let m = mappings(r#"{"proc": [["q1", 0]]}"#);

        infer_parameters(&mut t, &m).unwrap();
        assert_eq!(t.params, vec![json!("W_NAME")]);
    }
}
