//! Order-insensitive argument list comparison

use serde_json::Value;

use super::ArgumentMatcher;

/// Whether `actual` contains exactly the values `expected` describes, in any
/// order
///
/// Both lists must have the same length and every expected matcher must be
/// paired with a distinct actual value it accepts. Pairing is solved as a
/// bipartite matching, so a broad matcher such as `anything()` never steals
/// the only value a narrower matcher could accept.
///
/// ```rust
/// use acton_job_matchers::matchers::argument::{anything, ArgumentMatcher};
/// use acton_job_matchers::matchers::contain_exactly;
/// use serde_json::json;
///
/// let expected = [anything(), ArgumentMatcher::from("a")];
/// assert!(contain_exactly(&expected, &[json!("a"), json!("b")]));
/// assert!(!contain_exactly(&expected, &[json!("b"), json!("c")]));
/// ```
#[must_use]
pub fn contain_exactly(expected: &[ArgumentMatcher], actual: &[Value]) -> bool {
    if expected.len() != actual.len() {
        return false;
    }

    let accepts: Vec<Vec<usize>> = expected
        .iter()
        .map(|matcher| {
            actual
                .iter()
                .enumerate()
                .filter(|(_, value)| matcher.matches(value))
                .map(|(index, _)| index)
                .collect()
        })
        .collect();

    // assigned[actual] = expected index paired with it
    let mut assigned: Vec<Option<usize>> = vec![None; actual.len()];
    (0..expected.len()).all(|matcher| {
        let mut visited = vec![false; actual.len()];
        augment(matcher, &accepts, &mut assigned, &mut visited)
    })
}

fn augment(
    matcher: usize,
    accepts: &[Vec<usize>],
    assigned: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &value in &accepts[matcher] {
        if visited[value] {
            continue;
        }
        visited[value] = true;

        let free = match assigned[value] {
            None => true,
            Some(other) => augment(other, accepts, assigned, visited),
        };
        if free {
            assigned[value] = Some(matcher);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::argument::{a_string, anything};
    use proptest::prelude::*;
    use serde_json::json;

    fn literals(values: &[Value]) -> Vec<ArgumentMatcher> {
        values.iter().cloned().map(ArgumentMatcher::from).collect()
    }

    #[test]
    fn test_empty_lists_match() {
        assert!(contain_exactly(&[], &[]));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(!contain_exactly(&literals(&[json!(1)]), &[json!(1), json!(1)]));
        assert!(!contain_exactly(&literals(&[json!(1), json!(1)]), &[json!(1)]));
    }

    #[test]
    fn test_duplicates_are_counted() {
        let expected = literals(&[json!(1), json!(1), json!(2)]);
        assert!(contain_exactly(&expected, &[json!(1), json!(2), json!(1)]));
        assert!(!contain_exactly(&expected, &[json!(1), json!(2), json!(2)]));
    }

    #[test]
    fn test_broad_matcher_does_not_steal() {
        let expected = vec![anything(), ArgumentMatcher::from("only")];
        assert!(contain_exactly(&expected, &[json!("only"), json!(5)]));

        let expected = vec![a_string(), ArgumentMatcher::from("x")];
        assert!(contain_exactly(&expected, &[json!("x"), json!("y")]));
        assert!(!contain_exactly(&expected, &[json!("y"), json!("z")]));
    }

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,4}".prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
        ]
    }

    proptest! {
        #[test]
        fn test_permutations_match(
            (values, shuffled) in prop::collection::vec(scalar(), 0..8)
                .prop_flat_map(|values| (Just(values.clone()), Just(values).prop_shuffle()))
        ) {
            prop_assert!(contain_exactly(&literals(&values), &shuffled));
        }

        #[test]
        fn test_extra_value_never_matches(
            values in prop::collection::vec(scalar(), 0..8),
            extra in scalar(),
        ) {
            let mut actual = values.clone();
            actual.push(extra);
            prop_assert!(!contain_exactly(&literals(&values), &actual));
        }
    }
}
