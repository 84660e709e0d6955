use serde_json::Value;

/// Insert `entry` immediately before the last element of `seq`.
///
/// Loader sequences end with a catch-all fallback, and a specialized entry has
/// to come before it. The entry lands at index `len - 1` (index 0 for an empty
/// sequence) and the previously last element stays last. Returns the index.
pub fn insert_before_last(seq: &mut Vec<Value>, entry: Value) -> usize {
	let index = seq.len().saturating_sub(1);
	seq.insert(index, entry);
	index
}
