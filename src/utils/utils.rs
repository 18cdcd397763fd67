/// argmax returns the index of the largest value in `values`, or 0 for an
/// empty slice. NaN entries compare below every real value.
pub fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.9]), 0);
        assert_eq!(argmax(&[]), 0);
        // ties resolve to the last maximal entry, matching max_by semantics
        assert_eq!(argmax(&[0.5, 0.5]), 1);
    }
}
