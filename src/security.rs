use subtle::ConstantTimeEq;

/// Constant-time string comparison for bearer tokens, so response timing
/// does not reveal how much of a guessed key matched.
pub fn constant_time_compare(provided: &str, expected: &str) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
