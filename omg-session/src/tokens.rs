/// Rough token estimate for a message window: `ceil(chars / 4)`, the same
/// heuristic used elsewhere in the crate family — each crate that needs
/// one keeps its own, since there's no shared tokenizer to call out to.
pub fn estimate_tokens(messages: &[&str]) -> u64 {
    let chars: usize = messages.iter().map(|m| m.chars().count()).sum();
    ((chars + 3) / 4) as u64
}
