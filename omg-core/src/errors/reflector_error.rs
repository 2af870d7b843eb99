/// Progressive-compression reflector errors.
#[derive(Debug, thiserror::Error)]
pub enum ReflectorError {
    #[error("synthesis LLM call failed at level {level}: {reason}")]
    SynthesisFailed { level: u8, reason: String },

    #[error("escalation exhausted at level 3, accepting oversized result (warned)")]
    EscalationExhausted,
}
