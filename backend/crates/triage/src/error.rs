#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("{rule} contribution overflowed")]
    Overflow { rule: &'static str },
}
