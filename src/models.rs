use serde::Deserialize;

pub type RawClues = Vec<RawClue>;

/// One record as returned by the external trivia service. The service makes
/// few promises: `value` may be null, batches may be short, long, or contain
/// duplicates.
#[derive(Debug, Clone, Deserialize)]
pub struct RawClue {
    pub question: String,
    pub answer: String,
    pub value: Option<i64>,
}

/// A question that has been accepted by the assembly engine but not yet
/// persisted. The caller decides which quiz and round it lands in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub user_id: i64,
}
