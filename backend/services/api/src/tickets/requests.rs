use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct RankQuery {
    /// How many tickets to return; the service default when absent.
    pub top_n: Option<usize>,
}
