use serde::Deserialize;

/// Body of both vote routes: `1` for up, `-1` for down.
#[derive(Debug, Deserialize)]
pub struct VoteBody {
    pub value: i16,
}
