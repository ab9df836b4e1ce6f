//! Board ⇄ stored-text conversion.
//!
//! The stored layout is the board object keyed by the fixed column names,
//! each column `{ "title", "items" }`, task timestamps as RFC 3339 text.
//! Decoding reconstructs the timestamps into real instants; anything
//! malformed falls back to the seed board rather than surfacing an error.

use super::Board;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize the full board to its stored text form.
pub fn encode(board: &Board) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(board)?)
}

/// Parse stored text into a board, or explain why it can't be one.
pub fn try_decode(text: &str) -> Result<Board, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Parse stored text into a board, falling back to the seed board on any
/// parse or structural failure. Never propagates to the caller.
pub fn decode(text: &str) -> Board {
    match try_decode(text) {
        Ok(board) => board,
        Err(e) => {
            tracing::warn!(error = %e, "stored board undecodable, starting from seed");
            Board::seed()
        }
    }
}
