//! Shared value types used across the analysis pipeline.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Deviation score: number of characters touched by edit operations.
pub type Score = u32;

/// Grammatical person index, 0..5 in the fixed order of [`PERSON_LABELS`].
pub type PersonIndex = usize;

/// Subject labels in person-index order.
pub const PERSON_LABELS: [&str; 6] = ["je", "tu", "il/elle/on", "nous", "vous", "ils/elles"];

/// One conjugated form as attested in the source corpus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestedForm {
    /// the form text, verbatim (may include a subject pronoun)
    pub text: SmolStr,
    /// phonetic transcription, if the corpus carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipa: Option<SmolStr>,
}

impl AttestedForm {
    /// creates an attested form record
    pub fn new(text: impl Into<SmolStr>, ipa: Option<SmolStr>) -> AttestedForm {
        AttestedForm {
            text: text.into(),
            ipa,
        }
    }
}
