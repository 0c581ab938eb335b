//! Parsing of Wiktextract-style JSONL verb records into analyzer input.
//!
//! The analysis core itself never does I/O; everything here is the thin
//! ingestion layer: serde records, the tag tables selecting the six
//! per-person forms of each tense, the lemma candidate filter and a line
//! reader for plain or gzip-compressed extracts.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::Deserialize;
use smol_str::SmolStr;

use crate::analyzer::VerbForms;
use crate::generator::Tense;
use crate::types::AttestedForm;

/// One lemma entry from the extract.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WordEntry {
    /// the lemma
    #[serde(default)]
    pub word: SmolStr,
    /// part of speech tag
    #[serde(default)]
    pub pos: SmolStr,
    /// language code
    #[serde(default)]
    pub lang_code: SmolStr,
    /// inflected forms
    #[serde(default)]
    pub forms: Vec<FormEntry>,
    /// pronunciation records for the lemma
    #[serde(default)]
    pub sounds: Vec<SoundEntry>,
}

/// One inflected form of a lemma.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormEntry {
    /// the form text
    #[serde(default)]
    pub form: SmolStr,
    /// grammatical tags
    #[serde(default)]
    pub tags: Vec<SmolStr>,
    /// phonetic transcriptions; the first non-empty one is used
    #[serde(default)]
    pub ipas: Vec<SmolStr>,
}

/// A pronunciation record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SoundEntry {
    /// phonetic transcription
    #[serde(default)]
    pub ipa: SmolStr,
}

/// Corpus-level filtering rules, kept as an explicit table so the policy is
/// swappable and testable in isolation.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// language code accepted for analysis
    pub lang_code: &'static str,
    /// lemmas excluded outright
    pub excluded_lemmas: &'static [&'static str],
    /// lemma prefixes marking pronominal verbs, which are excluded
    pub pronominal_prefixes: &'static [&'static str],
}

impl CorpusConfig {
    /// the default French policy
    pub const fn default() -> CorpusConfig {
        CorpusConfig {
            lang_code: "fr",
            excluded_lemmas: &[],
            pronominal_prefixes: &["se ", "s\u{2019}", "s'"],
        }
    }
}

/// Tag requirements selecting the forms of one tense.
#[derive(Debug, Clone, Copy)]
pub struct TagFilter {
    /// every one of these must be present
    pub required: &'static [&'static str],
    /// none of these may be present
    pub excluded: &'static [&'static str],
}

/// The fixed tag table for the four indicative tenses.
pub fn tense_tags(tense: Tense) -> TagFilter {
    match tense {
        Tense::Present => TagFilter {
            required: &["indicative", "present"],
            excluded: &[],
        },
        Tense::Imparfait => TagFilter {
            required: &["indicative", "imperfect"],
            excluded: &[],
        },
        Tense::PasseSimple => TagFilter {
            required: &["indicative", "past"],
            excluded: &["multiword-construction", "anterior"],
        },
        Tense::Futur => TagFilter {
            required: &["indicative", "future"],
            excluded: &[],
        },
    }
}

/// Is this entry a verb lemma we should analyze?
pub fn is_candidate(entry: &WordEntry, config: &CorpusConfig) -> bool {
    if entry.pos != "verb" || entry.lang_code != config.lang_code {
        return false;
    }
    let word = entry.word.as_str();
    if word.is_empty() || config.excluded_lemmas.contains(&word) {
        return false;
    }
    !config
        .pronominal_prefixes
        .iter()
        .any(|prefix| word.starts_with(prefix))
}

fn trim_ipa(ipa: &str) -> SmolStr {
    SmolStr::new(ipa.trim_matches(|c| matches!(c, '[' | ']' | '\\')))
}

fn attested(form: &FormEntry) -> AttestedForm {
    let ipa = form
        .ipas
        .iter()
        .find(|ipa| !ipa.is_empty())
        .map(|ipa| trim_ipa(ipa));
    AttestedForm::new(form.form.clone(), ipa)
}

fn matches_filter(form: &FormEntry, filter: TagFilter) -> bool {
    filter
        .required
        .iter()
        .all(|tag| form.tags.iter().any(|t| t == tag))
        && !filter
            .excluded
            .iter()
            .any(|tag| form.tags.iter().any(|t| t == tag))
}

/// The first six attested forms of one tense, in corpus order.
///
/// Placeholder ("-") and empty forms are dropped. Callers require exactly
/// six forms for a tense to take part in scoring.
pub fn tense_forms(entry: &WordEntry, tense: Tense) -> Vec<AttestedForm> {
    let filter = tense_tags(tense);
    entry
        .forms
        .iter()
        .filter(|form| matches_filter(form, filter))
        .filter(|form| !form.form.is_empty() && form.form != "-")
        .map(attested)
        .take(6)
        .collect()
}

fn participle(entry: &WordEntry, which: &str) -> Option<AttestedForm> {
    let required = ["participle", which];
    entry
        .forms
        .iter()
        .filter(|form| {
            required
                .iter()
                .all(|tag| form.tags.iter().any(|t| t == tag))
        })
        .find(|form| !form.form.is_empty() && form.form != "-")
        .map(attested)
}

fn lemma_ipa(entry: &WordEntry) -> Option<SmolStr> {
    let from_form = entry
        .forms
        .iter()
        .filter(|form| {
            form.form == entry.word && form.tags.iter().any(|t| t == "infinitive")
        })
        .flat_map(|form| form.ipas.iter())
        .find(|ipa| !ipa.is_empty())
        .map(|ipa| trim_ipa(ipa));
    from_form.or_else(|| {
        entry
            .sounds
            .iter()
            .find(|sound| !sound.ipa.trim().is_empty())
            .map(|sound| trim_ipa(sound.ipa.trim()))
    })
}

/// Assembles the analyzer input for one lemma entry.
pub fn verb_forms(entry: &WordEntry) -> VerbForms {
    VerbForms {
        infinitive: entry.word.clone(),
        infinitive_ipa: lemma_ipa(entry),
        present: tense_forms(entry, Tense::Present),
        imparfait: tense_forms(entry, Tense::Imparfait),
        passe_simple: tense_forms(entry, Tense::PasseSimple),
        futur: tense_forms(entry, Tense::Futur),
        present_participle: participle(entry, "present"),
        past_participle: participle(entry, "past"),
    }
}

/// Extracts the ending part of a form's transcription, handling liaison
/// marks and the two-word "pronoun form" layout. Meant for renderers that
/// show only the ending's pronunciation next to each form.
pub fn ipa_ending(ipa: &str) -> SmolStr {
    let ipa = ipa.trim_end_matches(']');
    if let Some((_, rest)) = ipa.split_once(' ') {
        return SmolStr::new(rest);
    }
    if let Some(at) = ipa.find('\u{203f}') {
        return SmolStr::new(&ipa[at..]);
    }
    let chars: Vec<char> = ipa.chars().collect();
    if chars.len() > 2 {
        chars[chars.len() - 2..].iter().collect::<String>().into()
    } else {
        SmolStr::new(ipa)
    }
}

/// Errors from reading a corpus extract.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// file could not be opened or read
    #[error("failed to read corpus: {0}")]
    Io(#[from] std::io::Error),
    /// one line did not parse as a lemma record
    #[error("malformed corpus line {line}: {source}")]
    Json {
        /// 1-based line number in the extract
        line: usize,
        /// the underlying parse error
        source: serde_json::Error,
    },
}

/// Streaming reader over the lemma entries of a JSONL extract.
pub struct ExtractReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> ExtractReader<R> {
    /// wraps any buffered reader producing JSONL
    pub fn new(reader: R) -> ExtractReader<R> {
        ExtractReader {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for ExtractReader<R> {
    type Item = Result<WordEntry, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(CorpusError::Io(e))),
            };
            self.line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Some(
                serde_json::from_str(trimmed).map_err(|source| CorpusError::Json {
                    line: self.line_no,
                    source,
                }),
            );
        }
    }
}

/// Opens a `.jsonl` or `.jsonl.gz` extract for streaming.
pub fn open_extract(path: &Path) -> Result<ExtractReader<Box<dyn BufRead>>, CorpusError> {
    let file = File::open(path)?;
    let reader: Box<dyn BufRead> = if path.extension().map_or(false, |ext| ext == "gz") {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(ExtractReader::new(reader))
}
