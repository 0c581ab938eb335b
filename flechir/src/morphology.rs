//! Verb group classification and stem derivation.

use smol_str::SmolStr;

use crate::types::AttestedForm;

/// Morphological class of a French verb, decided by its infinitive suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// first group, infinitive in -er
    Er,
    /// second group, infinitive in -ir
    Ir,
    /// third group, infinitive in -re
    Re,
    /// anything else; no regular ending tables apply
    Other,
}

impl Group {
    /// Classifies an infinitive by suffix match.
    pub fn of(infinitive: &str) -> Group {
        if infinitive.ends_with("er") {
            Group::Er
        } else if infinitive.ends_with("ir") {
            Group::Ir
        } else if infinitive.ends_with("re") {
            Group::Re
        } else {
            Group::Other
        }
    }
}

/// Lexical stem: the infinitive minus its 2-character group suffix.
/// `Other`-group verbs keep the full infinitive.
pub fn lexical_stem(infinitive: &str) -> &str {
    match Group::of(infinitive) {
        Group::Er | Group::Ir | Group::Re => &infinitive[..infinitive.len() - 2],
        Group::Other => infinitive,
    }
}

/// Rules for removing the leading subject token from an attested form.
///
/// A named table rather than inline literals so the rule set can be swapped
/// and tested in isolation.
#[derive(Debug, Clone)]
pub struct SubjectRules {
    /// elided subject prefixes removed before the whitespace split
    pub elision_prefixes: &'static [&'static str],
}

impl SubjectRules {
    /// the default French rule set (elided "je" in both apostrophe forms)
    pub const fn default() -> SubjectRules {
        SubjectRules {
            elision_prefixes: &["j\u{2019}", "j'", "J\u{2019}", "J'"],
        }
    }
}

/// Removes a leading subject-pronoun token from a form.
///
/// Elided prefixes are stripped first ("j’aime" → "aime"); after that,
/// anything up to and including the first space is dropped
/// ("il/elle/on aime" → "aime"). Forms without a subject pass through.
pub fn strip_subject(text: &str, rules: &SubjectRules) -> SmolStr {
    let mut text = text;
    for prefix in rules.elision_prefixes {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest;
            break;
        }
    }
    match text.split_once(' ') {
        Some((_, rest)) => SmolStr::new(rest),
        None => SmolStr::new(text),
    }
}

/// Stems derived from a verb's attested present-tense forms.
///
/// Both fields may be absent; consumers fall back to the infinitive-derived
/// lexical stem.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Stems {
    /// the attested 4th (nous) present form, subject stripped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub present_nous: Option<SmolStr>,
    /// nous-stem minus its "-ons" suffix, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imparfait: Option<SmolStr>,
}

impl Stems {
    /// Derives stems from attested present forms.
    ///
    /// Needs at least 4 forms (up to the nous slot); anything less yields
    /// empty stems.
    pub fn derive(present_forms: &[AttestedForm], rules: &SubjectRules) -> Stems {
        if present_forms.len() < 4 {
            return Stems::default();
        }
        let nous = strip_subject(&present_forms[3].text, rules);
        let imparfait = nous.strip_suffix("ons").map(SmolStr::new);
        Stems {
            present_nous: Some(nous),
            imparfait,
        }
    }
}
