//! Synthesis of the orthographically regular spellings expected for a
//! (verb, tense, person) slot.

use itertools::Itertools;
use smol_str::SmolStr;

use crate::morphology::{lexical_stem, Group, Stems};
use crate::types::PersonIndex;

pub mod orthography;

use orthography::{
    doubling_stem_variants, opening_stem_variants, soften_c_g, yer_stem_variants,
};

/// The four indicative tenses modeled by the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tense {
    /// présent
    Present,
    /// imparfait
    Imparfait,
    /// passé simple
    PasseSimple,
    /// futur simple
    Futur,
}

impl Tense {
    /// All tenses, in scoring order.
    pub const ALL: [Tense; 4] = [
        Tense::Present,
        Tense::Imparfait,
        Tense::PasseSimple,
        Tense::Futur,
    ];

    /// Stable key for output formats.
    pub fn key(self) -> &'static str {
        match self {
            Tense::Present => "present",
            Tense::Imparfait => "imparfait",
            Tense::PasseSimple => "passe_simple",
            Tense::Futur => "futur",
        }
    }
}

const PRESENT_ER: [&str; 6] = ["e", "es", "e", "ons", "ez", "ent"];
const PRESENT_IR: [&str; 6] = ["is", "is", "it", "issons", "issez", "issent"];
const PRESENT_RE: [&str; 6] = ["s", "s", "", "ons", "ez", "ent"];
const IMPARFAIT: [&str; 6] = ["ais", "ais", "ait", "ions", "iez", "aient"];
const FUTUR: [&str; 6] = ["ai", "as", "a", "ons", "ez", "ont"];
const PASSE_SIMPLE_ER: [&str; 6] = ["ai", "as", "a", "âmes", "âtes", "èrent"];
const PASSE_SIMPLE_IR_RE: [&str; 6] = ["is", "is", "it", "îmes", "îtes", "irent"];

/// The regular ending for a group/tense/person slot, or "" when no table
/// entry exists (`Other` group, or the endingless re-group 3rd person).
pub fn regular_ending(group: Group, tense: Tense, person: PersonIndex) -> &'static str {
    match (tense, group) {
        (Tense::Present, Group::Er) => PRESENT_ER[person],
        (Tense::Present, Group::Ir) => PRESENT_IR[person],
        (Tense::Present, Group::Re) => PRESENT_RE[person],
        (Tense::Imparfait, Group::Er | Group::Ir | Group::Re) => IMPARFAIT[person],
        (Tense::Futur, Group::Er | Group::Ir | Group::Re) => FUTUR[person],
        (Tense::PasseSimple, Group::Er) => PASSE_SIMPLE_ER[person],
        (Tense::PasseSimple, Group::Ir | Group::Re) => PASSE_SIMPLE_IR_RE[person],
        (_, Group::Other) => "",
    }
}

/// The canonical regular form for a slot, before orthographic variant
/// expansion. `None` for `Other`-group verbs.
pub fn base_form(
    infinitive: &str,
    tense: Tense,
    person: PersonIndex,
    stems: &Stems,
) -> Option<SmolStr> {
    let group = Group::of(infinitive);
    if group == Group::Other {
        return None;
    }
    let stem = lexical_stem(infinitive);
    let ending = regular_ending(group, tense, person);
    let base = match tense {
        Tense::Present | Tense::PasseSimple => format!("{}{}", stem, ending),
        Tense::Imparfait => match &stems.imparfait {
            Some(imparfait_stem) => format!("{}{}", imparfait_stem, ending),
            None if group == Group::Ir => format!("{}iss{}", stem, ending),
            None => format!("{}{}", stem, ending),
        },
        Tense::Futur => {
            let base = match group {
                Group::Re => &infinitive[..infinitive.len() - 1],
                _ => infinitive,
            };
            format!("{}{}", base, ending)
        }
    };
    Some(base.into())
}

/// The set of acceptable regular spellings for a slot, deduplicated in a
/// fixed, deterministic order.
///
/// Covers the common orthographic rules (c/g softening, y→i, e/é→è,
/// -eler/-eter doubling) so that those spellings are not treated as
/// deviations. `Other`-group verbs yield no variants at all.
pub fn expected_variants(
    infinitive: &str,
    tense: Tense,
    person: PersonIndex,
    stems: &Stems,
) -> Vec<SmolStr> {
    let group = Group::of(infinitive);
    let base = match base_form(infinitive, tense, person, stems) {
        Some(base) => base,
        None => return vec![],
    };
    let ending = regular_ending(group, tense, person);

    let variants: Vec<SmolStr> = match tense {
        Tense::Present => {
            // Stem alternations expand first so that a mandatory rule
            // (envoyer → envoie) replaces the unmutated spelling instead
            // of merely adding to it.
            let stem = lexical_stem(infinitive);
            yer_stem_variants(stem, infinitive, person)
                .into_iter()
                .flat_map(|st| opening_stem_variants(&st, infinitive, person))
                .flat_map(|st| doubling_stem_variants(&st, infinitive, person))
                .map(|st| SmolStr::from(format!("{}{}", st, ending)))
                .flat_map(|form| soften_c_g(&form, infinitive, ending))
                .collect()
        }
        _ => soften_c_g(&base, infinitive, ending),
    };

    variants
        .into_iter()
        .filter(|v| !v.is_empty())
        .unique()
        .collect()
}
