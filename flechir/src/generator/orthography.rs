//! Orthographic spelling rules applied during regular-form synthesis.
//!
//! Each rule is a pure function from one candidate spelling to one or more
//! candidate spellings; rules that do not apply return their input
//! unchanged. Callers compose rules by Cartesian expansion and deduplicate
//! the result, so every rule stays independently testable.

use smol_str::SmolStr;

use crate::types::PersonIndex;

/// Present-tense persons whose ending starts with a silent "e"
/// (je, tu, il/elle/on, ils/elles). Stem alternations only fire there.
pub const SILENT_E_PERSONS: [PersonIndex; 4] = [0, 1, 2, 5];

pub(crate) fn is_silent_e_person(person: PersonIndex) -> bool {
    SILENT_E_PERSONS.contains(&person)
}

/// Softens the stem-final consonant of `-cer`/`-ger` verbs before an
/// ending opening with a/â/o: c → ç, g → ge.
///
/// Returns the unsoftened form first, then the softened variant when the
/// rule applies. Only the consonant at the stem/ending boundary is touched.
pub fn soften_c_g(form: &str, infinitive: &str, ending: &str) -> Vec<SmolStr> {
    let mut variants = vec![SmolStr::new(form)];
    if !matches!(ending.chars().next(), Some('a' | 'â' | 'o')) {
        return variants;
    }
    let chars: Vec<char> = form.chars().collect();
    let ending_len = ending.chars().count();
    if chars.len() <= ending_len {
        return variants;
    }
    let boundary = chars.len() - ending_len - 1;
    let inf = infinitive.to_lowercase();
    if inf.ends_with("cer") && chars[boundary] == 'c' {
        let mut softened = chars.clone();
        softened[boundary] = 'ç';
        variants.push(softened.into_iter().collect::<String>().into());
    } else if inf.ends_with("ger") && chars[boundary] == 'g' {
        let mut softened: String = chars[..=boundary].iter().collect();
        softened.push('e');
        softened.extend(&chars[boundary + 1..]);
        variants.push(softened.into());
    }
    variants
}

fn y_to_i(stem: &str, optional: bool) -> Vec<SmolStr> {
    let idx = match stem.rfind('y') {
        Some(idx) => idx,
        None => return vec![SmolStr::new(stem)],
    };
    let changed: SmolStr = format!("{}i{}", &stem[..idx], &stem[idx + 1..]).into();
    if optional {
        vec![SmolStr::new(stem), changed]
    } else {
        vec![changed]
    }
}

/// Stem variants for the `-yer` alternation (envoyer → envoi-).
///
/// Mandatory for `-oyer`/`-uyer` (only the i-spelling is offered), optional
/// for `-ayer` (both spellings are offered). Present tense, silent-e
/// persons only.
pub fn yer_stem_variants(stem: &str, infinitive: &str, person: PersonIndex) -> Vec<SmolStr> {
    if !is_silent_e_person(person) {
        return vec![SmolStr::new(stem)];
    }
    let inf = infinitive.to_lowercase();
    if inf.ends_with("oyer") || inf.ends_with("uyer") {
        y_to_i(stem, false)
    } else if inf.ends_with("ayer") {
        y_to_i(stem, true)
    } else {
        vec![SmolStr::new(stem)]
    }
}

/// Replaces the last occurrence of `target` in `stem` with "è".
fn grave_last(stem: &str, target: char) -> SmolStr {
    match stem.rfind(target) {
        Some(idx) => {
            format!("{}è{}", &stem[..idx], &stem[idx + target.len_utf8()..]).into()
        }
        None => SmolStr::new(stem),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opening {
    Acute,
    Plain,
}

/// Does the syllable right before the "-er" suffix carry an é (or e) with
/// no a/e/i/o/u/y between it and the suffix?
fn opening_rule(infinitive: &str) -> Option<Opening> {
    let inf = infinitive.to_lowercase();
    let stem = inf.strip_suffix("er")?;
    for c in stem.chars().rev() {
        if c == 'é' {
            return Some(Opening::Acute);
        }
        if c == 'e' {
            return Some(Opening::Plain);
        }
        if matches!(c, 'a' | 'i' | 'o' | 'u' | 'y') {
            return None;
        }
    }
    None
}

/// Stem variants for the e/é → è opening before a silent ending
/// (lever → lèv-, préférer → préfèr-). Present tense, silent-e persons
/// only; both the original and the opened spelling are offered.
pub fn opening_stem_variants(stem: &str, infinitive: &str, person: PersonIndex) -> Vec<SmolStr> {
    if !is_silent_e_person(person) {
        return vec![SmolStr::new(stem)];
    }
    match opening_rule(infinitive) {
        Some(Opening::Acute) => vec![SmolStr::new(stem), grave_last(stem, 'é')],
        Some(Opening::Plain) => vec![SmolStr::new(stem), grave_last(stem, 'e')],
        None => vec![SmolStr::new(stem)],
    }
}

/// Stem variants for `-eler`/`-eter` verbs: the è opening plus the
/// consonant-doubling spelling (appeler → appell-), and the combination of
/// both. Present tense, silent-e persons only.
pub fn doubling_stem_variants(stem: &str, infinitive: &str, person: PersonIndex) -> Vec<SmolStr> {
    if !is_silent_e_person(person) {
        return vec![SmolStr::new(stem)];
    }
    let inf = infinitive.to_lowercase();
    let (suffix, stem_end) = if inf.ends_with("eler") {
        ("l", "el")
    } else if inf.ends_with("eter") {
        ("t", "et")
    } else {
        return vec![SmolStr::new(stem)];
    };

    let mut variants = vec![SmolStr::new(stem), grave_last(stem, 'e')];
    if stem.ends_with(stem_end) {
        let doubled: SmolStr = format!("{}{}", stem, suffix).into();
        let doubled_grave = grave_last(&doubled, 'e');
        variants.push(doubled);
        variants.push(doubled_grave);
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(variants: &[SmolStr]) -> Vec<&str> {
        variants.iter().map(|v| v.as_str()).collect()
    }

    #[test]
    fn softening_at_boundary_only() {
        assert_eq!(
            strs(&soften_c_g("commencons", "commencer", "ons")),
            ["commencons", "commençons"]
        );
        assert_eq!(
            strs(&soften_c_g("mangons", "manger", "ons")),
            ["mangons", "mangeons"]
        );
        // futur: the boundary consonant is "r", nothing to soften
        assert_eq!(
            strs(&soften_c_g("commencerons", "commencer", "ons")),
            ["commencerons"]
        );
        // ending does not open with a/â/o
        assert_eq!(
            strs(&soften_c_g("commencez", "commencer", "ez")),
            ["commencez"]
        );
        assert_eq!(
            strs(&soften_c_g("commencâmes", "commencer", "âmes")),
            ["commencâmes", "commençâmes"]
        );
    }

    #[test]
    fn yer_mandatory_and_optional() {
        assert_eq!(strs(&yer_stem_variants("envoy", "envoyer", 0)), ["envoi"]);
        assert_eq!(strs(&yer_stem_variants("essuy", "essuyer", 2)), ["essui"]);
        assert_eq!(
            strs(&yer_stem_variants("pay", "payer", 0)),
            ["pay", "pai"]
        );
        // nous/vous keep the y
        assert_eq!(strs(&yer_stem_variants("envoy", "envoyer", 3)), ["envoy"]);
        assert_eq!(strs(&yer_stem_variants("aim", "aimer", 0)), ["aim"]);
    }

    #[test]
    fn opening_variants() {
        assert_eq!(
            strs(&opening_stem_variants("lev", "lever", 0)),
            ["lev", "lèv"]
        );
        assert_eq!(
            strs(&opening_stem_variants("préfér", "préférer", 2)),
            ["préfér", "préfèr"]
        );
        assert_eq!(strs(&opening_stem_variants("aim", "aimer", 0)), ["aim"]);
        assert_eq!(strs(&opening_stem_variants("lev", "lever", 3)), ["lev"]);
    }

    #[test]
    fn doubling_variants() {
        assert_eq!(
            strs(&doubling_stem_variants("appel", "appeler", 0)),
            ["appel", "appèl", "appell", "appèll"]
        );
        assert_eq!(
            strs(&doubling_stem_variants("jet", "jeter", 1)),
            ["jet", "jèt", "jett", "jètt"]
        );
        assert_eq!(strs(&doubling_stem_variants("appel", "appeler", 4)), ["appel"]);
        assert_eq!(strs(&doubling_stem_variants("aim", "aimer", 0)), ["aim"]);
    }
}
