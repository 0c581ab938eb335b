//! Per-character color decomposition of a displayed form.
//!
//! Characters belonging to the verb's stem or to the prefix shared by the
//! related forms are rendered "black"; the rest take the tense color,
//! except characters the scorer flagged as deviations, which take the
//! highlight class. The output is a run-length compressed sequence that
//! partitions the form exactly.

use serde::Serialize;
use smol_str::SmolStr;

/// Rendering class of one character run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorClass {
    /// part of the verb's stem (black)
    StemBlack,
    /// part of the prefix shared across related forms (black)
    PrefixBlack,
    /// regular ending material, rendered in the tense color
    TenseColor,
    /// deviation from every regular spelling
    IrregularHighlight,
}

/// A maximal run of consecutive characters sharing one color class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorRun {
    /// the color class of every character in the run
    pub class: ColorClass,
    /// the characters themselves
    pub text: SmolStr,
}

fn ci_eq(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Longest case-insensitive common prefix of a set of related forms
/// (e.g. the six persons of one tense). Empty input yields "".
pub fn shared_prefix<'a, I>(forms: I) -> SmolStr
where
    I: IntoIterator<Item = &'a str>,
{
    let mut forms = forms.into_iter();
    let first = match forms.next() {
        Some(first) => first,
        None => return SmolStr::new(""),
    };
    let mut prefix: Vec<char> = first.chars().collect();
    for form in forms {
        let mut keep = 0;
        for (a, b) in prefix.iter().zip(form.chars()) {
            if !ci_eq(*a, b) {
                break;
            }
            keep += 1;
        }
        prefix.truncate(keep);
        if prefix.is_empty() {
            break;
        }
    }
    prefix.into_iter().collect::<String>().into()
}

/// Marks the first case-insensitive occurrence of each stem character, in
/// order, scanning left to right.
///
/// The scan stops at the first stem character that cannot be found past
/// the previous match. This is a strict prefix-style greedy match, not a
/// subsequence search; replacing it with an LCS-style match changes the
/// black-highlighting output.
pub fn stem_black_mask(form: &str, stem: &str) -> Vec<bool> {
    let chars: Vec<char> = form.chars().collect();
    let mut mask = vec![false; chars.len()];
    let mut next = 0;
    for stem_char in stem.chars() {
        match chars[next..].iter().position(|&c| ci_eq(c, stem_char)) {
            Some(offset) => {
                let at = next + offset;
                mask[at] = true;
                next = at + 1;
            }
            None => break,
        }
    }
    mask
}

/// Marks positions where the form case-insensitively matches the shared
/// prefix, stopping at the first mismatch.
pub fn prefix_black_mask(form: &str, prefix: &str) -> Vec<bool> {
    let chars: Vec<char> = form.chars().collect();
    let mut mask = vec![false; chars.len()];
    for (i, (a, b)) in chars.iter().zip(prefix.chars()).enumerate() {
        if !ci_eq(*a, b) {
            break;
        }
        mask[i] = true;
    }
    mask
}

/// Composes the final color-run sequence for one form.
///
/// Black union: stem mask OR prefix mask (stem wins where both apply).
/// Every non-black character takes [`ColorClass::IrregularHighlight`] when
/// the deviation mask flags it, [`ColorClass::TenseColor`] otherwise. The
/// returned runs partition the form: no gaps, no overlaps, no two adjacent
/// runs of the same class.
pub fn compose(
    form: &str,
    prefix: &str,
    stem: &str,
    deviation_mask: Option<&[bool]>,
) -> Vec<ColorRun> {
    let stem_mask = stem_black_mask(form, stem);
    let prefix_mask = prefix_black_mask(form, prefix);

    let mut runs: Vec<(ColorClass, String)> = Vec::new();
    for (i, c) in form.chars().enumerate() {
        let class = if stem_mask[i] {
            ColorClass::StemBlack
        } else if prefix_mask[i] {
            ColorClass::PrefixBlack
        } else if deviation_mask.map_or(false, |mask| mask.get(i).copied().unwrap_or(false)) {
            ColorClass::IrregularHighlight
        } else {
            ColorClass::TenseColor
        };
        match runs.last_mut() {
            Some((last, text)) if *last == class => text.push(c),
            _ => runs.push((class, c.to_string())),
        }
    }
    runs.into_iter()
        .map(|(class, text)| ColorRun {
            class,
            text: text.into(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_chars(runs: &[ColorRun]) -> usize {
        runs.iter().map(|r| r.text.chars().count()).sum()
    }

    #[test]
    fn shared_prefix_basic() {
        assert_eq!(shared_prefix(["aimons", "aimez", "aiment"]), "aim");
        assert_eq!(shared_prefix(["suis", "sommes", "sont"]), "s");
        assert_eq!(shared_prefix(["suis", "es"]), "");
        let empty: [&str; 0] = [];
        assert_eq!(shared_prefix(empty), "");
        assert_eq!(shared_prefix(["Aime", "aimes"]), "Aim");
    }

    #[test]
    fn stem_mask_stops_on_miss() {
        // stem "êt" against "sommes": no "ê" anywhere, nothing marked
        assert!(stem_black_mask("sommes", "êt").iter().all(|&flag| !flag));
        // stem "aim" against "aimons": first three positions
        assert_eq!(
            stem_black_mask("aimons", "aim"),
            [true, true, true, false, false, false]
        );
        // "vnd" in "vendons": v, then n and d found after it
        assert_eq!(
            stem_black_mask("vendons", "vnd"),
            [true, false, true, true, false, false, false]
        );
        // miss in the middle stops the scan; later stem chars are not sought
        assert_eq!(
            stem_black_mask("vendons", "vxd"),
            [true, false, false, false, false, false, false]
        );
    }

    #[test]
    fn prefix_mask_stops_at_mismatch() {
        assert_eq!(
            prefix_black_mask("aimons", "aim"),
            [true, true, true, false, false, false]
        );
        assert_eq!(
            prefix_black_mask("est", "es"),
            [true, true, false]
        );
        assert_eq!(prefix_black_mask("va", "ir"), [false, false]);
    }

    #[test]
    fn runs_partition_the_form() {
        let mask = vec![false, false, false, true, false, false];
        let runs = compose("aimons", "ai", "aim", Some(&mask));
        assert_eq!(run_chars(&runs), 6);
        for pair in runs.windows(2) {
            assert_ne!(pair[0].class, pair[1].class);
        }
        let text: String = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(text, "aimons");
    }

    #[test]
    fn deviation_positions_get_highlight() {
        let mask = vec![false, false, false, false, true];
        let runs = compose("aimez", "", "aim", Some(&mask));
        assert_eq!(runs.last().unwrap().class, ColorClass::IrregularHighlight);
        assert_eq!(runs.last().unwrap().text, "z");
    }

    #[test]
    fn black_union_prefers_stem() {
        let runs = compose("aime", "aime", "aime", None);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].class, ColorClass::StemBlack);
    }

    #[test]
    fn empty_form_yields_no_runs() {
        assert!(compose("", "a", "b", None).is_empty());
    }
}
