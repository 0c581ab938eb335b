//! Per-verb analysis pipeline: scoring every attested slot against the
//! regular model and aggregating the deviations into one irregularity
//! rating, plus highlight runs for every displayed form.

use serde::Serialize;
use smol_str::SmolStr;
use unic_ucd_category::GeneralCategory;

use crate::generator::{expected_variants, regular_ending, Tense};
use crate::highlight::{compose, shared_prefix, ColorRun};
use crate::morphology::{lexical_stem, strip_subject, Group, Stems, SubjectRules};
use crate::scorer::{best_variant, DiffResult};
use crate::types::{AttestedForm, Score};

/// Ordinal irregularity rating for a whole verb.
///
/// Note the known oddity in the ordering: `Low` (stem-changing, low overall
/// ratio) is arguably more irregular than `Medium` (ending-only deviation)
/// linguistically, but the decision table is preserved as-is because
/// display markers depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IrregularityMarker {
    /// every compared form matches a regular spelling (or nothing was
    /// comparable at all)
    Regular,
    /// endings deviate but the stem is mostly stable
    Medium,
    /// at least one deviation reaches into the stem
    Low,
    /// many stem mismatches, or a high overall deviation ratio
    High,
}

impl std::fmt::Display for IrregularityMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            IrregularityMarker::Regular => "regular",
            IrregularityMarker::Medium => "medium",
            IrregularityMarker::Low => "low",
            IrregularityMarker::High => "high",
        };
        f.write_str(s)
    }
}

/// Threshold constants for the irregularity decision table.
///
/// These are curated policy values, not fitted parameters; changing them is
/// a versioned policy change and breaks output parity with prior runs.
#[derive(Debug, Clone, Serialize)]
pub struct IrregularityThresholds {
    /// deviation-ratio at or above which a verb rates `High`
    pub high_ratio: f64,
    /// stem-mismatch form count at or above which a verb rates `High`
    pub high_stem_mismatches: usize,
    /// stem-mismatch form count at or above which a verb rates `Low`
    pub low_stem_mismatches: usize,
}

impl IrregularityThresholds {
    /// the reference decision table
    pub const fn default() -> IrregularityThresholds {
        IrregularityThresholds {
            high_ratio: 0.18,
            high_stem_mismatches: 6,
            low_stem_mismatches: 1,
        }
    }
}

/// Configuration for the analysis pipeline.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// irregularity decision table
    pub thresholds: IrregularityThresholds,
    /// subject-token stripping rules
    pub subject_rules: SubjectRules,
}

impl AnalyzerConfig {
    /// the reference configuration
    pub const fn default() -> AnalyzerConfig {
        AnalyzerConfig {
            thresholds: IrregularityThresholds::default(),
            subject_rules: SubjectRules::default(),
        }
    }
}

/// Attested input for one verb: the lemma plus whatever indicative forms
/// the corpus carries. Tenses with fewer than 6 forms are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerbForms {
    /// the infinitive (lemma)
    pub infinitive: SmolStr,
    /// phonetic transcription of the lemma, if any
    pub infinitive_ipa: Option<SmolStr>,
    /// présent forms in person order
    pub present: Vec<AttestedForm>,
    /// imparfait forms in person order
    pub imparfait: Vec<AttestedForm>,
    /// passé simple forms in person order
    pub passe_simple: Vec<AttestedForm>,
    /// futur simple forms in person order
    pub futur: Vec<AttestedForm>,
    /// participe présent
    pub present_participle: Option<AttestedForm>,
    /// participe passé
    pub past_participle: Option<AttestedForm>,
}

impl VerbForms {
    /// the attested forms for one tense
    pub fn tense(&self, tense: Tense) -> &[AttestedForm] {
        match tense {
            Tense::Present => &self.present,
            Tense::Imparfait => &self.imparfait,
            Tense::PasseSimple => &self.passe_simple,
            Tense::Futur => &self.futur,
        }
    }
}

/// One scored and highlighted conjugation slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotAnalysis {
    /// the corpus record for this slot
    pub attested: AttestedForm,
    /// the displayed form: attested text with the subject token stripped
    pub display: SmolStr,
    /// deviation from the closest regular spelling
    pub diff: DiffResult,
    /// color decomposition of the displayed form
    pub runs: Vec<ColorRun>,
}

/// Analysis of one complete (6-form) tense.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenseAnalysis {
    /// which tense
    pub tense: Tense,
    /// the six person slots, in person order
    pub slots: Vec<SlotAnalysis>,
}

/// A highlighted participle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipleSlot {
    /// the corpus record
    pub attested: AttestedForm,
    /// color decomposition (no deviation scoring for participles)
    pub runs: Vec<ColorRun>,
}

/// Highlighting for a verb's two participles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipleAnalysis {
    /// participe présent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub present: Option<ParticipleSlot>,
    /// participe passé
    #[serde(skip_serializing_if = "Option::is_none")]
    pub past: Option<ParticipleSlot>,
}

/// The full analysis result for one verb.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerbAnalysis {
    /// the infinitive
    pub infinitive: SmolStr,
    /// phonetic transcription of the lemma, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infinitive_ipa: Option<SmolStr>,
    /// morphological group
    pub group: Group,
    /// stems derived from the attested present forms
    pub stems: Stems,
    /// aggregated irregularity rating
    pub marker: IrregularityMarker,
    /// per-tense slot analyses (complete tenses only)
    pub tenses: Vec<TenseAnalysis>,
    /// participle highlighting, when the corpus carries participles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participles: Option<ParticipleAnalysis>,
}

fn has_letter(text: &str) -> bool {
    text.chars().any(|c| GeneralCategory::of(c).is_letter())
}

fn classify(
    compared: usize,
    total_score: Score,
    total_chars: usize,
    stem_mismatch_forms: usize,
    thresholds: &IrregularityThresholds,
) -> IrregularityMarker {
    if compared == 0 || total_score == 0 {
        return IrregularityMarker::Regular;
    }
    let ratio = f64::from(total_score) / total_chars.max(1) as f64;
    if stem_mismatch_forms >= thresholds.high_stem_mismatches || ratio >= thresholds.high_ratio {
        IrregularityMarker::High
    } else if stem_mismatch_forms >= thresholds.low_stem_mismatches {
        IrregularityMarker::Low
    } else {
        IrregularityMarker::Medium
    }
}

fn participle_analysis(verb: &VerbForms, stem: &str) -> Option<ParticipleAnalysis> {
    if verb.present_participle.is_none() && verb.past_participle.is_none() {
        return None;
    }
    let texts: Vec<&str> = [&verb.present_participle, &verb.past_participle]
        .into_iter()
        .flatten()
        .map(|form| form.text.as_str())
        .collect();
    let prefix = shared_prefix(texts);
    let slot = |form: &Option<AttestedForm>| {
        form.as_ref().map(|attested| ParticipleSlot {
            attested: attested.clone(),
            runs: compose(&attested.text, &prefix, stem, None),
        })
    };
    Some(ParticipleAnalysis {
        present: slot(&verb.present_participle),
        past: slot(&verb.past_participle),
    })
}

/// Runs the whole pipeline for one verb.
///
/// Pure and deterministic: identical input yields identical output, and no
/// state is shared between invocations, so callers may analyze verbs in
/// parallel freely. Malformed input never fails; incomparable slots are
/// skipped without penalty.
pub fn analyze(verb: &VerbForms, config: &AnalyzerConfig) -> VerbAnalysis {
    let infinitive = verb.infinitive.as_str();
    let group = Group::of(infinitive);
    let stems = Stems::derive(&verb.present, &config.subject_rules);
    let stem = lexical_stem(infinitive);

    let mut total_score: Score = 0;
    let mut total_chars = 0;
    let mut stem_mismatch_forms = 0;
    let mut compared = 0;
    let mut tenses = Vec::new();

    for tense in Tense::ALL {
        let forms = verb.tense(tense);
        if forms.len() < 6 {
            log::trace!("{}: skipping incomplete {}", infinitive, tense.key());
            continue;
        }
        let displays: Vec<SmolStr> = forms[..6]
            .iter()
            .map(|form| strip_subject(&form.text, &config.subject_rules))
            .collect();
        let prefix = shared_prefix(displays.iter().map(|d| d.as_str()));

        let mut slots = Vec::with_capacity(6);
        for (person, display) in displays.iter().enumerate() {
            let variants = expected_variants(infinitive, tense, person, &stems);
            let ending = regular_ending(group, tense, person);
            let comparable =
                !display.is_empty() && has_letter(display) && !variants.is_empty();
            let diff = if comparable {
                best_variant(display, &variants, ending)
            } else {
                DiffResult::neutral(display.chars().count())
            };
            if comparable {
                compared += 1;
                total_score += diff.score;
                total_chars += display.chars().count().max(1);
                if diff.score > 0 && diff.stem_mismatch {
                    stem_mismatch_forms += 1;
                }
            }
            let runs = compose(display, &prefix, stem, Some(&diff.mask));
            slots.push(SlotAnalysis {
                attested: forms[person].clone(),
                display: display.clone(),
                diff,
                runs,
            });
        }
        tenses.push(TenseAnalysis { tense, slots });
    }

    let marker = classify(
        compared,
        total_score,
        total_chars,
        stem_mismatch_forms,
        &config.thresholds,
    );
    log::debug!(
        "{}: {} compared, score {}, {} stem mismatches => {}",
        infinitive,
        compared,
        total_score,
        stem_mismatch_forms,
        marker
    );

    VerbAnalysis {
        infinitive: verb.infinitive.clone(),
        infinitive_ipa: verb.infinitive_ipa.clone(),
        group,
        stems,
        marker,
        tenses,
        participles: participle_analysis(verb, stem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forms(texts: &[&str]) -> Vec<AttestedForm> {
        texts.iter().map(|t| AttestedForm::new(*t, None)).collect()
    }

    fn aimer() -> VerbForms {
        VerbForms {
            infinitive: "aimer".into(),
            present: forms(&[
                "j\u{2019}aime",
                "tu aimes",
                "il/elle/on aime",
                "nous aimons",
                "vous aimez",
                "ils/elles aiment",
            ]),
            imparfait: forms(&[
                "j\u{2019}aimais",
                "tu aimais",
                "il/elle/on aimait",
                "nous aimions",
                "vous aimiez",
                "ils/elles aimaient",
            ]),
            passe_simple: forms(&[
                "j\u{2019}aimai",
                "tu aimas",
                "il/elle/on aima",
                "nous aimâmes",
                "vous aimâtes",
                "ils/elles aimèrent",
            ]),
            futur: forms(&[
                "j\u{2019}aimerai",
                "tu aimeras",
                "il/elle/on aimera",
                "nous aimerons",
                "vous aimerez",
                "ils/elles aimeront",
            ]),
            ..VerbForms::default()
        }
    }

    fn etre() -> VerbForms {
        VerbForms {
            infinitive: "être".into(),
            present: forms(&[
                "je suis",
                "tu es",
                "il/elle/on est",
                "nous sommes",
                "vous êtes",
                "ils/elles sont",
            ]),
            imparfait: forms(&[
                "j\u{2019}étais",
                "tu étais",
                "il/elle/on était",
                "nous étions",
                "vous étiez",
                "ils/elles étaient",
            ]),
            passe_simple: forms(&[
                "je fus",
                "tu fus",
                "il/elle/on fut",
                "nous fûmes",
                "vous fûtes",
                "ils/elles furent",
            ]),
            futur: forms(&[
                "je serai",
                "tu seras",
                "il/elle/on sera",
                "nous serons",
                "vous serez",
                "ils/elles seront",
            ]),
            ..VerbForms::default()
        }
    }

    #[test]
    fn regular_er_verb() {
        let analysis = analyze(&aimer(), &AnalyzerConfig::default());
        assert_eq!(analysis.marker, IrregularityMarker::Regular);
        assert_eq!(analysis.group, Group::Er);
        assert_eq!(analysis.tenses.len(), 4);
        for tense in &analysis.tenses {
            for slot in &tense.slots {
                assert!(slot.diff.is_exact());
            }
        }
    }

    #[test]
    fn highly_irregular_verb() {
        let analysis = analyze(&etre(), &AnalyzerConfig::default());
        assert_eq!(analysis.marker, IrregularityMarker::High);
    }

    #[test]
    fn spelling_rule_verbs_stay_regular() {
        let mut verb = VerbForms {
            infinitive: "commencer".into(),
            present: forms(&[
                "je commence",
                "tu commences",
                "il/elle/on commence",
                "nous commençons",
                "vous commencez",
                "ils/elles commencent",
            ]),
            ..VerbForms::default()
        };
        let analysis = analyze(&verb, &AnalyzerConfig::default());
        assert_eq!(analysis.marker, IrregularityMarker::Regular);

        verb.infinitive = "appeler".into();
        verb.present = forms(&[
            "j\u{2019}appelle",
            "tu appelles",
            "il/elle/on appelle",
            "nous appelons",
            "vous appelez",
            "ils/elles appellent",
        ]);
        let analysis = analyze(&verb, &AnalyzerConfig::default());
        assert_eq!(analysis.marker, IrregularityMarker::Regular);
    }

    #[test]
    fn envoyer_mandatory_alternation() {
        let verb = VerbForms {
            infinitive: "envoyer".into(),
            present: forms(&[
                "j\u{2019}envoie",
                "tu envoies",
                "il/elle/on envoie",
                "nous envoyons",
                "vous envoyez",
                "ils/elles envoient",
            ]),
            ..VerbForms::default()
        };
        let analysis = analyze(&verb, &AnalyzerConfig::default());
        assert_eq!(analysis.marker, IrregularityMarker::Regular);

        // the unmutated spelling is not an accepted variant
        let verb = VerbForms {
            present: forms(&[
                "j\u{2019}envoye",
                "tu envoies",
                "il/elle/on envoie",
                "nous envoyons",
                "vous envoyez",
                "ils/elles envoient",
            ]),
            ..verb
        };
        let analysis = analyze(&verb, &AnalyzerConfig::default());
        assert!(analysis.tenses[0].slots[0].diff.score > 0);
    }

    #[test]
    fn incomplete_tense_is_skipped() {
        let verb = VerbForms {
            infinitive: "aimer".into(),
            present: forms(&["j\u{2019}aime", "tu aimes"]),
            ..VerbForms::default()
        };
        let analysis = analyze(&verb, &AnalyzerConfig::default());
        assert!(analysis.tenses.is_empty());
        assert_eq!(analysis.marker, IrregularityMarker::Regular);
    }

    #[test]
    fn other_group_without_evidence_is_regular() {
        let verb = VerbForms {
            infinitive: "xyz".into(),
            present: forms(&["a", "b", "c", "d", "e", "f"]),
            ..VerbForms::default()
        };
        let analysis = analyze(&verb, &AnalyzerConfig::default());
        assert_eq!(analysis.marker, IrregularityMarker::Regular);
        assert_eq!(analysis.group, Group::Other);
    }

    #[test]
    fn pipeline_is_deterministic() {
        let config = AnalyzerConfig::default();
        let first = analyze(&etre(), &config);
        let second = analyze(&etre(), &config);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn runs_partition_every_display_form() {
        for verb in [aimer(), etre()] {
            let analysis = analyze(&verb, &AnalyzerConfig::default());
            for tense in &analysis.tenses {
                for slot in &tense.slots {
                    let total: usize =
                        slot.runs.iter().map(|r| r.text.chars().count()).sum();
                    assert_eq!(total, slot.display.chars().count());
                    for pair in slot.runs.windows(2) {
                        assert_ne!(pair[0].class, pair[1].class);
                    }
                }
            }
        }
    }

    #[test]
    fn participles_are_highlighted() {
        let verb = VerbForms {
            infinitive: "aimer".into(),
            present_participle: Some(AttestedForm::new("aimant", None)),
            past_participle: Some(AttestedForm::new("aimé", None)),
            ..VerbForms::default()
        };
        let analysis = analyze(&verb, &AnalyzerConfig::default());
        let participles = analysis.participles.expect("participles");
        let present = participles.present.expect("present participle");
        let total: usize = present.runs.iter().map(|r| r.text.chars().count()).sum();
        assert_eq!(total, 6);
    }
}
