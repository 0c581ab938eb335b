/*! Rule-based analysis of French verb conjugation.

Given a verb's attested inflected forms, the engine derives the verb's
morphological group and stems, synthesizes the orthographically regular
spellings expected for each slot of the four indicative tenses, scores how
far each attested form deviates from the closest regular spelling, rates
the verb's overall irregularity and produces per-character color runs for
rendering.

The core is pure and stateless: one verb per call, no I/O, no shared
state, so callers may analyze verbs in parallel freely. The [`corpus`]
module is the thin ingestion layer turning Wiktextract-style JSONL records
into analyzer input.

```
use flechir::analyzer::{analyze, AnalyzerConfig, VerbForms};
use flechir::types::AttestedForm;

let verb = VerbForms {
    infinitive: "aimer".into(),
    present: vec![
        AttestedForm::new("j’aime", None),
        AttestedForm::new("tu aimes", None),
        AttestedForm::new("il/elle/on aime", None),
        AttestedForm::new("nous aimons", None),
        AttestedForm::new("vous aimez", None),
        AttestedForm::new("ils/elles aiment", None),
    ],
    ..VerbForms::default()
};
let analysis = analyze(&verb, &AnalyzerConfig::default());
assert_eq!(analysis.marker.to_string(), "regular");
```
*/

#![warn(missing_docs)]

pub mod analyzer;
pub mod corpus;
pub mod generator;
pub mod highlight;
pub mod morphology;
pub mod scorer;
pub mod types;
