use std::path::PathBuf;

use gumdrop::Options;
use hashbrown::HashSet;

use flechir::analyzer::{analyze, AnalyzerConfig, VerbAnalysis};
use flechir::corpus::{is_candidate, open_extract, verb_forms, CorpusConfig};
use flechir::types::PERSON_LABELS;

trait OutputWriter {
    fn write_analysis(&mut self, analysis: &VerbAnalysis);
    fn finish(&mut self);
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_analysis(&mut self, analysis: &VerbAnalysis) {
        match &analysis.infinitive_ipa {
            Some(ipa) => println!("{} \\{}\\\t[{}]", analysis.infinitive, ipa, analysis.marker),
            None => println!("{}\t[{}]", analysis.infinitive, analysis.marker),
        }
        for tense in &analysis.tenses {
            println!("  {}:", tense.tense.key());
            for (person, slot) in tense.slots.iter().enumerate() {
                let note = if slot.diff.score > 0 {
                    format!("  (deviation {})", slot.diff.score)
                } else {
                    String::new()
                };
                println!(
                    "    {:<11} {}{}",
                    PERSON_LABELS[person], slot.display, note
                );
            }
        }
        println!();
    }

    fn finish(&mut self) {}
}

struct JsonWriter {
    results: Vec<VerbAnalysis>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        JsonWriter { results: vec![] }
    }
}

impl OutputWriter for JsonWriter {
    fn write_analysis(&mut self, analysis: &VerbAnalysis) {
        self.results.push(analysis.clone());
    }

    fn finish(&mut self) {
        let output = serde_json::to_string_pretty(&self.results).expect("serializing results");
        println!("{}", output);
    }
}

#[derive(Debug, Options)]
struct Args {
    #[options(help = "print help message")]
    help: bool,

    #[options(command)]
    command: Option<Command>,
}

#[derive(Debug, Options)]
enum Command {
    #[options(help = "analyse verbs from a Wiktextract extract")]
    Analyse(AnalyseArgs),
}

#[derive(Debug, Options)]
struct AnalyseArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(help = "JSONL extract to read (.jsonl or .jsonl.gz)", required)]
    extract: PathBuf,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "lemmas to analyse (default: every verb in the extract)")]
    verbs: Vec<String>,
}

fn analyse(args: AnalyseArgs) -> anyhow::Result<()> {
    let corpus_config = CorpusConfig::default();
    let analyzer_config = AnalyzerConfig::default();
    let mut wanted: HashSet<String> = args.verbs.iter().cloned().collect();
    let filtering = !wanted.is_empty();

    let mut writer: Box<dyn OutputWriter> = if args.use_json {
        Box::new(JsonWriter::new())
    } else {
        Box::new(StdoutWriter)
    };

    for entry in open_extract(&args.extract)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("{}", e);
                continue;
            }
        };
        if filtering && !wanted.contains(entry.word.as_str()) {
            continue;
        }
        if !is_candidate(&entry, &corpus_config) {
            continue;
        }
        let analysis = analyze(&verb_forms(&entry), &analyzer_config);
        writer.write_analysis(&analysis);
        if filtering {
            wanted.remove(entry.word.as_str());
            if wanted.is_empty() {
                break;
            }
        }
    }

    writer.finish();
    for missing in &wanted {
        log::warn!("lemma not found in extract: {}", missing);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let args = Args::parse_args_default_or_exit();

    match args.command {
        None => Ok(()),
        Some(Command::Analyse(args)) => analyse(args),
    }
}
