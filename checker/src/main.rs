//! RefCo CLI - check corpus documentation against an ELAN corpus
//!
//! # Commands
//!
//! ```bash
//! refco check doc.ods --corpus corpus/     # Full compliance check
//! refco check doc.ods --format json        # Findings as JSON
//! refco criteria doc.ods                   # Dump the parsed documentation
//! refco segment "Ga=vu" -c Ga -c = -c v -c u
//! ```
//!
//! Options are read from `REFCO_*` environment variables (a `.env` file is
//! loaded first) or from `--config`; flags on the command line win.

use clap::{Parser, Subcommand, ValueEnum};
use refco::logs::LOG_BROADCASTER;
use refco::{
    check_corpus, load_spreadsheet, read_criteria, CheckOptions, ComplianceReport, DictionarySegmenter,
    CHECKER_VERSION,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "refco")]
#[command(version, about = "Check RefCo corpus documentation against an ELAN corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a documentation spreadsheet against its corpus
    Check {
        /// Corpus documentation (.ods or .fods)
        spreadsheet: PathBuf,

        /// Corpus directory (default: directory of the spreadsheet)
        #[arg(short, long)]
        corpus: Option<PathBuf>,

        /// JSON options file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Tab separated ISO-639-3 code table
        #[arg(long)]
        iso_codes: Option<PathBuf>,

        /// Do not look up URLs and Glottocodes
        #[arg(long)]
        offline: bool,

        /// Skip the documentation table rules
        #[arg(long)]
        skip_documentation: bool,

        /// Skip the transcription character check
        #[arg(long)]
        skip_transcription: bool,

        /// Skip the gloss check
        #[arg(long)]
        skip_glosses: bool,

        /// Report frequencies of all glosses in the corpus
        #[arg(long)]
        gloss_stats: bool,

        /// Do not locate invalid tokens
        #[arg(long)]
        skip_locations: bool,

        /// Locate invalid tokens down to annotation and time
        #[arg(long)]
        detailed_locations: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// No progress output on stderr
        #[arg(short, long)]
        quiet: bool,
    },

    /// Parse a documentation spreadsheet and output the criteria as JSON
    Criteria {
        /// Corpus documentation (.ods or .fods)
        spreadsheet: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Test whether a token can be built from documented chunks
    Segment {
        /// Token to segment
        token: String,

        /// Documented grapheme, punctuation or gloss (repeatable)
        #[arg(short, long = "chunk", required = true)]
        chunks: Vec<String>,
    },
}

struct CheckArgs {
    spreadsheet: PathBuf,
    corpus: Option<PathBuf>,
    config: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
    quiet: bool,
    overrides: CheckOptions,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            spreadsheet,
            corpus,
            config,
            iso_codes,
            offline,
            skip_documentation,
            skip_transcription,
            skip_glosses,
            gloss_stats,
            skip_locations,
            detailed_locations,
            format,
            output,
            quiet,
        } => {
            let overrides = CheckOptions {
                skip_documentation_check: skip_documentation,
                skip_transcription_check: skip_transcription,
                skip_gloss_check: skip_glosses,
                gloss_stats,
                skip_locations,
                detailed_locations,
                offline,
                iso_codes,
                ..Default::default()
            };
            cmd_check(CheckArgs { spreadsheet, corpus, config, format, output, quiet, overrides }).await
        }

        Commands::Criteria { spreadsheet, output } => cmd_criteria(&spreadsheet, output.as_deref()),

        Commands::Segment { token, chunks } => cmd_segment(&token, &chunks),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// File options, then environment, then command line flags.
fn resolve_options(config: Option<&Path>, flags: CheckOptions) -> Result<CheckOptions, Box<dyn std::error::Error>> {
    let mut options = match config {
        Some(path) => CheckOptions::from_file(path)?,
        None => CheckOptions::default(),
    };
    options.apply_env();

    options.skip_documentation_check |= flags.skip_documentation_check;
    options.skip_transcription_check |= flags.skip_transcription_check;
    options.skip_gloss_check |= flags.skip_gloss_check;
    options.gloss_stats |= flags.gloss_stats;
    options.skip_locations |= flags.skip_locations;
    options.detailed_locations |= flags.detailed_locations;
    options.offline |= flags.offline;
    if flags.iso_codes.is_some() {
        options.iso_codes = flags.iso_codes;
    }
    Ok(options)
}

async fn cmd_check(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    LOG_BROADCASTER.set_quiet(args.quiet);
    if !args.quiet {
        eprintln!("📄 RefCo checker {}", CHECKER_VERSION);
    }

    let options = resolve_options(args.config.as_deref(), args.overrides)?;
    let corpus = match args.corpus {
        Some(dir) => dir,
        None => args
            .spreadsheet
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    // Blocking HTTP lookups must stay off the async workers
    let spreadsheet = args.spreadsheet.clone();
    let report = tokio::task::spawn_blocking(move || check_corpus(&spreadsheet, &corpus, &options)).await??;

    let content = match args.format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "checkerVersion": CHECKER_VERSION,
            "spreadsheet": args.spreadsheet.display().to_string(),
            "summary": report.summary(),
            "findings": report.findings(),
        }))?,
    };
    write_output(&content, args.output.as_deref())?;

    if report.has_critical() {
        std::process::exit(1);
    }
    Ok(())
}

fn render_text(report: &ComplianceReport) -> String {
    let mut out = String::new();
    for finding in report.iter() {
        out.push_str(&finding.to_string());
        out.push('\n');
    }
    let summary = report.summary();
    out.push_str(&format!(
        "\n{} critical, {} warnings, {} notes, {} correct",
        summary.critical, summary.warning, summary.note, summary.correct
    ));
    out
}

fn cmd_criteria(spreadsheet: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Reading: {}", spreadsheet.display());

    let sheet = load_spreadsheet(spreadsheet)?;
    let filename = spreadsheet
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let (criteria, report) = read_criteria(&sheet, &filename);
    for finding in report.iter() {
        eprintln!("   ⚠️  {}", finding.description);
    }
    eprintln!(
        "✅ {} sessions, {} tiers, {} graphemes, {} glosses, {} punctuation marks",
        criteria.sessions.len(),
        criteria.tiers.len(),
        criteria.transcriptions.len(),
        criteria.glosses.len(),
        criteria.punctuations.len()
    );

    let json = serde_json::to_string_pretty(&criteria)?;
    write_output(&json, output)?;
    Ok(())
}

fn cmd_segment(token: &str, chunks: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let segmenter = DictionarySegmenter::new(chunks);
    if segmenter.can_segment(token) {
        println!("✅ {} can be segmented", token);
    } else {
        let residue = segmenter.residue(token);
        if residue.is_empty() {
            println!("❌ {} cannot be segmented", token);
        } else {
            println!("❌ {} cannot be segmented, unknown characters: [{}]", token, residue);
        }
    }
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
