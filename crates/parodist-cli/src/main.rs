use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use parodist_core::{EngineConfig, KeywordMap};
use parodist_engine::{generate_keywords, ParodyEngine};
use parodist_ollama::{GenerateOptions, OllamaCompleter};

#[derive(Parser)]
#[command(name = "parodist", about = "Constraint-driven song parody generator")]
struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Turn a lyrics file into a themed parody
    Parody {
        /// Lyrics file, one line per source line
        #[arg(long)]
        input: PathBuf,
        /// Theme vocabulary file, one `keyword: definition` per line
        #[arg(long)]
        keywords: PathBuf,
        /// Output path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Refinement passes per line
        #[arg(long, default_value = "2")]
        passes: usize,
        /// Ollama model name
        #[arg(long, default_value = "llama3.2")]
        model: String,
        /// Ollama base URL
        #[arg(long, default_value = "http://localhost:11434")]
        base_url: String,
        /// Per-call HTTP timeout, in seconds
        #[arg(long, default_value = "120")]
        timeout: u64,
    },
    /// Generate a keyword file from free-text subjects
    KeywordGen {
        /// Subjects to build the vocabulary from
        #[arg(required = true)]
        subjects: Vec<String>,
        /// How many `keyword: definition` pairs to ask for
        #[arg(long, default_value = "20", value_parser = clap::value_parser!(u16).range(1..=100))]
        count: u16,
        /// Output path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Ollama model name
        #[arg(long, default_value = "llama3.2")]
        model: String,
        /// Ollama base URL
        #[arg(long, default_value = "http://localhost:11434")]
        base_url: String,
        /// Per-call HTTP timeout, in seconds
        #[arg(long, default_value = "120")]
        timeout: u64,
    },
    /// Time the pure analysis passes over a lyrics file (no LLM involved)
    Benchmark {
        /// Lyrics file to analyze
        #[arg(long)]
        input: PathBuf,
        /// Repetitions
        #[arg(long, default_value = "100")]
        iterations: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let result = match cli.command {
        Command::Parody {
            input,
            keywords,
            output,
            passes,
            model,
            base_url,
            timeout,
        } => run_parody(&input, &keywords, output.as_deref(), passes, &model, &base_url, timeout),
        Command::KeywordGen {
            subjects,
            count,
            output,
            model,
            base_url,
            timeout,
        } => run_keyword_gen(&subjects, count as usize, output.as_deref(), &model, &base_url, timeout),
        Command::Benchmark { input, iterations } => run_benchmark(&input, iterations),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Read a lyrics file: one logical line per source line, trimmed, blanks
/// preserved as structural separators.
fn read_lyrics(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("cannot read lyrics file {:?}: {}", path, e))?;
    Ok(content.lines().map(|l| l.trim().to_string()).collect())
}

fn write_or_print(output: Option<&Path>, text: &str) -> Result<(), Box<dyn Error>> {
    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", text))
                .map_err(|e| format!("cannot write {:?}: {}", path, e))?;
            eprintln!("Wrote {:?}", path);
        }
        None => println!("{}", text),
    }
    Ok(())
}

fn run_parody(
    input: &Path,
    keywords_path: &Path,
    output: Option<&Path>,
    passes: usize,
    model: &str,
    base_url: &str,
    timeout: u64,
) -> Result<(), Box<dyn Error>> {
    let lyrics = read_lyrics(input)?;

    let keyword_text = fs::read_to_string(keywords_path)
        .map_err(|e| format!("cannot read keywords file {:?}: {}", keywords_path, e))?;
    let keywords = KeywordMap::parse(&keyword_text);
    if keywords.is_empty() {
        return Err("keywords file has no usable `keyword: definition` lines".into());
    }
    tracing::info!(lines = lyrics.len(), keywords = keywords.len(), "inputs loaded");

    let completer = OllamaCompleter::new(
        base_url,
        model,
        GenerateOptions::default(),
        Duration::from_secs(timeout),
    );
    let engine = ParodyEngine::new(EngineConfig {
        refinement_passes: passes,
        ..EngineConfig::default()
    });

    let mut progress = |done: usize, total: usize| {
        eprintln!("  line {}/{}", done, total);
    };
    let parody = engine.generate(&lyrics, &keywords, &completer, None, Some(&mut progress))?;

    write_or_print(output, &parody.join("\n"))
}

fn run_keyword_gen(
    subjects: &[String],
    count: usize,
    output: Option<&Path>,
    model: &str,
    base_url: &str,
    timeout: u64,
) -> Result<(), Box<dyn Error>> {
    let completer = OllamaCompleter::new(
        base_url,
        model,
        GenerateOptions::default(),
        Duration::from_secs(timeout),
    );

    let map = generate_keywords(subjects, count, &completer)?;
    tracing::info!(parsed = map.len(), "keywords generated");

    let text = map
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join("\n");
    write_or_print(output, &text)
}

fn run_benchmark(input: &Path, iterations: usize) -> Result<(), Box<dyn Error>> {
    let iterations = iterations.max(1);
    let lyrics = read_lyrics(input)?;
    let non_blank: Vec<&str> = lyrics
        .iter()
        .map(String::as_str)
        .filter(|l| !parodist_prosody::is_blank(l))
        .collect();
    if non_blank.is_empty() {
        return Err("input contains no non-blank lines".into());
    }

    println!("=== Parodist analysis benchmark ===");
    println!("  lines:      {} ({} non-blank)", lyrics.len(), non_blank.len());
    println!("  iterations: {}", iterations);

    let start = Instant::now();
    let mut syllable_total = 0usize;
    for _ in 0..iterations {
        for line in &non_blank {
            syllable_total += parodist_prosody::analyze_line(line).total();
        }
    }
    let syllable_elapsed = start.elapsed();

    let start = Instant::now();
    let mut scheme = String::new();
    for _ in 0..iterations {
        scheme = parodist_prosody::analyze_rhymes(&non_blank).scheme;
    }
    let rhyme_elapsed = start.elapsed();

    let analyzed = non_blank.len() * iterations;
    println!("\n=== Results ===");
    println!(
        "  syllables: {} lines in {:.3}s ({:.0} lines/s), {} syllables per pass",
        analyzed,
        syllable_elapsed.as_secs_f64(),
        analyzed as f64 / syllable_elapsed.as_secs_f64().max(f64::EPSILON),
        syllable_total / iterations,
    );
    println!(
        "  rhymes:    {} passes in {:.3}s ({:.0} passes/s), scheme {}",
        iterations,
        rhyme_elapsed.as_secs_f64(),
        iterations as f64 / rhyme_elapsed.as_secs_f64().max(f64::EPSILON),
        scheme,
    );
    Ok(())
}
