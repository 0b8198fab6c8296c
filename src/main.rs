//! cyclometry CLI - Dependency Cycle Analysis
//!
//! Analyzes a dependency edge-list for cycles and generates reports.
//!
//! Usage:
//!   cyclometry [OPTIONS] <PATH>

use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;

use cyclometry::{
    CompiledConfig, ProgressSink, analyze_with, generate_json, generate_report_with_config,
    generate_summary, load_compiled_config, load_graph,
};

/// cyclometry - Find and explain dependency cycles in directed graphs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dependency graph to analyze (text edge-list, or JSON with .json extension)
    path: PathBuf,

    /// Output file for the report (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show summary only (no component table or cycle listings)
    #[arg(short, long)]
    summary: bool,

    /// Machine-readable JSON output
    #[arg(long)]
    json: bool,

    /// Config file path (default: search for .cyclometry.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Show timing information
    #[arg(long)]
    timing: bool,

    /// Number of threads for parallel processing (default: all CPU cores)
    #[arg(long, short = 'j', value_name = "N")]
    jobs: Option<usize>,

    /// Max components listed in the report (0 = unlimited)
    #[arg(long)]
    max_components: Option<usize>,

    /// Exit with code 2 if any dependency cycle exists
    #[arg(long)]
    fail_on_cycles: bool,
}

/// Stderr progress reporting for --verbose runs. Never cancels; the CLI has
/// no interactive way to abandon a run midway.
struct StderrProgress {
    verbose: bool,
}

impl ProgressSink for StderrProgress {
    fn pass_completed(&self, pass: &str) {
        if self.verbose {
            eprintln!("Pass complete: {}", pass);
        }
    }
}

fn main() {
    match run() {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32, Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configure thread pool
    let available_cores = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    let num_threads = args.jobs.unwrap_or(available_cores);
    if args.jobs.is_some() {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .unwrap_or_else(|e| eprintln!("Warning: Could not set thread count: {}", e));
    }

    let total_start = Instant::now();

    // Load configuration file
    let config_path = args.config.as_ref().unwrap_or(&args.path);
    let mut config = match load_compiled_config(config_path) {
        Ok(config) => {
            if args.verbose && config.has_exclusions() {
                eprintln!("Loaded configuration with exclusion patterns");
            }
            config
        }
        Err(e) => {
            if args.verbose {
                eprintln!("Note: No config file loaded: {}", e);
            }
            CompiledConfig::empty()
        }
    };

    // CLI flags override config, which overrides defaults
    if let Some(max_components) = args.max_components {
        config.report.max_components = max_components;
    }
    if args.fail_on_cycles {
        config.report.fail_on_cycles = true;
    }

    eprintln!("Analyzing graph at '{}'...", args.path.display());

    let load_start = Instant::now();
    let loaded = load_graph(&args.path, config.exclude_patterns())?;
    let load_time = load_start.elapsed();

    let analysis_start = Instant::now();
    let progress = StderrProgress {
        verbose: args.verbose,
    };
    let analysis = analyze_with(&loaded.graph, &progress)?;
    let analysis_time = analysis_start.elapsed();

    let summary = analysis.summary();
    if args.timing {
        eprintln!(
            "Analysis complete: {} vertices, {} components, {} cycles (load {:.2?}, analysis {:.2?})\n",
            loaded.graph.len(),
            summary.components,
            summary.cyclic_components,
            load_time,
            analysis_time
        );
    } else {
        eprintln!(
            "Analysis complete: {} vertices, {} components, {} cycles\n",
            loaded.graph.len(),
            summary.components,
            summary.cyclic_components
        );
    }

    // Generate output
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(stdout()),
    };

    let title = args
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.path.display().to_string());

    if args.json {
        generate_json(&title, &loaded.graph, &analysis, &mut writer)?;
    } else if args.summary {
        generate_summary(&title, &loaded.graph, &analysis, &mut writer)?;
    } else {
        generate_report_with_config(&title, &loaded.graph, &analysis, &config.report, &mut writer)?;
    }
    writer.flush()?;

    if let Some(path) = &args.output {
        eprintln!("Report written to: {}", path.display());
    }

    if args.timing {
        let total_time = total_start.elapsed();
        eprintln!("Total time: {:.2?}", total_time);
    }

    Ok(exit_code(config.report.fail_on_cycles, summary.has_cycles()))
}

/// Exit code policy: 0 normally, 2 when cycles exist and the CI gate asked
/// for them to fail the run.
fn exit_code(fail_on_cycles: bool, has_cycles: bool) -> i32 {
    if fail_on_cycles && has_cycles { 2 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_policy() {
        assert_eq!(exit_code(false, false), 0);
        assert_eq!(exit_code(false, true), 0);
        assert_eq!(exit_code(true, false), 0);
        assert_eq!(exit_code(true, true), 2);
    }
}
