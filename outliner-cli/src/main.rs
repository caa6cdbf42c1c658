use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

// Import from outliner-core
use outliner_core::{DebugConfig, DocumentOutline, DocumentProcessor, OutlineConfig, PipelineStages};

#[derive(Parser)]
#[command(name = "outliner")]
#[command(about = "Infer a document title and H1-H3 outline from PDF layout dumps")]
struct Args {
    /// Layout dump (JSON) or a directory of layout dumps
    #[arg(short, long, default_value = "input")]
    input: String,

    /// Directory for `<name>.json` outline files
    #[arg(short, long, default_value = "output")]
    output_dir: String,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Print the effective config as YAML and exit
    #[arg(long)]
    show_config: bool,

    /// Enable detailed profiling of all pipeline steps
    #[arg(long)]
    profile: bool,

    /// Trace spans and headings whose text matches this regex (repeatable)
    #[arg(long = "debug-filter")]
    debug_filters: Vec<String>,

    /// Dump all intermediate pipeline stage outputs to a directory
    /// Captures: spans, title, candidates, provisional and fixed headings, outline
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output
    #[arg(long, default_value = "test_outputs/stages")]
    stages_dir: String,

    /// Inputs are outline JSON files; re-run the hierarchy fixer on them
    #[arg(long)]
    refine: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    println!("🦀 Outliner");

    let config = OutlineConfig::load_with_fallback(args.config.as_deref());
    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {}", config_path);
    } else {
        println!("📋 Using default config");
    }

    if args.show_config {
        println!("\n{}", config.to_yaml()?);
        return Ok(());
    }

    let input = Path::new(&args.input);
    if !input.exists() {
        eprintln!("❌ Input not found at: {}", args.input);
        std::process::exit(1);
    }

    let mut processor = DocumentProcessor::new(config);
    if !args.debug_filters.is_empty() {
        println!("🔍 Tracing texts matching: {:?}", args.debug_filters);
        processor.set_debug_config(DebugConfig::new(true, args.debug_filters.clone()));
    }

    let inputs = if input.is_dir() {
        processor.collect_inputs(input)?
    } else {
        vec![input.to_path_buf()]
    };

    if inputs.is_empty() {
        println!("⚠️  No JSON files found in '{}'", args.input);
        return Ok(());
    }
    println!("📄 Found {} document(s) to process", inputs.len());

    let start_time = Instant::now();
    let succeeded = if args.refine {
        run_refine(&inputs, Path::new(&args.output_dir))?
    } else if args.dump_stages {
        println!("\n🔬 Pipeline stage dump mode");
        run_dump_stages(&processor, &inputs, Path::new(&args.stages_dir))
    } else {
        run_outline(&processor, &inputs, Path::new(&args.output_dir), args.profile)?
    };

    println!(
        "\n⏱️  {}/{} document(s) in {:.3}s",
        succeeded,
        inputs.len(),
        start_time.elapsed().as_secs_f64()
    );

    if succeeded == 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn run_outline(processor: &DocumentProcessor, inputs: &[PathBuf], output_dir: &Path, profile: bool) -> Result<usize> {
    std::fs::create_dir_all(output_dir).with_context(|| format!("creating {}", output_dir.display()))?;

    // Profiling output only makes sense one document at a time
    let results: Vec<(PathBuf, Result<DocumentOutline>)> = if profile {
        inputs
            .iter()
            .map(|path| (path.clone(), processor.process_file_with_profiling(path, true)))
            .collect()
    } else {
        processor
            .process_batch(inputs)
            .into_iter()
            .map(|item| (item.path, item.result))
            .collect()
    };

    let mut succeeded = 0;
    for (path, result) in results {
        match result.and_then(|outline| save_outline(&outline, &output_path(output_dir, &path))) {
            Ok(saved) => {
                succeeded += 1;
                println!("✅ {} → {}", path.display(), saved.display());
            }
            Err(e) => eprintln!("❌ {}: {e:#}", path.display()),
        }
    }
    Ok(succeeded)
}

fn run_refine(inputs: &[PathBuf], output_dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(output_dir).with_context(|| format!("creating {}", output_dir.display()))?;

    let mut succeeded = 0;
    for path in inputs {
        let refined = DocumentOutline::load_from_json(path).map(DocumentOutline::refined);
        match refined.and_then(|outline| save_outline(&outline, &output_path(output_dir, path))) {
            Ok(saved) => {
                succeeded += 1;
                println!("🔧 {} → {}", path.display(), saved.display());
            }
            Err(e) => eprintln!("❌ {}: {e:#}", path.display()),
        }
    }
    Ok(succeeded)
}

fn run_dump_stages(processor: &DocumentProcessor, inputs: &[PathBuf], stages_dir: &Path) -> usize {
    let mut succeeded = 0;
    for path in inputs {
        let stage_dir = stages_dir.join(document_stem(path));
        let dumped = processor
            .process_capture_stages(path)
            .and_then(|stages| save_stages(&stages, path, &stage_dir));
        match dumped {
            Ok(()) => {
                succeeded += 1;
                println!("✅ All stages dumped to: {}", stage_dir.display());
            }
            Err(e) => eprintln!("❌ Stage dump failed for {}: {e:#}", path.display()),
        }
    }
    succeeded
}

fn document_stem(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// `<output_dir>/<input stem>.json`
fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    output_dir.join(format!("{}.json", document_stem(input)))
}

fn save_outline(outline: &DocumentOutline, output_path: &Path) -> Result<PathBuf> {
    outline.save_to_json(output_path)?;
    Ok(output_path.to_path_buf())
}

fn save_stages(stages: &PipelineStages, input: &Path, output_dir: &Path) -> Result<()> {
    use std::fs;
    fs::create_dir_all(output_dir)?;
    let inference = &stages.inference;

    // Stage 1: Spans from the supplier
    let spans_path = output_dir.join("stage1_spans.json");
    fs::write(&spans_path, serde_json::to_string_pretty(&stages.supply)?)?;
    println!("  💾 {} ({} spans)", spans_path.display(), stages.supply.spans.len());

    // Stage 2: Title
    let title_path = output_dir.join("stage2_title.json");
    fs::write(&title_path, serde_json::to_string_pretty(&inference.title)?)?;
    println!("  💾 {}", title_path.display());

    // Stage 3: Heading candidates
    let candidates_path = output_dir.join("stage3_candidates.json");
    fs::write(&candidates_path, serde_json::to_string_pretty(&inference.candidates)?)?;
    println!("  💾 {} ({} candidates)", candidates_path.display(), inference.candidates.len());

    // Stage 4: Provisional levels
    let provisional_path = output_dir.join("stage4_provisional.json");
    fs::write(&provisional_path, serde_json::to_string_pretty(&inference.provisional)?)?;
    println!("  💾 {} ({} headings)", provisional_path.display(), inference.provisional.len());

    // Stage 5: Fixed levels
    let fixed_path = output_dir.join("stage5_fixed.json");
    fs::write(&fixed_path, serde_json::to_string_pretty(&inference.fixed)?)?;
    println!("  💾 {} ({} headings)", fixed_path.display(), inference.fixed.len());

    // Stage 6: Final outline
    let outline_path = output_dir.join("stage6_outline.json");
    inference.outline.save_to_json(&outline_path)?;
    println!("  💾 {}", outline_path.display());

    // Summary file: quick reference for validation scripts
    let summary = serde_json::json!({
        "input": input.display().to_string(),
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stage_counts": {
            "spans": stages.supply.spans.len(),
            "title_spans": inference.title.as_ref().map_or(0, |t| t.span_indices.len()),
            "candidates": inference.candidates.len(),
            "provisional_headings": inference.provisional.len(),
            "headings": inference.outline.outline.len(),
        },
        "body_style": stages.supply.body_style.to_string(),
        "quality_score": inference.validation.as_ref().map(|v| v.quality_score),
    });
    let summary_path = output_dir.join("summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    println!("  💾 {}", summary_path.display());

    Ok(())
}
