use crate::config::OutlineConfig;
use crate::preprocessors::{LayoutSupplier, SpanSupplier};
use crate::rules::{DebugConfig, OutlineEngine, OutlineStages};
use crate::types::*;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Captured intermediate outputs from each pipeline stage
/// Used by stage dumps and the boundary tests
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStages {
    pub supply: SpanSupply,
    #[serde(flatten)]
    pub inference: OutlineStages,
}

/// Outcome of one document in a batch run
#[derive(Debug)]
pub struct BatchItem {
    pub path: PathBuf,
    pub result: Result<DocumentOutline>,
    pub elapsed: Duration,
}

impl BatchItem {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        log::debug!("⏱️  {}: {:.0}ms", step_name, elapsed.as_millis());

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            println!(
                "   {:.<35} {:.0}ms ({:.1}%)",
                step,
                duration.as_millis(),
                percentage
            );
        }
        println!("   {:.<35} {:.0}ms", "Total", total.as_millis());
    }
}

pub struct DocumentProcessor {
    supplier: Box<dyn SpanSupplier>,
    engine: OutlineEngine,
}

impl DocumentProcessor {
    /// Processor for layout dumps with the given config
    pub fn new(config: OutlineConfig) -> Self {
        let supplier = Box::new(LayoutSupplier::new(config.supplier.clone()));
        Self::new_with_dependencies(supplier, config)
    }

    /// Create DocumentProcessor with a custom span supplier
    pub fn new_with_dependencies(supplier: Box<dyn SpanSupplier>, config: OutlineConfig) -> Self {
        Self {
            supplier,
            engine: OutlineEngine::new(config),
        }
    }

    pub fn set_debug_config(&mut self, debug_config: DebugConfig) {
        self.engine.set_debug_config(debug_config);
    }

    pub fn config(&self) -> &OutlineConfig {
        self.engine.config()
    }

    pub fn supplier_name(&self) -> &str {
        self.supplier.name()
    }

    /// Outline inference over spans that are already in memory
    pub fn process_spans(&self, supply: &SpanSupply) -> DocumentOutline {
        self.engine.run(supply)
    }

    pub fn process_file(&self, input_path: &Path) -> Result<DocumentOutline> {
        let supply = self.supply(input_path)?;
        Ok(self.engine.run(&supply))
    }

    /// Same as [`process_file`](Self::process_file), timing each step
    pub fn process_file_with_profiling(&self, input_path: &Path, enable_profiling: bool) -> Result<DocumentOutline> {
        let mut profiler = StepProfiler::new(enable_profiling);
        let start_time = Instant::now();

        let supply = profiler.time_step("1. Layout → Spans", || self.supply(input_path))?;

        let outline = profiler.time_step("2. Outline Inference", || self.engine.run(&supply));

        profiler.print_summary();
        log::info!(
            "⏱️  {}: {:.0}ms",
            input_path.display(),
            start_time.elapsed().as_millis()
        );
        Ok(outline)
    }

    /// Run the pipeline and keep every intermediate result
    pub fn process_capture_stages(&self, input_path: &Path) -> Result<PipelineStages> {
        let supply = self.supply(input_path)?;
        log::info!("📋 Stage 1: {} spans captured", supply.spans.len());

        let inference = self.engine.run_with_stages(&supply);
        log::info!(
            "📋 Stage 2: {} candidates, {} headings captured",
            inference.candidates.len(),
            inference.outline.outline.len()
        );

        Ok(PipelineStages { supply, inference })
    }

    /// Supported input files directly inside `dir`, sorted by path
    pub fn collect_inputs(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut inputs = Vec::new();
        for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
            let path = entry?.path();
            if path.is_file() && self.supplier.supports_file_type(&path) {
                inputs.push(path);
            }
        }
        inputs.sort();
        Ok(inputs)
    }

    /// Process documents in parallel. One failing document never stops the others;
    /// results come back in input order.
    pub fn process_batch(&self, paths: &[PathBuf]) -> Vec<BatchItem> {
        log::info!("📚 Processing {} document(s) with {}", paths.len(), self.supplier.name());

        paths
            .par_iter()
            .map(|path| {
                let start = Instant::now();
                let result = self.process_file(path);
                if let Err(e) = &result {
                    log::warn!("❌ {}: {:#}", path.display(), e);
                }
                BatchItem {
                    path: path.clone(),
                    result,
                    elapsed: start.elapsed(),
                }
            })
            .collect()
    }

    fn supply(&self, input_path: &Path) -> Result<SpanSupply> {
        self.supplier
            .supply_file(input_path)
            .with_context(|| format!("supplying spans from {}", input_path.display()))
    }
}
