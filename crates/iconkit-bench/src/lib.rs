//! # IconKit Bench
//!
//! Performance benchmarking for IconKit.
//!
//! ## Features
//!
//! - Path data parsing benchmarks
//! - Markup scanning and scene building benchmarks
//! - Stylesheet parsing benchmarks
//! - Timing engine sampling benchmarks
//!
//! The criterion harness lives in `benches/iconkit.rs`; this library holds
//! the shared fixtures and a lightweight runner for quick smoke timings.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use iconkit_bench::Benchmark;
//!
//! let suite = Benchmark::new().run_all();
//! suite.print_summary();
//! ```

use iconkit_animation::{sample, AnimationDirection, AnimationTiming, Iterations, TimingFunction};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// Benchmark errors.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Benchmark failed: {0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ==================== Results ====================

/// A single benchmark result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub iterations: u64,
    /// Total time in nanoseconds.
    pub total_ns: u64,
    pub mean_ns: u64,
    pub std_dev_ns: u64,
    pub min_ns: u64,
    pub max_ns: u64,
    pub ops_per_sec: f64,
}

impl BenchmarkResult {
    /// Summarise sample times. An empty sample set yields zeros.
    pub fn from_samples(name: impl Into<String>, samples: &[Duration]) -> Self {
        let name = name.into();
        let iterations = samples.len() as u64;

        let times_ns: Vec<u64> = samples.iter().map(|d| d.as_nanos() as u64).collect();
        let total_ns: u64 = times_ns.iter().sum();
        let mean_ns = total_ns.checked_div(iterations).unwrap_or(0);
        let min_ns = times_ns.iter().copied().min().unwrap_or(0);
        let max_ns = times_ns.iter().copied().max().unwrap_or(0);

        let variance = if iterations > 0 {
            times_ns
                .iter()
                .map(|&t| {
                    let diff = t as f64 - mean_ns as f64;
                    diff * diff
                })
                .sum::<f64>()
                / iterations as f64
        } else {
            0.0
        };
        let std_dev_ns = variance.sqrt() as u64;

        let ops_per_sec = if mean_ns > 0 {
            1_000_000_000.0 / mean_ns as f64
        } else {
            0.0
        };

        Self {
            name,
            iterations,
            total_ns,
            mean_ns,
            std_dev_ns,
            min_ns,
            max_ns,
            ops_per_sec,
        }
    }

    pub fn format_mean(&self) -> String {
        format_duration(self.mean_ns)
    }

    pub fn print_line(&self) {
        println!(
            "{:40} {:>12} {:>12} {:>12}/s",
            self.name,
            self.format_mean(),
            format!("±{}", format_duration(self.std_dev_ns)),
            format_ops(self.ops_per_sec),
        );
    }
}

fn format_duration(ns: u64) -> String {
    if ns >= 1_000_000_000 {
        format!("{:.2} s", ns as f64 / 1_000_000_000.0)
    } else if ns >= 1_000_000 {
        format!("{:.2} ms", ns as f64 / 1_000_000.0)
    } else if ns >= 1_000 {
        format!("{:.2} µs", ns as f64 / 1_000.0)
    } else {
        format!("{} ns", ns)
    }
}

fn format_ops(ops: f64) -> String {
    if ops >= 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops >= 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{:.2}", ops)
    }
}

/// Collection of benchmark results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkSuite {
    pub name: String,
    pub results: Vec<BenchmarkResult>,
    pub total_time: Duration,
}

impl BenchmarkSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            results: Vec::new(),
            total_time: Duration::ZERO,
        }
    }

    pub fn add(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }

    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(80));
        println!("Benchmark Suite: {}", self.name);
        println!("{}", "=".repeat(80));
        println!(
            "{:40} {:>12} {:>12} {:>12}",
            "Name", "Mean", "StdDev", "Throughput"
        );
        println!("{}", "-".repeat(80));

        for result in &self.results {
            result.print_line();
        }

        println!("{}", "-".repeat(80));
        println!("Total time: {:?}", self.total_time);
        println!();
    }

    pub fn to_json(&self) -> Result<String, BenchError> {
        serde_json::to_string_pretty(self).map_err(|e| BenchError::Failed(e.to_string()))
    }

    /// Save results to a JSON file.
    pub fn save_json(&self, path: &str) -> Result<(), BenchError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

// ==================== Runner ====================

/// Quick in-process runner; criterion is used for the real numbers.
pub struct Benchmark {
    pub warmup: u64,
    pub iterations: u64,
}

impl Benchmark {
    pub fn new() -> Self {
        Self {
            warmup: 10,
            iterations: 100,
        }
    }

    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_warmup(mut self, warmup: u64) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn run<F>(&self, name: &str, mut f: F) -> BenchmarkResult
    where
        F: FnMut(),
    {
        debug!(
            name,
            warmup = self.warmup,
            iterations = self.iterations,
            "Running benchmark"
        );

        for _ in 0..self.warmup {
            f();
        }

        let mut samples = Vec::with_capacity(self.iterations as usize);
        for _ in 0..self.iterations {
            let start = Instant::now();
            f();
            samples.push(start.elapsed());
        }

        BenchmarkResult::from_samples(name, &samples)
    }

    /// Run all standard benchmarks.
    pub fn run_all(&self) -> BenchmarkSuite {
        let start = Instant::now();
        let mut suite = BenchmarkSuite::new("IconKit");

        let path = generate_path(200);
        suite.add(self.run(&format!("path/parse ({} bytes)", path.len()), || {
            let _ = iconkit_path::parse_path(&path);
        }));

        let css = generate_css(50);
        suite.add(self.run(&format!("css/parse ({} bytes)", css.len()), || {
            let _ = iconkit_css::Stylesheet::parse(&css);
        }));

        let icon = generate_icon(100);
        suite.add(self.run(&format!("svg/build ({} bytes)", icon.len()), || {
            let _ = iconkit_svg::Icon::parse(&icon);
        }));

        suite.add(self.run(&format!("svg/build/animated ({} bytes)", ANIMATED_ICON.len()), || {
            let _ = iconkit_svg::Icon::parse(ANIMATED_ICON);
        }));

        let timings = sample_timings();
        suite.add(self.run("animation/sample (1000 frames)", || {
            for frame in 0..1000 {
                for timing in &timings {
                    let _ = sample(timing, frame as f32 * 16.0);
                }
            }
        }));

        suite.total_time = start.elapsed();
        suite
    }
}

impl Default for Benchmark {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Fixtures ====================

/// A small icon mixing SMIL, href-targeted and CSS animations.
pub const ANIMATED_ICON: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">
  <style>
    @keyframes spin { from { transform: rotate(0deg) } to { transform: rotate(360deg) } }
    @keyframes fade { 0% { opacity: 1 } 100% { opacity: .2 } }
    .spinner { animation: spin 1s linear infinite; transform-origin: center }
    #dot { animation: fade 600ms ease-in-out infinite alternate }
  </style>
  <g class="spinner">
    <path d="M12 2a10 10 0 0 1 10 10" stroke-dasharray="16">
      <animate attributeName="stroke-dashoffset" from="16" to="0" dur="800ms" repeatCount="indefinite"/>
    </path>
  </g>
  <circle id="dot" cx="12" cy="12" r="3">
    <animate attributeName="r" values="2;4;2" dur="1.2s" repeatCount="indefinite"/>
  </circle>
  <animateTransform href="#dot" attributeName="transform" type="scale" from="1" to="1.5" dur="1s"/>
  <rect x="4" y="18" width="16" height="2" rx="1">
    <animateMotion path="M0 0 H4 Z" dur="2s" rotate="auto"/>
  </rect>
</svg>"##;

/// Path data with `segments` mixed absolute and relative commands.
pub fn generate_path(segments: usize) -> String {
    let mut data = String::from("M0 0");
    for i in 0..segments {
        match i % 5 {
            0 => data.push_str(&format!(" L{} {}", i, i * 2)),
            1 => data.push_str(&format!(" c1.5-2 3.25.5 {}-{}", i % 7, i % 3)),
            2 => data.push_str(&format!(" a2 2 0 0 1 {} {}", i % 4, i % 6)),
            3 => data.push_str(&format!(" q{} 1 2 2", i % 9)),
            _ => data.push_str(" h-1.5v.5z"),
        }
    }
    data
}

/// Stylesheet with `rules` class rules plus one keyframes block.
pub fn generate_css(rules: usize) -> String {
    let mut css = String::new();
    for i in 0..rules {
        css.push_str(&format!(
            ".c{} {{ fill: #{:06x}; stroke-width: {}px; opacity: .{} }}\n",
            i,
            i * 4099 % 0xffffff,
            i % 4,
            i % 10
        ));
    }
    css.push_str("@keyframes pulse { from { opacity: 1 } 50% { opacity: .5 } to { opacity: 0 } }\n");
    css
}

/// Icon with `shapes` elements spread across nested groups.
pub fn generate_icon(shapes: usize) -> String {
    let mut markup = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 24 24\"><style>{}</style><g>",
        generate_css(10)
    );
    for i in 0..shapes {
        if i % 10 == 0 && i > 0 {
            markup.push_str("</g><g transform=\"translate(1 1)\">");
        }
        match i % 4 {
            0 => markup.push_str(&format!("<circle class=\"c{}\" cx=\"{}\" cy=\"12\" r=\"2\"/>", i % 10, i % 24)),
            1 => markup.push_str(&format!("<rect x=\"{}\" y=\"2\" width=\"4\" height=\"4\" rx=\"1\"/>", i % 20)),
            2 => markup.push_str(&format!("<path d=\"M{} 0l4 4-4 4z\" fill=\"red\"/>", i % 20)),
            _ => markup.push_str("<polyline points=\"0 0 4 4 8 0\" stroke=\"black\"/>"),
        }
    }
    markup.push_str("</g></svg>");
    markup
}

/// A spread of timings covering the engine's branches.
pub fn sample_timings() -> Vec<AnimationTiming> {
    vec![
        AnimationTiming::new(1000.0),
        AnimationTiming::new(600.0)
            .with_iterations(Iterations::Infinite)
            .with_direction(AnimationDirection::Alternate),
        AnimationTiming::new(800.0)
            .with_delay(200.0)
            .with_timing_function(TimingFunction::EaseInOut),
        AnimationTiming::new(1200.0)
            .with_iterations(Iterations::Count(3))
            .with_key_splines([0.4, 0.0, 0.2, 1.0]),
    ]
}
