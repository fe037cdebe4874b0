/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */


use anyhow::{Context, Result, anyhow, bail};
use av_core::FuncType;
use av_metrics::{Analysis, MetricsPipeline, RawInput, Timeframe};
use chrono::{NaiveDate, Utc};
use clap::Args;
use rayon::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::render::{OutputFormat, render};
use crate::config::Config;

#[derive(Args, Clone, Debug)]
pub struct AnalyzeArgs {
  /// Symbols to analyze (comma-separated). Each needs a sub-directory of saved
  /// responses named after the symbol in upper case.
  #[arg(required = true, value_delimiter = ',')]
  symbols: Vec<String>,

  /// Directory holding the saved responses (overrides AV_DATA_DIR)
  #[arg(short, long)]
  data_dir: Option<PathBuf>,

  /// Window: ytd, all, max, <K>y or custom:<N>
  #[arg(short, long, default_value = "5y")]
  timeframe: Timeframe,

  /// Reference date for ytd (defaults to today, UTC)
  #[arg(long)]
  as_of: Option<NaiveDate>,

  /// Output format
  #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
  output: OutputFormat,

  /// Observations between the two closes compared by momentum
  #[arg(long)]
  momentum_lookback: Option<usize>,

  /// Also print the clipped price series
  #[arg(long)]
  prices: bool,
}

/// Main execute function
pub fn execute(args: AnalyzeArgs, config: Config) -> Result<()> {
  let mut metrics_config = config.metrics_config.clone();
  if let Some(lookback) = args.momentum_lookback {
    metrics_config = metrics_config.with_momentum_lookback(lookback)?;
  }

  let data_dir = args.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
  let as_of = args.as_of.unwrap_or_else(|| Utc::now().date_naive());
  let pipeline = MetricsPipeline::new(metrics_config.clone());

  info!(
    "Analyzing {} symbols from {} with timeframe {} as of {}",
    args.symbols.len(),
    data_dir.display(),
    args.timeframe,
    as_of
  );

  let outcomes = analyze_symbols(&pipeline, &data_dir, &args.symbols, args.timeframe, as_of);

  let mut analyses = Vec::with_capacity(outcomes.len());
  let mut failures = 0;
  for (symbol, outcome) in outcomes {
    match outcome {
      Ok(analysis) => analyses.push(analysis),
      Err(e) => {
        error!("{}: {:#}", symbol, e);
        failures += 1;
      }
    }
  }

  if !analyses.is_empty() {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(&analyses, args.output, args.prices, &metrics_config, &mut out)?;
  }

  if failures > 0 {
    bail!("{} of {} symbols failed", failures, args.symbols.len());
  }

  Ok(())
}

/// Runs every symbol in parallel; results keep the input order
pub fn analyze_symbols(
  pipeline: &MetricsPipeline,
  data_dir: &Path,
  symbols: &[String],
  timeframe: Timeframe,
  as_of: NaiveDate,
) -> Vec<(String, Result<Analysis>)> {
  symbols
    .par_iter()
    .map(|symbol| {
      let outcome = symbol_dir(data_dir, symbol)
        .and_then(|dir| load_symbol(&dir))
        .and_then(|input| {
          let mut analysis = pipeline
            .run(&input, timeframe, as_of)
            .with_context(|| format!("Failed to derive metrics for {}", symbol))?;
          if analysis.symbol.is_none() {
            analysis.symbol = Some(symbol.to_uppercase());
          }
          Ok(analysis)
        });
      (symbol.clone(), outcome)
    })
    .collect()
}

fn symbol_dir(data_dir: &Path, symbol: &str) -> Result<PathBuf> {
  let symbol = symbol.trim();
  if symbol.is_empty() {
    bail!("Empty symbol");
  }

  let dir = data_dir.join(symbol.to_uppercase());
  if !dir.is_dir() {
    bail!("No saved responses for {} under {}", symbol, dir.display());
  }
  Ok(dir)
}

fn read_json(path: &Path) -> Result<Option<Value>> {
  if !path.exists() {
    return Ok(None);
  }

  let text =
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let value =
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))?;
  Ok(Some(value))
}

/// Read one symbol's saved responses.
///
/// OVERVIEW.json is required. INCOME_STATEMENT.json defines the fiscal years;
/// when it is missing an empty statement stands in so the pipeline reports the
/// gap. The first time series found is used.
pub fn load_symbol(dir: &Path) -> Result<RawInput> {
  let overview_file = FuncType::Overview.file_name();
  let overview = read_json(&dir.join(&overview_file))?
    .ok_or_else(|| anyhow!("Missing {} in {}", overview_file, dir.display()))?;

  let mut statements = Vec::with_capacity(FuncType::STATEMENTS.len());
  for func in FuncType::STATEMENTS {
    match read_json(&dir.join(func.file_name()))? {
      Some(value) => statements.push(value),
      None if func == FuncType::IncomeStatement => {
        warn!("No {} in {}", func.file_name(), dir.display());
        statements.push(json!({}));
      }
      None => debug!("No {} in {}", func.file_name(), dir.display()),
    }
  }

  let mut time_series = None;
  for func in FuncType::TIME_SERIES {
    if let Some(value) = read_json(&dir.join(func.file_name()))? {
      debug!("Using {} for {}", func, dir.display());
      time_series = Some(value);
      break;
    }
  }

  RawInput::from_json(overview, statements, time_series)
    .with_context(|| format!("Unexpected payload shape in {}", dir.display()))
}
