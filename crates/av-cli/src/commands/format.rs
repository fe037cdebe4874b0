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


use anyhow::Result;
use av_metrics::format::format_magnitude_with;
use clap::Args;
use std::io::{self, Write};

use crate::config::Config;

#[derive(Args, Clone, Debug)]
pub struct FormatArgs {
  /// Values to format; anything that is not a number is echoed unchanged
  #[arg(required = true, allow_hyphen_values = true)]
  values: Vec<String>,

  /// Digits after the decimal point (defaults to AV_DISPLAY_PRECISION)
  #[arg(short, long)]
  precision: Option<usize>,
}

pub fn execute(args: FormatArgs, config: Config) -> Result<()> {
  let precision = args.precision.unwrap_or(config.metrics_config.display_precision as usize);

  let stdout = io::stdout();
  let mut out = stdout.lock();
  for value in &args.values {
    writeln!(out, "{}", format_token(value, precision))?;
  }
  Ok(())
}

fn format_token(token: &str, precision: usize) -> String {
  match token.trim().parse::<f64>() {
    Ok(value) => format_magnitude_with(value, precision),
    Err(_) => token.to_string(),
  }
}
