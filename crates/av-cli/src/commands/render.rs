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


//! Writes analyses as an aligned text table, CSV or JSON.

use anyhow::Result;
use av_core::Config;
use av_metrics::Analysis;
use av_metrics::format::{MagnitudeFormat, display_headers};
use av_models::PriceSeries;
use clap::ValueEnum;
use std::io::Write;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
  Table,
  Csv,
  Json,
}

/// Write every analysis to `out`. JSON always carries the price window;
/// `prices` adds a price table in table mode.
pub fn render<W: Write>(
  analyses: &[Analysis],
  format: OutputFormat,
  prices: bool,
  config: &Config,
  out: &mut W,
) -> Result<()> {
  match format {
    OutputFormat::Table => render_table(analyses, prices, config, out)?,
    OutputFormat::Csv => {
      if prices {
        warn!("--prices is ignored for CSV output");
      }
      render_csv(analyses, config, out)?;
    }
    OutputFormat::Json => {
      serde_json::to_writer_pretty(&mut *out, analyses)?;
      writeln!(out)?;
    }
  }
  Ok(())
}

fn render_table<W: Write>(
  analyses: &[Analysis],
  prices: bool,
  config: &Config,
  out: &mut W,
) -> Result<()> {
  for (i, analysis) in analyses.iter().enumerate() {
    if i > 0 {
      writeln!(out)?;
    }

    let symbol = analysis.symbol.as_deref().unwrap_or("?");
    writeln!(out, "{} ({} of {} periods)", symbol, analysis.filtered_periods.len(), analysis.periods.len())?;

    match analysis.filtered_periods.first() {
      Some(first) => write_aligned(out, &display_headers(first), &analysis.display_rows(config))?,
      None => writeln!(out, "No periods in timeframe")?,
    }

    if prices {
      writeln!(out)?;
      write_prices(out, &analysis.prices, config)?;
    }
  }
  Ok(())
}

fn render_csv<W: Write>(analyses: &[Analysis], config: &Config, out: &mut W) -> Result<()> {
  let mut writer = csv::Writer::from_writer(out);

  let first_row = analyses.iter().find_map(|a| a.filtered_periods.first());
  if let Some(first) = first_row {
    let mut headers = vec!["Symbol".to_string()];
    headers.extend(display_headers(first));
    writer.write_record(&headers)?;
  }

  for analysis in analyses {
    let symbol = analysis.symbol.clone().unwrap_or_default();
    for row in analysis.display_rows(config) {
      let mut record = Vec::with_capacity(row.len() + 1);
      record.push(symbol.clone());
      record.extend(row);
      writer.write_record(&record)?;
    }
  }

  writer.flush()?;
  Ok(())
}

fn write_prices<W: Write>(out: &mut W, series: &PriceSeries, config: &Config) -> Result<()> {
  if series.is_empty() {
    writeln!(out, "No prices in timeframe")?;
    return Ok(());
  }

  let precision = config.display_precision as usize;
  let intraday = series.granularity.is_some_and(|g| g.is_intraday());
  let headers: Vec<String> =
    ["Date", "Open", "High", "Low", "Close", "Volume"].iter().map(|h| h.to_string()).collect();

  let rows: Vec<Vec<String>> = series
    .points()
    .iter()
    .map(|point| {
      let date = if intraday {
        point.timestamp.format("%Y-%m-%d %H:%M").to_string()
      } else {
        point.timestamp.format("%Y-%m-%d").to_string()
      };
      vec![
        date,
        point.open.format_magnitude(precision),
        point.high.format_magnitude(precision),
        point.low.format_magnitude(precision),
        point.close.format_magnitude(precision),
        point.volume.format_magnitude(precision),
      ]
    })
    .collect();

  write_aligned(out, &headers, &rows)
}

/// Right-aligned columns, two spaces apart, with a dashed rule under the header
fn write_aligned<W: Write>(out: &mut W, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
  let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
  for row in rows {
    for (width, cell) in widths.iter_mut().zip(row) {
      *width = (*width).max(cell.len());
    }
  }

  let line = |cells: &[String]| {
    cells
      .iter()
      .zip(&widths)
      .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
      .collect::<Vec<_>>()
      .join("  ")
  };

  writeln!(out, "{}", line(headers))?;
  writeln!(out, "{}", widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "))?;
  for row in rows {
    writeln!(out, "{}", line(row))?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use av_metrics::{MetricsPipeline, RawInput, Timeframe};
  use chrono::NaiveDate;
  use serde_json::json;

  fn analysis() -> Analysis {
    let input = RawInput::from_json(
      json!({"Symbol": "ACME", "PERatio": "15.2", "MarketCapitalization": "2000000000"}),
      vec![json!({"annualReports": [
        {"fiscalDateEnding": "2024-12-31", "totalRevenue": "1000", "netIncome": "100"},
        {"fiscalDateEnding": "2023-12-31", "totalRevenue": "800", "netIncome": "80"}
      ]})],
      Some(json!({"Time Series (Daily)": {
        "2024-12-30": {"1. open": "10", "2. high": "11", "3. low": "9", "4. close": "10.5", "5. volume": "2500000"},
        "2024-12-31": {"1. open": "10.5", "2. high": "12", "3. low": "10", "4. close": "11.25", "5. volume": "1200"}
      }})),
    )
    .unwrap();
    let as_of = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
    MetricsPipeline::default().run(&input, Timeframe::All, as_of).unwrap()
  }

  fn rendered(format: OutputFormat, prices: bool) -> String {
    let mut out = Vec::new();
    render(&[analysis()], format, prices, &Config::default(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn test_table_output() {
    let text = rendered(OutputFormat::Table, false);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "ACME (2 of 2 periods)");
    assert!(lines[1].contains("Year") && lines[1].contains("Revenue Growth"));
    assert!(lines[2].starts_with('-'));
    assert!(lines[3].trim_start().starts_with("2024"));
    assert!(lines[4].contains("N/A"));
    assert_eq!(lines.len(), 5);
    // every data line lines up with the header
    assert!(lines[1..].iter().all(|l| l.len() == lines[1].len()));
  }

  #[test]
  fn test_table_with_prices() {
    let text = rendered(OutputFormat::Table, true);
    assert!(text.contains("Close"));
    assert!(text.contains("2024-12-31"));
    assert!(text.contains("2.50M"));
    assert!(text.contains("1.20K"));
  }

  #[test]
  fn test_csv_output() {
    let text = rendered(OutputFormat::Csv, false);
    let mut reader = csv::Reader::from_reader(text.as_bytes());

    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "Symbol");
    assert_eq!(&headers[1], "Year");

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][0], "ACME");
    assert_eq!(&records[0][1], "2024");
    assert_eq!(&records[1][1], "2023");
  }

  #[test]
  fn test_json_output() {
    let text = rendered(OutputFormat::Json, false);
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value[0]["symbol"], "ACME");
    assert_eq!(value[0]["filtered_periods"][0]["Year"], "2024");
    assert!(value[0]["filtered_periods"][1]["Revenue Growth"].is_null());
  }

  #[test]
  fn test_empty_timeframe() {
    let mut analysis = analysis();
    analysis.filtered_periods.clear();
    let mut out = Vec::new();
    render(&[analysis], OutputFormat::Table, false, &Config::default(), &mut out).unwrap();
    assert!(String::from_utf8(out).unwrap().contains("No periods in timeframe"));
  }
}
