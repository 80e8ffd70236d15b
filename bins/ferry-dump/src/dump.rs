use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use ferry_api::config::ConfigValues;
use ferry_api::converter::{Converter, FromConfig};
use ferry_api::Value;
use ferry_avro::{AvroRecordReader, AvroWrapperConverter};
use serde::Serialize;

use crate::config::Cli;
use crate::error::DumpError;

/// One output line when the value side is present.
#[derive(Serialize)]
struct Line<'a> {
    key: &'a Value,
    value: &'a Value,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub written: usize,
    pub skipped: usize,
}

pub fn run(cli: &Cli) -> Result<(), DumpError> {
    let config = if cli.settings.is_empty() {
        None
    } else {
        Some(ConfigValues::from_assignments(
            cli.settings.iter().map(String::as_str),
            AvroWrapperConverter::config_params(),
        )?)
    };
    let converter = AvroWrapperConverter::from_config(config.as_ref())?;

    let file = File::open(&cli.file).map_err(|source| DumpError::Open {
        path: cli.file.display().to_string(),
        source,
    })?;
    let reader = AvroRecordReader::new(BufReader::new(file))?;
    tracing::info!(file = %cli.file.display(), schema = %reader.schema(), "dumping records");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = dump(reader, &converter, &mut out, cli.limit, cli.fail_fast)?;
    out.flush()?;

    tracing::info!(written = summary.written, skipped = summary.skipped, "done");
    Ok(())
}

/// Convert every record and write one JSON line each. A record that fails
/// to convert is skipped with a warning unless `fail_fast` is set.
pub fn dump<R: Read, W: Write>(
    reader: AvroRecordReader<R>,
    converter: &AvroWrapperConverter,
    out: &mut W,
    limit: Option<usize>,
    fail_fast: bool,
) -> Result<Summary, DumpError> {
    let mut summary = Summary::default();
    for (index, pair) in reader.enumerate().take(limit.unwrap_or(usize::MAX)) {
        let converted = pair.and_then(|(key, value)| converter.convert(&key, &value));
        match converted {
            Ok((key, value)) => {
                if value.is_null() {
                    serde_json::to_writer(&mut *out, &key)?;
                } else {
                    serde_json::to_writer(&mut *out, &Line { key: &key, value: &value })?;
                }
                out.write_all(b"\n")?;
                summary.written += 1;
            }
            Err(e) if fail_fast => return Err(e.with_context(format_args!("record {index}")).into()),
            Err(e) => {
                tracing::warn!(record = index, error = %e, "record skipped");
                summary.skipped += 1;
            }
        }
    }
    Ok(summary)
}
