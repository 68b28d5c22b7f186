use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use tracing::{info, info_span, warn};

use muncher_cli::sink::JsonLinesSink;
use muncher_cli::source::read_workbook;
use muncher_core::{IngestOptions, RecordAssembler};
use muncher_report::{OperatorReport, summary_table};
use muncher_schema::{BuiltSchema, default_schema_path, load_default_schema, load_schema};

use crate::cli::{FieldsArgs, MunchArgs};

/// Outcome of `munch`: true when every row reached storage.
pub fn run_munch(args: &MunchArgs) -> Result<bool> {
    let span = info_span!("munch", layout = %args.layout);
    let _guard = span.enter();

    let BuiltSchema { schema, .. } = load(args.schema.as_deref())?;
    if !schema.layouts().contains_key(&args.layout) {
        warn!(layout = %args.layout, "layout not declared in schema; matching canonical names only");
    }
    let profile = schema.layout(&args.layout);
    let workbook = read_workbook(&args.inputs, &profile)?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("create output: {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    let mut sink = JsonLinesSink::new(&schema, writer);

    let options = IngestOptions::new().with_strict_columns(args.strict_columns);
    let summary = RecordAssembler::new(&schema, options).ingest_workbook(&workbook, &mut sink);
    let written = sink.written();
    sink.finish().context("flush records")?;
    info!(records = written, "records written");

    let report = OperatorReport::from_summary(&summary, &schema);
    if report.is_clean() {
        info!("no rows need correction");
    }
    if let Some(path) = &args.report {
        let json = report.to_json().context("encode report")?;
        std::fs::write(path, json).with_context(|| format!("write report: {}", path.display()))?;
    }

    // Records own stdout when no output file is given.
    let table = summary_table(&summary);
    if args.output.is_some() {
        println!("{table}");
        println!("{}", report.render_text());
    } else {
        eprintln!("{table}");
        eprintln!("{}", report.render_text());
    }

    Ok(!summary.has_failures())
}

pub fn run_fields(args: &FieldsArgs) -> Result<()> {
    let BuiltSchema { schema, .. } = load(args.schema.as_deref())?;
    let mut table = Table::new();
    table.set_header(vec![
        "Field", "Type", "Max", "Required", "Label", "Aliases", "Value labels", "Checks",
    ]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
    for field in schema.fields() {
        let aliases: Vec<String> = field
            .source_aliases
            .iter()
            .map(|(layout, header)| format!("{layout}: {header}"))
            .collect();
        let labels: Vec<String> = schema
            .value_labels(field)
            .map(|table| {
                table
                    .iter()
                    .map(|(key, label)| format!("{key} = {label}"))
                    .collect()
            })
            .unwrap_or_default();
        let checks: Vec<String> = field
            .checks
            .iter()
            .map(|check| format!("{} {}", check.kind(), check.payload()))
            .collect();
        table.add_row(vec![
            field.name.clone(),
            field.storage_type.to_string(),
            field
                .effective_max_length()
                .map(|max| max.to_string())
                .unwrap_or_else(|| "-".to_string()),
            if field.required { "yes" } else { "no" }.to_string(),
            field.display_label().to_string(),
            aliases.join("\n"),
            labels.join("\n"),
            checks.join("\n"),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn load(path: Option<&Path>) -> Result<BuiltSchema> {
    match path {
        Some(path) => load_schema(path).with_context(|| format!("load schema: {}", path.display())),
        None => load_default_schema()
            .with_context(|| format!("load schema: {}", default_schema_path().display())),
    }
}
