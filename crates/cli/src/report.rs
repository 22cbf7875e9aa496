//! `clvchat summary`, `clvchat inspect`, `clvchat intents`.

use serde::Serialize;

use clvchat_engine::summary::{summarize, CategoryCount};
use clvchat_engine::{intents::PhraseOverlap, Value};

use crate::util::{bar, display_width, format_amount, pad_right};
use crate::{CliError, Context};

const BAR_WIDTH: usize = 30;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::eval(format!("JSON serialization error: {e}")))
}

// ============================================================================
// summary
// ============================================================================

pub fn cmd_summary(ctx: &Context, json: bool) -> Result<(), CliError> {
    let loaded = ctx.load_table()?;
    let summary = summarize(&loaded.table);

    if json {
        println!("{}", to_json(&summary)?);
        return Ok(());
    }

    println!("Registros:                  {}", summary.rows);
    println!("Clientes únicos:            {}", summary.customers);
    println!("Valor vida cliente (total): {}", format_amount(summary.total_lifetime_value));
    match summary.mean_lifetime_value {
        Some(mean) => println!("Valor vida cliente (medio): {}", format_amount(mean)),
        None => println!("Valor vida cliente (medio): -"),
    }
    println!("Prima mensual (total):      {}", format_amount(summary.total_monthly_premium));
    println!("Reclamos (total):           {}", format_amount(summary.total_claims));

    if !summary.policies_by_month.is_empty() {
        println!();
        println!("Pólizas por mes");
        let max = summary.policies_by_month.iter().map(|m| m.count).max().unwrap_or(0);
        for m in &summary.policies_by_month {
            println!("  {}  {:>6}  {}", m.month, m.count, bar(m.count, max, BAR_WIDTH));
        }
    }

    print_categories("Cobertura", &summary.by_coverage);
    print_categories("Canal de ventas", &summary.by_sales_channel);
    Ok(())
}

fn print_categories(title: &str, counts: &[CategoryCount]) {
    if counts.is_empty() {
        return;
    }
    let width = counts.iter().map(|c| display_width(&c.name)).max().unwrap_or(0).min(24);
    let max = counts.first().map(|c| c.count).unwrap_or(0);

    println!();
    println!("{title}");
    for c in counts {
        println!("  {}  {:>6}  {}", pad_right(&c.name, width), c.count, bar(c.count, max, BAR_WIDTH));
    }
}

// ============================================================================
// inspect
// ============================================================================

#[derive(Serialize)]
struct ColumnReport {
    name: String,
    kind: &'static str,
    missing: usize,
    coercion_failures: usize,
}

#[derive(Serialize)]
struct InspectReport {
    path: String,
    rows: usize,
    columns: Vec<ColumnReport>,
    coercion_failures: usize,
}

pub fn cmd_inspect(ctx: &Context, json: bool) -> Result<(), CliError> {
    let loaded = ctx.load_table()?;
    let table = &loaded.table;

    let columns: Vec<ColumnReport> = table
        .columns()
        .iter()
        .map(|name| {
            let mut kind = "text";
            let mut missing = 0;
            for value in table.column_values(name) {
                match value {
                    Value::Missing => missing += 1,
                    Value::Number(_) => kind = "number",
                    Value::Date(_) => kind = "date",
                    Value::Text(_) => {}
                }
            }
            ColumnReport {
                name: name.clone(),
                kind,
                missing,
                coercion_failures: loaded.report.for_column(name),
            }
        })
        .collect();

    let report = InspectReport {
        path: loaded.path.display().to_string(),
        rows: table.row_count(),
        columns,
        coercion_failures: loaded.report.total(),
    };

    if json {
        println!("{}", to_json(&report)?);
        return Ok(());
    }

    println!("{}: {} rows, {} columns", report.path, report.rows, report.columns.len());
    let width = report.columns.iter().map(|c| display_width(&c.name)).max().unwrap_or(0);
    for c in &report.columns {
        let failures = if c.coercion_failures > 0 {
            format!("  ({} unparseable)", c.coercion_failures)
        } else {
            String::new()
        };
        println!("  {}  {:<6}  {:>6} missing{}", pad_right(&c.name, width), c.kind, c.missing, failures);
    }
    if report.coercion_failures > 0 {
        eprintln!(
            "note: {} value(s) could not be coerced and were treated as missing",
            report.coercion_failures
        );
    }
    Ok(())
}

// ============================================================================
// intents
// ============================================================================

#[derive(Serialize)]
struct IntentReport<'a> {
    key: &'a str,
    phrases: &'a [String],
    answer_key: Option<&'a str>,
}

#[derive(Serialize)]
struct IntentsOutput<'a> {
    intents: Vec<IntentReport<'a>>,
    overlaps: Vec<PhraseOverlap>,
}

pub fn cmd_intents(ctx: &Context, json: bool) -> Result<(), CliError> {
    let loaded = ctx.load_table()?;
    let responder = ctx.responder(&loaded)?;

    let intents: Vec<IntentReport> = responder
        .intents()
        .iter()
        .map(|intent| IntentReport {
            key: &intent.key,
            phrases: &intent.phrases,
            answer_key: responder.responses().dispatch(&intent.key).map(|a| a.key.as_str()),
        })
        .collect();
    let overlaps = responder.intents().overlapping_phrases();

    if json {
        println!("{}", to_json(&IntentsOutput { intents, overlaps })?);
        return Ok(());
    }

    let width = intents.iter().map(|i| display_width(i.key)).max().unwrap_or(0);
    for intent in &intents {
        let target = intent.answer_key.unwrap_or("(sin respuesta)");
        println!("{} -> {}", pad_right(intent.key, width), target);
        println!("  {}", intent.phrases.join(" | "));
    }
    for o in &overlaps {
        eprintln!("warning: '{}' is listed under '{}' and '{}'; '{}' wins", o.phrase, o.winner, o.shadowed, o.winner);
    }

    let unanswerable = responder.unanswerable_intents();
    if !unanswerable.is_empty() {
        eprintln!("note: intents without an answer fall back: {}", unanswerable.join(", "));
    }
    println!();
    println!("{} answers precomputed from {} rows", responder.responses().len(), loaded.table.row_count());
    Ok(())
}
