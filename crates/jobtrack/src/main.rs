mod bootstrap;
mod report;

use anyhow::{Context, Result};
use jobtrack_core::formatting::describe_layout;
use jobtrack_core::settings::Settings;
use jobtrack_data::analysis::analyze_detailed;
use jobtrack_data::reader::{load_table, InputFormat, ReadOptions};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("jobtrack v{} starting", env!("CARGO_PKG_VERSION"));

    let options = ReadOptions {
        format: InputFormat::resolve(&settings.format, &settings.input),
        has_header: !settings.no_header,
        delimiter: settings.delimiter_byte()?,
    };
    tracing::debug!(
        "Reading {} as {:?} (header: {})",
        settings.input.display(),
        options.format,
        options.has_header
    );

    let layout = describe_layout(settings.schema_variant());
    if settings.schema_from_last_used {
        tracing::info!(
            "Column layout: {} (remembered from a previous run; pass --schema or --clear to change)",
            layout
        );
    } else {
        tracing::info!("Column layout: {}", layout);
    }

    let table = load_table(&settings.input, &options)
        .with_context(|| format!("loading {}", settings.input.display()))?;

    let result = analyze_detailed(&table, settings.schema_variant())
        .with_context(|| format!("analyzing {}", settings.input.display()))?;

    let meta = &result.metadata;
    tracing::info!(
        "Kept {} of {} rows ({} missing required fields, {} with unparseable dates)",
        meta.rows_kept,
        meta.rows_read,
        meta.rows_missing_required,
        meta.rows_unparseable_date
    );
    if meta.rows_read > 0 && meta.rows_kept == 0 {
        tracing::warn!("No rows survived cleaning; every count will be zero");
    }

    println!("{}", report::render(&result, &settings.output)?);

    if settings.save {
        let dir = settings.resolved_results_dir();
        let saved = report::save_results(&dir, &result)?;
        tracing::info!(
            "Saved summary to {} and cleaned rows to {}",
            saved.summary_path.display(),
            saved.cleaned_path.display()
        );
    }

    Ok(())
}
