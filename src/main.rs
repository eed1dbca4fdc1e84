use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use holdings_etl::config::profile::NormalizerProfile;
use holdings_etl::core::{export, pipeline};
use holdings_etl::utils::{logger, validation::Validate};
use holdings_etl::{
    CliConfig, ExportFormat, FileFormat, HashedNamespace, LocalStorage, SessionContext,
    SnapshotStore, UploadedFile,
};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting holdings-etl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let session = SessionContext::new(config.credential.clone());
    let namespace = session.namespace(&HashedNamespace);
    let store = SnapshotStore::new(LocalStorage::new(config.store_root.clone()));

    if config.is_snapshot_command() {
        return run_snapshot_command(&config, &store, &namespace);
    }

    let profile = match &config.profile {
        Some(path) => NormalizerProfile::from_file(path)
            .with_context(|| format!("Failed to load profile '{}'", path))?,
        None => NormalizerProfile::default(),
    };

    let files = read_uploads(&config.files)?;
    tracing::info!("{} file(s) uploaded", files.len());

    let report = pipeline::process_batch(&files, &profile);
    for issue in &report.issues {
        eprintln!("[{:?}] {}: {}", issue.severity, issue.file, issue.message);
    }

    let Some(pivot) = &report.pivot else {
        println!("No usable data in the uploaded files; nothing to aggregate.");
        return Ok(());
    };

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Holdings");
        println!("{}", export::to_text(pivot));
    }

    write_exports(&config, pivot)?;

    if let Some(save) = &config.save {
        let name = match save {
            Some(name) => name.clone(),
            None => export::timestamped_snapshot_name(Utc::now()),
        };
        let path = store.save(&namespace, &name, pivot)?;
        println!("Snapshot saved to {}/{}", config.store_root, path);
    }

    Ok(())
}

fn run_snapshot_command(
    config: &CliConfig,
    store: &SnapshotStore<LocalStorage>,
    namespace: &str,
) -> anyhow::Result<()> {
    if config.list_snapshots {
        let names = store.list(namespace)?;
        if names.is_empty() {
            println!("No snapshots in the active namespace.");
        } else {
            for name in names {
                println!("{}", name);
            }
        }
        return Ok(());
    }

    if let Some(name) = &config.load_snapshot {
        let pivot = store.load(namespace, name)?;
        println!("{}", export::to_text(&pivot));
        return Ok(());
    }

    if let Some(name) = &config.delete_snapshot {
        store.delete(namespace, name)?;
        println!("Snapshot '{}' deleted.", name);
    }

    Ok(())
}

fn read_uploads(paths: &[String]) -> anyhow::Result<Vec<UploadedFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read input file '{}'", path))?;
        let name = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path)
            .to_string();
        // Validation already restricted extensions to csv/xlsx.
        let format = FileFormat::from_name(&name).unwrap_or(FileFormat::Csv);
        files.push(UploadedFile::new(name, bytes, format));
    }
    Ok(files)
}

fn write_exports(config: &CliConfig, pivot: &holdings_etl::PivotTable) -> anyhow::Result<()> {
    let out_dir = Path::new(&config.output_path);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory '{}'", config.output_path))?;

    if matches!(config.export, ExportFormat::Csv | ExportFormat::Both) {
        let path = out_dir.join(export::CSV_EXPORT_NAME);
        std::fs::write(&path, export::to_csv_bytes(pivot)?)?;
        tracing::info!("CSV export written to {}", path.display());
        println!("CSV export: {}", path.display());
    }

    if matches!(config.export, ExportFormat::Xlsx | ExportFormat::Both) {
        let path = out_dir.join(export::timestamped_xlsx_name(Utc::now()));
        std::fs::write(&path, export::to_xlsx_bytes(pivot)?)?;
        tracing::info!("Spreadsheet export written to {}", path.display());
        println!("Spreadsheet export: {}", path.display());
    }

    Ok(())
}
