// ==========================================
// 名册导入引擎 - 命令行入口
// ==========================================
// 流程: 加载文件 → 显示自动映射 → 应用覆写 → 预览/导出/提交
// ==========================================

use anyhow::{bail, Context, Result};
use clap::Parser;
use roster_import::api::{AuthContext, GraphqlUploadSink, IngestSession};
use roster_import::config::ConfigManager;
use roster_import::domain::CanonicalField;
use roster_import::importer::{FormatRouter, MappingTarget};
use roster_import::{i18n, logging};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "roster-import")]
#[command(about = "Map tabular roster files (.csv/.xlsx/.xls) onto canonical person fields")]
#[command(long_about = "Map tabular roster files (.csv/.xlsx/.xls) onto canonical person fields.

The header row is auto-mapped first. Override single fields with --map,
then either preview the projected records, write the CSV export, or
submit it to the document backend.

EXAMPLES:
  roster-import personas.csv --preview 5
  roster-import personas.xlsx --map cedula=DNI --map genero= -o salida.csv
  roster-import personas.csv --submit --token $TOKEN")]
#[command(version)]
struct Cli {
    /// Source file (.csv, .xlsx or .xls)
    file: PathBuf,

    /// Override a mapping: field=header (empty header unmaps the field)
    #[arg(short = 'm', long = "map", value_parser = parse_override)]
    overrides: Vec<(CanonicalField, MappingTarget)>,

    /// Write the CSV export to this path (defaults to the configured file name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the first N projected records as JSON instead of exporting
    #[arg(long)]
    preview: Option<usize>,

    /// Submit the export to the document backend
    #[arg(long)]
    submit: bool,

    /// Access token for --submit
    #[arg(long, env = "ROSTER_IMPORT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface language (es, en, zh-CN)
    #[arg(long)]
    locale: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn parse_override(raw: &str) -> Result<(CanonicalField, MappingTarget), String> {
    let (field, header) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=header, got '{}'", raw))?;
    let field: CanonicalField = field.trim().parse()?;
    let target = MappingTarget::from_option(Some(header.trim().to_string()));
    Ok((field, target))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.json_logs);
    tracing::info!("名册导入引擎 v{}", roster_import::VERSION);

    let manager = ConfigManager::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("failed to load configuration")?;
    let config = manager.into_config();

    i18n::set_locale(cli.locale.as_deref().unwrap_or(&config.locale));

    let sink = GraphqlUploadSink::new(
        config.graphql_endpoint(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let session = IngestSession::new(config, FormatRouter::default(), Box::new(sink));

    let summary = session.load_file(&cli.file).await?;
    println!(
        "{} ({}): {} columns, {} rows",
        summary.file_name,
        summary.format,
        summary.headers.len(),
        summary.row_count
    );

    for (field, target) in cli.overrides {
        session.set_field(field, target)?;
    }

    for entry in session.mapping()?.entries() {
        let source = entry.source.as_deref().unwrap_or("-");
        let marker = if entry.field.is_required() { "*" } else { " " };
        println!("  {}{:<18} <- {}", marker, entry.field.name(), source);
    }

    let count = session.proceed()?;
    println!("{} records projected", count);

    if let Some(limit) = cli.preview {
        let records = session.records()?;
        let preview: Vec<_> = records.iter().take(limit).collect();
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    if cli.submit {
        let token = cli.token.unwrap_or_default();
        let result = session.submit(&AuthContext::new(token)).await?;
        if result.is_error() {
            bail!("{}", result.message);
        }
        println!("{}", i18n::t("submission.success"));
        return Ok(());
    }

    let export = session.export_csv()?;
    let path = cli.output.unwrap_or_else(|| PathBuf::from(&export.file_name));
    tokio::fs::write(&path, export.content.as_bytes())
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("{}: {}", i18n::t("export.download_ok"), path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override() {
        let (field, target) = parse_override("cedula=DNI").unwrap();
        assert_eq!(field, CanonicalField::Cedula);
        assert_eq!(target, MappingTarget::Header("DNI".to_string()));

        let (_, target) = parse_override("genero=").unwrap();
        assert_eq!(target, MappingTarget::Unmapped);

        assert!(parse_override("cedula").is_err());
        assert!(parse_override("nope=DNI").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
