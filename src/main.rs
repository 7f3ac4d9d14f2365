use clap::Parser;
use kind_shapes::config::{manifest::Manifest, Command};
use kind_shapes::core::{check, KindName, Storage};
use kind_shapes::utils::error::{ErrorCategory, KindError};
use kind_shapes::utils::{logger, validation::Validate};
use kind_shapes::{CliConfig, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    let result = match config.command {
        Command::Render {
            manifest,
            output,
            pretty,
            dry_run,
        } => render(&manifest, output, pretty, dry_run).await,
        Command::Check { kind, files } => check_files(kind, &files).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ {} (Category: {:?})", e, e.category());
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        // 根據錯誤類別決定退出碼
        let exit_code = match e.category() {
            ErrorCategory::Config => 1,
            ErrorCategory::Decode => 2,
            ErrorCategory::Io => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn render(
    manifest_path: &str,
    output: Option<String>,
    pretty: Option<bool>,
    dry_run: bool,
) -> Result<(), KindError> {
    tracing::info!("📁 Loading manifest from: {}", manifest_path);
    let mut manifest = Manifest::from_file(manifest_path)?;

    // 應用命令列覆蓋設定
    if let Some(output) = output {
        tracing::info!("🔧 Output path overridden to: {}", output);
        manifest.output.path = output;
    }
    if let Some(pretty) = pretty {
        manifest.output.pretty = Some(pretty);
    }

    // 驗證配置
    manifest.validate()?;
    tracing::info!(
        "✅ Manifest validated: {} playlist(s), {} sandbox(es)",
        manifest.playlists.len(),
        manifest.sandboxes.len()
    );

    let rendered = manifest.render()?;
    let storage = LocalStorage::new(manifest.output.path.clone());

    for kind in &rendered {
        if dry_run {
            println!("🔍 would write {}/{}", storage.base_path(), kind.file_name);
            continue;
        }
        storage.write_file(&kind.file_name, kind.json.as_bytes()).await?;
        println!("📄 {} '{}' -> {}/{}", kind.kind, kind.name, storage.base_path(), kind.file_name);
    }

    tracing::info!("✅ Rendered {} document(s)", rendered.len());
    Ok(())
}

async fn check_files(kind: KindName, files: &[String]) -> Result<(), KindError> {
    let storage = LocalStorage::new(".".to_string());
    let mut first_error = None;

    for file in files {
        let outcome = match storage.read_file(file).await {
            Ok(bytes) => check(kind, &bytes),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(summary) => {
                println!("✅ {}: {} '{}' ({} entries)", file, summary.kind, summary.name, summary.entries);
                for warning in &summary.warnings {
                    println!("   ⚠️  {}", warning);
                }
            }
            Err(e) => {
                println!("❌ {}: {}", file, e.user_friendly_message());
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
