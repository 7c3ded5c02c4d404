use anyhow::{Context, Result};
use clap::Parser;

use codenav::cli::{render_tree, CliArgs, OutputFormat};
use codenav::config::OutlineConfig;
use codenav::runtime::OutlineEngine;

// ============================================================================
// MAIN - Entry point
// ============================================================================

fn main() -> Result<()> {
    codenav::tracing::init();

    let run = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;

    let mut config = OutlineConfig::load();
    if let Some(enabled) = run.use_xml_comments {
        config.use_xml_comments = enabled;
    }

    let source = std::fs::read_to_string(&run.file)
        .with_context(|| format!("Failed to read {}", run.file.display()))?;

    let mut engine = OutlineEngine::new(config).context("Failed to start outline engine")?;
    engine.activate(run.file.clone(), source)?;
    engine.settle()?;

    if let Some(caret) = run.caret {
        engine.caret_moved(caret)?;
    }

    let document = engine.document()?;
    match run.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(document)
                .context("Failed to serialize outline")?;
            println!("{}", json);
        }
        OutputFormat::Tree => print!("{}", render_tree(document)),
    }

    engine.dispose();
    Ok(())
}
