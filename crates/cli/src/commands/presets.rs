use crate::commands::OutputFormat;
use anyhow::Result;
use clap::Args;
use common::config;
use common::types::Preset;

#[derive(Debug, Args)]
pub struct PresetsArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run(args: PresetsArgs) -> Result<()> {
    println!("{}", render(&config::presets(), args.format)?);
    Ok(())
}

pub fn render(presets: &[Preset], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(presets)?,
        OutputFormat::Text => presets
            .iter()
            .map(|p| {
                let clamp = p
                    .clamp_max_percent
                    .map(|max| format!("{max}%"))
                    .unwrap_or_else(|| "-".to_string());
                format!(
                    "{:<12} field={:<12} window={}d clamp={}",
                    p.name, p.date_field, p.window_days, clamp
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    })
}
