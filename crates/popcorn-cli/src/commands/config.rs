use super::{config_path, prompts};
use crate::output::{Output, OutputFormat};
use crate::ui;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use popcorn_config::{Config, PathManager, API_KEY_ENV};
use serde_json::json;
use std::path::Path;

pub async fn run_config(cmd: crate::ConfigCommands, config_override: Option<&Path>, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, config_override, output),
        crate::ConfigCommands::Init { api_key, force } => init_config(api_key, force, config_override, output),
        crate::ConfigCommands::Path => {
            let path = config_path(config_override);
            output.json(&json!({ "path": path.display().to_string() }));
            output.block(path.display().to_string());
            Ok(())
        }
    }
}

fn show_config(full: bool, config_override: Option<&Path>, output: &Output) -> Result<()> {
    let config_file = config_path(config_override);
    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Run 'popcorn config init' to create one. Defaults are shown below.");
    }

    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    let api_key = if full { config.omdb.api_key.clone() } else { config.masked_api_key() };
    let validation = config.validate().err().map(|e| e.to_string());

    match output.format() {
        OutputFormat::Human => {
            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
                Cell::new(config_file.display().to_string()),
            ]);
            table.add_row(vec![Cell::new("OMDb URL"), Cell::new(&config.omdb.base_url)]);
            table.add_row(vec![Cell::new("API Key"), Cell::new(&api_key)]);
            table.add_row(vec![
                Cell::new("Timeout"),
                Cell::new(format!("{}s", config.omdb.timeout_seconds)),
            ]);
            table.add_row(vec![
                Cell::new("Min Query Length"),
                Cell::new(config.search.min_query_length),
            ]);
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            output.block(table.to_string());

            match &validation {
                None => output.success("Configuration is valid"),
                Some(reason) => output.warn(reason),
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "omdb": {
                    "base_url": config.omdb.base_url,
                    "api_key": api_key,
                    "timeout_seconds": config.omdb.timeout_seconds,
                },
                "search": { "min_query_length": config.search.min_query_length },
                "valid": validation.is_none(),
                "error": validation,
            }));
        }
    }
    Ok(())
}

fn init_config(api_key: Option<String>, force: bool, config_override: Option<&Path>, output: &Output) -> Result<()> {
    let config_file = config_path(config_override);
    let interactive = ui::is_interactive();

    if config_file.exists() && !force {
        if !interactive {
            return Err(color_eyre::eyre::eyre!(
                "{} already exists (use --force to overwrite)",
                config_file.display()
            ));
        }
        if !prompts::prompt_yes_no(&format!("Overwrite {}?", config_file.display()), false)? {
            output.info("Keeping existing configuration");
            return Ok(());
        }
    }

    let mut config = Config::default();
    let api_key = match api_key {
        Some(key) => Some(key),
        None if interactive => {
            output.info(format!(
                "Get a free key at {}. Leave empty to use {} instead.",
                "https://www.omdbapi.com/apikey.aspx".cyan(),
                API_KEY_ENV
            ));
            let key = prompts::prompt_secret("OMDb API key")?;
            let base_url = prompts::prompt_string("OMDb base URL", Some(&config.omdb.base_url))?;
            if !base_url.trim().is_empty() {
                config.omdb.base_url = base_url.trim().to_string();
            }
            Some(key)
        }
        None => None,
    };
    if let Some(key) = entered_api_key(api_key) {
        config.omdb.api_key = key;
    }

    if config_override.is_none() {
        PathManager::default()
            .ensure_directories()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create config directories: {}", e))?;
    }
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write {}: {}", config_file.display(), e))?;
    output.success(format!("Configuration written to {}", config_file.display()));

    if !config.is_api_key_configured() {
        output.warn(format!(
            "No API key stored; set omdb.api_key in the file or export {}",
            API_KEY_ENV
        ));
    }
    Ok(())
}

/// A blank answer keeps the placeholder so `POPCORN_OMDB_API_KEY` can supply the key.
fn entered_api_key(answer: Option<String>) -> Option<String> {
    answer
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}
