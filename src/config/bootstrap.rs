//! Interactive first-run setup.
//!
//! Prompts for an API key, lets the operator pick a team and a resolved
//! workflow status from numbered lists fetched through the tracker, and
//! writes the config file. The sync pipeline itself never prompts; this flow
//! runs only when no config file exists.

use super::{save_config, ConfigError, SyncConfig};
use crate::tracker::{LinearClient, TrackerClient};
use std::io::{BufRead, Write};

/// Run the interactive setup and persist the resulting config.
pub async fn bootstrap_config() -> Result<SyncConfig, ConfigError> {
    println!("No config file found, creating...");
    let api_key = prompt(
        "Enter Linear API key (https://linear.app/settings/account/security/api-keys/new): ",
    )?;

    let client = LinearClient::new(api_key.clone());

    println!("Fetching teams...");
    let teams = client.list_teams().await?;
    for (index, team) in teams.iter().enumerate() {
        println!("{index}: {}", team.name);
    }
    let selection = prompt("Select a default team [0]: ")?;
    let team = teams
        .get(parse_selection(&selection)?)
        .ok_or_else(|| ConfigError::InvalidSelection(selection.clone()))?;

    println!("Fetching states...");
    let states = client.list_workflow_states(&team.id).await?;
    for (index, state) in states.iter().enumerate() {
        println!("{index}: {}", state.name);
    }
    let selection =
        prompt("Select a default status when previously generated todos are not found [0]: ")?;
    let state = states
        .get(parse_selection(&selection)?)
        .ok_or_else(|| ConfigError::InvalidSelection(selection.clone()))?;

    let config = SyncConfig {
        api_key,
        team_id: team.id.clone(),
        resolved_state_id: state.id.clone(),
    };
    let path = save_config(&config)?;
    println!("Created config file at {}", path.display());
    Ok(config)
}

/// Read one non-empty line from stdin.
fn prompt(message: &str) -> Result<String, ConfigError> {
    let mut stdout = std::io::stdout();
    stdout.write_all(message.as_bytes())?;
    stdout.flush()?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }
    Err(ConfigError::Io(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "no input",
    )))
}

/// Parse a numbered-menu selection; an empty answer means the default `0`.
fn parse_selection(input: &str) -> Result<usize, ConfigError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|_| ConfigError::InvalidSelection(input.to_string()))
}
