//! `aiyou assistants`

use aiyou_core::Client;
use anyhow::{Context, Result};

use super::{format_time, truncate};

pub async fn run(client: &Client) -> Result<()> {
    let assistants = client
        .get_user_assistants()
        .await
        .context("failed to list assistants")?;

    if assistants.members.is_empty() {
        println!("No assistants.");
        return Ok(());
    }
    for assistant in &assistants.members {
        println!(
            "{:<24} {:<32} {:<16} {}",
            assistant.assistant_id,
            truncate(&assistant.name, 32),
            assistant.model.as_deref().unwrap_or("-"),
            format_time(assistant.updated_at.or(assistant.created_at))
        );
    }
    println!("{} assistant(s)", assistants.total_items.max(assistants.members.len() as u64));
    Ok(())
}
