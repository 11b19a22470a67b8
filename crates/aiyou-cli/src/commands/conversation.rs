//! `aiyou save-conversation` and `aiyou conversation`

use aiyou_core::{Client, SaveConversationRequest};
use anyhow::{Context, Result};
use clap::Args;

use super::format_time;

#[derive(Args, Debug)]
pub struct SaveConversationArgs {
    #[arg(long)]
    pub assistant_id: String,

    /// Conversation transcript
    #[arg(long)]
    pub conversation: String,

    #[arg(long, default_value = "")]
    pub title: String,

    #[arg(long, default_value = "")]
    pub first_message: String,

    #[arg(long, default_value = "")]
    pub model_name: String,

    /// Start a new thread rather than appending
    #[arg(long)]
    pub new_thread: bool,
}

pub async fn save(client: &Client, args: SaveConversationArgs) -> Result<()> {
    let request = SaveConversationRequest {
        assistant_id: args.assistant_id,
        conversation: args.conversation,
        title: args.title,
        first_message: args.first_message,
        model_name: args.model_name,
        is_new_app_thread: args.new_thread,
        ..Default::default()
    };
    let saved = client
        .save_conversation(&request)
        .await
        .context("failed to save conversation")?;
    println!("Saved conversation as thread {}", saved.id);
    Ok(())
}

pub async fn show(client: &Client, thread_id: &str) -> Result<()> {
    let thread = client
        .get_conversation(thread_id)
        .await
        .with_context(|| format!("failed to fetch conversation {thread_id}"))?;

    println!("Thread:    {}", thread.id);
    println!("Title:     {}", thread.title);
    println!("Assistant: {}", thread.assistant_name);
    println!("Created:   {}", format_time(thread.created_at));
    println!("Updated:   {}", format_time(thread.updated_at));
    if !thread.content.is_empty() {
        println!();
        println!("{}", thread.content);
    }
    Ok(())
}
