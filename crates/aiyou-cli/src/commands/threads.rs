//! `aiyou threads` and `aiyou delete-thread`

use aiyou_core::{Client, UserThreadsParams};
use anyhow::{Context, Result};
use clap::Args;

use super::{format_time, truncate};

#[derive(Args, Debug)]
pub struct ThreadsArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = 10)]
    pub items_per_page: u32,

    #[arg(long)]
    pub search: Option<String>,
}

pub async fn list(client: &Client, args: ThreadsArgs) -> Result<()> {
    let params = UserThreadsParams {
        page: args.page,
        items_per_page: args.items_per_page,
        search: args.search,
        filter: None,
    };
    let output = client
        .get_user_threads(Some(&params))
        .await
        .context("failed to list threads")?;

    for thread in &output.threads {
        let title = if thread.title.is_empty() {
            &thread.first_message
        } else {
            &thread.title
        };
        println!(
            "{:<28} {:<16} {:<20} {}",
            thread.id,
            format_time(thread.updated_at.or(thread.created_at)),
            truncate(&thread.assistant_name, 20),
            truncate(title, 60)
        );
    }
    println!(
        "Page {} of {} ({} thread(s))",
        output.current_page.max(u64::from(args.page)),
        output.total_pages(),
        output.total_items
    );
    Ok(())
}

pub async fn delete(client: &Client, thread_id: &str) -> Result<()> {
    client
        .delete_thread(thread_id)
        .await
        .with_context(|| format!("failed to delete thread {thread_id}"))?;
    println!("Deleted thread {thread_id}");
    Ok(())
}
