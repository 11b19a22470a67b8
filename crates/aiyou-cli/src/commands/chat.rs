//! `aiyou chat`

use std::io::Write;

use aiyou_core::{ChatCompletionRequest, Client, Message};
use anyhow::{Context, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct ChatArgs {
    pub assistant_id: String,
    pub message: String,

    /// Print the answer as it is generated
    #[arg(long)]
    pub stream: bool,

    /// System prompt
    #[arg(long)]
    pub system: Option<String>,

    #[arg(long, default_value_t = 0.7)]
    pub temperature: f32,

    /// Continue an existing thread
    #[arg(long)]
    pub thread_id: Option<String>,
}

impl ChatArgs {
    fn request(&self) -> ChatCompletionRequest {
        let mut request =
            ChatCompletionRequest::new(vec![Message::text("user", &self.message)], &self.assistant_id);
        request.temperature = self.temperature;
        request.prompt_system = self.system.clone().unwrap_or_default();
        request.thread_id = self.thread_id.clone();
        request
    }
}

pub async fn run(client: &Client, args: ChatArgs) -> Result<()> {
    if !args.stream {
        let response = client
            .chat_completion(args.request())
            .await
            .context("chat completion failed")?;
        println!("{}", response.text());
        if let Some(usage) = response.usage {
            tracing::info!(
                "Tokens: {} prompt, {} completion",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }
        return Ok(());
    }

    let mut reader = client
        .chat_completion_stream(args.request())
        .await
        .context("failed to start streaming chat completion")?;
    let mut stdout = std::io::stdout();
    while let Some(fragment) = reader.read_chunk().await? {
        write!(stdout, "{}", fragment.delta_text())?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    reader.close();
    Ok(())
}
