//! `aiyou models` and `aiyou create-model`

use aiyou_core::{Client, ModelProperties, ModelRequest};
use anyhow::{Context, Result};
use clap::Args;

use super::truncate;

#[derive(Args, Debug)]
pub struct CreateModelArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value_t = 2048)]
    pub max_tokens: u32,

    #[arg(long, default_value_t = 0.7)]
    pub temperature: f32,

    #[arg(long, default_value = "")]
    pub provider: String,
}

pub async fn list(client: &Client) -> Result<()> {
    let models = client.get_models().await.context("failed to list models")?;
    for model in &models.models {
        println!(
            "{:<24} {:<24} {}",
            model.id,
            model.name,
            truncate(&model.description, 60)
        );
    }
    println!("{} model(s)", models.models.len());
    Ok(())
}

pub async fn create(client: &Client, args: CreateModelArgs) -> Result<()> {
    let request = ModelRequest {
        name: args.name,
        description: args.description,
        properties: ModelProperties {
            max_tokens: args.max_tokens,
            temperature: args.temperature,
            provider: args.provider,
            capabilities: Vec::new(),
        },
    };
    let created = client
        .create_model(&request)
        .await
        .context("failed to create model")?;
    println!("Created model {} ({})", created.model.id, created.model.name);
    Ok(())
}
