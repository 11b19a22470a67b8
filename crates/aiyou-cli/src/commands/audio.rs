//! `aiyou transcribe`

use std::path::PathBuf;

use aiyou_core::{AudioTranscriptionRequest, Client};
use anyhow::{Context, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct TranscribeArgs {
    pub file: PathBuf,

    /// Spoken language hint, e.g. `fr`
    #[arg(long)]
    pub language: Option<String>,

    /// Output format requested from the server
    #[arg(long)]
    pub format: Option<String>,
}

pub async fn run(client: &Client, args: TranscribeArgs) -> Result<()> {
    let options = (args.language.is_some() || args.format.is_some()).then(|| {
        AudioTranscriptionRequest {
            language: args.language.clone().unwrap_or_default(),
            format: args.format.clone().unwrap_or_default(),
        }
    });

    let response = client
        .transcribe_audio_file(&args.file, options.as_ref())
        .await
        .with_context(|| format!("failed to transcribe {}", args.file.display()))?;
    println!("{}", response.transcript());
    Ok(())
}
