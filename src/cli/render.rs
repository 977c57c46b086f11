//! `render` command: turn assistant-style text into the safe HTML fragment.

use std::error::Error;
use std::path::PathBuf;

use tokio::io::AsyncReadExt;

use crate::ui::markdown::{classify, render_response};

pub async fn run_render(file: Option<PathBuf>, classify_only: bool) -> Result<(), Box<dyn Error>> {
    let text = match file {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| format!("Failed to read {}: {err}", path.display()))?,
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            text
        }
    };
    println!("{}", render_text(&text, classify_only));
    Ok(())
}

pub fn render_text(text: &str, classify_only: bool) -> String {
    if classify_only {
        classify(text).to_string()
    } else {
        render_response(text).html
    }
}
