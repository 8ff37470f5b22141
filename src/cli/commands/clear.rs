//! Clear command - delete a difficulty's stored table

use anyhow::{Context, Result};
use clap::Parser;

use crate::{cli::config::StoreArgs, ports::ValueTableRepository};

#[derive(Parser, Debug)]
#[command(about = "Delete a difficulty's stored table")]
pub struct ClearArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

pub fn execute(args: ClearArgs) -> Result<()> {
    let repository = args.store.repository();
    repository
        .clear()
        .with_context(|| format!("failed to clear {}", repository.path().display()))?;
    println!(
        "Cleared {} table ({})",
        args.store.difficulty,
        repository.path().display()
    );
    Ok(())
}
