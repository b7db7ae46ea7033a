use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::parse::parse_json_detailed;

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// File holding the model output; reads stdin when omitted.
    pub path: Option<PathBuf>,
    /// Wrap the result with truncation and repair flags.
    #[arg(long)]
    pub detailed: bool,
}

pub fn run(args: ParseArgs) -> AppResult<()> {
    let text = match &args.path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let outcome = parse_json_detailed(&text)?;
    let rendered = if args.detailed {
        json!({
            "data": outcome.data,
            "truncated": outcome.truncated,
            "repaired": outcome.repaired,
        })
    } else {
        outcome.data
    };

    let pretty = serde_json::to_string_pretty(&rendered)
        .map_err(|err| AppError::Io(io::Error::other(err)))?;
    println!("{pretty}");
    Ok(())
}
