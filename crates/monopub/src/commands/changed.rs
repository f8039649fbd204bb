use std::path::Path;

use monopub_operations::operations::{ChangedInput, ChangedOperation};
use monopub_operations::providers::{FileSystemProjectProvider, Git2Provider};

use super::ChangedArgs;
use crate::error::{CliError, Result};

pub(crate) fn run(args: ChangedArgs, start_path: &Path) -> Result<()> {
    let operation = ChangedOperation::new(FileSystemProjectProvider::new(), Git2Provider::new());
    let output = operation.execute(
        start_path,
        ChangedInput {
            ignore: args.ignore,
            independent: args.independent,
        },
    )?;

    if output.packages.is_empty() {
        return Err(CliError::NothingChanged);
    }

    match &output.last_tag {
        Some(tag) => eprintln!("Changes since {tag}:"),
        None => eprintln!("No previous release found, every package is new:"),
    }
    for package in &output.packages {
        if package.private {
            println!("{} (private)", package.name);
        } else {
            println!("{}", package.name);
        }
    }
    Ok(())
}
