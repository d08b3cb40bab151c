use std::path::PathBuf;

use clap::Parser;
use eyre::WrapErr;
use sono_docs::page::DEFAULT_TITLE;
use sono_docs::{PageOptions, bundled_catalog, generate, load_catalog};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sonodoc", version, about = "Sono library reference generator")]
struct Args {
    /// Library metadata as JSON (defaults to the bundled standard library)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
    /// Write the page here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Page title
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,
    /// Stylesheet to link from the page
    #[arg(long)]
    stylesheet: Option<String>,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let catalog = match &args.input {
        Some(path) => load_catalog(path).wrap_err_with(|| format!("loading {}", path.display()))?,
        None => bundled_catalog()?,
    };
    let options = PageOptions {
        title: args.title,
        stylesheet: args.stylesheet,
    };
    let html = generate(&catalog, &options)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, html).wrap_err_with(|| format!("writing {}", path.display()))?;
            info!(
                "Wrote {} libraries to {}",
                catalog.libraries.len(),
                path.display()
            );
        }
        None => print!("{html}"),
    }
    Ok(())
}
