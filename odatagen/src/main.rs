//! Command-line generator for OData v4 client bindings.
//!
//! ## Usage
//!
//! ```bash
//! # Fetch metadata from a live service and write ./src/trippin/model_definitions.rs
//! odatagen --service-url https://services.odata.org/TripPinRESTierService --out-dir src/trippin
//!
//! # Generate from a saved document, one namespace only
//! odatagen --input metadata.xml --namespace Trippin --out-dir src/trippin
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use odatagen::codegen::options::{DEFAULT_CLIENT_CRATE, DEFAULT_FILE_NAME};
use odatagen::codegen::{Generator, GeneratorOptions};
use odatagen::{FetchOptions, MetadataFetcher};

/// Generate typed Rust bindings from an OData v4 `$metadata` document
#[derive(Parser, Debug)]
#[command(name = "odatagen", version, about, long_about = None)]
struct Cli {
    /// Service root URL; `$metadata` is appended
    #[arg(long, env = "ODATAGEN_SERVICE_URL", value_name = "URL", conflicts_with = "input")]
    service_url: Option<String>,

    /// Read the metadata document from a file instead of fetching it
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Directory to write the generated file into; its name becomes the module name
    #[arg(long, env = "ODATAGEN_OUT_DIR", value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Namespace to render (all namespaces when omitted)
    #[arg(long, value_name = "NAMESPACE")]
    namespace: Option<String>,

    /// Name of the generated file
    #[arg(long, default_value = DEFAULT_FILE_NAME)]
    file_name: String,

    /// Crate path the generated bindings import the REST client from
    #[arg(long, env = "ODATAGEN_CLIENT_CRATE", default_value = DEFAULT_CLIENT_CRATE)]
    client_crate: String,

    /// Metadata request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

async fn load_metadata(cli: &Cli) -> anyhow::Result<Vec<u8>> {
    match (&cli.service_url, &cli.input) {
        (Some(service_url), _) => {
            let options = FetchOptions::new().timeout(Duration::from_secs(cli.timeout_secs));
            let fetcher = MetadataFetcher::with_options(options)?;
            Ok(fetcher.fetch(service_url).await?)
        }
        (None, Some(input)) => std::fs::read(input)
            .with_context(|| format!("failed to read metadata from {}", input.display())),
        (None, None) => anyhow::bail!("either --service-url or --input is required"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let bytes = load_metadata(&cli).await?;
    let model = odatagen::schema::parse_metadata(&bytes).context("unusable metadata document")?;
    tracing::info!("Linked namespaces: {}", model.namespaces().join(", "));

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;

    let options = GeneratorOptions::new()
        .client_crate(cli.client_crate.as_str())
        .file_name(cli.file_name.as_str());
    let path = Generator::with_options(&model, options)
        .write_to_dir(cli.namespace.as_deref(), &cli.out_dir)?;

    println!("{}", path.display());

    Ok(())
}
