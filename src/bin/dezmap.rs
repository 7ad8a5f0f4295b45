//! dezmap CLI - convert a .dez design file into per-table mapping documents
//!
//! Entities are chosen with `--entity` (repeatable), `--all`, or an
//! interactive numbered prompt.

use clap::Parser;
use dezmap::config::{MappingConfig, OutputFormat};
use dezmap::error::ExtractError;
use dezmap::selection::{prompt_selection, select_by_names};
use dezmap::sink::{DocumentSink, JsonDocumentSink, NdjsonWriter, XlsxDocumentSink};
use dezmap::{extract_model, list_versions, Entity};
use std::error::Error;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dezmap")]
#[command(version, about = "Generate mapping specifications from a .dez design file", long_about = None)]
struct Cli {
    /// Path to the .dez design file
    input: PathBuf,

    /// Entity (table) to export; repeat for several. Skips the prompt.
    #[arg(short, long = "entity", value_name = "NAME")]
    entities: Vec<String>,

    /// Export every entity without prompting
    #[arg(short, long, conflicts_with = "entities")]
    all: bool,

    /// Config file (default: ./dezmap.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory - overrides config file and DEZMAP_OUTPUT_DIR
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (xlsx, json) - overrides config file and DEZMAP_FORMAT
    #[arg(short, long)]
    format: Option<String>,

    /// Saved design version to document (default: the current version)
    #[arg(long, value_name = "VERSION")]
    design_version: Option<String>,

    /// List the saved design versions and exit
    #[arg(long)]
    list_versions: bool,

    /// List entity names and exit
    #[arg(short, long)]
    list: bool,

    /// With --list, print each extracted entity as one JSON line
    #[arg(long, requires = "list")]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    dotenv::dotenv().ok();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("dezmap=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = MappingConfig::discover(cli.config.as_deref())?
        .with_env()?
        .with_cli(cli.output, cli.format.as_deref())?;

    let xml = std::fs::read_to_string(&cli.input).map_err(|source| ExtractError::Io {
        path: cli.input.clone(),
        source,
    })?;

    if cli.list_versions {
        let document = roxmltree::Document::parse(&xml).map_err(ExtractError::from)?;
        for version in list_versions(&document) {
            println!("{:>8}  {:<20} {}", version.label(), version.date, version.description);
        }
        return Ok(());
    }

    let (entities, diagrams) = extract_model(&xml, cli.design_version.as_deref())?;

    if cli.list {
        return list_entities(&entities, cli.json);
    }

    if entities.is_empty() {
        println!("No entities found in {}", cli.input.display());
        return Ok(());
    }

    let selected: Vec<&Entity> = if !cli.entities.is_empty() {
        select_by_names(&entities, &cli.entities)?
    } else if cli.all || !io::stdin().is_terminal() {
        entities.iter().collect()
    } else {
        prompt_selection(&entities, &diagrams, io::stdin().lock(), io::stdout())?
    };

    println!(
        "📄 Writing {} {} document(s) to {}...",
        selected.len(),
        config.format,
        config.output_dir.display()
    );

    let mut sink: Box<dyn DocumentSink> = match config.format {
        OutputFormat::Xlsx => Box::new(XlsxDocumentSink::new(&config.output_dir, config.xlsx_layout())),
        OutputFormat::Json => Box::new(JsonDocumentSink::new(&config.output_dir)),
    };

    for entity in &selected {
        let path = sink.write_entity(entity)?;
        println!("  ✓ wrote {}", path.display());
    }

    println!("\n✨ Done! {} document(s) written", selected.len());
    Ok(())
}

fn list_entities(entities: &[Entity], json: bool) -> Result<(), Box<dyn Error>> {
    if json {
        let mut writer = NdjsonWriter::new(io::stdout().lock());
        writer.write_all(entities)?;
        writer.flush()?;
        return Ok(());
    }

    for (i, entity) in entities.iter().enumerate() {
        println!("{:3}. {} ({} fields)", i + 1, entity.name, entity.fields.len());
    }
    Ok(())
}
