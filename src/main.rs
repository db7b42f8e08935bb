//! phone-scanner - upload server for documents scanned with a phone
//!
//! CLI entry point

use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use phone_scanner::{
    exit_codes, list_uploads, verbosity_level, Cli, Commands, Config, ConvertArgs, ConvertOptions,
    ImageConverter, InfoArgs, ListArgs, NetworkInfo, ServeArgs, WebServer,
};

fn main() {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Serve(ServeArgs::default()));

    let result = match &command {
        Commands::Serve(args) => run_serve(args, cli.verbose),
        Commands::Convert(args) => run_convert(args, cli.verbose),
        Commands::List(args) => run_list(args),
        Commands::Info(args) => run_info(args),
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_codes::GENERAL_ERROR
        }
    });
}

/// Install the global tracing subscriber; `RUST_LOG` wins over `level`
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Load the config file; an explicit path must load, the search path may not exist
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(Config::load_from_path(path)?),
        None => Ok(Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: {}, using defaults", e);
            Config::default()
        })),
    }
}

// ============ Serve Command ============

fn run_serve(args: &ServeArgs, verbose: u8) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;

    let mut overrides = args.overrides();
    overrides.log_level = verbosity_level(verbose).map(str::to_string);
    init_logging(overrides.log_level.as_deref().unwrap_or(&config.logging.level));

    let server_config = config.merge_with_cli(&overrides)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let server = WebServer::with_config(server_config);
        server.run().await.map_err(|e| anyhow::anyhow!(e))
    })
}

// ============ Convert Command ============

fn run_convert(args: &ConvertArgs, verbose: u8) -> anyhow::Result<()> {
    init_logging(verbosity_level(verbose).unwrap_or("warn"));

    if !args.input.exists() {
        eprintln!("Error: Input file does not exist: {}", args.input.display());
        std::process::exit(exit_codes::INPUT_NOT_FOUND);
    }

    let converter = ImageConverter::new(ConvertOptions::with_dpi(args.dpi));
    let output = converter.convert_to_pdf(&args.input, args.output.as_deref())?;

    println!("Converted: {} -> {}", args.input.display(), output.display());
    Ok(())
}

// ============ List Command ============

fn run_list(args: &ListArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let dir = args
        .upload_dir
        .clone()
        .unwrap_or(config.storage.upload_dir);

    let files = list_uploads(&dir, args.limit)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    if files.is_empty() {
        println!("No files have been uploaded yet.");
        return Ok(());
    }

    println!("Uploads in {} ({}):", dir.display(), files.len());
    for file in &files {
        println!(
            "  {}  {:>10.1} KB  {}",
            file.modified_display(),
            file.size_kb(),
            file.name
        );
    }
    Ok(())
}

// ============ Info Command ============

fn run_info(args: &InfoArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let network = NetworkInfo::resolve(config.server.port);

    println!("phone-scanner v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Network:");
    println!("  Hostname: {}", network.hostname);
    println!("  Local IP: {}", network.ip);
    println!("  URL:      {}", network.url);
    println!();
    println!("Server:");
    println!("  Bind:       {}:{}", config.server.bind, config.server.port);
    println!("  Upload dir: {}", config.storage.upload_dir.display());
    println!("  Max upload: {} MB", config.server.upload_limit_mb);
    println!("  PDF DPI:    {}", config.convert.dpi);
    println!();
    println!("Config File Locations:");
    for path in Config::search_paths() {
        let state = if path.is_file() { "found" } else { "not found" };
        println!("  {} ({})", path.display(), state);
    }

    Ok(())
}
