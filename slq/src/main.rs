//! slq: Sleuth Query - CLI for building and checking forensic search queries.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "slq")]
#[command(about = "Sleuth Query - build and check forensic search queries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a query from field expressions and print its JSON
    #[command(visible_alias = "b")]
    Build {
        /// Field expressions, one group each (e.g. fileName~=secret, eventTimestamp:last=P7D)
        #[arg(required = true)]
        filters: Vec<String>,

        /// Combine groups with OR instead of AND
        #[arg(long = "any")]
        any: bool,

        /// Results per page (default: from config)
        #[arg(short = 'n', long = "page-size")]
        page_size: Option<u32>,

        /// Page number
        #[arg(short = 'p', long = "page-number")]
        page_number: Option<u32>,

        /// Continuation token from a previous page
        #[arg(long = "page-token")]
        page_token: Option<String>,

        /// Field to sort by
        #[arg(short = 's', long = "sort-key")]
        sort_key: Option<String>,

        /// Sort direction: asc or desc
        #[arg(short = 'd', long = "sort-dir")]
        sort_dir: Option<String>,

        /// Wire dialect: v1 or v2 (default: from config)
        #[arg(long = "dialect")]
        dialect: Option<String>,

        /// Pretty-print the JSON
        #[arg(long = "pretty")]
        pretty: bool,
    },

    /// Validate a query JSON document and print it back
    Decode {
        /// File to read (reads stdin if not provided)
        file: Option<String>,

        /// Re-emit in another dialect: v1 or v2
        #[arg(long = "to")]
        to: Option<String>,

        /// Pretty-print the JSON
        #[arg(long = "pretty")]
        pretty: bool,
    },

    /// List searchable fields
    Fields {
        /// Catalog to list: file-event or alert (default: both)
        #[arg(short = 'k', long = "kind")]
        kind: Option<String>,
    },

    /// Show the resolved client configuration
    Config {
        /// Config file to read instead of the resolved location
        #[arg(long = "path")]
        path: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("SLQ_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { filters, any, page_size, page_number, page_token, sort_key, sort_dir, dialect, pretty } => {
            let opts = commands::BuildOptions {
                any,
                page_size,
                page_number,
                page_token,
                sort_key,
                sort_dir,
                dialect,
                pretty,
            };
            commands::build(&filters, &opts)
        }
        Commands::Decode { file, to, pretty } => commands::decode(file.as_deref(), to.as_deref(), pretty),
        Commands::Fields { kind } => commands::fields(kind.as_deref()),
        Commands::Config { path } => commands::config(path.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
