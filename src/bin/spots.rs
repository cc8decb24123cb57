//! CLI entry point for the `spots` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use spot_engine::cli::commands::{self, NewPost};
use spot_engine::config;
use spot_engine::engine::{SortMode, TagFilter, ViewRequest};
use spot_engine::types::{now_millis, GeoPoint, SpotError};

#[derive(Parser)]
#[command(
    name = "spots",
    about = "Spot engine CLI: cluster and rank nearby ephemeral stories"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// Path to a TOML config file (otherwise SPOTS_CONFIG or ./spots.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty feed snapshot
    Create {
        /// Path to the feed JSON file to create
        file: PathBuf,
    },
    /// Add a story to the feed
    Add {
        /// Path to the feed JSON file
        file: PathBuf,
        /// Story ID
        id: String,
        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
        /// Author user ID
        #[arg(long, default_value = "anonymous")]
        author: String,
        /// Place name
        #[arg(long, default_value = "")]
        place: String,
        /// Caption text
        #[arg(long, default_value = "")]
        caption: String,
        /// URL of the uploaded media
        #[arg(long)]
        media_url: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        /// Creation time (Unix milliseconds), defaults to now
        #[arg(long)]
        created_at: Option<u64>,
    },
    /// Like a story
    Like {
        /// Path to the feed JSON file
        file: PathBuf,
        /// Story ID
        post_id: String,
        /// User ID
        user_id: String,
    },
    /// Remove a like from a story
    Unlike {
        /// Path to the feed JSON file
        file: PathBuf,
        /// Story ID
        post_id: String,
        /// User ID
        user_id: String,
    },
    /// Report a story for moderation
    Report {
        /// Path to the feed JSON file
        file: PathBuf,
        /// Story ID
        post_id: String,
        /// User ID
        user_id: String,
    },
    /// Delete a story
    Delete {
        /// Path to the feed JSON file
        file: PathBuf,
        /// Story ID
        post_id: String,
    },
    /// Remove expired stories from the feed
    Sweep {
        /// Path to the feed JSON file
        file: PathBuf,
        /// Reference time (Unix milliseconds), defaults to now
        #[arg(long)]
        now: Option<u64>,
    },
    /// Compute and list spots
    Spots {
        /// Path to the feed JSON file
        file: PathBuf,
        /// Sort: unfiltered, proximity, trending
        #[arg(long, default_value = "unfiltered")]
        sort: String,
        /// Reference point for proximity sort, "LAT,LON"
        #[arg(long, allow_hyphen_values = true)]
        near: Option<String>,
        /// Only spots with a tag containing this text ("All" disables)
        #[arg(long, default_value = "All")]
        tag: String,
        /// Reference time (Unix milliseconds), defaults to now
        #[arg(long)]
        now: Option<u64>,
        /// Maximum spots to show
        #[arg(long, default_value = "50")]
        limit: usize,
    },
    /// Statistics about the feed
    Stats {
        /// Path to the feed JSON file
        file: PathBuf,
        /// Reference time (Unix milliseconds), defaults to now
        #[arg(long)]
        now: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let config = match config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(exit_code(&e));
        }
    };

    let result = match cli.command {
        Commands::Create { file } => commands::cmd_create(&file),
        Commands::Add {
            file,
            id,
            latitude,
            longitude,
            author,
            place,
            caption,
            media_url,
            tags,
            created_at,
        } => {
            let tags: Vec<String> = tags
                .map(|s| {
                    s.split(',')
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            let new_post = NewPost {
                id,
                author_id: author,
                latitude,
                longitude,
                place_name: place,
                caption,
                media_url,
                tags,
                created_at,
            };
            commands::cmd_add(&file, &config, new_post, json)
        }
        Commands::Like {
            file,
            post_id,
            user_id,
        } => commands::cmd_like(&file, &config, &post_id, &user_id, json),
        Commands::Unlike {
            file,
            post_id,
            user_id,
        } => commands::cmd_unlike(&file, &config, &post_id, &user_id, json),
        Commands::Report {
            file,
            post_id,
            user_id,
        } => commands::cmd_report(&file, &config, &post_id, &user_id, json),
        Commands::Delete { file, post_id } => commands::cmd_delete(&file, &config, &post_id, json),
        Commands::Sweep { file, now } => {
            commands::cmd_sweep(&file, &config, now.unwrap_or_else(now_millis), json)
        }
        Commands::Spots {
            file,
            sort,
            near,
            tag,
            now,
            limit,
        } => {
            let mode = match SortMode::from_name(&sort) {
                Some(mode) => mode,
                None => {
                    eprintln!("Invalid sort mode: {}", sort);
                    process::exit(3);
                }
            };
            let reference = match near.as_deref().map(GeoPoint::parse).transpose() {
                Ok(reference) => reference,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(3);
                }
            };
            let request = ViewRequest {
                mode,
                reference,
                tag_filter: TagFilter::parse(&tag),
            };
            commands::cmd_spots(
                &file,
                &config,
                now.unwrap_or_else(now_millis),
                &request,
                limit,
                json,
            )
        }
        Commands::Stats { file, now } => {
            commands::cmd_stats(&file, &config, now.unwrap_or_else(now_millis), json)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(exit_code(&e));
    }
}

fn exit_code(e: &SpotError) -> i32 {
    match e {
        SpotError::Io(_) => 1,
        SpotError::Snapshot(_) | SpotError::ConfigParse(_) => 2,
        SpotError::InvalidSortMode(_)
        | SpotError::InvalidCoordinates(_)
        | SpotError::InvalidConfig(_)
        | SpotError::EmptyPostId
        | SpotError::NonFiniteCoordinates { .. }
        | SpotError::InvalidLifetime { .. } => 3,
        SpotError::PostNotFound(_) => 4,
        _ => 5,
    }
}
