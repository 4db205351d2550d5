use artwork_picker_core::{
    ArticClient, Artwork, ArtworkTable, CatalogConfig, FetchError, SelectionProgress,
    TableSnapshot, open_catalog_table,
};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Parser)]
#[command(name = "artwork-picker")]
#[command(about = "Browse the Art Institute of Chicago catalog and select rows across pages")]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the catalog API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Minimum delay between two catalog requests, in milliseconds
    #[arg(long, global = true)]
    cooldown_ms: Option<u64>,
    /// Print every catalog request made before exiting
    #[arg(long, global = true)]
    show_requests: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of the catalog
    Page {
        /// Page number, starting at 1
        number: u32,
    },
    /// Select the first COUNT rows starting at a page
    Select {
        /// Number of rows to select
        count: usize,
        /// Page the selection starts on
        #[arg(long, default_value = "1")]
        from_page: u32,
        /// Print the selection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive browsing: n, p, g N, t I, s COUNT, l, q
    Browse,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            // Override via RUST_LOG, e.g. RUST_LOG=artwork_picker_core=debug
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artwork_picker_core=warn,artwork_picker=info".into()),
        )
        .init();
}

fn load_config(cli: &Cli) -> Result<CatalogConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => CatalogConfig::load_from(path)?,
        None => CatalogConfig::load()?,
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(cooldown_ms) = cli.cooldown_ms {
        config.request_cooldown_ms = cooldown_ms;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    debug!(?config, "Using configuration");

    let outcome = match cli.command {
        Commands::Page { number } => show_page(&config, number).await,
        Commands::Select {
            count,
            from_page,
            json,
        } => select(&config, count, from_page, json).await,
        Commands::Browse => browse(&config).await,
    };

    if cli.show_requests {
        print_request_history();
    }

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn show_page(config: &CatalogConfig, number: u32) -> Result<(), Box<dyn std::error::Error>> {
    let mut table = open_catalog_table(config).await?;
    if number != 1 {
        table.go_to_page(number).await?;
    }
    print_snapshot(&table.snapshot());
    Ok(())
}

async fn select(
    config: &CatalogConfig,
    count: usize,
    from_page: u32,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut table = open_catalog_table(config).await?;
    if from_page != 1 {
        table.go_to_page(from_page).await?;
    }

    let selected = select_with_progress(&mut table, count).await?;
    if json {
        let rows = table.selection().to_vec();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("Selected {} of {} requested rows:", selected, count);
        for (i, artwork) in table.selection().iter().enumerate() {
            println!("  {:>5}. {}", i + 1, format_artwork(artwork));
        }
    }
    Ok(())
}

async fn select_with_progress(
    table: &mut ArtworkTable<ArticClient>,
    count: usize,
) -> Result<usize, FetchError> {
    let (progress_tx, mut progress_rx) =
        tokio::sync::mpsc::unbounded_channel::<SelectionProgress>();

    let printer = tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            if progress.pages_fetched > 0 {
                eprintln!(
                    "  page {}: {}/{} rows",
                    progress.last_page, progress.collected, progress.target
                );
            }
        }
    });

    let result = table.select_rows_with_progress(count, &progress_tx).await;
    drop(progress_tx);
    let _ = printer.await;
    result
}

async fn browse(config: &CatalogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut table = open_catalog_table(config).await?;
    print_snapshot(&table.snapshot());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            continue;
        };
        let argument = parts.next();

        let result = match command {
            "q" | "quit" => break,
            "n" | "next" => table.next_page().await.map(|moved| {
                if !moved {
                    println!("Already on the last page");
                }
            }),
            "p" | "prev" => table.prev_page().await.map(|moved| {
                if !moved {
                    println!("Already on the first page");
                }
            }),
            "g" | "goto" => match argument.and_then(|arg| arg.parse::<u32>().ok()) {
                Some(page) => table.go_to_page(page).await,
                None => {
                    println!("Usage: g <page>");
                    continue;
                }
            },
            "t" | "toggle" => {
                toggle_resident(&mut table, argument);
                continue;
            }
            "s" | "select" => {
                let input = argument.and_then(|arg| arg.parse::<i64>().ok());
                match input {
                    Some(count) if count > 0 => {
                        select_with_progress(&mut table, count as usize).await.map(|n| {
                            println!("{} rows selected", n);
                        })
                    }
                    _ => table.select_rows_from_input(input).await.map(|n| {
                        println!("{} rows selected", n);
                    }),
                }
            }
            "l" | "list" => {
                for artwork in table.selection().iter() {
                    println!("  {}", format_artwork(artwork));
                }
                println!("{} selected", table.selection().len());
                continue;
            }
            _ => {
                println!("Commands: n, p, g <page>, t <row>, s <count>, l, q");
                continue;
            }
        };

        match result {
            Ok(()) => print_snapshot(&table.snapshot()),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
    Ok(())
}

fn toggle_resident(table: &mut ArtworkTable<ArticClient>, argument: Option<&str>) {
    let Some(index) = argument.and_then(|arg| arg.parse::<usize>().ok()) else {
        println!("Usage: t <row>");
        return;
    };
    let Some(row) = index.checked_sub(1).and_then(|i| table.resident_row(i)).cloned() else {
        println!("No row {} on this page", index);
        return;
    };
    let selected = table.toggle_row(&row);
    println!(
        "{} {}",
        if selected { "Selected" } else { "Unselected" },
        format_artwork(&row)
    );
}

fn print_snapshot(snapshot: &TableSnapshot) {
    println!(
        "Page {} of {} ({} selected)",
        snapshot.current_page, snapshot.total_pages, snapshot.selected_count
    );
    if let Some(fetched_at) = snapshot.fetched_at {
        println!("  fetched {}", fetched_at);
    }
    for (i, row) in snapshot.rows.iter().enumerate() {
        println!(
            "  [{}] {:>3}. {}",
            if row.selected { "x" } else { " " },
            i + 1,
            format_artwork(&row.artwork)
        );
    }
}

fn format_artwork(artwork: &Artwork) -> String {
    let artist = artwork
        .artist_display
        .as_deref()
        .and_then(|artist| artist.lines().next())
        .unwrap_or("unknown artist");
    let dates = match (artwork.date_start, artwork.date_end) {
        (Some(start), Some(end)) if start != end => format!("{}-{}", start, end),
        (Some(start), _) => start.to_string(),
        (None, Some(end)) => end.to_string(),
        (None, None) => "n.d.".to_string(),
    };
    format!(
        "#{} {} | {} | {} | {}",
        artwork.id,
        artwork.display_title(),
        artwork.place_of_origin.as_deref().unwrap_or("-"),
        artist,
        dates
    )
}

fn print_request_history() {
    let history = ArticClient::api_call_history();
    eprintln!("{} catalog requests:", history.len());
    for call in history {
        eprintln!(
            "  {} {} {}",
            call.timestamp.unix_timestamp(),
            call.status_code,
            call.url
        );
    }
}
