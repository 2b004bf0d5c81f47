//! CLI binary for the Flax client.
//!
//! Usage: flax search mydb "dark matter" --end 20

#[cfg(feature = "cli")]
mod cli {
    use clap::{Parser, Subcommand};
    use flax_client::{
        assigned_document_id, CreateOptions, FlaxClient, HttpTransport, RankWindow,
        SearchResults, StructuredQuery,
    };
    use serde_json::Value;
    use std::error::Error;

    type CliResult<T> = std::result::Result<T, Box<dyn Error>>;

    #[derive(Parser)]
    #[command(name = "flax", about = "Flax search service client", version)]
    struct Cli {
        /// Service URL (overrides FLAX_URL env var)
        #[arg(long, global = true)]
        url: Option<String>,

        /// Output format
        #[arg(long, global = true, default_value = "table")]
        output: OutputFormat,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Clone, Copy, clap::ValueEnum)]
    enum OutputFormat {
        Table,
        Json,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Create a database
        Create {
            db: String,
            /// Replace an existing database of the same name
            #[arg(long)]
            overwrite: bool,
            /// Open an existing database instead of failing
            #[arg(long)]
            reopen: bool,
        },
        /// Delete a database
        Drop { db: String },
        /// Manage schema fields
        Fields {
            db: String,
            #[command(subcommand)]
            action: FieldAction,
        },
        /// Manage documents
        Docs {
            db: String,
            #[command(subcommand)]
            action: DocAction,
        },
        /// Make pending writes durable and searchable
        Commit { db: String },
        /// Free-text search
        Search {
            db: String,
            /// Query text
            query: String,
            /// First rank to return
            #[arg(long, default_value = "0")]
            start: u32,
            /// Rank to stop before
            #[arg(long, default_value = "10")]
            end: u32,
        },
        /// Structured search
        Query {
            db: String,
            /// Terms that must all appear
            #[arg(long, default_value = "")]
            all: String,
            /// Terms of which at least one must appear
            #[arg(long, default_value = "")]
            any: String,
            /// Terms that must not appear
            #[arg(long, default_value = "")]
            none: String,
            /// Exact phrase
            #[arg(long, default_value = "")]
            phrase: String,
            /// Exact-match filter as field:value (repeatable)
            #[arg(short, long)]
            filter: Vec<String>,
            #[arg(long, default_value = "0")]
            start: u32,
            #[arg(long, default_value = "10")]
            end: u32,
        },
    }

    #[derive(Subcommand)]
    enum FieldAction {
        /// List field names
        List,
        /// Show a field descriptor
        Get { field: String },
        /// Add a field (descriptor as JSON)
        Add { field: String, descriptor: String },
        /// Replace a field descriptor (JSON)
        Replace { field: String, descriptor: String },
        /// Delete a field
        Delete { field: String },
    }

    #[derive(Subcommand)]
    enum DocAction {
        /// Show a document
        Get { docid: String },
        /// Add a document (body as JSON)
        Add {
            document: String,
            /// Document id; the server assigns one when omitted
            #[arg(long)]
            id: Option<String>,
        },
        /// Delete a document
        Delete { docid: String },
    }

    fn make_client(url: Option<String>) -> CliResult<FlaxClient<HttpTransport>> {
        Ok(match url {
            Some(u) => FlaxClient::new(&u)?,
            None => FlaxClient::from_env()?,
        })
    }

    fn parse_json(arg: &str) -> CliResult<Value> {
        serde_json::from_str(arg).map_err(|e| format!("invalid JSON argument: {}", e).into())
    }

    fn parse_filter(arg: &str) -> CliResult<(String, String)> {
        match arg.split_once(':') {
            Some((field, value)) => Ok((field.to_string(), value.to_string())),
            None => Err(format!("filter must be field:value, got {:?}", arg).into()),
        }
    }

    fn print_json(value: &Value) -> CliResult<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn rank_window(start: u32, end: u32) -> CliResult<RankWindow> {
        let window = RankWindow::new(start, end);
        if window.is_empty() {
            return Err(format!("empty rank window {}: --end must exceed --start", window).into());
        }
        Ok(window)
    }

    fn print_results(value: Value, window: RankWindow, output: OutputFormat) -> CliResult<()> {
        if let OutputFormat::Json = output {
            return print_json(&value);
        }

        use comfy_table::{ContentArrangement, Table};

        let results = SearchResults::from_value(value)?;
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Rank", "Doc ID", "Weight", "Data"]);

        for hit in &results.results {
            let data = hit.data.to_string();
            let data = if data.chars().count() > 60 {
                format!("{}...", data.chars().take(57).collect::<String>())
            } else {
                data
            };
            table.add_row(vec![
                hit.rank.to_string(),
                hit.docid.clone(),
                format!("{:.3}", hit.weight),
                data,
            ]);
        }

        println!(
            "Matches {}-{} of about {}:",
            results.start_rank, results.end_rank, results.matches_estimated
        );
        println!("{table}");
        if results.more_matches {
            let next = window.next_page();
            eprintln!(
                "More matches: next {} with --start {} --end {}",
                next.len(),
                next.start,
                next.end
            );
        }
        Ok(())
    }

    pub async fn run() -> CliResult<()> {
        let cli = Cli::parse();
        let client = make_client(cli.url)?;

        match cli.command {
            Commands::Create {
                db,
                overwrite,
                reopen,
            } => {
                client
                    .create_database_with_options(&db, CreateOptions { overwrite, reopen })
                    .await?;
                println!("Created database: {}", db);
            }

            Commands::Drop { db } => {
                let mut handle = client.get_database(&db).await?;
                handle.delete().await?;
                println!("Deleted database: {}", db);
            }

            Commands::Fields { db, action } => {
                let handle = client.get_database(&db).await?;
                match action {
                    FieldAction::List => {
                        let names = handle.field_names().await?;
                        match cli.output {
                            OutputFormat::Json => {
                                println!("{}", serde_json::to_string_pretty(&names)?)
                            }
                            OutputFormat::Table => {
                                for name in &names {
                                    println!("{}", name);
                                }
                            }
                        }
                    }
                    FieldAction::Get { field } => print_json(&handle.field(&field).await?)?,
                    FieldAction::Add { field, descriptor } => {
                        handle.add_field(&field, &parse_json(&descriptor)?).await?;
                        println!("Added field: {}", field);
                    }
                    FieldAction::Replace { field, descriptor } => {
                        handle
                            .replace_field(&field, &parse_json(&descriptor)?)
                            .await?;
                        println!("Replaced field: {}", field);
                    }
                    FieldAction::Delete { field } => {
                        handle.delete_field(&field).await?;
                        println!("Deleted field: {}", field);
                    }
                }
            }

            Commands::Docs { db, action } => {
                let handle = client.get_database(&db).await?;
                match action {
                    DocAction::Get { docid } => print_json(&handle.document(&docid).await?)?,
                    DocAction::Add { document, id } => {
                        let body = handle
                            .add_document(&parse_json(&document)?, id.as_deref())
                            .await?;
                        match id.or_else(|| assigned_document_id(&body)) {
                            Some(docid) => println!("Added document: {}", docid),
                            None => print_json(&body)?,
                        }
                    }
                    DocAction::Delete { docid } => {
                        handle.delete_document(&docid).await?;
                        println!("Deleted document: {}", docid);
                    }
                }
            }

            Commands::Commit { db } => {
                client.get_database(&db).await?.commit().await?;
                println!("Committed: {}", db);
            }

            Commands::Search {
                db,
                query,
                start,
                end,
            } => {
                let window = rank_window(start, end)?;
                let handle = client.get_database(&db).await?;
                let results = handle.search_simple(&query, window).await?;
                print_results(results, window, cli.output)?;
            }

            Commands::Query {
                db,
                all,
                any,
                none,
                phrase,
                filter,
                start,
                end,
            } => {
                let window = rank_window(start, end)?;
                let mut query = StructuredQuery::new()
                    .all(all)
                    .any(any)
                    .none(none)
                    .phrase(phrase)
                    .window(window);
                for f in &filter {
                    let (field, value) = parse_filter(f)?;
                    query = query.filter(field, value);
                }
                let handle = client.get_database(&db).await?;
                let results = handle.search_structured(&query).await?;
                print_results(results, window, cli.output)?;
            }
        }

        Ok(())
    }

    pub fn init_tracing() {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    cli::init_tracing();
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature. Build with: cargo build --features cli");
    std::process::exit(1);
}
