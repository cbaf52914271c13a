use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wayfinder_ai::{ChatCompletionsProvider, DirectionsAssistant, GenerationConfig};
use wayfinder_core::{
    interpret_escape_sequences, ConfigError, ConfigManager, LoggingConfig, WayfinderConfig,
};
use wayfinder_graph::{load_map, BuildingMap, Prompt, PromptGenerator, PromptRequest};

#[derive(Parser)]
#[command(name = "wayfinder")]
#[command(about = "Wayfinder - building hallway maps as navigation prompts", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (pretty, raw, json)
    #[arg(short, long, global = true, default_value = "pretty")]
    output: OutputFormat,

    /// Configuration file (defaults to ./.wayfinder.toml or ~/.wayfinder/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Door list file
    #[arg(long, global = true)]
    doors: Option<PathBuf>,

    /// Connectivity list file
    #[arg(long, global = true)]
    connectivity: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Escapes interpreted, coloured headers
    Pretty,
    /// Literal `\n` markers, as handed to a model
    Raw,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the navigation prompt for a start position
    Prompt {
        /// Start door or intersection (unknown names fall back to the default)
        start: Option<String>,

        /// Facing direction: north, east, south or west
        orientation: Option<String>,

        /// Fill the destination slot instead of printing the two segments
        #[arg(short, long)]
        destination: Option<String>,
    },

    /// Ask the configured model for directions; interactive without a destination
    Ask {
        /// Destination door
        destination: Option<String>,

        /// Start door or intersection
        #[arg(short, long)]
        start: Option<String>,

        /// Facing direction at the start
        #[arg(short, long)]
        facing: Option<String>,
    },

    /// Print every door with its wall and neighbours
    Map,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // the configured subscriber needs the config, so loading logs to a
    // temporary stderr subscriber
    let bootstrap = bootstrap_subscriber(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        std::io::stderr,
    );
    let manager = tracing::subscriber::with_default(bootstrap, || {
        load_config(cli.config.as_deref())
    })
    .context("Failed to load configuration")?;
    let mut config = manager.config().clone();
    if let Some(doors) = &cli.doors {
        config.map.doors_path = doors.clone();
    }
    if let Some(connectivity) = &cli.connectivity {
        config.map.connectivity_path = connectivity.clone();
    }

    init_tracing(&config.logging, cli.verbose);
    info!(
        config = ?manager.config_path(),
        doors = %config.map.doors_path.display(),
        connectivity = %config.map.connectivity_path.display(),
        strict = config.map.strict_ids,
        "configuration loaded"
    );

    if let Err(e) = execute_command(&cli, &config).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ConfigManager, ConfigError> {
    match path {
        Some(path) => ConfigManager::load_from(path),
        None => ConfigManager::load(),
    }
}

fn bootstrap_subscriber<W>(
    filter: EnvFilter,
    make_writer: W,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(make_writer)
        .with_ansi(false)
        .finish()
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(&logging.level)
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "compact" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

async fn execute_command(cli: &Cli, config: &WayfinderConfig) -> Result<()> {
    let map = open_map(config)?;

    match &cli.command {
        Commands::Prompt {
            start,
            orientation,
            destination,
        } => {
            let prompt = generate(&map, config, start.as_deref(), orientation.as_deref())?;
            print_prompt(cli.output, &prompt, destination.as_deref())
        }
        Commands::Ask {
            destination,
            start,
            facing,
        } => {
            let prompt = generate(&map, config, start.as_deref(), facing.as_deref())?;
            execute_ask_command(cli.output, config, &prompt, destination.as_deref()).await
        }
        Commands::Map => print_map(cli.output, &map),
    }
}

fn open_map(config: &WayfinderConfig) -> Result<BuildingMap> {
    let map = &config.map;
    load_map(&map.doors_path, &map.connectivity_path, map.strict_ids).with_context(|| {
        format!(
            "Failed to load building map from {} and {}",
            map.doors_path.display(),
            map.connectivity_path.display()
        )
    })
}

fn generate(
    map: &BuildingMap,
    config: &WayfinderConfig,
    start: Option<&str>,
    orientation: Option<&str>,
) -> Result<Prompt> {
    let request = PromptRequest::resolve(map, start, orientation, &config.navigation);
    PromptGenerator::new(map)
        .generate(&request.start, request.orientation)
        .with_context(|| {
            format!(
                "Failed to generate prompt from {} facing {}",
                request.start, request.orientation
            )
        })
}

async fn execute_ask_command(
    format: OutputFormat,
    config: &WayfinderConfig,
    prompt: &Prompt,
    destination: Option<&str>,
) -> Result<()> {
    let provider = ChatCompletionsProvider::from_llm_config(&config.llm)
        .context("Failed to create chat-completion client")?;
    let assistant = DirectionsAssistant::new(provider, GenerationConfig::from(&config.llm));

    if let Some(destination) = destination {
        let answer = assistant
            .ask(prompt, destination)
            .await
            .with_context(|| format!("Failed to get directions to {}", destination))?;
        return print_answer(format, destination, &answer);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"Enter destination (or E to exit): ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let destination = line.trim();
        if destination.is_empty() {
            continue;
        }
        if destination.eq_ignore_ascii_case("e") || destination.eq_ignore_ascii_case("exit") {
            break;
        }

        // a failed request ends only this round
        match assistant.ask(prompt, destination).await {
            Ok(answer) => print_answer(format, destination, &answer)?,
            Err(e) => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
    }
    Ok(())
}

fn print_prompt(format: OutputFormat, prompt: &Prompt, destination: Option<&str>) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(prompt)?;
            if let Some(destination) = destination {
                value["destination"] = json!(destination);
                value["full"] = json!(prompt.with_destination(destination));
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Raw => match destination {
            Some(destination) => println!("{}", prompt.with_destination(destination)),
            None => {
                println!("{}", prompt.prefix);
                println!("{}", prompt.suffix);
            }
        },
        OutputFormat::Pretty => match destination {
            Some(destination) => {
                println!("{}", "Prompt".cyan().bold());
                println!(
                    "{}",
                    interpret_escape_sequences(&prompt.with_destination(destination))
                );
            }
            None => {
                println!("{}", "Prefix".cyan().bold());
                println!("{}", interpret_escape_sequences(&prompt.prefix));
                println!("{}", "Suffix".cyan().bold());
                println!("{}", interpret_escape_sequences(&prompt.suffix));
            }
        },
    }
    Ok(())
}

fn print_answer(format: OutputFormat, destination: &str, answer: &str) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let value = json!({ "destination": destination, "directions": answer });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Raw => println!("{}", answer),
        OutputFormat::Pretty => {
            println!("{} {}", "Directions to".cyan().bold(), destination.yellow());
            println!("{}", answer.green());
        }
    }
    Ok(())
}

fn print_map(format: OutputFormat, map: &BuildingMap) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let vertices: Vec<serde_json::Value> = map
                .iter()
                .map(|(_, vertex)| {
                    let neighbors: serde_json::Map<String, serde_json::Value> = vertex
                        .open_directions()
                        .filter_map(|direction| {
                            let id = vertex.neighbor(direction)?;
                            Some((direction.to_string(), json!(map.vertex(id).name())))
                        })
                        .collect();
                    json!({
                        "name": vertex.name(),
                        "wall": vertex.wall(),
                        "neighbors": neighbors,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&vertices)?);
        }
        OutputFormat::Raw => print!("{}", map.describe()),
        OutputFormat::Pretty => {
            println!(
                "{} {}",
                "Doors and intersections:".cyan().bold(),
                map.len().to_string().yellow()
            );
            print!("{}", map.describe());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use parking_lot::Mutex;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_config_loading_is_logged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wayfinder.toml");
        ConfigManager::create_default_config(&path).unwrap();

        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = bootstrap_subscriber(EnvFilter::new("info"), move || sink.clone());
        let manager =
            tracing::subscriber::with_default(subscriber, || load_config(Some(&path))).unwrap();

        assert_eq!(manager.config_path(), Some(path.as_path()));
        let output = String::from_utf8(captured.0.lock().clone()).unwrap();
        assert!(output.contains("configuration loaded"), "{output}");
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_prompt_arguments() {
        let cli = Cli::try_parse_from([
            "wayfinder", "prompt", "2.102", "north", "--destination", "2.204", "-o", "raw",
        ])
        .unwrap();
        assert!(matches!(cli.output, OutputFormat::Raw));
        match cli.command {
            Commands::Prompt {
                start,
                orientation,
                destination,
            } => {
                assert_eq!(start.as_deref(), Some("2.102"));
                assert_eq!(orientation.as_deref(), Some("north"));
                assert_eq!(destination.as_deref(), Some("2.204"));
            }
            _ => panic!("expected prompt command"),
        }
    }

    #[test]
    fn test_ask_without_destination_is_interactive() {
        let cli =
            Cli::try_parse_from(["wayfinder", "ask", "--start", "intersection1", "-f", "west"])
                .unwrap();
        match cli.command {
            Commands::Ask {
                destination,
                start,
                facing,
            } => {
                assert!(destination.is_none());
                assert_eq!(start.as_deref(), Some("intersection1"));
                assert_eq!(facing.as_deref(), Some("west"));
            }
            _ => panic!("expected ask command"),
        }
    }

    #[test]
    fn test_global_map_paths() {
        let cli = Cli::try_parse_from([
            "wayfinder",
            "map",
            "--doors",
            "floor2/doors.txt",
            "--connectivity",
            "floor2/links.txt",
        ])
        .unwrap();
        assert_eq!(cli.doors, Some(PathBuf::from("floor2/doors.txt")));
        assert_eq!(cli.connectivity, Some(PathBuf::from("floor2/links.txt")));
        assert!(matches!(cli.command, Commands::Map));
    }
}
