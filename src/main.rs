use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use duotone::api;
use duotone::error::{ErrorKind, ProcessError};
use duotone::models::{AppConfig, Upload};
use duotone::server;
use duotone::services::{ProcessingService, RunFailure, SessionInfo, SessionStatus};
use duotone_core::{plan, DuotoneColor, MAX_DIMENSION};

#[derive(Parser)]
#[command(name = "duotone")]
#[command(version)]
#[command(about = "Duotone - turn photos into two-color renditions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Convert an image file to a duotone PNG
    Render {
        /// Source image (JPEG, PNG or WebP)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path (defaults to the export name next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Map dark tones to the highlight color instead of the shadow color
        #[arg(short, long)]
        reversed: bool,

        /// Recompress the PNG with oxipng
        #[arg(long)]
        optimize: bool,
    },
    /// Print the working size chosen for a source size
    Plan {
        /// Source width in pixels
        width: u32,
        /// Source height in pixels
        height: u32,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Duotone API",
        description = "Two-color photo renditions in brave pink and hero green",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_convert,
        api::handle_create_session,
        api::handle_get_session,
        api::handle_set_orientation,
        api::handle_replace_source,
        api::handle_session_image,
        api::handle_delete_session,
    ),
    components(schemas(
        SessionInfo,
        SessionStatus,
        RunFailure,
        ErrorKind,
        api::OrientationRequest,
        api::ChangeAccepted,
    )),
    tags(
        (name = "Duotone", description = "One-shot conversion"),
        (name = "Sessions", description = "Interactive sessions with debounced re-processing")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            input,
            output,
            reversed,
            optimize,
        }) => run_render_command(&input, output.as_deref(), reversed, optimize).await,
        Some(Commands::Plan { width, height }) => run_plan_command(width, height),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn config_path() -> Option<PathBuf> {
    std::env::var("CONFIG_FILE").ok().map(PathBuf::from)
}

fn init_cli_tracing() {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duotone=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Convert a file directly (no server needed)
async fn run_render_command(
    input: &Path,
    output: Option<&Path>,
    reversed: bool,
    optimize: bool,
) -> anyhow::Result<()> {
    init_cli_tracing();

    let mut config = AppConfig::load(config_path().as_deref());
    config.optimize_png |= optimize;
    let processor = Arc::new(ProcessingService::new(Arc::new(config)));

    let bytes = std::fs::read(input)?;
    let mut upload = Upload::new(bytes);
    if let Some(name) = input.file_name().and_then(|n| n.to_str()) {
        upload = upload.with_filename(name);
    }

    let image = processor
        .process(upload, reversed)
        .await
        .map_err(|e: ProcessError| anyhow::anyhow!("{}: {e}", input.display()))?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_file_name(&image.filename),
    };
    std::fs::write(&output, &image.png_bytes)?;
    println!(
        "Rendered {} ({}x{}, {} bytes)",
        output.display(),
        image.dimensions.width,
        image.dimensions.height,
        image.png_bytes.len()
    );

    Ok(())
}

fn run_plan_command(width: u32, height: u32) -> anyhow::Result<()> {
    let planned = plan(width, height)?;
    if planned.width == width && planned.height == height {
        println!("{width}x{height} (unchanged)");
    } else {
        println!("{width}x{height} -> {}x{}", planned.width, planned.height);
    }
    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();

    // Header
    println!("Duotone v{VERSION}");
    println!("Two-color photo renditions\n");

    // Environment variables section
    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );

    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    let config = AppConfig::load(config_file.as_deref().map(Path::new));

    println!("\nConfiguration ({config_source}):");
    println!(
        "  Max upload:    {} MB",
        config.max_upload_bytes / (1024 * 1024)
    );
    println!("  Debounce:      {} ms", config.debounce_ms);
    println!("  Max sessions:  {}", config.max_sessions);
    println!("  Optimize PNG:  {}", config.optimize_png);
    println!("  Max dimension: {MAX_DIMENSION} px");

    println!("\nColors:");
    println!("  Shadow:    {}", DuotoneColor::SHADOW);
    println!("  Highlight: {}", DuotoneColor::HIGHLIGHT);

    // Commands section
    println!("\nCommands:");
    println!("  duotone serve    Start the HTTP server");
    println!("  duotone render   Convert an image file to PNG");
    println!("  duotone plan     Show the working size for a source size");
    println!("\nRun 'duotone --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duotone=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_file = config_path();
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    tracing::info!(
        config = %config_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "defaults".to_string()),
        "Configuration source"
    );
    let config = AppConfig::load(config_file.as_deref());

    // Create application state using shared server module
    let state = server::create_app_state(config);

    // Build router: start with shared API routes, add production-only routes
    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Duotone server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
