mod cli;

use anyhow::Context as _;
use gamelib::{
    Catalog, CatalogConfig, CatalogError, CatalogResult, ErrorBody, InMemoryStore, PgStore,
    RecordStore, StoreKind, create_pool_with_config,
};
use std::path::Path;

/// Config file picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "gamelib.toml";

/// Exit status for errors the caller can fix by changing the request.
pub const EXIT_CLIENT_ERROR: i32 = 2;
/// Exit status for store and setup failures.
pub const EXIT_FAILURE: i32 = 1;

/// Run the CLI and return the process exit status.
///
/// Catalog outcomes (success or `{"error": ...}`) are printed as JSON on
/// stdout. Setup failures (bad arguments, config, connection) are returned
/// as `Err`.
pub async fn run(args: Vec<String>) -> anyhow::Result<i32> {
    let invocation = match cli::parse_args(&args)? {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            return Ok(0);
        }
        cli::Command::Run(invocation) => invocation,
    };

    init_tracing();
    let _ = dotenvy::dotenv();

    let config = load_config(&invocation.global)?;
    tracing::debug!(store = ?config.store.kind, "configuration loaded");

    let seed = config.seed_defaults && invocation.action != cli::Action::Init;
    match config.store.kind {
        StoreKind::Memory => {
            // Nothing persists between runs.
            execute(Catalog::new(InMemoryStore::new()), seed, invocation.action).await
        }
        StoreKind::Postgres => {
            let url = config
                .database
                .url
                .as_deref()
                .context("database.url is not set")?;
            let pool = create_pool_with_config(url, config.database.max_size)?;
            let store = PgStore::new(pool);
            store
                .ensure_table()
                .await
                .context("failed to prepare the games table")?;
            execute(Catalog::new(store), seed, invocation.action).await
        }
    }
}

async fn execute<S: RecordStore>(
    catalog: Catalog<S>,
    seed: bool,
    action: cli::Action,
) -> anyhow::Result<i32> {
    if seed {
        catalog
            .seed_defaults()
            .await
            .context("failed to seed the default games")?;
    }
    Ok(report(dispatch(&catalog, action).await?))
}

fn init_tracing() {
    // Logs go to stderr so stdout stays machine-readable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(global: &cli::GlobalArgs) -> anyhow::Result<CatalogConfig> {
    let config = match &global.config {
        Some(path) => CatalogConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => CatalogConfig::load(DEFAULT_CONFIG_FILE)?,
        None => CatalogConfig::new(),
    };
    let mut config = config.apply_env();
    if let Some(url) = &global.database {
        config = config.database_url(url.clone()).store_kind(StoreKind::Postgres);
    }
    config.validate()?;
    Ok(config)
}

/// Outcome of one catalog operation, ready to print.
type Outcome = CatalogResult<serde_json::Value>;

async fn dispatch<S: RecordStore>(
    catalog: &Catalog<S>,
    action: cli::Action,
) -> anyhow::Result<Outcome> {
    let outcome = match action {
        cli::Action::List(query) => to_json(catalog.list(&query).await)?,
        cli::Action::Get(id) => to_json(catalog.get(id).await)?,
        cli::Action::Add(body) => to_json(catalog.create(&body).await)?,
        cli::Action::Update(id, body) => to_json(catalog.update(id, &body).await)?,
        cli::Action::Delete(id) => to_json(catalog.delete(id).await)?,
        cli::Action::Search(name) => to_json(catalog.search(&name).await)?,
        cli::Action::Init => catalog
            .seed_defaults()
            .await
            .map(|seeded| serde_json::json!({ "seeded": seeded })),
    };
    Ok(outcome)
}

fn to_json<T: serde::Serialize>(result: CatalogResult<T>) -> anyhow::Result<Outcome> {
    match result {
        Ok(body) => Ok(Ok(serde_json::to_value(body)?)),
        Err(e) => Ok(Err(e)),
    }
}

fn report(outcome: Outcome) -> i32 {
    let (body, code) = match outcome {
        Ok(body) => (body, 0),
        Err(err) => {
            let code = exit_code(&err);
            if code == EXIT_FAILURE {
                tracing::error!(error = %err, "request failed");
            }
            (serde_json::json!({ "error": ErrorBody::from(&err).error }), code)
        }
    };
    match serde_json::to_string_pretty(&body) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("failed to render output: {e}"),
    }
    code
}

fn exit_code(err: &CatalogError) -> i32 {
    if err.is_client_error() {
        EXIT_CLIENT_ERROR
    } else {
        EXIT_FAILURE
    }
}
