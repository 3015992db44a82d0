use accessible_catalog::{
    config,
    core::{CatalogFilter, CatalogQuery, Session, SortOrder},
    db,
    errors::{Error, Result},
    gateway::DatabaseGateway,
    identity::FileIdentityStore,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Builds the catalog query from `[sort] [search...]` command-line arguments.
fn query_from_args() -> Result<CatalogQuery> {
    let mut args = std::env::args().skip(1);
    let sort = match args.next() {
        Some(selector) => SortOrder::parse_selector(&selector).map_err(|e| Error::Config {
            message: e.to_string(),
        })?,
        None => None,
    };
    let search: Vec<String> = args.collect();
    Ok(CatalogQuery {
        filter: CatalogFilter {
            name: (!search.is_empty()).then(|| search.join(" ")),
            ..Default::default()
        },
        sort,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    let query = query_from_args()?;

    // 3. Load the seed configuration
    let catalog_config = config::catalog::load_default_config()
        .inspect_err(|e| error!("Failed to load catalog configuration: {e}"))?;

    // 4. Open the database and make sure the schema exists
    let connection = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&connection).await?;

    // 5. Seed taxonomy, starting games and the administrator
    let summary = db::seed_catalog(&connection, &catalog_config)
        .await
        .inspect_err(|e| error!("Failed to seed catalog: {e}"))?;
    if summary.admin_created {
        info!("Created administrator account from configuration");
    }

    // 6. Open a session and print the requested catalog view
    let identity = FileIdentityStore::new(config::identity::get_identity_path());
    let session = Session::new(DatabaseGateway::new(connection), identity);
    session.load().await?;
    match session.current_user().await {
        Some(user) => info!("Logged in as '{}'", user.name),
        None => info!("No user logged in"),
    }

    let games = session.catalog(&query).await;
    info!("Showing {} games", games.len());
    for game in games {
        let detail = session.game_detail(game.id).await;
        let tags = detail
            .map(|d| d.accessibility_tags.join(", "))
            .unwrap_or_default();
        println!(
            "{:>4}  {:<40} {:>8.2}  {:>2}+  [{}]",
            game.id, game.title, game.price, game.min_age, tags
        );
    }

    Ok(())
}
