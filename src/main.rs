//! A minimal wiki host which serves the `WikiStatusList` macro over a Trac
//! SQLite database.

use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use wiki_status_list::{
    Href, WikiStatusList,
    db::{ConnectionManager, init_schema},
    resource::ResourceManager,
};

mod pages;

/// Shared state for all request handlers.
struct WikiState {
    /// The revision history database.
    pool: r2d2::Pool<ConnectionManager>,
    /// The URL builder for generated links.
    href: Href,
    /// Static assets served under `/chrome`.
    resources: ResourceManager,
    /// The macro.
    status_list: WikiStatusList,
}

type AppState = Arc<WikiState>;

fn usage<T>(err: &'static str) -> anyhow::Result<T> {
    let exe = std::env::args().next().unwrap_or_default();
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("Usage: {exe} [options] <wiki.db>\n");
    println!("or, use environment variables:");
    println!("    WIKI_DB\n");
    println!("Options:");
    println!("    --listen: Web server bind (default: 127.0.0.1:3000)");
    println!("    --base: Base path of generated links (default: none)");
    println!("    --init: Create the wiki table if it does not exist\n");
    Err(anyhow::Error::msg(err))
}

fn free_arg(
    args: &mut pico_args::Arguments,
    key: &str,
    err: &'static str,
) -> anyhow::Result<String> {
    if let Some(arg) = args.opt_free_from_str::<String>()? {
        Ok(arg)
    } else if let Ok(arg) = std::env::var(key) {
        Ok(arg)
    } else {
        usage(err)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return usage("Help requested");
    }
    let listen = args
        .opt_value_from_str("--listen")?
        .unwrap_or_else(|| "127.0.0.1:3000".to_string());
    let base = args
        .opt_value_from_str::<_, String>("--base")?
        .unwrap_or_default();
    let init = args.contains("--init");
    let _ = args.contains("--");
    let db_path = free_arg(&mut args, "WIKI_DB", "Missing wiki database argument")?;

    if !args.finish().is_empty() {
        return usage("Unknown extra arguments passed");
    }

    log::info!("Starting up {} ...", env!("CARGO_PKG_NAME"));

    let manager = if init {
        ConnectionManager::read_write(&db_path)
    } else {
        ConnectionManager::read_only(&db_path)
    };
    let pool = r2d2::Pool::new(manager)?;

    if init {
        init_schema(&*pool.get()?)?;
        log::info!("Initialised wiki table in {db_path}");
    }

    let status_list = WikiStatusList;
    let mut resources = ResourceManager::new();
    resources.register_provider(&status_list);

    let state = Arc::new(WikiState {
        pool,
        href: Href::new(&base),
        resources,
        status_list,
    });

    let app = Router::new()
        .route("/", get(pages::status_page))
        .route("/chrome/{*path}", get(pages::resource))
        .with_state(state);

    let listener = TcpListener::bind(&listen).await?;
    log::info!("Listening at {listen}");

    axum::serve(listener, app).await.map_err(Into::into)
}
