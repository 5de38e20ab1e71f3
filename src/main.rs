use clap::Parser;
use quizforge::db::Db;
use quizforge::trivia::TriviaClient;
use quizforge::AppState;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// SQLite database URL, e.g. `sqlite://quizforge.db`.
    #[arg(long, env, default_value = "sqlite://quizforge.db")]
    database_url: String,

    /// Base URL of the external trivia service.
    #[arg(long, env, default_value = "http://jservice.io")]
    trivia_url: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:1414")]
    address: String,

    /// Set the Secure attribute on session cookies.
    #[arg(long, env, default_value_t = false)]
    secure_cookies: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,quizforge=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let db = Db::new(&args.database_url).await?;
    let trivia = TriviaClient::new(args.trivia_url)?;
    let router = quizforge::router(AppState {
        db,
        trivia,
        secure_cookies: args.secure_cookies,
    });

    let address = args.address.parse::<std::net::SocketAddr>()?;
    tracing::info!("listening on {address}");
    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
