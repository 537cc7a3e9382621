use clap::Parser;
use tokio::net::TcpListener;

/// In-memory backend for the personnel REST API.
#[derive(Parser, Debug)]
struct Cli {
    /// Port to listen on
    #[clap(short, long, env = "PORT", default_value = "12306")]
    port: u16,

    /// Address to bind
    #[clap(short, long, default_value = "127.0.0.1")]
    address: String,

    /// Start with a handful of sample people
    #[clap(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();
    let addr = format!("{}:{}", args.address, args.port);
    let listener = TcpListener::bind(&addr).await?;

    let app = if args.seed {
        mock_server::app_with(mock_server::seed_people())
    } else {
        mock_server::app()
    };

    log::info!("listening on {addr}");
    mock_server::serve(listener, app).await
}
