#[tokio::main]
async fn main() {
    match gamelib_cli::run(std::env::args().collect()).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(gamelib_cli::EXIT_FAILURE);
        }
    }
}
