use buntu_shell::{ConfigStore, Interpreter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let store = ConfigStore::default();
    let (session, status) = store.load();
    println!("{status}");

    Interpreter::new(session, store).repl()
}
