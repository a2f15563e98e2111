mod args;
mod config;
mod highlight;
mod repl;

use std::path::Path;
use std::sync::Arc;

use services::QuizShell;
use storage::repository::Storage;
use storage::sqlite::SqliteExecutor;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::{HostArgs, print_usage, rewrite_quiz_args};
use crate::config::{BUNDLED_QUIZ_PROFILE, HostConfig, prepare_sqlite_file};
use crate::highlight::SqlHighlighter;
use crate::repl::{Repl, TerminalNotifier};

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let cwd = std::env::current_dir()?;
    let launch = rewrite_quiz_args(argv, &cwd, Path::new(BUNDLED_QUIZ_PROFILE)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let host_args = HostArgs::parse(launch.host_args).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if host_args.help {
        print_usage();
        return Ok(());
    }

    let config = HostConfig::resolve(&host_args)?;
    init_tracing(&config.log_level);
    tracing::debug!(db = %config.database_url, "starting");

    // Keep database setup in the binary glue so core/services stay pure.
    prepare_sqlite_file(&config.database_url)?;
    let executor = Arc::new(SqliteExecutor::connect(&config.database_url).await?);

    let mut repl = Repl::new(config, Arc::clone(&executor))?;

    let Some(quiz_path) = launch.quiz_path else {
        repl.run(None).await;
        return Ok(());
    };

    let mut shell = QuizShell::open(
        &quiz_path,
        executor,
        &Storage::files(),
        Arc::new(TerminalNotifier),
    )
    .await?
    .with_highlighter(Arc::new(SqlHighlighter));

    let welcome = shell.start();
    shell.register_commands(&mut repl);
    println!(
        "{} questions. Type \\question to see the first one, \\? for help.",
        welcome.question_count
    );

    repl.run(Some(&mut shell)).await;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
