use anyhow::Result;
use docsnap::{cli::parse_args, run_docsnap};
use env_logger::Env;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = parse_args();

    let level = match config.verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let reports = run_docsnap(config).await?;

    for report in &reports {
        println!("Generated: {}", report.output_path.display());
        println!("   Size: {} bytes", report.bytes);
        println!("   Files: {}", report.file_count);
        if !report.failures.is_empty() {
            println!("   Unreadable: {}", report.failures.len());
        }
        println!();
    }

    Ok(())
}
