mod config;
mod files;
mod http;
mod server;

use std::sync::Arc;

use anyhow::Context;
use config::Config;
use files::listing::DirTemplate;
use server::SiteContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    init_logging(&cfg)?;

    let template_src = std::fs::read_to_string(&cfg.template_path)
        .with_context(|| format!("reading listing template {}", cfg.template_path.display()))?;
    let template = DirTemplate::from_source(&template_src)?;

    // The root is canonicalized once; the resolver checks every request
    // against this prefix.
    let root = std::fs::canonicalize(&cfg.root_dir)
        .with_context(|| format!("root directory {}", cfg.root_dir.display()))?;

    let ctx = Arc::new(SiteContext {
        root,
        template,
        limits: cfg.limits,
    });

    tokio::select! {
        res = server::listener::run(&cfg.listen_addr, ctx) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn init_logging(cfg: &Config) -> anyhow::Result<()> {
    match &cfg.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_target(false)
                .with_level(true)
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_target(false)
                .with_level(true)
                .init();
        }
    }

    Ok(())
}
