mod files;
mod printer;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use livetable_lib::Context;
use livetable_lib::TableModel;
use livetable_lib::resource::Registry;
use livetable_lib::resource::ResourceMeta;
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::files::FileAccessor;
use crate::files::FileRenderer;
use crate::files::LocalFactory;
use crate::printer::Printer;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoxError> {
    let log_file = File::create("livetable.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let root = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };
    info!("Watching {}", root.display());

    let registry = Registry::new();
    registry.register(
        files::files(),
        ResourceMeta::new(FileAccessor::new(&root), FileRenderer),
    );

    let ctx = Context::new().with_factory(Arc::new(LocalFactory::new(&root)));
    let model = TableModel::new(files::files(), registry);
    model.add_listener(Arc::new(Printer::new("NAME", true, "!^\\.", ctx.clone())));

    let updater = model.watch(&ctx).await?;

    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            interrupt.cancel();
        }
    });

    updater.await?;
    Ok(())
}
