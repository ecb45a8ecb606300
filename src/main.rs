//! Drive the command search mode against an in-memory host snapshot.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

use command_search::host::memory::MemoryHost;
use command_search::host::Host;
use command_search::ui::line_text;
use command_search::{activate, PaletteConfig};

#[derive(Debug, Parser)]
#[command(name = "command-search", about = "Search and run host editor commands")]
struct Args {
    /// Host snapshot (JSON): commands, key bindings, menus, editors.
    #[arg(long)]
    host: PathBuf,

    /// Palette config (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Execute the result at this index.
    #[arg(long)]
    select: Option<usize>,

    /// Row width used to right-align shortcuts.
    #[arg(long, default_value_t = 60)]
    width: u16,

    /// Print results as JSON instead of formatted rows.
    #[arg(long)]
    json: bool,

    /// Quick-open text, e.g. "?sav".
    query: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialise structured logging (RUST_LOG controls the filter).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("command_search=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => PaletteConfig::load(path)?,
        None => PaletteConfig::default(),
    };

    let snapshot = std::fs::read_to_string(&args.host)
        .with_context(|| format!("reading {}", args.host.display()))?;
    let host = Rc::new(MemoryHost::from_json(&snapshot)?);
    let _search = activate(Rc::clone(&host), config.clone())?;

    // Open the palette the way a user would: through its own command.
    host.execute(&config.command_id)?;

    let Some(mode) = host.mode_for(&args.query) else {
        bail!("no search mode handles {:?} (trigger is {:?})", args.query, config.trigger);
    };
    let results = mode.search(&args.query);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for (i, item) in results.iter().enumerate() {
            let line = mode.format_result(item, &args.query, args.width);
            println!("{i:>3}  {}", line_text(&line));
        }
    }

    if let Some(index) = args.select {
        let item = results
            .get(index)
            .with_context(|| format!("no result at index {index} ({} results)", results.len()))?;
        LocalSet::new().run_until(async { mode.item_select(item).await }).await??;
        for event in host.take_events() {
            println!("{event:?}");
        }
    }

    mode.done();
    Ok(())
}
