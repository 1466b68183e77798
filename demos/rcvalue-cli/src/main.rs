use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser as ClapParser;
use log::info;
use rcvalue::prelude::*;

#[derive(ClapParser)]
#[command(version, about = "Read a line into a reference-counted text value and display it")]
struct Arguments {
    /// Template used to display the value, `{}` is replaced by its content
    #[arg(short, long, default_value = "{}\n")]
    template: String,

    /// Display this integer instead of reading a line from stdin
    #[arg(short, long, allow_negative_numbers = true)]
    integer: Option<i64>,

    /// Path to a TOML heap configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grow text buffers geometrically instead of exactly
    #[arg(long)]
    amortized: bool,

    /// Number of extra owners to attach to the value before releasing it
    #[arg(long, default_value_t = 0)]
    share: usize,
}

fn run(args: Arguments) -> RcResult<()> {
    let mut config = match &args.config {
        Some(path) => HeapConfig::from_path(path)?,
        None => HeapConfig::default(),
    };
    if args.amortized {
        config.growth = GrowthPolicy::Amortized;
    }
    let mut heap = ValueHeap::with_config(config);

    let value = match args.integer {
        Some(integer) => heap.create_integer(integer)?,
        None => {
            let line = read_line(&mut heap, io::stdin().lock())?;
            let text = heap.create_text()?;
            heap.append(text, &line)?;
            text
        }
    };

    for _ in 0..args.share {
        let refcount = heap.retain(value)?;
        info!("Retained {} (refcount {})", value, refcount);
    }

    show_and_release(&mut heap, value, &args.template, &mut io::stdout().lock())?;

    let stats = heap.stats();
    info!(
        "{} values created, {} destroyed, {} live",
        stats.created, stats.destroyed, stats.live
    );
    Ok(())
}

/// Display `value`, then give back every share of it. The value is released even when writing
/// fails, and the write error is reported afterwards.
fn show_and_release<W: Write + ?Sized>(
    heap: &mut ValueHeap,
    value: ValueRef,
    template: &str,
    out: &mut W,
) -> RcResult<()> {
    let shown = heap.show(value, template, out);

    loop {
        match heap.release(value)? {
            Released::Retained { refcount } => {
                info!("Released {} (refcount {})", value, refcount)
            }
            Released::Destroyed { kind } => {
                info!("Destroyed {} value {}", kind, value);
                break;
            }
        }
    }

    shown
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Arguments::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {}", error);
            ExitCode::FAILURE
        }
    }
}
