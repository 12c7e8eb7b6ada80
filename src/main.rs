use anyhow::Context;
use capacity_check::{probe_dirs, size::parse_size, CancelToken, ProbeOptions};
use clap::Parser;
use indicatif::ProgressStyle;
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{error, info_span, warn, Level};
use tracing_indicatif::{span_ext::IndicatifSpanExt, IndicatifLayer};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[macro_use]
extern crate lazy_static;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory on the volume to test.
    ///
    /// May be given several times to test several volumes in parallel. Defaults to the
    /// current working directory.
    #[clap(short, long = "dir")]
    dirs: Vec<PathBuf>,

    /// How much data the volume should hold, e.g. `10GB` or `512MiB`.
    #[clap(short, long, value_parser = parse_size)]
    size: u64,

    /// Number of bytes to buffer for each write and read (e.g. `4KiB`).
    ///
    /// Defaults to 1MiB.
    #[clap(short, long, value_parser = parse_size)]
    buffer_size: Option<u64>,

    /// Seed for the random test data, to make runs reproducible.
    #[clap(long)]
    seed: Option<u64>,

    /// Log each step of the probe.
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .with(LevelFilter::from_level(level))
        .init();

    let dirs = if args.dirs.is_empty() {
        vec![std::env::current_dir().context("Determining the current working directory")?]
    } else {
        args.dirs
    };
    let buffer_size = args
        .buffer_size
        .map(usize::try_from)
        .transpose()
        .context("Buffer size does not fit in memory")?;

    let cancel = CancelToken::new();
    ctrlc::set_handler({
        let cancel = cancel.clone();
        move || {
            warn!("Interrupted; stopping after the current buffer");
            cancel.cancel();
        }
    })
    .context("Installing the signal handler")?;

    for dir in &dirs {
        println!(
            "Verifying {} can hold {} bytes",
            dir.display(),
            args.size
        );
    }

    let results = probe_dirs(&cancel, args.size, &dirs, |dir| {
        let mut options = ProbeOptions::new()
            .on_write(progress_bar("write", dir))
            .on_read(progress_bar("read", dir));
        options.buffer_size = buffer_size;
        options.seed = args.seed;
        options
    });

    let mut exit = ExitCode::SUCCESS;
    let mut mismatched = false;
    for (dir, result) in results {
        match result {
            Ok(_) => println!("Capacity check of {} passed", dir.display()),
            Err(e) if e.is_checksum_mismatch() => {
                println!("Capacity check of {} failed", dir.display());
                mismatched = true;
            }
            Err(e) => {
                let e = anyhow::Error::new(e);
                error!(?dir, "Capacity check did not complete: {e:#}");
                exit = ExitCode::FAILURE;
            }
        }
    }
    if mismatched {
        exit = ExitCode::from(2);
    }
    Ok(exit)
}

/// A progress hook that drives an indicatif bar for one pass over `dir`.
fn progress_bar(pass: &'static str, dir: &Path) -> impl Fn(u64, u64) + Send + Sync {
    let bar = info_span!("pass", phase = pass, dir = %dir.display());
    bar.pb_set_style(&PROGRESS_STYLE);
    move |done, total| {
        bar.pb_set_length(total);
        bar.pb_set_position(done);
        // Bars only appear once their span has been entered.
        bar.in_scope(|| ());
    }
}

lazy_static! {
    pub(crate) static ref PROGRESS_STYLE: ProgressStyle = ProgressStyle::with_template(
        "[{elapsed_precise}] {span_fields} {bar:40.white/grey} {bytes}/{total_bytes} ({bytes_per_sec}, ETA {eta_precise}) {msg}",
    ).expect("Internal error in indicatif progress bar template syntax");
}
