#[cfg(feature = "rerun")]
mod rerun_sink;

use argh::FromArgs;
use std::path::PathBuf;

use qrlens::{
    io::{
        sink::{DisplaySink, PngDirSink, StopSignal},
        source::{FrameSource, ImageDirSource, StillImageSource},
    },
    qr::{create_decoder, DecoderKind},
    DisplayLoop, LoopConfig, ReadFailurePolicy,
};

#[cfg(feature = "reader")]
const DECODER: DecoderKind = DecoderKind::Reader;

#[cfg(all(feature = "scanner", not(feature = "reader")))]
const DECODER: DecoderKind = DecoderKind::Scanner;

#[cfg(not(any(feature = "scanner", feature = "reader")))]
const DECODER: DecoderKind = DecoderKind::Builtin;

#[derive(FromArgs)]
/// Decode the QR codes of every frame and show the frames with the decoded symbols drawn over
struct Args {
    /// directory of frames, or a single image shown repeatedly
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// directory receiving the annotated frames
    #[argh(option, short = 'o', default = "PathBuf::from(\"annotated\")")]
    output: PathBuf,

    /// how many times a single image is shown, forever when omitted
    #[argh(option)]
    repeat: Option<usize>,

    /// start over from the first frame of a directory
    #[argh(switch)]
    looping: bool,

    /// stop at the first failed read instead of retrying
    #[argh(switch)]
    abort_on_read_failure: bool,

    /// stop after this many failed reads in a row
    #[argh(option)]
    max_read_failures: Option<usize>,

    /// milliseconds to wait before reading again after a failed read
    #[argh(option, default = "10")]
    read_backoff_ms: u64,

    /// stop after this many frames
    #[argh(option)]
    max_frames: Option<usize>,

    /// print the decoded text of every frame
    #[argh(switch)]
    print_text: bool,

    /// stream the frames to a rerun viewer instead of writing them (needs the rerun feature)
    #[argh(switch)]
    rerun: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();

    let source: Box<dyn FrameSource> = if args.input.is_dir() {
        Box::new(ImageDirSource::open(&args.input)?.with_looping(args.looping))
    } else {
        Box::new(StillImageSource::open(&args.input, args.repeat)?)
    };

    // stop the loop on Ctrl-C
    let stop = StopSignal::new();
    stop.install_ctrlc()?;

    let sink: Box<dyn DisplaySink> = if args.rerun {
        spawn_rerun_sink(stop)?
    } else {
        Box::new(PngDirSink::create(&args.output, stop)?)
    };

    let policy = if args.abort_on_read_failure {
        ReadFailurePolicy::Abort
    } else {
        ReadFailurePolicy::Continue {
            backoff: std::time::Duration::from_millis(args.read_backoff_ms),
            max_consecutive: args.max_read_failures,
        }
    };

    let mut config = LoopConfig::default()
        .with_label(DECODER.label())
        .with_read_failure_policy(policy)
        .with_print_text(args.print_text);
    if let Some(max_frames) = args.max_frames {
        config = config.with_max_frames(max_frames);
    }

    log::info!("Decoding {} with the {DECODER} decoder", args.input.display());

    let mut display = DisplayLoop::new(source, sink, create_decoder(DECODER), config);
    let report = display.run()?;

    log::info!(
        "{:?}: {} frames, {} symbols, {} empty frames, {} decode failures, {} read failures, {:.1} fps",
        report.stop_reason,
        report.counters.frames_displayed,
        report.counters.symbols_decoded,
        report.counters.empty_frames,
        report.counters.decode_failures,
        report.counters.read_failures,
        display.fps(),
    );

    Ok(())
}

#[cfg(feature = "rerun")]
fn spawn_rerun_sink(
    stop: StopSignal,
) -> Result<Box<dyn DisplaySink>, Box<dyn std::error::Error>> {
    Ok(Box::new(rerun_sink::RerunSink::spawn(stop)?))
}

#[cfg(not(feature = "rerun"))]
fn spawn_rerun_sink(
    _stop: StopSignal,
) -> Result<Box<dyn DisplaySink>, Box<dyn std::error::Error>> {
    Err("this demo was built without the 'rerun' feature".into())
}
