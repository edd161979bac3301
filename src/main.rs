//! Headless gallery runner.
//!
//! Loads a page description, simulates the frame loop against it and
//! prints the last rendered frame as JSON.

use std::{io::Write, path::PathBuf};

use serde::Serialize;
use vitrine::{
    host::StaticPage,
    options::Options,
    renderer::{RecordingRenderer, RenderedFrame},
    scroll::{ScrollDriver, SmoothScroll},
    Gallery, GalleryError,
};

const USAGE: &str =
    "Usage: vitrine <page.toml> [--options FILE] [--frames N] [--wheel DELTA]";
const FRAME_MS: f64 = 1000.0 / 60.0;

struct Args {
    page: PathBuf,
    options: Option<PathBuf>,
    frames: u32,
    wheel: f32,
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let mut page = None;
    let mut options = None;
    let mut frames = 60;
    let mut wheel = 0.0;

    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next().ok_or_else(|| format!("{name} needs a value"))
        };
        match arg.as_str() {
            "--options" => options = Some(PathBuf::from(value("--options")?)),
            "--frames" => {
                frames = value("--frames")?
                    .parse()
                    .map_err(|e| format!("invalid --frames: {e}"))?;
            }
            "--wheel" => {
                wheel = value("--wheel")?
                    .parse()
                    .map_err(|e| format!("invalid --wheel: {e}"))?;
            }
            flag if flag.starts_with("--") => {
                return Err(format!("unknown flag {flag}"));
            }
            path if page.is_none() => page = Some(PathBuf::from(path)),
            extra => return Err(format!("unexpected argument {extra}")),
        }
    }

    Ok(Args {
        page: page.ok_or_else(|| USAGE.to_owned())?,
        options,
        frames,
        wheel,
    })
}

#[derive(Serialize)]
struct Report {
    frames: u32,
    scroll: f32,
    images: usize,
    fps: f32,
    last_frame: Option<RenderedFrame>,
}

fn run(args: &Args) -> Result<Report, GalleryError> {
    let options = match &args.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    let page = StaticPage::load(&args.page)?;
    let scroll = SmoothScroll::new(options.scroll.clone());

    let mut gallery = Gallery::new(
        page,
        RecordingRenderer::last_frame_only(),
        scroll,
        options,
    )?;
    if args.wheel != 0.0 {
        gallery.scroll_driver_mut().handle_wheel(args.wheel);
    }

    let mut frames = 0;
    while frames < args.frames {
        let reschedule = gallery.frame(f64::from(frames) * FRAME_MS)?;
        frames += 1;
        if !reschedule {
            break;
        }
    }
    gallery.stop();
    log::info!(
        "simulated {frames} frames, scroll {:.2}",
        gallery.scroll_driver().scroll()
    );

    Ok(Report {
        frames,
        scroll: gallery.scroll_driver().scroll(),
        images: gallery.planes().len(),
        fps: gallery.fps(),
        last_frame: gallery.renderer().last_frame().cloned(),
    })
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            log::error!("{USAGE}");
            std::process::exit(2);
        }
    };

    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    let written = serde_json::to_writer_pretty(&mut stdout, &report)
        .map_err(|e| e.to_string())
        .and_then(|()| writeln!(stdout).map_err(|e| e.to_string()));
    if let Err(e) = written {
        log::error!("failed to write report: {e}");
        std::process::exit(1);
    }
}
