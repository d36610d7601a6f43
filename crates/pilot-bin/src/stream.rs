//! `pilot stream`: replay a markdown file through the incremental renderer.
//!
//! The file is cut into fixed-size chunks and fed one at a time, the way a
//! response arrives from a server. Ctrl+C cancels: a watcher thread polls the
//! keyboard while the main thread renders.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use core_config::Config;
use core_keymap::KeyChord;
use core_render::{
    AnsiMarkdownFormatter, CancelSource, PlainStreamRenderer, RenderError, StreamRender,
    StreamRenderer,
};
use core_terminal::{Console, CrosstermBackend, CrosstermConsole, poll_chord};
use tracing::{info, warn};

/// Split `text` into pieces of at most `size` chars (never inside a char).
pub(crate) fn chunks(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut out = Vec::new();
    let mut start = 0;
    for (count, (i, _)) in text.char_indices().enumerate() {
        if count > 0 && count % size == 0 {
            out.push(&text[start..i]);
            start = i;
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Polls for Ctrl+C until told to stop.
///
/// Only the interrupt chord cancels. When polling fails, or the watcher is
/// stopped, the thread hands the `CancelSource` back through its join handle
/// so the render keeps going.
struct InterruptWatcher {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<Option<CancelSource>>>,
}

impl InterruptWatcher {
    fn spawn<P>(source: CancelSource, mut poll: P) -> Result<Self>
    where
        P: FnMut(Duration) -> io::Result<Option<KeyChord>> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let interrupt: KeyChord = "Ctrl+c".parse()?;
        let flag = stop.clone();
        let handle = thread::Builder::new()
            .name("stream-interrupt".into())
            .spawn(move || {
                while !flag.load(Ordering::Relaxed) {
                    match poll(Duration::from_millis(50)) {
                        Ok(Some(chord)) if chord == interrupt => {
                            info!(target: "runtime.stream", "interrupt");
                            source.cancel();
                            return None;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!(target: "runtime.stream", error = %e, "poll_failed");
                            return Some(source);
                        }
                    }
                }
                Some(source)
            })?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Stop polling. Returns the source unless it was used to cancel.
    fn finish(mut self) -> Option<CancelSource> {
        self.stop.store(true, Ordering::Relaxed);
        self.handle.take().and_then(|h| h.join().ok().flatten())
    }
}

impl Drop for InterruptWatcher {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

pub(crate) fn run(config: &Config, path: &Path, chunk: usize, plain: bool) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let pieces = chunks(&text, chunk);
    info!(target: "runtime.stream", chunks = pieces.len(), chunk, plain, "stream_begin");

    let mut backend = CrosstermBackend::new();
    let _guard = backend.enter_guard()?;
    let source = CancelSource::new();
    let token = source.token();
    let watcher = InterruptWatcher::spawn(source, poll_chord)?;

    let mut renderer: Box<dyn StreamRender> = if plain {
        Box::new(PlainStreamRenderer::new(CrosstermConsole::new(), token))
    } else {
        Box::new(
            StreamRenderer::new(CrosstermConsole::new(), AnsiMarkdownFormatter, token)?
                .with_throttle(config.throttle()),
        )
    };

    let mut cancelled = false;
    for piece in pieces {
        match renderer.refresh(piece) {
            Ok(()) => {}
            Err(RenderError::Cancelled) => {
                cancelled = true;
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    let _source = watcher.finish();

    let mut out = CrosstermConsole::new();
    if cancelled {
        out.write("\n\x1b[91m^C\x1b[0m")?;
    }
    out.write("\n")?;
    out.flush()?;
    info!(
        target: "runtime.stream",
        cancelled,
        received = renderer.accumulated_content().len(),
        "stream_end"
    );
    Ok(())
}
