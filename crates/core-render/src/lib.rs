//! Terminal output: the incremental stream renderer and the input painter.
//!
//! Two consumers share the terminal and never run at the same time:
//!
//! * `StreamRenderer` shows a growing response. Every chunk is appended to
//!   the accumulated text, the whole text is re-formatted, and only the part
//!   of the screen that changed is rewritten (`stream`).
//! * `InputPainter` is the `RenderSink` behind the line editor (`painter`).
//!
//! Both write through `core_terminal::Console` and map text to cells with
//! `core_model`, so wrapping and wide glyphs are modelled once.

use std::io;

use thiserror::Error;

pub mod ansi;
pub mod cancel;
pub mod markdown;
pub mod painter;
pub mod stream;
pub mod style;
pub mod timing;
pub mod writer;

pub use cancel::{CancelSource, CancelToken};
pub use markdown::{AnsiMarkdownFormatter, MarkdownFormatter, PlainFormatter};
pub use painter::InputPainter;
pub use stream::{PlainStreamRenderer, StreamRender, StreamRenderer};
pub use timing::Throttle;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The cancellation token fired between two refresh steps.
    #[error("rendering cancelled")]
    Cancelled,
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
