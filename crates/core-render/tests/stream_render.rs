use std::thread;
use std::time::{Duration, Instant};

use core_model::Point;
use core_render::writer::ERASE_BELOW;
use core_render::{
    AnsiMarkdownFormatter, CancelSource, CancelToken, MarkdownFormatter, PlainFormatter,
    PlainStreamRenderer, RenderError, StreamRender, StreamRenderer, Throttle,
};
use core_terminal::VirtualConsole;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn renderer<F: MarkdownFormatter>(
    width: u16,
    height: u16,
    formatter: F,
) -> StreamRenderer<VirtualConsole, F> {
    StreamRenderer::new(VirtualConsole::new(width, height), formatter, CancelToken::never())
        .unwrap()
        .with_throttle(Throttle::none())
}

/// Formatter that rewrites earlier output once a `!` arrives.
fn on_bang(from: &'static str, to: &'static str) -> impl Fn(&str) -> String {
    move |t: &str| match t.strip_suffix('!') {
        Some(body) => body.replacen(from, to, 1),
        None => t.to_string(),
    }
}

#[test]
fn appended_text_is_written_without_erasing() {
    let mut r = renderer(40, 5, PlainFormatter);
    r.refresh("hello").unwrap();
    r.console_mut().clear_writes();
    r.refresh(" world").unwrap();
    assert_eq!(r.console().writes, vec![" world".to_string()]);
    assert_eq!(r.console().screen_text(), "hello world");
    assert_eq!(r.accumulated_content(), "hello world");
}

#[test]
fn repeated_text_issues_no_writes() {
    let mut r = renderer(40, 5, AnsiMarkdownFormatter);
    r.refresh("# Title\n\nbody").unwrap();
    r.console_mut().clear_writes();
    r.refresh("").unwrap();
    assert!(r.console().writes.is_empty());
    let same = r.current_text().to_string();
    assert_eq!(r.show(same).unwrap(), None);
    assert!(r.console().writes.is_empty());
}

#[test]
fn mid_line_change_rewrites_from_first_difference() {
    let mut r = renderer(40, 5, on_bang("teh", "the"));
    r.refresh("teh").unwrap();
    r.console_mut().clear_writes();
    r.refresh("!").unwrap();
    assert_eq!(r.current_text(), "the");
    assert_eq!(r.console().writes, vec![ERASE_BELOW.to_string(), "he".to_string()]);
    assert_eq!(r.console().screen_text(), "the");
}

#[test]
fn cut_styled_run_redoes_the_whole_line() {
    let mut r = renderer(40, 5, AnsiMarkdownFormatter);
    r.refresh("intro\n\n# Tit").unwrap();
    r.console_mut().clear_writes();
    r.refresh("le").unwrap();
    assert_eq!(r.current_text(), "intro\n\n\x1b[1;4mTitle\x1b[0m");
    assert_eq!(
        r.console().writes,
        vec![ERASE_BELOW.to_string(), "\x1b[1;4mTitle\x1b[0m".to_string()]
    );
    assert_eq!(r.console().screen_text(), "intro\n\nTitle");
}

#[test]
fn rewrite_position_follows_wrapped_rows() {
    let mut r = renderer(5, 5, on_bang("g", "G"));
    r.refresh("abcdefgh").unwrap();
    r.refresh("!").unwrap();
    assert_eq!(r.console().screen_text(), "abcde\nfGh");
    assert_eq!(r.console().cursor(), Point::new(3, 1));
}

#[test]
fn scrolling_moves_initial_cursor_up() {
    let mut r = renderer(10, 3, PlainFormatter);
    r.refresh("1\n2\n3\n4\n5").unwrap();
    assert_eq!(r.console().scrolled(), 2);
    assert_eq!(r.initial_cursor(), Point::new(0, -2));

    let mut r = renderer(10, 3, PlainFormatter);
    for chunk in ["1\n", "2\n", "3\n", "4\n", "5"] {
        r.refresh(chunk).unwrap();
    }
    assert_eq!(r.initial_cursor(), Point::new(0, -2));
}

#[test]
fn visible_rewrite_after_scrolling() {
    let mut r = renderer(10, 3, on_bang("4", "four"));
    r.refresh("1\n2\n3\n4\n5").unwrap();
    r.refresh("!").unwrap();
    assert_eq!(r.console().screen_text(), "3\nfour\n5");
    assert_eq!(r.console().cursor(), Point::new(1, 2));
    assert_eq!(r.initial_cursor(), Point::new(0, -2));
}

#[test]
fn rewrite_above_the_window_replays_from_top_row() {
    let mut r = renderer(10, 3, on_bang("1", "one"));
    r.refresh("1\n2\n3\n4\n5").unwrap();
    r.console_mut().clear_writes();
    r.refresh("!").unwrap();
    assert_eq!(r.current_text(), "one\n2\n3\n4\n5");
    assert_eq!(r.console().writes, vec![ERASE_BELOW.to_string(), "3\n4\n5".to_string()]);
    assert_eq!(r.console().screen_text(), "3\n4\n5");
}

#[test]
fn cancelled_before_refresh_writes_nothing() {
    let source = CancelSource::new();
    let mut r = StreamRenderer::new(VirtualConsole::new(20, 5), PlainFormatter, source.token())
        .unwrap()
        .with_throttle(Throttle::none());
    r.refresh("abc").unwrap();
    source.cancel();
    r.console_mut().clear_writes();
    assert!(matches!(r.refresh("def"), Err(RenderError::Cancelled)));
    assert!(r.console().writes.is_empty());
    assert_eq!(r.console().screen_text(), "abc");
}

#[test]
fn cancel_cuts_the_throttle_sleep_short() {
    let source = CancelSource::new();
    let token = source.token();
    let (ready_tx, ready_rx) = std::sync::mpsc::channel();
    let worker = thread::spawn(move || {
        let mut r = StreamRenderer::new(VirtualConsole::new(20, 5), PlainFormatter, token)
            .unwrap()
            .with_throttle(Throttle::from_millis(10_000, 10_000));
        ready_tx.send(()).unwrap();
        let started = Instant::now();
        let result = r.refresh("abc");
        (result, started.elapsed(), r.into_console())
    });
    ready_rx.recv().unwrap();
    thread::sleep(Duration::from_millis(50));
    source.cancel();
    let (result, elapsed, console) = worker.join().unwrap();
    assert!(matches!(result, Err(RenderError::Cancelled)));
    assert!(elapsed < Duration::from_secs(5));
    // The write finished before the sleep began.
    assert_eq!(console.screen_text(), "abc");
}

#[test]
fn plain_renderer_passes_chunks_through() {
    let mut r = PlainStreamRenderer::new(VirtualConsole::new(20, 5), CancelToken::never());
    r.refresh("**a").unwrap();
    r.refresh("**").unwrap();
    assert_eq!(r.console().writes, vec!["**a".to_string(), "**".to_string()]);
    assert_eq!(r.accumulated_content(), "**a**");

    let source = CancelSource::new();
    let mut r = PlainStreamRenderer::new(VirtualConsole::new(20, 5), source.token());
    source.cancel();
    assert!(matches!(r.refresh("x"), Err(RenderError::Cancelled)));
    assert!(r.console().writes.is_empty());
}

fn split_points(len: usize, cuts: &[usize]) -> Vec<usize> {
    let mut points: Vec<usize> = cuts.iter().map(|c| c % (len + 1)).collect();
    points.push(0);
    points.push(len);
    points.sort_unstable();
    points.dedup();
    points
}

/// Columns and rows of the test terminal.
type Size = (u16, u16);

/// Wide and tall enough that nothing wraps or scrolls.
const ROOMY: Size = (200, 400);
/// Narrow enough that most lines wrap.
const NARROW: Size = (7, 400);
/// Short enough that output scrolls and rewrites land above the window.
const SHORT: Size = (200, 4);

fn one_shot<F: MarkdownFormatter>(size: Size, formatter: F, text: &str) -> (String, Point, String) {
    let mut r = renderer(size.0, size.1, formatter);
    r.refresh(text).unwrap();
    (
        r.current_text().to_string(),
        r.console().cursor(),
        r.console().screen_text(),
    )
}

fn chunked<F: MarkdownFormatter>(
    size: Size,
    formatter: F,
    text: &str,
    cuts: &[usize],
) -> (String, Point, String) {
    let mut r = renderer(size.0, size.1, formatter);
    let points = split_points(text.len(), cuts);
    for pair in points.windows(2) {
        r.refresh(&text[pair[0]..pair[1]]).unwrap();
    }
    (
        r.current_text().to_string(),
        r.console().cursor(),
        r.console().screen_text(),
    )
}

/// Prefixes every line with the line count (mod 10), so each new line
/// rewrites every earlier one without changing how many rows there are.
fn numbered(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let total = text.split('\n').count() % 10;
    text.split('\n')
        .map(|line| format!("{total}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn rewrite_after_a_full_row_lands_on_the_right_row() {
    let mut r = renderer(4, 10, on_bang("x", "y"));
    r.refresh("abcd").unwrap();
    r.refresh("x\nz").unwrap();
    r.refresh("!").unwrap();
    assert_eq!(r.current_text(), "abcdy\nz");
    assert_eq!(r.console().screen_text(), "abcd\ny\nz");

    let mut r = renderer(4, 10, on_bang("q", ""));
    r.refresh("abcdq\nef").unwrap();
    r.refresh("!").unwrap();
    assert_eq!(r.current_text(), "abcd\nef");
    assert_eq!(r.console().screen_text(), "abcd\nef");
    assert_eq!(r.console().cursor(), Point::new(2, 1));
}

#[test]
fn numbered_lines_replay_above_the_window() {
    let text = "one\ntwo\nthree\nfour\nfive\nsix";
    let chunks: Vec<usize> = (0..text.len()).collect();
    assert_eq!(
        chunked(SHORT, numbered, text, &chunks),
        one_shot(SHORT, numbered, text)
    );
    assert_eq!(
        one_shot(SHORT, numbered, text).2,
        "6three\n6four\n6five\n6six"
    );
}

proptest! {
    #[test]
    fn chunking_converges_to_the_one_shot_render(
        text in "[a-z *_`#>\\n-]{0,80}",
        cuts in proptest::collection::vec(0usize..81, 0..12),
    ) {
        prop_assert_eq!(
            chunked(ROOMY, AnsiMarkdownFormatter, &text, &cuts),
            one_shot(ROOMY, AnsiMarkdownFormatter, &text)
        );
    }

    #[test]
    fn plain_chunking_converges(
        text in "[a-z \\n]{0,80}",
        cuts in proptest::collection::vec(0usize..81, 0..12),
    ) {
        prop_assert_eq!(
            chunked(ROOMY, PlainFormatter, &text, &cuts),
            one_shot(ROOMY, PlainFormatter, &text)
        );
    }

    #[test]
    fn wrapped_rows_converge(
        text in "[a-z *_`#>\\n-]{0,80}",
        cuts in proptest::collection::vec(0usize..81, 0..12),
    ) {
        prop_assert_eq!(
            chunked(NARROW, AnsiMarkdownFormatter, &text, &cuts),
            one_shot(NARROW, AnsiMarkdownFormatter, &text)
        );
        prop_assert_eq!(
            chunked(NARROW, PlainFormatter, &text, &cuts),
            one_shot(NARROW, PlainFormatter, &text)
        );
    }

    #[test]
    fn scrolled_rewrites_converge(
        text in "[a-z \\n]{0,80}",
        cuts in proptest::collection::vec(0usize..81, 0..12),
    ) {
        prop_assert_eq!(
            chunked(SHORT, numbered, &text, &cuts),
            one_shot(SHORT, numbered, &text)
        );
        prop_assert_eq!(
            chunked(SHORT, PlainFormatter, &text, &cuts),
            one_shot(SHORT, PlainFormatter, &text)
        );
    }

    #[test]
    fn second_identical_refresh_is_silent(text in "[a-z *_`#\\n]{1,60}") {
        let mut r = renderer(200, 400, AnsiMarkdownFormatter);
        r.refresh(&text).unwrap();
        r.console_mut().clear_writes();
        r.refresh("").unwrap();
        prop_assert!(r.console().writes.is_empty());
    }
}
