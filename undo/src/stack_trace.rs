//! Call-site capture for trace steps.

use std::backtrace::{Backtrace, BacktraceStatus};

/// Frames belonging to the tracer itself: [`capture`] and the traced
/// operation that called it.
pub const TRACER_FRAMES: usize = 2;

/// Captures the current call stack, innermost frame first.
///
/// Frames of the backtrace machinery are dropped, followed by `skip` more
/// frames counting `capture` itself; `capture(TRACER_FRAMES)` called from a
/// traced operation therefore starts at that operation's caller. Each entry
/// reads `symbol` or `symbol at file:line:col`.
/// Returns an empty list when backtraces are unsupported on the platform.
#[inline(never)]
pub fn capture(skip: usize) -> Vec<String> {
    let backtrace = Backtrace::force_capture();
    if backtrace.status() != BacktraceStatus::Captured {
        return Vec::new();
    }

    parse_frames(&backtrace.to_string())
        .into_iter()
        .skip_while(|frame| frame.contains("backtrace"))
        .skip(skip)
        .collect()
}

/// Splits the rendered form of a [`Backtrace`] into one entry per frame.
///
/// The rendered form numbers each frame (`  3: symbol`), may list inlined
/// symbols without a number, and puts the source location on an indented
/// `at path:line:col` line. Only the first symbol of each frame is kept.
fn parse_frames(rendered: &str) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();
    let mut location_pending = false;

    for line in rendered.lines() {
        let trimmed = line.trim_start();
        if let Some(location) = trimmed.strip_prefix("at ") {
            if location_pending && let Some(frame) = frames.last_mut() {
                frame.push_str(" at ");
                frame.push_str(location);
            }
            location_pending = false;
            continue;
        }

        match trimmed.split_once(": ") {
            Some((index, symbol)) if index.chars().all(|c| c.is_ascii_digit()) => {
                frames.push(symbol.trim().to_owned());
                location_pending = true;
            }
            // Inlined symbol of the previous frame.
            _ => location_pending = false,
        }
    }
    frames
}
