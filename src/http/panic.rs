//! Panic isolation for request handling.
//!
//! `tower_http::catch_panic` stops the unwind at the request boundary. The
//! payload it hands over carries no location or stack, so a process-wide
//! panic hook records both into a thread-local slot first. Unwinding runs on
//! the panicking thread, so the recovery handler finds the trace in the same
//! slot.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::RefCell;
use std::panic::{self, PanicHookInfo};
use std::sync::Once;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;

/// Deepest frame reported for one panic.
pub const MAX_FRAMES: usize = 99;

thread_local! {
    static LAST_PANIC: RefCell<Option<PanicTrace>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// One stack frame of a recovered panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub index: usize,
    pub function: String,
    pub location: Option<String>,
}

/// Where a panic happened and how the stack looked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanicTrace {
    pub location: Option<String>,
    pub frames: Vec<Frame>,
}

impl PanicTrace {
    fn capture(info: &PanicHookInfo<'_>) -> Self {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let backtrace = Backtrace::force_capture();
        let frames = match backtrace.status() {
            BacktraceStatus::Captured => parse_frames(&backtrace.to_string()),
            _ => Vec::new(),
        };
        Self { location, frames }
    }
}

/// The panic isolation layer, outermost in the middleware chain.
pub fn layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    install_hook();
    CatchPanicLayer::custom(recover as fn(Box<dyn Any + Send + 'static>) -> Response)
}

/// Install the trace-recording panic hook once per process.
///
/// The previous hook still runs, so panics outside request handling keep
/// their usual report.
pub fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let trace = PanicTrace::capture(info);
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(trace));
            previous(info);
        }));
    });
}

/// Log a caught panic and answer with an empty 500.
pub fn recover(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload_message(payload.as_ref());
    let trace = LAST_PANIC.with(|slot| slot.borrow_mut().take()).unwrap_or_default();

    tracing::error!(
        panic = %message,
        location = trace.location.as_deref().unwrap_or("unknown"),
        "panic recovered"
    );
    for frame in &trace.frames {
        tracing::error!(
            "\t{:02} {} {}",
            frame.index,
            frame.location.as_deref().unwrap_or("?"),
            frame.function
        );
    }

    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

/// Frames of a rendered `std::backtrace::Backtrace`, starting at the
/// panicking function.
fn parse_frames(rendered: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for line in rendered.lines() {
        let line = line.trim();
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                frame.location.get_or_insert_with(|| location.to_string());
            }
        } else if let Some((index, function)) = line.split_once(": ") {
            if index.chars().all(|c| c.is_ascii_digit()) && !index.is_empty() {
                frames.push(Frame {
                    index: 0,
                    function: function.to_string(),
                    location: None,
                });
            }
        }
    }

    let start = match frames.iter().position(|f| is_unwind_machinery(&f.function)) {
        Some(first) => frames[first..]
            .iter()
            .position(|f| !is_unwind_machinery(&f.function))
            .map_or(frames.len(), |offset| first + offset),
        None => 0,
    };

    frames
        .into_iter()
        .skip(start)
        .take(MAX_FRAMES)
        .enumerate()
        .map(|(i, frame)| Frame { index: i + 1, ..frame })
        .collect()
}

fn is_unwind_machinery(function: &str) -> bool {
    function == "rust_begin_unwind"
        || function.starts_with("std::panicking::")
        || function.starts_with("core::panicking::")
        || function.starts_with("std::sys::backtrace::")
        || function.starts_with("std::rt::")
        || function.starts_with("core::result::unwrap_failed")
        || function.starts_with("core::option::expect_failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDERED: &str = "   0: std::backtrace_rs::backtrace::libunwind::trace
             at /rustc/abc/library/std/src/../../backtrace/src/backtrace/libunwind.rs:117:9
   1: std::backtrace::Backtrace::create
   2: grace::http::panic::install_hook::{{closure}}
             at ./src/http/panic.rs:70:25
   3: std::panicking::rust_panic_with_hook
   4: std::panicking::begin_panic_handler::{{closure}}
   5: std::sys::backtrace::__rust_end_short_backtrace
   6: rust_begin_unwind
   7: core::panicking::panic_fmt
   8: grace::http::handler::receive::{{closure}}
             at ./src/http/handler.rs:30:9
   9: tokio::runtime::task::harness::poll_future
";

    #[test]
    fn frames_start_at_the_panicking_function() {
        let frames = parse_frames(RENDERED);
        assert_eq!(
            frames[0],
            Frame {
                index: 1,
                function: "grace::http::handler::receive::{{closure}}".into(),
                location: Some("./src/http/handler.rs:30:9".into()),
            }
        );
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].location, None);
    }

    #[test]
    fn frames_are_bounded() {
        let rendered: String = (0..200).map(|i| format!("  {i}: f{i}\n")).collect();
        let frames = parse_frames(&rendered);
        assert_eq!(frames.len(), MAX_FRAMES);
        assert_eq!(frames[0].function, "f0");
        assert_eq!(frames[MAX_FRAMES - 1].index, MAX_FRAMES);
    }

    #[test]
    fn payload_messages() {
        assert_eq!(payload_message(&"boom"), "boom");
        assert_eq!(payload_message(&String::from("bang")), "bang");
        assert_eq!(payload_message(&42u8), "Box<dyn Any>");
    }

    #[test]
    fn recover_answers_500_with_empty_body() {
        let response = recover(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
