//! Panic capture for the request error translator.
//!
//! Unwinding discards the stack before `catch_unwind` returns, so the call
//! stack has to be recorded from the panic hook. The hook only records
//! while a [`PanicScope`] is being polled on the current thread; any other
//! panic is handed to the hook that was installed before ours.

use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::sync::Once;
use std::task::{Context, Poll};

use super::diagnostic::format_location;

/// Panic details recorded by the hook
#[derive(Debug)]
pub struct CapturedPanic {
    pub location: Option<String>,
    pub backtrace: Backtrace,
}

thread_local! {
    static SCOPE_DEPTH: Cell<usize> = const { Cell::new(0) };
    static LAST_PANIC: RefCell<Option<CapturedPanic>> = const { RefCell::new(None) };
}

static INSTALL: Once = Once::new();

/// Install the capturing panic hook. Safe to call more than once.
pub fn install_hook() {
    INSTALL.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if SCOPE_DEPTH.with(|depth| depth.get()) == 0 {
                previous(info);
                return;
            }

            let captured = CapturedPanic {
                location: info.location().map(format_location),
                backtrace: Backtrace::force_capture(),
            };
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(captured));
        }));
    });
}

/// Take the panic recorded on this thread, if any
pub fn take_captured() -> Option<CapturedPanic> {
    LAST_PANIC.with(|slot| slot.borrow_mut().take())
}

struct ScopeGuard;

impl ScopeGuard {
    fn enter() -> Self {
        SCOPE_DEPTH.with(|depth| depth.set(depth.get() + 1));
        ScopeGuard
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        SCOPE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Future wrapper marking every poll of `inner` as panic-capturing
pub struct PanicScope<F> {
    inner: Pin<Box<F>>,
}

impl<F: Future> PanicScope<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner: Box::pin(inner),
        }
    }
}

impl<F: Future> Future for PanicScope<F> {
    type Output = F::Output;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let _guard = ScopeGuard::enter();
        self.inner.as_mut().poll(cx)
    }
}
