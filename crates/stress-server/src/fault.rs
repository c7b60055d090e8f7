//! Failures leaving a request handler
//!
//! Handlers return `Result<_, Fault>`. Converting a `Fault` into a response
//! does not decide the final body: it attaches a [`FaultReport`] to the
//! response so the translator middleware can render it under the active
//! [`ErrorPolicy`](crate::translator::ErrorPolicy).

use std::any::Any;
use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::panic::{AssertUnwindSafe, Location};
use std::pin::Pin;
use std::sync::Once;
use std::task::{Context, Poll};

use axum::response::{IntoResponse, Response};
use stress_core::AppError;

/// Every failure kind the translator knows how to render
#[derive(Debug, Clone)]
pub enum Fault {
    /// An intentional failure with its own status and kind
    App(AppError),
    /// The request body is not valid JSON; holds the parser's reason
    MalformedBody(String),
    /// Anything nobody anticipated
    Unexpected(Unexpected),
}

/// Diagnostic data captured from an unanticipated failure
#[derive(Debug, Clone)]
pub struct Unexpected {
    /// Rust type name of the failure, or `panic`
    pub type_name: Cow<'static, str>,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    /// Source chain and backtrace, for the log only
    pub trace: Option<String>,
}

impl Fault {
    /// Wrap an arbitrary error as an unexpected fault
    #[track_caller]
    pub fn unexpected<E: std::error::Error>(error: E) -> Self {
        let location = Location::caller();

        Self::Unexpected(Unexpected {
            type_name: Cow::Borrowed(std::any::type_name::<E>()),
            message: error.to_string(),
            file: Some(location.file().to_owned()),
            line: Some(location.line()),
            trace: Some(trace(&error)),
        })
    }

    /// Build a fault from a caught panic payload
    ///
    /// Picks up the location recorded by the panic hook when available.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "handler panicked".to_owned());

        let site = LAST_PANIC.with(RefCell::take);

        Self::Unexpected(Unexpected {
            type_name: Cow::Borrowed("panic"),
            message,
            file: site.as_ref().map(|s| s.file.clone()),
            line: site.as_ref().map(|s| s.line),
            trace: site.map(|s| s.backtrace),
        })
    }
}

/// Source chain of the error followed by a backtrace of the call site
fn trace(error: &dyn std::error::Error) -> String {
    let mut lines = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        lines.push(format!("caused by: {cause}"));
        current = cause.source();
    }

    lines.push(Backtrace::force_capture().to_string());
    lines.join("\n")
}

impl From<AppError> for Fault {
    fn from(error: AppError) -> Self {
        Self::App(error)
    }
}

impl From<anyhow::Error> for Fault {
    #[track_caller]
    fn from(error: anyhow::Error) -> Self {
        let location = Location::caller();

        Self::Unexpected(Unexpected {
            type_name: Cow::Borrowed("anyhow::Error"),
            message: error.to_string(),
            file: Some(location.file().to_owned()),
            line: Some(location.line()),
            trace: Some(format!("{error:?}")),
        })
    }
}

impl From<serde_json::Error> for Fault {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        Self::unexpected(error)
    }
}

impl From<jiff::Error> for Fault {
    #[track_caller]
    fn from(error: jiff::Error) -> Self {
        Self::unexpected(error)
    }
}

/// Response extension carrying the fault to the translator
#[derive(Debug, Clone)]
pub struct FaultReport(pub Fault);

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        // Redacted rendering until the translator replaces it
        let mut response = crate::translator::render_response(&self, true);
        response.extensions_mut().insert(FaultReport(self));
        response
    }
}

struct PanicSite {
    file: String,
    line: u32,
    backtrace: String,
}

thread_local! {
    static SERVING: Cell<usize> = const { Cell::new(0) };
    static LAST_PANIC: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

static INSTALL_HOOK: Once = Once::new();

/// Install the process-wide panic hook
///
/// Panics raised while a request handler is being polled are recorded for
/// [`Fault::from_panic`] and stay silent; the translator logs them. Any
/// other panic goes to the previously installed hook. Later calls are
/// no-ops.
pub fn install_panic_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = std::panic::take_hook();

        std::panic::set_hook(Box::new(move |info| {
            if SERVING.with(Cell::get) == 0 {
                previous(info);
                return;
            }

            let site = PanicSite {
                file: info.location().map(|l| l.file().to_owned()).unwrap_or_default(),
                line: info.location().map_or(0, Location::line),
                backtrace: Backtrace::force_capture().to_string(),
            };
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(site));
        }));
    });
}

/// Future wrapper that turns a panic inside the handler into an `Err`
pub struct CatchPanic {
    inner: Pin<Box<dyn Future<Output = Response> + Send>>,
}

impl CatchPanic {
    pub fn new(inner: impl Future<Output = Response> + Send + 'static) -> Self {
        Self { inner: Box::pin(inner) }
    }
}

impl Future for CatchPanic {
    type Output = Result<Response, Box<dyn Any + Send>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let inner = self.inner.as_mut();

        SERVING.with(|depth| depth.set(depth.get() + 1));
        let polled = std::panic::catch_unwind(AssertUnwindSafe(|| inner.poll(cx)));
        SERVING.with(|depth| depth.set(depth.get() - 1));

        match polled {
            Ok(Poll::Ready(response)) => Poll::Ready(Ok(response)),
            Ok(Poll::Pending) => Poll::Pending,
            Err(payload) => Poll::Ready(Err(payload)),
        }
    }
}
