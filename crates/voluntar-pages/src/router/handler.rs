//! Route handlers.
//!
//! A handler produces the markup for a route. Asynchronous closures
//! returning `Result<String, HandlerError>` are handlers as-is; plain markup
//! closures are wrapped with [`markup`].
//!
//! ```
//! use voluntar_pages::router::{HandlerError, RouteHandler, markup};
//!
//! let about = markup(|| "<h2>Sobre</h2>".to_string());
//! let projects = || async { Ok::<_, HandlerError>("<h2>Projetos</h2>".to_string()) };
//!
//! fn accepts(_: impl RouteHandler) {}
//! accepts(about);
//! accepts(projects);
//! ```

use super::error::HandlerError;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::future::Future;

/// Future returned by [`RouteHandler::render`].
pub type HandlerFuture = LocalBoxFuture<'static, Result<String, HandlerError>>;

/// Produces the markup of a route.
pub trait RouteHandler {
	/// Starts rendering. The future resolves to the markup or to a failure.
	fn render(&self) -> HandlerFuture;
}

impl<F, Fut> RouteHandler for F
where
	F: Fn() -> Fut,
	Fut: Future<Output = Result<String, HandlerError>> + 'static,
{
	fn render(&self) -> HandlerFuture {
		self().boxed_local()
	}
}

/// Handler wrapping a synchronous markup closure.
pub struct Markup<F> {
	render: F,
}

impl<F> RouteHandler for Markup<F>
where
	F: Fn() -> String,
{
	fn render(&self) -> HandlerFuture {
		futures::future::ready(Ok((self.render)())).boxed_local()
	}
}

/// Wraps a synchronous closure returning markup.
pub fn markup<F>(render: F) -> Markup<F>
where
	F: Fn() -> String,
{
	Markup { render }
}
