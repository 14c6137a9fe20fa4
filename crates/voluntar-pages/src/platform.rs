//! Timers, clock and task spawning.
//!
//! Browser builds use `gloo-timers`, `js-sys` and `wasm-bindgen-futures`.
//! Native builds use `tokio` and `chrono` so the controllers run under
//! `#[tokio::test]`.

use chrono::NaiveDate;
use std::any::Any;
use std::future::Future;
use std::time::Duration;

/// A scheduled one-shot task. Dropping the handle cancels the task if it has
/// not fired yet.
#[must_use = "dropping a TimerHandle cancels the timer"]
pub struct TimerHandle {
	_guard: Box<dyn Any>,
}

impl TimerHandle {
	/// Wraps a value whose `Drop` cancels the underlying timer.
	pub fn new<G: Any>(guard: G) -> Self {
		Self {
			_guard: Box::new(guard),
		}
	}
}

impl std::fmt::Debug for TimerHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TimerHandle").finish_non_exhaustive()
	}
}

/// Source of one-shot timers.
pub trait Scheduler {
	/// Runs `task` once after `delay`, unless the returned handle is dropped first.
	fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle;
}

/// [`Scheduler`] backed by `setTimeout`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeoutScheduler;

#[cfg(target_arch = "wasm32")]
impl Scheduler for TimeoutScheduler {
	fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerHandle {
		let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
		TimerHandle::new(gloo_timers::callback::Timeout::new(millis, task))
	}
}

/// Suspends the current task for `delay`.
#[cfg(target_arch = "wasm32")]
pub async fn sleep(delay: Duration) {
	gloo_timers::future::sleep(delay).await;
}

/// Suspends the current task for `delay`.
#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(delay: Duration) {
	tokio::time::sleep(delay).await;
}

/// Today's date in the user's local time zone.
#[cfg(target_arch = "wasm32")]
pub fn today() -> NaiveDate {
	let now = js_sys::Date::new_0();
	NaiveDate::from_ymd_opt(
		now.get_full_year() as i32,
		now.get_month() + 1,
		now.get_date(),
	)
	.unwrap_or_default()
}

/// Today's date in the local time zone.
#[cfg(not(target_arch = "wasm32"))]
pub fn today() -> NaiveDate {
	chrono::Local::now().date_naive()
}

/// Spawns a `!Send` future on the current thread.
#[cfg(target_arch = "wasm32")]
pub fn spawn_local<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	wasm_bindgen_futures::spawn_local(future);
}

/// Spawns a `!Send` future on the current thread.
///
/// Must be called from inside a [`tokio::task::LocalSet`].
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_local<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	tokio::task::spawn_local(future);
}

/// A DOM event listener that is removed when dropped.
#[cfg(target_arch = "wasm32")]
pub struct EventListener {
	target: web_sys::EventTarget,
	event: &'static str,
	callback: wasm_bindgen::closure::Closure<dyn FnMut(web_sys::Event)>,
}

#[cfg(target_arch = "wasm32")]
impl EventListener {
	/// Adds `callback` as a listener for `event` on `target`.
	pub fn new<F>(
		target: &web_sys::EventTarget,
		event: &'static str,
		callback: F,
	) -> Result<Self, wasm_bindgen::JsValue>
	where
		F: FnMut(web_sys::Event) + 'static,
	{
		use wasm_bindgen::JsCast;

		let callback = wasm_bindgen::closure::Closure::<dyn FnMut(web_sys::Event)>::new(callback);
		target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
		Ok(Self {
			target: target.clone(),
			event,
			callback,
		})
	}
}

#[cfg(target_arch = "wasm32")]
impl Drop for EventListener {
	fn drop(&mut self) {
		use wasm_bindgen::JsCast;

		let callback = self.callback.as_ref().unchecked_ref();
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, callback);
	}
}
