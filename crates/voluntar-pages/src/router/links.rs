//! Decides which anchor clicks the controller takes over.

/// The parts of a click on an anchor that matter for interception.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkClick<'a> {
	/// Raw `href` attribute.
	pub href: Option<&'a str>,
	/// Raw `target` attribute.
	pub target: Option<&'a str>,
	/// Whether the anchor carries a `download` attribute.
	pub download: bool,
	/// `MouseEvent.button` (0 is the primary button).
	pub button: i16,
	/// Any of Ctrl, Meta, Shift or Alt held.
	pub modified: bool,
}

/// Why a click was left to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
	/// No usable `href`.
	NoHref,
	/// Absolute URL, protocol-relative URL or non-http scheme.
	External,
	/// In-page fragment.
	Fragment,
	/// Opens in a new browsing context.
	NewTab,
	/// Download link.
	Download,
	/// Modifier key or non-primary button.
	ModifiedClick,
}

/// Outcome of [`classify_link`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDecision {
	/// Prevent the default action and navigate in place.
	Intercept,
	/// Let the browser handle the click.
	Ignore(IgnoreReason),
}

/// Returns `true` when `href` starts with a URI scheme such as `https:` or `mailto:`.
fn has_scheme(href: &str) -> bool {
	let Some(colon) = href.find(':') else {
		return false;
	};
	let scheme = &href[..colon];
	let mut chars = scheme.chars();
	matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
		&& chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Classifies a click on an anchor.
///
/// ```
/// use voluntar_pages::router::{IgnoreReason, LinkClick, LinkDecision, classify_link};
///
/// let click = LinkClick { href: Some("/sobre.html"), ..Default::default() };
/// assert_eq!(classify_link(&click), LinkDecision::Intercept);
///
/// let mail = LinkClick { href: Some("mailto:contato@voluntar.org"), ..Default::default() };
/// assert_eq!(classify_link(&mail), LinkDecision::Ignore(IgnoreReason::External));
/// ```
pub fn classify_link(click: &LinkClick<'_>) -> LinkDecision {
	if click.modified || click.button != 0 {
		return LinkDecision::Ignore(IgnoreReason::ModifiedClick);
	}
	let href = match click.href.map(str::trim) {
		Some(href) if !href.is_empty() => href,
		_ => return LinkDecision::Ignore(IgnoreReason::NoHref),
	};
	if href.starts_with('#') {
		return LinkDecision::Ignore(IgnoreReason::Fragment);
	}
	if href.starts_with("//") || has_scheme(href) {
		return LinkDecision::Ignore(IgnoreReason::External);
	}
	if click
		.target
		.is_some_and(|t| t.trim().eq_ignore_ascii_case("_blank"))
	{
		return LinkDecision::Ignore(IgnoreReason::NewTab);
	}
	if click.download {
		return LinkDecision::Ignore(IgnoreReason::Download);
	}
	LinkDecision::Intercept
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn href(value: &str) -> LinkClick<'_> {
		LinkClick {
			href: Some(value),
			..Default::default()
		}
	}

	#[rstest]
	#[case("/")]
	#[case("/projetos")]
	#[case("/projetos.html")]
	#[case("contato.html")]
	#[case("../sobre.html")]
	#[case("/busca?q=doar")]
	#[case("/sobre#equipe")]
	fn test_internal_links_are_intercepted(#[case] value: &str) {
		assert_eq!(classify_link(&href(value)), LinkDecision::Intercept);
	}

	#[rstest]
	#[case("https://example.org")]
	#[case("http://example.org/a.html")]
	#[case("HTTPS://EXAMPLE.ORG")]
	#[case("//cdn.example.org/x.js")]
	#[case("mailto:contato@voluntar.org")]
	#[case("tel:+5511999999999")]
	#[case("javascript:void(0)")]
	#[case("whatsapp://send?text=oi")]
	fn test_external_links_are_ignored(#[case] value: &str) {
		assert_eq!(
			classify_link(&href(value)),
			LinkDecision::Ignore(IgnoreReason::External)
		);
	}

	#[rstest]
	fn test_fragment_and_missing_href() {
		assert_eq!(
			classify_link(&href("#conteudo")),
			LinkDecision::Ignore(IgnoreReason::Fragment)
		);
		assert_eq!(
			classify_link(&LinkClick::default()),
			LinkDecision::Ignore(IgnoreReason::NoHref)
		);
		assert_eq!(
			classify_link(&href("  ")),
			LinkDecision::Ignore(IgnoreReason::NoHref)
		);
	}

	#[rstest]
	fn test_new_tab_and_download() {
		let blank = LinkClick {
			target: Some("_blank"),
			..href("/relatorio")
		};
		assert_eq!(classify_link(&blank), LinkDecision::Ignore(IgnoreReason::NewTab));

		let same = LinkClick {
			target: Some("_self"),
			..href("/relatorio")
		};
		assert_eq!(classify_link(&same), LinkDecision::Intercept);

		let download = LinkClick {
			download: true,
			..href("/relatorio.pdf")
		};
		assert_eq!(
			classify_link(&download),
			LinkDecision::Ignore(IgnoreReason::Download)
		);
	}

	#[rstest]
	#[case(true, 0)]
	#[case(false, 1)]
	#[case(false, 2)]
	fn test_modified_clicks_are_ignored(#[case] modified: bool, #[case] button: i16) {
		let click = LinkClick {
			modified,
			button,
			..href("/sobre")
		};
		assert_eq!(
			classify_link(&click),
			LinkDecision::Ignore(IgnoreReason::ModifiedClick)
		);
	}
}
