//! Path normalization.
//!
//! Routes are keyed by a canonical form of the path: leading slash, no
//! trailing slash, no `.html` extension. The empty path maps to the home
//! route [`HOME_ROUTE`]. Query strings and fragments never take part in
//! matching.

/// Canonical key of the home page.
pub const HOME_ROUTE: &str = "/index";

/// Splits `input` into its path and the `?query#fragment` remainder.
fn split_suffix(input: &str) -> (&str, &str) {
	match input.find(['?', '#']) {
		Some(at) => input.split_at(at),
		None => (input, ""),
	}
}

fn with_leading_slash(path: &str) -> String {
	if path.starts_with('/') {
		path.to_string()
	} else {
		format!("/{}", path)
	}
}

/// Returns the canonical route key for `input`.
///
/// ```
/// use voluntar_pages::router::canonical_key;
///
/// assert_eq!(canonical_key("/projetos.html"), "/projetos");
/// assert_eq!(canonical_key("/projetos/"), "/projetos");
/// assert_eq!(canonical_key("/"), "/index");
/// assert_eq!(canonical_key("/sobre?aba=equipe"), "/sobre");
/// ```
pub fn canonical_key(input: &str) -> String {
	let (mut path, _) = split_suffix(input.trim());
	loop {
		let trimmed = path.trim_end_matches('/');
		match trimmed.strip_suffix(".html") {
			Some(rest) => path = rest,
			None => {
				path = trimmed;
				break;
			}
		}
	}

	if path.is_empty() {
		HOME_ROUTE.to_string()
	} else {
		with_leading_slash(path)
	}
}

/// Returns the URL recorded in history for `input`: the `.html` extension
/// is dropped along with any slash after it, everything else is kept.
///
/// ```
/// use voluntar_pages::router::history_url;
///
/// assert_eq!(history_url("/projetos.html"), "/projetos");
/// assert_eq!(history_url("/sobre.html#equipe"), "/sobre#equipe");
/// assert_eq!(history_url("/projetos.html/"), "/projetos");
/// assert_eq!(history_url(""), "/");
/// ```
pub fn history_url(input: &str) -> String {
	let (path, suffix) = split_suffix(input.trim());
	let path = path
		.trim_end_matches('/')
		.strip_suffix(".html")
		.unwrap_or(path);
	format!("{}{}", with_leading_slash(path), suffix)
}

/// Path under which navigation links point to `key` (`/index` is `/`).
pub fn display_path(key: &str) -> &str {
	if key == HOME_ROUTE { "/" } else { key }
}

/// `href` values of the navigation links that represent `key`.
///
/// ```
/// use voluntar_pages::router::active_hrefs;
///
/// assert_eq!(active_hrefs("/index"), vec!["/", "/index.html"]);
/// assert_eq!(active_hrefs("/sobre"), vec!["/sobre", "/sobre.html"]);
/// ```
pub fn active_hrefs(key: &str) -> Vec<String> {
	let display = display_path(key);
	if display == "/" {
		vec!["/".to_string(), format!("{}.html", HOME_ROUTE)]
	} else {
		vec![display.to_string(), format!("{}.html", display)]
	}
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod proptests {
	use super::*;
	use proptest::prelude::*;

	fn segments() -> impl Strategy<Value = String> {
		prop::collection::vec("[a-z0-9-]{1,8}", 0..4).prop_map(|s| format!("/{}", s.join("/")))
	}

	proptest! {
		#[test]
		fn canonical_key_is_idempotent(path in "[a-z/.]{0,16}") {
			let key = canonical_key(&path);
			prop_assert_eq!(canonical_key(&key), key);
		}

		#[test]
		fn canonical_key_shape(path in "[a-z/.?#]{0,16}") {
			let key = canonical_key(&path);
			prop_assert!(key.starts_with('/'));
			prop_assert!(!key.ends_with('/'));
			prop_assert!(!key.ends_with(".html"));
		}

		#[test]
		fn history_url_keeps_route_key(path in "[a-z/.?#]{0,16}") {
			prop_assert_eq!(canonical_key(&history_url(&path)), canonical_key(&path));
		}

		#[test]
		fn html_variant_shares_key(path in segments()) {
			prop_assert_eq!(canonical_key(&format!("{}.html", path)), canonical_key(&path));
			prop_assert_eq!(canonical_key(&format!("{}/", path)), canonical_key(&path));
		}
	}
}
