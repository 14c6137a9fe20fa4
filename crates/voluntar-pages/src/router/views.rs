//! Built-in views rendered when no route handler can produce content.

/// Escapes text for insertion into HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}
	escaped
}

/// Markup shown when a path has no handler and there is no home route.
pub fn not_found_view() -> String {
	concat!(
		r#"<section class="section">"#,
		r#"<div class="container text-center">"#,
		"<h2>Página não encontrada</h2>",
		r#"<p class="text-lg mb-4">A página que você procura não existe.</p>"#,
		r#"<a href="/" class="btn btn-primary">Voltar para Início</a>"#,
		"</div>",
		"</section>",
	)
	.to_string()
}

/// Markup shown when a route handler fails.
pub fn error_view(message: &str) -> String {
	format!(
		concat!(
			r#"<section class="section">"#,
			r#"<div class="container text-center">"#,
			"<h2>Erro ao carregar página</h2>",
			r#"<p class="text-lg mb-4">Ocorreu um erro. Tente novamente.</p>"#,
			r#"<p class="alert alert-error">{}</p>"#,
			r#"<a href="/" class="btn btn-primary">Voltar para Início</a>"#,
			"</div>",
			"</section>",
		),
		escape_html(message)
	)
}
