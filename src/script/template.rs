use std::path::Path;

/// The only placeholder a per-job command may reference.
pub const FILE_PLACEHOLDER: &str = "File";

/// Errors from rendering a per-job command template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
	#[error("unterminated placeholder starting at byte {offset}")]
	Unterminated { offset: usize },

	#[error("empty placeholder at byte {offset}")]
	EmptyPlaceholder { offset: usize },

	#[error("unknown placeholder `{name}` (only `{{{{File}}}}` is available)")]
	UnknownPlaceholder { name: String },
}

/// Render one command template, replacing `{{File}}` with `file`.
///
/// Placeholders may carry surrounding whitespace and a leading dot, so
/// `{{File}}`, `{{ File }}` and `{{.File}}` are equivalent. Text outside
/// placeholders is copied unchanged. A stray `}}` is literal text.
pub fn render_command(template: &str, file: &Path) -> Result<String, TemplateError> {
	let file = file.to_string_lossy();
	let mut output = String::with_capacity(template.len() + file.len());
	let mut rest = template;
	let mut offset = 0;

	while let Some(start) = rest.find("{{") {
		output.push_str(&rest[..start]);

		let inner = &rest[start + 2..];
		let Some(end) = inner.find("}}") else {
			return Err(TemplateError::Unterminated {
				offset: offset + start,
			});
		};

		let name = inner[..end].trim();
		let name = name.strip_prefix('.').unwrap_or(name).trim();
		if name.is_empty() {
			return Err(TemplateError::EmptyPlaceholder {
				offset: offset + start,
			});
		}
		if name != FILE_PLACEHOLDER {
			return Err(TemplateError::UnknownPlaceholder {
				name: name.to_string(),
			});
		}
		output.push_str(&file);

		let consumed = start + 2 + end + 2;
		offset += consumed;
		rest = &rest[consumed..];
	}

	output.push_str(rest);
	Ok(output)
}
