//! HTML rendering.
//!
//! Pages are small and static apart from the form, so they are built with `format!` rather
//! than a template engine. Everything that did not originate in this file goes through
//! [`escape`].

use hdp_core::{
    DomainSchema, FieldIssue, FieldKind, FieldSpec, NumberType, Presentation, SchemaRegistry,
    Severity,
};
use std::collections::HashMap;
use std::fmt::Write;

/// What to show above the form after a submission.
#[derive(Debug)]
pub enum Panel {
    Result(Presentation),
    Issues(Vec<FieldIssue>),
    Error(String),
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "<style>\n\
    body { font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }\n\
    .result, .error { padding: 0.75rem 1rem; border-radius: 4px; margin-bottom: 1rem; }\n\
    .result.positive { background: #fdecea; color: #8a1c12; border: 1px solid #f5c2bd; }\n\
    .error { background: #fff4e5; color: #663c00; border: 1px solid #ffd8a8; }\n\
    .result.negative { background: #e8f5e9; color: #1b5e20; border: 1px solid #b9dfbb; }\n\
    label { display: block; font-weight: bold; }\n\
    </style>\n";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n{STYLE}</head>\n<body>\n<main>\n{body}</main>\n</body>\n</html>\n",
        title = escape(title),
    )
}

/// Domain selector.
pub fn index(registry: &SchemaRegistry) -> String {
    let mut body = String::from("<h1>Health Disease Prediction</h1>\n<ul>\n");
    for schema in registry.schemas() {
        let _ = writeln!(
            body,
            "<li><a href=\"/predict/{slug}\">{title}</a></li>",
            slug = schema.domain.slug(),
            title = escape(schema.domain.title()),
        );
    }
    body.push_str("</ul>\n");
    layout("Health Disease Prediction", &body)
}

/// The domain's form, optionally with a panel from the last submission.
///
/// `values` are what the user last submitted; fields without one show their default, if any.
pub fn form(
    schema: &DomainSchema,
    values: &HashMap<String, String>,
    panel: Option<&Panel>,
) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape(schema.title));
    if let Some(panel) = panel {
        body.push_str(&render_panel(panel));
    }

    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"/predict/{}\">",
        schema.domain.slug()
    );
    for field in &schema.fields {
        let value = values.get(field.name).map(String::as_str);
        body.push_str(&render_field(field, value));
    }
    body.push_str("<button type=\"submit\">Predict</button>\n</form>\n");
    body.push_str("<p><a href=\"/\">Choose another prediction</a></p>\n");

    layout(schema.title, &body)
}

/// Page shown when the domain itself cannot be served.
pub fn not_found(name: &str) -> String {
    let body = format!(
        "<h1>Not found</h1>\n<div class=\"error\" role=\"alert\">No prediction is available \
         for {}.</div>\n<p><a href=\"/\">Choose a prediction</a></p>\n",
        escape(name)
    );
    layout("Not found", &body)
}

fn render_panel(panel: &Panel) -> String {
    match panel {
        Panel::Result(p) => {
            let class = match p.severity {
                Severity::Positive => "positive",
                Severity::Negative => "negative",
            };
            let label = p
                .label
                .as_deref()
                .map(|l| format!(" <span class=\"label\">({})</span>", escape(l)))
                .unwrap_or_default();
            format!(
                "<div class=\"result {class}\" role=\"status\"><strong>{}</strong>{label}\
                 <p class=\"severity\">{}</p></div>\n",
                escape(p.message),
                p.severity,
            )
        }
        Panel::Issues(issues) => {
            let mut out = String::from(
                "<div class=\"error\" role=\"alert\">Please correct the following:\n<ul>\n",
            );
            for issue in issues {
                let _ = writeln!(
                    out,
                    "<li>{}: {}</li>",
                    escape(&issue.field),
                    escape(&issue.message)
                );
            }
            out.push_str("</ul>\n</div>\n");
            out
        }
        Panel::Error(message) => format!(
            "<div class=\"error\" role=\"alert\">{}</div>\n",
            escape(message)
        ),
    }
}

fn render_field(field: &FieldSpec, value: Option<&str>) -> String {
    let name = escape(field.name);
    let label = escape(field.label);

    match &field.kind {
        FieldKind::Numeric(spec) => {
            let value = match (value, spec.default) {
                (Some(v), _) => escape(v),
                (None, Some(default)) => format_number(default, spec.number),
                (None, None) => String::new(),
            };
            format!(
                "<p><label for=\"{name}\">{label}</label>\n\
                 <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" \
                 max=\"{max}\" step=\"{step}\" value=\"{value}\" required></p>\n",
                min = format_number(spec.min, spec.number),
                max = format_number(spec.max, spec.number),
                step = spec.step,
            )
        }
        FieldKind::Choice { options } => {
            let mut out = format!(
                "<p><label for=\"{name}\">{label}</label>\n\
                 <select id=\"{name}\" name=\"{name}\" required>\n"
            );
            // No choice is preselected on a fresh form.
            let placeholder = if value.is_none() { " selected" } else { "" };
            let _ = writeln!(
                out,
                "<option value=\"\" disabled{placeholder}>Select...</option>"
            );
            for option in options {
                let selected = if value == Some(option.label) {
                    " selected"
                } else {
                    ""
                };
                let _ = writeln!(
                    out,
                    "<option value=\"{v}\"{selected}>{v}</option>",
                    v = escape(option.label)
                );
            }
            out.push_str("</select></p>\n");
            out
        }
    }
}

fn format_number(value: f64, number: NumberType) -> String {
    match number {
        NumberType::Integer => format!("{}", value.round() as i64),
        NumberType::Float => value.to_string(),
    }
}
