// talog-core/src/infrastructure/template/jinja.rs

// Renders parameter and catalog files before they are parsed as YAML.
// Undefined values are a hard error: a typo in a placeholder must never turn
// into an empty string inside a connection string.

use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use tracing::debug;

use crate::infrastructure::error::TemplateError;
use crate::ports::TemplateEngine;

pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl JinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        // Files are YAML, not HTML.
        env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
        env.set_keep_trailing_newline(true);

        // {{ env("HOME") }} or {{ env("TARGET", "dev") }}
        env.add_function(
            "env",
            |name: String, default: Option<String>| -> Result<String, minijinja::Error> {
                match (std::env::var(&name), default) {
                    (Ok(value), _) => Ok(value),
                    (Err(_), Some(default)) => Ok(default),
                    (Err(_), None) => Err(minijinja::Error::new(
                        ErrorKind::UndefinedError,
                        format!("environment variable '{name}' is not set"),
                    )),
                }
            },
        );

        Self { env }
    }
}

impl Default for JinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for JinjaRenderer {
    fn render(
        &self,
        name: &str,
        template: &str,
        context: &serde_yaml::Mapping,
    ) -> Result<String, TemplateError> {
        debug!(file = name, keys = context.len(), "Rendering template");
        let ctx = minijinja::Value::from_serialize(context);
        self.env
            .render_named_str(name, template, ctx)
            .map_err(|e| to_template_error(name, template, &e))
    }
}

fn to_template_error(name: &str, template: &str, err: &minijinja::Error) -> TemplateError {
    match err.kind() {
        ErrorKind::UndefinedError => {
            let placeholder = err
                .range()
                .and_then(|range| template.get(range))
                .map(|s| {
                    s.trim()
                        .trim_start_matches("{{")
                        .trim_end_matches("}}")
                        .trim()
                        .to_string()
                })
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| err.detail().unwrap_or("<unknown>").to_string());
            TemplateError::Unresolved {
                file: name.to_string(),
                placeholder,
                line: err.line().unwrap_or(0),
            }
        }
        _ => TemplateError::Malformed {
            file: name.to_string(),
            message: err.to_string(),
        },
    }
}
