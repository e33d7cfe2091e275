// talog-core/src/infrastructure/adapters/file.rs

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::arguments::{Arguments, CallError};
use crate::domain::value::Value;
use crate::infrastructure::fs::{atomic_write, read_text};
use crate::ports::{DataSink, DataSource};

pub const REFERENCE: &str = "talog.sources.File";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFormat {
    #[default]
    Text,
    Lines,
    Yaml,
    Json,
}

impl FromStr for FileFormat {
    type Err = CallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(FileFormat::Text),
            "lines" => Ok(FileFormat::Lines),
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            "json" => Ok(FileFormat::Json),
            other => Err(CallError::failed(format!(
                "unknown file format '{other}' (expected text, lines, yaml or json)"
            ))),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileFormat::Text => "text",
            FileFormat::Lines => "lines",
            FileFormat::Yaml => "yaml",
            FileFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// A file on disk, decoded on every `read`. Constructing one touches nothing.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: FileFormat,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, format: FileFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    fn decode(&self, text: String) -> Result<Value, CallError> {
        Ok(match self.format {
            FileFormat::Text => Value::String(text),
            FileFormat::Lines => Value::List(text.lines().map(Value::from).collect()),
            FileFormat::Yaml => serde_yaml::from_str(&text).map_err(anyhow::Error::from)?,
            FileFormat::Json => serde_json::from_str(&text).map_err(anyhow::Error::from)?,
        })
    }

    fn encode(&self, data: &Value) -> Result<String, CallError> {
        match self.format {
            FileFormat::Text => data.as_str().map(str::to_string).ok_or_else(|| {
                CallError::failed(format!("text files take a string, got {}", data.kind()))
            }),
            FileFormat::Lines => {
                let items = data.as_list().ok_or_else(|| {
                    CallError::failed(format!("line files take a list, got {}", data.kind()))
                })?;
                let mut out = String::new();
                for item in items {
                    let line = item.as_str().ok_or_else(|| {
                        CallError::failed(format!("line files take strings, got {}", item.kind()))
                    })?;
                    out.push_str(line);
                    out.push('\n');
                }
                Ok(out)
            }
            FileFormat::Yaml => Ok(serde_yaml::to_string(data).map_err(anyhow::Error::from)?),
            FileFormat::Json => {
                Ok(serde_json::to_string_pretty(data).map_err(anyhow::Error::from)? + "\n")
            }
        }
    }
}

impl DataSource for FileSource {
    fn read(&self) -> Result<Value, CallError> {
        let text = read_text(&self.path).map_err(anyhow::Error::from)?;
        self.decode(text)
    }

    fn describe(&self) -> String {
        format!("File({}, {})", self.path.display(), self.format)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_sink(&self) -> Option<&dyn DataSink> {
        Some(self)
    }
}

impl DataSink for FileSource {
    fn write(&self, data: &Value) -> Result<(), CallError> {
        let content = self.encode(data)?;
        atomic_write(&self.path, content).map_err(anyhow::Error::from)?;
        Ok(())
    }
}

/// `talog.sources.File(path, format = "text")`
///
/// A relative `path` is joined onto `base_dir` when one is available, either
/// from the recipe or from the initialised parameters.
pub fn factory(mut args: Arguments) -> Result<Value, CallError> {
    let path: String = args.required("path")?;
    let format = match args.optional::<String>("format")? {
        Some(name) => name.parse()?,
        None => FileFormat::default(),
    };
    let base_dir: Option<String> = args.optional("base_dir")?;
    args.finish()?;

    let path = PathBuf::from(path);
    let path = match base_dir {
        Some(base) if path.is_relative() => Path::new(&base).join(path),
        _ => path,
    };
    Ok(Value::source(FileSource::new(path, format)))
}
