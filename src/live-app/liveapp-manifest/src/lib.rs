//! Live app option records and JSON manifest merging.
//!
//! Holds the answers collected by `live-app init` (package options and
//! manifest options), the name derivations used as prompt defaults, and the
//! field-by-field merge that writes those answers into a template's
//! `package.json` and `manifest.json`.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::path::Path;

/// File name of the npm package metadata inside a template.
pub const PACKAGE_JSON: &str = "package.json";

/// File name of the app manifest inside a template.
pub const MANIFEST_JSON: &str = "manifest.json";

/// Default `version_name` offered by the customization prompts.
pub const DEFAULT_VERSION_NAME: &str = "1.0.0-alpha.0";

/// Default `initial_height` offered by the customization prompts.
pub const DEFAULT_INITIAL_HEIGHT: i64 = 300;

/// Answer to the width prompt meaning "leave the width unspecified".
pub const NO_WIDTH: &str = "none";

/// Message shown when a numeric answer does not parse.
pub const NOT_A_NUMBER: &str = "Please enter a number.";

// ============================================================================
// Error type
// ============================================================================

/// Errors raised while materializing a template or merging its JSON files.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("template '{id}' not found at {path}")]
    TemplateNotFound { id: String, path: String },

    #[error("destination {path} already exists; choose another package name or remove it")]
    DestinationExists { path: String },

    #[error("parsing {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: expected a JSON object at the top level")]
    NotAnObject { path: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Build an [`Error::Io`] for `path`.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Build tooling baked into a template. Only webpack ships today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bundler {
    #[default]
    Webpack,
}

impl Bundler {
    pub fn as_str(self) -> &'static str {
        match self {
            Bundler::Webpack => "webpack",
        }
    }
}

impl std::fmt::Display for Bundler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color of the app toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Violet,
}

impl ToolbarColor {
    /// Every color, in the order the prompt lists them.
    pub const ALL: [ToolbarColor; 6] = [
        ToolbarColor::Red,
        ToolbarColor::Orange,
        ToolbarColor::Yellow,
        ToolbarColor::Green,
        ToolbarColor::Blue,
        ToolbarColor::Violet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolbarColor::Red => "red",
            ToolbarColor::Orange => "orange",
            ToolbarColor::Yellow => "yellow",
            ToolbarColor::Green => "green",
            ToolbarColor::Blue => "blue",
            ToolbarColor::Violet => "violet",
        }
    }
}

impl std::fmt::Display for ToolbarColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the host sizes the app frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMode {
    FillContainer,
    FitContent,
    Scale,
}

impl SizingMode {
    /// Every sizing mode, in the order the prompt lists them.
    pub const ALL: [SizingMode; 3] = [
        SizingMode::FillContainer,
        SizingMode::FitContent,
        SizingMode::Scale,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SizingMode::FillContainer => "fill_container",
            SizingMode::FitContent => "fit_content",
            SizingMode::Scale => "scale",
        }
    }
}

impl std::fmt::Display for SizingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Initial frame width. Stored in `manifest.json` as an integer where `-1`
/// means the host picks the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialWidth {
    #[default]
    Unspecified,
    Pixels(i64),
}

impl InitialWidth {
    const UNSPECIFIED: i64 = -1;

    pub fn as_i64(self) -> i64 {
        match self {
            InitialWidth::Unspecified => Self::UNSPECIFIED,
            InitialWidth::Pixels(px) => px,
        }
    }
}

impl From<i64> for InitialWidth {
    fn from(value: i64) -> Self {
        if value == Self::UNSPECIFIED {
            InitialWidth::Unspecified
        } else {
            InitialWidth::Pixels(value)
        }
    }
}

impl Serialize for InitialWidth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

// ============================================================================
// Option records
// ============================================================================

/// Answers that end up in `package.json` and pick the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageOptions {
    pub name: String,
    pub description: String,
    pub typescript: bool,
    pub bundler: Bundler,
}

impl PackageOptions {
    /// Fields overwritten in the template's `package.json`.
    ///
    /// `typescript` and `bundler` only select the template, so they are not
    /// written.
    pub fn package_json_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::from(self.name.as_str()));
        fields.insert("description".into(), Value::from(self.description.as_str()));
        fields
    }
}

/// Answers that end up in `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestOptions {
    pub name: String,
    pub description: String,
    /// Present only when the user chose to customize the manifest.
    #[serde(flatten)]
    pub customization: Option<ManifestCustomization>,
}

/// Presentation settings collected by the optional customization prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestCustomization {
    pub version_name: String,
    pub toolbar_color: ToolbarColor,
    pub disable_app_level_comments: bool,
    pub sizing_mode: SizingMode,
    pub initial_height: i64,
    pub initial_width: InitialWidth,
}

impl Default for ManifestCustomization {
    fn default() -> Self {
        Self {
            version_name: DEFAULT_VERSION_NAME.to_string(),
            toolbar_color: ToolbarColor::Red,
            disable_app_level_comments: false,
            sizing_mode: SizingMode::FillContainer,
            initial_height: DEFAULT_INITIAL_HEIGHT,
            initial_width: InitialWidth::Unspecified,
        }
    }
}

impl ManifestOptions {
    /// Fields overwritten in the template's `manifest.json`.
    pub fn manifest_json_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::from(self.name.as_str()));
        fields.insert("description".into(), Value::from(self.description.as_str()));

        if let Some(custom) = &self.customization {
            fields.insert(
                "version_name".into(),
                Value::from(custom.version_name.as_str()),
            );
            fields.insert(
                "toolbar_color".into(),
                Value::from(custom.toolbar_color.as_str()),
            );
            fields.insert(
                "disable_app_level_comments".into(),
                Value::from(custom.disable_app_level_comments),
            );
            fields.insert(
                "sizing_mode".into(),
                Value::from(custom.sizing_mode.as_str()),
            );
            fields.insert("initial_height".into(), Value::from(custom.initial_height));
            fields.insert(
                "initial_width".into(),
                Value::from(custom.initial_width.as_i64()),
            );
        }

        fields
    }
}

// ============================================================================
// Prompt defaults and answer parsing
// ============================================================================

/// Derive a display name from a directory name.
///
/// Every character that is not a word character or whitespace becomes a
/// space, the first letter of each whitespace-separated token is upper-cased,
/// and surrounding whitespace is trimmed. Applying it to its own output
/// changes nothing.
pub fn display_name_from_dir(dir_name: &str) -> String {
    let cleaned: String = dir_name
        .chars()
        .map(|c| {
            if is_word_char(c) || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut out = String::with_capacity(cleaned.len());
    let mut token_start = true;
    for c in cleaned.trim().chars() {
        if c.is_whitespace() {
            token_start = true;
            out.push(c);
        } else if token_start {
            token_start = false;
            // Some letters upper-case to a base letter plus combining marks
            // (`ǰ` -> `J` U+030C); those stay as typed.
            let upper: String = c.to_uppercase().collect();
            if upper.chars().all(is_word_char) {
                out.push_str(&upper);
            } else {
                out.push(c);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Derive the default package name from a display name: lower-cased, with
/// each run of whitespace collapsed to a single hyphen.
pub fn package_name_from_display(display_name: &str) -> String {
    let mut out = String::with_capacity(display_name.len());
    let mut in_space = false;
    for c in display_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            in_space = false;
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Parse a numeric answer as a base-10 integer.
pub fn parse_dimension(input: &str) -> Result<i64, &'static str> {
    input.trim().parse::<i64>().map_err(|_| NOT_A_NUMBER)
}

/// Parse the width answer: [`NO_WIDTH`] or a base-10 integer.
pub fn parse_width(input: &str) -> Result<InitialWidth, &'static str> {
    if input.trim() == NO_WIDTH {
        return Ok(InitialWidth::Unspecified);
    }
    parse_dimension(input).map(InitialWidth::from)
}

// ============================================================================
// JSON merge
// ============================================================================

/// Overwrite `target` with every entry in `fields`.
///
/// Keys absent from `fields` keep their value and position; overwritten keys
/// keep their position; new keys are appended.
pub fn merge_fields(target: &mut Map<String, Value>, fields: Map<String, Value>) {
    for (key, value) in fields {
        target.insert(key, value);
    }
}

/// Render a value as JSON indented with four spaces, newline-terminated.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Read a JSON file whose top-level value must be an object.
pub fn read_json_object(path: &Path) -> Result<Map<String, Value>, Error> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let value: Value = serde_json::from_str(&content).map_err(|source| Error::Json {
        path: path.display().to_string(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::NotAnObject {
            path: path.display().to_string(),
        }),
    }
}

/// Write a JSON object with four-space indentation, replacing the file.
pub fn write_json_object(path: &Path, object: &Map<String, Value>) -> Result<(), Error> {
    let rendered = to_pretty_json(object).map_err(|source| Error::Json {
        path: path.display().to_string(),
        source,
    })?;
    std::fs::write(path, rendered).map_err(|e| Error::io(path, e))
}

/// Merge `fields` into the JSON object stored at `path` and write it back.
pub fn merge_json_file(path: &Path, fields: Map<String, Value>) -> Result<(), Error> {
    let mut object = read_json_object(path)?;
    merge_fields(&mut object, fields);
    write_json_object(path, &object)
}
