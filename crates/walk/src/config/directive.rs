//! Walker directives recognised in build files.

use crate::ConfigError;

/// Raw `key value` directive as written in a build file.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Directive {
    /// Directive name, for example `exclude`.
    pub key: String,
    /// Everything after the name, trimmed. Empty when no argument was given.
    pub value: String,
}

impl Directive {
    /// Creates a directive.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Value of the `generation_mode` directive.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum GenerationMode {
    /// Create missing build files and update existing ones.
    #[default]
    CreateAndUpdate,
    /// Only update existing build files; directories without one roll their
    /// files up to the nearest ancestor that has one.
    UpdateOnly,
}

impl GenerationMode {
    /// Parses a directive value, ignoring surrounding whitespace.
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim() {
            "create_and_update" => Some(Self::CreateAndUpdate),
            "update_only" => Some(Self::UpdateOnly),
            _ => None,
        }
    }
}

pub(crate) const GENERATION_MODE: &str = "generation_mode";
pub(crate) const EXCLUDE: &str = "exclude";
pub(crate) const FOLLOW: &str = "follow";
pub(crate) const IGNORE: &str = "ignore";
pub(crate) const BUILD_FILE_NAME: &str = "build_file_name";

/// Directive names owned by the walker.
pub const WALK_DIRECTIVES: [&str; 5] = [GENERATION_MODE, EXCLUDE, FOLLOW, IGNORE, BUILD_FILE_NAME];

/// Walker directive after its key and argument have been interpreted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WalkDirective {
    /// `generation_mode update_only|create_and_update`
    GenerationMode(GenerationMode),
    /// `exclude <pattern>`, pattern relative to the declaring directory.
    Exclude(String),
    /// `follow <pattern>`, pattern relative to the declaring directory.
    Follow(String),
    /// `ignore`; any argument is kept so it can be reported.
    Ignore {
        /// Unexpected argument, if one was written.
        argument: Option<String>,
    },
    /// `build_file_name a,b`
    BuildFileNames(Vec<String>),
}

impl WalkDirective {
    /// Interprets one raw directive.
    ///
    /// Returns `Ok(None)` for directives the walker does not own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownGenerationMode`] for a
    /// `generation_mode` value other than the two known modes.
    pub fn parse(directive: &Directive, pkg: &str) -> Result<Option<Self>, ConfigError> {
        let value = directive.value.trim();
        let parsed = match directive.key.as_str() {
            GENERATION_MODE => {
                let mode = GenerationMode::from_value(value).ok_or_else(|| {
                    ConfigError::UnknownGenerationMode {
                        value: directive.value.clone(),
                        pkg: pkg.to_owned(),
                    }
                })?;
                Self::GenerationMode(mode)
            }
            EXCLUDE => Self::Exclude(value.to_owned()),
            FOLLOW => Self::Follow(value.to_owned()),
            IGNORE => Self::Ignore {
                argument: (!value.is_empty()).then(|| value.to_owned()),
            },
            BUILD_FILE_NAME => Self::BuildFileNames(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_owned)
                    .collect(),
            ),
            _ => return Ok(None),
        };
        Ok(Some(parsed))
    }

    /// Interprets every walker directive in `directives`, in order.
    pub fn parse_all(directives: &[Directive], pkg: &str) -> Result<Vec<Self>, ConfigError> {
        let mut parsed = Vec::new();
        for directive in directives {
            if let Some(walk_directive) = Self::parse(directive, pkg)? {
                parsed.push(walk_directive);
            }
        }
        Ok(parsed)
    }
}
