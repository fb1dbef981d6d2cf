// Wrapper types making it harder to accidentally use the wrong underlying type.

use std::borrow::Cow;
use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// A block position in the device grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Creates a new block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns a new position offset by the given deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Error produced when parsing an [`Identifier`] from a string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    /// The string did not contain exactly one `:` separator.
    #[error("invalid identifier: {0}")]
    Malformed(String),
    /// The namespace contained characters outside `[a-z0-9_.-]`.
    #[error("invalid namespace: {0}")]
    Namespace(String),
    /// The path contained characters outside `[a-z0-9_./-]`.
    #[error("invalid path: {0}")]
    Path(String),
}

/// A namespaced resource name, e.g. `tankworks:water`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// The namespace part, before the `:`.
    pub namespace: Cow<'static, str>,
    /// The path part, after the `:`.
    pub path: Cow<'static, str>,
}

impl Identifier {
    /// The namespace used for identifiers without an explicit one.
    pub const DEFAULT_NAMESPACE: &'static str = "tankworks";

    /// Creates an identifier in the default namespace.
    #[must_use]
    pub const fn default_namespace(path: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(Self::DEFAULT_NAMESPACE),
            path: Cow::Borrowed(path),
        }
    }

    fn valid_namespace_char(c: char) -> bool {
        c == '_' || c == '-' || c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.'
    }

    fn valid_path_char(c: char) -> bool {
        Self::valid_namespace_char(c) || c == '/'
    }

    /// Validates a namespace string.
    #[must_use]
    pub fn validate_namespace(namespace: &str) -> bool {
        !namespace.is_empty() && namespace.chars().all(Self::valid_namespace_char)
    }

    /// Validates a path string.
    #[must_use]
    pub fn validate_path(path: &str) -> bool {
        !path.is_empty() && path.chars().all(Self::valid_path_char)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((namespace, path)) = s.split_once(':') else {
            return Err(IdentifierError::Malformed(s.to_string()));
        };

        if !Self::validate_namespace(namespace) {
            return Err(IdentifierError::Namespace(namespace.to_string()));
        }

        if !Self::validate_path(path) {
            return Err(IdentifierError::Path(path.to_string()));
        }

        Ok(Self {
            namespace: Cow::Owned(namespace.to_string()),
            path: Cow::Owned(path.to_string()),
        })
    }
}
