//! Configuration options for a sort pass.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Byte that terminates each input and output record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// ASCII line feed.
    #[default]
    Newline,
    /// NUL byte, for paths that contain embedded newlines.
    Nul,
}

impl Delimiter {
    /// The raw byte value of this delimiter.
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Newline => b'\n',
            Delimiter::Nul => b'\0',
        }
    }
}

/// Facility used to ask the filesystem where a file's data begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// The `FIBMAP` ioctl, mapping logical block 0 to its physical block.
    ///
    /// Most filesystems only answer this for callers holding `CAP_SYS_RAWIO`.
    #[default]
    Fibmap,
    /// The `FIEMAP` ioctl, reading the physical offset of the first extent.
    ///
    /// Does not require privileges, and is supported by extent-based
    /// filesystems that never implemented `FIBMAP`.
    Fiemap,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Fibmap => "fibmap",
            Method::Fiemap => "fiemap",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`Method`] name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown block query method '{0}' (expected 'fibmap' or 'fiemap')")]
pub struct ParseMethodError(String);

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fibmap" => Ok(Method::Fibmap),
            "fiemap" => Ok(Method::Fiemap),
            _ => Err(ParseMethodError(s.to_string())),
        }
    }
}

/// Options for controlling a sort pass.
#[derive(Debug, Clone)]
pub struct Options {
    /// Record delimiter used for both input and output.
    pub delimiter: Delimiter,

    /// Prefix each output record with its block number and a space.
    pub show_key: bool,

    /// Block query method used by the resolver.
    pub method: Method,

    /// Program name used as the prefix of per-file diagnostic lines.
    pub program: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Newline,
            show_key: false,
            method: Method::Fibmap,
            program: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

impl Options {
    /// Create a new Options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record delimiter.
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enable or disable the block number prefix on output records.
    pub fn with_show_key(mut self, show: bool) -> Self {
        self.show_key = show;
        self
    }

    /// Set the block query method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set the program name shown in diagnostics.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = Options::default();
        assert_eq!(opts.delimiter, Delimiter::Newline);
        assert!(!opts.show_key);
        assert_eq!(opts.method, Method::Fibmap);
        assert_eq!(opts.program, "blksort");
    }

    #[test]
    fn test_builder_pattern() {
        let opts = Options::new()
            .with_delimiter(Delimiter::Nul)
            .with_show_key(true)
            .with_method(Method::Fiemap)
            .with_program("sorter");

        assert_eq!(opts.delimiter, Delimiter::Nul);
        assert!(opts.show_key);
        assert_eq!(opts.method, Method::Fiemap);
        assert_eq!(opts.program, "sorter");
    }

    #[test]
    fn test_delimiter_bytes() {
        assert_eq!(Delimiter::Newline.as_byte(), b'\n');
        assert_eq!(Delimiter::Nul.as_byte(), 0);
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("fibmap".parse::<Method>(), Ok(Method::Fibmap));
        assert_eq!("FIEMAP".parse::<Method>(), Ok(Method::Fiemap));
        assert_eq!(Method::Fiemap.to_string(), "fiemap");

        let err = "bmap".parse::<Method>().unwrap_err();
        assert!(err.to_string().contains("'bmap'"));
    }
}
