//! Command-line configuration for the `jpeg-exif` binary.
//!
//! Arguments are parsed with clap; options that make sense to set once per
//! environment can also come from variables with the `JPEG_EXIF_` prefix:
//!
//! - `JPEG_EXIF_FORMAT` - Dump output format (default: text)
//! - `JPEG_EXIF_BYTE_ORDER` - Byte order of written EXIF blocks (default: little)
//! - `JPEG_EXIF_MAX_DIRECTORIES` - Directory cap when decoding (default: 16)
//!
//! # Example
//!
//! ```ignore
//! use jpeg_exif::config::{Cli, Command};
//!
//! let cli = Cli::parse();
//! match cli.command {
//!     Command::Dump(config) => println!("{}", config.file.display()),
//!     _ => {}
//! }
//! ```

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::error::TagError;
use crate::exif::Options;
use crate::format::tiff::{ByteOrder, FieldType, ReadOptions, WriteOptions, DEFAULT_MAX_DIRECTORIES};
use crate::tags::{dictionary, TagRef, TagValue};

// =============================================================================
// CLI Arguments
// =============================================================================

/// jpeg-exif - Inspect and rewrite EXIF metadata in JPEG files.
///
/// Only the EXIF segment is touched; every other segment and the
/// compressed image data are copied byte for byte.
#[derive(Parser, Debug, Clone)]
#[command(name = "jpeg-exif")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the EXIF tags of a JPEG file.
    Dump(DumpConfig),

    /// Set one or more tags.
    Set(SetConfig),

    /// Remove the EXIF segment.
    Strip(StripConfig),

    /// Re-emit a JPEG segment by segment without changes.
    Copy(CopyConfig),
}

// =============================================================================
// Shared Options
// =============================================================================

/// Codec settings shared by every subcommand.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CodecArgs {
    /// Maximum number of IFDs visited while decoding.
    #[arg(long, default_value_t = DEFAULT_MAX_DIRECTORIES, env = "JPEG_EXIF_MAX_DIRECTORIES")]
    pub max_directories: usize,

    /// Byte order of EXIF blocks written by this tool.
    #[arg(long, value_enum, default_value_t = ByteOrderArg::Little, env = "JPEG_EXIF_BYTE_ORDER")]
    pub byte_order: ByteOrderArg,
}

impl Default for CodecArgs {
    fn default() -> Self {
        Self {
            max_directories: DEFAULT_MAX_DIRECTORIES,
            byte_order: ByteOrderArg::Little,
        }
    }
}

impl CodecArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_directories == 0 {
            return Err("max_directories must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn options(&self) -> Options {
        Options::new()
            .with_read(ReadOptions::new().with_max_directories(self.max_directories))
            .with_write(WriteOptions::new().with_byte_order(self.byte_order.into()))
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrderArg {
    /// II, Intel order
    Little,
    /// MM, Motorola order
    Big,
}

impl From<ByteOrderArg> for ByteOrder {
    fn from(arg: ByteOrderArg) -> Self {
        match arg {
            ByteOrderArg::Little => ByteOrder::LittleEndian,
            ByteOrderArg::Big => ByteOrder::BigEndian,
        }
    }
}

// =============================================================================
// Dump
// =============================================================================

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    /// One `Directory.Name: values` line per tag
    Text,
    /// JSON array of tag records
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct DumpConfig {
    /// JPEG file to read.
    pub file: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = DumpFormat::Text, env = "JPEG_EXIF_FORMAT")]
    pub format: DumpFormat,

    #[command(flatten)]
    pub codec: CodecArgs,
}

impl DumpConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.codec.validate()
    }
}

// =============================================================================
// Set
// =============================================================================

/// One `--tag NAME=VALUE` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct TagAssignment {
    pub tag: TagRef,
    pub values: Vec<TagValue>,
}

impl TagAssignment {
    /// Parse `NAME=VALUE`, resolving the name through the tag dictionary.
    pub fn parse(text: &str) -> Result<Self, TagError> {
        let (name, value) = text.split_once('=').ok_or_else(|| TagError::Parse {
            field_type: FieldType::Ascii,
            input: text.to_string(),
            message: "expected NAME=VALUE".to_string(),
        })?;
        let tag = dictionary::resolve(name.trim())?;
        let values = TagValue::parse(tag.field_type, value)?;
        Ok(Self { tag, values })
    }
}

#[derive(Args, Debug, Clone)]
pub struct SetConfig {
    /// JPEG file to update.
    pub file: PathBuf,

    /// Tag assignment such as `Make=Acme` or `Exif.FNumber=28/10`. Repeatable.
    #[arg(short, long = "tag", value_name = "NAME=VALUE", required = true)]
    pub tags: Vec<String>,

    /// Write the result here instead of replacing FILE.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub codec: CodecArgs,
}

impl SetConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.codec.validate()?;
        check_output(&self.file, self.output.as_deref())?;
        if self.tags.is_empty() {
            return Err("At least one --tag NAME=VALUE is required".to_string());
        }
        self.assignments().map(|_| ()).map_err(|e| e.to_string())
    }

    pub fn assignments(&self) -> Result<Vec<TagAssignment>, TagError> {
        self.tags.iter().map(|t| TagAssignment::parse(t)).collect()
    }
}

// =============================================================================
// Strip / Copy
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct StripConfig {
    /// JPEG file to strip.
    pub file: PathBuf,

    /// Write the result here instead of replacing FILE.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl StripConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_output(&self.file, self.output.as_deref())
    }
}

#[derive(Args, Debug, Clone)]
pub struct CopyConfig {
    /// JPEG file to read.
    pub file: PathBuf,

    /// Destination file.
    #[arg(short, long)]
    pub output: PathBuf,
}

impl CopyConfig {
    pub fn validate(&self) -> Result<(), String> {
        check_output(&self.file, Some(&self.output))
    }
}

/// Writing to the input path would truncate it before it is read.
fn check_output(file: &Path, output: Option<&Path>) -> Result<(), String> {
    if output == Some(file) {
        return Err("--output must differ from the input file; omit it to edit in place".to_string());
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
