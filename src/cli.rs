use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use crate::persist::DEFAULT_TABLE_NAME;

pub const USAGE: &str = "Please provide the filepaths of the messages and categories \
datasets as the first and second argument respectively, as well as the filepath of the \
database to save the cleaned data to as the third argument. \n\nExample: disaster-etl \
disaster_messages.csv disaster_categories.csv DisasterResponse.db";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Merge disaster messages with their categories and save them to SQLite",
    long_about = None
)]
pub struct Cli {
    /// Messages CSV, categories CSV and destination database, in that order
    #[arg(value_name = "PATH", num_args = 0..)]
    pub paths: Vec<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of both input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Destination table name
    #[arg(long, default_value = DEFAULT_TABLE_NAME)]
    pub table: String,
    /// What to do when the destination table already exists
    #[arg(long = "if-exists", value_enum, default_value_t = IfExists::Fail)]
    pub if_exists: IfExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum IfExists {
    Fail,
    Replace,
    Append,
}

/// The three positional paths of a pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelinePaths<'a> {
    pub messages: &'a Path,
    pub categories: &'a Path,
    pub database: &'a Path,
}

impl Cli {
    /// Returns the paths only when exactly three were supplied.
    pub fn pipeline_paths(&self) -> Option<PipelinePaths<'_>> {
        match self.paths.as_slice() {
            [messages, categories, database] => Some(PipelinePaths {
                messages,
                categories,
                database,
            }),
            _ => None,
        }
    }
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
