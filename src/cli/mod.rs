// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

pub use args::Args;
pub use output::{
    format_header, format_summary, print_json, print_presets, print_summary, ConversionSummary,
};
