// CLI configuration
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use opusmux::AudioConfig;

use crate::cli::output::OutputFormat;

/// opusmux - raw Opus recording to Ogg Opus converter
#[derive(Parser, Debug)]
#[command(name = "opusmux")]
#[command(about = "Converts proprietary raw Opus recordings into standard Ogg Opus files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Quiet mode (suppress progress messages)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug-level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Record layout and audio parameters shared by the converting commands.
#[derive(Args, Debug, Clone)]
pub struct AudioArgs {
    /// Input sample rate in Hz
    #[arg(long, default_value_t = 16000)]
    pub sample_rate: u32,

    /// Channel count
    #[arg(long, default_value_t = 1)]
    pub channels: u8,

    /// Frame duration in milliseconds
    #[arg(long, default_value_t = 20)]
    pub frame_duration: u32,

    /// Compressed frame payload size in bytes
    #[arg(long, default_value_t = 40)]
    pub frame_size: usize,

    /// Opaque per-record header size in bytes
    #[arg(long, default_value_t = 8)]
    pub header_size: usize,
}

impl AudioArgs {
    pub fn to_config(&self) -> AudioConfig {
        AudioConfig {
            sample_rate: self.sample_rate,
            channels: self.channels,
            frame_duration_ms: self.frame_duration,
            compressed_frame_size: self.frame_size,
            header_size: self.header_size,
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert one recording into an Ogg Opus file
    Convert {
        /// Input recording path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output path (defaults to the input path with an .ogg extension)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        #[command(flatten)]
        audio: AudioArgs,

        /// Skip the advisory post-conversion verification
        #[arg(long)]
        no_verify: bool,
    },

    /// Convert every matching recording under a directory
    Batch {
        /// Directory path
        #[arg(short, long)]
        directory: String,

        /// File pattern (e.g., "*.opus", "*.dat")
        #[arg(short, long)]
        pattern: String,

        #[command(flatten)]
        audio: AudioArgs,
    },

    /// Run the structural sanity check on Ogg file(s)
    Verify {
        /// Ogg file path(s)
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Show stream structure of Ogg Opus file(s)
    Info {
        /// Ogg file path(s)
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,
    },
}

/// Batch operation outcome tally.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub converted: usize,
    pub failed: usize,
}
