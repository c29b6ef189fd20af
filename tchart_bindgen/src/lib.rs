/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # tchart-bindgen: tooling around the tchart native library
//!
//! The Android app talks to the `tchart-jni` cdylib through a Kotlin object
//! full of `external fun` declarations. Those declarations and the JNI symbol
//! names exported from Rust have to agree exactly, or the JVM throws
//! `UnsatisfiedLinkError` at the first call. This crate keeps them in sync by
//! generating the Kotlin side from the same [`NativeInterface`] that the
//! consistency tests check the Rust side against.
//!
//! It also has a small inspector for chart data, handy when adding new
//! `overview.json` files to the app's assets.
//!
//! ## Usage
//!
//! ```text
//! tchart-bindgen generate --out-dir app/src/main/java/com/github/alunegov/tchart .
//! tchart-bindgen symbols .
//! tchart-bindgen inspect app/src/main/assets
//! ```
//!
//! The generator reads its settings from `tchart.toml`; see [`config`].

#![warn(rust_2018_idioms)]

const BINDGEN_VERSION: &str = env!("CARGO_PKG_VERSION");

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use fs_err as fs;
use tchart::mapper::{self, DirResourceLoader};
use tchart::{AndroidColorParser, ChartInputData, ChartInputDataStats};

pub mod config;
pub mod interface;
pub mod kotlin;

use config::get_config;
pub use interface::NativeInterface;

pub trait MergeWith {
    fn merge_with(&self, other: &Self) -> Self;
}

impl<T: Clone> MergeWith for Option<T> {
    fn merge_with(&self, other: &Self) -> Self {
        match (self, other) {
            (Some(_), _) => self.clone(),
            (None, Some(_)) => other.clone(),
            (None, None) => None,
        }
    }
}

/// Generate the Kotlin declarations for the tchart native library.
pub fn generate_bindings(
    crate_root: &Utf8Path,
    config_file_override: Option<&Utf8Path>,
    out_dir_override: Option<&Utf8Path>,
    try_format_code: bool,
) -> Result<Utf8PathBuf> {
    let ci = NativeInterface::tchart();
    let config = get_config(&ci, crate_root, config_file_override)?;
    let out_dir = out_dir_override.unwrap_or(crate_root);

    kotlin::write_bindings(&config.bindings.kotlin, &ci, out_dir, try_format_code)
}

/// The JNI symbol of every native function, in declaration order.
pub fn jni_symbols(
    crate_root: &Utf8Path,
    config_file_override: Option<&Utf8Path>,
) -> Result<Vec<String>> {
    let ci = NativeInterface::tchart();
    let config = get_config(&ci, crate_root, config_file_override)?;
    let class = config.bindings.kotlin.qualified_class_name();

    Ok(ci.functions().iter().map(|f| f.jni_symbol(&class)).collect())
}

/// Load charts from a JSON file (an array of charts, or a single chart) or
/// from an assets directory holding `contest/*/overview.json`.
pub fn load_charts(path: &Utf8Path) -> Result<Vec<ChartInputData>> {
    let charts = if path.is_dir() {
        let loader = DirResourceLoader::new(path.to_owned());
        mapper::load_resources(&loader, &AndroidColorParser)
    } else {
        let json = fs::read_to_string(path)?;
        if json.trim_start().starts_with('[') {
            mapper::load(&json, &AndroidColorParser)
        } else {
            mapper::load_chart(&json, &AndroidColorParser).map(|c| vec![c])
        }
    };

    charts.with_context(|| format!("Failed to load charts from {path}"))
}

/// One line describing `chart`, with its Y range over the whole X axis.
pub fn describe_chart(index: usize, chart: &ChartInputData) -> Result<String> {
    let x = chart.x_values();
    let mut stats = ChartInputDataStats::new(chart.clone());
    let states = stats.lines_visibility_state().to_vec();
    let range = stats.find_y_min_max(0, chart.points_count() - 1, &states)?;

    Ok(format!(
        "#{index}: {} lines={} points={} x={}..{} y={}..{} flags={:?}",
        chart.line_type(),
        chart.lines_count(),
        chart.points_count(),
        x[0],
        x[x.len() - 1],
        range.min,
        range.max,
        chart.flags(),
    ))
}

// structs to help our cmdline parsing.
#[derive(Parser)]
#[clap(name = "tchart-bindgen")]
#[clap(version = clap::crate_version!())]
#[clap(about = "Kotlin declarations and data tooling for the tchart native library")]
#[clap(propagate_version = true)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[clap(name = "generate", about = "Generate the Kotlin native declarations")]
    Generate {
        #[clap(
            long,
            short,
            help = "Directory in which to write generated files. Default is the crate root."
        )]
        out_dir: Option<Utf8PathBuf>,

        #[clap(long, short, help = "Do not try to format the generated bindings.")]
        no_format: bool,

        #[clap(
            long,
            short,
            help = "Path to the optional tchart config file. If not provided, tchart-bindgen will look for tchart.toml in the crate root."
        )]
        config: Option<Utf8PathBuf>,

        #[clap(help = "Path to the crate.", default_value = ".")]
        crate_root: Utf8PathBuf,
    },

    #[clap(name = "symbols", about = "Print the JNI symbol of every native function")]
    Symbols {
        #[clap(long, short, help = "Path to the optional tchart config file.")]
        config: Option<Utf8PathBuf>,

        #[clap(help = "Path to the crate.", default_value = ".")]
        crate_root: Utf8PathBuf,
    },

    #[clap(name = "inspect", about = "Load chart data and summarize it")]
    Inspect {
        #[clap(long, help = "Print the parsed charts as JSON.")]
        json: bool,

        #[clap(help = "A chart JSON file, or an assets directory with contest/*/overview.json.")]
        path: Utf8PathBuf,
    },
}

pub fn run_main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Generate {
            out_dir,
            no_format,
            config,
            crate_root,
        } => {
            let path = crate::generate_bindings(
                crate_root,
                config.as_deref(),
                out_dir.as_deref(),
                !no_format,
            )?;
            println!("{path}");
        }
        Commands::Symbols { config, crate_root } => {
            for symbol in crate::jni_symbols(crate_root, config.as_deref())? {
                println!("{symbol}");
            }
        }
        Commands::Inspect { json, path } => {
            let charts = crate::load_charts(path)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&charts)?);
            } else {
                for (i, chart) in charts.iter().enumerate() {
                    println!("{}", crate::describe_chart(i, chart)?);
                }
            }
        }
    };
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_merge_option() {
        assert_eq!(Some(1).merge_with(&Some(2)), Some(1));
        assert_eq!(None.merge_with(&Some(2)), Some(2));
        assert_eq!(None::<u8>.merge_with(&None), None);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["tchart-bindgen", "inspect", "--json", "data.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Inspect { json: true, ref path } if path == "data.json"
        ));

        let cli = Cli::try_parse_from(["tchart-bindgen", "generate", "--no-format"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Generate { no_format: true, ref crate_root, .. } if crate_root == "."
        ));
    }
}
