/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # Kotlin declarations for the native library.
//!
//! Renders a Kotlin `object` that loads the cdylib and declares one
//! `external fun` per [`NativeFunction`], each an instance method so that the
//! JNI symbol receives the object as `this`.

use std::process::Command;

use anyhow::{Context, Result};
use askama::Template;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;

use crate::config::KotlinConfig;
use crate::interface::{NativeFunction, NativeInterface};

#[derive(Template)]
#[template(path = "NativeLib.kt", escape = "none")]
pub struct KotlinWrapper {
    version: &'static str,
    package_name: String,
    class_name: String,
    cdylib_name: String,
    functions: Vec<KotlinFunction>,
}

struct KotlinFunction {
    symbol: String,
    name: String,
    params: String,
    returns: String,
}

impl KotlinFunction {
    fn new(func: &NativeFunction, qualified_class: &str) -> Self {
        let params = func
            .arguments()
            .iter()
            .map(|arg| format!("{}: {}", arg.kotlin_name(), arg.type_().kotlin_type()))
            .collect::<Vec<_>>()
            .join(", ");
        let returns = func
            .return_type()
            .map(|t| format!(": {}", t.kotlin_type()))
            .unwrap_or_default();

        Self {
            symbol: func.jni_symbol(qualified_class),
            name: func.kotlin_name(),
            params,
            returns,
        }
    }
}

impl KotlinWrapper {
    pub fn new(config: &KotlinConfig, ci: &NativeInterface) -> Self {
        let qualified_class = config.qualified_class_name();
        Self {
            version: crate::BINDGEN_VERSION,
            package_name: config.package_name().to_owned(),
            class_name: config.class_name().to_owned(),
            cdylib_name: config.cdylib_name().to_owned(),
            functions: ci
                .functions()
                .iter()
                .map(|f| KotlinFunction::new(f, &qualified_class))
                .collect(),
        }
    }
}

/// Write `<ClassName>.kt` into `out_dir`, returning its path.
pub fn write_bindings(
    config: &KotlinConfig,
    ci: &NativeInterface,
    out_dir: &Utf8Path,
    try_format_code: bool,
) -> Result<Utf8PathBuf> {
    let out_path = out_dir.join(format!("{}.kt", config.class_name()));
    let source = KotlinWrapper::new(config, ci)
        .render()
        .context("failed to render Kotlin bindings")?;

    fs::create_dir_all(out_dir)?;
    fs::write(&out_path, source)?;
    log::info!("wrote {out_path}");

    if try_format_code {
        if let Err(e) = Command::new("ktlint").arg("-F").arg(&out_path).output() {
            println!(
                "Warning: Unable to auto-format {} using ktlint: {:?}",
                out_path.file_name().unwrap_or_default(),
                e
            )
        }
    }

    Ok(out_path)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;

    fn render_default() -> String {
        let ci = NativeInterface::tchart();
        let config: Config = (&ci).into();
        KotlinWrapper::new(&config.bindings.kotlin, &ci)
            .render()
            .unwrap()
    }

    #[test]
    fn test_header_and_loader() {
        let kt = render_default();
        assert!(kt.contains("package com.github.alunegov.tchart\n"));
        assert!(kt.contains("object NativeLib {"));
        assert!(kt.contains("System.loadLibrary(\"tchart_jni\")"));
    }

    #[test]
    fn test_declarations() {
        let kt = render_default();
        assert!(kt.contains("    external fun hello(): String\n"));
        assert!(kt.contains("    external fun openChart(json: String, index: Int): Long\n"));
        assert!(kt.contains(
            "    external fun updateLineVisibility(handle: Long, lineIndex: Int, exceptLine: Boolean, state: Int)\n"
        ));
        assert!(kt.contains("    external fun findYMinMax(handle: Long, l: Int, r: Int): IntArray\n"));
        assert!(kt.contains("    // Java_com_github_alunegov_tchart_NativeLib_hello\n"));
        assert_eq!(kt.matches("external fun").count(), 10);
    }

    #[test]
    fn test_default_package_has_no_package_line() {
        let ci = NativeInterface::tchart();
        let config: Config = toml::de::from_str(
            "[bindings.kotlin]\npackage_name = \"\"\nclass_name = \"Native\"\n",
        )
        .unwrap();
        let config = crate::MergeWith::merge_with(&config, &(&ci).into());
        let kt = KotlinWrapper::new(&config.bindings.kotlin, &ci)
            .render()
            .unwrap();
        assert!(!kt.contains("package "));
        assert!(kt.contains("object Native {"));
        assert!(kt.contains("// Java_Native_hello\n"));
    }
}
