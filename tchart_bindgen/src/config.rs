/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # Generator configuration.
//!
//! Read from `tchart.toml` in the crate root (or the file given with
//! `--config`). Every value is optional; anything left out falls back to the
//! defaults of the [`NativeInterface`]:
//!
//! ```toml
//! [bindings.kotlin]
//! package_name = "com.github.alunegov.tchart"
//! class_name = "NativeLib"
//! cdylib_name = "tchart_jni"
//! ```

use anyhow::{Context, Result};
use camino::Utf8Path;
use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::interface::NativeInterface;
use crate::MergeWith;

pub const CONFIG_FILE_NAME: &str = "tchart.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bindings: BindingsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingsConfig {
    #[serde(default)]
    pub kotlin: KotlinConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KotlinConfig {
    package_name: Option<String>,
    class_name: Option<String>,
    cdylib_name: Option<String>,
}

impl KotlinConfig {
    pub fn package_name(&self) -> &str {
        self.package_name.as_deref().unwrap_or_else(|| {
            NativeInterface::DEFAULT_CLASS
                .rsplit_once('.')
                .map_or("", |(package, _)| package)
        })
    }

    pub fn class_name(&self) -> &str {
        self.class_name.as_deref().unwrap_or_else(|| {
            NativeInterface::DEFAULT_CLASS
                .rsplit_once('.')
                .map_or(NativeInterface::DEFAULT_CLASS, |(_, class)| class)
        })
    }

    pub fn cdylib_name(&self) -> &str {
        self.cdylib_name
            .as_deref()
            .unwrap_or(NativeInterface::DEFAULT_CDYLIB)
    }

    /// `package.Class`, or just `Class` in the default package.
    pub fn qualified_class_name(&self) -> String {
        match self.package_name() {
            "" => self.class_name().to_owned(),
            package => format!("{package}.{}", self.class_name()),
        }
    }
}

impl From<&NativeInterface> for Config {
    fn from(_ci: &NativeInterface) -> Self {
        let kotlin = KotlinConfig::default();
        Config {
            bindings: BindingsConfig {
                kotlin: KotlinConfig {
                    package_name: Some(kotlin.package_name().to_owned()),
                    class_name: Some(kotlin.class_name().to_owned()),
                    cdylib_name: Some(kotlin.cdylib_name().to_owned()),
                },
            },
        }
    }
}

impl MergeWith for Config {
    fn merge_with(&self, other: &Self) -> Self {
        Config {
            bindings: self.bindings.merge_with(&other.bindings),
        }
    }
}

impl MergeWith for BindingsConfig {
    fn merge_with(&self, other: &Self) -> Self {
        BindingsConfig {
            kotlin: self.kotlin.merge_with(&other.kotlin),
        }
    }
}

impl MergeWith for KotlinConfig {
    fn merge_with(&self, other: &Self) -> Self {
        KotlinConfig {
            package_name: self.package_name.merge_with(&other.package_name),
            class_name: self.class_name.merge_with(&other.class_name),
            cdylib_name: self.cdylib_name.merge_with(&other.cdylib_name),
        }
    }
}

/// Load the config for `ci`, preferring `config_file_override`, then
/// `tchart.toml` in `crate_root`, then the defaults.
pub fn get_config(
    ci: &NativeInterface,
    crate_root: &Utf8Path,
    config_file_override: Option<&Utf8Path>,
) -> Result<Config> {
    let default_config: Config = ci.into();

    let config_file = match config_file_override {
        Some(cfg) => Some(cfg.to_owned()),
        None => Some(crate_root.join(CONFIG_FILE_NAME)).filter(|p| p.exists()),
    };

    match config_file {
        Some(path) => {
            log::info!("reading config from {path}");
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file from {path}"))?;
            let loaded_config: Config = toml::de::from_str(&contents)
                .with_context(|| format!("Failed to generate config from file {path}"))?;
            Ok(loaded_config.merge_with(&default_config))
        }
        None => Ok(default_config),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = (&NativeInterface::tchart()).into();
        let kotlin = &config.bindings.kotlin;
        assert_eq!(kotlin.package_name(), "com.github.alunegov.tchart");
        assert_eq!(kotlin.class_name(), "NativeLib");
        assert_eq!(kotlin.cdylib_name(), "tchart_jni");
        assert_eq!(kotlin.qualified_class_name(), NativeInterface::DEFAULT_CLASS);
    }

    #[test]
    fn test_file_values_win() {
        let loaded: Config = toml::de::from_str(
            r#"
            [bindings.kotlin]
            class_name = "Charts"
            package_name = ""
            "#,
        )
        .unwrap();
        let merged = loaded.merge_with(&(&NativeInterface::tchart()).into());
        let kotlin = &merged.bindings.kotlin;
        assert_eq!(kotlin.class_name(), "Charts");
        assert_eq!(kotlin.package_name(), "");
        assert_eq!(kotlin.cdylib_name(), "tchart_jni");
        assert_eq!(kotlin.qualified_class_name(), "Charts");
    }

    #[test]
    fn test_empty_file() {
        let loaded: Config = toml::de::from_str("").unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        fs::write(root.join(CONFIG_FILE_NAME), "[bindings.kotlin]\nclass_name = 3\n").unwrap();
        let err = get_config(&NativeInterface::tchart(), root, None).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to generate config"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let config = get_config(&NativeInterface::tchart(), root, None).unwrap();
        assert_eq!(config.bindings.kotlin.class_name(), "NativeLib");

        let missing = root.join("nope.toml");
        assert!(get_config(&NativeInterface::tchart(), root, Some(&missing)).is_err());
    }
}
