/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # The native interface of the tchart library.
//!
//! A [`NativeInterface`] lists every function the `tchart-jni` cdylib exports,
//! in terms the Kotlin side understands. From it we derive both the Kotlin
//! `external fun` declarations and the JNI symbol names the JVM will look up,
//! so the two can never disagree:
//!
//! ```
//! # use tchart_bindgen::interface::NativeInterface;
//! let ci = NativeInterface::tchart();
//! let hello = ci.get_function("hello").unwrap();
//! assert_eq!(
//!     hello.jni_symbol("com.github.alunegov.tchart.NativeLib"),
//!     "Java_com_github_alunegov_tchart_NativeLib_hello"
//! );
//! ```

use std::fmt::Write;

use anyhow::{bail, Result};
use heck::ToLowerCamelCase;

/// Types that cross the JNI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    Boolean,
    Int,
    Long,
    String,
    IntArray,
}

impl NativeType {
    pub fn kotlin_type(&self) -> &'static str {
        match self {
            NativeType::Boolean => "Boolean",
            NativeType::Int => "Int",
            NativeType::Long => "Long",
            NativeType::String => "String",
            NativeType::IntArray => "IntArray",
        }
    }

    /// The C type used for this value in the native signature.
    pub fn jni_type(&self) -> &'static str {
        match self {
            NativeType::Boolean => "jboolean",
            NativeType::Int => "jint",
            NativeType::Long => "jlong",
            NativeType::String => "jstring",
            NativeType::IntArray => "jintArray",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Argument {
    name: String,
    type_: NativeType,
}

impl Argument {
    pub fn new(name: &str, type_: NativeType) -> Self {
        Self {
            name: name.to_owned(),
            type_,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kotlin_name(&self) -> String {
        self.name.to_lower_camel_case()
    }

    pub fn type_(&self) -> NativeType {
        self.type_
    }
}

/// One instance native method of the host class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NativeFunction {
    name: String,
    arguments: Vec<Argument>,
    return_type: Option<NativeType>,
}

impl NativeFunction {
    pub fn new(name: &str, arguments: Vec<Argument>, return_type: Option<NativeType>) -> Self {
        Self {
            name: name.to_owned(),
            arguments,
            return_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn return_type(&self) -> Option<NativeType> {
        self.return_type
    }

    pub fn kotlin_name(&self) -> String {
        self.name.to_lower_camel_case()
    }

    /// The symbol the JVM resolves for this method of `class_name`
    /// (dotted or slashed, e.g. `com.example.Native`).
    pub fn jni_symbol(&self, class_name: &str) -> String {
        format!(
            "Java_{}_{}",
            mangle_jni_name(class_name),
            mangle_jni_name(&self.kotlin_name())
        )
    }
}

/// Escape a class or method name as described in the JNI spec
/// ("Resolving Native Method Names").
pub fn mangle_jni_name(name: &str) -> String {
    let mut mangled = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' => mangled.push(c),
            '.' | '/' => mangled.push('_'),
            '_' => mangled.push_str("_1"),
            ';' => mangled.push_str("_2"),
            '[' => mangled.push_str("_3"),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(mangled, "_0{:04x}", unit).expect("writing to a String can't fail");
                }
            }
        }
    }
    mangled
}

#[derive(Debug, Clone, Default)]
pub struct NativeInterface {
    functions: Vec<NativeFunction>,
}

impl NativeInterface {
    /// Fully-qualified name of the class the functions are declared on by default.
    pub const DEFAULT_CLASS: &'static str = "com.github.alunegov.tchart.NativeLib";
    /// Name of the cdylib holding the functions, as passed to `System.loadLibrary`.
    pub const DEFAULT_CDYLIB: &'static str = "tchart_jni";

    /// The functions exported by `tchart-jni`.
    pub fn tchart() -> Self {
        use NativeType::*;

        let handle = || Argument::new("handle", Long);
        let mut ci = Self::default();
        let functions = vec![
            NativeFunction::new("hello", vec![], Some(String)),
            NativeFunction::new("chart_count", vec![Argument::new("json", String)], Some(Int)),
            NativeFunction::new(
                "open_chart",
                vec![Argument::new("json", String), Argument::new("index", Int)],
                Some(Long),
            ),
            NativeFunction::new("close_chart", vec![handle()], Some(Boolean)),
            NativeFunction::new("lines_count", vec![handle()], Some(Int)),
            NativeFunction::new("points_count", vec![handle()], Some(Int)),
            NativeFunction::new("visible_lines_count", vec![handle()], Some(Int)),
            NativeFunction::new(
                "update_line_visibility",
                vec![
                    handle(),
                    Argument::new("line_index", Int),
                    Argument::new("except_line", Boolean),
                    Argument::new("state", Int),
                ],
                None,
            ),
            NativeFunction::new(
                "find_y_min_max",
                vec![handle(), Argument::new("l", Int), Argument::new("r", Int)],
                Some(IntArray),
            ),
            NativeFunction::new(
                "find_y_abs_swing",
                vec![handle(), Argument::new("l", Int), Argument::new("r", Int)],
                Some(Int),
            ),
        ];
        for func in functions {
            ci.add_function(func)
                .expect("built-in interface has unique names");
        }
        ci
    }

    pub fn functions(&self) -> &[NativeFunction] {
        &self.functions
    }

    pub fn get_function(&self, name: &str) -> Option<&NativeFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Add a function, refusing names that would collide once converted for Kotlin.
    pub fn add_function(&mut self, func: NativeFunction) -> Result<()> {
        let kotlin_name = func.kotlin_name();
        if self.functions.iter().any(|f| f.kotlin_name() == kotlin_name) {
            bail!("duplicate native function `{kotlin_name}`");
        }
        self.functions.push(func);
        Ok(())
    }
}
