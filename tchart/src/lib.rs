/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # tchart: the native half of the tchart Android app
//!
//! This crate holds everything the app's native library does, written as plain
//! Rust so it can be used and tested without a JVM. The `tchart-jni` crate wraps
//! it in JNI entry points, and `tchart_bindgen` generates the matching Kotlin
//! declarations.
//!
//! It currently provides:
//!
//!   * The greeting returned by the `hello` entry point.
//!   * The chart input model loaded from the contest JSON files ([`ChartInputData`]).
//!   * The JSON mapper turning those files into charts ([`mapper`]).
//!   * Per-chart statistics used when scaling the Y axis ([`ChartInputDataStats`]).

#![warn(rust_2018_idioms)]

pub mod color;
pub mod data;
mod error;
pub mod mapper;
pub mod stats;

pub use color::{AndroidColorParser, ColorParser};
pub use data::{ChartFlags, ChartInputData, ChartLine, LineType};
pub use error::{ChartError, Result};
pub use stats::{ChartInputDataStats, YRange};

/// The text handed back to the host by the `hello` entry point.
pub const GREETING: &str = "Hello";

/// Build the greeting.
///
/// A fresh `String` is returned on every call; nothing is cached or shared, so
/// this is safe to call from any number of threads at once.
pub fn greeting() -> String {
    GREETING.to_owned()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::thread;

    #[test]
    fn test_greeting_is_hello() {
        assert_eq!(greeting(), "Hello");
    }

    #[test]
    fn test_greeting_is_idempotent() {
        let first = greeting();
        for _ in 0..10 {
            assert_eq!(greeting(), first);
        }
        assert_eq!(GREETING, "Hello");
    }

    #[test]
    fn test_greeting_from_many_threads() {
        let handles: Vec<_> = (0..16).map(|_| thread::spawn(greeting)).collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), "Hello");
        }
    }
}
