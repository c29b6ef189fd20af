/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use tchart::ChartError;

/// Failures of a bridge call, each mapped onto the Java exception the
/// Kotlin side will see.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("JNI call failed: {0}")]
    Jni(#[from] jni::errors::Error),

    #[error("`{0}` must not be null")]
    NullArgument(&'static str),

    #[error("`{name}` out of range: {value}")]
    OutOfRange { name: &'static str, value: i64 },

    #[error("no open chart with handle {0}")]
    StaleHandle(i64),

    #[error("chart state was poisoned by an earlier panic")]
    Poisoned,

    #[error("native panic: {0}")]
    Panic(String),
}

impl BridgeError {
    /// JNI name of the exception class to throw for this error.
    pub fn java_class(&self) -> &'static str {
        match self {
            BridgeError::Chart(_) | BridgeError::OutOfRange { .. } => {
                "java/lang/IllegalArgumentException"
            }
            BridgeError::NullArgument(_) => "java/lang/NullPointerException",
            BridgeError::StaleHandle(_) | BridgeError::Poisoned => {
                "java/lang/IllegalStateException"
            }
            BridgeError::Jni(_) | BridgeError::Panic(_) => "java/lang/RuntimeException",
        }
    }

    /// True when the JVM already has an exception pending for this failure,
    /// in which case throwing another one would mask it.
    pub fn is_pending_java_exception(&self) -> bool {
        matches!(self, BridgeError::Jni(jni::errors::Error::JavaException))
    }
}
