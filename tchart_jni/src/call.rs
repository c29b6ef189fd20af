/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # Running Rust code on behalf of a JNI caller.
//!
//! Unwinding into the JVM is undefined behaviour, and a Rust error has no
//! meaning on the Java side. Every entry point therefore runs its body through
//! [`call_with_result`], which catches panics, turns errors into Java
//! exceptions and hands the JVM a neutral value instead.

use std::panic::{self, AssertUnwindSafe};

use jni::JNIEnv;

use crate::BridgeError;

/// Run `callback`, converting a panic into [`BridgeError::Panic`].
pub fn catch_call<R, F>(callback: F) -> Result<R, BridgeError>
where
    F: FnOnce() -> Result<R, BridgeError>,
{
    match panic::catch_unwind(AssertUnwindSafe(callback)) {
        Ok(result) => result,
        Err(cause) => {
            let message = if let Some(s) = cause.downcast_ref::<&'static str>() {
                (*s).to_owned()
            } else if let Some(s) = cause.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_owned()
            };
            Err(BridgeError::Panic(message))
        }
    }
}

/// Run `callback` for a JNI entry point.
///
/// On success its value is returned. On failure a Java exception is left
/// pending on `env` and `default` is returned; the JVM raises the exception as
/// soon as the native method returns, so `default` is never observed.
pub fn call_with_result<'local, R, F>(env: &mut JNIEnv<'local>, default: R, callback: F) -> R
where
    F: FnOnce(&mut JNIEnv<'local>) -> Result<R, BridgeError>,
{
    match catch_call(|| callback(&mut *env)) {
        Ok(value) => value,
        Err(err) => {
            match exception_for(&err) {
                Some((class, message)) => {
                    log::warn!("native call failed: {err}");
                    if let Err(throw_err) = env.throw_new(class, message) {
                        log::error!("failed to throw {class}: {throw_err}");
                    }
                }
                None => log::debug!("returning to pending Java exception"),
            }
            default
        }
    }
}

/// The exception class and message to throw for `err`, or `None` when the JVM
/// already has an exception pending that must not be replaced.
fn exception_for(err: &BridgeError) -> Option<(&'static str, String)> {
    if err.is_pending_java_exception() {
        None
    } else {
        Some((err.java_class(), err.to_string()))
    }
}
