/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # JNI entry points of the tchart native library.
//!
//! The app loads this crate's cdylib with `System.loadLibrary("tchart_jni")`
//! and calls into it through the `external fun`s of the
//! `com.github.alunegov.tchart.NativeLib` object, which `tchart-bindgen`
//! generates. Each function here is an instance native method of that object,
//! so every symbol takes the `JNIEnv` and the object itself (`this`), which is
//! never looked at.
//!
//! Charts opened from Kotlin live in a process-wide [`HandleMap`]; Kotlin only
//! ever sees the `Long` handle.

#![warn(rust_2018_idioms)]

use std::ffi::c_void;
use std::ptr;

use jni::objects::{JObject, JString};
use jni::sys::{jboolean, jint, jintArray, jlong, jstring, JNI_FALSE, JNI_TRUE, JNI_VERSION_1_6};
use jni::JNIEnv;
use once_cell::sync::Lazy;
use tchart::{mapper, AndroidColorParser, ChartInputDataStats, YRange};

mod call;
mod error;
mod handle;

pub use call::{call_with_result, catch_call};
pub use error::BridgeError;
pub use handle::HandleMap;

/// JNI name of the Kotlin object that declares the native functions.
pub const NATIVE_CLASS: &str = "com/github/alunegov/tchart/NativeLib";

static CHARTS: Lazy<HandleMap<ChartInputDataStats>> = Lazy::new(HandleMap::new);

#[no_mangle]
pub extern "system" fn JNI_OnLoad(_vm: *mut jni::sys::JavaVM, _reserved: *mut c_void) -> jint {
    log::info!("tchart native library {} loaded", env!("CARGO_PKG_VERSION"));
    JNI_VERSION_1_6
}

/// `fun hello(): String`
///
/// Always returns `"Hello"`. The only way this can fail is the JVM running out
/// of memory while creating the string; the `OutOfMemoryError` is then already
/// pending and null is returned.
#[no_mangle]
pub extern "system" fn Java_com_github_alunegov_tchart_NativeLib_hello<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
) -> jstring {
    log::debug!("hello");
    call_with_result(&mut env, ptr::null_mut(), |env| {
        Ok(env.new_string(tchart::greeting())?.into_raw())
    })
}

/// `fun chartCount(json: String): Int`
#[no_mangle]
pub extern "system" fn Java_com_github_alunegov_tchart_NativeLib_chartCount<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    json: JString<'local>,
) -> jint {
    log::debug!("chartCount");
    call_with_result(&mut env, 0, |env| {
        let json = get_string(env, &json, "json")?;
        let charts = mapper::load(&json, &AndroidColorParser)?;
        to_jint("chartCount", charts.len())
    })
}

/// `fun openChart(json: String, index: Int): Long`
#[no_mangle]
pub extern "system" fn Java_com_github_alunegov_tchart_NativeLib_openChart<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    json: JString<'local>,
    index: jint,
) -> jlong {
    log::debug!("openChart");
    call_with_result(&mut env, 0, |env| {
        let json = get_string(env, &json, "json")?;
        let index = to_index("index", index)?;
        let chart = mapper::load(&json, &AndroidColorParser)?
            .into_iter()
            .nth(index)
            .ok_or(BridgeError::OutOfRange {
                name: "index",
                value: index as i64,
            })?;
        let handle = CHARTS.insert(ChartInputDataStats::new(chart))?;
        log::debug!("opened chart {handle}, {} open", CHARTS.len());
        Ok(handle)
    })
}

/// `fun closeChart(handle: Long): Boolean`
#[no_mangle]
pub extern "system" fn Java_com_github_alunegov_tchart_NativeLib_closeChart<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
) -> jboolean {
    log::debug!("closeChart");
    call_with_result(&mut env, JNI_FALSE, |_| {
        let removed = CHARTS.remove(handle)?;
        log::debug!("closed chart {handle}: {removed}, {} open", CHARTS.len());
        Ok(if removed { JNI_TRUE } else { JNI_FALSE })
    })
}

/// `fun linesCount(handle: Long): Int`
#[no_mangle]
pub extern "system" fn Java_com_github_alunegov_tchart_NativeLib_linesCount<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
) -> jint {
    log::debug!("linesCount");
    call_with_result(&mut env, 0, |_| {
        CHARTS.call_with(handle, |stats| {
            to_jint("linesCount", stats.data().lines_count())
        })
    })
}

/// `fun pointsCount(handle: Long): Int`
#[no_mangle]
pub extern "system" fn Java_com_github_alunegov_tchart_NativeLib_pointsCount<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
) -> jint {
    log::debug!("pointsCount");
    call_with_result(&mut env, 0, |_| {
        CHARTS.call_with(handle, |stats| {
            to_jint("pointsCount", stats.data().points_count())
        })
    })
}

/// `fun visibleLinesCount(handle: Long): Int`
#[no_mangle]
pub extern "system" fn Java_com_github_alunegov_tchart_NativeLib_visibleLinesCount<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
) -> jint {
    log::debug!("visibleLinesCount");
    call_with_result(&mut env, 0, |_| {
        CHARTS.call_with(handle, |stats| {
            to_jint("visibleLinesCount", stats.visible_lines_count())
        })
    })
}

/// `fun updateLineVisibility(handle: Long, lineIndex: Int, exceptLine: Boolean, state: Int)`
///
/// A negative or too large `lineIndex` is ignored, like any other index past
/// the last line. `state` must fit `0..=255`.
#[no_mangle]
pub extern "system" fn Java_com_github_alunegov_tchart_NativeLib_updateLineVisibility<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
    line_index: jint,
    except_line: jboolean,
    state: jint,
) {
    log::debug!("updateLineVisibility");
    call_with_result(&mut env, (), |_| {
        let state = u8::try_from(state).map_err(|_| BridgeError::OutOfRange {
            name: "state",
            value: state.into(),
        })?;
        CHARTS.call_with(handle, |stats| {
            if let Ok(line_index) = usize::try_from(line_index) {
                stats.update_line_visibility(line_index, except_line != JNI_FALSE, state);
            }
            Ok(())
        })
    })
}

/// `fun findYMinMax(handle: Long, l: Int, r: Int): IntArray`
///
/// Returns `[min, max]` for the current line visibility.
#[no_mangle]
pub extern "system" fn Java_com_github_alunegov_tchart_NativeLib_findYMinMax<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
    l: jint,
    r: jint,
) -> jintArray {
    log::debug!("findYMinMax");
    call_with_result(&mut env, ptr::null_mut(), |env| {
        let range = find_y_min_max(handle, l, r)?;
        let array = env.new_int_array(2)?;
        env.set_int_array_region(&array, 0, &[range.min, range.max])?;
        Ok(array.into_raw())
    })
}

/// `fun findYAbsSwing(handle: Long, l: Int, r: Int): Int`
#[no_mangle]
pub extern "system" fn Java_com_github_alunegov_tchart_NativeLib_findYAbsSwing<'local>(
    mut env: JNIEnv<'local>,
    _this: JObject<'local>,
    handle: jlong,
    l: jint,
    r: jint,
) -> jint {
    log::debug!("findYAbsSwing");
    call_with_result(&mut env, 0, |_| {
        Ok(find_y_min_max(handle, l, r)?.abs_swing())
    })
}

fn find_y_min_max(handle: jlong, l: jint, r: jint) -> Result<YRange, BridgeError> {
    let l = to_index("l", l)?;
    let r = to_index("r", r)?;
    CHARTS.call_with(handle, |stats| {
        let states = stats.lines_visibility_state().to_vec();
        Ok(stats.find_y_min_max(l, r, &states)?)
    })
}

fn get_string(
    env: &mut JNIEnv<'_>,
    s: &JString<'_>,
    name: &'static str,
) -> Result<String, BridgeError> {
    if s.is_null() {
        return Err(BridgeError::NullArgument(name));
    }
    Ok(env.get_string(s)?.into())
}

fn to_index(name: &'static str, value: jint) -> Result<usize, BridgeError> {
    usize::try_from(value).map_err(|_| BridgeError::OutOfRange {
        name,
        value: value.into(),
    })
}

fn to_jint(name: &'static str, value: usize) -> Result<jint, BridgeError> {
    jint::try_from(value).map_err(|_| BridgeError::OutOfRange {
        name,
        value: i64::try_from(value).unwrap_or(i64::MAX),
    })
}
