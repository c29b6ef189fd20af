/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # Handles to Rust objects held by the JVM.
//!
//! The Kotlin side keeps an opaque `Long` per open chart. Rather than passing
//! raw pointers, handles are keys into a [`HandleMap`], so a closed or
//! made-up handle is reported as an error instead of being dereferenced.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use crate::BridgeError;

pub struct HandleMap<T> {
    next: AtomicI64,
    entries: Mutex<HashMap<i64, Arc<Mutex<T>>>>,
}

impl<T> HandleMap<T> {
    pub fn new() -> Self {
        Self {
            next: AtomicI64::new(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store `value` and return its handle. Handles are never zero and never reused.
    pub fn insert(&self, value: T) -> Result<i64, BridgeError> {
        let handle = self.next.fetch_add(1, Ordering::Relaxed);
        self.entries
            .lock()
            .map_err(|_| BridgeError::Poisoned)?
            .insert(handle, Arc::new(Mutex::new(value)));
        Ok(handle)
    }

    /// Run `f` on the value behind `handle`.
    ///
    /// The map itself is only locked for the lookup, so calls on different
    /// handles proceed in parallel.
    pub fn call_with<R, F>(&self, handle: i64, f: F) -> Result<R, BridgeError>
    where
        F: FnOnce(&mut T) -> Result<R, BridgeError>,
    {
        let entry = self
            .entries
            .lock()
            .map_err(|_| BridgeError::Poisoned)?
            .get(&handle)
            .cloned()
            .ok_or(BridgeError::StaleHandle(handle))?;
        let mut value = entry.lock().map_err(|_| BridgeError::Poisoned)?;
        f(&mut value)
    }

    /// Drop the value behind `handle`; `false` if there was none.
    pub fn remove(&self, handle: i64) -> Result<bool, BridgeError> {
        Ok(self
            .entries
            .lock()
            .map_err(|_| BridgeError::Poisoned)?
            .remove(&handle)
            .is_some())
    }

    /// Number of live handles, for logging.
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

impl<T> Default for HandleMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::thread;

    #[test]
    fn test_insert_call_remove() {
        let map = HandleMap::new();
        let a = map.insert(String::from("a")).unwrap();
        let b = map.insert(String::from("b")).unwrap();
        assert_ne!(a, 0);
        assert_ne!(a, b);
        assert_eq!(map.len(), 2);

        map.call_with(a, |s| {
            s.push('!');
            Ok(())
        })
        .unwrap();
        assert_eq!(map.call_with(a, |s| Ok(s.clone())).unwrap(), "a!");

        assert!(map.remove(a).unwrap());
        assert!(!map.remove(a).unwrap());
        assert!(matches!(
            map.call_with(a, |s| Ok(s.len())),
            Err(BridgeError::StaleHandle(h)) if h == a
        ));
        assert_eq!(map.call_with(b, |s| Ok(s.clone())).unwrap(), "b");
    }

    #[test]
    fn test_unknown_handle() {
        let map: HandleMap<u32> = HandleMap::default();
        assert_eq!(map.len(), 0);
        assert!(matches!(
            map.call_with(0, |v| Ok(*v)),
            Err(BridgeError::StaleHandle(0))
        ));
    }

    #[test]
    fn test_errors_from_callback() {
        let map = HandleMap::new();
        let h = map.insert(1u32).unwrap();
        let res: Result<(), _> = map.call_with(h, |_| Err(BridgeError::NullArgument("x")));
        assert!(matches!(res, Err(BridgeError::NullArgument("x"))));
    }

    #[test]
    fn test_concurrent_use() {
        let map = Arc::new(HandleMap::new());
        let h = map.insert(0u64).unwrap();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let map = Arc::clone(&map);
                thread::spawn(move || {
                    for _ in 0..100 {
                        map.call_with(h, |v| {
                            *v += 1;
                            Ok(())
                        })
                        .unwrap();
                    }
                    map.insert(0u64).unwrap()
                })
            })
            .collect();
        let mut handles: Vec<i64> = threads.into_iter().map(|t| t.join().unwrap()).collect();
        handles.sort_unstable();
        handles.dedup();

        assert_eq!(handles.len(), 8);
        assert_eq!(map.call_with(h, |v| Ok(*v)).unwrap(), 800);
    }
}
