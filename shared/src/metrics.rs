// Failure counters.
//
// Failures never escalate, but they are counted so a caller can tell a
// silent no-op from a working toggle.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::error::NativeError;
use crate::locator::LocateError;

#[derive(Debug, Default)]
pub struct FailureCounters {
    window_not_found: AtomicU64,
    encoding_failures: AtomicU64,
    native_call_failures: AtomicU64,
    toggles: AtomicU64,
}

/// Point-in-time copy of [`FailureCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureSnapshot {
    pub window_not_found: u64,
    pub encoding_failures: u64,
    pub native_call_failures: u64,
    pub toggles: u64,
}

impl FailureCounters {
    pub fn record_locate(&self, err: &LocateError) {
        match err {
            LocateError::NotFound(_) => {
                self.window_not_found.fetch_add(1, Ordering::Relaxed);
            }
            LocateError::Native(native) => self.record_native(native),
        }
    }

    pub fn record_native(&self, err: &NativeError) {
        let counter = match err {
            NativeError::Encoding { .. } => &self.encoding_failures,
            NativeError::Call { .. } => &self.native_call_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_toggle(&self) {
        self.toggles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> FailureSnapshot {
        FailureSnapshot {
            window_not_found: self.window_not_found.load(Ordering::Relaxed),
            encoding_failures: self.encoding_failures.load(Ordering::Relaxed),
            native_call_failures: self.native_call_failures.load(Ordering::Relaxed),
            toggles: self.toggles.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_errors_land_in_their_own_buckets() {
        let counters = FailureCounters::default();
        counters.record_locate(&LocateError::NotFound("HoverInk".into()));
        counters.record_locate(&LocateError::Native(NativeError::Encoding {
            title: "Hover\0Ink".into(),
        }));
        counters.record_native(&NativeError::Call {
            call: "SetWindowLongPtrW",
            code: 5,
        });
        counters.record_toggle();

        assert_eq!(
            counters.snapshot(),
            FailureSnapshot {
                window_not_found: 1,
                encoding_failures: 1,
                native_call_failures: 1,
                toggles: 1,
            }
        );
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let json = serde_json::to_value(FailureSnapshot::default()).unwrap();
        assert_eq!(json["windowNotFound"], 0);
        assert_eq!(json["nativeCallFailures"], 0);
    }
}
