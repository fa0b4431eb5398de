//! Per-device invariant checks with coverage tracking
//!
//! Every [`assert_invariant!`] names the device it was evaluated for. The
//! per-thread ledger maps each invariant to the devices it covered, so a test
//! can require that every exported record actually went through the check.
//!
//! ```rust,ignore
//! assert_invariant!(
//!     widths.len() == heights.len(),
//!     "Exported width and height arrays have equal length",
//!     &device.name
//! );
//!
//! #[test]
//! fn contract_export() {
//!     let names = export_phone();
//!     contract_covers("export", "Exported width and height arrays have equal length", &names);
//! }
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;

thread_local! {
    static LEDGER: RefCell<BTreeMap<&'static str, Vec<String>>> = RefCell::new(BTreeMap::new());
}

/// Check `$condition` for the device named by `$subject`.
///
/// # Panics
/// Panics naming the device and the invariant when the condition is false.
#[macro_export]
macro_rules! assert_invariant {
    ($condition:expr, $invariant:expr, $subject:expr) => {
        $crate::invariant_ppt::check($condition, $invariant, $subject)
    };
}

#[doc(hidden)]
pub fn check(holds: bool, invariant: &'static str, subject: &str) {
    LEDGER.with(|ledger| {
        ledger
            .borrow_mut()
            .entry(invariant)
            .or_default()
            .push(subject.to_string());
    });

    if !holds {
        panic!("invariant violated for {}: {}", subject, invariant);
    }
}

/// Devices `invariant` has been checked for on this thread, in check order
pub fn checked_subjects(invariant: &str) -> Vec<String> {
    LEDGER.with(|ledger| ledger.borrow().get(invariant).cloned().unwrap_or_default())
}

/// Require that each listed invariant was evaluated at least once.
///
/// # Panics
/// Panics listing the invariants that were never reached.
pub fn contract_test(test_name: &str, invariants: &[&str]) {
    let unreached: Vec<&str> = invariants
        .iter()
        .copied()
        .filter(|invariant| checked_subjects(invariant).is_empty())
        .collect();

    if !unreached.is_empty() {
        panic!(
            "contract `{}` failed, never checked: {}",
            test_name,
            unreached.join(", ")
        );
    }
}

/// Require that `invariant` was evaluated for every device in `subjects`.
///
/// # Panics
/// Panics listing the devices that skipped the check.
pub fn contract_covers(test_name: &str, invariant: &str, subjects: &[&str]) {
    let checked = checked_subjects(invariant);
    let skipped: Vec<&str> = subjects
        .iter()
        .copied()
        .filter(|subject| !checked.iter().any(|c| c == subject))
        .collect();

    if !skipped.is_empty() {
        panic!(
            "contract `{}` failed, `{}` not checked for: {}",
            test_name,
            invariant,
            skipped.join(", ")
        );
    }
}

/// Forget everything recorded on this thread
pub fn clear_invariant_log() {
    LEDGER.with(|ledger| ledger.borrow_mut().clear());
}
