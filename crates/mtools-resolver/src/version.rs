//! Comparable version numbers.

use once_cell::sync::Lazy;
use regex::Regex;

static VERSION_DIGITS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^v?([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})(?:-rc[.-]?([0-9]{1,3}))?$")
        .expect("version regex")
});

/// Value of a release without a release candidate suffix, so that a final
/// release sorts after all of its candidates.
const FINAL_RELEASE: &str = "999";

/// Maps `major.minor.patch[-rc.N]` to a number where newer versions compare
/// greater. Each part is zero-padded to three digits. Returns `None` unless
/// the whole of `version` is such a version, optionally prefixed with `v`.
pub fn version_number(version: &str) -> Option<u64> {
    let captures = VERSION_DIGITS.captures(version)?;
    let digits: String = (1..=4)
        .map(|index| {
            let part = captures.get(index).map_or(FINAL_RELEASE, |part| part.as_str());
            format!("{part:0>3}")
        })
        .collect();
    digits.parse().ok()
}

/// Whether `version` predates the first fully supported release.
pub fn is_unsupported(version: &str) -> bool {
    match (version_number(version), version_number("1.0.0")) {
        (Some(number), Some(minimum)) => number < minimum,
        _ => true,
    }
}
