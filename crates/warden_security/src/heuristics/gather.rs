//! Resource gather cap.

use crate::config::WardenConfig;
use crate::violation::{Violation, ViolationKind};

/// Clamps a gather amount to `max_resource_gather_rate`.
///
/// Returns the amount the host should grant and, when the request was over
/// the cap, the violation to report.
#[must_use]
pub fn check(amount: u32, item_kind: &str, config: &WardenConfig) -> (u32, Option<Violation>) {
    let cap = config.max_resource_gather_rate;
    if amount <= cap {
        return (amount, None);
    }
    (
        cap,
        Some(Violation::new(
            ViolationKind::ResourceHack,
            format!("Resource hack detected: {amount} {item_kind}"),
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_cap_is_clamped_and_reported() {
        let config = WardenConfig::default();
        let (granted, violation) = check(500, "wood", &config);
        assert_eq!(granted, 100);
        assert_eq!(violation.unwrap().description, "Resource hack detected: 500 wood");
    }

    #[test]
    fn test_at_cap_passes() {
        let config = WardenConfig::default();
        assert_eq!(check(100, "stones", &config), (100, None));
    }
}
