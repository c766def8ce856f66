//! Stable numeric identities for trace labels.
//!
//! Dots are stripped from the label first. `bus<N>` maps to `N` and
//! `f<N>` maps to `1000 + N`. Every other label maps to 0, so unrelated
//! labels collide on that id; [`classify`] lets callers detect this.

const BUS_PREFIX: &str = "bus";
const FLEET_PREFIX: &str = "f";
const FLEET_OFFSET: i64 = 1000;

/// Which prefix rule a label falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelClass {
    Bus,
    Fleet,
    Unclassified,
}

pub fn classify(label: &str) -> LabelClass {
    let cleaned = strip_dots(label);
    if cleaned.starts_with(BUS_PREFIX) {
        LabelClass::Bus
    } else if cleaned.starts_with(FLEET_PREFIX) {
        LabelClass::Fleet
    } else {
        LabelClass::Unclassified
    }
}

/// Resolve a label to its numeric id. Malformed numbers resolve as 0
/// before any offset is applied.
pub fn resolve(label: &str) -> i32 {
    let cleaned = strip_dots(label);
    let id = if let Some(rest) = cleaned.strip_prefix(BUS_PREFIX) {
        parse_or_zero(rest)
    } else if let Some(rest) = cleaned.strip_prefix(FLEET_PREFIX) {
        parse_or_zero(rest).wrapping_add(FLEET_OFFSET)
    } else {
        0
    };
    // Narrowing wraps like a native int cast.
    id as i32
}

fn strip_dots(label: &str) -> String {
    label.replace('.', "")
}

fn parse_or_zero(digits: &str) -> i64 {
    digits.parse::<i64>().unwrap_or(0)
}
