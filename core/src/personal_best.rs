use crate::types::{Drill, Session};

/// Best finite result among `sessions` for `drill_id`.
pub fn best_value(sessions: &[Session], drill_id: &str, smaller_is_better: bool) -> Option<f64> {
    sessions
        .iter()
        .filter(|s| s.drill_id == drill_id)
        .map(|s| s.result.value)
        .filter(|v| v.is_finite())
        .reduce(|a, b| if smaller_is_better { a.min(b) } else { a.max(b) })
}

/// True when `new` strictly beats every earlier result of the same drill.
/// A first-ever session is never a personal best.
pub fn is_personal_best(new: &Session, previous: &[Session], smaller_is_better: bool) -> bool {
    let value = new.result.value;
    if !value.is_finite() {
        return false;
    }
    match best_value(previous, &new.drill_id, smaller_is_better) {
        Some(best) if smaller_is_better => value < best,
        Some(best) => value > best,
        None => false,
    }
}

pub fn is_personal_best_for_drill(drill: &Drill, new: &Session, previous: &[Session]) -> bool {
    is_personal_best(new, previous, drill.smaller_is_better())
}
