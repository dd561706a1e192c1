use log::debug;

use crate::history::HcpHistory;
use crate::interpolate::interpolate_targets;
use crate::level::{clamp_level, compute_level_from_thresholds};
use crate::types::{Drill, EvalMode, Level, Session};

/// Handicap a session is judged against in the given mode.
pub fn effective_hcp(session: &Session, mode: EvalMode, history: &dyn HcpHistory) -> Option<f64> {
    match mode {
        EvalMode::Historical => history.hcp_at(Some(&session.date)),
        EvalMode::Current => history.latest_hcp(),
    }
}

/// Level of one session.
///
/// 1. No drill: 0.
/// 2. Historical mode with a stored `levelReached`: that value, floored and
///    clamped. A snapshot must not drift when targets or history change.
/// 3. Otherwise: handicap for the mode, interpolated thresholds, compare.
pub fn evaluate_session_level(
    session: &Session,
    drill: Option<&Drill>,
    mode: EvalMode,
    history: &dyn HcpHistory,
) -> Level {
    let Some(drill) = drill else {
        return 0;
    };

    if mode == EvalMode::Historical {
        if let Some(stored) = session.stored_level() {
            return clamp_level(stored);
        }
    }

    let hcp = effective_hcp(session, mode, history);
    if hcp.is_none() {
        debug!(
            "no handicap for session {} ({:?}, date={:?})",
            session.id, mode, session.date
        );
    }

    let thresholds = interpolate_targets(drill.targets(), hcp);
    compute_level_from_thresholds(&thresholds, session.result.value, drill.smaller_is_better())
}
