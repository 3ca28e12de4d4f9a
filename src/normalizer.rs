//! Baseline normalization
//!
//! Converts each user's session scores into relative response times:
//! percentage deviation from that user's own baseline. Positive values mean
//! faster (better) than baseline, negative means slower.

use crate::types::{RelativeResponse, SessionScore, Statistic};
use std::collections::BTreeMap;

/// Attach the relative response time to every session score.
///
/// The baseline is computed once per user group over all of that group's
/// scores, including the row being normalized, and broadcast to the group's
/// members: `rrt = 100 * (baseline - score) / baseline`. A user with a
/// single session therefore always gets an rrt of zero. A zero baseline is
/// not guarded; the division then yields a non-finite rrt.
pub fn relative_response_times(
    scores: &[SessionScore],
    statistic: Statistic,
) -> Vec<RelativeResponse> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for s in scores {
        groups.entry(&s.user_id).or_default().push(s.response_time);
    }

    let baselines: BTreeMap<&str, f64> = groups
        .into_iter()
        .map(|(user, values)| (user, statistic.apply(&values)))
        .collect();

    scores
        .iter()
        .map(|s| {
            let baseline = baselines[s.user_id.as_str()];
            RelativeResponse {
                user_id: s.user_id.clone(),
                session_id: s.session_id.clone(),
                response_time: s.response_time,
                rrt: 100.0 * (baseline - s.response_time) / baseline,
            }
        })
        .collect()
}
