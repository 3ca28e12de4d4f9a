//! Session scoring
//!
//! Each PVT session contains many reaction-time trials. This module reduces
//! them to one score per observed (user, session) pair: rows are grouped
//! first by user, then by session within the user, and each group collapses
//! to the configured central-tendency statistic.

use crate::types::{Measurement, SessionScore, Statistic};
use std::collections::BTreeMap;

/// Aggregate raw trials into one score per observed (user, session) pair.
///
/// Output order follows the grouped keys, not the input; callers should
/// compare results by key rather than by position.
pub fn score_sessions(measurements: &[Measurement], statistic: Statistic) -> Vec<SessionScore> {
    let mut groups: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();
    for m in measurements {
        groups
            .entry((m.user_id.clone(), m.session_id.clone()))
            .or_default()
            .push(m.response_time);
    }

    groups
        .into_iter()
        .map(|((user_id, session_id), values)| SessionScore {
            user_id,
            session_id,
            response_time: statistic.apply(&values),
        })
        .collect()
}
