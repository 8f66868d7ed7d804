use crate::animation::ease::Ease;
use smallvec::SmallVec;

/// Animatable clip properties. The set is closed so evaluation stays
/// allocation-free and typo-proof.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AnimProp {
    /// Horizontal offset from canvas center, canvas units.
    X,
    /// Vertical offset from canvas center, canvas units.
    Y,
    /// Uniform content scale.
    Scale,
    /// Rotation in degrees.
    Rotation,
    /// Opacity in percent (0..100).
    Opacity,
}

/// One keyframe on a clip property, in seconds into the clip.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Time in seconds relative to the clip start.
    pub time: f64,
    /// Property value at `time`.
    pub value: f64,
    /// Easing applied toward the next keyframe.
    #[serde(default)]
    pub ease: Ease,
}

/// Keyframes closer together than this are treated as the same instant;
/// upserting within the window replaces the existing key.
pub const KEY_MERGE_EPS: f64 = 0.05;

/// Evaluate a keyframed property at `time_into_clip` seconds.
///
/// With no keyframes the base value is returned. Outside the keyed range the
/// first/last value is clamped. Between two keys the leading key's easing
/// shapes the blend.
///
/// Lists rehydrated from JSON may carry keys in any order; evaluation sorts
/// a scratch copy when needed.
pub fn evaluate(base: f64, keys: &[Keyframe], time_into_clip: f64) -> f64 {
    if keys.is_empty() {
        return base;
    }
    if keys.is_sorted_by(|a, b| a.time <= b.time) {
        return evaluate_sorted(keys, time_into_clip);
    }

    let mut sorted: SmallVec<[Keyframe; 8]> = SmallVec::from_slice(keys);
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time));
    evaluate_sorted(&sorted, time_into_clip)
}

fn evaluate_sorted(keys: &[Keyframe], time_into_clip: f64) -> f64 {
    let idx = keys.partition_point(|k| k.time <= time_into_clip);
    if idx == 0 {
        return keys[0].value;
    }
    if idx >= keys.len() {
        return keys[keys.len() - 1].value;
    }

    let a = &keys[idx - 1];
    let b = &keys[idx];
    let denom = b.time - a.time;
    if denom <= 0.0 {
        return a.value;
    }

    let t = (time_into_clip - a.time) / denom;
    let te = a.ease.apply(t);
    a.value + (b.value - a.value) * te
}

/// Insert a keyframe keeping the list sorted by time.
///
/// A key within [`KEY_MERGE_EPS`] of an existing one replaces it
/// (last write wins).
pub fn upsert(keys: &mut Vec<Keyframe>, kf: Keyframe) {
    if let Some(existing) = keys
        .iter_mut()
        .find(|k| (k.time - kf.time).abs() < KEY_MERGE_EPS)
    {
        *existing = kf;
    } else {
        let idx = keys.partition_point(|k| k.time <= kf.time);
        keys.insert(idx, kf);
    }
}

/// Remove the keyframe within [`KEY_MERGE_EPS`] of `time`, if any.
pub fn remove_at(keys: &mut Vec<Keyframe>, time: f64) -> bool {
    if let Some(idx) = keys
        .iter()
        .position(|k| (k.time - time).abs() < KEY_MERGE_EPS)
    {
        keys.remove(idx);
        true
    } else {
        false
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframe.rs"]
mod tests;
