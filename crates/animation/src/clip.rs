use glam::{Quat, Vec3};

use crate::values::{Interpolatable, MorphWeights};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
    CubicSpline,
}

/// Forward scan distance tried before falling back to binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the last keyframe interval a track was sampled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    last_index: usize,
}

/// Keyframe times and values for one animated property.
///
/// Cubic spline tracks store `[in_tangent, value, out_tangent]` per keyframe.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    pub interpolation: Interpolation,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: Interpolation) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Sample at `time`, clamping outside the keyed range. `None` for an
    /// empty or malformed track.
    pub fn sample(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let len = self.times.len();
        if len == 0 {
            return None;
        }
        if len == 1 || time <= self.times[0] {
            return self.value_at(0).cloned();
        }
        if time >= self.times[len - 1] {
            return self.value_at(len - 1).cloned();
        }

        let index = self.locate(time, cursor);
        let next = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next];
        let dt = t1 - t0;
        let t = if dt > 1e-6 {
            ((time - t0) / dt).clamp(0.0, 1.0)
        } else {
            0.0
        };

        match self.interpolation {
            Interpolation::Step => self.value_at(index).cloned(),
            Interpolation::Linear => {
                let v0 = self.value_at(index)?;
                let v1 = self.value_at(next)?;
                Some(T::interpolate_linear(v0, v1, t))
            }
            Interpolation::CubicSpline => {
                let v0 = self.values.get(index * 3 + 1)?;
                let out0 = self.values.get(index * 3 + 2)?;
                let in1 = self.values.get(next * 3)?;
                let v1 = self.values.get(next * 3 + 1)?;
                Some(T::interpolate_cubic(v0, out0, in1, v1, t, dt))
            }
        }
    }

    /// Index of the interval `[times[i], times[i + 1])` containing `time`.
    /// Caller guarantees `times[0] < time < times[len - 1]`.
    fn locate(&self, time: f32, cursor: &mut KeyframeCursor) -> usize {
        let last = self.times.len() - 1;
        let start = cursor.last_index.min(last - 1);
        if time >= self.times[start] {
            for idx in start..(start + MAX_SCAN_OFFSET).min(last) {
                if time < self.times[idx + 1] {
                    cursor.last_index = idx;
                    return idx;
                }
            }
        }
        let idx = self.times.partition_point(|&t| t <= time).saturating_sub(1);
        cursor.last_index = idx;
        idx
    }

    fn value_at(&self, index: usize) -> Option<&T> {
        match self.interpolation {
            Interpolation::CubicSpline => self.values.get(index * 3 + 1),
            _ => self.values.get(index),
        }
    }
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Translation(KeyframeTrack<Vec3>),
    Rotation(KeyframeTrack<Quat>),
    Scale(KeyframeTrack<Vec3>),
    MorphWeights(KeyframeTrack<MorphWeights>),
}

impl TrackData {
    pub fn duration(&self) -> f32 {
        match self {
            TrackData::Translation(t) | TrackData::Scale(t) => t.duration(),
            TrackData::Rotation(t) => t.duration(),
            TrackData::MorphWeights(t) => t.duration(),
        }
    }
}

/// One animated property of one named node.
#[derive(Debug, Clone)]
pub struct Track {
    pub node_name: String,
    pub data: TrackData,
}

/// A sampled track value ready to be written to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackValue {
    Translation(Vec3),
    Rotation(Quat),
    Scale(Vec3),
    MorphWeights(Vec<f32>),
}

/// Named collection of tracks. Duration is the latest keyframe time.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.duration())
            .fold(0.0_f32, f32::max);
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    pub(crate) fn sample(
        &self,
        track_index: usize,
        time: f32,
        cursor: &mut KeyframeCursor,
    ) -> Option<TrackValue> {
        let track = self.tracks.get(track_index)?;
        Some(match &track.data {
            TrackData::Translation(t) => TrackValue::Translation(t.sample(time, cursor)?),
            TrackData::Rotation(t) => TrackValue::Rotation(t.sample(time, cursor)?),
            TrackData::Scale(t) => TrackValue::Scale(t.sample(time, cursor)?),
            TrackData::MorphWeights(t) => TrackValue::MorphWeights(t.sample(time, cursor)?.0),
        })
    }
}
