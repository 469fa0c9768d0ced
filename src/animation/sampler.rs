//! Keyframe tracks and their interpolation.

use glamx::{Quat, Vec3, Vec4};

/// How values are computed between two keyframes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// The value of the previous keyframe is held.
    Step,
    /// Vectors are lerped, rotations slerped.
    #[default]
    Linear,
    /// Hermite spline. Each keyframe stores an in-tangent, a value and an
    /// out-tangent, in that order.
    CubicSpline,
}

impl Interpolation {
    /// Number of stored elements per keyframe.
    #[inline]
    fn stride(self) -> usize {
        match self {
            Interpolation::CubicSpline => 3,
            _ => 1,
        }
    }
}

/// Keyframe values of a track, tagged with the node property they drive.
#[derive(Clone, Debug, PartialEq)]
pub enum Keyframes {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
    /// Morph target weights, all targets of a keyframe stored contiguously.
    Weights(Vec<f32>),
}

impl Keyframes {
    fn len(&self) -> usize {
        match self {
            Keyframes::Translation(v) | Keyframes::Scale(v) => v.len(),
            Keyframes::Rotation(v) => v.len(),
            Keyframes::Weights(v) => v.len(),
        }
    }
}

/// A value produced by [`Sampler::sample`].
#[derive(Clone, Debug, PartialEq)]
pub enum Sample {
    Translation(Vec3),
    Rotation(Quat),
    Scale(Vec3),
    Weights(Vec<f32>),
}

/// A keyframe track: sorted times and one value (or one tangent triplet) per time.
#[derive(Clone, Debug, PartialEq)]
pub struct Sampler {
    times: Vec<f32>,
    keyframes: Keyframes,
    interpolation: Interpolation,
    /// Values per keyframe element: 1, except for morph weights.
    width: usize,
}

impl Sampler {
    /// Creates a sampler.
    ///
    /// Returns `None` if `times` is empty, not sorted, or if the number of
    /// values does not match the number of times for this interpolation.
    pub fn new(times: Vec<f32>, keyframes: Keyframes, interpolation: Interpolation) -> Option<Self> {
        if times.is_empty() || times.windows(2).any(|w| w[1] < w[0]) {
            return None;
        }

        let elements = times.len() * interpolation.stride();
        let len = keyframes.len();
        let width = match keyframes {
            Keyframes::Weights(_) if len % elements == 0 && len > 0 => len / elements,
            Keyframes::Weights(_) => return None,
            _ if len == elements => 1,
            _ => return None,
        };

        Some(Self {
            times,
            keyframes,
            interpolation,
            width,
        })
    }

    #[inline]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    pub fn keyframes(&self) -> &Keyframes {
        &self.keyframes
    }

    #[inline]
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Time of the first keyframe.
    #[inline]
    pub fn start(&self) -> f32 {
        self.times[0]
    }

    /// Time of the last keyframe.
    #[inline]
    pub fn end(&self) -> f32 {
        self.times[self.times.len() - 1]
    }

    /// Evaluates the track at time `t`.
    ///
    /// `t` is clamped to the keyframe range: before the first keyframe the
    /// first value is returned, after the last one the last value. A NaN `t`
    /// yields the first value.
    pub fn sample(&self, t: f32) -> Sample {
        let last = self.times.len() - 1;

        if self.times.len() == 1 || t.is_nan() || t <= self.times[0] {
            return self.key_value(0);
        }
        if t >= self.times[last] {
            return self.key_value(last);
        }

        // times[i] <= t < times[i + 1]
        let Some(i) = self.times.partition_point(|&x| x <= t).checked_sub(1) else {
            return self.key_value(0);
        };
        let (t0, t1) = (self.times[i], self.times[i + 1]);
        let dt = t1 - t0;
        if dt <= 0.0 {
            return self.key_value(i + 1);
        }
        let s = (t - t0) / dt;

        match self.interpolation {
            Interpolation::Step => self.key_value(i),
            Interpolation::Linear => match &self.keyframes {
                Keyframes::Translation(v) => Sample::Translation(v[i].lerp(v[i + 1], s)),
                Keyframes::Scale(v) => Sample::Scale(v[i].lerp(v[i + 1], s)),
                Keyframes::Rotation(v) => {
                    Sample::Rotation(v[i].normalize().slerp(v[i + 1].normalize(), s).normalize())
                }
                Keyframes::Weights(v) => {
                    let a = &v[i * self.width..(i + 1) * self.width];
                    let b = &v[(i + 1) * self.width..(i + 2) * self.width];
                    Sample::Weights(a.iter().zip(b).map(|(a, b)| a + (b - a) * s).collect())
                }
            },
            Interpolation::CubicSpline => self.hermite(i, dt, s),
        }
    }

    /// The value of keyframe `k`, skipping tangents for cubic splines.
    fn key_value(&self, k: usize) -> Sample {
        let stride = self.interpolation.stride();
        let at = k * stride + stride / 2;
        match &self.keyframes {
            Keyframes::Translation(v) => Sample::Translation(v[at]),
            Keyframes::Scale(v) => Sample::Scale(v[at]),
            Keyframes::Rotation(v) => Sample::Rotation(v[at].normalize()),
            Keyframes::Weights(v) => Sample::Weights(v[at * self.width..(at + 1) * self.width].to_vec()),
        }
    }

    fn hermite(&self, i: usize, dt: f32, s: f32) -> Sample {
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        // Element layout per keyframe: [in-tangent, value, out-tangent].
        let p0 = 3 * i + 1;
        let m0 = 3 * i + 2;
        let p1 = 3 * (i + 1) + 1;
        let m1 = 3 * (i + 1);

        match &self.keyframes {
            Keyframes::Translation(v) => Sample::Translation(
                v[p0] * h00 + v[m0] * (dt * h10) + v[p1] * h01 + v[m1] * (dt * h11),
            ),
            Keyframes::Scale(v) => {
                Sample::Scale(v[p0] * h00 + v[m0] * (dt * h10) + v[p1] * h01 + v[m1] * (dt * h11))
            }
            Keyframes::Rotation(v) => {
                let q = |k: usize| Vec4::from(v[k]);
                let r = q(p0) * h00 + q(m0) * (dt * h10) + q(p1) * h01 + q(m1) * (dt * h11);
                let r = if r.length_squared() > 0.0 {
                    r.normalize()
                } else {
                    q(p0).normalize()
                };
                Sample::Rotation(Quat::from_vec4(r))
            }
            Keyframes::Weights(v) => {
                let w = self.width;
                Sample::Weights(
                    (0..w)
                        .map(|c| {
                            v[p0 * w + c] * h00
                                + v[m0 * w + c] * dt * h10
                                + v[p1 * w + c] * h01
                                + v[m1 * w + c] * dt * h11
                        })
                        .collect(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn translations(interpolation: Interpolation) -> Sampler {
        Sampler::new(
            vec![0.0, 1.0, 2.0],
            Keyframes::Translation(vec![Vec3::ZERO, Vec3::X, Vec3::new(3.0, 0.0, 0.0)]),
            interpolation,
        )
        .unwrap()
    }

    fn assert_translation(sample: Sample, expected: Vec3) {
        match sample {
            Sample::Translation(v) => assert!((v - expected).length() < 1.0e-5, "{v} != {expected}"),
            other => panic!("unexpected sample {other:?}"),
        }
    }

    #[test]
    fn linear_interpolates_between_keys() {
        let s = translations(Interpolation::Linear);
        assert_translation(s.sample(0.5), Vec3::new(0.5, 0.0, 0.0));
        assert_translation(s.sample(1.5), Vec3::new(2.0, 0.0, 0.0));
        assert_translation(s.sample(1.0), Vec3::X);
    }

    #[test]
    fn sampling_is_clamped_to_the_key_range() {
        let s = translations(Interpolation::Linear);
        assert_translation(s.sample(-3.0), Vec3::ZERO);
        assert_translation(s.sample(42.0), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn nan_time_yields_the_first_key() {
        let s = translations(Interpolation::Linear);
        assert_translation(s.sample(f32::NAN), Vec3::ZERO);
        assert_translation(s.sample(f32::INFINITY), Vec3::new(3.0, 0.0, 0.0));
        assert_translation(s.sample(f32::NEG_INFINITY), Vec3::ZERO);
    }

    #[test]
    fn step_holds_the_previous_key() {
        let s = translations(Interpolation::Step);
        assert_translation(s.sample(0.99), Vec3::ZERO);
        assert_translation(s.sample(1.01), Vec3::X);
    }

    #[test]
    fn rotations_are_slerped_and_unit() {
        let s = Sampler::new(
            vec![0.0, 1.0],
            Keyframes::Rotation(vec![Quat::IDENTITY, Quat::from_rotation_y(FRAC_PI_2)]),
            Interpolation::Linear,
        )
        .unwrap();

        match s.sample(0.5) {
            Sample::Rotation(q) => {
                assert!((q.length() - 1.0).abs() < 1.0e-5);
                let expected = Quat::from_rotation_y(FRAC_PI_2 / 2.0);
                assert!(q.dot(expected).abs() > 0.9999);
            }
            other => panic!("unexpected sample {other:?}"),
        }
    }

    #[test]
    fn slerp_takes_the_shortest_path_between_opposite_signs() {
        // -q2 is the same rotation as q2, so the midpoint is a quarter turn
        // halved, not a long way around.
        let q2 = Quat::from_rotation_y(FRAC_PI_2);
        let s = Sampler::new(
            vec![0.0, 1.0],
            Keyframes::Rotation(vec![Quat::IDENTITY, -q2]),
            Interpolation::Linear,
        )
        .unwrap();

        match s.sample(0.5) {
            Sample::Rotation(q) => {
                assert!((q.length() - 1.0).abs() < 1.0e-5);
                let expected = Quat::from_rotation_y(FRAC_PI_2 / 2.0);
                assert!(q.dot(expected).abs() > 0.9999, "{q} != {expected}");
            }
            other => panic!("unexpected sample {other:?}"),
        }
    }

    #[test]
    fn cubic_spline_rotations_are_unit_and_hit_the_keys() {
        let q0 = Quat::IDENTITY;
        let q1 = Quat::from_rotation_z(FRAC_PI_2);
        let zero = Quat::from_xyzw(0.0, 0.0, 0.0, 0.0);
        let s = Sampler::new(
            vec![0.0, 1.0],
            Keyframes::Rotation(vec![zero, q0, zero, zero, q1, zero]),
            Interpolation::CubicSpline,
        )
        .unwrap();

        let rotation = |t: f32| match s.sample(t) {
            Sample::Rotation(q) => q,
            other => panic!("unexpected sample {other:?}"),
        };

        assert!(rotation(0.0).dot(q0).abs() > 0.9999);
        assert!(rotation(1.0).dot(q1).abs() > 0.9999);

        // With zero tangents the midpoint is (q0 + q1) / 2, normalized: the
        // half rotation about Z.
        let mid = rotation(0.5);
        assert!((mid.length() - 1.0).abs() < 1.0e-5);
        let expected = Quat::from_rotation_z(FRAC_PI_2 / 2.0);
        assert!(mid.dot(expected).abs() > 0.9999, "{mid} != {expected}");

        for t in [0.1, 0.3, 0.7, 0.9] {
            assert!((rotation(t).length() - 1.0).abs() < 1.0e-5);
        }
    }

    #[test]
    fn unnormalized_rotation_keys_yield_unit_quaternions() {
        let s = Sampler::new(
            vec![0.0, 1.0],
            Keyframes::Rotation(vec![Quat::from_xyzw(0.0, 0.0, 0.0, 2.0); 2]),
            Interpolation::Step,
        )
        .unwrap();
        match s.sample(0.0) {
            Sample::Rotation(q) => assert!((q.length() - 1.0).abs() < 1.0e-5),
            other => panic!("unexpected sample {other:?}"),
        }
    }

    #[test]
    fn cubic_spline_with_zero_tangents_hits_keys_and_is_smooth() {
        // [in, value, out] per key.
        let values = vec![
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::ZERO,
        ];
        let s = Sampler::new(
            vec![0.0, 1.0],
            Keyframes::Translation(values),
            Interpolation::CubicSpline,
        )
        .unwrap();

        assert_translation(s.sample(0.0), Vec3::ZERO);
        assert_translation(s.sample(1.0), Vec3::new(2.0, 0.0, 0.0));
        // h01(0.5) = 0.5
        assert_translation(s.sample(0.5), Vec3::new(1.0, 0.0, 0.0));
        // h01(0.25) = 0.15625
        assert_translation(s.sample(0.25), Vec3::new(0.3125, 0.0, 0.0));
    }

    #[test]
    fn cubic_spline_tangents_are_scaled_by_the_interval() {
        // Constant slope of 1 unit/s over a 2 s interval: a straight line.
        let values = vec![Vec3::X, Vec3::ZERO, Vec3::X, Vec3::X, Vec3::new(2.0, 0.0, 0.0), Vec3::X];
        let s = Sampler::new(
            vec![0.0, 2.0],
            Keyframes::Translation(values),
            Interpolation::CubicSpline,
        )
        .unwrap();
        assert_translation(s.sample(0.5), Vec3::new(0.5, 0.0, 0.0));
        assert_translation(s.sample(1.5), Vec3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn weights_track_every_target() {
        let s = Sampler::new(
            vec![0.0, 1.0],
            Keyframes::Weights(vec![0.0, 1.0, 1.0, 0.0]),
            Interpolation::Linear,
        )
        .unwrap();
        assert_eq!(s.sample(0.5), Sample::Weights(vec![0.5, 0.5]));
    }

    #[test]
    fn inconsistent_tracks_are_rejected() {
        assert!(Sampler::new(vec![], Keyframes::Scale(vec![]), Interpolation::Linear).is_none());
        assert!(Sampler::new(
            vec![0.0, 1.0],
            Keyframes::Scale(vec![Vec3::ONE]),
            Interpolation::Linear
        )
        .is_none());
        assert!(Sampler::new(
            vec![1.0, 0.0],
            Keyframes::Scale(vec![Vec3::ONE; 2]),
            Interpolation::Linear
        )
        .is_none());
        assert!(Sampler::new(
            vec![0.0, 1.0],
            Keyframes::Scale(vec![Vec3::ONE; 2]),
            Interpolation::CubicSpline
        )
        .is_none());
    }
}
