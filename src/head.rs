//! 6-DOF head pose estimation from tracked facial landmarks.
//!
//! Rotation is recovered by aligning the current smoothed points with a
//! reference snapshot of the neutral pose (Kabsch-style, via SVD of the
//! cross-covariance matrix). Position is the displacement of the cheek
//! midpoint, scaled into output units.

use log::debug;
use nalgebra::{Matrix3, Point3};

use crate::constants::POSITION_FACTOR;
use crate::filters::{FilterParams, OneEuroFilter};
use crate::landmarks::LandmarkSample;

/// Derived 6-DOF pose: position in scaled output units, rotation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadPose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

/// A 3D point smoothed by one adaptive filter per axis
#[derive(Debug)]
pub struct TrackedPoint {
    x: OneEuroFilter,
    y: OneEuroFilter,
    z: OneEuroFilter,
    value: Point3<f64>,
}

impl TrackedPoint {
    /// Create a point seeded with its first raw coordinate
    #[must_use]
    pub fn new(t0: f64, p: Point3<f64>, params: FilterParams) -> Self {
        Self {
            x: OneEuroFilter::with_params(t0, p.x, params),
            y: OneEuroFilter::with_params(t0, p.y, params),
            z: OneEuroFilter::with_params(t0, p.z, params),
            value: p,
        }
    }

    /// Feed one raw coordinate through the per-axis filters.
    ///
    /// A non-increasing timestamp leaves the smoothed value unchanged; the
    /// stale sample is dropped rather than crashing the tracking loop.
    pub fn update(&mut self, t: f64, p: Point3<f64>) {
        let x = self.x.filter(t, p.x);
        let y = self.y.filter(t, p.y);
        let z = self.z.filter(t, p.z);
        match (x, y, z) {
            (Ok(x), Ok(y), Ok(z)) => self.value = Point3::new(x, y, z),
            _ => debug!("dropping landmark sample with non-increasing timestamp {t}"),
        }
    }

    /// Current smoothed coordinate
    #[must_use]
    pub fn value(&self) -> Point3<f64> {
        self.value
    }
}

/// Snapshot of the five raw points representing the neutral head pose
#[derive(Debug, Clone, Copy, PartialEq)]
struct ReferencePose {
    top: Point3<f64>,
    bottom: Point3<f64>,
    left: Point3<f64>,
    right: Point3<f64>,
    center: Point3<f64>,
}

impl ReferencePose {
    fn from_sample(sample: &LandmarkSample) -> Self {
        Self {
            top: sample.top,
            bottom: sample.bottom,
            left: sample.left,
            right: sample.right,
            center: sample.center,
        }
    }

    /// Points in slot order, matching [`Head::current`]
    fn as_array(&self) -> [Point3<f64>; 5] {
        [self.top, self.bottom, self.left, self.right, self.center]
    }
}

fn centroid(points: &[Point3<f64>; 5]) -> Point3<f64> {
    let sum = points
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as f64)
}

fn midpoint(a: Point3<f64>, b: Point3<f64>) -> Point3<f64> {
    Point3::from((a.coords + b.coords) / 2.0)
}

/// 6-DOF head tracking state: five smoothed landmark points, the neutral
/// reference snapshot, and the most recently computed pose.
#[derive(Debug)]
pub struct Head {
    top: TrackedPoint,
    bottom: TrackedPoint,
    left: TrackedPoint,
    right: TrackedPoint,
    center: TrackedPoint,

    reference: ReferencePose,
    pose: HeadPose,
}

impl Head {
    /// Initialize from the first valid detection with the default filter
    /// tuning.
    ///
    /// The raw coordinates seed the tracked points and become the
    /// reference snapshot; the pose starts at the identity.
    #[must_use]
    pub fn new(sample: &LandmarkSample, t0: f64) -> Self {
        Self::with_params(sample, t0, FilterParams::default())
    }

    /// Initialize from the first valid detection
    #[must_use]
    pub fn with_params(sample: &LandmarkSample, t0: f64, params: FilterParams) -> Self {
        Self {
            top: TrackedPoint::new(t0, sample.top, params),
            bottom: TrackedPoint::new(t0, sample.bottom, params),
            left: TrackedPoint::new(t0, sample.left, params),
            right: TrackedPoint::new(t0, sample.right, params),
            center: TrackedPoint::new(t0, sample.center, params),
            reference: ReferencePose::from_sample(sample),
            pose: HeadPose::default(),
        }
    }

    /// Feed one frame of raw landmarks into the point filters.
    ///
    /// Pure data ingestion; rotation and position are untouched until
    /// [`update_rotation`](Self::update_rotation) and
    /// [`update_position`](Self::update_position) run.
    pub fn update_points(&mut self, sample: &LandmarkSample, t: f64) {
        self.top.update(t, sample.top);
        self.bottom.update(t, sample.bottom);
        self.left.update(t, sample.left);
        self.right.update(t, sample.right);
        self.center.update(t, sample.center);
    }

    /// Current smoothed points in slot order
    fn current(&self) -> [Point3<f64>; 5] {
        [
            self.top.value(),
            self.bottom.value(),
            self.left.value(),
            self.right.value(),
            self.center.value(),
        ]
    }

    /// Re-estimate the head rotation from the current smoothed points.
    ///
    /// Kabsch-style: SVD of the cross-covariance between the centered
    /// reference and current point sets, then Euler angles from the
    /// rotation matrix. The reflection case (`det(R) = -1`) is not
    /// corrected, only reported; with five well-spread facial points it
    /// does not occur in practice.
    pub fn update_rotation(&mut self) {
        let reference = self.reference.as_array();
        let current = self.current();

        let c_ref = centroid(&reference);
        let c_cur = centroid(&current);

        // Cross-covariance of the centered point sets
        let mut h = Matrix3::zeros();
        for (r, c) in reference.iter().zip(&current) {
            let d_ref = r - c_ref;
            let d_cur = c - c_cur;
            h += d_ref * d_cur.transpose();
        }

        let svd = h.svd(true, true);
        let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
            debug!("SVD produced no factors, keeping previous rotation");
            return;
        };
        let r = v_t.transpose() * u.transpose();

        if r.determinant() < 0.0 {
            debug!("rotation estimate is a reflection (det < 0), angles may be degenerate");
        }

        let yaw = r[(1, 0)].atan2(r[(0, 0)]);
        let pitch = (-r[(2, 0)]).atan2((r[(2, 1)].powi(2) + r[(2, 2)].powi(2)).sqrt());
        let roll = r[(2, 1)].atan2(r[(2, 2)]);

        self.pose.pitch = pitch.to_degrees();
        self.pose.roll = roll.to_degrees();
        self.pose.yaw = yaw.to_degrees();
    }

    /// Re-estimate the head position from the cheek midpoint displacement
    pub fn update_position(&mut self) {
        let reference = midpoint(self.reference.left, self.reference.right);
        let current = midpoint(self.left.value(), self.right.value());
        let delta = reference - current;

        self.pose.x = delta.x * POSITION_FACTOR;
        self.pose.y = delta.y * POSITION_FACTOR;
        self.pose.z = delta.z * POSITION_FACTOR;
    }

    /// Re-zero the pose around the current head position.
    ///
    /// Replaces the reference snapshot with the current smoothed points;
    /// the only mutator of the reference after initialization.
    pub fn center(&mut self) {
        self.reference = ReferencePose {
            top: self.top.value(),
            bottom: self.bottom.value(),
            left: self.left.value(),
            right: self.right.value(),
            center: self.center.value(),
        };
        self.pose = HeadPose::default();
    }

    /// Most recently computed pose
    #[must_use]
    pub fn pose(&self) -> HeadPose {
        self.pose
    }
}
