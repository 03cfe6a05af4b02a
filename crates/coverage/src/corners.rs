use patchsweep_core::{Point3, PointCloud};
use serde::{Deserialize, Serialize};

/// Corners further apart than this along an edge are snapped together.
pub const RECTIFY_SNAP: f32 = 0.1;

/// The four extreme points of a patch, one per xy-quadrant around its
/// centroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerSet {
    pub left_up: Point3,
    pub left_down: Point3,
    pub right_up: Point3,
    pub right_down: Point3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quadrant {
    RightUp,
    RightDown,
    LeftUp,
    LeftDown,
}

impl Quadrant {
    /// Quadrant of an offset from the centroid; `None` on either axis.
    fn of(d: &Point3) -> Option<Self> {
        let (x, y) = (d.x(), d.y());
        match (x > 0.0, x < 0.0, y > 0.0, y < 0.0) {
            (true, _, true, _) => Some(Quadrant::RightUp),
            (true, _, _, true) => Some(Quadrant::RightDown),
            (_, true, true, _) => Some(Quadrant::LeftUp),
            (_, true, _, true) => Some(Quadrant::LeftDown),
            _ => None,
        }
    }
}

impl CornerSet {
    /// All four corners at `p`.
    pub fn collapsed(p: Point3) -> Self {
        Self {
            left_up: p,
            left_down: p,
            right_up: p,
            right_down: p,
        }
    }

    /// Find the corner of each quadrant around `centroid`: the point with the
    /// largest `|dx| + |dy|`.
    ///
    /// A later point replaces the current corner only when strictly farther,
    /// so the first extreme point wins ties. A quadrant without points keeps
    /// its corner at `centroid`. Points on either axis through the centroid
    /// belong to no quadrant, and non-finite points are ignored.
    pub fn detect(patch: &PointCloud, centroid: Point3) -> Self {
        let mut offsets = Self::collapsed(Point3::ORIGIN);

        for p in patch.iter_points().filter(Point3::is_finite) {
            let d = p - centroid;
            let Some(quadrant) = Quadrant::of(&d) else {
                continue;
            };
            let corner = offsets.corner_mut(quadrant);
            if reach(&d) > reach(corner) {
                *corner = d;
            }
        }

        Self {
            left_up: offsets.left_up + centroid,
            left_down: offsets.left_down + centroid,
            right_up: offsets.right_up + centroid,
            right_down: offsets.right_down + centroid,
        }
    }

    fn corner_mut(&mut self, quadrant: Quadrant) -> &mut Point3 {
        match quadrant {
            Quadrant::RightUp => &mut self.right_up,
            Quadrant::RightDown => &mut self.right_down,
            Quadrant::LeftUp => &mut self.left_up,
            Quadrant::LeftDown => &mut self.left_down,
        }
    }

    /// Pull the corners toward an axis-aligned rectangle.
    ///
    /// Applied in order, each only when the pair differs by more than
    /// [`RECTIFY_SNAP`]:
    /// 1. top edge: both `*_up` corners take the larger y;
    /// 2. bottom edge: both `*_down` corners take the smaller y;
    /// 3. left edge: both `left_*` corners take the smaller x;
    /// 4. right edge: both `right_*` corners take the larger x.
    pub fn rectify(&mut self) {
        if (self.left_up.y() - self.right_up.y()).abs() > RECTIFY_SNAP {
            let y = self.left_up.y().max(self.right_up.y());
            self.left_up.y = y;
            self.right_up.y = y;
        }
        if (self.left_down.y() - self.right_down.y()).abs() > RECTIFY_SNAP {
            let y = self.left_down.y().min(self.right_down.y());
            self.left_down.y = y;
            self.right_down.y = y;
        }
        if (self.left_up.x() - self.left_down.x()).abs() > RECTIFY_SNAP {
            let x = self.left_up.x().min(self.left_down.x());
            self.left_up.x = x;
            self.left_down.x = x;
        }
        if (self.right_up.x() - self.right_down.x()).abs() > RECTIFY_SNAP {
            let x = self.right_up.x().max(self.right_down.x());
            self.right_up.x = x;
            self.right_down.x = x;
        }
    }

    pub fn rectified(mut self) -> Self {
        self.rectify();
        self
    }

    /// Narrowest horizontal extent, measured along the top and bottom edges.
    pub fn width(&self) -> f32 {
        (self.right_up.x() - self.left_up.x()).min(self.right_down.x() - self.left_down.x())
    }

    /// Shortest vertical extent, measured along the left and right edges.
    pub fn height(&self) -> f32 {
        (self.right_up.y() - self.right_down.y()).min(self.left_up.y() - self.left_down.y())
    }

    pub fn is_finite(&self) -> bool {
        self.left_up.is_finite()
            && self.left_down.is_finite()
            && self.right_up.is_finite()
            && self.right_down.is_finite()
    }
}

#[inline]
fn reach(d: &Point3) -> f32 {
    d.x().abs() + d.y().abs()
}
