use geo::{Coord, Line};

/// Tolerance for parallel lines and undefined axis evaluations.
pub const EPSILON: f64 = 1e-9;

/// Infinite line in general form `a*x + b*y = c`, with `(a, b)` a unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineEq {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LineEq {
    /// Line through two points, `None` when they coincide.
    pub fn through(p: Coord<f64>, q: Coord<f64>) -> Option<Self> {
        Self::with_direction(p, q - p)
    }

    /// Line through `p` running along `direction`.
    pub fn with_direction(p: Coord<f64>, direction: Coord<f64>) -> Option<Self> {
        let norm = direction.x.hypot(direction.y);
        if !(norm > EPSILON) || !norm.is_finite() {
            return None;
        }
        let a = direction.y / norm;
        let b = -direction.x / norm;
        Some(LineEq {
            a,
            b,
            c: a * p.x + b * p.y,
        })
    }

    /// Unit vector along the line.
    pub fn direction(&self) -> Coord<f64> {
        Coord {
            x: -self.b,
            y: self.a,
        }
    }

    /// A point lying on the line.
    pub fn anchor(&self) -> Coord<f64> {
        Coord {
            x: self.a * self.c,
            y: self.b * self.c,
        }
    }

    /// y coordinate at `x`; undefined for vertical lines.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        (self.b.abs() > EPSILON).then(|| (self.c - self.a * x) / self.b)
    }

    /// x coordinate at `y`; undefined for horizontal lines.
    pub fn x_at(&self, y: f64) -> Option<f64> {
        (self.a.abs() > EPSILON).then(|| (self.c - self.b * y) / self.a)
    }

    /// Signed distance of `p` from the line.
    pub fn signed_distance(&self, p: Coord<f64>) -> f64 {
        self.a * p.x + self.b * p.y - self.c
    }

    /// Perpendicular line through `p`.
    pub fn normal_through(&self, p: Coord<f64>) -> Self {
        LineEq {
            a: self.b,
            b: -self.a,
            c: self.b * p.x - self.a * p.y,
        }
    }

    /// Parallel line through `p`.
    pub fn parallel_through(&self, p: Coord<f64>) -> Self {
        LineEq {
            c: self.a * p.x + self.b * p.y,
            ..*self
        }
    }

    pub fn intersection(&self, other: &LineEq) -> Option<Coord<f64>> {
        let det = self.a * other.b - other.a * self.b;
        if det.abs() < EPSILON {
            return None;
        }
        Some(Coord {
            x: (self.c * other.b - other.c * self.b) / det,
            y: (self.a * other.c - other.a * self.c) / det,
        })
    }

    /// True when the line runs at most 45 degrees off the x axis.
    pub fn is_horizontal_dominant(&self) -> bool {
        self.b.abs() >= self.a.abs()
    }

    /// Point on the line at parameter `t` along [`LineEq::direction`].
    pub fn at(&self, t: f64) -> Coord<f64> {
        self.anchor() + self.direction() * t
    }

    /// Parameter of the projection of `p` onto the line.
    pub fn project(&self, p: Coord<f64>) -> f64 {
        let d = self.direction();
        let o = self.anchor();
        (p.x - o.x) * d.x + (p.y - o.y) * d.y
    }
}

pub fn length(segment: &Line<f64>) -> f64 {
    segment.dx().hypot(segment.dy())
}

/// True when `p` lies on the segment, endpoints included.
pub fn covers(segment: &Line<f64>, p: Coord<f64>) -> bool {
    let len = length(segment);
    if len <= EPSILON {
        return (p - segment.start).x.hypot((p - segment.start).y) <= EPSILON;
    }
    let d = segment.delta() / len;
    let rel = p - segment.start;
    let along = rel.x * d.x + rel.y * d.y;
    let across = rel.x * d.y - rel.y * d.x;
    let tol = EPSILON * len.max(1.0) * 1e3;
    across.abs() <= tol && along >= -tol && along <= len + tol
}
