//! Plane geometry: points, distance metrics, and the grid of regions.
//!
//! `Point` uses `f64` — the Gaussian-process update downstream (in
//! `cs-sensemap`) needs full double precision for its matrix inversion, and
//! the coordinate values here feed directly into that kernel, so there is no
//! precision budget to spend by downcasting to `f32` the way `dt-core`'s
//! `GeoPoint` does for its city-scale haversine distance.

use crate::ids::RegionId;
use crate::rng::AgentRng;

/// A 2D real coordinate in the sense area's local plane.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn euclidean_distance(a: Point, b: Point) -> f64 {
    if a == b {
        return 0.0;
    }
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan_distance(a: Point, b: Point) -> f64 {
    if a == b {
        return 0.0;
    }
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// An axis-aligned rectangular area of the sense plane, `[start, end)`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    pub start: Point,
    pub end: Point,
}

impl Area {
    /// Normalizes `p1`/`p2` into (min, max) corners.
    pub fn new(p1: Point, p2: Point) -> Self {
        let start = Point::new(p1.x.min(p2.x), p1.y.min(p2.y));
        let end = Point::new(p1.x.max(p2.x), p1.y.max(p2.y));
        Self { start, end }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.end.x - self.start.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.end.y - self.start.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.start.x + self.width() / 2.0,
            self.start.y + self.height() / 2.0,
        )
    }

    /// The diagonal length of the area — used as the distance normalizer
    /// `D_max` in the allocator's utility and the sense-map kernel.
    pub fn diagonal(&self) -> f64 {
        (self.width().powi(2) + self.height().powi(2)).sqrt()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.start.x <= p.x && p.x < self.end.x && self.start.y <= p.y && p.y < self.end.y
    }

    /// Uniformly sample a point from the interior of the area.
    pub fn random_point(&self, rng: &mut AgentRng) -> Point {
        let x = rng.gen_range(self.start.x..self.end.x);
        let y = rng.gen_range(self.start.y..self.end.y);
        Point::new(x, y)
    }

    /// Tile this area into a grid of square `Region`s of side `granularity`.
    ///
    /// # Panics
    /// Panics if `granularity` does not evenly divide both dimensions.
    pub fn grid(&self, granularity: f64, rng: &mut AgentRng) -> Vec<Region> {
        assert!(
            (self.width() / granularity).fract().abs() < 1e-9
                && (self.height() / granularity).fract().abs() < 1e-9,
            "granularity must evenly tile the sense area"
        );
        let cols = (self.width() / granularity).round() as u32;
        let rows = (self.height() / granularity).round() as u32;

        let mut regions = Vec::with_capacity((cols * rows) as usize);
        let mut id = 0u32;
        for i in 0..cols {
            for j in 0..rows {
                let start = Point::new(
                    self.start.x + i as f64 * granularity,
                    self.start.y + j as f64 * granularity,
                );
                let end = Point::new(start.x + granularity, start.y + granularity);
                regions.push(Region::new(RegionId(id), start, end, rng));
                id += 1;
            }
        }
        regions
    }
}

/// A single grid cell: an axis-aligned square of uniform side, identified by
/// integer id.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub id: RegionId,
    area: Area,
    /// A fixed interior point, sampled once at construction — stands in for
    /// the "representative location" used by air-category inter-region
    /// distance and by self-repair's nearest-agent scoping.
    represent_loc: Point,
}

impl Region {
    pub fn new(id: RegionId, start: Point, end: Point, rng: &mut AgentRng) -> Self {
        let area = Area::new(start, end);
        debug_assert!(
            (area.width() - area.height()).abs() < 1e-9,
            "regions must be square"
        );
        let represent_loc = area.random_point(rng);
        Self {
            id,
            area,
            represent_loc,
        }
    }

    #[inline]
    pub fn side(&self) -> f64 {
        self.area.width()
    }

    pub fn center(&self) -> Point {
        self.area.center()
    }

    pub fn represent_loc(&self) -> Point {
        self.represent_loc
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.area.contains(p)
    }

    pub fn random_point(&self, rng: &mut AgentRng) -> Point {
        self.area.random_point(rng)
    }

    /// Manhattan distance between region centers.
    pub fn dist(&self, other: &Region) -> f64 {
        manhattan_distance(self.center(), other.center())
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Region({}, side={})", self.id, self.side())
    }
}
