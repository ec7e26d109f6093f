//! Bounding boxes of differing pixels.

/// Axis-aligned rectangle in pixel coordinates.
///
/// Areas built from points are never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiffArea {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

impl DiffArea {
    /// Creates a rectangle with exactly the given size.
    ///
    /// [`right`](Self::right), [`bottom`](Self::bottom) and the growing
    /// methods expect a non-empty area.
    #[must_use]
    pub fn new(left: usize, top: usize, width: usize, height: usize) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// `true` if the area covers no pixels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// 1x1 area covering a single point.
    #[must_use]
    pub fn from_point(x: usize, y: usize) -> Self {
        Self::new(x, y, 1, 1)
    }

    /// Minimal rectangle covering every point, or `None` for no points.
    #[must_use]
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut points = points.into_iter();
        let (x, y) = points.next()?;
        let mut area = Self::from_point(x, y);
        for (x, y) in points {
            area.update(x, y);
        }
        Some(area)
    }

    /// Inclusive right edge.
    #[inline]
    #[must_use]
    pub fn right(&self) -> usize {
        self.left + self.width - 1
    }

    /// Inclusive bottom edge.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> usize {
        self.top + self.height - 1
    }

    /// Grows the rectangle to include `(x, y)`.
    pub fn update(&mut self, x: usize, y: usize) {
        let right = self.right().max(x);
        let bottom = self.bottom().max(y);
        self.left = self.left.min(x);
        self.top = self.top.min(y);
        self.width = right - self.left + 1;
        self.height = bottom - self.top + 1;
    }

    /// Grows the rectangle to include `other`.
    pub fn merge(&mut self, other: &Self) {
        self.update(other.left, other.top);
        self.update(other.right(), other.bottom());
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    /// Whether `(x, y)` is within `radius` pixels of this rectangle.
    #[must_use]
    pub fn is_near(&self, x: usize, y: usize, radius: usize) -> bool {
        x + radius >= self.left
            && x <= self.right() + radius
            && y + radius >= self.top
            && y <= self.bottom() + radius
    }

    /// Whether two rectangles come within `radius` pixels of each other.
    #[must_use]
    pub fn is_near_area(&self, other: &Self, radius: usize) -> bool {
        other.right() + radius >= self.left
            && other.left <= self.right() + radius
            && other.bottom() + radius >= self.top
            && other.top <= self.bottom() + radius
    }

    /// Number of pixels covered.
    #[must_use]
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Groups differing points into nearby clusters.
///
/// A point joins the first cluster within `radius`; clusters that end up
/// within `radius` of each other are merged when the result is taken.
#[derive(Debug, Clone)]
pub struct DiffClusters {
    radius: usize,
    clusters: Vec<DiffArea>,
}

impl DiffClusters {
    #[must_use]
    pub fn new(radius: usize) -> Self {
        Self {
            radius,
            clusters: Vec::new(),
        }
    }

    pub fn update(&mut self, x: usize, y: usize) {
        let radius = self.radius;
        match self.clusters.iter_mut().find(|c| c.is_near(x, y, radius)) {
            Some(cluster) => cluster.update(x, y),
            None => self.clusters.push(DiffArea::from_point(x, y)),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Merges overlapping clusters and returns them, sorted top to bottom,
    /// then left to right.
    #[must_use]
    pub fn into_clusters(self) -> Vec<DiffArea> {
        let radius = self.radius;
        let mut clusters = self.clusters;
        let mut merged = true;
        while merged {
            merged = false;
            let mut i = 0;
            while i < clusters.len() {
                let mut j = i + 1;
                while j < clusters.len() {
                    if clusters[i].is_near_area(&clusters[j], radius) {
                        let other = clusters.swap_remove(j);
                        clusters[i].merge(&other);
                        merged = true;
                    } else {
                        j += 1;
                    }
                }
                i += 1;
            }
        }
        clusters.sort_by_key(|c| (c.top, c.left));
        clusters
    }
}
