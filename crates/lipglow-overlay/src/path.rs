//! Closed polygon paths in display-pixel space.

use lipglow_models::ScreenPoint;

/// A single drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(ScreenPoint),
    LineTo(ScreenPoint),
    Close,
}

/// One closed polygon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subpath {
    points: Vec<ScreenPoint>,
    closed: bool,
}

impl Subpath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: ScreenPoint) {
        self.points.clear();
        self.points.push(p);
        self.closed = false;
    }

    pub fn line_to(&mut self, p: ScreenPoint) {
        self.points.push(p);
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Build a closed polygon from a point sequence.
    pub fn closed_polygon<I>(points: I) -> Self
    where
        I: IntoIterator<Item = ScreenPoint>,
    {
        let mut sub = Subpath::new();
        let mut iter = points.into_iter();
        if let Some(first) = iter.next() {
            sub.move_to(first);
            for p in iter {
                sub.line_to(p);
            }
        }
        sub.close();
        sub
    }

    pub fn points(&self) -> &[ScreenPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Edges of the polygon, including the closing edge when closed.
    pub fn edges(&self) -> impl Iterator<Item = (ScreenPoint, ScreenPoint)> + '_ {
        let n = self.points.len();
        let count = if self.closed && n > 1 { n } else { n.saturating_sub(1) };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let min_x = self.points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let min_y = self.points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_x = self.points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = self.points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        Some((min_x, min_y, max_x, max_y))
    }
}

/// A fillable shape made of one or more closed subpaths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayPath {
    subpaths: Vec<Subpath>,
}

impl OverlayPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subpath, keeping it separate from the existing ones.
    pub fn append(&mut self, subpath: Subpath) {
        self.subpaths.push(subpath);
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(Subpath::is_empty)
    }

    /// Total number of points across all subpaths.
    pub fn point_count(&self) -> usize {
        self.subpaths.iter().map(Subpath::len).sum()
    }

    /// Flatten into drawing commands.
    pub fn commands(&self) -> Vec<PathCommand> {
        let mut out = Vec::with_capacity(self.point_count() + self.subpaths.len());
        for sub in &self.subpaths {
            let mut iter = sub.points().iter();
            if let Some(first) = iter.next() {
                out.push(PathCommand::MoveTo(*first));
                out.extend(iter.map(|p| PathCommand::LineTo(*p)));
                if sub.is_closed() {
                    out.push(PathCommand::Close);
                }
            }
        }
        out
    }

    /// Union of the subpath bounds.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.subpaths
            .iter()
            .filter_map(Subpath::bounds)
            .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, s: f64) -> Subpath {
        Subpath::closed_polygon(vec![
            ScreenPoint::new(x, y),
            ScreenPoint::new(x + s, y),
            ScreenPoint::new(x + s, y + s),
            ScreenPoint::new(x, y + s),
        ])
    }

    #[test]
    fn test_closed_polygon_edges_include_closing_edge() {
        let sq = square(0.0, 0.0, 1.0);
        assert!(sq.is_closed());
        let edges: Vec<_> = sq.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3].1, ScreenPoint::new(0.0, 0.0));
    }

    #[test]
    fn test_commands_layout() {
        let mut path = OverlayPath::new();
        path.append(square(0.0, 0.0, 1.0));
        path.append(square(5.0, 5.0, 1.0));

        let cmds = path.commands();
        // Two subpaths of 4 points: move + 3 lines + close each
        assert_eq!(cmds.len(), 10);
        assert!(matches!(cmds[0], PathCommand::MoveTo(_)));
        assert!(matches!(cmds[4], PathCommand::Close));
        assert!(matches!(cmds[5], PathCommand::MoveTo(_)));
        assert_eq!(path.point_count(), 8);
    }

    #[test]
    fn test_bounds_union() {
        let mut path = OverlayPath::new();
        path.append(square(0.0, 0.0, 1.0));
        path.append(square(5.0, 5.0, 2.0));
        assert_eq!(path.bounds(), Some((0.0, 0.0, 7.0, 7.0)));
        assert_eq!(OverlayPath::new().bounds(), None);
    }
}
