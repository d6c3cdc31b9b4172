//! Screen/world coordinate conversion and the pan/zoom viewport.

use std::ops::{Add, Div, Mul, Sub};

/// Smallest zoom factor.
pub const MIN_SCALE: f64 = 0.2;
/// Largest zoom factor.
pub const MAX_SCALE: f64 = 3.0;

/// A 2D point or vector, used for both screen and world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal component.
	pub x: f64,
	/// Vertical component.
	pub y: f64,
}

impl Point {
	/// Create a point from its components.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}
}

impl Add for Point {
	type Output = Point;

	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Point {
	type Output = Point;

	fn mul(self, rhs: f64) -> Point {
		Point::new(self.x * rhs, self.y * rhs)
	}
}

impl Div<f64> for Point {
	type Output = Point;

	fn div(self, rhs: f64) -> Point {
		Point::new(self.x / rhs, self.y / rhs)
	}
}

/// Width and height of a box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
	/// Horizontal extent.
	pub width: f64,
	/// Vertical extent.
	pub height: f64,
}

impl Size {
	/// Create a size from its extents.
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

/// Axis-aligned rectangle stored as its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Horizontal extent.
	pub width: f64,
	/// Vertical extent.
	pub height: f64,
}

impl Rect {
	/// Create a rectangle from its top-left corner and size.
	pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			x,
			y,
			width,
			height,
		}
	}

	/// Rectangle with `origin` as top-left corner.
	pub const fn from_origin(origin: Point, size: Size) -> Self {
		Self::new(origin.x, origin.y, size.width, size.height)
	}

	/// Right edge.
	pub fn right(&self) -> f64 {
		self.x + self.width
	}

	/// Bottom edge.
	pub fn bottom(&self) -> f64 {
		self.y + self.height
	}

	/// Midpoint of the rectangle.
	pub fn center(&self) -> Point {
		Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	/// Inclusive containment test.
	pub fn contains(&self, p: Point) -> bool {
		p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
	}

	/// Smallest rectangle covering both `self` and `other`.
	pub fn union(&self, other: &Rect) -> Rect {
		let (x, y) = (self.x.min(other.x), self.y.min(other.y));
		let (r, b) = (self.right().max(other.right()), self.bottom().max(other.bottom()));
		Rect::new(x, y, r - x, b - y)
	}

	/// Grow by `pad` on every side.
	pub fn expand(&self, pad: f64) -> Rect {
		Rect::new(
			self.x - pad,
			self.y - pad,
			self.width + pad * 2.0,
			self.height + pad * 2.0,
		)
	}
}

/// Convert a screen point to world space.
pub fn to_world(screen: Point, offset: Point, scale: f64) -> Point {
	(screen - offset) / scale
}

/// Convert a world point to screen space.
pub fn to_screen(world: Point, offset: Point, scale: f64) -> Point {
	world * scale + offset
}

/// Keep a zoom factor within `[MIN_SCALE, MAX_SCALE]`.
pub fn clamp_scale(scale: f64) -> f64 {
	scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Pan offset and zoom factor of the canvas. The world origin is drawn at `offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Screen position of the world origin.
	pub offset: Point,
	/// Zoom factor, kept within `[MIN_SCALE, MAX_SCALE]`.
	pub scale: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			offset: Point::default(),
			scale: 1.0,
		}
	}
}

impl Viewport {
	/// Screen point to world point under this viewport.
	pub fn to_world(&self, screen: Point) -> Point {
		to_world(screen, self.offset, self.scale)
	}

	/// World point to screen point under this viewport.
	pub fn to_screen(&self, world: Point) -> Point {
		to_screen(world, self.offset, self.scale)
	}

	/// Pan by a screen-space delta.
	pub fn pan_by(&mut self, delta: Point) {
		self.offset = self.offset + delta;
	}

	/// Set the scale (clamped) while keeping the world point under `anchor` fixed on screen.
	pub fn zoom_about(&mut self, scale: f64, anchor: Point) {
		let scale = clamp_scale(scale);
		let ratio = scale / self.scale;
		self.offset = anchor - (anchor - self.offset) * ratio;
		self.scale = scale;
	}

	/// The world-space region visible in a screen of the given size.
	pub fn visible_world(&self, screen: Size) -> Rect {
		let origin = self.to_world(Point::default());
		Rect::new(
			origin.x,
			origin.y,
			screen.width / self.scale,
			screen.height / self.scale,
		)
	}

	/// Move the view so `world` sits at the centre of a screen of the given size.
	pub fn center_on(&mut self, world: Point, screen: Size) {
		let middle = Point::new(screen.width / 2.0, screen.height / 2.0);
		self.offset = middle - world * self.scale;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	fn close(a: Point, b: Point) -> bool {
		(a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
	}

	#[test]
	fn world_screen_round_trip() {
		let points = [
			Point::new(0.0, 0.0),
			Point::new(123.5, -42.25),
			Point::new(-900.0, 1600.0),
		];
		let offsets = [Point::new(0.0, 0.0), Point::new(-310.0, 77.7)];
		let mut scale = MIN_SCALE;
		while scale <= MAX_SCALE {
			for &p in &points {
				for &o in &offsets {
					let back = to_screen(to_world(p, o, scale), o, scale);
					assert!(close(back, p), "{p:?} {o:?} {scale} -> {back:?}");
				}
			}
			scale += 0.1;
		}
	}

	#[test]
	fn to_world_removes_offset_then_scale() {
		let w = to_world(Point::new(300.0, 200.0), Point::new(100.0, 0.0), 2.0);
		assert_eq!(w, Point::new(100.0, 100.0));
	}

	#[test]
	fn zoom_is_clamped() {
		let mut vp = Viewport::default();
		vp.zoom_about(10.0, Point::default());
		assert_eq!(vp.scale, MAX_SCALE);
		vp.zoom_about(0.01, Point::default());
		assert_eq!(vp.scale, MIN_SCALE);
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let mut vp = Viewport {
			offset: Point::new(40.0, -20.0),
			scale: 1.0,
		};
		let anchor = Point::new(400.0, 300.0);
		let before = vp.to_world(anchor);
		vp.zoom_about(1.5, anchor);
		assert!(close(vp.to_world(anchor), before));
	}

	#[test]
	fn visible_world_inverts_the_transform() {
		let vp = Viewport {
			offset: Point::new(-200.0, 100.0),
			scale: 2.0,
		};
		let r = vp.visible_world(Size::new(800.0, 600.0));
		assert_eq!(r, Rect::new(100.0, -50.0, 400.0, 300.0));
	}

	#[test]
	fn center_on_puts_the_point_mid_screen() {
		let mut vp = Viewport {
			offset: Point::new(15.0, -40.0),
			scale: 0.5,
		};
		let screen = Size::new(800.0, 600.0);
		vp.center_on(Point::new(-340.0, -80.0), screen);
		assert_eq!(vp.scale, 0.5);
		assert!(close(vp.to_world(Point::new(400.0, 300.0)), Point::new(-340.0, -80.0)));
	}

	#[test]
	fn rect_union_and_expand() {
		let a = Rect::new(0.0, 0.0, 10.0, 10.0);
		let b = Rect::new(20.0, -5.0, 5.0, 5.0);
		assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 25.0, 15.0));
		assert_eq!(a.expand(2.0), Rect::new(-2.0, -2.0, 14.0, 14.0));
	}
}
