use geo::{Area, Centroid};
use geo_types::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use geochart_common::PixelBounds;
use lyon_path::geom::point;
use lyon_path::{Path, Winding};

use crate::object::GeoObject;
use crate::projection::GeoProjection;

/// Radius of the circle drawn for point geometries
pub const POINT_RADIUS: f64 = 4.5;

/// Geometry after projection to pixel space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedShape {
    /// Polygons as lists of rings, exterior first
    pub polygons: Vec<Vec<Vec<[f64; 2]>>>,
    pub lines: Vec<Vec<[f64; 2]>>,
    pub points: Vec<[f64; 2]>,
}

impl ProjectedShape {
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty() && self.lines.is_empty() && self.points.is_empty()
    }

    fn all_points(&self) -> impl Iterator<Item = &[f64; 2]> {
        self.polygons
            .iter()
            .flatten()
            .flatten()
            .chain(self.lines.iter().flatten())
            .chain(self.points.iter())
    }

    /// Planar geometry in pixel coordinates
    pub fn to_geometry(&self) -> GeometryCollection<f64> {
        let to_line = |coords: &Vec<[f64; 2]>| {
            LineString::from(coords.iter().map(|p| Coord { x: p[0], y: p[1] }).collect::<Vec<_>>())
        };
        let polygons = MultiPolygon::new(
            self.polygons
                .iter()
                .filter(|rings| !rings.is_empty())
                .map(|rings| {
                    Polygon::new(to_line(&rings[0]), rings[1..].iter().map(to_line).collect())
                })
                .collect(),
        );
        let lines = MultiLineString::new(self.lines.iter().map(to_line).collect());
        let points = MultiPoint::new(self.points.iter().map(|p| Point::new(p[0], p[1])).collect());
        GeometryCollection(vec![
            Geometry::MultiPolygon(polygons),
            Geometry::MultiLineString(lines),
            Geometry::MultiPoint(points),
        ])
    }
}

/// Path generator bound to a projection
#[derive(Debug, Clone, Copy)]
pub struct GeoPath<'a> {
    projection: &'a dyn GeoProjection,
}

impl<'a> GeoPath<'a> {
    pub fn new(projection: &'a dyn GeoProjection) -> Self {
        Self { projection }
    }

    pub fn projection(&self) -> &'a dyn GeoProjection {
        self.projection
    }

    pub fn project_object(&self, object: &GeoObject) -> ProjectedShape {
        let mut shape = ProjectedShape::default();
        if object.is_sphere() {
            shape.polygons = self
                .projection
                .sphere()
                .into_iter()
                .map(|ring| vec![ring])
                .collect();
            return shape;
        }
        for geometry in object.geometries() {
            self.project_geometry(geometry, &mut shape);
        }
        shape
    }

    fn project_coords(&self, line: &LineString<f64>) -> Vec<[f64; 2]> {
        let coords: Vec<[f64; 2]> = line.coords().map(|c| [c.x, c.y]).collect();
        self.projection.project_line(&coords)
    }

    fn project_polygon(&self, polygon: &Polygon<f64>, shape: &mut ProjectedShape) {
        let exterior = self.project_coords(polygon.exterior());
        if exterior.is_empty() {
            return;
        }
        let mut rings = vec![exterior];
        rings.extend(
            polygon
                .interiors()
                .iter()
                .map(|ring| self.project_coords(ring))
                .filter(|ring| !ring.is_empty()),
        );
        shape.polygons.push(rings);
    }

    fn project_geometry(&self, geometry: &Geometry<f64>, shape: &mut ProjectedShape) {
        match geometry {
            Geometry::Point(p) => shape.points.extend(self.projection.project([p.x(), p.y()])),
            Geometry::MultiPoint(points) => shape.points.extend(
                points
                    .iter()
                    .filter_map(|p| self.projection.project([p.x(), p.y()])),
            ),
            Geometry::Line(line) => {
                let projected = self.projection.project_line(&[
                    [line.start.x, line.start.y],
                    [line.end.x, line.end.y],
                ]);
                if !projected.is_empty() {
                    shape.lines.push(projected);
                }
            }
            Geometry::LineString(line) => {
                let projected = self.project_coords(line);
                if !projected.is_empty() {
                    shape.lines.push(projected);
                }
            }
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    let projected = self.project_coords(line);
                    if !projected.is_empty() {
                        shape.lines.push(projected);
                    }
                }
            }
            Geometry::Polygon(polygon) => self.project_polygon(polygon, shape),
            Geometry::MultiPolygon(polygons) => {
                for polygon in polygons {
                    self.project_polygon(polygon, shape);
                }
            }
            Geometry::Rect(rect) => self.project_polygon(&rect.to_polygon(), shape),
            Geometry::Triangle(triangle) => self.project_polygon(&triangle.to_polygon(), shape),
            Geometry::GeometryCollection(collection) => {
                for geometry in collection {
                    self.project_geometry(geometry, shape);
                }
            }
        }
    }

    /// Pixel bounding box. Objects without visible points yield non-finite bounds.
    pub fn bounds(&self, object: &GeoObject) -> PixelBounds {
        let shape = self.project_object(object);
        shape.all_points().fold(PixelBounds::empty(), |b, p| {
            PixelBounds::from_corners(b.x.min(p[0]), b.y.min(p[1]), b.x2.max(p[0]), b.y2.max(p[1]))
        })
    }

    /// Planar centroid in pixel space, weighted by area, then length, then count
    pub fn centroid(&self, object: &GeoObject) -> Option<[f64; 2]> {
        let shape = self.project_object(object);
        if shape.is_empty() {
            return None;
        }
        shape.to_geometry().centroid().map(|p| [p.x(), p.y()])
    }

    /// Projected area in square pixels
    pub fn area(&self, object: &GeoObject) -> f64 {
        let shape = self.project_object(object);
        shape.to_geometry().unsigned_area()
    }

    /// Drawable path of the projected object
    pub fn path(&self, object: &GeoObject) -> Path {
        Self::shape_path(&self.project_object(object))
    }

    pub fn shape_path(shape: &ProjectedShape) -> Path {
        let mut builder = Path::builder();
        let mut add_line = |coords: &[[f64; 2]], close: bool| {
            if coords.len() < 2 {
                return;
            }
            builder.begin(point(coords[0][0] as f32, coords[0][1] as f32));
            for p in &coords[1..] {
                builder.line_to(point(p[0] as f32, p[1] as f32));
            }
            builder.end(close);
        };
        for ring in shape.polygons.iter().flatten() {
            add_line(ring, true);
        }
        for line in &shape.lines {
            add_line(line, false);
        }
        for p in &shape.points {
            builder.add_circle(
                point(p[0] as f32, p[1] as f32),
                POINT_RADIUS as f32,
                Winding::Positive,
            );
        }
        builder.build()
    }

    pub fn invert(&self, point: [f64; 2]) -> Option<[f64; 2]> {
        self.projection.invert(point)
    }
}
