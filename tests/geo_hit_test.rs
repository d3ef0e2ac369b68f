use hexdash::geo::{Projection, ProjectedRegion, polygons_centroid};
use hexdash::{LonLat, Point, Region, point_in_polygon};

fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
    raw.iter().copied().map(Point::from).collect()
}

#[test]
fn convex_polygon_inside_and_outside() {
    let square = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    assert!(point_in_polygon(Point::new(5.0, 5.0), &square));
    assert!(point_in_polygon(Point::new(0.5, 9.5), &square));
    assert!(!point_in_polygon(Point::new(15.0, 5.0), &square));
    assert!(!point_in_polygon(Point::new(-1.0, 5.0), &square));
    assert!(!point_in_polygon(Point::new(5.0, 11.0), &square));
}

#[test]
fn winding_direction_does_not_matter() {
    let cw = pts(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
    let ccw: Vec<Point> = cw.iter().rev().copied().collect();
    for p in [Point::new(3.0, 4.0), Point::new(12.0, 4.0), Point::new(9.9, 0.1)] {
        assert_eq!(point_in_polygon(p, &cw), point_in_polygon(p, &ccw));
    }
}

#[test]
fn concave_notch_is_outside() {
    // A "U" shape open at the top between x=4 and x=6.
    let u = pts(&[
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 10.0),
        (6.0, 10.0),
        (6.0, 3.0),
        (4.0, 3.0),
        (4.0, 10.0),
        (0.0, 10.0),
    ]);
    assert!(!point_in_polygon(Point::new(5.0, 8.0), &u));
    assert!(point_in_polygon(Point::new(5.0, 1.0), &u));
    assert!(point_in_polygon(Point::new(2.0, 8.0), &u));
}

#[test]
fn self_intersecting_path_uses_even_odd() {
    // A pentagram: the central pentagon is crossed twice and counts as outside.
    let star: Vec<Point> = (0..5)
        .map(|k| {
            let a = std::f64::consts::PI / 2.0 + k as f64 * 4.0 * std::f64::consts::PI / 5.0;
            Point::new(10.0 * a.cos(), 10.0 * a.sin())
        })
        .collect();
    assert!(!point_in_polygon(Point::new(0.0, 0.0), &star));
    assert!(point_in_polygon(Point::new(0.0, 8.0), &star));

    // Bow tie: both lobes are inside.
    let bow = pts(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]);
    assert!(point_in_polygon(Point::new(1.0, 5.0), &bow));
    assert!(point_in_polygon(Point::new(9.0, 5.0), &bow));
    assert!(!point_in_polygon(Point::new(5.0, 1.0), &bow));
}

#[test]
fn degenerate_paths_contain_nothing() {
    assert!(!point_in_polygon(Point::new(0.0, 0.0), &[]));
    assert!(!point_in_polygon(Point::new(0.0, 0.0), &pts(&[(0.0, 0.0)])));
    assert!(!point_in_polygon(
        Point::new(0.5, 0.0),
        &pts(&[(0.0, 0.0), (1.0, 0.0)])
    ));
}

#[test]
fn projection_round_trips() {
    let p = Projection::default();
    let origin = p.project(LonLat { lon: 0.0, lat: 0.0 });
    assert!((origin.x - 950.0).abs() < 1e-9);
    assert!((origin.y - 500.0).abs() < 1e-9);

    let ll = LonLat {
        lon: -98.5,
        lat: 39.8,
    };
    let back = p.invert(p.project(ll));
    assert!((back.lon - ll.lon).abs() < 1e-9);
    assert!((back.lat - ll.lat).abs() < 1e-9);

    // North is up.
    let north = p.project(LonLat { lon: 0.0, lat: 10.0 });
    assert!(north.y < origin.y);
}

#[test]
fn centroid_of_symmetric_shapes() {
    let square = pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    assert_eq!(polygons_centroid(&[vec![square.clone()]]), Point::new(2.0, 2.0));

    // A hole on the right pulls the centroid left.
    let hole = pts(&[(2.5, 1.5), (3.5, 1.5), (3.5, 2.5), (2.5, 2.5)]);
    let c = polygons_centroid(&[vec![square, hole]]);
    assert!(c.x < 2.0);
    assert!((c.y - 2.0).abs() < 1e-9);

    // Zero area falls back to the vertex mean.
    let line = pts(&[(0.0, 0.0), (2.0, 0.0), (4.0, 0.0)]);
    assert_eq!(polygons_centroid(&[vec![line]]), Point::new(2.0, 0.0));
}

#[test]
fn projected_centroid_lies_inside_its_outline() {
    let ring = vec![
        LonLat { lon: -100.0, lat: 40.0 },
        LonLat { lon: -98.0, lat: 40.0 },
        LonLat { lon: -97.0, lat: 41.5 },
        LonLat { lon: -98.0, lat: 43.0 },
        LonLat { lon: -100.0, lat: 43.0 },
        LonLat { lon: -101.0, lat: 41.5 },
    ];
    let r = ProjectedRegion::project(&Region::with_ring("NE", "Nebraska", ring), &Projection::default());
    assert_eq!(r.outlines.len(), 1);
    assert_eq!(r.outlines[0].len(), 6);
    assert!(point_in_polygon(r.centroid, &r.outlines[0]));
}
