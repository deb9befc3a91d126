use std::f64::consts::PI;

use log::warn;
use lyon_path::path::Builder;

use super::{CommandKind, PathData};
use crate::Point;

/// An absolute drawing instruction produced by [`flatten`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
    Close,
}

/// Pen state carried from one command to the next.
struct Pen {
    current: Point,
    ctrl: Point,
    start: Point,
    prev: Option<CommandKind>,
    segments: Vec<Segment>,
}

impl Pen {
    fn new() -> Self {
        Pen {
            current: Point::origin(),
            ctrl: Point::origin(),
            start: Point::origin(),
            prev: None,
            segments: vec![],
        }
    }

    fn offset(&self, x: f32, y: f32, relative: bool) -> Point {
        if relative {
            Point::new(self.current.x + x, self.current.y + y)
        } else {
            Point::new(x, y)
        }
    }

    fn reflected_ctrl(&self, smooth_after: fn(CommandKind) -> bool) -> Point {
        match self.prev {
            Some(prev) if smooth_after(prev) => Point::new(
                2.0 * self.current.x - self.ctrl.x,
                2.0 * self.current.y - self.ctrl.y,
            ),
            _ => self.current,
        }
    }

    fn cubic(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        self.segments.push(Segment::CubicTo { ctrl1, ctrl2, to });
        self.ctrl = ctrl2;
        self.current = to;
    }

    fn quad(&mut self, ctrl: Point, to: Point) {
        let from = self.current;
        let ctrl1 = from + (ctrl - from) * (2.0 / 3.0);
        let ctrl2 = to + (ctrl - to) * (2.0 / 3.0);
        self.segments.push(Segment::CubicTo { ctrl1, ctrl2, to });
        self.ctrl = ctrl;
        self.current = to;
    }

    fn line(&mut self, to: Point) {
        self.segments.push(Segment::LineTo(to));
        self.current = to;
    }
}

/// Converts path data into absolute move/line/cubic/close segments.
/// Quadratic curves are raised to cubics and elliptical arcs are split
/// into cubics of at most 45 degrees each.
pub fn flatten(path: &PathData) -> Vec<Segment> {
    use CommandKind::*;

    let mut pen = Pen::new();
    for command in path.commands() {
        let kind = command.kind();
        let p = command.params();
        let relative = kind.is_relative();
        match kind {
            MoveAbs | MoveRel => {
                let to = pen.offset(p[0], p[1], relative);
                pen.segments.push(Segment::MoveTo(to));
                pen.current = to;
                pen.start = to;
            }
            LineAbs | LineRel => {
                let to = pen.offset(p[0], p[1], relative);
                pen.line(to);
            }
            HLineAbs | HLineRel => {
                let x = if relative { pen.current.x + p[0] } else { p[0] };
                pen.line(Point::new(x, pen.current.y));
            }
            VLineAbs | VLineRel => {
                let y = if relative { pen.current.y + p[0] } else { p[0] };
                pen.line(Point::new(pen.current.x, y));
            }
            CubicAbs | CubicRel => {
                let ctrl1 = pen.offset(p[0], p[1], relative);
                let ctrl2 = pen.offset(p[2], p[3], relative);
                let to = pen.offset(p[4], p[5], relative);
                pen.cubic(ctrl1, ctrl2, to);
            }
            SmoothCubicAbs | SmoothCubicRel => {
                let ctrl1 = pen.reflected_ctrl(CommandKind::is_cubic);
                let ctrl2 = pen.offset(p[0], p[1], relative);
                let to = pen.offset(p[2], p[3], relative);
                pen.cubic(ctrl1, ctrl2, to);
            }
            QuadAbs | QuadRel => {
                let ctrl = pen.offset(p[0], p[1], relative);
                let to = pen.offset(p[2], p[3], relative);
                pen.quad(ctrl, to);
            }
            SmoothQuadAbs | SmoothQuadRel => {
                let ctrl = pen.reflected_ctrl(CommandKind::is_quad);
                let to = pen.offset(p[0], p[1], relative);
                pen.quad(ctrl, to);
            }
            ArcAbs | ArcRel => {
                let from = pen.current;
                let to = pen.offset(p[5], p[6], relative);
                arc(
                    &mut pen.segments,
                    from,
                    to,
                    p[0].abs() as f64,
                    p[1].abs() as f64,
                    p[2] as f64,
                    p[3] != 0.0,
                    p[4] != 0.0,
                );
                pen.current = to;
                pen.ctrl = to;
            }
            Close => {
                pen.segments.push(Segment::Close);
                pen.current = pen.start;
                pen.ctrl = pen.start;
            }
        }
        pen.prev = Some(kind);
    }
    pen.segments
}

#[allow(clippy::too_many_arguments)]
fn arc(
    segments: &mut Vec<Segment>,
    from: Point,
    to: Point,
    rx: f64,
    ry: f64,
    rotation: f64,
    large_arc: bool,
    sweep: bool,
) {
    if rx == 0.0 || ry == 0.0 {
        if from != to {
            segments.push(Segment::LineTo(to));
        }
        return;
    }
    draw_arc(segments, from, to, rx, ry, rotation, large_arc, sweep);
}

#[allow(clippy::too_many_arguments)]
fn draw_arc(
    segments: &mut Vec<Segment>,
    from: Point,
    to: Point,
    a: f64,
    b: f64,
    rotation: f64,
    large_arc: bool,
    sweep: bool,
) {
    let theta = rotation.to_radians();
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (x0, y0) = (from.x as f64, from.y as f64);
    let (x1, y1) = (to.x as f64, to.y as f64);

    // Endpoints in unit-circle space: inverse rotation, then inverse scale.
    let x0p = (x0 * cos_theta + y0 * sin_theta) / a;
    let y0p = (-x0 * sin_theta + y0 * cos_theta) / b;
    let x1p = (x1 * cos_theta + y1 * sin_theta) / a;
    let y1p = (-x1 * sin_theta + y1 * cos_theta) / b;

    let dx = x0p - x1p;
    let dy = y0p - y1p;
    let xm = (x0p + x1p) / 2.0;
    let ym = (y0p + y1p) / 2.0;
    let dsq = dx * dx + dy * dy;
    if dsq == 0.0 {
        warn!("arc endpoints are coincident, skipping");
        return;
    }
    let disc = 1.0 / dsq - 1.0 / 4.0;
    if disc < 0.0 {
        warn!("arc endpoints are too far apart ({}), scaling radii", dsq);
        let adjust = dsq.sqrt() / 1.99999;
        draw_arc(
            segments,
            from,
            to,
            a * adjust,
            b * adjust,
            rotation,
            large_arc,
            sweep,
        );
        return;
    }

    let s = disc.sqrt();
    let sdx = s * dx;
    let sdy = s * dy;
    let (cx, cy) = if large_arc == sweep {
        (xm - sdy, ym + sdx)
    } else {
        (xm + sdy, ym - sdx)
    };

    let eta0 = (y0p - cy).atan2(x0p - cx);
    let eta1 = (y1p - cy).atan2(x1p - cx);
    let mut sweep_angle = eta1 - eta0;
    if sweep != (sweep_angle >= 0.0) {
        if sweep_angle > 0.0 {
            sweep_angle -= 2.0 * PI;
        } else {
            sweep_angle += 2.0 * PI;
        }
    }

    let cx = cx * a;
    let cy = cy * b;
    let center = (cx * cos_theta - cy * sin_theta, cx * sin_theta + cy * cos_theta);

    arc_to_bezier(segments, center, a, b, (x0, y0), to, theta, eta0, sweep_angle);
}

/// Appends cubic segments approximating the arc of the ellipse centred at
/// `center` from angle `start` over `sweep` radians.
#[allow(clippy::too_many_arguments)]
fn arc_to_bezier(
    segments: &mut Vec<Segment>,
    center: (f64, f64),
    a: f64,
    b: f64,
    start_point: (f64, f64),
    end_point: Point,
    theta: f64,
    start: f64,
    sweep: f64,
) {
    let num_segments = (sweep * 4.0 / PI).abs().ceil() as usize;
    if num_segments == 0 {
        return;
    }
    let (cx, cy) = center;
    let (sin_theta, cos_theta) = theta.sin_cos();

    let mut eta1 = start;
    let (mut e1x, mut e1y) = start_point;
    let (sin_eta1, cos_eta1) = eta1.sin_cos();
    let mut ep1x = -a * cos_theta * sin_eta1 - b * sin_theta * cos_eta1;
    let mut ep1y = -a * sin_theta * sin_eta1 + b * cos_theta * cos_eta1;

    let angle_per_segment = sweep / num_segments as f64;
    for i in 0..num_segments {
        let eta2 = eta1 + angle_per_segment;
        let (sin_eta2, cos_eta2) = eta2.sin_cos();
        let e2x = cx + a * cos_theta * cos_eta2 - b * sin_theta * sin_eta2;
        let e2y = cy + a * sin_theta * cos_eta2 + b * cos_theta * sin_eta2;
        let ep2x = -a * cos_theta * sin_eta2 - b * sin_theta * cos_eta2;
        let ep2y = -a * sin_theta * sin_eta2 + b * cos_theta * cos_eta2;
        let tan_diff2 = ((eta2 - eta1) / 2.0).tan();
        let alpha = (eta2 - eta1).sin() * ((4.0 + 3.0 * tan_diff2 * tan_diff2).sqrt() - 1.0) / 3.0;

        let ctrl1 = Point::new((e1x + alpha * ep1x) as f32, (e1y + alpha * ep1y) as f32);
        let ctrl2 = Point::new((e2x - alpha * ep2x) as f32, (e2y - alpha * ep2y) as f32);
        let to = if i + 1 == num_segments {
            end_point
        } else {
            Point::new(e2x as f32, e2y as f32)
        };
        segments.push(Segment::CubicTo { ctrl1, ctrl2, to });

        eta1 = eta2;
        e1x = e2x;
        e1y = e2y;
        ep1x = ep2x;
        ep1y = ep2y;
    }
}

/// Replays segments into a lyon path builder, opening sub-paths as needed.
pub fn build_path(segments: &[Segment], builder: &mut Builder) {
    let mut open = false;
    let mut current = Point::origin();
    let mut start = Point::origin();
    for segment in segments {
        match *segment {
            Segment::MoveTo(p) => {
                if open {
                    builder.end(false);
                }
                builder.begin(p);
                open = true;
                current = p;
                start = p;
            }
            Segment::LineTo(p) => {
                if !open {
                    builder.begin(current);
                    open = true;
                }
                builder.line_to(p);
                current = p;
            }
            Segment::CubicTo { ctrl1, ctrl2, to } => {
                if !open {
                    builder.begin(current);
                    open = true;
                }
                builder.cubic_bezier_to(ctrl1, ctrl2, to);
                current = to;
            }
            Segment::Close => {
                if open {
                    builder.end(true);
                    open = false;
                }
                current = start;
            }
        }
    }
    if open {
        builder.end(false);
    }
}

pub fn to_lyon_path(segments: &[Segment]) -> lyon_path::Path {
    let mut builder = lyon_path::Path::builder();
    build_path(segments, &mut builder);
    builder.build()
}
