//! PNG rendering of solved problems.
//!
//! Mazes render one scaled square per cell; graphs render nodes on a circle
//! with straight edges. Both highlight a solution path when given one.

use std::path::Path as FsPath;

use image::Rgb;
use image::RgbImage;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::problem::Problem;
use crate::problems::maze_2d::Maze2DAction;
use crate::problems::maze_2d::Maze2DCell;
use crate::problems::maze_2d::Maze2DCost;
use crate::problems::maze_2d::Maze2DProblem;
use crate::problems::maze_2d::Maze2DState;
use crate::problems::weighted_graph::GraphCost;
use crate::problems::weighted_graph::GraphHop;
use crate::problems::weighted_graph::NodeId;
use crate::problems::weighted_graph::WeightedGraphProblem;
use crate::space::Path;
use crate::space::Space;

const WALL: Rgb<u8> = Rgb([u8::MIN, u8::MIN, u8::MIN]);
const OPEN: Rgb<u8> = Rgb([u8::MAX, u8::MAX, u8::MAX]);
const PATH: Rgb<u8> = Rgb([0, 170, 0]);
const START: Rgb<u8> = Rgb([0, 0, u8::MAX]);
const GOAL: Rgb<u8> = Rgb([u8::MAX, 0, 0]);
const NODE: Rgb<u8> = Rgb([120, 120, 120]);
const EDGE: Rgb<u8> = Rgb([200, 200, 200]);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Image error when saving '{p}': {e}")]
    ImageError {
        p: std::path::PathBuf,
        e: image::ImageError,
    },
}

pub type MazePath = Path<Maze2DState, Maze2DAction, Maze2DCost>;
pub type GraphPath = Path<NodeId, GraphHop, GraphCost>;

/// Draws the maze at `scale` pixels per cell, path cells painted over open
/// ones and the endpoints painted last.
#[must_use]
pub fn maze_image(problem: &Maze2DProblem, path: Option<&MazePath>, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let space = problem.space();
    let (max_x, max_y) = space.dimensions();

    let on_path: FxHashSet<Maze2DState> = path
        .map(|p| p.states(space).into_iter().collect())
        .unwrap_or_default();

    let mut img = RgbImage::new(max_x as u32 * scale, max_y as u32 * scale);
    for y in 0..max_y {
        for x in 0..max_x {
            let s = Maze2DState::new_from_small_usize(x, y);
            let color = if s == problem.start() {
                START
            } else if s == problem.goal() {
                GOAL
            } else if on_path.contains(&s) {
                PATH
            } else {
                match space.at(&s) {
                    Maze2DCell::Wall => WALL,
                    Maze2DCell::Empty => OPEN,
                }
            };
            fill_square(&mut img, x as u32 * scale, y as u32 * scale, scale, color);
        }
    }

    img
}

pub fn render_maze(
    problem: &Maze2DProblem,
    path: Option<&MazePath>,
    scale: u32,
    out: &FsPath,
) -> Result<(), RenderError> {
    let img = maze_image(problem, path, scale);
    img.save(out).map_err(|e| RenderError::ImageError {
        p: out.to_path_buf(),
        e,
    })?;

    log::info!("Wrote maze rendering to '{}'", out.display());
    Ok(())
}

/// Draws the graph with its nodes evenly spread on a circle.
///
/// Edges on the path are painted over the plain ones, endpoints over plain
/// nodes.
#[must_use]
pub fn graph_image(
    problem: &WeightedGraphProblem,
    path: Option<&GraphPath>,
    size: u32,
) -> RgbImage {
    let size = size.max(64);
    let space = problem.space();
    let n = space.size().unwrap_or(0);

    let mut img = RgbImage::from_pixel(size, size, OPEN);
    if n == 0 {
        return img;
    }

    let center = (size / 2) as i64;
    let radius = (size as i64) * 2 / 5;
    let node_radius = (size / 32).max(3);
    let position = |id: &NodeId| -> (i64, i64) {
        let angle = std::f64::consts::TAU * id.index() as f64 / n as f64;
        (
            center + (radius as f64 * angle.cos()) as i64,
            center + (radius as f64 * angle.sin()) as i64,
        )
    };

    for (from, to, _cost) in space.edges() {
        draw_segment(&mut img, position(&from), position(&to), EDGE);
    }
    if let Some(p) = path {
        let states = p.states(space);
        for pair in states.windows(2) {
            draw_segment(&mut img, position(&pair[0]), position(&pair[1]), PATH);
        }
    }

    let on_path: FxHashSet<NodeId> = path
        .map(|p| p.states(space).into_iter().collect())
        .unwrap_or_default();
    for id in space.nodes() {
        let color = if id == problem.start() {
            START
        } else if id == problem.goal() {
            GOAL
        } else if on_path.contains(&id) {
            PATH
        } else {
            NODE
        };
        draw_disc(&mut img, position(&id), node_radius as i64, color);
    }

    img
}

pub fn render_graph(
    problem: &WeightedGraphProblem,
    path: Option<&GraphPath>,
    size: u32,
    out: &FsPath,
) -> Result<(), RenderError> {
    let img = graph_image(problem, path, size);
    img.save(out).map_err(|e| RenderError::ImageError {
        p: out.to_path_buf(),
        e,
    })?;

    log::info!("Wrote graph rendering to '{}'", out.display());
    Ok(())
}

fn fill_square(img: &mut RgbImage, x0: u32, y0: u32, side: u32, color: Rgb<u8>) {
    for y in y0..(y0 + side).min(img.height()) {
        for x in x0..(x0 + side).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

fn draw_disc(img: &mut RgbImage, (cx, cy): (i64, i64), r: i64, color: Rgb<u8>) {
    for y in (cy - r)..=(cy + r) {
        for x in (cx - r)..=(cx + r) {
            if (x - cx).pow(2) + (y - cy).pow(2) > r.pow(2) {
                continue;
            }
            put_pixel_checked(img, x, y, color);
        }
    }
}

fn draw_segment(img: &mut RgbImage, (x0, y0): (i64, i64), (x1, y1): (i64, i64), color: Rgb<u8>) {
    let steps = (x1 - x0).abs().max((y1 - y0).abs());
    for step in 0..=steps {
        let x = x0 + (x1 - x0) * step / steps.max(1);
        let y = y0 + (y1 - y0) * step / steps.max(1);
        put_pixel_checked(img, x, y, color);
    }
}

#[inline(always)]
fn put_pixel_checked(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}
