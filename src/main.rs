//! Voxdraw demo driver - runs several edits round-robin against one grid.
//!
//! Usage: cargo run -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   DrawConfig JSON file (default: built-in defaults)
//!   --size <N>        Grid edge length in voxels (default: 64)
//!   --seed <SEED>     Base seed for every operation (default: config or entropy)
//!   --quota <N>       Mutations per batch (default: config batch_quota)
//!   --shape <KIND>    Shape of bob's second attempt (default: ellipsoid)

use std::time::Instant;

use voxdraw::core::{logging, DrawConfig, IVec3, Result};
use voxdraw::session::{Actor, AllowAll, Authorizer, Permission, Session};
use voxdraw::voxel::block::Block;
use voxdraw::voxel::brush::BrushKind;
use voxdraw::voxel::edit::{DrawContext, DrawKind, DrawOperation, DrawSummary};
use voxdraw::voxel::grid::VoxelGrid;

/// One queued edit and who issued it
struct Job {
    actor: Session,
    authorizer: Box<dyn Authorizer>,
    op: DrawOperation,
}

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => DrawConfig::load(path)?,
        None => DrawConfig::default(),
    };
    if let Some(seed) = parse_u64_arg(&args, "--seed") {
        config.seed = Some(seed);
    }
    let size = parse_u64_arg(&args, "--size").unwrap_or(64).clamp(8, 512) as i32;
    let retry_kind = parse_shape_arg(&args);
    let quota = parse_u64_arg(&args, "--quota")
        .map(|q| q as usize)
        .unwrap_or(config.batch_quota)
        .max(1);

    let mut grid = VoxelGrid::new(IVec3::splat(size));
    let top = size - 1;
    let mid = size / 2;

    // Builders may not touch the top quarter of the world
    let below_ceiling = move |_: &dyn Actor, coord: IVec3, _: Block| Permission::from(coord.y < size * 3 / 4);

    let mut jobs = Vec::new();
    let alice = Session::new("alice").with_last_block(Block::Stone);
    let bob = Session::new("bob");
    let guest = Session::new("guest");

    jobs.push(queue(
        &mut grid,
        alice,
        Box::new(AllowAll),
        DrawKind::Cuboid,
        BrushKind::Solid,
        &[],
        &[IVec3::ZERO, IVec3::new(top, 1, top)],
        &config,
    )?);
    jobs.push(queue(
        &mut grid,
        bob,
        Box::new(AllowAll),
        DrawKind::Sphere,
        BrushKind::Marbled,
        &["white", "black/2", "seed=7"],
        &[IVec3::new(mid, mid / 2 + 2, mid), IVec3::new(mid, mid / 2 + 2, mid + mid / 2)],
        &config,
    )?);
    jobs.push(queue(
        &mut grid,
        guest,
        Box::new(below_ceiling),
        DrawKind::Line,
        BrushKind::Rainbow,
        &[],
        &[IVec3::new(0, 2, 0), IVec3::new(top, top, top)],
        &config,
    )?);

    let started = Instant::now();
    let mut ticks = 0;
    while jobs.iter().any(|job| job.op.is_running()) {
        for job in jobs.iter_mut().filter(|job| job.op.is_running()) {
            let mut ctx = DrawContext::new(&mut grid, job.authorizer.as_ref(), &mut job.actor);
            job.op.run_batch(quota, &mut ctx);
        }
        ticks += 1;
    }
    log::info!("All edits done after {} ticks in {:.1?}", ticks, started.elapsed());

    let mut actors = Vec::new();
    for mut job in jobs {
        let mut ctx = DrawContext::new(&mut grid, job.authorizer.as_ref(), &mut job.actor);
        let summary = job.op.finish(&mut ctx);
        println!("{}: {}", job.actor.name(), summary);
        actors.push(job.actor);
    }

    // Bob changes their mind
    let bob = &mut actors[1];
    if let Some(history) = bob.take_undo() {
        let op = DrawOperation::undo(history, &config);
        let summary = run_now(op, &[], &mut grid, bob, quota)?;
        println!("bob: {}", summary);
    }

    // ...and tries again with the same brush, no arguments given
    let no_args: [&str; 0] = [];
    let brush = BrushKind::Marbled.make_instance(&*bob, &no_args, bob.last_brush.as_ref())?;
    let op = DrawOperation::new(retry_kind, brush, &config);
    let marks = [IVec3::new(mid / 2, 2, mid / 2), IVec3::new(mid + mid / 2, mid, mid + mid / 2)];
    let summary = run_now(op, &marks, &mut grid, bob, quota)?;
    println!("bob: {}", summary);

    for actor in &actors {
        println!("{} changed {} blocks", actor.name(), actor.blocks_drawn());
    }
    for block in [Block::Stone, Block::White, Block::Black, Block::Red] {
        println!("{:>8}: {}", block, grid.count(block));
    }
    Ok(())
}

/// Build, prepare and wrap one edit
#[allow(clippy::too_many_arguments)]
fn queue(
    grid: &mut VoxelGrid,
    mut actor: Session,
    authorizer: Box<dyn Authorizer>,
    kind: DrawKind,
    brush: BrushKind,
    brush_args: &[&str],
    marks: &[IVec3],
    config: &DrawConfig,
) -> Result<Job> {
    let brush = brush.make_brush_with(&actor, brush_args, &config.noise)?;
    let mut op = DrawOperation::new(kind, brush.instance(), config);
    {
        let mut ctx = DrawContext::new(grid, authorizer.as_ref(), &mut actor);
        op.prepare(marks, &mut ctx)?;
    }
    actor.last_brush = Some(brush);
    Ok(Job { actor, authorizer, op })
}

/// Prepare and drive one edit to completion
fn run_now(
    mut op: DrawOperation,
    marks: &[IVec3],
    grid: &mut VoxelGrid,
    actor: &mut Session,
    quota: usize,
) -> Result<DrawSummary> {
    let mut ctx = DrawContext::new(grid, &AllowAll, actor);
    op.prepare(marks, &mut ctx)?;
    while op.is_running() {
        op.run_batch(quota, &mut ctx);
    }
    Ok(op.finish(&mut ctx))
}

fn parse_shape_arg(args: &[String]) -> DrawKind {
    let Some(name) = parse_str_arg(args, "--shape") else {
        return DrawKind::Ellipsoid;
    };
    match DrawKind::parse(&name).filter(|kind| kind.mark_count() == 2) {
        Some(kind) => kind,
        None => {
            let known: Vec<&str> = DrawKind::ALL
                .iter()
                .filter(|kind| kind.mark_count() == 2)
                .map(|kind| kind.name())
                .collect();
            log::warn!("Unknown shape '{}', expected one of {}; using Ellipsoid", name, known.join(", "));
            DrawKind::Ellipsoid
        }
    }
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    parse_str_arg(args, flag).and_then(|s| s.parse().ok())
}
