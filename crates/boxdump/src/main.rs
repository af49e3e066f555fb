//! Lay out a sample scene with boxwood and print the resulting tree.

use std::io;

use anyhow::{Context, Result};
use boxwood::{
    Axis, BorderLayout, BoxLayout, Constraint, Fixed, FlowAlign, FlowLayout, NodeId, Region, Tree,
    dump::{dump, dump_plain},
    geom::Size,
    shared,
};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::{Level, info};

/// Widths of the children placed in every scene.
const WIDTHS: [f64; 5] = [10.0, 24.0, 16.0, 30.0, 8.0];

/// CLI flags for the dump tool.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Scene to lay out.
    #[clap(value_enum, default_value_t = Scene::Box)]
    scene: Scene,

    /// Container size as WIDTHxHEIGHT.
    #[clap(short, long, value_name = "WxH", default_value = "80x24")]
    size: Size,

    /// Horizontal gap for flow and border scenes.
    #[clap(long, default_value_t = 0.0)]
    hgap: f64,

    /// Vertical gap for flow and border scenes.
    #[clap(long, default_value_t = 0.0)]
    vgap: f64,

    /// Lay rows and line axes out right to left.
    #[clap(long)]
    rtl: bool,

    /// Disable colored output.
    #[clap(long)]
    plain: bool,

    /// Increase log verbosity. Repeat for more.
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Available scenes.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Scene {
    /// A row of children tiled along the line axis.
    Box,
    /// Children wrapped into centered rows.
    Flow,
    /// Children placed in the border regions.
    Border,
}

/// Add one child per entry in `WIDTHS` under `root`.
fn populate(
    tree: &mut Tree,
    root: NodeId,
    constraint: impl Fn(usize) -> Constraint,
) -> Result<()> {
    for (i, w) in WIDTHS.iter().enumerate() {
        let child = tree.create(Fixed::new(
            Size::new(*w / 2.0, 1.0),
            Size::new(*w, 3.0),
            Size::new(*w * 2.0, 6.0),
        ))?;
        tree.add_view(root, child, constraint(i))?;
    }
    Ok(())
}

/// Build the requested scene and return its root.
fn build(tree: &mut Tree, args: &Args) -> Result<NodeId> {
    let root = tree.create(Fixed::flexible((0.0, 0.0)))?;
    match args.scene {
        Scene::Box => {
            let layout = BoxLayout::new(root, Axis::Line).left_to_right(!args.rtl);
            tree.set_layout(root, Some(shared(layout)))?;
            populate(tree, root, |_| Constraint::None)?;
        }
        Scene::Flow => {
            let layout = FlowLayout::new()
                .align(FlowAlign::Leading)
                .hgap(args.hgap)
                .vgap(args.vgap)
                .left_to_right(!args.rtl);
            tree.set_layout(root, Some(shared(layout)))?;
            populate(tree, root, |_| Constraint::None)?;
        }
        Scene::Border => {
            let layout = BorderLayout::new()
                .hgap(args.hgap)
                .vgap(args.vgap)
                .left_to_right(!args.rtl);
            tree.set_layout(root, Some(shared(layout)))?;
            let regions = [
                Region::North,
                Region::South,
                Region::LineStart,
                Region::LineEnd,
                Region::Center,
            ];
            populate(tree, root, |i| regions[i % regions.len()].into())?;
        }
    }
    Ok(root)
}

/// Run the dump tool.
fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mut tree = Tree::new();
    let root = build(&mut tree, &args).context("building scene")?;
    info!(scene = ?args.scene, size = ?args.size, "laying out");
    tree.resize(root, args.size)
        .with_context(|| format!("laying out at {}x{}", args.size.w, args.size.h))?;

    let out = if args.plain {
        dump_plain(&tree, root)?
    } else {
        dump(&tree, root)?
    };
    print!("{out}");
    Ok(())
}
