use std::io::Write;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{
    NodeId, Tree,
    error::{Error, Result},
    geom::Rect,
};

/// Traverses a tree of nodes and returns a string showing the bounds, sizes
/// and layout manager of each node for visual display. This is a debug
/// function.
pub fn dump(tree: &Tree, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_node(&mut buffer, tree, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Like [`dump`], without color escapes.
pub fn dump_plain(tree: &Tree, root: NodeId) -> Result<String> {
    let mut buffer = Buffer::no_color();
    dump_node(&mut buffer, tree, root, 0)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Format a rectangle compactly.
fn fmt_rect(r: Rect) -> String {
    format!("x: {}, y: {}, w: {}, h: {}", r.tl.x, r.tl.y, r.w, r.h)
}

/// Helper to write an indented, colored label followed by a value.
fn write_field(buffer: &mut Buffer, indent: &str, label: &str, value: &str) -> Result<()> {
    write!(buffer, "{indent}  ")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(buffer, "{label}")?;
    buffer.reset()?;
    writeln!(buffer, " {value}")?;
    Ok(())
}

/// Walk a node subtree and emit formatted debug output.
fn dump_node(buffer: &mut Buffer, tree: &Tree, node_id: NodeId, level: usize) -> Result<()> {
    let node = tree
        .node(node_id)
        .ok_or_else(|| Error::Internal("missing node".into()))?;
    let indent = "    ".repeat(level);

    write!(buffer, "{indent}")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(buffer, "{node_id:?}")?;
    buffer.reset()?;

    if let Some(layout) = &node.layout {
        let name = layout
            .try_borrow()
            .map_or("<busy>", |l| l.name());
        write!(buffer, " {name}")?;
    }
    if node.is_hidden() {
        write!(buffer, " ")?;
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(buffer, "hidden")?;
        buffer.reset()?;
    }
    if node.layout_needed() {
        write!(buffer, " ")?;
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(buffer, "needs layout")?;
        buffer.reset()?;
    }
    writeln!(buffer)?;

    write_field(buffer, &indent, "bounds:", &fmt_rect(node.bounds()))?;
    if let Ok(pref) = tree.pref_size(node_id) {
        write_field(buffer, &indent, "pref:", &format!("{} x {}", pref.w, pref.h))?;
    }

    for child in node.children() {
        dump_node(buffer, tree, *child, level + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geom::Size,
        layout::{Axis, BoxLayout, Constraint, shared},
        surface::Fixed,
    };

    #[test]
    fn dump_lists_nodes() -> Result<()> {
        let mut tree = Tree::new();
        let root = tree.create(Fixed::flexible((0.0, 0.0)))?;
        tree.set_layout(root, Some(shared(BoxLayout::new(root, Axis::X))))?;
        let child = tree.create(Fixed::exact((10.0, 5.0)))?;
        tree.add_view(root, child, Constraint::None)?;
        tree.set_visible(child, false)?;
        tree.resize(root, Size::new(20.0, 10.0))?;

        let out = dump_plain(&tree, root)?;
        assert!(out.contains("BoxLayout"));
        assert!(out.contains("hidden"));
        assert!(out.contains("x: 0, y: 0, w: 20, h: 10"));
        assert_eq!(out.lines().filter(|l| l.contains("bounds:")).count(), 2);

        let colored = dump(&tree, root)?;
        assert!(colored.contains('\u{1b}'));
        Ok(())
    }
}
