//! Render surface abstraction and the grid's row cache.
//!
//! The grid never touches a DOM directly. It emits markup batches and node
//! mutations to a [`Surface`]; the browser build backs it with real elements,
//! tests use [`MemorySurface`].

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt::Write as _;

/// Opaque handle to a node owned by the surface.
pub type NodeId = u64;

/// Markup for one cell of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct CellMarkup {
    pub cell: usize,
    pub colspan: usize,
    pub classes: String,
    pub html: String,
}

/// Markup for one row and the cells currently inside the horizontal range.
#[derive(Debug, Clone, PartialEq)]
pub struct RowMarkup {
    pub row: usize,
    pub classes: String,
    pub top: f64,
    pub cells: Vec<CellMarkup>,
}

impl CellMarkup {
    pub fn to_html(&self) -> String {
        format!("<div class=\"{}\">{}</div>", self.classes, self.html)
    }
}

impl RowMarkup {
    /// The whole row as one HTML fragment.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<div class=\"{}\" style=\"top:{}px\">",
            self.classes, self.top
        );
        for cell in &self.cells {
            out.push_str(&cell.to_html());
        }
        out.push_str("</div>");
        out
    }
}

/// Pluggable node store the grid renders into.
///
/// Batches are appended in one call so a DOM backend can parse a single
/// HTML string instead of reflowing per row.
pub trait Surface {
    /// Append rows to the canvas. Returns `(row_node, cell_nodes)` per row,
    /// in input order.
    fn append_rows(&mut self, rows: &[RowMarkup]) -> Vec<(NodeId, Vec<NodeId>)>;

    /// Append cells to an existing row node. Returns one node per cell.
    fn append_cells(&mut self, row_node: NodeId, cells: &[CellMarkup]) -> Vec<NodeId>;

    /// Detach a node (and its children).
    fn remove(&mut self, node: NodeId);

    fn set_inner_html(&mut self, node: NodeId, html: &str);

    fn set_class(&mut self, node: NodeId, class: &str, on: bool);

    fn set_row_top(&mut self, node: NodeId, top: f64);

    fn set_canvas_size(&mut self, width: f64, height: f64);
}

/// Per-row render bookkeeping.
#[derive(Debug, Clone, Default)]
pub(crate) struct RowCacheEntry {
    pub row_node: NodeId,
    /// Column index to rendered cell node.
    pub cell_nodes: BTreeMap<usize, NodeId>,
    /// Column index to the colspan the cell was rendered with.
    pub cell_col_spans: BTreeMap<usize, usize>,
    /// Columns waiting to be appended to the row node.
    pub cell_render_queue: VecDeque<usize>,
}

/// Named cell CSS hash: row to column id to class list.
pub type CellCssHash = HashMap<usize, HashMap<String, String>>;

/// Every named hash, in insertion order.
#[derive(Debug, Clone, Default)]
pub(crate) struct CellCssStyles {
    entries: Vec<(String, CellCssHash)>,
}

impl CellCssStyles {
    pub fn get(&self, key: &str) -> Option<&CellCssHash> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, h)| h)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace; returns the previous hash.
    pub fn set(&mut self, key: &str, hash: CellCssHash) -> Option<CellCssHash> {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| k == key) {
            return Some(std::mem::replace(existing, hash));
        }
        self.entries.push((key.to_string(), hash));
        None
    }

    pub fn remove(&mut self, key: &str) -> Option<CellCssHash> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Classes every hash assigns to one cell, in hash order.
    pub fn classes_for<'a>(
        &'a self,
        row: usize,
        column_id: &'a str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.entries.iter().filter_map(move |(_, hash)| {
            hash.get(&row)
                .and_then(|cols| cols.get(column_id))
                .map(String::as_str)
        })
    }
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    AppendRows(Vec<usize>),
    AppendCells { row_node: NodeId, cells: Vec<usize> },
    Remove(NodeId),
    SetInnerHtml(NodeId),
    SetClass { node: NodeId, class: String, on: bool },
    SetRowTop(NodeId),
    SetCanvasSize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryNode {
    pub parent: Option<NodeId>,
    pub classes: BTreeSet<String>,
    pub html: String,
    pub top: f64,
    /// Row index for row nodes, cell index for cell nodes.
    pub index: usize,
}

/// In-memory surface that records operations.
#[derive(Debug, Default)]
pub struct MemorySurface {
    next_id: NodeId,
    nodes: HashMap<NodeId, MemoryNode>,
    ops: Vec<SurfaceOp>,
    canvas: (f64, f64),
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, node: MemoryNode) -> NodeId {
        self.next_id += 1;
        self.nodes.insert(self.next_id, node);
        self.next_id
    }

    pub fn node(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(&id)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.classes.contains(class))
    }

    /// Row nodes currently attached, sorted by row index.
    pub fn rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self
            .nodes
            .values()
            .filter(|n| n.parent.is_none())
            .map(|n| n.index)
            .collect();
        rows.sort_unstable();
        rows
    }

    /// Cell indices attached to a row node, sorted.
    pub fn cells_of(&self, row_node: NodeId) -> Vec<usize> {
        let mut cells: Vec<usize> = self
            .nodes
            .values()
            .filter(|n| n.parent == Some(row_node))
            .map(|n| n.index)
            .collect();
        cells.sort_unstable();
        cells
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        self.canvas
    }
}

fn class_set(classes: &str) -> BTreeSet<String> {
    classes.split_whitespace().map(str::to_string).collect()
}

impl Surface for MemorySurface {
    fn append_rows(&mut self, rows: &[RowMarkup]) -> Vec<(NodeId, Vec<NodeId>)> {
        self.ops
            .push(SurfaceOp::AppendRows(rows.iter().map(|r| r.row).collect()));
        rows.iter()
            .map(|r| {
                let row_node = self.alloc(MemoryNode {
                    parent: None,
                    classes: class_set(&r.classes),
                    html: String::new(),
                    top: r.top,
                    index: r.row,
                });
                let cells = r
                    .cells
                    .iter()
                    .map(|c| {
                        self.alloc(MemoryNode {
                            parent: Some(row_node),
                            classes: class_set(&c.classes),
                            html: c.html.clone(),
                            top: 0.0,
                            index: c.cell,
                        })
                    })
                    .collect();
                (row_node, cells)
            })
            .collect()
    }

    fn append_cells(&mut self, row_node: NodeId, cells: &[CellMarkup]) -> Vec<NodeId> {
        self.ops.push(SurfaceOp::AppendCells {
            row_node,
            cells: cells.iter().map(|c| c.cell).collect(),
        });
        cells
            .iter()
            .map(|c| {
                self.alloc(MemoryNode {
                    parent: Some(row_node),
                    classes: class_set(&c.classes),
                    html: c.html.clone(),
                    top: 0.0,
                    index: c.cell,
                })
            })
            .collect()
    }

    fn remove(&mut self, node: NodeId) {
        self.ops.push(SurfaceOp::Remove(node));
        self.nodes.remove(&node);
        self.nodes.retain(|_, n| n.parent != Some(node));
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) {
        self.ops.push(SurfaceOp::SetInnerHtml(node));
        if let Some(n) = self.nodes.get_mut(&node) {
            n.html = html.to_string();
        }
    }

    fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        self.ops.push(SurfaceOp::SetClass {
            node,
            class: class.to_string(),
            on,
        });
        if let Some(n) = self.nodes.get_mut(&node) {
            if on {
                n.classes.insert(class.to_string());
            } else {
                n.classes.remove(class);
            }
        }
    }

    fn set_row_top(&mut self, node: NodeId, top: f64) {
        self.ops.push(SurfaceOp::SetRowTop(node));
        if let Some(n) = self.nodes.get_mut(&node) {
            n.top = top;
        }
    }

    fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.ops.push(SurfaceOp::SetCanvasSize);
        self.canvas = (width, height);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn row(index: usize, cells: &[usize]) -> RowMarkup {
        RowMarkup {
            row: index,
            classes: "slick-row even".into(),
            top: 25.0,
            cells: cells
                .iter()
                .map(|&c| CellMarkup {
                    cell: c,
                    colspan: 1,
                    classes: format!("slick-cell l{c} r{c}"),
                    html: format!("v{c}"),
                })
                .collect(),
        }
    }

    #[test]
    fn test_row_html() {
        let html = row(1, &[0]).to_html();
        assert_eq!(
            html,
            "<div class=\"slick-row even\" style=\"top:25px\"><div class=\"slick-cell l0 r0\">v0</div></div>"
        );
    }

    #[test]
    fn test_memory_surface_tracks_nodes() {
        let mut s = MemorySurface::new();
        let nodes = s.append_rows(&[row(0, &[0, 1]), row(1, &[0])]);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].1.len(), 2);
        assert_eq!(s.rows(), vec![0, 1]);
        assert_eq!(s.cells_of(nodes[0].0), vec![0, 1]);

        s.set_class(nodes[0].1[0], "active", true);
        assert!(s.has_class(nodes[0].1[0], "active"));
        assert!(s.has_class(nodes[0].1[0], "l0"));

        s.remove(nodes[0].0);
        assert_eq!(s.rows(), vec![1]);
        assert_eq!(s.node_count(), 2);
    }

    #[test]
    fn test_css_styles_keep_insertion_order() {
        let mut styles = CellCssStyles::default();
        let mut a = CellCssHash::new();
        a.entry(0).or_default().insert("c".into(), "x".into());
        let mut b = CellCssHash::new();
        b.entry(0).or_default().insert("c".into(), "y".into());
        styles.set("b", b);
        styles.set("a", a);
        assert_eq!(styles.classes_for(0, "c").collect::<Vec<_>>(), vec!["y", "x"]);
        assert!(styles.remove("b").is_some());
        assert!(!styles.contains("b"));
        assert_eq!(styles.classes_for(0, "c").collect::<Vec<_>>(), vec!["x"]);
    }
}
