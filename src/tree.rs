//! Page tree flattening.
//!
//! Pages form a tree through parent pointers. Navigation menus and the admin
//! "parent page" picker both want the tree as a flat, depth-annotated list in
//! display order: children sorted by `order_index`, each subtree emitted
//! directly below its parent.
//!
//! The picker also needs to exclude a page (and with it, its subtree) so a
//! page cannot be chosen as its own ancestor when it is being moved.

use serde::{Deserialize, Serialize};

/// A page as returned by the backend's page listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageNode {
    /// Unique page id.
    pub id: i64,

    /// Parent page id, `None` for top-level pages.
    #[serde(default)]
    pub parent_id: Option<i64>,

    /// Page title, shown in menus and pickers.
    pub title: String,

    /// Position among siblings; lower values sort first.
    #[serde(default)]
    pub order_index: i32,
}

/// A page paired with its depth in the tree, for indented rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndentedPage {
    /// The page itself.
    pub page: PageNode,

    /// Nesting depth; top-level pages are depth 0.
    pub depth: usize,
}

/// Flattens a parent-pointer page list into an indented, ordered list.
///
/// Walks the tree depth-first from the top level, sorting siblings by
/// `order_index` at each level. When `exclude` is given, that page and its
/// entire subtree are omitted. Pages whose parent id never resolves (orphans)
/// are omitted as well, matching the backend's listing semantics.
///
/// # Example
///
/// ```
/// use magiccode_client::tree::{flatten, PageNode};
///
/// let pages = vec![
///     PageNode { id: 1, parent_id: None, title: "About".into(), order_index: 0 },
///     PageNode { id: 2, parent_id: Some(1), title: "Team".into(), order_index: 0 },
/// ];
/// let list = flatten(&pages, None);
/// assert_eq!(list[1].depth, 1);
/// ```
#[must_use]
pub fn flatten(pages: &[PageNode], exclude: Option<i64>) -> Vec<IndentedPage> {
    let mut result = Vec::with_capacity(pages.len());
    walk(pages, exclude, None, 0, &mut result);
    result
}

fn walk(
    pages: &[PageNode],
    exclude: Option<i64>,
    parent_id: Option<i64>,
    depth: usize,
    result: &mut Vec<IndentedPage>,
) {
    let mut children: Vec<&PageNode> = pages
        .iter()
        .filter(|p| p.parent_id == parent_id && Some(p.id) != exclude)
        .collect();
    children.sort_by_key(|p| p.order_index);

    for child in children {
        result.push(IndentedPage {
            page: child.clone(),
            depth,
        });
        walk(pages, exclude, Some(child.id), depth + 1, result);
    }
}
