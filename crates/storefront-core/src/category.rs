//! Category entity and parent/child tree construction.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A product category. Categories form a tree through `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique identifier.
    pub id: Uuid,

    /// Category name (unique).
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parent category; `None` for roots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Category {
    /// Creates a category from validated input, generating a fresh id and
    /// timestamps.
    #[must_use]
    pub fn from_new(new: NewCategory) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            parent_id: new.parent_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// The reduced projection embedded in product list reads.
    #[must_use]
    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
}

/// Reduced category projection for embedding in other resources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A category with its children attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryNode>,
}

/// Builds the parent/child tree from flat rows.
///
/// Rows with `parent_id = None` become roots. A row whose parent chain
/// revisits an already-placed node (including a row that names itself as
/// parent) would loop forever; such edges are broken and logged, and the row
/// is left out of the tree. Rows pointing at a parent that is not in `rows`
/// are likewise absent from the tree; both stay visible in the flat list the
/// caller already has.
#[must_use]
pub fn build_tree(rows: &[Category]) -> Vec<CategoryNode> {
    let mut by_parent: HashMap<Option<Uuid>, Vec<&Category>> = HashMap::new();
    for row in rows {
        by_parent.entry(row.parent_id).or_default().push(row);
    }

    let mut placed = HashSet::new();
    let roots = by_parent.get(&None).cloned().unwrap_or_default();
    roots
        .into_iter()
        .filter_map(|root| attach_children(root, &by_parent, &mut placed))
        .collect()
}

fn attach_children(
    row: &Category,
    by_parent: &HashMap<Option<Uuid>, Vec<&Category>>,
    placed: &mut HashSet<Uuid>,
) -> Option<CategoryNode> {
    if !placed.insert(row.id) {
        tracing::warn!(category_id = %row.id, "category cycle detected, breaking edge");
        return None;
    }

    let children = by_parent
        .get(&Some(row.id))
        .map(|rows| {
            rows.iter()
                .filter_map(|child| attach_children(child, by_parent, placed))
                .collect()
        })
        .unwrap_or_default();

    Some(CategoryNode {
        category: row.clone(),
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, parent_id: Option<Uuid>) -> Category {
        Category::from_new(NewCategory {
            name: name.to_string(),
            description: None,
            parent_id,
        })
    }

    #[test]
    fn test_tree_nests_children_under_parents() {
        let root = category("electronics", None);
        let child = category("phones", Some(root.id));
        let grandchild = category("android", Some(child.id));
        let other_root = category("books", None);

        let tree = build_tree(&[root.clone(), child, grandchild, other_root]);

        assert_eq!(tree.len(), 2);
        let electronics = tree.iter().find(|n| n.category.id == root.id).unwrap();
        assert_eq!(electronics.children.len(), 1);
        assert_eq!(electronics.children[0].children.len(), 1);
        assert_eq!(electronics.children[0].children[0].category.name, "android");
    }

    #[test]
    fn test_tree_drops_orphans() {
        let root = category("electronics", None);
        let orphan = category("dangling", Some(Uuid::new_v4()));

        let tree = build_tree(&[root, orphan.clone()]);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_tree_breaks_self_reference() {
        let root = category("electronics", None);
        let mut looped = category("ouroboros", None);
        looped.parent_id = Some(looped.id);

        // The self-referential row must neither appear nor hang the builder.
        let tree = build_tree(&[root.clone(), looped]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].category.id, root.id);
    }

    #[test]
    fn test_tree_two_node_cycle_is_unreachable() {
        let a_id = Uuid::new_v4();
        let b_id = Uuid::new_v4();
        let mut a = category("a", Some(b_id));
        a.id = a_id;
        let mut b = category("b", Some(a_id));
        b.id = b_id;

        let tree = build_tree(&[a, b]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_tree_serializes_flat_category_fields() {
        let root = category("electronics", None);
        let child = category("phones", Some(root.id));
        let tree = build_tree(&[root, child]);

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[0]["name"], "electronics");
        assert_eq!(json[0]["children"][0]["name"], "phones");
    }
}
