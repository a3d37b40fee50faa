use proptest::prelude::*;
use proptest::sample::Index;
use tree_model::prelude::*;
use tree_model::search::collate;

/// Shape of one generated node: (parent pick, attach at root, description)
type Shape = (Index, bool, String);

fn build(shapes: &[Shape]) -> Forest {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); shapes.len()];
    let mut roots = Vec::new();
    for (i, (pick, at_root, _)) in shapes.iter().enumerate() {
        if i == 0 || *at_root {
            roots.push(i);
        } else {
            children[pick.index(i)].push(i);
        }
    }

    fn make(i: usize, shapes: &[Shape], children: &[Vec<usize>]) -> TreeNode {
        let mut node = TreeNode::new(format!("Node {i:03}"));
        if !shapes[i].2.is_empty() {
            node.description = Some(shapes[i].2.clone());
        }
        if i % 3 == 0 {
            node.link = Some(format!("http://n{i}.example.com"));
        }
        node.children = children[i]
            .iter()
            .map(|&c| make(c, shapes, children))
            .collect();
        node
    }

    Forest::from_roots(roots.into_iter().map(|i| make(i, shapes, &children)).collect())
}

fn arb_forest() -> impl Strategy<Value = Forest> {
    prop::collection::vec((any::<Index>(), prop::bool::weighted(0.2), "[a-zA-Zéü ]{0,12}"), 0..40)
        .prop_map(|shapes| build(&shapes))
}

fn arb_nonempty_forest() -> impl Strategy<Value = (Forest, Index, Index)> {
    (
        prop::collection::vec((any::<Index>(), prop::bool::weighted(0.2), "[a-z]{0,4}"), 1..40)
            .prop_map(|shapes| build(&shapes)),
        any::<Index>(),
        any::<Index>(),
    )
}

fn all_names(forest: &Forest) -> Vec<String> {
    forest.walk().map(|v| v.node.name.clone()).collect()
}

proptest! {
    #[test]
    fn round_trip_preserves_forest(forest in arb_forest()) {
        let text = encode(&forest).unwrap();
        prop_assert_eq!(decode(&text).unwrap(), forest);
    }

    #[test]
    fn flatten_has_one_sorted_record_per_node(forest in arb_forest()) {
        let records = flatten(&forest);
        prop_assert_eq!(records.len(), forest.len());
        prop_assert_eq!(&records, &flatten(&forest));
        for pair in records.windows(2) {
            prop_assert!(collate(&pair[0].name, &pair[1].name).is_le());
        }
    }

    #[test]
    fn find_by_name_finds_every_node(forest in arb_forest()) {
        for name in all_names(&forest) {
            let found = find_by_name(&forest, &name).map(|n| n.name.clone());
            prop_assert_eq!(found, Some(name));
        }
        prop_assert!(find_by_name(&forest, "missing").is_none());
    }

    #[test]
    fn insert_never_introduces_duplicates((forest, pick, _) in arb_nonempty_forest()) {
        let names = all_names(&forest);
        let taken = names[pick.index(names.len())].clone();
        let before = forest.clone();

        let result = insert_or_move(&forest, None, TreeNode::new(taken.clone()), ROOT_SENTINEL);
        prop_assert_eq!(result, Err(TreeError::DuplicateName(taken)));
        prop_assert_eq!(forest, before);
    }

    #[test]
    fn move_into_own_subtree_is_rejected((forest, pick, inner) in arb_nonempty_forest()) {
        let names = all_names(&forest);
        let moving = &names[pick.index(names.len())];
        let node = find_by_name(&forest, moving).unwrap();
        let subtree = node.subtree_names();
        let target = subtree[inner.index(subtree.len())];

        let moved = TreeNode::new(moving.clone());
        let result = insert_or_move(&forest, Some(moving.as_str()), moved, target);
        let is_cyclic = matches!(result, Err(TreeError::CyclicMove { .. }));
        prop_assert!(is_cyclic);
    }

    #[test]
    fn delete_subtree_removes_exactly_the_subtree((forest, pick, _) in arb_nonempty_forest()) {
        let names = all_names(&forest);
        let target = &names[pick.index(names.len())];
        let node = find_by_name(&forest, target).unwrap();
        let removed: Vec<String> = node.subtree_names().into_iter().map(String::from).collect();

        let next = delete_subtree(&forest, target).unwrap();
        prop_assert_eq!(next.len(), forest.len() - removed.len());
        for name in &removed {
            prop_assert!(!next.contains(name));
        }
        let survivors: Vec<_> = all_names(&forest)
            .into_iter()
            .filter(|n| !removed.contains(n))
            .collect();
        prop_assert_eq!(all_names(&next), survivors);
    }

    #[test]
    fn max_depth_matches_deepest_visit(forest in arb_forest()) {
        let deepest = forest.walk().map(|v| v.depth).max().unwrap_or(0);
        prop_assert_eq!(calculate_max_depth(&forest), deepest);
    }
}

fn chain(depth: usize) -> Forest {
    let mut node = TreeNode::new(format!("Level {depth:03}"));
    for level in (0..depth).rev() {
        node = TreeNode::new(format!("Level {level:03}")).with_child(node);
    }
    Forest::from_roots(vec![node])
}

#[test]
fn deep_chain_round_trips() {
    let forest = chain(300);
    let text = encode(&forest).unwrap();
    assert_eq!(decode(&text).unwrap(), forest);
}

#[test]
fn deep_chain_depth_and_flatten() {
    let forest = chain(300);
    assert_eq!(calculate_max_depth(&forest), 300);

    let records = flatten(&forest);
    assert_eq!(records.len(), 301);
    assert!(records[0].is_root());
    assert_eq!(records[0].name, "Level 000");
    assert_eq!(records[300].parent, "Level 299");
}

#[test]
fn deep_chain_delete_in_the_middle() {
    let forest = chain(300);
    let next = delete_subtree(&forest, "Level 150").unwrap();
    assert_eq!(next.len(), 150);
    assert_eq!(calculate_max_depth(&next), 149);
    assert!(!next.contains("Level 299"));
    assert_eq!(forest.len(), 301);
}
