use std::collections::HashSet;

use balanced_trees::{avl, splay};

quickcheck::quickcheck! {
    fn avl_contains(xs: Vec<i8>) -> bool {
        let mut tree = avl::Tree::new();
        for x in &xs {
            tree.insert(*x);
        }

        xs.iter().all(|x| tree.search(x))
    }

    fn avl_contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let mut tree = avl::Tree::new();
        for x in &xs {
            tree.insert(*x);
        }
        let added: HashSet<_> = xs.into_iter().collect();
        let nots: HashSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| !tree.search(x))
    }

    fn avl_with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
        let mut tree = avl::Tree::new();
        for x in &xs {
            tree.insert(*x);
        }
        for delete in &deletes {
            tree.delete(delete);
        }

        let mut still_present = xs;
        still_present.retain(|x| !deletes.contains(x));

        deletes.iter().all(|x| !tree.search(x))
            && still_present.iter().all(|x| tree.search(x))
            && tree.validate().is_ok()
    }

    fn splay_contains(xs: Vec<i8>) -> bool {
        let mut tree = splay::Tree::new();
        for x in &xs {
            tree.insert(*x);
        }

        xs.iter().all(|x| tree.contains(x) && tree.root_key() == Some(x))
    }

    fn splay_contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let mut tree = splay::Tree::new();
        for x in &xs {
            tree.insert(*x);
        }
        let added: HashSet<_> = xs.into_iter().collect();
        let nots: HashSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| !tree.contains(x))
    }

    fn splay_with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
        let mut tree = splay::Tree::new();
        for x in &xs {
            tree.insert(*x);
        }
        for delete in &deletes {
            tree.remove(delete);
        }

        let mut still_present = xs;
        still_present.retain(|x| !deletes.contains(x));

        deletes.iter().all(|x| !tree.contains(x))
            && still_present.iter().all(|x| tree.contains(x))
            && tree.validate().is_ok()
    }

    fn both_trees_agree(xs: Vec<i16>, deletes: Vec<i16>) -> bool {
        let mut avl = avl::Tree::new();
        let mut splay = splay::Tree::new();
        for x in &xs {
            avl.insert(*x);
            splay.insert(*x);
        }
        for delete in &deletes {
            if avl.delete(delete) != splay.remove(delete) {
                return false;
            }
        }

        avl.len() == splay.size()
            && avl.iter().eq(splay.iter())
            && avl.to_string() == splay.to_string()
    }
}
