//! Frontier disciplines for the uninformed search core.
//!
//! The frontier holds discovered-but-not-yet-expanded search-tree indices.
//! Its ordering discipline is the only difference between breadth-first and
//! depth-first search.

use std::collections::VecDeque;

use crate::search::SearchTreeIndex;

pub trait Frontier: Default + std::fmt::Debug {
    fn push(&mut self, i: SearchTreeIndex);
    fn pop(&mut self) -> Option<SearchTreeIndex>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First-in first-out frontier. Oldest discovery expands first.
#[derive(Debug, Default)]
pub struct FifoFrontier {
    queue: VecDeque<SearchTreeIndex>,
}

impl Frontier for FifoFrontier {
    #[inline(always)]
    fn push(&mut self, i: SearchTreeIndex) {
        self.queue.push_back(i);
    }
    #[inline(always)]
    fn pop(&mut self) -> Option<SearchTreeIndex> {
        self.queue.pop_front()
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Last-in first-out frontier. Newest discovery expands first.
#[derive(Debug, Default)]
pub struct LifoFrontier {
    stack: Vec<SearchTreeIndex>,
}

impl Frontier for LifoFrontier {
    #[inline(always)]
    fn push(&mut self, i: SearchTreeIndex) {
        self.stack.push(i);
    }
    #[inline(always)]
    fn pop(&mut self) -> Option<SearchTreeIndex> {
        self.stack.pop()
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.stack.len()
    }
}
