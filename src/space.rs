use std::fmt::Debug;
use std::hash::Hash;

use num_traits::SaturatingAdd;
use num_traits::sign::Unsigned;

pub trait Action: Copy + Clone + Debug + PartialEq + Eq {}
pub trait State: Copy + Clone + Debug + PartialEq + Eq + Hash {}
pub trait Cost:
    Copy
    + Clone
    + Debug
    + std::fmt::Display
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + SaturatingAdd
    + Unsigned
    + num_traits::bounds::UpperBounded
    + std::ops::Add
    + std::ops::AddAssign
{
    fn valid(&self) -> bool {
        *self != Self::max_value()
    }
}

impl Cost for u32 {}
impl Cost for u64 {}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Path<S, A, C>
where
    S: State,
    A: Action,
    C: Cost,
{
    pub start: Option<S>,
    pub end: Option<S>,
    pub cost: C,
    pub actions: Vec<A>,
}

impl<S, A, C> Path<S, A, C>
where
    S: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    pub fn new_from_start(start: S) -> Self {
        Self {
            start: Some(start),
            end: Some(start),
            cost: C::zero(),
            actions: vec![],
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of actions (edges) in the path.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Runs sanity checks
    #[inline(always)]
    pub fn seems_valid(&self) -> bool {
        self.start.is_some() == self.end.is_some() && self.cost.valid()
    }

    #[inline(always)]
    pub fn append(&mut self, last_action: (S, A), c: C) {
        let (s, a) = last_action;
        self.actions.push(a);
        self.end = Some(s);
        self.cost = self.cost.saturating_add(&c);
    }

    /// Reverses the Path, likely making it invalid.
    ///
    /// Useful when naturally reconstructing paths in reverse.
    pub fn reverse(&mut self) {
        (self.end, self.start) = (self.start, self.end);
        self.actions.reverse();
    }

    /// Replays the actions against `space`, yielding every state from start
    /// to end inclusive.
    ///
    /// Empty paths yield nothing; a lone start yields just the start.
    pub fn states<Sp: Space<S, A, C>>(&self, space: &Sp) -> Vec<S> {
        let Some(start) = self.start else {
            return vec![];
        };

        let mut states = Vec::with_capacity(self.actions.len() + 1);
        let mut s = start;
        states.push(s);
        for a in &self.actions {
            match space.apply(&s, a) {
                Some(next) => s = next,
                None => break,
            }
            states.push(s);
        }
        states
    }

    #[inline(always)]
    pub fn empty() -> Self {
        Self {
            start: None,
            actions: vec![],
            end: None,
            cost: C::zero(),
        }
    }
}

impl<S, A, C> std::fmt::Display for Path<S, A, C>
where
    S: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        debug_assert!(self.start.is_none() == self.end.is_none());

        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                write!(
                    f,
                    "Path({}, {:?}:{:?}:{:?})",
                    self.cost,
                    start,
                    self.actions.iter().take(20).collect::<Vec<_>>(),
                    end
                )
            }
            (None, None) => write!(f, "Path()"),
            _ => unreachable!("Path::start and Path::end should both be Some or None"),
        }
    }
}

pub trait Space<St, A, C>: Clone + std::fmt::Debug
where
    St: State,
    A: Action,
    C: Cost,
{
    fn apply(&self, s: &St, a: &A) -> Option<St>;

    fn cost(&self, _s: &St, _a: &A) -> C {
        C::one()
    }
    /// Expands a State
    fn neighbours(&self, s: &St) -> Vec<(St, A)>;
    /// Verify is a State is valid.
    fn valid(&self, s: &St) -> bool;

    fn valid_path(&self, p: &Path<St, A, C>) -> bool {
        if let Some(start) = p.start {
            // Verify path
            let mut state: St = start;
            for a in &p.actions {
                match self.apply(&state, a) {
                    Some(new_state) => state = new_state,
                    None => return false,
                }
            }
            if let Some(end) = p.end {
                return end == state;
            }
            false
        } else {
            // Empty paths are fine
            *p == Path::<St, A, C>::empty()
        }
    }

    fn size(&self) -> Option<usize> {
        None
    }

    fn supports_random_state() -> bool {
        false
    }
    fn random_state<R: rand::Rng>(&self, _r: &mut R) -> Option<St> {
        debug_assert!(!Self::supports_random_state());
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct Tick(u32);
    impl State for Tick {}

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct Step;
    impl Action for Step {}

    /// Counts up to a limit, one state per tick.
    #[derive(Clone, Debug)]
    struct Counter {
        limit: u32,
    }

    impl Space<Tick, Step, u32> for Counter {
        fn apply(&self, s: &Tick, _a: &Step) -> Option<Tick> {
            (s.0 < self.limit).then_some(Tick(s.0 + 1))
        }
        fn neighbours(&self, s: &Tick) -> Vec<(Tick, Step)> {
            self.apply(s, &Step).map(|n| (n, Step)).into_iter().collect()
        }
        fn valid(&self, s: &Tick) -> bool {
            s.0 <= self.limit
        }
    }

    #[test]
    fn path_reconstruction_roundtrip() {
        let space = Counter { limit: 3 };

        // Built backwards, as the searches do.
        let mut p = Path::<Tick, Step, u32>::new_from_start(Tick(3));
        p.append((Tick(2), Step), 1);
        p.append((Tick(1), Step), 1);
        p.append((Tick(0), Step), 1);
        p.reverse();

        assert_eq!(p.start, Some(Tick(0)));
        assert_eq!(p.end, Some(Tick(3)));
        assert_eq!(p.cost, 3);
        assert_eq!(p.len(), 3);
        assert!(p.seems_valid());
        assert!(space.valid_path(&p));
        assert_eq!(
            p.states(&space),
            vec![Tick(0), Tick(1), Tick(2), Tick(3)]
        );
    }

    #[test]
    fn empty_path_is_valid() {
        let space = Counter { limit: 1 };
        let p = Path::<Tick, Step, u32>::empty();
        assert!(p.is_empty());
        assert!(space.valid_path(&p));
        assert!(p.states(&space).is_empty());
    }

    #[test]
    fn broken_path_is_invalid() {
        let space = Counter { limit: 1 };

        // Claims to go beyond the limit.
        let mut p = Path::<Tick, Step, u32>::new_from_start(Tick(0));
        p.actions = vec![Step, Step];
        p.end = Some(Tick(2));
        assert!(!space.valid_path(&p));
    }
}
