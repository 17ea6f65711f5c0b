use crate::space::Action;
use crate::space::Cost;
use crate::space::Space;
use crate::space::State;

/// A single-start, single-goal search problem over some Space.
pub trait Problem<Sp, St, A, C>: std::fmt::Debug + Sized
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn space(&self) -> &Sp;
    fn start(&self) -> St;
    fn goal(&self) -> St;

    fn is_goal(&self, s: &St) -> bool {
        *s == self.goal()
    }
}

/// An instance-specific heuristic.
///
/// Estimates the remaining cost from `s` to the problem's goal. The searches
/// assume estimates never overestimate the true remaining cost (admissible);
/// that contract is on the implementer, not enforced here.
pub trait Heuristic<P, Sp, St, A, C>: std::fmt::Debug
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn h(_p: &P, _s: &St) -> C {
        C::zero()
    }
}

/// The everywhere-zero heuristic.
///
/// Trivially admissible. Under it A* degenerates to Dijkstra's algorithm,
/// ordering purely by cost-from-start.
#[derive(Debug)]
pub struct ZeroHeuristic;

impl<P, Sp, St, A, C> Heuristic<P, Sp, St, A, C> for ZeroHeuristic
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
}
