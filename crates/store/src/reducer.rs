//! Reducers and their composition.
//!
//! A reducer is a pure `(state, action) -> state` function. Here it reports
//! "nothing changed" by returning `None`, which lets composed state keep the
//! very same `Arc` for untouched slices and lets the store skip notifying
//! subscribers when no slice changed.

use std::sync::Arc;

/// A pure state-transition function over one slice of state.
pub trait Reducer<A>: Send + Sync + 'static {
    type State: Send + Sync + 'static;

    /// The state used when the store starts without prior state.
    fn initial_state(&self) -> Self::State;

    /// Compute the next state, or `None` when `action` leaves `state` as is.
    ///
    /// Actions the reducer does not recognise must return `None`; a reducer
    /// never fails.
    fn reduce(&self, state: &Self::State, action: &A) -> Option<Self::State>;
}

/// Run `reducer` against shared state, reusing the input `Arc` when nothing
/// changed.
pub fn apply<A, R>(reducer: &R, state: &Arc<R::State>, action: &A) -> Arc<R::State>
where
    R: Reducer<A> + ?Sized,
{
    match reducer.reduce(state, action) {
        Some(next) => Arc::new(next),
        None => Arc::clone(state),
    }
}

/// A reducer made from an initial state and a closure.
pub struct FnReducer<S, F> {
    initial: S,
    reduce: F,
}

impl<S, F> FnReducer<S, F> {
    pub fn new(initial: S, reduce: F) -> Self {
        Self { initial, reduce }
    }
}

impl<A, S, F> Reducer<A> for FnReducer<S, F>
where
    S: Clone + Send + Sync + 'static,
    F: Fn(&S, &A) -> Option<S> + Send + Sync + 'static,
{
    type State = S;

    fn initial_state(&self) -> S {
        self.initial.clone()
    }

    fn reduce(&self, state: &S, action: &A) -> Option<S> {
        (self.reduce)(state, action)
    }
}

/// Generate a combined state record and the reducer that maintains it.
///
/// Each field of the state holds one slice behind an `Arc`, owned by the
/// reducer of the same name. Every action is delivered to every slice
/// reducer; a slice only ever sees its own field. When no slice changes the
/// combined reducer reports no change either.
///
/// ```ignore
/// combine_reducers! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct RootState;
///
///     pub struct RootReducer for Action {
///         editor: EditorReducer,
///         game: GameReducer,
///     }
/// }
/// ```
#[macro_export]
macro_rules! combine_reducers {
    (
        $(#[$state_meta:meta])*
        $state_vis:vis struct $state:ident;

        $(#[$reducer_meta:meta])*
        $reducer_vis:vis struct $reducer:ident for $action:ty {
            $($field:ident : $slice:ty),+ $(,)?
        }
    ) => {
        $(#[$state_meta])*
        $state_vis struct $state {
            $(
                pub $field: ::std::sync::Arc<<$slice as $crate::Reducer<$action>>::State>,
            )+
        }

        $(#[$reducer_meta])*
        $reducer_vis struct $reducer {
            $(pub $field: $slice,)+
        }

        impl $reducer {
            #[allow(clippy::too_many_arguments)]
            pub fn new($($field: $slice),+) -> Self {
                Self { $($field,)+ }
            }
        }

        impl $crate::Reducer<$action> for $reducer {
            type State = $state;

            fn initial_state(&self) -> Self::State {
                $state {
                    $(
                        $field: ::std::sync::Arc::new(
                            $crate::Reducer::<$action>::initial_state(&self.$field),
                        ),
                    )+
                }
            }

            fn reduce(&self, state: &Self::State, action: &$action) -> Option<Self::State> {
                let mut changed = false;
                $(
                    let $field = match $crate::Reducer::<$action>::reduce(
                        &self.$field,
                        &*state.$field,
                        action,
                    ) {
                        Some(next) => {
                            changed = true;
                            ::std::sync::Arc::new(next)
                        }
                        None => ::std::sync::Arc::clone(&state.$field),
                    };
                )+
                if changed {
                    Some($state { $($field,)+ })
                } else {
                    None
                }
            }
        }
    };
}
