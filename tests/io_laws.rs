#![cfg(feature = "effect")]
//! Property-based tests for `IO` laws.
//!
//! This module verifies that `IO` satisfies, observed through `run`:
//! - Left Identity: succeed(a).chain(f) == f(a)
//! - Right Identity: m.chain(succeed) == m
//! - Associativity: m.chain(f).chain(g) == m.chain(|x| f(x).chain(g))
//! - Access purity and failure propagation
//! - Stack safety for long sequential pipelines

use effio::effect::IO;
use proptest::prelude::*;

fn halve_even(n: i32) -> IO<(), String, i32> {
    if n % 2 == 0 {
        IO::succeed(n / 2)
    } else {
        IO::fail(format!("{n} is odd"))
    }
}

fn add_seven(n: i32) -> IO<(), String, i32> {
    IO::succeed(n.wrapping_add(7))
}

fn arbitrary_io() -> impl Strategy<Value = IO<(), String, i32>> {
    prop_oneof![
        any::<i32>().prop_map(IO::<(), String, i32>::succeed),
        "[a-z]{1,8}".prop_map(IO::<(), String, i32>::fail),
    ]
}

// =============================================================================
// Monad Laws
// =============================================================================

proptest! {
    /// Left Identity Law: succeed(a).chain(f) == f(a)
    #[test]
    fn prop_io_left_identity(value: i32) {
        let left_result = IO::succeed(value).chain(halve_even).run(());
        let right_result = halve_even(value).run(());

        prop_assert_eq!(left_result, right_result);
    }

    /// Right Identity Law: m.chain(succeed) == m
    #[test]
    fn prop_io_right_identity(io in arbitrary_io()) {
        let left_result = io.clone().chain(IO::succeed).run(());
        let right_result = io.run(());

        prop_assert_eq!(left_result, right_result);
    }

    /// Associativity Law: m.chain(f).chain(g) == m.chain(|x| f(x).chain(g))
    #[test]
    fn prop_io_associativity(io in arbitrary_io()) {
        let left_result = io.clone().chain(halve_even).chain(add_seven).run(());
        let right_result = io.chain(|x| halve_even(x).chain(add_seven)).run(());

        prop_assert_eq!(left_result, right_result);
    }
}

// =============================================================================
// Functor Laws
// =============================================================================

proptest! {
    /// Identity: m.map(id) == m
    #[test]
    fn prop_io_map_identity(io in arbitrary_io()) {
        prop_assert_eq!(io.clone().map(|x| x).run(()), io.run(()));
    }

    /// Map agrees with chain followed by succeed
    #[test]
    fn prop_io_map_is_chain_succeed(io in arbitrary_io()) {
        let mapped = io.clone().map(|x: i32| x.wrapping_mul(3)).run(());
        let chained = io.chain(|x: i32| IO::succeed(x.wrapping_mul(3))).run(());

        prop_assert_eq!(mapped, chained);
    }
}

// =============================================================================
// Environment and Failure
// =============================================================================

proptest! {
    /// Access purity: run(r)(access(f)) == Ok(f(r))
    #[test]
    fn prop_access_purity(environment: (i32, i32)) {
        let io: IO<(i32, i32), String, i64> =
            IO::access(|(a, b): &(i32, i32)| i64::from(*a) - i64::from(*b));
        let expected = i64::from(environment.0) - i64::from(environment.1);

        prop_assert_eq!(io.run(environment), Ok(expected));
    }

    /// Fail propagation: chain and map never touch a failure
    #[test]
    fn prop_fail_propagates(error in "[a-z]{1,8}", steps in 0usize..50) {
        let io = (0..steps).fold(IO::<(), String, i32>::fail(error.clone()), |io, _| {
            io.chain(|x| IO::succeed(x + 1)).map(|x| x * 2)
        });

        prop_assert_eq!(io.run(()), Err(error));
    }

    /// Provide scoping: the outer environment is visible again after the boundary
    #[test]
    fn prop_provide_scoping(outer: i32, offset: i32) {
        let inner: IO<i32, String, i32> = IO::access(|n: &i32| *n);
        let io: IO<i32, String, (i32, i32)> = inner
            .provide_some(move |n: &i32| n.wrapping_add(offset))
            .zip(IO::access(|n: &i32| *n));

        prop_assert_eq!(io.run(outer), Ok((outer.wrapping_add(offset), outer)));
    }
}

// =============================================================================
// Stack Safety
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]
    /// Stack safety: long left-nested chains evaluate in constant native stack
    #[test]
    fn prop_io_stack_safety_chain(depth in 50_000u64..60_000u64) {
        let io: IO<(), String, u64> =
            (0..depth).fold(IO::succeed(0), |io, _| io.chain(|x| IO::succeed(x + 1)));

        prop_assert_eq!(io.run(()), Ok(depth));
    }

    /// Stack safety: long catch_all and fold_m chains evaluate too
    #[test]
    fn prop_io_stack_safety_mixed(depth in 10_000u64..20_000u64) {
        let io: IO<(), String, u64> = (0..depth).fold(IO::succeed(0), |io, step| {
            if step % 2 == 0 {
                io.catch_all(IO::fail).map(|x| x + 1)
            } else {
                io.fold_m(IO::fail, |x| IO::succeed(x + 1))
            }
        });

        prop_assert_eq!(io.run(()), Ok(depth));
    }
}

#[test]
fn test_fifty_thousand_step_chain() {
    let io: IO<(), (), u32> =
        (0..50_000).fold(IO::succeed(0), |io, _| io.chain(|x| IO::succeed(x + 1)));

    assert_eq!(io.run(()), Ok(50_000));
    // Evaluating twice shows the description is unchanged by evaluation.
    assert_eq!(io.run(()), Ok(50_000));
    drop(io);
}

#[test]
fn test_fifty_thousand_step_ensuring_fold() {
    let io: IO<(), (), u32> =
        (0..50_000).fold(IO::succeed(0), |io, _| io.ensuring(IO::unit()).map(|x| x + 1));

    assert_eq!(io.run(()), Ok(50_000));
    drop(io);
}

#[test]
fn test_deep_ensuring_fold_drops_without_evaluation() {
    let io: IO<(), (), u32> = (0..50_000).fold(IO::succeed(0), |io, _| io.ensuring(IO::unit()));
    drop(io);
}

#[test]
fn test_fifty_thousand_step_zip_fold() {
    let io: IO<(), (), u32> = (0..50_000).fold(IO::succeed(0), |accumulated, _| {
        IO::succeed(1).zip_with(accumulated, |a, b| a + b)
    });

    assert_eq!(io.run(()), Ok(50_000));
    drop(io);
}

#[test]
fn test_deep_then_fold_drops_without_evaluation() {
    let io: IO<(), (), u32> =
        (0..50_000).fold(IO::succeed(0), |accumulated, _| IO::unit().then(accumulated));
    drop(io);
}

#[test]
fn test_deep_right_nested_recursion() {
    fn count_up(n: u32, limit: u32) -> IO<(), (), u32> {
        if n == limit {
            IO::succeed(n)
        } else {
            IO::succeed(n + 1).chain(move |next| count_up(next, limit))
        }
    }

    assert_eq!(count_up(0, 100_000).run(()), Ok(100_000));
}

#[test]
fn test_deep_bracket_nesting() {
    fn nest(depth: u32) -> IO<(), (), u32> {
        if depth == 0 {
            IO::succeed(0)
        } else {
            IO::succeed(depth).bracket(move |_| nest(depth - 1).map(|x| x + 1), |_, _| IO::unit())
        }
    }

    assert_eq!(nest(10_000).run(()), Ok(10_000));
}
