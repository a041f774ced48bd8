#![cfg(feature = "effect")]
//! Tests for combining environment requirements and failure types.
//!
//! Requirements are conjoined through `Has`, and failures are joined into a
//! closed enum through `From` and `widen_error`.

use effio::effect::{Has, IO};
use rstest::rstest;

// =============================================================================
// Components
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Users {
    names: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
struct Quota {
    remaining: u32,
}

struct App {
    users: Users,
    quota: Quota,
}

impl Has<Users> for App {
    fn get(&self) -> &Users {
        &self.users
    }
}

impl Has<Quota> for App {
    fn get(&self) -> &Quota {
        &self.quota
    }
}

fn app(names: Vec<&'static str>, remaining: u32) -> App {
    App {
        users: Users { names },
        quota: Quota { remaining },
    }
}

// =============================================================================
// Failures
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct UnknownUser(String);

#[derive(Debug, Clone, PartialEq)]
struct QuotaExhausted;

#[derive(Debug, Clone, PartialEq)]
enum AppError {
    UnknownUser(String),
    QuotaExhausted,
}

impl From<UnknownUser> for AppError {
    fn from(error: UnknownUser) -> Self {
        Self::UnknownUser(error.0)
    }
}

impl From<QuotaExhausted> for AppError {
    fn from(_: QuotaExhausted) -> Self {
        Self::QuotaExhausted
    }
}

fn lookup(name: &'static str) -> IO<Users, UnknownUser, usize> {
    IO::access(move |users: &Users| users.names.iter().position(|candidate| *candidate == name))
        .chain(move |position| match position {
            Some(index) => IO::succeed(index),
            None => IO::fail(UnknownUser(name.to_string())),
        })
}

fn consume() -> IO<Quota, QuotaExhausted, u32> {
    IO::access(|quota: &Quota| quota.remaining).chain(|remaining| {
        if remaining == 0 {
            IO::fail(QuotaExhausted)
        } else {
            IO::succeed(remaining - 1)
        }
    })
}

/// Works in any environment that has both components.
fn request<R>(name: &'static str) -> IO<R, AppError, (usize, u32)>
where
    R: Has<Users> + Has<Quota> + 'static,
{
    lookup(name)
        .lift_environment::<R>()
        .widen_error::<AppError>()
        .zip(consume().lift_environment::<R>().widen_error::<AppError>())
}

// =============================================================================
// Tests
// =============================================================================

#[rstest]
#[case(app(vec!["ada", "bob"], 3), Ok((1, 2)))]
#[case(app(vec!["ada"], 3), Err(AppError::UnknownUser("bob".to_string())))]
#[case(app(vec!["bob"], 0), Err(AppError::QuotaExhausted))]
fn test_conjoined_requirements_and_failures(
    #[case] environment: App,
    #[case] expected: Result<(usize, u32), AppError>,
) {
    assert_eq!(request::<App>("bob").run(environment), expected);
}

#[rstest]
fn test_first_failure_short_circuits_the_rest() {
    // Unknown user and exhausted quota: the lookup runs first and wins.
    let io = request::<App>("carol");
    assert_eq!(
        io.run(app(vec![], 0)),
        Err(AppError::UnknownUser("carol".to_string()))
    );
}

#[rstest]
fn test_service_and_access_service() {
    let remaining: IO<App, (), u32> = IO::access_service(|quota: &Quota| quota.remaining);
    let users: IO<App, (), Users> = IO::service();

    assert_eq!(remaining.run(app(vec![], 9)), Ok(9));
    assert_eq!(
        users.run(app(vec!["ada"], 9)),
        Ok(Users {
            names: vec!["ada"]
        })
    );
}

#[rstest]
fn test_union_failure_can_be_handled_per_case() {
    let io: IO<App, String, (usize, u32)> =
        request::<App>("bob").catch_all(|error| match error {
            AppError::QuotaExhausted => IO::succeed((0, 0)),
            AppError::UnknownUser(name) => IO::fail(format!("who is {name}?")),
        });

    assert_eq!(io.run(app(vec!["bob"], 0)), Ok((0, 0)));
    assert_eq!(io.run(app(vec![], 1)), Err("who is bob?".to_string()));
}

#[rstest]
fn test_provide_satisfies_one_requirement() {
    let io: IO<(), QuotaExhausted, u32> = consume().provide(Quota { remaining: 5 });
    assert_eq!(io.run(()), Ok(4));
}
