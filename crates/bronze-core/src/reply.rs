//! Conversion of callback return values into hook results.
//!
//! Hooks and actions may return anything implementing [`Reply`], so plain
//! closures need no boilerplate:
//!
//! ```rust,ignore
//! app.init(|res| { res.write("init-"); });          // ()
//! app.shutdown(|_| "-shutdown".to_string());         // String, appended to the body
//! route.action(|args, _| -> Result<(), MyError> {    // Result, errors propagate
//!     Ok(())
//! });
//! ```

use crate::error::{BoxError, HookResult};
use crate::response::Response;

/// A value a hook or action can return.
pub trait Reply {
    /// Applies this value to the response.
    fn reply(self, res: &mut Response) -> HookResult;
}

/// No output.
impl Reply for () {
    fn reply(self, _res: &mut Response) -> HookResult {
        Ok(())
    }
}

/// Appended to the response body.
impl Reply for String {
    fn reply(self, res: &mut Response) -> HookResult {
        res.write(&self);
        Ok(())
    }
}

/// Appended to the response body.
impl Reply for &'static str {
    fn reply(self, res: &mut Response) -> HookResult {
        res.write(self);
        Ok(())
    }
}

/// On `Some` the inner value is applied; on `None` nothing happens.
impl<T: Reply> Reply for Option<T> {
    fn reply(self, res: &mut Response) -> HookResult {
        match self {
            Some(t) => t.reply(res),
            None => Ok(()),
        }
    }
}

/// On `Ok` the inner value is applied; `Err` becomes a callback failure.
impl<T: Reply, E: Into<BoxError>> Reply for Result<T, E> {
    fn reply(self, res: &mut Response) -> HookResult {
        match self {
            Ok(t) => t.reply(res),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_and_str_append() {
        let mut res = Response::new();
        "a".reply(&mut res).unwrap();
        "b".to_string().reply(&mut res).unwrap();
        Some("c").reply(&mut res).unwrap();
        None::<String>.reply(&mut res).unwrap();
        assert_eq!(res.body(), "abc");
    }

    #[test]
    fn test_result_err_is_failure() {
        let mut res = Response::new();
        let failed: Result<String, String> = Err("boom".to_string());
        let err = failed.reply(&mut res).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(res.body(), "");
    }
}
