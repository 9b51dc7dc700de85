//! Call-site helpers

/// Normalize a function label for display: cut at the first `(` and append
/// `()`. Labels without a parameter list get `()` appended as well.
///
/// # Examples
/// ```
/// use dispatcher::strip_params;
///
/// assert_eq!(strip_params("doThing(x:y:)"), "doThing()");
/// assert_eq!(strip_params("doThing"), "doThing()");
/// ```
pub fn strip_params(function: &str) -> String {
    let name = function
        .split_once('(')
        .map_or(function, |(head, _)| head);
    format!("{name}()")
}

/// Path of the enclosing function, e.g. `my_crate::net::connect`
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// [`CallSite`](contracts::CallSite) of the macro invocation
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(file!(), $crate::function_name!(), line!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_params_cuts_at_first_paren() {
        assert_eq!(strip_params("doThing(x:y:)"), "doThing()");
        assert_eq!(strip_params("outer(inner(a))"), "outer()");
    }

    #[test]
    fn test_strip_params_without_paren() {
        assert_eq!(strip_params("doThing"), "doThing()");
        assert_eq!(strip_params(""), "()");
    }

    #[test]
    fn test_function_name_macro() {
        let name = crate::function_name!();
        assert!(name.ends_with("callsite::tests::test_function_name_macro"), "{name}");
    }

    #[test]
    fn test_call_site_macro() {
        let site = crate::call_site!();
        assert!(site.path.ends_with("callsite.rs"));
        assert!(site.function.ends_with("test_call_site_macro"));
        assert!(site.line > 0);
    }
}
