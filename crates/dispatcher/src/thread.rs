//! Thread tags attached to log records

use std::thread;

/// Describes the calling execution context for log records
pub trait ThreadDescriber: Send + Sync {
    fn describe(&self) -> String;
}

impl<F> ThreadDescriber for F
where
    F: Fn() -> String + Send + Sync,
{
    fn describe(&self) -> String {
        self()
    }
}

/// Default describer.
///
/// The main thread yields "", named threads their name, anything else the
/// debug form of its `ThreadId`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentThread;

impl ThreadDescriber for CurrentThread {
    fn describe(&self) -> String {
        let current = thread::current();
        match current.name() {
            Some("main") => String::new(),
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => format!("{:?}", current.id()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_thread() {
        let tag = thread::Builder::new()
            .name("worker-7".into())
            .spawn(|| CurrentThread.describe())
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(tag, "worker-7");
    }

    #[test]
    fn test_unnamed_thread_uses_id() {
        let (tag, id) = thread::Builder::new()
            .spawn(|| (CurrentThread.describe(), thread::current().id()))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(tag, format!("{id:?}"));
    }

    #[test]
    fn test_closure_describer() {
        let describer = || "fixed".to_string();
        assert_eq!(describer.describe(), "fixed");
    }
}
