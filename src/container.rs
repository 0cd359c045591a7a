//! Service container.
//!
//! A small service locator keyed by name. Services are registered either as
//! transient (the factory runs on every [`Container::resolve`]) or as
//! singletons (the factory runs once and the instance is cached until
//! [`Container::clear`]).
//!
//! Factories receive the container itself so they can resolve their own
//! dependencies:
//!
//! ```ignore
//! let mut container = Container::new();
//! container.singleton("db", move |_| Ok(pool.clone()))?;
//! container.singleton("courseRepository", |c| {
//!     Ok(CourseRepository::new(c.resolve::<PgPool>("db")?.as_ref().clone()))
//! })?;
//!
//! let repo = container.resolve::<CourseRepository>("courseRepository")?;
//! ```
//!
//! The container is only used while wiring the application at startup; see
//! [`crate::state::AppState::init`]. Request handlers never see it.
//!
//! # Concurrency
//!
//! Each singleton has its own lock, held while its factory runs. Concurrent
//! first resolutions of the same name therefore construct the instance exactly
//! once. A singleton factory that (directly or through other singletons)
//! resolves its own name deadlocks; dependency graphs must be acyclic.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// Wiring errors. All of them are configuration mistakes and abort startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerError {
    #[error("service name must not be empty")]
    EmptyName,

    #[error("service '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("service '{0}' not found")]
    NotFound(String),

    #[error("service '{name}' is not of type {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },
}

type Instance = Arc<dyn Any + Send + Sync>;
type Factory = Box<dyn Fn(&Container) -> Result<Instance, ContainerError> + Send + Sync>;

enum Registration {
    Transient(Factory),
    Singleton {
        factory: Factory,
        instance: Mutex<Option<Instance>>,
    },
}

#[derive(Default)]
pub struct Container {
    registrations: HashMap<String, Registration>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a transient service.
    pub fn register<T, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> Result<(), ContainerError>
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.insert(name.into(), Registration::Transient(erase(factory)))
    }

    /// Registers a singleton service, constructed lazily on first resolution.
    pub fn singleton<T, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> Result<(), ContainerError>
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.insert(
            name.into(),
            Registration::Singleton {
                factory: erase(factory),
                instance: Mutex::new(None),
            },
        )
    }

    fn insert(&mut self, name: String, registration: Registration) -> Result<(), ContainerError> {
        if name.trim().is_empty() {
            return Err(ContainerError::EmptyName);
        }
        if self.registrations.contains_key(&name) {
            return Err(ContainerError::AlreadyRegistered(name));
        }

        self.registrations.insert(name, registration);
        Ok(())
    }

    /// Resolves `name` as a `T`.
    pub fn resolve<T>(&self, name: &str) -> Result<Arc<T>, ContainerError>
    where
        T: Any + Send + Sync,
    {
        self.resolve_any(name)?
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }

    fn resolve_any(&self, name: &str) -> Result<Instance, ContainerError> {
        let registration = self
            .registrations
            .get(name)
            .ok_or_else(|| ContainerError::NotFound(name.to_string()))?;

        match registration {
            Registration::Transient(factory) => factory(self),
            Registration::Singleton { factory, instance } => {
                let mut slot = instance.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(existing) = slot.as_ref() {
                    return Ok(Arc::clone(existing));
                }

                let created = factory(self)?;
                *slot = Some(Arc::clone(&created));
                Ok(created)
            }
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.registrations.contains_key(name)
    }

    /// Drops every registration and cached instance. Meant for tests.
    pub fn clear(&mut self) {
        self.registrations.clear();
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

fn erase<T, F>(factory: F) -> Factory
where
    T: Any + Send + Sync,
    F: Fn(&Container) -> Result<T, ContainerError> + Send + Sync + 'static,
{
    Box::new(move |container| factory(container).map(|value| Arc::new(value) as Instance))
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.registrations.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Container").field("services", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug)]
    struct Counter(usize);

    #[derive(Debug)]
    struct Greeter {
        greeting: Arc<String>,
    }

    #[test]
    fn test_resolve_unregistered_name_fails() {
        let container = Container::new();
        let err = container.resolve::<String>("missing").unwrap_err();
        assert_eq!(err, ContainerError::NotFound("missing".to_string()));
        assert_eq!(err.to_string(), "service 'missing' not found");
    }

    #[test]
    fn test_singleton_returns_same_instance() {
        let mut container = Container::new();
        container.singleton("counter", |_| Ok(Counter(1))).unwrap();

        let first = container.resolve::<Counter>("counter").unwrap();
        let second = container.resolve::<Counter>("counter").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_transient_returns_distinct_instances() {
        let mut container = Container::new();
        container.register("counter", |_| Ok(Counter(1))).unwrap();

        let first = container.resolve::<Counter>("counter").unwrap();
        let second = container.resolve::<Counter>("counter").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.0, second.0);
    }

    #[test]
    fn test_singleton_factory_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut container = Container::new();
        let counted = Arc::clone(&calls);
        container
            .singleton("counter", move |_| Ok(Counter(counted.fetch_add(1, Ordering::SeqCst))))
            .unwrap();

        for _ in 0..5 {
            container.resolve::<Counter>("counter").unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_factory_can_resolve_dependencies() {
        let mut container = Container::new();
        container.singleton("greeting", |_| Ok("hola".to_string())).unwrap();
        container
            .register("greeter", |c| {
                Ok(Greeter {
                    greeting: c.resolve::<String>("greeting")?,
                })
            })
            .unwrap();

        let greeter = container.resolve::<Greeter>("greeter").unwrap();
        let greeting = container.resolve::<String>("greeting").unwrap();
        assert!(Arc::ptr_eq(&greeter.greeting, &greeting));
    }

    #[test]
    fn test_missing_dependency_propagates() {
        let mut container = Container::new();
        container
            .register("greeter", |c| {
                Ok(Greeter {
                    greeting: c.resolve::<String>("greeting")?,
                })
            })
            .unwrap();

        let err = container.resolve::<Greeter>("greeter").unwrap_err();
        assert_eq!(err, ContainerError::NotFound("greeting".to_string()));
    }

    #[test]
    fn test_type_mismatch() {
        let mut container = Container::new();
        container.singleton("answer", |_| Ok(42u32)).unwrap();

        let err = container.resolve::<String>("answer").unwrap_err();
        assert!(matches!(err, ContainerError::TypeMismatch { ref name, .. } if name == "answer"));
    }

    #[test]
    fn test_registration_rejects_empty_and_duplicate_names() {
        let mut container = Container::new();
        assert_eq!(
            container.register("", |_| Ok(1u8)).unwrap_err(),
            ContainerError::EmptyName
        );

        container.register("svc", |_| Ok(1u8)).unwrap();
        assert_eq!(
            container.singleton("svc", |_| Ok(2u8)).unwrap_err(),
            ContainerError::AlreadyRegistered("svc".to_string())
        );
    }

    #[test]
    fn test_has_does_not_construct() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut container = Container::new();
        let counted = Arc::clone(&calls);
        container
            .singleton("counter", move |_| {
                counted.fetch_add(1, Ordering::SeqCst);
                Ok(Counter(0))
            })
            .unwrap();

        assert!(container.has("counter"));
        assert!(!container.has("other"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_clear_discards_registrations_and_instances() {
        let mut container = Container::new();
        container.singleton("counter", |_| Ok(Counter(1))).unwrap();
        let before = container.resolve::<Counter>("counter").unwrap();

        container.clear();
        assert!(container.is_empty());
        assert!(!container.has("counter"));
        assert!(container.resolve::<Counter>("counter").is_err());

        container.singleton("counter", |_| Ok(Counter(1))).unwrap();
        let after = container.resolve::<Counter>("counter").unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_concurrent_first_resolution_constructs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut container = Container::new();
        let counted = Arc::clone(&calls);
        container
            .singleton("slow", move |_| {
                counted.fetch_add(1, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(20));
                Ok(Counter(7))
            })
            .unwrap();

        let instances: Vec<Arc<Counter>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| container.resolve::<Counter>("slow").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(instances.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn test_debug_lists_service_names() {
        let mut container = Container::new();
        container.register("b", |_| Ok(1u8)).unwrap();
        container.register("a", |_| Ok(1u8)).unwrap();
        assert_eq!(format!("{:?}", container), r#"Container { services: ["a", "b"] }"#);
    }
}
