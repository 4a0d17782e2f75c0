//! The process-wide registry of helper operations, one prototype per [`Flavour`].
//!
//! The extension traits already give every producer the helper operations at compile time.
//! The registry describes that operation set at runtime: which operations exist, what kind
//! they are, and under which tag producers of a flavour identify themselves. It is installed
//! at most once per process and never overwritten.
//!
//! ```
//! use ufotofu_helpers::install::{install, prototype};
//! use ufotofu_helpers::Flavour;
//!
//! install();
//! let proto = prototype(Flavour::Sync).unwrap();
//! assert!(proto.has_operation("take"));
//! assert!(!proto.has_operation("sort"));
//! ```

use std::sync::{OnceLock, PoisonError, RwLock};

use tracing::debug;

use crate::common::errors::{Flavour, InstallError};

/// How an operation treats the producer it is called on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum OperationKind {
    /// Returns a new producer without pulling anything.
    Lazy,
    /// Pulls from the producer and returns a plain value.
    Terminal,
    /// Returns a producer of the other flavour.
    Bridge,
}

/// An entry of a prototype.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Operation {
    name: &'static str,
    kind: OperationKind,
}

impl Operation {
    const fn new(name: &'static str, kind: OperationKind) -> Self {
        Operation { name, kind }
    }

    /// The method name, as found on [`ProducerExt`](crate::sync::ProducerExt).
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Operations can never be reassigned.
    pub fn is_writable(&self) -> bool {
        false
    }

    /// Operations may be shadowed, for example by inherent methods of the same name.
    pub fn is_configurable(&self) -> bool {
        true
    }
}

/// The operations of sync producers.
pub const SYNC_OPERATIONS: &[Operation] = &[
    Operation::new("map", OperationKind::Lazy),
    Operation::new("filter", OperationKind::Lazy),
    Operation::new("take", OperationKind::Lazy),
    Operation::new("skip", OperationKind::Lazy),
    Operation::new("flat_map", OperationKind::Lazy),
    Operation::new("reduce", OperationKind::Terminal),
    Operation::new("fold", OperationKind::Terminal),
    Operation::new("to_vec", OperationKind::Terminal),
    Operation::new("for_each", OperationKind::Terminal),
    Operation::new("some", OperationKind::Terminal),
    Operation::new("every", OperationKind::Terminal),
    Operation::new("find", OperationKind::Terminal),
    Operation::new("to_async", OperationKind::Bridge),
];

/// The operations of async producers. There is no way back to the sync flavour.
pub const ASYNC_OPERATIONS: &[Operation] = &[
    Operation::new("map", OperationKind::Lazy),
    Operation::new("filter", OperationKind::Lazy),
    Operation::new("take", OperationKind::Lazy),
    Operation::new("skip", OperationKind::Lazy),
    Operation::new("flat_map", OperationKind::Lazy),
    Operation::new("reduce", OperationKind::Terminal),
    Operation::new("fold", OperationKind::Terminal),
    Operation::new("to_vec", OperationKind::Terminal),
    Operation::new("for_each", OperationKind::Terminal),
    Operation::new("some", OperationKind::Terminal),
    Operation::new("every", OperationKind::Terminal),
    Operation::new("find", OperationKind::Terminal),
];

/// Factories attached to the extended producer types rather than to their instances.
/// `from` is [`Extended::new`](crate::sync::producer::Extended::new).
const STATIC_FACTORIES: &[&str] = &["from"];

/// The installed operation set of one flavour.
#[derive(Debug)]
pub struct Prototype {
    flavour: Flavour,
    operations: &'static [Operation],
    tag: RwLock<String>,
}

impl Prototype {
    fn new(flavour: Flavour) -> Self {
        let (operations, tag) = match flavour {
            Flavour::Sync => (SYNC_OPERATIONS, "Producer"),
            Flavour::Async => (ASYNC_OPERATIONS, "AsyncProducer"),
        };

        Prototype {
            flavour,
            operations,
            tag: RwLock::new(tag.to_string()),
        }
    }

    pub fn flavour(&self) -> Flavour {
        self.flavour
    }

    pub fn operations(&self) -> &'static [Operation] {
        self.operations
    }

    /// Looks up an operation by name.
    pub fn operation(&self, name: &str) -> Option<&'static Operation> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.operation(name).is_some()
    }

    pub fn static_factories(&self) -> &'static [&'static str] {
        STATIC_FACTORIES
    }

    /// The tag producers of this flavour identify themselves with.
    pub fn to_string_tag(&self) -> String {
        self.tag
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the tag. Unlike the operations, the tag is writable.
    pub fn set_to_string_tag(&self, tag: impl Into<String>) {
        *self.tag.write().unwrap_or_else(PoisonError::into_inner) = tag.into();
    }
}

static SYNC_PROTOTYPE: OnceLock<Prototype> = OnceLock::new();
static ASYNC_PROTOTYPE: OnceLock<Prototype> = OnceLock::new();

fn slot(flavour: Flavour) -> &'static OnceLock<Prototype> {
    match flavour {
        Flavour::Sync => &SYNC_PROTOTYPE,
        Flavour::Async => &ASYNC_PROTOTYPE,
    }
}

/// Returns the installed prototype of a flavour, if any.
pub fn prototype(flavour: Flavour) -> Option<&'static Prototype> {
    slot(flavour).get()
}

/// Installs the prototype of a flavour.
///
/// Fails with [`InstallError::AlreadyInstalled`] if the prototype exists already, leaving the
/// existing one untouched. When several threads race, exactly one of them succeeds.
pub fn install_prototype(flavour: Flavour) -> Result<&'static Prototype, InstallError> {
    let mut installed = false;
    let proto = slot(flavour).get_or_init(|| {
        installed = true;
        Prototype::new(flavour)
    });

    if installed {
        debug!(
            %flavour,
            operations = proto.operations().len(),
            "installed producer prototype"
        );
        Ok(proto)
    } else {
        Err(InstallError::AlreadyInstalled(flavour))
    }
}

/// Installs the prototypes of both flavours, skipping those that are present already.
///
/// Calling this any number of times is fine.
pub fn install() {
    for flavour in [Flavour::Sync, Flavour::Async] {
        if prototype(flavour).is_some() {
            debug!(%flavour, skipped = true, "producer prototype already present");
            continue;
        }

        if let Err(err) = install_prototype(flavour) {
            debug!(%flavour, skipped = true, "{err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::convert::Infallible;

    use crate::common::producer::TestProducer;

    fn source() -> TestProducer<u8, (), Infallible> {
        TestProducer::new(vec![1, 2, 3], Ok(()))
    }

    // Calls the sync operation of the given name and returns how often it pulled.
    fn pulls_of_sync_operation(name: &str) -> usize {
        use crate::sync::ProducerExt;

        let mut p = source();
        match name {
            "map" => {
                let _ = (&mut p).map(|x, _| x);
            }
            "filter" => {
                let _ = (&mut p).filter(|_, _| true);
            }
            "take" => {
                let _ = (&mut p).take(1);
            }
            "skip" => {
                let _ = (&mut p).skip(1);
            }
            "flat_map" => {
                let _ = (&mut p).flat_map(|x, _| vec![x]);
            }
            "reduce" => {
                let _ = p.reduce(|a, b, _| a.max(b));
            }
            "fold" => {
                let _ = p.fold(0, |a, b, _| a + b);
            }
            "to_vec" => {
                let _ = p.to_vec();
            }
            "for_each" => {
                let _ = p.for_each(|_, _| {});
            }
            "some" => {
                let _ = p.some(|_, _| false);
            }
            "every" => {
                let _ = p.every(|_, _| true);
            }
            "find" => {
                let _ = p.find(|_, _| false);
            }
            "to_async" => {
                let _ = (&mut p).to_async();
            }
            other => panic!("no sync operation named `{other}`"),
        }
        p.pulls()
    }

    // Calls the async operation of the given name and returns how often it pulled.
    fn pulls_of_async_operation(name: &str) -> usize {
        use crate::local_nb::ProducerExt;

        let mut p = source();
        smol::block_on(async {
            match name {
                "map" => {
                    let _ = (&mut p).map(|x, _| x);
                }
                "filter" => {
                    let _ = (&mut p).filter(|_, _| true);
                }
                "take" => {
                    let _ = (&mut p).take(1);
                }
                "skip" => {
                    let _ = (&mut p).skip(1);
                }
                "flat_map" => {
                    let _ = (&mut p).flat_map(|x, _| vec![x]);
                }
                "reduce" => {
                    let _ = p.reduce(|a, b, _| a.max(b)).await;
                }
                "fold" => {
                    let _ = p.fold(0, |a, b, _| a + b).await;
                }
                "to_vec" => {
                    let _ = p.to_vec().await;
                }
                "for_each" => {
                    let _ = p.for_each(|_, _| {}).await;
                }
                "some" => {
                    let _ = p.some(|_, _| false).await;
                }
                "every" => {
                    let _ = p.every(|_, _| true).await;
                }
                "find" => {
                    let _ = p.find(|_, _| false).await;
                }
                other => panic!("no async operation named `{other}`"),
            }
        });
        p.pulls()
    }

    #[test]
    fn operation_tables_match_the_extension_traits() {
        for (operations, pulls_of) in [
            (SYNC_OPERATIONS, pulls_of_sync_operation as fn(&str) -> usize),
            (ASYNC_OPERATIONS, pulls_of_async_operation as fn(&str) -> usize),
        ] {
            for op in operations {
                let pulls = pulls_of(op.name());
                match op.kind() {
                    OperationKind::Lazy | OperationKind::Bridge => {
                        assert_eq!(pulls, 0, "`{}` must not pull", op.name())
                    }
                    OperationKind::Terminal => {
                        assert_eq!(pulls, 4, "`{}` must pull to the end", op.name())
                    }
                }
            }
        }

        for factory in STATIC_FACTORIES {
            match *factory {
                "from" => {
                    let mut p = crate::sync::producer::Extended::new(vec![1u8]);
                    assert_eq!(p.to_vec(), Ok(vec![1]));
                }
                other => panic!("no static factory named `{other}`"),
            }
        }
    }

    #[test]
    fn second_installation_fails() {
        install();
        assert_eq!(
            install_prototype(Flavour::Sync).err(),
            Some(InstallError::AlreadyInstalled(Flavour::Sync))
        );
        assert_eq!(
            install_prototype(Flavour::Async).err(),
            Some(InstallError::AlreadyInstalled(Flavour::Async))
        );
    }

    #[test]
    fn install_is_idempotent() {
        install();
        let first = prototype(Flavour::Async).map(|p| p as *const Prototype);
        install();
        let second = prototype(Flavour::Async).map(|p| p as *const Prototype);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn operation_tables() {
        install();
        let sync = prototype(Flavour::Sync).unwrap();
        let async_ = prototype(Flavour::Async).unwrap();

        assert_eq!(sync.flavour(), Flavour::Sync);
        assert_eq!(sync.operation("take").map(Operation::kind), Some(OperationKind::Lazy));
        assert_eq!(sync.operation("to_async").map(Operation::kind), Some(OperationKind::Bridge));
        assert!(!async_.has_operation("to_async"));
        assert_eq!(async_.operations().len() + 1, sync.operations().len());

        for op in sync.operations() {
            assert!(!op.is_writable());
            assert!(op.is_configurable());
        }

        assert_eq!(sync.static_factories(), &["from"]);
    }

    #[test]
    fn tag_is_writable() {
        install();
        let proto = prototype(Flavour::Async).unwrap();
        assert_eq!(proto.to_string_tag(), "AsyncProducer");

        proto.set_to_string_tag("Custom");
        assert_eq!(proto.to_string_tag(), "Custom");

        proto.set_to_string_tag("AsyncProducer");
        assert_eq!(proto.to_string_tag(), "AsyncProducer");
    }
}
