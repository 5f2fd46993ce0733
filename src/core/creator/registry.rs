use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{LazyLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::creator::convert::FuncAsCreator;
use crate::core::creator::Creator;
use crate::core::error::{CreatorError, CreatorResult};
use crate::core::interfaceless::ContextFn;
use crate::core::schema::Schema;

/// A function that has not been turned into a Creator yet.
///
/// Wrapping is deferred until a schema is known, because the schema is part
/// of the registration contract.
pub trait CreatorFactory: Send + Sync {
    /// Wraps the function with `schema` as its declared output schema.
    fn build(&self, schema: &Schema) -> CreatorResult<Box<dyn Creator>>;

    /// Type name of the function, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Create a boxed clone of this trait object.
    fn clone_box(&self) -> Box<dyn CreatorFactory>;
}

impl Clone for Box<dyn CreatorFactory> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// [`CreatorFactory`] for any function with a classifiable signature.
pub struct FnFactory<F, Args> {
    func: F,
    _args: PhantomData<fn(Args)>,
}

impl<F, Args> FnFactory<F, Args>
where
    F: ContextFn<Args>,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            _args: PhantomData,
        }
    }
}

impl<F, Args> CreatorFactory for FnFactory<F, Args>
where
    F: ContextFn<Args>,
    Args: 'static,
{
    fn build(&self, schema: &Schema) -> CreatorResult<Box<dyn Creator>> {
        let creator = FuncAsCreator::from_func(self.func.clone(), schema)?;
        Ok(Box::new(creator))
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<F>()
    }

    fn clone_box(&self) -> Box<dyn CreatorFactory> {
        Box::new(FnFactory::<F, Args>::new(self.func.clone()))
    }
}

/// What a registered name points to.
#[derive(Clone)]
pub enum RegistryEntry {
    /// A Creator instance, e.g. a decorated function.
    Creator(Box<dyn Creator>),
    /// A bare function, wrapped on resolution.
    Function(Box<dyn CreatorFactory>),
}

/// Named functions and Creators that string expressions resolve against.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    entries: HashMap<String, RegistryEntry>,
}

static GLOBAL_REGISTRY: LazyLock<RwLock<FunctionRegistry>> =
    LazyLock::new(|| RwLock::new(FunctionRegistry::new()));

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by [`to_creator`](super::convert::to_creator).
    pub fn global() -> &'static RwLock<FunctionRegistry> {
        &GLOBAL_REGISTRY
    }

    /// Read access to the global registry. A poisoned lock is recovered.
    pub fn read_global() -> RwLockReadGuard<'static, FunctionRegistry> {
        GLOBAL_REGISTRY
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write access to the global registry. A poisoned lock is recovered.
    pub fn write_global() -> RwLockWriteGuard<'static, FunctionRegistry> {
        GLOBAL_REGISTRY
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a bare function under `name`.
    pub fn register_function<F, Args>(&mut self, name: &str, func: F) -> CreatorResult<()>
    where
        F: ContextFn<Args>,
        Args: 'static,
    {
        self.insert(name, RegistryEntry::Function(Box::new(FnFactory::new(func))))
    }

    /// Registers a Creator instance (e.g. a decorated function) under `name`.
    pub fn register_creator<C: Creator>(&mut self, name: &str, creator: C) -> CreatorResult<()> {
        self.insert(name, RegistryEntry::Creator(Box::new(creator)))
    }

    fn insert(&mut self, name: &str, entry: RegistryEntry) -> CreatorResult<()> {
        let key = normalize_expression(name)?;
        if self.entries.contains_key(&key) {
            log::warn!("Function '{}' is already registered, overwriting it.", key);
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Looks up an expression such as `"io.read_csv"` or `"io::read_csv"`.
    pub fn get(&self, expr: &str) -> CreatorResult<&RegistryEntry> {
        let key = normalize_expression(expr)?;
        self.entries
            .get(&key)
            .ok_or(CreatorError::UnknownFunction(key))
    }

    pub fn contains(&self, expr: &str) -> bool {
        self.get(expr).is_ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Registers a bare function in the global registry.
pub fn register_global_function<F, Args>(name: &str, func: F) -> CreatorResult<()>
where
    F: ContextFn<Args>,
    Args: 'static,
{
    FunctionRegistry::write_global().register_function(name, func)
}

/// Registers a Creator instance in the global registry.
pub fn register_global_creator<C: Creator>(name: &str, creator: C) -> CreatorResult<()> {
    FunctionRegistry::write_global().register_creator(name, creator)
}

/// Parses a function expression into its canonical dotted form.
///
/// Segments are identifiers separated by `.` or `::`, so `"io::csv.read"`
/// becomes `"io.csv.read"`.
pub fn normalize_expression(expr: &str) -> CreatorResult<String> {
    let invalid = || CreatorError::InvalidExpression(expr.to_string());
    let segments: Vec<&str> = expr
        .trim()
        .split("::")
        .flat_map(|part| part.split('.'))
        .collect();

    let is_identifier = |segment: &&str| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
            && chars.all(|c| c.is_alphanumeric() || c == '_')
    };
    if !segments.iter().all(is_identifier) {
        return Err(invalid());
    }
    Ok(segments.join("."))
}
