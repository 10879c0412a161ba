// src/weak_ptr.rs

//! Guarded weak handles
//!
//! A `WeakPtrGuard` lives next to a resource (usually inside a `Sack`) and
//! keeps a registry of every handle pointing into that resource. Clearing or
//! dropping the guard invalidates all registered handles at once, after which
//! dereferencing them fails with `Error::InvalidatedReference`.
//!
//! Two handle kinds exist:
//!
//! - `WeakPtr<T>` observes an item owned by someone else
//! - `SnapshotPtr<T>` owns a private deep copy of an item but is still tied
//!   to the guard, so it expires together with the resource it came from
//!
//! Registration is serialized by a mutex inside the guard, so handles may be
//! created, cloned, dereferenced and dropped from several threads. Items are
//! reached through `std::sync::Weak`, which means even a guard torn down
//! concurrently can only produce an error, never a dangling read.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    entries: HashMap<u64, Arc<AtomicBool>>,
}

#[derive(Debug, Default)]
struct GuardShared {
    registry: Mutex<Registry>,
}

impl GuardShared {
    fn lock(&self) -> MutexGuard<'_, Registry> {
        // the registry holds no invariant a panicking thread could break
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(self: &Arc<Self>) -> Registration {
        let mut registry = self.lock();
        Self::insert(self, &mut registry)
    }

    /// Register a copy of `source`, unless `source` was already invalidated
    fn register_like(self: &Arc<Self>, source: &Registration) -> Registration {
        let mut registry = self.lock();
        if source.alive.load(Ordering::Acquire) {
            Self::insert(self, &mut registry)
        } else {
            Registration {
                shared: Arc::clone(self),
                id: u64::MAX,
                alive: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    fn insert(self: &Arc<Self>, registry: &mut Registry) -> Registration {
        let id = registry.next_id;
        registry.next_id += 1;
        let alive = Arc::new(AtomicBool::new(true));
        registry.entries.insert(id, Arc::clone(&alive));
        Registration {
            shared: Arc::clone(self),
            id,
            alive,
        }
    }
}

/// A handle's entry in its guard's registry
#[derive(Debug)]
struct Registration {
    shared: Arc<GuardShared>,
    id: u64,
    alive: Arc<AtomicBool>,
}

impl Registration {
    fn is_valid(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    fn duplicate(&self) -> Self {
        self.shared.register_like(self)
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if self.is_valid() {
            self.shared.lock().entries.remove(&self.id);
        }
    }
}

/// Registry that invalidates every handle issued for a resource
///
/// The guard does not own the resource. It is neither `Clone` nor movable
/// out of its owner in any meaningful way: handles refer to the registry,
/// not to the guard value.
pub struct WeakPtrGuard<T> {
    shared: Arc<GuardShared>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> WeakPtrGuard<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(GuardShared::default()),
            _marker: PhantomData,
        }
    }

    /// Returns true if no handle is registered
    pub fn is_empty(&self) -> bool {
        self.shared.lock().entries.is_empty()
    }

    /// Number of registered handles
    pub fn len(&self) -> usize {
        self.shared.lock().entries.len()
    }

    /// Invalidate and forget every registered handle
    ///
    /// Handles created afterwards register normally.
    pub fn clear(&self) {
        let mut registry = self.shared.lock();
        for alive in registry.entries.values() {
            alive.store(false, Ordering::Release);
        }
        registry.entries.clear();
    }
}

impl<T> Default for WeakPtrGuard<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for WeakPtrGuard<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> fmt::Debug for WeakPtrGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakPtrGuard").field("registered", &self.len()).finish()
    }
}

/// Observing handle to an item owned elsewhere
///
/// Equality, ordering and hashing use the identity of the referenced item,
/// so two handles to the same item compare equal regardless of validity.
pub struct WeakPtr<T> {
    ptr: Weak<T>,
    registration: Registration,
}

impl<T> WeakPtr<T> {
    /// Create a handle to `item` registered at `guard`
    pub fn new(item: &Arc<T>, guard: &WeakPtrGuard<T>) -> Self {
        Self {
            ptr: Arc::downgrade(item),
            registration: guard.shared.register(),
        }
    }

    /// Checks if the referenced item is still reachable
    pub fn is_valid(&self) -> bool {
        self.registration.is_valid() && self.ptr.strong_count() > 0
    }

    /// Access the referenced item
    ///
    /// The returned `Arc` shares ownership: while the caller holds it the
    /// item outlives its sack. Prefer `with` for short reads.
    pub fn get(&self) -> Result<Arc<T>> {
        if !self.registration.is_valid() {
            return Err(Error::InvalidatedReference);
        }
        self.ptr.upgrade().ok_or(Error::InvalidatedReference)
    }

    /// Run `f` on a borrow of the referenced item
    ///
    /// No ownership leaves the call, so the item can be freed with its sack
    /// as soon as `f` returns.
    pub fn with<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&T) -> R,
    {
        let item = self.get()?;
        Ok(f(&item))
    }

    /// Access the referenced item, treating an invalidated handle as a bug
    ///
    /// # Panics
    ///
    /// Panics if the handle was invalidated.
    pub fn value(&self) -> Arc<T> {
        match self.get() {
            Ok(item) => item,
            Err(e) => panic!("{}", e),
        }
    }

    /// Checks if both handles were issued by the same guard
    pub fn has_same_guard(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.registration.shared, &other.registration.shared)
    }

    /// Deep-copy the referenced item into an owning handle bound to the
    /// same guard
    pub fn snapshot(&self) -> Result<SnapshotPtr<T>>
    where
        T: Clone,
    {
        let item = self.get()?;
        Ok(SnapshotPtr {
            value: Box::new(T::clone(&item)),
            registration: self.registration.duplicate(),
        })
    }

    fn addr(&self) -> *const T {
        self.ptr.as_ptr()
    }
}

impl<T> Clone for WeakPtr<T> {
    fn clone(&self) -> Self {
        Self {
            ptr: Weak::clone(&self.ptr),
            registration: self.registration.duplicate(),
        }
    }
}

impl<T> PartialEq for WeakPtr<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl<T> Eq for WeakPtr<T> {}

impl<T> PartialOrd for WeakPtr<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for WeakPtr<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.addr().cmp(&other.addr())
    }
}

impl<T> Hash for WeakPtr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<T> fmt::Debug for WeakPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakPtr")
            .field("ptr", &self.addr())
            .field("valid", &self.is_valid())
            .finish()
    }
}

/// Owning handle holding a private copy of an item
///
/// Cloning deep-copies the value and registers the copy independently. The
/// copy stays readable only while the guard it was registered at is alive.
pub struct SnapshotPtr<T: Clone> {
    value: Box<T>,
    registration: Registration,
}

impl<T: Clone> SnapshotPtr<T> {
    /// Take ownership of `value` and register it at `guard`
    pub fn new(value: T, guard: &WeakPtrGuard<T>) -> Self {
        Self {
            value: Box::new(value),
            registration: guard.shared.register(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.registration.is_valid()
    }

    /// Access the owned copy
    pub fn get(&self) -> Result<&T> {
        if self.is_valid() {
            Ok(&self.value)
        } else {
            Err(Error::InvalidatedReference)
        }
    }

    /// Mutable access to the owned copy; the original item is unaffected
    pub fn get_mut(&mut self) -> Result<&mut T> {
        if self.is_valid() {
            Ok(&mut self.value)
        } else {
            Err(Error::InvalidatedReference)
        }
    }

    pub fn has_same_guard(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.registration.shared, &other.registration.shared)
    }
}

impl<T: Clone> Clone for SnapshotPtr<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            registration: self.registration.duplicate(),
        }
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for SnapshotPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotPtr")
            .field("value", &self.value)
            .field("valid", &self.is_valid())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_lifecycle() {
        let guard = WeakPtrGuard::new();
        let item = Arc::new(42);
        assert!(guard.is_empty());

        let ptr = WeakPtr::new(&item, &guard);
        assert_eq!(guard.len(), 1);
        assert!(ptr.is_valid());
        assert_eq!(*ptr.get().unwrap(), 42);

        let copy = ptr.clone();
        assert_eq!(guard.len(), 2);
        assert_eq!(copy, ptr);
        assert!(copy.has_same_guard(&ptr));

        drop(copy);
        assert_eq!(guard.len(), 1);
        drop(ptr);
        assert!(guard.is_empty());
    }

    #[test]
    fn test_clear_invalidates() {
        let guard = WeakPtrGuard::new();
        let item = Arc::new(String::from("x"));
        let ptr = WeakPtr::new(&item, &guard);

        guard.clear();
        assert!(guard.is_empty());
        assert!(!ptr.is_valid());
        assert!(matches!(ptr.get(), Err(Error::InvalidatedReference)));

        // copies of an invalid handle stay invalid and unregistered
        let copy = ptr.clone();
        assert!(!copy.is_valid());
        assert!(guard.is_empty());

        // the guard keeps working for new handles
        let fresh = WeakPtr::new(&item, &guard);
        assert!(fresh.is_valid());
        assert_eq!(guard.len(), 1);
        assert_eq!(fresh, ptr);
    }

    #[test]
    fn test_guard_drop_invalidates() {
        let item = Arc::new(1u32);
        let guard = WeakPtrGuard::new();
        let ptr = WeakPtr::new(&item, &guard);
        drop(guard);
        assert!(!ptr.is_valid());
        assert!(ptr.get().is_err());
    }

    #[test]
    fn test_with_borrows_without_keeping_item() {
        let guard = WeakPtrGuard::new();
        let item = Arc::new(String::from("bash"));
        let ptr = WeakPtr::new(&item, &guard);

        assert_eq!(ptr.with(|name| name.len()).unwrap(), 4);
        assert_eq!(Arc::strong_count(&item), 1);

        drop(item);
        assert!(matches!(ptr.with(|name| name.clone()), Err(Error::InvalidatedReference)));

        let item = Arc::new(String::from("zsh"));
        let ptr = WeakPtr::new(&item, &guard);
        guard.clear();
        assert!(matches!(ptr.with(String::len), Err(Error::InvalidatedReference)));
    }

    #[test]
    fn test_item_drop_invalidates() {
        let guard = WeakPtrGuard::new();
        let item = Arc::new(1u32);
        let ptr = WeakPtr::new(&item, &guard);
        drop(item);
        assert!(!ptr.is_valid());
        assert!(matches!(ptr.get(), Err(Error::InvalidatedReference)));
    }

    #[test]
    #[should_panic(expected = "invalidated")]
    fn test_value_panics_when_invalid() {
        let guard = WeakPtrGuard::new();
        let item = Arc::new(1u32);
        let ptr = WeakPtr::new(&item, &guard);
        guard.clear();
        let _ = ptr.value();
    }

    #[test]
    fn test_ordering_follows_identity() {
        let guard = WeakPtrGuard::new();
        let a = Arc::new(5);
        let b = Arc::new(5);
        let pa = WeakPtr::new(&a, &guard);
        let pb = WeakPtr::new(&b, &guard);
        assert_ne!(pa, pb);
        assert_eq!(pa.cmp(&pb), Arc::as_ptr(&a).cmp(&Arc::as_ptr(&b)));
    }

    #[test]
    fn test_different_guards() {
        let g1 = WeakPtrGuard::new();
        let g2 = WeakPtrGuard::new();
        let item = Arc::new(0);
        let p1 = WeakPtr::new(&item, &g1);
        let p2 = WeakPtr::new(&item, &g2);
        assert!(!p1.has_same_guard(&p2));
        g1.clear();
        assert!(!p1.is_valid());
        assert!(p2.is_valid());
    }

    #[test]
    fn test_snapshot_is_decoupled() {
        let guard = WeakPtrGuard::new();
        let item = Arc::new(vec![1, 2]);
        let ptr = WeakPtr::new(&item, &guard);

        let mut snap = ptr.snapshot().unwrap();
        assert_eq!(guard.len(), 2);
        snap.get_mut().unwrap().push(3);
        assert_eq!(snap.get().unwrap(), &vec![1, 2, 3]);
        assert_eq!(*item, vec![1, 2]);

        let copy = snap.clone();
        assert_eq!(guard.len(), 3);
        assert!(copy.has_same_guard(&snap));

        guard.clear();
        assert!(snap.get().is_err());
        assert!(copy.get().is_err());
    }

    #[test]
    fn test_snapshot_new() {
        let guard = WeakPtrGuard::new();
        let snap = SnapshotPtr::new(String::from("owned"), &guard);
        assert_eq!(snap.get().unwrap(), "owned");
        drop(snap);
        assert!(guard.is_empty());
    }
}
