// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The generation-checked table mapping [`ObjectId`]s to backend objects.

use super::{BackendObject, DeviceObjectHandler, ObjectId};
use parking_lot::{Mutex, RwLock};
use slotmap::{new_key_type, Key, KeyData, SlotMap};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

new_key_type! { struct ObjectKey; }

static NEXT_REGISTRY_TAG: AtomicU32 = AtomicU32::new(1);

/// A tag no other registry of this process carries. Zero is never issued.
fn next_registry_tag() -> u32 {
    loop {
        let tag = NEXT_REGISTRY_TAG.fetch_add(1, Ordering::Relaxed);
        if tag != 0 {
            return tag;
        }
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters describing the content of an [`ObjectRegistry`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Objects that can currently be resolved.
    pub live: usize,
    /// Released objects waiting for the next flush.
    pub retired: usize,
    /// Objects registered since creation.
    pub registered_total: u64,
    /// Objects released since creation.
    pub released_total: u64,
}

/// Owns backend objects and hands out generation-checked ids for them.
///
/// Releasing an id retires it at once: every later resolve observes `None`.
/// The object itself is kept until [`ObjectRegistry::flush_retired`] runs,
/// which backends call at a point where the GPU can no longer be using it.
#[derive(Debug)]
pub struct ObjectRegistry {
    tag: u32,
    objects: RwLock<SlotMap<ObjectKey, Arc<dyn BackendObject>>>,
    retired: Mutex<Vec<(ObjectId, Arc<dyn BackendObject>)>>,
    registered_total: AtomicU64,
    released_total: AtomicU64,
}

impl ObjectRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            tag: next_registry_tag(),
            objects: RwLock::default(),
            retired: Mutex::default(),
            registered_total: AtomicU64::new(0),
            released_total: AtomicU64::new(0),
        }
    }

    /// The process-unique tag carried by every id this registry issues.
    pub fn tag(&self) -> u32 {
        self.tag
    }

    fn id_of(&self, key: ObjectKey) -> ObjectId {
        ObjectId::new(self.tag, key.data().as_ffi())
    }

    /// The slot named by `id`, or `None` for ids issued elsewhere.
    fn key_of(&self, id: ObjectId) -> Option<ObjectKey> {
        (id.is_valid() && id.registry() == self.tag).then(|| KeyData::from_ffi(id.key()).into())
    }

    /// Takes ownership of `object` and returns the id naming it.
    pub fn register(&self, object: Arc<dyn BackendObject>) -> ObjectId {
        self.register_with(|_| object)
    }

    /// Like [`register`](Self::register), for objects that need to know
    /// their own id at construction.
    pub fn register_with<F>(&self, build: F) -> ObjectId
    where
        F: FnOnce(ObjectId) -> Arc<dyn BackendObject>,
    {
        let key = self
            .objects
            .write()
            .insert_with_key(|key| build(self.id_of(key)));
        let id = self.id_of(key);
        self.registered_total.fetch_add(1, Ordering::Relaxed);
        log::trace!("Registered backend object {id:?}");
        id
    }

    /// Returns the live object named by `id`.
    pub fn resolve(&self, id: ObjectId) -> Option<Arc<dyn BackendObject>> {
        let key = self.key_of(id)?;
        self.objects.read().get(key).cloned()
    }

    /// Returns the live object named by `id` if it has the concrete type `T`.
    pub fn resolve_as<T: BackendObject>(&self, id: ObjectId) -> Option<Arc<T>> {
        self.resolve(id)?.into_any().downcast::<T>().ok()
    }

    /// Retires `id`. Returns `false` if it did not name a live object.
    pub fn release(&self, id: ObjectId) -> bool {
        let Some(key) = self.key_of(id) else {
            if id.is_valid() {
                log::warn!("Release of {id:?} issued by another registry");
            }
            return false;
        };
        let removed = self.objects.write().remove(key);
        match removed {
            Some(object) => {
                log::trace!("Retired backend object {id:?} ({})", object.debug_label());
                self.released_total.fetch_add(1, Ordering::Relaxed);
                self.retired.lock().push((id, object));
                true
            }
            None => {
                log::warn!("Release of unknown or already released object {id:?}");
                false
            }
        }
    }

    /// Drops every retired object. Returns how many were destroyed.
    pub fn flush_retired(&self) -> usize {
        let retired = std::mem::take(&mut *self.retired.lock());
        let count = retired.len();
        // Dropped outside the lock: a backend object may release others.
        drop(retired);
        if count > 0 {
            log::debug!("Destroyed {count} retired backend objects");
        }
        count
    }

    /// Destroys every object, live or retired. Used on device teardown.
    pub fn clear(&self) -> usize {
        let live: Vec<_> = self.objects.write().drain().map(|(_, object)| object).collect();
        let count = live.len();
        drop(live);
        count + self.flush_retired()
    }

    /// Number of objects that can currently be resolved.
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// `true` when no object can be resolved.
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// `true` when `id` names a live object.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.key_of(id)
            .is_some_and(|key| self.objects.read().contains_key(key))
    }

    /// A snapshot of the registry counters.
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            live: self.len(),
            retired: self.retired.lock().len(),
            registered_total: self.registered_total.load(Ordering::Relaxed),
            released_total: self.released_total.load(Ordering::Relaxed),
        }
    }
}

impl DeviceObjectHandler for ObjectRegistry {
    fn resolve_internal_object(&self, id: ObjectId) -> Option<Arc<dyn BackendObject>> {
        self.resolve(id)
    }

    fn release_object(&self, id: ObjectId) {
        self.release(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::thread;

    #[derive(Debug)]
    struct Dummy(&'static str);

    impl BackendObject for Dummy {
        fn debug_label(&self) -> &str {
            self.0
        }
        fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    #[derive(Debug)]
    struct Other;

    impl BackendObject for Other {
        fn debug_label(&self) -> &str {
            "other"
        }
        fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    #[test]
    fn register_and_resolve() {
        let registry = ObjectRegistry::new();
        let id = registry.register(Arc::new(Dummy("a")));
        assert!(id.is_valid());
        assert_eq!(registry.resolve(id).unwrap().debug_label(), "a");
        assert!(registry.resolve_as::<Dummy>(id).is_some());
        assert!(registry.resolve_as::<Other>(id).is_none());
    }

    #[test]
    fn register_with_sees_own_id() {
        let registry = ObjectRegistry::new();
        let mut seen = ObjectId::INVALID;
        let id = registry.register_with(|own| {
            seen = own;
            Arc::new(Dummy("self-aware"))
        });
        assert_eq!(seen, id);
    }

    #[test]
    fn released_id_resolves_to_none_and_is_never_reused() {
        let registry = ObjectRegistry::new();
        let first = registry.register(Arc::new(Dummy("first")));
        assert!(registry.release(first));
        assert!(registry.resolve(first).is_none());
        assert!(!registry.release(first));

        // Same slot, new generation.
        let second = registry.register(Arc::new(Dummy("second")));
        assert_ne!(first, second);
        assert!(registry.resolve(first).is_none());
        assert_eq!(registry.resolve(second).unwrap().debug_label(), "second");
    }

    #[test]
    fn ids_do_not_cross_registries() {
        let left = ObjectRegistry::new();
        let right = ObjectRegistry::new();
        assert_ne!(left.tag(), right.tag());

        let a = left.register(Arc::new(Dummy("left")));
        let b = right.register(Arc::new(Dummy("right")));
        assert_ne!(a, b);
        assert!(right.resolve(a).is_none());
        assert!(!right.contains(a));
        assert!(!right.release(a));
        assert!(left.contains(a));
        assert_eq!(right.resolve(b).unwrap().debug_label(), "right");
    }

    #[test]
    fn retired_objects_live_until_flush() {
        let registry = ObjectRegistry::new();
        let object: Arc<dyn BackendObject> = Arc::new(Dummy("deferred"));
        let weak = Arc::downgrade(&object);
        let id = registry.register(object);

        registry.release(id);
        assert!(weak.upgrade().is_some());
        assert_eq!(registry.stats().retired, 1);

        assert_eq!(registry.flush_retired(), 1);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn clear_destroys_everything() {
        let registry = ObjectRegistry::new();
        let a = registry.register(Arc::new(Dummy("a")));
        registry.register(Arc::new(Dummy("b")));
        registry.release(a);
        assert_eq!(registry.clear(), 2);
        assert!(registry.is_empty());
        let stats = registry.stats();
        assert_eq!(stats.registered_total, 2);
        assert_eq!(stats.released_total, 1);
        assert_eq!(stats.retired, 0);
    }

    #[test]
    fn invalid_id_never_resolves() {
        let registry = ObjectRegistry::new();
        assert!(registry.resolve(ObjectId::INVALID).is_none());
        assert!(!registry.release(ObjectId::INVALID));
        assert!(!registry.contains(ObjectId::INVALID));
    }

    #[test]
    fn concurrent_release_and_resolve_observe_clean_state() {
        let registry = Arc::new(ObjectRegistry::new());
        let ids: Vec<_> = (0..256)
            .map(|_| registry.register(Arc::new(Dummy("racy"))))
            .collect();

        let resolver = {
            let registry = Arc::clone(&registry);
            let ids = ids.clone();
            thread::spawn(move || {
                for _ in 0..8 {
                    for id in &ids {
                        if let Some(object) = registry.resolve(*id) {
                            assert_eq!(object.debug_label(), "racy");
                        }
                    }
                }
            })
        };
        for id in &ids {
            registry.release(*id);
        }
        resolver.join().unwrap();

        assert!(registry.is_empty());
        assert!(ids.iter().all(|id| registry.resolve(*id).is_none()));
    }
}
