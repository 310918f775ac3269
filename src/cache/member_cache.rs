use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;
use tracing::{debug, trace};

use crate::core::{MapError, Result};
use crate::reflect::{Entity, MemberHandle, Reflect, TypeIdent, TypeInfo};

// Process-wide cache for callers that do not inject their own
lazy_static! {
    static ref GLOBAL_CACHE: Arc<MemberCache> = Arc::new(MemberCache::new());
}

type MemberMap = HashMap<String, Arc<MemberHandle>>;

/// Resolved members keyed by (type identity, member name).
///
/// Entries are never evicted: a type's member table cannot change while the
/// process runs. Every key maps to exactly one handle for the lifetime of the
/// cache, even when several threads miss on it at the same time.
#[derive(Default)]
pub struct MemberCache {
    entries: RwLock<HashMap<TypeIdent, MemberMap>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub types: usize,
    pub members: usize,
}

impl MemberCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the process-wide cache
    pub fn global() -> &'static Arc<MemberCache> {
        &GLOBAL_CACHE
    }

    /// Resolves `member` on `T`.
    pub fn resolve<T: Reflect>(&self, member: &str) -> Result<Arc<MemberHandle>> {
        self.resolve_with(TypeIdent::of::<T>(), member, TypeInfo::of::<T>)
    }

    /// Resolves `member` on the runtime type of `entity`.
    pub fn resolve_entity(&self, entity: &dyn Entity, member: &str) -> Result<Arc<MemberHandle>> {
        self.resolve_with(entity.type_ident(), member, || entity.introspect())
    }

    fn resolve_with<F>(&self, ident: TypeIdent, member: &str, introspect: F) -> Result<Arc<MemberHandle>>
    where
        F: FnOnce() -> TypeInfo,
    {
        if let Some(handle) = self.lookup(&ident, member)? {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(type_name = ident.full_name(), member, "member cache hit");
            return Ok(handle);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let info = introspect();
        let handle = info
            .find_member(member)
            .cloned()
            .ok_or_else(|| MapError::MemberNotFound {
                type_name: ident.full_name().to_string(),
                member: member.to_string(),
            })?;

        let mut entries = self.entries.write()?;
        // A racing thread may have stored the member first; its handle wins.
        let stored = entries
            .entry(ident)
            .or_default()
            .entry(member.to_string())
            .or_insert_with(|| Arc::new(handle))
            .clone();

        debug!(
            type_name = ident.full_name(),
            member,
            kind = ?stored.kind(),
            "resolved entity member"
        );
        Ok(stored)
    }

    fn lookup(&self, ident: &TypeIdent, member: &str) -> Result<Option<Arc<MemberHandle>>> {
        let entries = self.entries.read()?;
        Ok(entries
            .get(ident)
            .and_then(|members| members.get(member))
            .cloned())
    }

    pub fn contains(&self, ident: &TypeIdent, member: &str) -> bool {
        matches!(self.lookup(ident, member), Ok(Some(_)))
    }

    /// Number of cached members across all types
    pub fn len(&self) -> Result<usize> {
        let entries = self.entries.read()?;
        Ok(entries.values().map(HashMap::len).sum::<usize>())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Drops every cached handle. Handles already given out stay valid.
    pub fn clear(&self) -> Result<()> {
        self.entries.write()?.clear();
        Ok(())
    }

    pub fn stats(&self) -> Result<CacheStats> {
        let entries = self.entries.read()?;

        Ok(CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            types: entries.len(),
            members: entries.values().map(HashMap::len).sum::<usize>(),
        })
    }
}
