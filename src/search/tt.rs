//! Bucketed transposition table.
//!
//! Store policy: a write to a key already present replaces it when the new
//! entry is at least as deep or the stored one is from an older generation;
//! otherwise the first empty way is used; otherwise the way with the lowest
//! (depth, generation) is evicted. Entries are always replaced whole.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry<M> {
    pub key: u64,
    pub depth: u32,
    pub score: i32,
    pub best: Option<M>,
    pub bound: Bound,
    pub gen: u32,
}

impl<M> Entry<M> {
    /// Deep enough to be trusted for a cutoff at `depth`. A shallower entry
    /// is still useful for its move.
    pub fn usable_at(&self, depth: u32) -> bool { self.depth >= depth }
}

const WAYS: usize = 4;

#[derive(Clone, Copy)]
struct Bucket<M> {
    slots: [Option<Entry<M>>; WAYS],
}

impl<M: Copy> Default for Bucket<M> {
    fn default() -> Self { Self { slots: [None; WAYS] } }
}

pub struct Tt<M> {
    buckets: Vec<Bucket<M>>,
    gen: u32,
}

impl<M: Copy> Default for Tt<M> {
    fn default() -> Self { Self::with_capacity_entries(65_536) }
}

impl<M: Copy> Tt<M> {
    pub fn new() -> Self { Self::default() }

    pub fn with_capacity_entries(entries: usize) -> Self {
        let mut tt = Self { buckets: Vec::new(), gen: 0 };
        tt.set_capacity_entries(entries);
        tt
    }

    pub fn set_capacity_entries(&mut self, cap: usize) {
        let entries = cap.max(WAYS);
        let buckets = (entries + WAYS - 1) / WAYS;
        self.buckets.clear();
        self.buckets.resize_with(buckets, Bucket::default);
    }

    pub fn set_capacity_mb(&mut self, mb: usize) {
        let per_entry = std::mem::size_of::<Option<Entry<M>>>().max(1);
        let entries = (mb.saturating_mul(1024 * 1024) / per_entry).max(WAYS);
        self.set_capacity_entries(entries);
    }

    pub fn capacity(&self) -> usize { self.buckets.len() * WAYS }

    /// Drop every entry (between games).
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|b| *b = Bucket::default());
        self.gen = 0;
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.slots.iter().filter(|s| s.is_some()).count()).sum()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn bump_generation(&mut self) { self.gen = self.gen.wrapping_add(1); }

    fn bucket_index(&self, key: u64) -> usize {
        let mixed = key ^ (key >> 32);
        (mixed as usize) % self.buckets.len().max(1)
    }

    pub fn probe(&self, key: u64) -> Option<Entry<M>> {
        if self.buckets.is_empty() { return None; }
        let bucket = &self.buckets[self.bucket_index(key)];
        bucket.slots.iter().flatten().find(|e| e.key == key).copied()
    }

    pub fn store(&mut self, mut e: Entry<M>) {
        if self.buckets.is_empty() { return; }
        let gen = self.gen;
        e.gen = gen;
        let idx = self.bucket_index(e.key);
        let bucket = &mut self.buckets[idx];
        let same = bucket.slots.iter().position(|s| matches!(s, Some(cur) if cur.key == e.key));
        if let Some(i) = same {
            if let Some(cur) = bucket.slots[i] {
                if e.depth >= cur.depth || cur.gen != gen { bucket.slots[i] = Some(e); }
            }
            return;
        }
        if let Some(slot) = bucket.slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(e);
            return;
        }
        // lexicographic: shallowest first, then oldest
        let victim = bucket
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|cur| (i, (cur.depth, cur.gen))))
            .min_by_key(|&(_, k)| k)
            .map(|(i, _)| i)
            .unwrap_or(0);
        bucket.slots[victim] = Some(e);
    }
}
