pub type BuildHasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

pub type IndexSet<V> = indexmap::IndexSet<V, BuildHasher>;

pub type PriorityQueue<P, V> = priority_queue::PriorityQueue<V, P, BuildHasher>;
