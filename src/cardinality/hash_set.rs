use crate::cardinality::Cardinality;
use std::collections::HashSet;

impl Cardinality for HashSet<Vec<u8>> {
    fn estimate(&self) -> f64 {
        self.len() as f64
    }

    fn insert<T: AsRef<[u8]> + ?Sized>(&mut self, item: &T) {
        HashSet::insert(self, item.as_ref().to_vec());
    }
}
