use crate::set_membership::SetMembership;
use std::collections::HashSet;

impl SetMembership for HashSet<Vec<u8>> {
    fn contains<T: AsRef<[u8]> + ?Sized>(&self, item: &T) -> bool {
        HashSet::contains(self, item.as_ref())
    }

    fn insert<T: AsRef<[u8]> + ?Sized>(&mut self, item: &T) -> bool {
        HashSet::insert(self, item.as_ref().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_membership() {
        let mut set: HashSet<Vec<u8>> = HashSet::new();

        assert!(SetMembership::insert(&mut set, "admin123"));
        assert!(!SetMembership::insert(&mut set, "admin123"));
        assert!(SetMembership::contains(&set, "admin123"));
        assert!(!SetMembership::contains(&set, "guest"));
    }
}
