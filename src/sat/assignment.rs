//! Bit-per-variable truth assignments.

use std::fmt;

use rand::Rng;

use super::types::VarId;

const WORD_BITS: usize = 64;

/// One boolean per variable, addressed by 1-based id.
///
/// Values are packed into 64-bit words where bit `id` holds variable `id`;
/// bit 0 is unused and always clear, as are bits past the last variable, so
/// derived equality is structural.
///
/// # Examples
///
/// ```
/// use u_maxwsat::sat::Assignment;
///
/// let mut a = Assignment::all_false(4);
/// a.flip(4);
/// a.flip(1);
/// assert_eq!(a.to_bools(), vec![true, false, false, true]);
/// assert_eq!(a.true_ids().collect::<Vec<_>>(), vec![1, 4]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    words: Vec<u64>,
    len: usize,
}

impl Assignment {
    /// Every variable set to `value`.
    pub fn new(len: usize, value: bool) -> Self {
        let mut assignment = Self {
            words: vec![0; word_count(len)],
            len,
        };
        if value {
            for id in 1..=len {
                assignment.set(id, true);
            }
        }
        assignment
    }

    pub fn all_false(len: usize) -> Self {
        Self::new(len, false)
    }

    pub fn all_true(len: usize) -> Self {
        Self::new(len, true)
    }

    /// `values[0]` becomes variable 1.
    pub fn from_bools(values: &[bool]) -> Self {
        let mut assignment = Self::all_false(values.len());
        for (i, &value) in values.iter().enumerate() {
            assignment.set(i + 1, value);
        }
        assignment
    }

    /// Each variable drawn independently, one 64-bit draw per variable.
    pub fn random<R: Rng>(len: usize, rng: &mut R) -> Self {
        let mut assignment = Self::all_false(len);
        for id in 1..=len {
            if rng.next_u64() % 2 == 1 {
                assignment.set(id, true);
            }
        }
        assignment
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, id: VarId) -> bool {
        self.check_id(id);
        (self.words[id / WORD_BITS] >> (id % WORD_BITS)) & 1 == 1
    }

    pub fn set(&mut self, id: VarId, value: bool) {
        self.check_id(id);
        let mask = 1u64 << (id % WORD_BITS);
        if value {
            self.words[id / WORD_BITS] |= mask;
        } else {
            self.words[id / WORD_BITS] &= !mask;
        }
    }

    /// Toggles variable `id` and returns its new value.
    pub fn flip(&mut self, id: VarId) -> bool {
        self.check_id(id);
        let word = &mut self.words[id / WORD_BITS];
        *word ^= 1u64 << (id % WORD_BITS);
        (*word >> (id % WORD_BITS)) & 1 == 1
    }

    /// Values in id order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (1..=self.len).map(|id| self.get(id))
    }

    pub fn to_bools(&self) -> Vec<bool> {
        self.iter().collect()
    }

    /// Ids of variables set to true, ascending.
    pub fn true_ids(&self) -> impl Iterator<Item = VarId> + '_ {
        self.words
            .iter()
            .enumerate()
            .flat_map(|(i, &word)| SetBits::new(word, i * WORD_BITS))
    }

    pub fn count_true(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Ids on which `self` and `other` disagree, ascending.
    ///
    /// # Panics
    ///
    /// Panics if the assignments have different lengths.
    pub fn differing_ids<'a>(&'a self, other: &'a Assignment) -> impl Iterator<Item = VarId> + 'a {
        assert_eq!(self.len, other.len, "assignments differ in length");
        self.words
            .iter()
            .zip(&other.words)
            .enumerate()
            .flat_map(|(i, (a, b))| SetBits::new(a ^ b, i * WORD_BITS))
    }

    /// Number of variables on which `self` and `other` disagree.
    pub fn hamming_distance(&self, other: &Assignment) -> usize {
        assert_eq!(self.len, other.len, "assignments differ in length");
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a ^ b).count_ones() as usize)
            .sum()
    }

    fn check_id(&self, id: VarId) {
        assert!(
            id >= 1 && id <= self.len,
            "variable id {id} outside 1..={}",
            self.len
        );
    }
}

impl fmt::Debug for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Assignment({self})")
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for value in self.iter() {
            f.write_str(if value { "1" } else { "0" })?;
        }
        Ok(())
    }
}

fn word_count(len: usize) -> usize {
    // slot 0 is reserved
    (len + 1).div_ceil(WORD_BITS)
}

/// Iterates the positions of set bits in one word.
struct SetBits {
    word: u64,
    base: usize,
}

impl SetBits {
    fn new(word: u64, base: usize) -> Self {
        Self { word, base }
    }
}

impl Iterator for SetBits {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.word == 0 {
            return None;
        }
        let bit = self.word.trailing_zeros() as usize;
        self.word &= self.word - 1;
        Some(self.base + bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomSource;

    #[test]
    fn test_new_values() {
        let f = Assignment::all_false(70);
        assert_eq!(f.len(), 70);
        assert!(f.iter().all(|v| !v));
        let t = Assignment::all_true(70);
        assert!(t.iter().all(|v| v));
        assert_eq!(t.count_true(), 70);
        assert_eq!(t.true_ids().last(), Some(70));
    }

    #[test]
    fn test_word_boundaries() {
        let mut a = Assignment::all_false(200);
        for id in [1, 63, 64, 65, 127, 128, 200] {
            assert!(a.flip(id));
            assert!(a.get(id));
        }
        assert_eq!(
            a.true_ids().collect::<Vec<_>>(),
            vec![1, 63, 64, 65, 127, 128, 200]
        );
        assert!(!a.flip(64));
        assert!(!a.get(64));
    }

    #[test]
    fn test_structural_equality() {
        let mut a = Assignment::all_false(5);
        a.set(2, true);
        a.set(5, true);
        let b = Assignment::from_bools(&[false, true, false, false, true]);
        assert_eq!(a, b);
        a.set(5, false);
        assert_ne!(a, b);
    }

    #[test]
    fn test_differing_ids() {
        let a = Assignment::from_bools(&[true, false, true, false]);
        let b = Assignment::from_bools(&[true, true, false, false]);
        assert_eq!(a.differing_ids(&b).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(a.hamming_distance(&b), 2);
        assert_eq!(a.hamming_distance(&a), 0);
    }

    #[test]
    #[should_panic(expected = "differ in length")]
    fn test_differing_lengths_panic() {
        Assignment::all_false(3).hamming_distance(&Assignment::all_false(4));
    }

    #[test]
    #[should_panic]
    fn test_id_zero_panics() {
        Assignment::all_false(3).get(0);
    }

    #[test]
    #[should_panic]
    fn test_id_past_end_panics() {
        let mut a = Assignment::all_false(3);
        a.flip(4);
    }

    #[test]
    fn test_random_is_reproducible() {
        let a = Assignment::random(100, &mut RandomSource::from_seed(1));
        let b = Assignment::random(100, &mut RandomSource::from_seed(1));
        assert_eq!(a, b);
        // 100 fair coin draws are all-equal with negligible probability
        assert!(a.count_true() > 0 && a.count_true() < 100);
    }

    #[test]
    fn test_display() {
        let a = Assignment::from_bools(&[true, false, false, true]);
        assert_eq!(a.to_string(), "1001");
        assert_eq!(format!("{a:?}"), "Assignment(1001)");
    }
}
