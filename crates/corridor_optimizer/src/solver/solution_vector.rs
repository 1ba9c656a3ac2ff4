use fixedbitset::FixedBitSet;
use rand::Rng;

/// Binary assignment of every selection variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SolutionVector {
    bits: FixedBitSet,
}

impl SolutionVector {
    /// All variables set to 0.
    pub fn new(len: usize) -> Self {
        SolutionVector {
            bits: FixedBitSet::with_capacity(len),
        }
    }

    pub fn random(len: usize, rng: &mut impl Rng) -> Self {
        let mut solution = SolutionVector::new(len);
        for variable in 0..len {
            solution.bits.set(variable, rng.random_bool(0.5));
        }
        solution
    }

    pub fn from_bits(bits: &[bool]) -> Self {
        let mut solution = SolutionVector::new(bits.len());
        for (variable, &value) in bits.iter().enumerate() {
            solution.bits.set(variable, value);
        }
        solution
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.len() == 0
    }

    pub fn get(&self, variable: usize) -> bool {
        self.bits.contains(variable)
    }

    pub fn set(&mut self, variable: usize, value: bool) {
        self.bits.set(variable, value);
    }

    pub fn flip(&mut self, variable: usize) {
        self.bits.toggle(variable);
    }

    /// Indices of the variables set to 1, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.ones()
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_and_ones() {
        let mut solution = SolutionVector::from_bits(&[true, false, true, false]);
        solution.flip(1);
        solution.flip(2);

        assert_eq!(solution.ones().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(solution.count_ones(), 2);
        assert_eq!(solution.len(), 4);
    }
}
