use fxhash::FxHashMap;

use crate::solver::solution_vector::SolutionVector;

/// Quadratic binary objective
/// `E(x) = offset + Σ_i Q_ii x_i + Σ_{i<j} Q_ij x_i x_j`.
///
/// Couplings are stored on both endpoints, sorted by neighbor, so the
/// coefficient lookup is symmetric by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct QuboModel {
    linear: Vec<f64>,
    adjacency: Vec<Vec<(usize, f64)>>,
    interaction_count: usize,
    offset: f64,
}

impl QuboModel {
    pub fn num_variables(&self) -> usize {
        self.linear.len()
    }

    pub fn num_interactions(&self) -> usize {
        self.interaction_count
    }

    pub fn is_degenerate(&self) -> bool {
        self.linear.is_empty()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn linear(&self, variable: usize) -> f64 {
        self.linear[variable]
    }

    pub fn coefficient(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return self.linear[i];
        }

        let neighbors = &self.adjacency[i];
        neighbors
            .binary_search_by_key(&j, |&(neighbor, _)| neighbor)
            .map_or(0.0, |position| neighbors[position].1)
    }

    pub fn neighbors(&self, variable: usize) -> &[(usize, f64)] {
        &self.adjacency[variable]
    }

    /// Every coupling once, as `(i, j, Q_ij)` with `i < j`.
    pub fn interactions(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, neighbors)| {
                neighbors
                    .iter()
                    .filter(move |&&(j, _)| j > i)
                    .map(move |&(j, value)| (i, j, value))
            })
    }

    pub fn energy(&self, solution: &SolutionVector) -> f64 {
        let mut energy = self.offset;
        for i in solution.ones() {
            energy += self.linear[i];
            for &(j, value) in &self.adjacency[i] {
                if j > i && solution.get(j) {
                    energy += value;
                }
            }
        }
        energy
    }

    /// `Q_ii + Σ_j Q_ij x_j`, the energy change of setting `variable` to 1.
    pub fn local_field(&self, variable: usize, solution: &SolutionVector) -> f64 {
        self.adjacency[variable]
            .iter()
            .filter(|&&(j, _)| solution.get(j))
            .fold(self.linear[variable], |field, &(_, value)| field + value)
    }

    pub fn flip_delta(&self, variable: usize, solution: &SolutionVector) -> f64 {
        let field = self.local_field(variable, solution);
        if solution.get(variable) { -field } else { field }
    }

    /// Upper bound of `|flip_delta|` for `variable` over all assignments.
    pub fn field_bound(&self, variable: usize) -> f64 {
        self.adjacency[variable]
            .iter()
            .fold(self.linear[variable].abs(), |bound, &(_, value)| {
                bound + value.abs()
            })
    }

    pub fn max_field_bound(&self) -> f64 {
        (0..self.num_variables())
            .map(|variable| self.field_bound(variable))
            .fold(0.0, f64::max)
    }

    pub fn min_nonzero_coefficient(&self) -> Option<f64> {
        self.linear
            .iter()
            .copied()
            .chain(self.interactions().map(|(_, _, value)| value))
            .map(f64::abs)
            .filter(|&value| value > 0.0)
            .min_by(f64::total_cmp)
    }
}

pub struct QuboModelBuilder {
    linear: Vec<f64>,
    quadratic: FxHashMap<(usize, usize), f64>,
    offset: f64,
}

impl QuboModelBuilder {
    pub fn new(num_variables: usize) -> Self {
        QuboModelBuilder {
            linear: vec![0.0; num_variables],
            quadratic: FxHashMap::default(),
            offset: 0.0,
        }
    }

    pub fn num_variables(&self) -> usize {
        self.linear.len()
    }

    pub fn add_linear(&mut self, variable: usize, value: f64) -> &mut QuboModelBuilder {
        self.linear[variable] += value;
        self
    }

    /// Accumulates onto `Q_ij`, `i == j` lands on the linear term.
    pub fn add_quadratic(&mut self, i: usize, j: usize, value: f64) -> &mut QuboModelBuilder {
        if i == j {
            return self.add_linear(i, value);
        }

        let key = if i < j { (i, j) } else { (j, i) };
        *self.quadratic.entry(key).or_insert(0.0) += value;
        self
    }

    pub fn add_offset(&mut self, value: f64) -> &mut QuboModelBuilder {
        self.offset += value;
        self
    }

    pub fn max_field_bound(&self) -> f64 {
        let mut bounds = self.linear.iter().map(|value| value.abs()).collect::<Vec<_>>();
        for (&(i, j), value) in &self.quadratic {
            bounds[i] += value.abs();
            bounds[j] += value.abs();
        }

        bounds.into_iter().fold(0.0, f64::max)
    }

    pub fn build(self) -> QuboModel {
        let mut adjacency = vec![Vec::new(); self.linear.len()];
        let mut interaction_count = 0;

        for ((i, j), value) in self.quadratic {
            if value == 0.0 {
                continue;
            }

            adjacency[i].push((j, value));
            adjacency[j].push((i, value));
            interaction_count += 1;
        }

        for neighbors in adjacency.iter_mut() {
            neighbors.sort_unstable_by_key(|&(neighbor, _)| neighbor);
        }

        QuboModel {
            linear: self.linear,
            adjacency,
            interaction_count,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_model() -> QuboModel {
        let mut builder = QuboModelBuilder::new(3);
        builder
            .add_linear(0, -1.0)
            .add_linear(1, 2.0)
            .add_quadratic(1, 0, 3.0)
            .add_quadratic(0, 1, 1.0)
            .add_quadratic(2, 2, -0.5)
            .add_quadratic(1, 2, -4.0)
            .add_offset(1.0);
        builder.build()
    }

    #[test]
    fn test_coefficients_are_symmetric() {
        let model = create_model();

        assert_eq!(model.coefficient(0, 1), 4.0);
        assert_eq!(model.coefficient(1, 0), 4.0);
        assert_eq!(model.coefficient(2, 2), -0.5);
        assert_eq!(model.coefficient(0, 2), 0.0);
        assert_eq!(model.num_interactions(), 2);

        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(model.coefficient(i, j), model.coefficient(j, i));
            }
        }
    }

    #[test]
    fn test_energy() {
        let model = create_model();

        assert_eq!(model.energy(&SolutionVector::from_bits(&[false, false, false])), 1.0);
        assert_eq!(model.energy(&SolutionVector::from_bits(&[true, false, false])), 0.0);
        assert_eq!(model.energy(&SolutionVector::from_bits(&[true, true, false])), 6.0);
        assert_eq!(model.energy(&SolutionVector::from_bits(&[true, true, true])), 1.5);
    }

    #[test]
    fn test_flip_delta_matches_energy() {
        let model = create_model();

        for mask in 0..8u32 {
            let bits = (0..3).map(|i| mask & (1 << i) != 0).collect::<Vec<_>>();
            let solution = SolutionVector::from_bits(&bits);
            for variable in 0..3 {
                let mut flipped = solution.clone();
                flipped.flip(variable);
                let expected = model.energy(&flipped) - model.energy(&solution);
                assert!((model.flip_delta(variable, &solution) - expected).abs() < 1e-12);
                assert!(expected.abs() <= model.field_bound(variable));
            }
        }
    }

    #[test]
    fn test_degenerate() {
        let model = QuboModelBuilder::new(0).build();
        assert!(model.is_degenerate());
        assert_eq!(model.energy(&SolutionVector::new(0)), 0.0);
        assert_eq!(model.max_field_bound(), 0.0);
        assert_eq!(model.min_nonzero_coefficient(), None);
    }

    #[test]
    fn test_min_nonzero_coefficient() {
        let model = create_model();
        assert_eq!(model.min_nonzero_coefficient(), Some(0.5));
    }
}
