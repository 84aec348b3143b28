use crate::error::{OptimizerError, Result};
use crate::problem::{Arc, Point};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcValues {
    pub distance: f64,
    pub time: f64,
}

static ZERO_ARC_VALUES: ArcValues = ArcValues {
    distance: 0.0,
    time: 0.0,
};

/// Read-only distance/time oracle for one scheduling epoch.
///
/// Lookups never fail hard: a missing arc or a point outside of the matrix is reported as `None`
/// and treated as unreachable by all consumers.
pub trait TravelMatrix: Sync {
    fn num_points(&self) -> usize;
    fn arc(&self, from: Point, to: Point) -> Option<&ArcValues>;

    #[inline(always)]
    fn distance(&self, from: Point, to: Point) -> Option<f64> {
        self.arc(from, to).map(|arc| arc.distance)
    }
    #[inline(always)]
    fn time(&self, from: Point, to: Point) -> Option<f64> {
        self.arc(from, to).map(|arc| arc.time)
    }
}

#[derive(Debug, Clone)]
pub struct FixSizedTravelMatrix {
    n: usize,
    data: Vec<Option<ArcValues>>,
}

impl FixSizedTravelMatrix {
    /// Straight-line distances between `coords`; travel times assume a constant `speed`.
    pub fn with_euclidean_distances(coords: &[(f64, f64)], speed: f64) -> Self {
        let n = coords.len();
        let mut builder = FixSizedTravelMatrixBuilder::with_num_points(n);
        for (i, (xi, yi)) in coords.iter().enumerate() {
            for (j, (xj, yj)) in coords.iter().enumerate() {
                if i == j {
                    continue;
                }
                let euclidean = ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt();
                builder.insert(
                    i,
                    j,
                    ArcValues {
                        distance: euclidean,
                        time: euclidean / speed,
                    },
                );
            }
        }
        builder.build()
    }

    /// Builds the matrix from dense `dist[i][j]` / `time[i][j]` arrays.
    ///
    /// Negative or non-finite entries mark the pair as unreachable.
    pub fn from_dense(distances: &[Vec<f64>], times: &[Vec<f64>]) -> Result<Self> {
        let n = distances.len();
        if times.len() != n {
            return Err(OptimizerError::InvalidTravelMatrix(format!(
                "distance matrix has {} rows but time matrix has {}",
                n,
                times.len()
            )));
        }
        let mut builder = FixSizedTravelMatrixBuilder::with_num_points(n);
        for (i, (distance_row, time_row)) in distances.iter().zip(times.iter()).enumerate() {
            if distance_row.len() != n || time_row.len() != n {
                return Err(OptimizerError::InvalidTravelMatrix(format!(
                    "row {} has {} distances and {} times, expected {}",
                    i,
                    distance_row.len(),
                    time_row.len(),
                    n
                )));
            }
            for (j, (&distance, &time)) in distance_row.iter().zip(time_row.iter()).enumerate() {
                if i != j && is_valid_entry(distance) && is_valid_entry(time) {
                    builder.insert(i, j, ArcValues { distance, time });
                }
            }
        }
        Ok(builder.build())
    }

    #[inline(always)]
    fn idx(&self, from: Point, to: Point) -> Option<usize> {
        if from < self.n && to < self.n {
            Some(from * self.n + to)
        } else {
            None
        }
    }
}

fn is_valid_entry(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

impl TravelMatrix for FixSizedTravelMatrix {
    #[inline(always)]
    fn num_points(&self) -> usize {
        self.n
    }
    #[inline(always)]
    fn arc(&self, from: Point, to: Point) -> Option<&ArcValues> {
        if from == to && from < self.n {
            return Some(&ZERO_ARC_VALUES);
        }
        self.idx(from, to).and_then(|idx| self.data[idx].as_ref())
    }
}

pub struct FixSizedTravelMatrixBuilder {
    n: usize,
    data: Vec<Option<ArcValues>>,
}

impl FixSizedTravelMatrixBuilder {
    pub fn with_num_points(num_points: usize) -> Self {
        Self {
            n: num_points,
            data: vec![None; num_points * num_points],
        }
    }

    pub fn set_arc(&mut self, arc: Arc) -> Result<&mut Self> {
        if arc.from >= self.n || arc.to >= self.n {
            return Err(OptimizerError::InvalidTravelMatrix(format!(
                "arc {} -> {} is outside of a matrix with {} points",
                arc.from, arc.to, self.n
            )));
        }
        if !is_valid_entry(arc.distance) || !is_valid_entry(arc.time) {
            return Err(OptimizerError::InvalidTravelMatrix(format!(
                "arc {} -> {} has invalid values (distance: {}, time: {})",
                arc.from, arc.to, arc.distance, arc.time
            )));
        }
        self.insert(
            arc.from,
            arc.to,
            ArcValues {
                distance: arc.distance,
                time: arc.time,
            },
        );
        Ok(self)
    }

    fn insert(&mut self, from: Point, to: Point, values: ArcValues) {
        self.data[from * self.n + to] = Some(values);
    }

    pub fn build(self) -> FixSizedTravelMatrix {
        FixSizedTravelMatrix {
            n: self.n,
            data: self.data,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// complete matrix where every arc between distinct points has the same distance and time
    pub(crate) fn uniform_matrix(
        num_points: usize,
        distance: f64,
        time: f64,
    ) -> FixSizedTravelMatrix {
        let mut builder = FixSizedTravelMatrixBuilder::with_num_points(num_points);
        for from in 0..num_points {
            for to in 0..num_points {
                if from != to {
                    builder.insert(from, to, ArcValues { distance, time });
                }
            }
        }
        builder.build()
    }

    #[test]
    fn missing_arcs_are_unreachable() -> anyhow::Result<()> {
        let mut builder = FixSizedTravelMatrixBuilder::with_num_points(3);
        builder.set_arc(Arc {
            from: 0,
            to: 1,
            distance: 4.0,
            time: 40.0,
        })?;
        let matrix = builder.build();

        assert_eq!(matrix.distance(0, 1), Some(4.0));
        assert_eq!(matrix.time(0, 1), Some(40.0));
        assert_eq!(matrix.distance(1, 0), None);
        assert_eq!(matrix.distance(2, 2), Some(0.0));
        assert_eq!(matrix.distance(0, 7), None);
        assert_eq!(matrix.distance(7, 7), None);
        Ok(())
    }

    #[test]
    fn set_arc_rejects_out_of_range_points() {
        let mut builder = FixSizedTravelMatrixBuilder::with_num_points(2);
        assert!(builder
            .set_arc(Arc {
                from: 0,
                to: 2,
                distance: 1.0,
                time: 1.0,
            })
            .is_err());
    }

    #[test]
    fn dense_arrays_mark_invalid_entries_unreachable() -> anyhow::Result<()> {
        let distances = vec![vec![0.0, 3.0], vec![f64::INFINITY, 0.0]];
        let times = vec![vec![0.0, 30.0], vec![12.0, 0.0]];
        let matrix = FixSizedTravelMatrix::from_dense(&distances, &times)?;

        assert_eq!(matrix.num_points(), 2);
        assert_eq!(matrix.distance(0, 1), Some(3.0));
        assert_eq!(matrix.time(1, 0), None);
        Ok(())
    }

    #[test]
    fn dense_arrays_must_be_square() {
        let distances = vec![vec![0.0, 3.0], vec![1.0]];
        let times = vec![vec![0.0, 30.0], vec![12.0, 0.0]];
        assert!(FixSizedTravelMatrix::from_dense(&distances, &times).is_err());
    }

    #[test]
    fn euclidean_distances() {
        let matrix = FixSizedTravelMatrix::with_euclidean_distances(&[(0.0, 0.0), (3.0, 4.0)], 0.5);
        assert_eq!(matrix.distance(0, 1), Some(5.0));
        assert_eq!(matrix.time(1, 0), Some(10.0));
    }
}
