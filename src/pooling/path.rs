use crate::problem::travel_matrix::TravelMatrix;
use crate::problem::Point;

/// Total distance of a multi-stop route with consecutive duplicate stops removed.
///
/// Returns the distance together with the compacted stop sequence, or `None` if the route is
/// empty or one of its legs is unreachable.
pub fn shrink_multi_step_distance<M: TravelMatrix>(
    matrix: &M,
    points: &[Point],
) -> Option<(f64, Vec<Point>)> {
    let (&first, rest) = points.split_first()?;
    let mut distance = 0.0;
    let mut compact = vec![first];
    let mut from = first;
    for &to in rest {
        if to != from {
            distance += matrix.distance(from, to)?;
            compact.push(to);
            from = to;
        }
    }
    Some((distance, compact))
}
